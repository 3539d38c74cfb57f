//! Growable bit set over dense indices.
//!
//! Used for per-lecturer and per-curriculum slot occupancy and for the
//! occupied/empty position partitions of a grid. Iteration is always
//! ascending, so every consumer sees a deterministic order.

use std::fmt;
use std::ops::Range;

use fixedbitset::FixedBitSet;

/// A [`FixedBitSet`] that grows on insert and keeps its member count.
#[derive(Clone, Default)]
pub struct BitSet {
    bits: FixedBitSet,
    len: usize,
}

impl BitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for `bits` indices.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(bits),
            len: 0,
        }
    }

    /// Creates a set containing every index in `0..bits`.
    pub fn full(bits: usize) -> Self {
        let mut set = FixedBitSet::with_capacity(bits);
        set.insert_range(..);
        Self { bits: set, len: bits }
    }

    /// Adds `index`, returning `true` if it was not present.
    pub fn insert(&mut self, index: usize) -> bool {
        if index >= self.bits.len() {
            self.bits.grow(index + 1);
        }
        let present = self.bits.put(index);
        if !present {
            self.len += 1;
        }
        !present
    }

    /// Removes `index`, returning `true` if it was present.
    pub fn remove(&mut self, index: usize) -> bool {
        if !self.bits.contains(index) {
            return false;
        }
        self.bits.set(index, false);
        self.len -= 1;
        true
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.bits.contains(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.bits.clear();
        self.len = 0;
    }

    /// Number of members inside `range`.
    pub fn count_in(&self, range: Range<usize>) -> usize {
        let end = range.end.min(self.bits.len());
        if range.start >= end {
            return 0;
        }
        self.bits.count_ones(range.start..end)
    }

    /// Returns the `n`-th smallest member.
    pub fn nth(&self, n: usize) -> Option<usize> {
        self.bits.ones().nth(n)
    }

    /// Ascending iterator over members.
    pub fn iter(&self) -> fixedbitset::Ones<'_> {
        self.bits.ones()
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for BitSet {}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = BitSet::new();
        for index in iter {
            set.insert(index);
        }
        set
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = fixedbitset::Ones<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
