//! Bounded FIFO tabu lists.

use std::collections::VecDeque;

/// Remembers the most recent `capacity` entries; the oldest entry is
/// evicted first.
///
/// # Example
///
/// ```
/// use coursetable_solver::heuristic::TabuList;
///
/// let mut tabu = TabuList::new(2);
/// tabu.push(1);
/// tabu.push(2);
/// tabu.push(3);
///
/// assert!(!tabu.contains(&1));
/// assert!(tabu.contains(&2));
/// assert!(tabu.contains(&3));
/// ```
#[derive(Debug, Clone)]
pub struct TabuList<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T: PartialEq> TabuList<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn contains(&self, entry: &T) -> bool {
        self.entries.contains(entry)
    }

    /// Adds `entry`, evicting the oldest entries beyond capacity.
    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut tabu = TabuList::new(3);
        for i in 0..5 {
            tabu.push(i);
        }
        assert_eq!(tabu.len(), 3);
        assert!(!tabu.contains(&0));
        assert!(!tabu.contains(&1));
        assert!(tabu.contains(&2));
        assert!(tabu.contains(&4));
    }

    #[test]
    fn test_zero_capacity_remembers_nothing() {
        let mut tabu = TabuList::new(0);
        tabu.push("a");
        assert!(tabu.is_empty());
        assert!(!tabu.contains(&"a"));
    }

    #[test]
    fn test_pairs_are_ordered() {
        let mut tabu = TabuList::new(4);
        tabu.push((1, 2));
        assert!(tabu.contains(&(1, 2)));
        assert!(!tabu.contains(&(2, 1)));
        tabu.clear();
        assert!(tabu.is_empty());
        assert_eq!(tabu.capacity(), 4);
    }
}
