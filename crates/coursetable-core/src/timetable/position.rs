use std::fmt;

use crate::domain::RoomId;

/// A (room, local slot) cell of a weekly grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub room: RoomId,
    pub slot: u32,
}

impl Position {
    pub const fn new(room: RoomId, slot: u32) -> Self {
        Self { room, slot }
    }

    /// Dense index: `room * slots_per_week + slot`.
    #[inline]
    pub(crate) fn index(self, slots_per_week: u32) -> usize {
        self.room.index() * slots_per_week as usize + self.slot as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize, slots_per_week: u32) -> Self {
        let spw = slots_per_week as usize;
        Self {
            room: RoomId::new(index / spw),
            slot: (index % spw) as u32,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, slot {})", self.room, self.slot)
    }
}
