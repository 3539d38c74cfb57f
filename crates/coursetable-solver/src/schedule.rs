//! Working state shared by the phases of one sub-problem.

use coursetable_core::{CourseEvent, Registry, TimeTable};

/// A grid together with the events that still have to be placed in it.
///
/// Every event of a sub-problem is either in the grid or in `unplaced`,
/// never both. The number of unplaced events is the distance to a
/// feasible schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub timetable: TimeTable,
    pub unplaced: Vec<CourseEvent>,
}

impl Schedule {
    pub fn new(timetable: TimeTable, unplaced: Vec<CourseEvent>) -> Self {
        Self { timetable, unplaced }
    }

    /// Empty grid over every room of `registry` with all `events` unplaced.
    pub fn empty(registry: &Registry, events: Vec<CourseEvent>) -> Self {
        Self::new(TimeTable::new(registry), events)
    }

    /// Number of events still unplaced.
    #[inline]
    pub fn distance(&self) -> usize {
        self.unplaced.len()
    }

    pub fn is_feasible(&self) -> bool {
        self.unplaced.is_empty()
    }
}
