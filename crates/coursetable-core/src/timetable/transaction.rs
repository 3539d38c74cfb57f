//! Journaled grid mutations with exact rollback.

use crate::domain::{CourseEvent, LecturerId};
use crate::error::{Result, TimetableError};

use super::grid::TimeTable;
use super::position::Position;

#[derive(Debug)]
enum Entry {
    Assigned(Position),
    Removed {
        position: Position,
        event: CourseEvent,
        lecturer: LecturerId,
    },
}

/// A tentative sequence of `assign`/`remove` calls on one grid.
///
/// Every mutation is journaled so the grid can be restored exactly, either
/// to a [`savepoint`](Self::savepoint) or to the state at
/// [`begin`](Self::begin). Dropping a transaction keeps its changes, the
/// same as [`commit`](Self::commit).
#[must_use = "a transaction must be committed or rolled back"]
#[derive(Debug)]
pub struct Transaction<'a> {
    grid: &'a mut TimeTable,
    journal: Vec<Entry>,
}

impl<'a> Transaction<'a> {
    pub fn begin(grid: &'a mut TimeTable) -> Self {
        Self {
            grid,
            journal: Vec::new(),
        }
    }

    /// Read access to the grid in its current, uncommitted state.
    #[inline]
    pub fn grid(&self) -> &TimeTable {
        &*self.grid
    }

    /// Journaled [`TimeTable::remove`].
    pub fn remove(&mut self, position: Position) -> Result<Option<CourseEvent>> {
        let lecturer = self.grid.get(position).and_then(CourseEvent::assigned_lecturer);
        let removed = self.grid.remove(position)?;
        if let (Some(event), Some(lecturer)) = (&removed, lecturer) {
            self.journal.push(Entry::Removed {
                position,
                event: event.clone(),
                lecturer,
            });
        }
        Ok(removed)
    }

    /// Journaled [`TimeTable::assign`]; a displaced occupant is journaled
    /// as a removal.
    pub fn assign(&mut self, event: CourseEvent, position: Position) -> Result<Option<CourseEvent>> {
        let displaced = if self.grid.is_occupied(position) {
            self.remove(position)?
        } else {
            None
        };
        self.grid.assign(event, position)?;
        self.journal.push(Entry::Assigned(position));
        Ok(displaced)
    }

    /// Marker for [`rollback_to`](Self::rollback_to).
    #[inline]
    pub fn savepoint(&self) -> usize {
        self.journal.len()
    }

    /// Undoes every mutation made after `savepoint`.
    pub fn rollback_to(&mut self, savepoint: usize) -> Result<()> {
        while self.journal.len() > savepoint {
            match self.journal.pop() {
                Some(Entry::Assigned(position)) => {
                    if self.grid.remove(position)?.is_none() {
                        return Err(TimetableError::InvariantViolated(format!(
                            "journaled assignment at {position} vanished"
                        )));
                    }
                }
                Some(Entry::Removed {
                    position,
                    event,
                    lecturer,
                }) => self.grid.reinstate(event, position, lecturer)?,
                None => break,
            }
        }
        Ok(())
    }

    /// Restores the grid to its state at `begin`.
    pub fn rollback(mut self) -> Result<()> {
        self.rollback_to(0)
    }

    /// Keeps all changes.
    pub fn commit(self) {}

    /// Number of journaled mutations.
    pub fn len(&self) -> usize {
        self.journal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journal.is_empty()
    }
}
