//! Error types for the timetable domain

use thiserror::Error;

use crate::domain::EventId;
use crate::timetable::Position;

/// Main error type for domain and grid operations.
///
/// Most variants signal a broken invariant rather than a recoverable
/// condition: the phases only call `assign` after a successful `fits`
/// check, so `NoFreeLecturer` can only surface through a defect.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// An event was assigned to a slot where all its lecturers are busy
    #[error("no free lecturer for event {event} at absolute slot {slot}")]
    NoFreeLecturer { event: EventId, slot: u32 },

    /// A placed event was removed but carries no assigned lecturer
    #[error("placed event {event} has no assigned lecturer")]
    MissingAssignedLecturer { event: EventId },

    /// Position refers to a room outside the registry
    #[error("position {position} refers to an unknown room")]
    UnknownRoom { position: Position },

    /// Slot lies outside the weekly horizon
    #[error("slot {slot} is outside the weekly horizon of {slots_per_week} slots")]
    SlotOutOfRange { slot: u32, slots_per_week: u32 },

    /// A code could not be resolved while building the registry
    #[error("unknown {kind} code: {code}")]
    UnknownCode { kind: &'static str, code: String },

    /// Horizon with zero days or zero hours per day
    #[error("planning horizon must have at least one slot per week")]
    EmptyPlanningHorizon,

    /// Input dataset could not be read
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Internal consistency check failed
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}

impl From<serde_json::Error> for TimetableError {
    fn from(err: serde_json::Error) -> Self {
        TimetableError::InvalidDataset(err.to_string())
    }
}

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, TimetableError>;
