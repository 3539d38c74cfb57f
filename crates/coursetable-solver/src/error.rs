//! Error types for solving.

use coursetable_config::ConfigError;
use coursetable_core::TimetableError;
use thiserror::Error;

/// Errors raised while building or running a solve.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A grid or domain invariant was violated
    #[error(transparent)]
    Timetable(#[from] TimetableError),

    /// The configuration is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, SolverError>;
