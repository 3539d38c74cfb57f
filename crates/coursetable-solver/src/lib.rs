//! Coursetable solver engine
//!
//! This crate turns a [`Registry`](coursetable_core::Registry) into a term
//! of weekly timetables:
//! - Phases (construction heuristic, tabu search repair, simulated annealing)
//! - Neighborhood moves and tabu lists
//! - Termination conditions and scopes
//! - Recurrence partitioning and the multi-week pipeline
//! - Reservation output

pub mod clock;
pub mod error;
pub mod heuristic;
pub mod output;
pub mod partition;
pub mod phase;
pub mod pipeline;
pub mod schedule;
pub mod scope;
pub mod stats;
pub mod termination;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{Result, SolverError};
pub use heuristic::{ExponentialCooling, SwapMode, TabuList, TemperatureSchedule};
pub use output::{reservations, Reservation, WeekTimetable, Weekday};
pub use partition::{
    partition_events, recurrence_counts, seed_remaining_hours, top_level_events, Recurrence, RecurrenceBuckets,
};
pub use phase::{ConstructionPhase, Phase, SimulatedAnnealingPhase, TabuSearchPhase};
pub use pipeline::{PipelineOutcome, Stage, SubproblemReport, TimetablePipeline};
pub use schedule::Schedule;
pub use scope::{PhaseScope, SolverScope};
pub use stats::{PhaseStats, SolverStats};
pub use termination::{OrTermination, StepCountTermination, Termination, TimeTermination};
