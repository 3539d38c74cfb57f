//! Coursetable - weekly university course timetabling
//!
//! Load a [`Dataset`], pick a [`SolverConfig`] and call [`solve`]: every
//! course is cut into recurring one-hour events, placed over twelve
//! teaching weeks plus a catch-up week, and flattened into room
//! reservations.
//!
//! # Example
//!
//! ```
//! use coursetable::{solve, Dataset, SolverConfig, TerminationConfig};
//!
//! let dataset = Dataset::from_json_str(r#"{
//!     "courses": [{
//!         "code": "ALG", "student_amount": 40, "contact_hours": 15,
//!         "lecturers": [{ "external_id": "alice" }],
//!         "curricula": [{ "code": "BA1" }]
//!     }],
//!     "sites": [{
//!         "code": "MAIN", "latitude": 51.05, "longitude": 3.72,
//!         "rooms": [{ "code": "R1", "capacity": 60 }]
//!     }]
//! }"#).unwrap();
//!
//! let mut config = SolverConfig::new().with_random_seed(7);
//! config.simulated_annealing.termination = TerminationConfig {
//!     step_count_limit: Some(100),
//!     ..TerminationConfig::default()
//! };
//!
//! let solution = solve(&dataset, &config).unwrap();
//! assert!(solution.is_feasible());
//! // 15 contact hours, 80% of them scheduled.
//! assert_eq!(solution.reservations.len(), 12);
//! ```

#[cfg(feature = "console")]
pub mod console;

mod solve;

pub use solve::{solve, solve_registry, Solution};

pub use coursetable_config::{
    ConfigError, ConstructionConfig, EnvironmentMode, HorizonConfig, InputConfig, PenaltyConfig, RoomRanking,
    SimulatedAnnealingConfig, SolverConfig, TabuSearchConfig, TerminationConfig,
};
pub use coursetable_core::{
    CourseEvent, Dataset, EventFactory, Horizon, InputRules, PenaltyWeights, Position, Registry, TimeTable,
    TimetableError, TEACHING_WEEKS,
};
pub use coursetable_scoring::{evaluate, fits, fits_position, total_cost, CostBreakdown};
pub use coursetable_solver::{
    partition_events, reservations, PipelineOutcome, Recurrence, RecurrenceBuckets, Reservation, Result,
    SolverError, Stage, SubproblemReport, TimetablePipeline, WeekTimetable, Weekday,
};
