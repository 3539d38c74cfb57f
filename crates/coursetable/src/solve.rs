//! Solver entry point that hides the pipeline wiring.

use coursetable_config::SolverConfig;
use coursetable_core::{CourseEvent, Dataset, EventFactory, Registry};
use coursetable_solver::{
    partition_events, reservations, Reservation, Result, SubproblemReport, TimetablePipeline, WeekTimetable,
};
use tracing::info;

/// A solved term.
#[derive(Debug, Clone)]
pub struct Solution {
    pub registry: Registry,
    /// Weeks 1 to 12, then the catch-up week.
    pub weeks: Vec<WeekTimetable>,
    /// Events left out of every week.
    pub unplaced: Vec<CourseEvent>,
    pub reservations: Vec<Reservation>,
    pub reports: Vec<SubproblemReport>,
}

impl Solution {
    pub fn is_feasible(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Reservations as a pretty-printed JSON array.
    pub fn reservations_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.reservations)
    }
}

/// Builds the registry from `dataset` and solves the whole term.
///
/// Penalty weights and the minimum student amount found in the dataset
/// override the ones in `config`.
pub fn solve(dataset: &Dataset, config: &SolverConfig) -> Result<Solution> {
    let horizon = config.horizon.to_horizon()?;
    let registry = dataset.to_registry(horizon, dataset.input_rules(config.input_rules()))?;

    let mut config = config.clone();
    let weights = dataset.penalty_weights(config.penalty_weights());
    config.penalties.late_hour_penalty = weights.late_hour;
    config.penalties.kilometer_penalty = weights.kilometer;
    config.penalties.not_home_penalty = weights.not_home;

    info!(
        event = "dataset_loaded",
        academic_year = dataset.academic_year.as_deref().unwrap_or(""),
        semester = dataset.semester.as_deref().unwrap_or(""),
        courses = registry.course_count(),
        rooms = registry.room_count(),
    );
    solve_registry(registry, &config)
}

/// Solves the whole term for an already built registry.
pub fn solve_registry(registry: Registry, config: &SolverConfig) -> Result<Solution> {
    let factory = EventFactory::new();
    let buckets = partition_events(&registry, &factory);
    let outcome = TimetablePipeline::new(config.clone()).solve(&registry, &factory, buckets)?;
    let reservations = reservations(&registry, &outcome.weeks);

    Ok(Solution {
        registry,
        weeks: outcome.weeks,
        unplaced: outcome.unplaced,
        reservations,
        reports: outcome.reports,
    })
}
