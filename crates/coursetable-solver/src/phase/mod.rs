//! Solver phases
//!
//! Every sub-problem runs the same sequence of phases on one [`Schedule`]:
//! - [`ConstructionPhase`]: greedy single-pass placement
//! - [`TabuSearchPhase`]: drives the number of unplaced events to zero
//! - [`SimulatedAnnealingPhase`]: lowers the soft cost of a feasible grid

pub mod annealing;
pub mod construction;
pub mod feasibility;

use std::fmt::Debug;

use coursetable_config::EnvironmentMode;

use crate::error::Result;
use crate::schedule::Schedule;
use crate::scope::SolverScope;

pub use annealing::SimulatedAnnealingPhase;
pub use construction::ConstructionPhase;
pub use feasibility::TabuSearchPhase;

/// A phase of the solving process.
///
/// A phase reads the problem facts and randomness from the solver scope
/// and mutates the schedule in place.
pub trait Phase: Send + Debug {
    /// Executes this phase.
    fn solve(&mut self, schedule: &mut Schedule, solver_scope: &mut SolverScope<'_>) -> Result<()>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}

/// Verifies grid invariants after a step under `full_assert`.
pub(crate) fn assert_step(schedule: &Schedule, mode: EnvironmentMode) -> Result<()> {
    if mode.is_fully_asserted() {
        schedule.timetable.check_invariants()?;
    }
    Ok(())
}

/// Verifies grid invariants at the end of a phase under any asserted mode.
pub(crate) fn assert_phase(schedule: &Schedule, mode: EnvironmentMode) -> Result<()> {
    if mode.is_asserted() {
        schedule.timetable.check_invariants()?;
    }
    Ok(())
}
