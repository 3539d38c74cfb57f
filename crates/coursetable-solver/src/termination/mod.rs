//! Termination conditions for solver phases.

mod composite;
mod step_count;
mod time;

use std::fmt::Debug;

use coursetable_config::TerminationConfig;

use crate::scope::PhaseScope;

pub use composite::OrTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;

/// Trait for determining when a phase should stop.
///
/// Phases also stop on their own once their objective is met and whenever
/// the solver scope is told to terminate early.
pub trait Termination: Send + Sync + Debug {
    /// Returns true if the phase should terminate.
    fn is_terminated(&self, phase_scope: &PhaseScope<'_, '_>) -> bool;
}

/// Builds the termination described by `config`.
///
/// Time and step limits are combined with OR; a config without limits
/// never terminates on its own.
pub fn from_config(config: &TerminationConfig) -> OrTermination {
    let mut terminations: Vec<Box<dyn Termination>> = Vec::new();
    if let Some(limit) = config.time_limit() {
        terminations.push(Box::new(TimeTermination::new(limit)));
    }
    if let Some(steps) = config.step_count_limit {
        terminations.push(Box::new(StepCountTermination::new(steps)));
    }
    OrTermination::new(terminations)
}
