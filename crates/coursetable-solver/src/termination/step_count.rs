//! Step count termination.

use super::Termination;
use crate::scope::PhaseScope;

/// Terminates after a number of phase steps.
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for StepCountTermination {
    fn is_terminated(&self, phase_scope: &PhaseScope<'_, '_>) -> bool {
        phase_scope.step_count() >= self.limit
    }
}
