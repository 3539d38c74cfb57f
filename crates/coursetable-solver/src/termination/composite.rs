//! Composite termination.

use super::Termination;
use crate::scope::PhaseScope;

/// Terminates when any child terminates. Without children it never does.
#[derive(Debug, Default)]
pub struct OrTermination {
    terminations: Vec<Box<dyn Termination>>,
}

impl OrTermination {
    pub fn new(terminations: Vec<Box<dyn Termination>>) -> Self {
        Self { terminations }
    }

    pub fn with(mut self, termination: impl Termination + 'static) -> Self {
        self.terminations.push(Box::new(termination));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terminations.is_empty()
    }
}

impl Termination for OrTermination {
    fn is_terminated(&self, phase_scope: &PhaseScope<'_, '_>) -> bool {
        self.terminations.iter().any(|t| t.is_terminated(phase_scope))
    }
}
