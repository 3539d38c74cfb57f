//! Phase-level scope.

use std::time::Duration;

use rand::rngs::StdRng;

use super::SolverScope;
use crate::stats::PhaseStats;

/// Scope for a single phase of solving.
///
/// # Lifetimes
/// * `'s` - Lifetime of the borrowed solver scope
/// * `'a` - Lifetime of the problem facts
pub struct PhaseScope<'s, 'a> {
    solver_scope: &'s mut SolverScope<'a>,
    started_at: Duration,
    stats: PhaseStats,
}

impl<'s, 'a> PhaseScope<'s, 'a> {
    /// Creates a new phase scope.
    pub fn new(solver_scope: &'s mut SolverScope<'a>, phase_type: &'static str) -> Self {
        let phase_index = solver_scope.next_phase_index();
        let started_at = solver_scope.now();
        Self {
            solver_scope,
            started_at,
            stats: PhaseStats::new(phase_index, phase_type),
        }
    }

    /// Returns the phase index.
    pub fn phase_index(&self) -> usize {
        self.stats.phase_index
    }

    /// Returns the elapsed time for this phase.
    pub fn elapsed(&self) -> Duration {
        self.solver_scope.now().saturating_sub(self.started_at)
    }

    /// Returns the step count for this phase.
    pub fn step_count(&self) -> u64 {
        self.stats.step_count
    }

    /// Increments the phase step count.
    pub fn increment_step_count(&mut self) -> u64 {
        self.stats.record_step();
        self.stats.step_count
    }

    pub fn record_move(&mut self, accepted: bool) {
        self.stats.record_move(accepted);
    }

    pub fn record_score_calculation(&mut self) {
        self.stats.record_score_calculation();
    }

    pub fn stats(&self) -> &PhaseStats {
        &self.stats
    }

    /// Returns a reference to the solver scope.
    pub fn solver_scope(&self) -> &SolverScope<'a> {
        self.solver_scope
    }

    /// Returns a mutable reference to the solver scope.
    pub fn solver_scope_mut(&mut self) -> &mut SolverScope<'a> {
        self.solver_scope
    }

    pub fn rng(&mut self) -> &mut StdRng {
        self.solver_scope.rng()
    }

    /// Closes the phase, folding its statistics into the solver scope.
    pub fn finish(mut self) -> PhaseStats {
        self.stats.duration = self.elapsed();
        self.solver_scope.finish_phase(&self.stats);
        self.stats
    }
}
