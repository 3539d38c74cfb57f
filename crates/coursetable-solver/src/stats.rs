//! Solver statistics.
//!
//! Plain counters; durations come from the scope's [`Clock`](crate::clock::Clock).

use std::time::Duration;

/// Solver-level statistics.
///
/// Aggregates every phase run against one solver scope.
///
/// # Example
///
/// ```
/// use coursetable_solver::stats::SolverStats;
///
/// let mut stats = SolverStats::default();
/// stats.record_step();
/// stats.record_move(true);
/// stats.record_move(false);
///
/// assert_eq!(stats.step_count, 1);
/// assert_eq!(stats.moves_evaluated, 2);
/// assert_eq!(stats.moves_accepted, 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SolverStats {
    /// Phases run so far.
    pub phase_count: usize,
    /// Total steps taken across all phases.
    pub step_count: u64,
    /// Total moves evaluated across all phases.
    pub moves_evaluated: u64,
    /// Total moves accepted across all phases.
    pub moves_accepted: u64,
    /// Total soft cost evaluations.
    pub score_calculations: u64,
}

impl SolverStats {
    /// Records a move evaluation and whether it was accepted.
    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    /// Records a step completion.
    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    /// Records a score calculation.
    pub fn record_score_calculation(&mut self) {
        self.score_calculations += 1;
    }

    /// Folds a finished phase into the totals.
    pub fn absorb(&mut self, phase: &PhaseStats) {
        self.phase_count += 1;
        self.step_count += phase.step_count;
        self.moves_evaluated += phase.moves_evaluated;
        self.moves_accepted += phase.moves_accepted;
        self.score_calculations += phase.score_calculations;
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}

/// Phase-level statistics.
///
/// # Example
///
/// ```
/// use coursetable_solver::stats::PhaseStats;
///
/// let mut stats = PhaseStats::new(0, "Tabu Search");
/// stats.record_step();
/// stats.record_move(true);
///
/// assert_eq!(stats.phase_index, 0);
/// assert_eq!(stats.phase_type, "Tabu Search");
/// assert_eq!(stats.step_count, 1);
/// assert_eq!(stats.moves_accepted, 1);
/// ```
#[derive(Debug, Clone)]
pub struct PhaseStats {
    /// Index of this phase (0-based) within its solver scope.
    pub phase_index: usize,
    /// Type name of the phase.
    pub phase_type: &'static str,
    /// Number of steps taken in this phase.
    pub step_count: u64,
    /// Number of moves evaluated in this phase.
    pub moves_evaluated: u64,
    /// Number of moves accepted in this phase.
    pub moves_accepted: u64,
    /// Number of soft cost evaluations in this phase.
    pub score_calculations: u64,
    /// Wall time of the phase, set when it ends.
    pub duration: Duration,
}

impl PhaseStats {
    /// Creates new phase statistics.
    pub fn new(phase_index: usize, phase_type: &'static str) -> Self {
        Self {
            phase_index,
            phase_type,
            step_count: 0,
            moves_evaluated: 0,
            moves_accepted: 0,
            score_calculations: 0,
            duration: Duration::ZERO,
        }
    }

    /// Records a step completion.
    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    /// Records a move evaluation and whether it was accepted.
    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    pub fn record_score_calculation(&mut self) {
        self.score_calculations += 1;
    }

    /// Steps per second over the phase duration.
    pub fn speed(&self) -> u64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.step_count as f64 / secs) as u64
        } else {
            0
        }
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_phase() {
        let mut phase = PhaseStats::new(2, "Simulated Annealing");
        phase.record_step();
        phase.record_step();
        phase.record_move(true);
        phase.record_move(false);
        phase.record_score_calculation();
        phase.duration = Duration::from_millis(500);

        let mut solver = SolverStats::default();
        solver.absorb(&phase);

        assert_eq!(solver.phase_count, 1);
        assert_eq!(solver.step_count, 2);
        assert_eq!(solver.acceptance_rate(), 0.5);
        assert_eq!(solver.score_calculations, 1);
        assert_eq!(phase.speed(), 4);
    }

    #[test]
    fn test_rates_without_moves() {
        let phase = PhaseStats::new(0, "Construction");
        assert_eq!(phase.acceptance_rate(), 0.0);
        assert_eq!(phase.speed(), 0);
    }
}
