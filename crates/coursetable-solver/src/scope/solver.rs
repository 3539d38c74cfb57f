//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use coursetable_config::EnvironmentMode;
use coursetable_core::{EventFactory, PenaltyWeights, Registry};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::{Clock, MonotonicClock};
use crate::stats::{PhaseStats, SolverStats};

/// Everything the phases of one sub-problem share: the problem facts, the
/// random source, the clock and the early-termination signals.
///
/// # Lifetimes
/// * `'a` - Lifetime of the registry and event factory
pub struct SolverScope<'a> {
    registry: &'a Registry,
    factory: &'a EventFactory,
    weights: PenaltyWeights,
    environment_mode: EnvironmentMode,
    rng: StdRng,
    clock: Arc<dyn Clock>,
    started_at: Duration,
    /// Clock reading after which every phase stops.
    deadline: Option<Duration>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    stats: SolverStats,
}

impl<'a> SolverScope<'a> {
    /// Scope with an OS-seeded RNG and the wall clock.
    pub fn new(registry: &'a Registry, factory: &'a EventFactory) -> Self {
        Self::with_rng(registry, factory, StdRng::from_os_rng())
    }

    /// Scope with a seeded RNG, for reproducible runs.
    pub fn with_seed(registry: &'a Registry, factory: &'a EventFactory, seed: u64) -> Self {
        Self::with_rng(registry, factory, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(registry: &'a Registry, factory: &'a EventFactory, rng: StdRng) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
        Self {
            registry,
            factory,
            weights: PenaltyWeights::default(),
            environment_mode: EnvironmentMode::default(),
            rng,
            started_at: clock.now(),
            clock,
            deadline: None,
            terminate_early_flag: None,
            stats: SolverStats::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.started_at = clock.now();
        self.clock = clock;
        self
    }

    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Stops every phase once the clock reads `deadline`.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_terminate_early_flag(mut self, flag: Option<Arc<AtomicBool>>) -> Self {
        self.terminate_early_flag = flag;
        self
    }

    #[inline]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline]
    pub fn factory(&self) -> &'a EventFactory {
        self.factory
    }

    #[inline]
    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    #[inline]
    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Clock reading now.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Time since this scope was created.
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.started_at)
    }

    /// True once the external flag is raised or the deadline has passed.
    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
            || self.deadline.is_some_and(|deadline| self.clock.now() >= deadline)
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub(crate) fn next_phase_index(&self) -> usize {
        self.stats.phase_count
    }

    pub(crate) fn finish_phase(&mut self, phase: &PhaseStats) {
        self.stats.absorb(phase);
    }
}

impl std::fmt::Debug for SolverScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverScope")
            .field("environment_mode", &self.environment_mode)
            .field("deadline", &self.deadline)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
