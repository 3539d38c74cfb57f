//! Simulated annealing on a feasible grid.

use coursetable_config::SimulatedAnnealingConfig;
use coursetable_core::Transaction;
use coursetable_scoring::total_cost;
use rand::Rng;
use tracing::{debug, info, trace};

use super::{assert_phase, assert_step, Phase};
use crate::error::Result;
use crate::heuristic::neighborhood::{random_position_pair, swap_positions};
use crate::heuristic::{ExponentialCooling, SwapMode, TemperatureSchedule};
use crate::schedule::Schedule;
use crate::scope::{PhaseScope, SolverScope};
use crate::termination::{self, OrTermination, Termination};

/// Lowers the soft cost of a grid with feasibility-preserving swaps.
///
/// Improving swaps are always kept; worsening ones with probability
/// `exp(-delta / temperature)`. The temperature follows an
/// [`ExponentialCooling`] schedule and jumps back to `t_max` after
/// `reheat_after` consecutive rejections. The phase stops at cost zero,
/// when its termination fires, or when `max_swap_attempts` draws in a row
/// yield no feasible swap. On exit the grid is the cheapest one seen.
#[derive(Debug)]
pub struct SimulatedAnnealingPhase {
    cooling: ExponentialCooling,
    reheat_after: u32,
    max_swap_attempts: u32,
    termination: OrTermination,
}

impl SimulatedAnnealingPhase {
    pub fn new(config: &SimulatedAnnealingConfig) -> Self {
        Self {
            cooling: ExponentialCooling::new(config.t_max, config.t_min, config.steps),
            reheat_after: config.reheat_after,
            max_swap_attempts: config.max_swap_attempts,
            termination: termination::from_config(&config.termination),
        }
    }

    /// Replaces the configured termination.
    pub fn with_termination(mut self, termination: OrTermination) -> Self {
        self.termination = termination;
        self
    }
}

impl Phase for SimulatedAnnealingPhase {
    fn solve(&mut self, schedule: &mut Schedule, solver_scope: &mut SolverScope<'_>) -> Result<()> {
        let mut phase_scope = PhaseScope::new(solver_scope, self.phase_type_name());
        let phase_index = phase_scope.phase_index();
        let registry = phase_scope.solver_scope().registry();
        let weights = *phase_scope.solver_scope().weights();
        let mode = phase_scope.solver_scope().environment_mode();

        let mut current_cost = total_cost(registry, &schedule.timetable, &weights);
        phase_scope.record_score_calculation();
        let mut best_cost = current_cost;
        let mut best = schedule.timetable.clone();

        info!(
            event = "phase_start",
            phase = self.phase_type_name(),
            phase_index = phase_index,
            cost = current_cost,
        );

        let mut step: u32 = 0;
        let mut rejections: u32 = 0;
        let mut scratch = Vec::new();

        while best_cost > 0.0 {
            if phase_scope.solver_scope().is_terminate_early() || self.termination.is_terminated(&phase_scope) {
                break;
            }
            if rejections > self.reheat_after {
                step = 0;
            }
            let temperature = self.cooling.temperature(step);
            if temperature > self.cooling.min_temp() {
                step += 1;
            }

            let mut txn = Transaction::begin(&mut schedule.timetable);
            let mut swapped = false;
            for _ in 0..self.max_swap_attempts {
                let Some((first, second)) = random_position_pair(txn.grid(), phase_scope.rng()) else {
                    break;
                };
                if swap_positions(registry, &mut txn, &mut scratch, first, second, SwapMode::Feasible)? {
                    swapped = true;
                    break;
                }
            }
            if !swapped {
                txn.commit();
                debug!(event = "no_feasible_swap", attempts = self.max_swap_attempts);
                break;
            }

            let cost = total_cost(registry, txn.grid(), &weights);
            phase_scope.record_score_calculation();
            let delta = cost - current_cost;
            let accepted = delta <= 0.0 || phase_scope.rng().random::<f64>() <= (-delta / temperature).exp();

            if accepted {
                txn.commit();
                current_cost = cost;
                rejections = 0;
            } else {
                txn.rollback()?;
                rejections += 1;
            }
            phase_scope.record_move(accepted);
            let step_index = phase_scope.increment_step_count();
            trace!(
                event = "step",
                step = step_index,
                temperature = temperature,
                cost = cost,
                accepted = accepted,
            );

            if accepted {
                assert_step(schedule, mode)?;
                if cost <= best_cost {
                    if cost < best_cost {
                        debug!(event = "new_best", phase = self.phase_type_name(), step = step_index, cost = cost);
                    }
                    best_cost = cost;
                    best = schedule.timetable.clone();
                }
            }
        }

        schedule.timetable = best;
        assert_phase(schedule, mode)?;
        let stats = phase_scope.finish();
        info!(
            event = "phase_end",
            phase = self.phase_type_name(),
            phase_index = phase_index,
            duration_ms = stats.duration.as_millis() as u64,
            steps = stats.step_count,
            speed = stats.speed(),
            cost = best_cost,
        );
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Simulated Annealing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::StepCountTermination;
    use coursetable_config::EnvironmentMode;
    use coursetable_core::{EventFactory, Horizon, PenaltyWeights};
    use coursetable_test::{event_of, pos, RegistryFixture};

    fn phase(steps: u64) -> SimulatedAnnealingPhase {
        SimulatedAnnealingPhase::new(&SimulatedAnnealingConfig::default())
            .with_termination(OrTermination::default().with(StepCountTermination::new(steps)))
    }

    #[test]
    fn test_zero_cost_grid_is_returned_unchanged() {
        let registry = RegistryFixture::with_horizon(Horizon::new(1, 4).unwrap())
            .room("R1", 100)
            .course("ALG", 10, 2, &["alice"], &["BA1"])
            .build();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, Vec::new());
        schedule.timetable.assign(event_of(&registry, &factory, "ALG"), pos(0, 0)).unwrap();
        schedule.timetable.assign(event_of(&registry, &factory, "ALG"), pos(0, 1)).unwrap();
        let before = schedule.clone();
        let mut scope = SolverScope::with_seed(&registry, &factory, 5);
        assert_eq!(total_cost(&registry, &schedule.timetable, &PenaltyWeights::default()), 0.0);

        phase(1_000).solve(&mut schedule, &mut scope).unwrap();

        assert_eq!(schedule, before);
        assert_eq!(scope.stats().step_count, 0);
        assert_eq!(scope.stats().score_calculations, 1);
    }

    #[test]
    fn test_moves_events_out_of_late_hours() {
        let registry = RegistryFixture::with_horizon(Horizon::new(1, 8).unwrap())
            .room("R1", 100)
            .course("ALG", 10, 2, &["alice"], &["BA1"])
            .build();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, Vec::new());
        schedule.timetable.assign(event_of(&registry, &factory, "ALG"), pos(0, 6)).unwrap();
        schedule.timetable.assign(event_of(&registry, &factory, "ALG"), pos(0, 7)).unwrap();
        let mut scope =
            SolverScope::with_seed(&registry, &factory, 11).with_environment_mode(EnvironmentMode::FullAssert);
        let weights = *scope.weights();
        assert_eq!(total_cost(&registry, &schedule.timetable, &weights), 2.0);

        phase(2_000).solve(&mut schedule, &mut scope).unwrap();

        assert_eq!(total_cost(&registry, &schedule.timetable, &weights), 0.0);
        assert_eq!(schedule.timetable.occupied_count(), 2);
        schedule.timetable.check_invariants().unwrap();
    }

    #[test]
    fn test_best_cost_never_increases() {
        let registry = RegistryFixture::with_horizon(Horizon::new(2, 8).unwrap())
            .room("R1", 100)
            .room("R2", 100)
            .course("ALG", 10, 3, &["alice"], &["BA1"])
            .course("BIO", 10, 3, &["bob"], &["BA1"])
            .build();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, Vec::new());
        for (code, position) in [
            ("ALG", pos(0, 6)),
            ("ALG", pos(0, 7)),
            ("ALG", pos(0, 14)),
            ("BIO", pos(1, 0)),
            ("BIO", pos(1, 1)),
            ("BIO", pos(1, 2)),
        ] {
            schedule.timetable.assign(event_of(&registry, &factory, code), position).unwrap();
        }
        let mut scope = SolverScope::with_seed(&registry, &factory, 19);
        let weights = *scope.weights();
        let mut previous = total_cost(&registry, &schedule.timetable, &weights);

        for _ in 0..20 {
            phase(10).solve(&mut schedule, &mut scope).unwrap();
            let cost = total_cost(&registry, &schedule.timetable, &weights);
            assert!(cost <= previous, "{cost} > {previous}");
            previous = cost;
        }
        assert_eq!(schedule.timetable.occupied_count(), 6);
    }

    #[test]
    fn test_single_event_board_gives_up() {
        let registry = RegistryFixture::with_horizon(Horizon::new(1, 8).unwrap())
            .room("R1", 100)
            .course("ALG", 200, 1, &["alice"], &["BA1"])
            .build();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, Vec::new());
        // Too large for the room, so no swap can ever be feasible.
        let big = event_of(&registry, &factory, "ALG");
        schedule.timetable.assign(big, pos(0, 7)).unwrap();
        let before = schedule.clone();
        let mut scope = SolverScope::with_seed(&registry, &factory, 2);

        phase(u64::MAX).solve(&mut schedule, &mut scope).unwrap();

        assert_eq!(schedule, before);
    }
}
