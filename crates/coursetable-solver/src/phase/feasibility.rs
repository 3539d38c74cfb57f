//! Tabu search repair: drives the number of unplaced events to zero.

use coursetable_config::TabuSearchConfig;
use coursetable_core::{EventId, Position, Transaction};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, trace};

use super::{assert_phase, assert_step, Phase};
use crate::error::Result;
use crate::heuristic::neighborhood::{
    largest_hosting_capacity, place_unplaced, random_local_slot, random_position_pair, swap_occupied_for_unplaced,
    swap_positions,
};
use crate::heuristic::{SwapMode, TabuList};
use crate::schedule::Schedule;
use crate::scope::{PhaseScope, SolverScope};
use crate::termination::{self, OrTermination, Termination};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    PositionSwap,
    UnplacedSwap,
    Split,
}

impl Action {
    fn name(self) -> &'static str {
        match self {
            Action::PositionSwap => "position_swap",
            Action::UnplacedSwap => "unplaced_swap",
            Action::Split => "split",
        }
    }
}

#[derive(Debug)]
struct TabuMemory {
    positions: TabuList<(Position, Position)>,
    slots: TabuList<u32>,
    splits: TabuList<EventId>,
}

/// Repairs a schedule by moving, substituting and splitting events until
/// none is left unplaced or the termination fires.
///
/// Each step draws one of three moves with probability proportional to its
/// configured weight:
/// - position swap: swap two random positions without feasibility
///   guarantees, then refill in random order;
/// - unplaced swap: replace an event at a random slot by an unplaced one,
///   then refill in random order;
/// - split: cut the largest unplaced event that is not split-tabu (or the
///   largest one if all are) down to the biggest room that has a fitting
///   slot, then refill.
///
/// Swaps are rolled back when the number of unplaced events grows; splits
/// are always kept. On exit the schedule is the best one seen, together
/// with the events that were unplaced at that point.
#[derive(Debug)]
pub struct TabuSearchPhase {
    config: TabuSearchConfig,
    termination: OrTermination,
}

impl TabuSearchPhase {
    pub fn new(config: &TabuSearchConfig) -> Self {
        Self {
            config: config.clone(),
            termination: termination::from_config(&config.termination),
        }
    }

    /// Replaces the configured termination.
    pub fn with_termination(mut self, termination: OrTermination) -> Self {
        self.termination = termination;
        self
    }

    fn draw_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        let total = self.config.position_swap_weight + self.config.unplaced_swap_weight + self.config.split_weight;
        let draw = rng.random_range(0..total.max(1));
        if draw < self.config.position_swap_weight {
            Action::PositionSwap
        } else if draw < self.config.position_swap_weight + self.config.unplaced_swap_weight {
            Action::UnplacedSwap
        } else {
            Action::Split
        }
    }

    fn position_swap(
        &self,
        phase_scope: &mut PhaseScope<'_, '_>,
        schedule: &mut Schedule,
        tabu: &mut TabuMemory,
    ) -> Result<bool> {
        let registry = phase_scope.solver_scope().registry();
        let Some((first, second)) = random_position_pair(&schedule.timetable, phase_scope.rng()) else {
            return Ok(false);
        };
        if tabu.positions.contains(&(first, second)) {
            return Ok(false);
        }
        tabu.positions.push((first, second));
        tabu.positions.push((second, first));

        let before = schedule.distance();
        let backup = schedule.unplaced.clone();
        let mut txn = Transaction::begin(&mut schedule.timetable);
        if !swap_positions(registry, &mut txn, &mut schedule.unplaced, first, second, SwapMode::Relaxed)? {
            txn.commit();
            return Ok(false);
        }
        schedule.unplaced.shuffle(phase_scope.rng());
        place_unplaced(registry, &mut txn, &mut schedule.unplaced)?;

        if schedule.unplaced.len() > before {
            txn.rollback()?;
            schedule.unplaced = backup;
            return Ok(false);
        }
        txn.commit();
        Ok(true)
    }

    fn unplaced_swap(
        &self,
        phase_scope: &mut PhaseScope<'_, '_>,
        schedule: &mut Schedule,
        tabu: &mut TabuMemory,
    ) -> Result<bool> {
        let registry = phase_scope.solver_scope().registry();
        let slot = random_local_slot(phase_scope.rng(), schedule.timetable.horizon());
        if tabu.slots.contains(&slot) {
            return Ok(false);
        }
        tabu.slots.push(slot);

        let before = schedule.distance();
        let backup = schedule.unplaced.clone();
        let mut txn = Transaction::begin(&mut schedule.timetable);
        if !swap_occupied_for_unplaced(registry, &mut txn, &mut schedule.unplaced, slot)? {
            txn.commit();
            return Ok(false);
        }
        schedule.unplaced.shuffle(phase_scope.rng());
        place_unplaced(registry, &mut txn, &mut schedule.unplaced)?;

        if schedule.unplaced.len() > before {
            txn.rollback()?;
            schedule.unplaced = backup;
            return Ok(false);
        }
        txn.commit();
        Ok(true)
    }

    fn split(&self, phase_scope: &mut PhaseScope<'_, '_>, schedule: &mut Schedule, tabu: &mut TabuMemory) -> Result<bool> {
        let registry = phase_scope.solver_scope().registry();
        let factory = phase_scope.solver_scope().factory();

        schedule
            .unplaced
            .sort_by(|a, b| b.student_amount().cmp(&a.student_amount()));
        if schedule.unplaced.is_empty() {
            return Ok(false);
        }
        // Falls back to the largest event when every candidate is tabu.
        let index = schedule
            .unplaced
            .iter()
            .position(|event| !tabu.splits.contains(&event.id()))
            .unwrap_or(0);
        let event = schedule.unplaced.remove(index);

        let capacity = largest_hosting_capacity(registry, &schedule.timetable, &event);
        if capacity == 0 {
            trace!(event = "split_skipped", course_event = %event.id(), reason = "no_fitting_slot");
            tabu.splits.push(event.id());
            schedule.unplaced.push(event);
            return Ok(false);
        }

        match factory.split(&event, capacity) {
            Some((first, second)) => {
                debug!(
                    event = "split",
                    course_event = %event.id(),
                    students = event.student_amount(),
                    first = first.student_amount(),
                    second = second.student_amount(),
                );
                schedule.timetable.add_course_hours(event.course(), 1);
                tabu.splits.push(first.id());
                tabu.splits.push(second.id());
                schedule.unplaced.insert(0, second);
                schedule.unplaced.insert(0, first);
            }
            // A room large enough exists; the event only needs a refill.
            None => schedule.unplaced.insert(0, event),
        }

        let mut txn = Transaction::begin(&mut schedule.timetable);
        place_unplaced(registry, &mut txn, &mut schedule.unplaced)?;
        txn.commit();
        Ok(true)
    }
}

impl Phase for TabuSearchPhase {
    fn solve(&mut self, schedule: &mut Schedule, solver_scope: &mut SolverScope<'_>) -> Result<()> {
        let mut phase_scope = PhaseScope::new(solver_scope, self.phase_type_name());
        let phase_index = phase_scope.phase_index();
        let mode = phase_scope.solver_scope().environment_mode();

        info!(
            event = "phase_start",
            phase = self.phase_type_name(),
            phase_index = phase_index,
            unplaced = schedule.distance(),
        );

        let mut tabu = TabuMemory {
            positions: TabuList::new(self.config.position_tabu_size),
            slots: TabuList::new(self.config.unplaced_swap_tabu_size),
            splits: TabuList::new(self.config.split_tabu_size),
        };
        let mut best_distance = schedule.distance();
        let mut best = schedule.clone();

        while !schedule.is_feasible() {
            if phase_scope.solver_scope().is_terminate_early() || self.termination.is_terminated(&phase_scope) {
                break;
            }

            let action = self.draw_action(phase_scope.rng());
            let accepted = match action {
                Action::PositionSwap => self.position_swap(&mut phase_scope, schedule, &mut tabu)?,
                Action::UnplacedSwap => self.unplaced_swap(&mut phase_scope, schedule, &mut tabu)?,
                Action::Split => self.split(&mut phase_scope, schedule, &mut tabu)?,
            };
            phase_scope.record_move(accepted);
            let step = phase_scope.increment_step_count();
            trace!(
                event = "step",
                step = step,
                action = action.name(),
                unplaced = schedule.distance(),
                accepted = accepted,
            );

            if accepted {
                assert_step(schedule, mode)?;
                let distance = schedule.distance();
                let improved = distance < best_distance || (action == Action::Split && distance == best_distance);
                if improved {
                    if distance < best_distance {
                        debug!(event = "new_best", phase = self.phase_type_name(), step = step, unplaced = distance);
                    }
                    best_distance = distance;
                    best = schedule.clone();
                }
            }
        }

        *schedule = best;
        assert_phase(schedule, mode)?;
        let stats = phase_scope.finish();
        info!(
            event = "phase_end",
            phase = self.phase_type_name(),
            phase_index = phase_index,
            duration_ms = stats.duration.as_millis() as u64,
            steps = stats.step_count,
            speed = stats.speed(),
            unplaced = schedule.distance(),
        );
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Tabu Search"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::ConstructionPhase;
    use crate::termination::StepCountTermination;
    use coursetable_config::EnvironmentMode;
    use coursetable_core::{EventFactory, Registry};
    use coursetable_test::{campus, events_for, RegistryFixture};

    fn phase(steps: u64) -> TabuSearchPhase {
        TabuSearchPhase::new(&TabuSearchConfig::default())
            .with_termination(OrTermination::default().with(StepCountTermination::new(steps)))
    }

    fn split_only(steps: u64) -> TabuSearchPhase {
        let config = TabuSearchConfig {
            position_swap_weight: 0,
            unplaced_swap_weight: 0,
            split_weight: 1,
            ..TabuSearchConfig::default()
        };
        TabuSearchPhase::new(&config).with_termination(OrTermination::default().with(StepCountTermination::new(steps)))
    }

    #[test]
    fn test_feasible_schedule_is_left_alone() {
        let registry = campus::two_rooms_three_courses();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        let mut scope = SolverScope::with_seed(&registry, &factory, 3);
        ConstructionPhase::default().solve(&mut schedule, &mut scope).unwrap();
        let constructed = schedule.clone();

        phase(1_000).solve(&mut schedule, &mut scope).unwrap();

        assert_eq!(schedule, constructed);
        assert_eq!(scope.stats().phase_count, 2);
    }

    #[test]
    fn test_split_conserves_students_and_adds_an_hour() {
        let registry = campus::oversized_course();
        let factory = EventFactory::new();
        let big = registry.course_by_code("BIG").unwrap();
        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        let hours_before = schedule.timetable.remaining_hours(big);
        let mut scope = SolverScope::with_seed(&registry, &factory, 3);

        split_only(1).solve(&mut schedule, &mut scope).unwrap();

        // 60 students: 40 seated in the largest room, the other 20 too.
        assert!(schedule.is_feasible());
        let placed: Vec<u32> = schedule
            .timetable
            .placed_events()
            .map(|(_, event)| event.student_amount())
            .collect();
        assert_eq!(placed.len(), 2);
        assert_eq!(placed.iter().sum::<u32>(), 60);
        assert!(placed.contains(&40));
        // One extra event was created and both halves are placed.
        assert_eq!(schedule.timetable.remaining_hours(big), hours_before + 1 - 2);
        schedule.timetable.check_invariants().unwrap();
    }

    #[test]
    fn test_tabu_half_is_split_again() {
        let registry = RegistryFixture::new()
            .room("R1", 100)
            .course("BIG", 300, 1, &["alice"], &["BA1"])
            .build();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        let mut scope = SolverScope::with_seed(&registry, &factory, 4);

        split_only(200).solve(&mut schedule, &mut scope).unwrap();

        // 300 -> 100 + 200, then the tabu 200 half -> 100 + 100.
        assert!(schedule.is_feasible(), "unplaced: {:?}", schedule.unplaced);
        let placed: Vec<u32> = schedule
            .timetable
            .placed_events()
            .map(|(_, event)| event.student_amount())
            .collect();
        assert_eq!(placed, vec![100, 100, 100]);
        schedule.timetable.check_invariants().unwrap();
    }

    #[test]
    fn test_best_distance_never_increases() {
        let registry = crowded();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        let mut scope = SolverScope::with_seed(&registry, &factory, 13);
        let mut previous = schedule.distance();

        for _ in 0..20 {
            phase(15).solve(&mut schedule, &mut scope).unwrap();
            assert!(schedule.distance() <= previous);
            previous = schedule.distance();
        }
    }

    #[test]
    fn test_unsplittable_event_stays_unplaced() {
        let registry = campus::single_slot_lecturer_conflict();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        let mut scope = SolverScope::with_seed(&registry, &factory, 9);
        ConstructionPhase::default().solve(&mut schedule, &mut scope).unwrap();
        assert_eq!(schedule.distance(), 1);

        phase(500).solve(&mut schedule, &mut scope).unwrap();

        assert_eq!(schedule.distance(), 1);
        assert_eq!(schedule.timetable.occupied_count(), 1);
        schedule.timetable.check_invariants().unwrap();
    }

    fn crowded() -> Registry {
        RegistryFixture::with_horizon(coursetable_core::Horizon::new(1, 4).unwrap())
            .room("R1", 50)
            .room("R2", 100)
            .course("ALG", 40, 2, &["alice"], &["BA1"])
            .course("BIO", 80, 2, &["bob"], &["BA1"])
            .course("CHE", 90, 2, &["carol", "alice"], &["BA2"])
            .course("DIS", 30, 2, &["dave"], &["BA2"])
            .build()
    }

    #[test]
    fn test_never_worse_than_construction() {
        let registry = crowded();
        let factory = EventFactory::new();
        for seed in 0..8 {
            let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
            let mut scope = SolverScope::with_seed(&registry, &factory, seed)
                .with_environment_mode(EnvironmentMode::FullAssert);
            ConstructionPhase::default().solve(&mut schedule, &mut scope).unwrap();
            let constructed = schedule.distance();

            phase(300).solve(&mut schedule, &mut scope).unwrap();

            assert!(schedule.distance() <= constructed);
            schedule.timetable.check_invariants().unwrap();

            // Splits redistribute students but never lose any.
            for course in registry.courses() {
                let students: u32 = schedule
                    .timetable
                    .placed_events()
                    .map(|(_, event)| event)
                    .chain(schedule.unplaced.iter())
                    .filter(|event| event.course() == course.id)
                    .map(|event| event.student_amount())
                    .sum();
                assert_eq!(students, course.student_amount * course.course_hours);
            }
        }
    }
}
