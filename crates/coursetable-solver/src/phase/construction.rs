//! Greedy construction of an initial grid.

use coursetable_config::{ConstructionConfig, RoomRanking};
use coursetable_core::{CourseEvent, Position, Registry, TimeTable};
use coursetable_scoring::soft::not_home_penalty;
use coursetable_scoring::{fits, fits_position};
use tracing::{info, trace};

use super::{assert_phase, Phase};
use crate::error::Result;
use crate::schedule::Schedule;
use crate::scope::{PhaseScope, SolverScope};

/// Places the unplaced events of a schedule one by one, hardest first,
/// each at its best free position. Events without a feasible position
/// stay unplaced. There is no backtracking.
///
/// Events are ranked by
/// 1. slot scarcity: the inverse of `available slots / sqrt(remaining hours)`,
///    with courses that have no available slot ranked last;
/// 2. conflict degree: the number of other courses sharing a lecturer or
///    a curriculum.
///
/// Candidate positions are ranked by the number of curricula away from
/// their home site, then by the number of seats left empty.
#[derive(Debug, Clone, Default)]
pub struct ConstructionPhase {
    room_ranking: RoomRanking,
}

impl ConstructionPhase {
    pub fn new(config: &ConstructionConfig) -> Self {
        Self {
            room_ranking: config.room_ranking,
        }
    }

    pub fn with_room_ranking(mut self, room_ranking: RoomRanking) -> Self {
        self.room_ranking = room_ranking;
        self
    }

    fn best_position(&self, registry: &Registry, grid: &TimeTable, event: &CourseEvent) -> Option<Position> {
        let mut candidates = grid
            .empty_positions()
            .filter(|&position| fits_position(registry, grid, event, position));
        match self.room_ranking {
            RoomRanking::FirstFit => candidates.next(),
            RoomRanking::HomeThenTightest => candidates.min_by_key(|position| {
                let room = registry.room(position.room);
                (
                    not_home_penalty(registry, event, position.room),
                    room.capacity - event.student_amount(),
                )
            }),
        }
    }
}

/// Ranking key of every course present in `events`, indexed by course.
fn course_keys(registry: &Registry, grid: &TimeTable, events: &[CourseEvent]) -> Vec<Option<(f64, usize)>> {
    let mut keys = vec![None; registry.course_count()];
    for event in events {
        let slot = &mut keys[event.course().index()];
        if slot.is_some() {
            continue;
        }
        let available = (0..grid.horizon().slots_per_week())
            .filter(|&local| fits(grid, event, grid.absolute_slot(local)))
            .count();
        let hours = grid.remaining_hours(event.course()).max(1) as f64;
        let scarcity = available as f64 / hours.sqrt();
        let inverse = if scarcity == 0.0 { 0.0 } else { 1.0 / scarcity };

        let course = registry.course(event.course());
        let degree = registry
            .courses()
            .iter()
            .filter(|other| other.id != course.id && course.conflicts_with(other))
            .count();
        *slot = Some((inverse, degree));
    }
    keys
}

/// Orders `events` hardest first. The sort is stable.
pub fn rank_events(registry: &Registry, grid: &TimeTable, events: &mut [CourseEvent]) {
    let keys = course_keys(registry, grid, events);
    let key = |event: &CourseEvent| keys[event.course().index()].unwrap_or((0.0, 0));
    events.sort_by(|a, b| {
        let (a_scarcity, a_degree) = key(a);
        let (b_scarcity, b_degree) = key(b);
        b_scarcity.total_cmp(&a_scarcity).then(b_degree.cmp(&a_degree))
    });
}

impl Phase for ConstructionPhase {
    fn solve(&mut self, schedule: &mut Schedule, solver_scope: &mut SolverScope<'_>) -> Result<()> {
        let mut phase_scope = PhaseScope::new(solver_scope, self.phase_type_name());
        let phase_index = phase_scope.phase_index();
        let registry = phase_scope.solver_scope().registry();

        info!(
            event = "phase_start",
            phase = self.phase_type_name(),
            phase_index = phase_index,
            events = schedule.unplaced.len(),
        );

        let mut events = std::mem::take(&mut schedule.unplaced);
        rank_events(registry, &schedule.timetable, &mut events);

        let mut remaining = events.into_iter();
        for event in remaining.by_ref() {
            match self.best_position(registry, &schedule.timetable, &event) {
                Some(position) => {
                    trace!(event = "step", course_event = %event.id(), position = %position, accepted = true);
                    schedule.timetable.assign(event, position)?;
                    phase_scope.record_move(true);
                    phase_scope.increment_step_count();
                }
                None => {
                    trace!(event = "step", course_event = %event.id(), accepted = false);
                    phase_scope.record_move(false);
                    schedule.unplaced.push(event);
                }
            }
            if phase_scope.solver_scope().is_terminate_early() {
                break;
            }
        }
        schedule.unplaced.extend(remaining);

        assert_phase(schedule, phase_scope.solver_scope().environment_mode())?;
        let stats = phase_scope.finish();
        info!(
            event = "phase_end",
            phase = self.phase_type_name(),
            phase_index = phase_index,
            duration_ms = stats.duration.as_millis() as u64,
            steps = stats.step_count,
            speed = stats.speed(),
            unplaced = schedule.unplaced.len(),
        );
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Construction Heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::seed_remaining_hours;
    use coursetable_core::{EventFactory, Horizon};
    use coursetable_test::{campus, event_of, events_for, pos, RegistryFixture};

    #[test]
    fn test_places_three_events_of_one_course() {
        let registry = RegistryFixture::new()
            .room("R1", 100)
            .room("R2", 100)
            .course("ALG", 40, 3, &["alice"], &["BA1"])
            .build();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        let mut scope = SolverScope::with_seed(&registry, &factory, 1);

        ConstructionPhase::default().solve(&mut schedule, &mut scope).unwrap();

        assert!(schedule.is_feasible());
        assert_eq!(schedule.timetable.occupied_count(), 3);
        schedule.timetable.check_invariants().unwrap();
        assert_eq!(scope.stats().step_count, 3);
    }

    #[test]
    fn test_lecturer_conflict_leaves_one_unplaced() {
        let registry = campus::single_slot_lecturer_conflict();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        let mut scope = SolverScope::with_seed(&registry, &factory, 1);

        ConstructionPhase::default().solve(&mut schedule, &mut scope).unwrap();

        assert_eq!(schedule.timetable.occupied_count(), 1);
        assert_eq!(schedule.distance(), 1);
    }

    #[test]
    fn test_prefers_home_site_then_tightest_room() {
        let registry = RegistryFixture::new()
            .site("AWAY", 51.0, 3.7)
            .room("A1", 50)
            .site("HOME", 51.1, 3.8)
            .room("H1", 200)
            .room("H2", 60)
            .curriculum("BA1", Some("HOME"))
            .course("ALG", 45, 1, &["alice"], &["BA1"])
            .build();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        let mut scope = SolverScope::with_seed(&registry, &factory, 1);

        ConstructionPhase::default().solve(&mut schedule, &mut scope).unwrap();

        let (position, _) = schedule.timetable.placed_events().next().unwrap();
        assert_eq!(position.room, registry.room_by_code("H2").unwrap());
        assert_eq!(position.slot, 0);

        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        ConstructionPhase::default()
            .with_room_ranking(RoomRanking::FirstFit)
            .solve(&mut schedule, &mut scope)
            .unwrap();
        let (position, _) = schedule.timetable.placed_events().next().unwrap();
        assert_eq!(position.room, registry.room_by_code("A1").unwrap());
    }

    #[test]
    fn test_rank_counts_only_top_level_events() {
        // ALG: 23 hours but a single weekly event, 20 free slots.
        // BIO: one weekly event, 15 free slots once CHE takes five of bob's.
        let registry = RegistryFixture::with_horizon(Horizon::new(1, 20).unwrap())
            .room("R1", 100)
            .course("ALG", 30, 23, &["alice"], &["BA1"])
            .course("BIO", 30, 12, &["bob"], &["BA2"])
            .course("CHE", 30, 5, &["bob"], &["BA3"])
            .build();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        seed_remaining_hours(&registry, &mut grid);
        for slot in 0..5 {
            grid.assign(event_of(&registry, &factory, "CHE"), pos(0, slot)).unwrap();
        }
        let mut events = vec![event_of(&registry, &factory, "ALG"), event_of(&registry, &factory, "BIO")];

        rank_events(&registry, &grid, &mut events);

        assert_eq!(events[0].course(), registry.course_by_code("BIO").unwrap());
    }

    #[test]
    fn test_rank_puts_conflicting_courses_first() {
        let registry = campus::small_faculty();
        let factory = EventFactory::new();
        let grid = TimeTable::new(&registry);
        let mut events = events_for(&registry, &factory);

        rank_events(&registry, &grid, &mut events);

        // On an empty grid every slot is available, so the course with the
        // most hours leads; ties fall back to the conflict degree.
        let first = registry.course(events[0].course());
        assert!(first.code == "CALC" || first.code == "PROG");
        let calc = registry.course_by_code("CALC").unwrap();
        let prog = registry.course_by_code("PROG").unwrap();
        let calc_at = events.iter().position(|e| e.course() == calc).unwrap();
        let prog_at = events.iter().position(|e| e.course() == prog).unwrap();
        assert!(calc_at < prog_at, "CALC shares more lecturers and curricula than PROG");
        assert!(events[events.len() - 1].course() != calc);
    }

    #[test]
    fn test_oversized_course_stays_unplaced() {
        let registry = campus::oversized_course();
        let factory = EventFactory::new();
        let mut schedule = Schedule::empty(&registry, events_for(&registry, &factory));
        let mut scope = SolverScope::with_seed(&registry, &factory, 1);

        ConstructionPhase::default().solve(&mut schedule, &mut scope).unwrap();

        assert_eq!(schedule.distance(), 1);
        assert_eq!(schedule.timetable.occupied_count(), 0);
    }
}
