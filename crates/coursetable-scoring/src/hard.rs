//! Hard constraints: may an event be placed at a time slot / in a room?
//!
//! Every check reads the occupancy of one grid. Slots are absolute, so a
//! grid at week offset `w` must be asked about `grid.absolute_slot(local)`.

use coursetable_core::{CourseEvent, Position, Registry, RoomId, TimeTable};

/// True when no candidate lecturer of `event` is free at `absolute_slot`.
///
/// An event without candidate lecturers can never be taught, so it counts
/// as occupied.
pub fn lecturers_occupied(grid: &TimeTable, event: &CourseEvent, absolute_slot: u32) -> bool {
    event
        .lecturers()
        .iter()
        .all(|&l| grid.lecturer_busy(l, absolute_slot))
}

/// True when any curriculum of `event` already has an event at `absolute_slot`.
pub fn curricula_occupied(grid: &TimeTable, event: &CourseEvent, absolute_slot: u32) -> bool {
    event
        .curricula()
        .iter()
        .any(|&c| grid.curriculum_busy(c, absolute_slot))
}

/// Time feasibility: some lecturer is free and no curriculum is busy.
#[inline]
pub fn fits(grid: &TimeTable, event: &CourseEvent, absolute_slot: u32) -> bool {
    !lecturers_occupied(grid, event, absolute_slot) && !curricula_occupied(grid, event, absolute_slot)
}

/// Room feasibility: the room seats every student of the event.
#[inline]
pub fn room_capacity(registry: &Registry, event: &CourseEvent, room: RoomId) -> bool {
    event.student_amount() <= registry.room(room).capacity
}

/// Both time and room feasibility at a local position of `grid`.
pub fn fits_position(registry: &Registry, grid: &TimeTable, event: &CourseEvent, position: Position) -> bool {
    room_capacity(registry, event, position.room) && fits(grid, event, grid.absolute_slot(position.slot))
}

/// Time feasibility of `event` for every local slot of `grid`'s week.
pub fn fitting_slots(grid: &TimeTable, event: &CourseEvent) -> Vec<bool> {
    (0..grid.horizon().slots_per_week())
        .map(|slot| fits(grid, event, grid.absolute_slot(slot)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursetable_core::EventFactory;
    use coursetable_test::{event_of, pos, RegistryFixture};

    fn registry() -> Registry {
        RegistryFixture::new()
            .room("SMALL", 20)
            .room("LARGE", 200)
            .course("ALG", 30, 2, &["alice"], &["BA1"])
            .course("BIO", 30, 2, &["alice", "bob"], &["BA2"])
            .course("CHE", 30, 2, &["carol"], &["BA1"])
            .course("DIS", 30, 2, &[], &["BA3"])
            .build()
    }

    #[test]
    fn test_empty_grid_fits_everywhere() {
        let registry = registry();
        let factory = EventFactory::new();
        let grid = TimeTable::new(&registry);
        let alg = event_of(&registry, &factory, "ALG");

        assert!(fitting_slots(&grid, &alg).iter().all(|&f| f));
    }

    #[test]
    fn test_any_free_lecturer_is_enough() {
        let registry = registry();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        grid.assign(event_of(&registry, &factory, "ALG"), pos(1, 4)).unwrap();

        let bio = event_of(&registry, &factory, "BIO");
        assert!(!lecturers_occupied(&grid, &bio, 4));
        assert!(fits(&grid, &bio, 4));

        grid.assign(bio, pos(0, 4)).unwrap();
        let second_bio = event_of(&registry, &factory, "BIO");
        assert!(lecturers_occupied(&grid, &second_bio, 4));
        assert!(!fits(&grid, &second_bio, 4));
    }

    #[test]
    fn test_shared_curriculum_blocks_slot() {
        let registry = registry();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        grid.assign(event_of(&registry, &factory, "ALG"), pos(1, 9)).unwrap();

        let che = event_of(&registry, &factory, "CHE");
        assert!(curricula_occupied(&grid, &che, 9));
        assert!(!fits(&grid, &che, 9));
        assert!(fits(&grid, &che, 10));
    }

    #[test]
    fn test_event_without_lecturers_never_fits() {
        let registry = registry();
        let factory = EventFactory::new();
        let grid = TimeTable::new(&registry);
        let dis = event_of(&registry, &factory, "DIS");

        assert!(lecturers_occupied(&grid, &dis, 0));
        assert!(!fits(&grid, &dis, 0));
    }

    #[test]
    fn test_room_capacity_boundaries() {
        let registry = registry();
        let factory = EventFactory::new();
        let grid = TimeTable::new(&registry);
        let alg = event_of(&registry, &factory, "ALG");

        assert!(!room_capacity(&registry, &alg, pos(0, 0).room));
        assert!(room_capacity(&registry, &alg, pos(1, 0).room));
        assert!(!fits_position(&registry, &grid, &alg, pos(0, 0)));
        assert!(fits_position(&registry, &grid, &alg, pos(1, 0)));
    }

    #[test]
    fn test_checks_use_absolute_slots() {
        let registry = registry();
        let factory = EventFactory::new();
        let mut week_one = TimeTable::new(&registry);
        week_one.assign(event_of(&registry, &factory, "ALG"), pos(1, 3)).unwrap();
        let week_two = week_one.rebased(1);

        let che = event_of(&registry, &factory, "CHE");
        assert!(fits(&week_two, &che, 3));
        assert!(fits(&week_two, &che, week_two.absolute_slot(4)));
        assert!(!fits(&week_two, &che, week_two.absolute_slot(3)));
    }
}
