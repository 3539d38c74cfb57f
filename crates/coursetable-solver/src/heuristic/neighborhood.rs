//! Neighborhood operators on a grid and its unplaced events.
//!
//! Operators mutate the grid through a [`Transaction`], so the caller can
//! roll a whole step back. Every operator that gives up after mutating
//! restores the grid to its state at entry before returning `false`.

use coursetable_core::{CourseEvent, Horizon, Position, Registry, Result, RoomId, TimeTable, Transaction};
use coursetable_scoring::{fits, fits_position, room_capacity};
use rand::Rng;

/// Whether a swap must keep every moved event feasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapMode {
    /// Both events must fit their new position or nothing changes.
    Feasible,
    /// Both positions are emptied; an event that does not fit the other
    /// position joins the unplaced events.
    Relaxed,
}

/// Uniformly drawn local slot of the week.
pub fn random_local_slot<R: Rng + ?Sized>(rng: &mut R, horizon: Horizon) -> u32 {
    rng.random_range(0..horizon.slots_per_week())
}

fn dense_index(grid: &TimeTable, position: Position) -> usize {
    position.room.index() * grid.horizon().slots_per_week() as usize + position.slot as usize
}

/// Two distinct positions: the first occupied (any position on an empty
/// grid), the second anywhere else. `None` on grids with fewer than two
/// positions.
pub fn random_position_pair<R: Rng + ?Sized>(grid: &TimeTable, rng: &mut R) -> Option<(Position, Position)> {
    let count = grid.position_count();
    if count < 2 {
        return None;
    }
    let first = match grid.occupied_count() {
        0 => grid.position_at(rng.random_range(0..count)),
        occupied => grid.nth_occupied(rng.random_range(0..occupied))?,
    };
    let first_index = dense_index(grid, first);
    let mut second_index = rng.random_range(0..count - 1);
    if second_index >= first_index {
        second_index += 1;
    }
    Some((first, grid.position_at(second_index)))
}

/// Exchanges the occupants of `first` and `second`.
///
/// Returns `false` without touching the grid when both positions are empty,
/// when they are the same position, or, in [`SwapMode::Feasible`], when
/// either event would not fit its new position. In [`SwapMode::Relaxed`]
/// the swap always happens and events that do not fit are pushed onto
/// `unplaced`.
pub fn swap_positions(
    registry: &Registry,
    txn: &mut Transaction<'_>,
    unplaced: &mut Vec<CourseEvent>,
    first: Position,
    second: Position,
    mode: SwapMode,
) -> Result<bool> {
    if first == second {
        return Ok(false);
    }
    let (first_event, second_event) = (txn.grid().get(first), txn.grid().get(second));
    if first_event.is_none() && second_event.is_none() {
        return Ok(false);
    }
    if mode == SwapMode::Feasible {
        let first_fits_room = first_event.map_or(true, |e| room_capacity(registry, e, second.room));
        let second_fits_room = second_event.map_or(true, |e| room_capacity(registry, e, first.room));
        if !(first_fits_room && second_fits_room) {
            return Ok(false);
        }
    }

    let savepoint = txn.savepoint();
    let moving = [(txn.remove(first)?, second), (txn.remove(second)?, first)];

    for (event, target) in moving {
        let Some(event) = event else {
            continue;
        };
        if fits_position(registry, txn.grid(), &event, target) {
            txn.assign(event, target)?;
        } else {
            match mode {
                SwapMode::Feasible => {
                    txn.rollback_to(savepoint)?;
                    return Ok(false);
                }
                SwapMode::Relaxed => unplaced.push(event),
            }
        }
    }
    Ok(true)
}

/// Replaces an occupant of `local_slot` by an unplaced event.
///
/// Rooms are scanned in order. For each occupied one the incumbent is taken
/// out and the first unplaced event that fits its position replaces it; the
/// incumbent joins the unplaced events. Returns `false`, with the grid
/// unchanged, when no occupant at this slot can be substituted.
pub fn swap_occupied_for_unplaced(
    registry: &Registry,
    txn: &mut Transaction<'_>,
    unplaced: &mut Vec<CourseEvent>,
    local_slot: u32,
) -> Result<bool> {
    for room in 0..txn.grid().room_count() {
        let position = Position::new(RoomId::new(room), local_slot);
        if !txn.grid().is_occupied(position) {
            continue;
        }
        let savepoint = txn.savepoint();
        let Some(incumbent) = txn.remove(position)? else {
            continue;
        };
        let replacement = unplaced
            .iter()
            .position(|event| fits_position(registry, txn.grid(), event, position));
        match replacement {
            Some(index) => {
                let event = unplaced.remove(index);
                txn.assign(event, position)?;
                unplaced.push(incumbent);
                return Ok(true);
            }
            None => txn.rollback_to(savepoint)?,
        }
    }
    Ok(false)
}

/// First empty position, in (room, slot) order, where `event` fits.
pub fn first_fitting_empty_position(registry: &Registry, grid: &TimeTable, event: &CourseEvent) -> Option<Position> {
    grid.empty_positions()
        .find(|&position| fits_position(registry, grid, event, position))
}

/// Places every unplaced event that fits some empty position, in list
/// order, and returns how many were placed.
pub fn place_unplaced(registry: &Registry, txn: &mut Transaction<'_>, unplaced: &mut Vec<CourseEvent>) -> Result<usize> {
    let mut placed = 0;
    let mut remaining = Vec::with_capacity(unplaced.len());
    for event in unplaced.drain(..) {
        match first_fitting_empty_position(registry, txn.grid(), &event) {
            Some(position) => {
                txn.assign(event, position)?;
                placed += 1;
            }
            None => remaining.push(event),
        }
    }
    *unplaced = remaining;
    Ok(placed)
}

/// Largest capacity among rooms with an empty position whose slot fits
/// `event`, ignoring the event's size. Zero when no slot fits.
pub fn largest_hosting_capacity(registry: &Registry, grid: &TimeTable, event: &CourseEvent) -> u32 {
    grid.empty_positions()
        .filter(|position| fits(grid, event, grid.absolute_slot(position.slot)))
        .map(|position| registry.room(position.room).capacity)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursetable_core::EventFactory;
    use coursetable_test::{campus, event_of, pos, RegistryFixture};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_pair_is_distinct_and_starts_occupied() {
        let registry = campus::two_rooms_three_courses();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        grid.assign(event_of(&registry, &factory, "ALG"), pos(1, 17)).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let (first, second) = random_position_pair(&grid, &mut rng).unwrap();
            assert_eq!(first, pos(1, 17));
            assert_ne!(first, second);
            assert!(second.slot < 40 && second.room.index() < 2);
        }
    }

    #[test]
    fn test_random_pair_needs_two_positions() {
        let horizon = Horizon::new(1, 1).unwrap();
        let registry = RegistryFixture::with_horizon(horizon).room("R1", 10).build();
        let grid = TimeTable::new(&registry);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(random_position_pair(&grid, &mut rng).is_none());
    }

    #[test]
    fn test_feasible_swap_and_back_restores_grid() {
        let registry = campus::two_rooms_three_courses();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        grid.assign(event_of(&registry, &factory, "ALG"), pos(1, 0)).unwrap();
        grid.assign(event_of(&registry, &factory, "CHE"), pos(0, 5)).unwrap();
        let original = grid.clone();
        let mut unplaced = Vec::new();

        let mut txn = Transaction::begin(&mut grid);
        assert!(swap_positions(&registry, &mut txn, &mut unplaced, pos(1, 0), pos(0, 5), SwapMode::Feasible).unwrap());
        txn.commit();
        assert_eq!(grid.get(pos(0, 5)).unwrap().course(), registry.course_by_code("ALG").unwrap());
        assert_ne!(grid, original);

        let mut txn = Transaction::begin(&mut grid);
        assert!(swap_positions(&registry, &mut txn, &mut unplaced, pos(1, 0), pos(0, 5), SwapMode::Feasible).unwrap());
        txn.commit();
        assert_eq!(grid, original);
        assert!(unplaced.is_empty());
        grid.check_invariants().unwrap();
    }

    #[test]
    fn test_feasible_swap_rejects_small_room() {
        let registry = campus::two_rooms_three_courses();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        grid.assign(event_of(&registry, &factory, "BIO"), pos(1, 3)).unwrap();
        let original = grid.clone();
        let mut unplaced = Vec::new();

        let mut txn = Transaction::begin(&mut grid);
        assert!(!swap_positions(&registry, &mut txn, &mut unplaced, pos(1, 3), pos(0, 3), SwapMode::Feasible).unwrap());
        assert!(txn.is_empty());
        txn.commit();
        assert_eq!(grid, original);
    }

    #[test]
    fn test_feasible_swap_rejects_busy_lecturer_and_rolls_back() {
        let registry = RegistryFixture::new()
            .room("R1", 100)
            .room("R2", 100)
            .course("ALG", 20, 2, &["alice"], &["BA1"])
            .course("GEO", 20, 1, &["alice"], &["BA2"])
            .build();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        grid.assign(event_of(&registry, &factory, "ALG"), pos(0, 0)).unwrap();
        grid.assign(event_of(&registry, &factory, "GEO"), pos(0, 1)).unwrap();
        grid.assign(event_of(&registry, &factory, "ALG"), pos(1, 2)).unwrap();
        let original = grid.clone();
        let mut unplaced = Vec::new();

        let mut txn = Transaction::begin(&mut grid);
        let swapped =
            swap_positions(&registry, &mut txn, &mut unplaced, pos(0, 1), pos(1, 3), SwapMode::Feasible).unwrap();
        assert!(swapped);
        txn.rollback().unwrap();
        assert_eq!(grid, original);

        // GEO moving onto slot 0 collides with alice teaching ALG there.
        let mut txn = Transaction::begin(&mut grid);
        let swapped =
            swap_positions(&registry, &mut txn, &mut unplaced, pos(0, 1), pos(1, 0), SwapMode::Feasible).unwrap();
        assert!(!swapped);
        txn.commit();
        assert_eq!(grid, original);
        assert!(unplaced.is_empty());
    }

    #[test]
    fn test_relaxed_swap_pushes_misfits_to_unplaced() {
        let registry = campus::two_rooms_three_courses();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        grid.assign(event_of(&registry, &factory, "BIO"), pos(1, 3)).unwrap();
        grid.assign(event_of(&registry, &factory, "CHE"), pos(0, 8)).unwrap();
        let mut unplaced = Vec::new();

        let mut txn = Transaction::begin(&mut grid);
        assert!(swap_positions(&registry, &mut txn, &mut unplaced, pos(1, 3), pos(0, 8), SwapMode::Relaxed).unwrap());
        txn.commit();

        assert_eq!(unplaced.len(), 1);
        assert_eq!(unplaced[0].course(), registry.course_by_code("BIO").unwrap());
        assert!(unplaced[0].assigned_lecturer().is_none());
        assert_eq!(grid.get(pos(1, 3)).unwrap().course(), registry.course_by_code("CHE").unwrap());
        assert!(!grid.is_occupied(pos(0, 8)));
        grid.check_invariants().unwrap();
    }

    #[test]
    fn test_same_position_or_both_empty_is_a_no_op() {
        let registry = campus::two_rooms_three_courses();
        let mut grid = TimeTable::new(&registry);
        let mut unplaced = Vec::new();
        let mut txn = Transaction::begin(&mut grid);
        assert!(!swap_positions(&registry, &mut txn, &mut unplaced, pos(0, 1), pos(1, 1), SwapMode::Relaxed).unwrap());
        assert!(!swap_positions(&registry, &mut txn, &mut unplaced, pos(0, 1), pos(0, 1), SwapMode::Feasible).unwrap());
        assert!(txn.is_empty());
        txn.commit();
    }

    #[test]
    fn test_unplaced_substitution() {
        let registry = campus::single_slot_lecturer_conflict();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        grid.assign(event_of(&registry, &factory, "ALG"), pos(0, 0)).unwrap();
        let geo = event_of(&registry, &factory, "GEO");
        let geo_id = geo.id();
        let mut unplaced = vec![geo];

        let mut txn = Transaction::begin(&mut grid);
        assert!(swap_occupied_for_unplaced(&registry, &mut txn, &mut unplaced, 0).unwrap());
        txn.commit();

        assert_eq!(grid.get(pos(0, 0)).unwrap().id(), geo_id);
        assert_eq!(unplaced.len(), 1);
        assert_eq!(unplaced[0].course(), registry.course_by_code("ALG").unwrap());
        grid.check_invariants().unwrap();
    }

    #[test]
    fn test_unplaced_substitution_without_candidate_leaves_grid() {
        let registry = campus::oversized_course();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        let mut unplaced = vec![event_of(&registry, &factory, "BIG")];
        let mut txn = Transaction::begin(&mut grid);
        assert!(!swap_occupied_for_unplaced(&registry, &mut txn, &mut unplaced, 0).unwrap());
        txn.commit();
        assert_eq!(unplaced.len(), 1);
    }

    #[test]
    fn test_place_unplaced_and_largest_capacity() {
        let registry = campus::single_slot_lecturer_conflict();
        let factory = EventFactory::new();
        let mut grid = TimeTable::new(&registry);
        let mut unplaced = vec![event_of(&registry, &factory, "ALG"), event_of(&registry, &factory, "GEO")];

        let mut txn = Transaction::begin(&mut grid);
        assert_eq!(place_unplaced(&registry, &mut txn, &mut unplaced).unwrap(), 1);
        txn.commit();
        assert_eq!(unplaced.len(), 1);
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(largest_hosting_capacity(&registry, &grid, &unplaced[0]), 0);

        let oversized = campus::oversized_course();
        let big = event_of(&oversized, &factory, "BIG");
        let empty = TimeTable::new(&oversized);
        assert_eq!(largest_hosting_capacity(&oversized, &empty, &big), 40);
        assert!(first_fitting_empty_position(&oversized, &empty, &big).is_none());
    }
}
