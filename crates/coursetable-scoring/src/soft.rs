//! Soft constraints and the total cost of a grid.
//!
//! Lower is better; a cost of zero means no soft constraint is violated.

use coursetable_core::{CourseEvent, Horizon, PenaltyWeights, Position, Registry, RoomId, TimeTable};

/// Per-term breakdown of a grid's soft cost.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostBreakdown {
    /// Weighted count of events in the last two hours of a day
    pub late_hours: f64,
    /// Curriculum-events alone on their day
    pub isolated_days: u32,
    /// Runs of four consecutive slots per curriculum
    pub four_consecutive: u32,
    /// Mean share of room capacity taken by the students
    pub room_size: f64,
    /// Weighted count of curricula taught away from home
    pub not_home: f64,
    /// Weighted kilometres between rooms and curricula home sites
    pub distance: f64,
    /// Sum of the terms that count towards the objective
    pub total: f64,
}

/// `weights.late_hour` if `position` lies in the last two hours of its day.
pub fn late_hour_penalty(horizon: Horizon, position: Position, weights: &PenaltyWeights) -> f64 {
    let last_two = horizon.hours_per_day().saturating_sub(2);
    if horizon.hour_of(position.slot) >= last_two {
        weights.late_hour
    } else {
        0.0
    }
}

/// One per curriculum of `event` that has no other event on the same day.
pub fn isolated_day_penalty(grid: &TimeTable, event: &CourseEvent, position: Position) -> u32 {
    let hours_per_day = grid.horizon().hours_per_day() as usize;
    let absolute_slot = grid.absolute_slot(position.slot) as usize;
    let day_start = absolute_slot - absolute_slot % hours_per_day;
    let day = day_start..day_start + hours_per_day;

    event
        .curricula()
        .iter()
        .filter(|&&c| {
            let slots = grid.curriculum_slots(c);
            let own = usize::from(slots.contains(absolute_slot));
            slots.count_in(day.clone()) <= own
        })
        .count() as u32
}

/// Number of windows of four consecutive occupied slots, summed over
/// curricula. A run of five consecutive slots counts as two windows.
pub fn four_consecutive_penalty(grid: &TimeTable) -> u32 {
    grid.curriculum_occupancy()
        .map(|slots| {
            let slots: Vec<usize> = slots.iter().collect();
            slots.windows(4).filter(|w| w[3] - w[0] == 3).count() as u32
        })
        .sum()
}

/// Students of `event` divided by the room's capacity.
pub fn room_size_penalty(registry: &Registry, event: &CourseEvent, room: RoomId) -> f64 {
    let capacity = registry.room(room).capacity;
    if capacity == 0 {
        return 0.0;
    }
    f64::from(event.student_amount()) / f64::from(capacity)
}

/// Number of curricula of `event` whose home site is not the room's site.
/// A curriculum without a known home site is never at home.
pub fn not_home_penalty(registry: &Registry, event: &CourseEvent, room: RoomId) -> u32 {
    let site = registry.room(room).site;
    event
        .curricula()
        .iter()
        .filter(|&&c| registry.curriculum(c).home_site != Some(site))
        .count() as u32
}

/// Kilometres from the room's site to each away curriculum's home site,
/// times `weights.kilometer`. Curricula without a home site add nothing.
pub fn distance_penalty(registry: &Registry, event: &CourseEvent, room: RoomId, weights: &PenaltyWeights) -> f64 {
    let room_site = registry.site(registry.room(room).site);
    event
        .curricula()
        .iter()
        .filter_map(|&c| registry.curriculum(c).home_site)
        .filter(|&home| home != room_site.id)
        .map(|home| weights.kilometer * room_site.distance_km(registry.site(home)))
        .sum()
}

/// Evaluates every soft term over the placed events of `grid`.
pub fn evaluate(registry: &Registry, grid: &TimeTable, weights: &PenaltyWeights) -> CostBreakdown {
    let horizon = grid.horizon();
    let mut cost = CostBreakdown::default();
    let mut placed = 0usize;

    for (position, event) in grid.placed_events() {
        placed += 1;
        cost.late_hours += late_hour_penalty(horizon, position, weights);
        cost.isolated_days += isolated_day_penalty(grid, event, position);
        cost.room_size += room_size_penalty(registry, event, position.room);
        cost.not_home += weights.not_home * f64::from(not_home_penalty(registry, event, position.room));
        if weights.include_distance {
            cost.distance += distance_penalty(registry, event, position.room, weights);
        }
    }
    cost.four_consecutive = four_consecutive_penalty(grid);
    if placed > 0 {
        cost.room_size /= placed as f64;
    }

    cost.total = cost.late_hours + f64::from(cost.isolated_days) + f64::from(cost.four_consecutive);
    if weights.include_room_size {
        cost.total += cost.room_size;
    }
    if weights.include_not_home {
        cost.total += cost.not_home;
    }
    if weights.include_distance {
        cost.total += cost.distance;
    }
    cost
}

/// Total soft cost of `grid`.
#[inline]
pub fn total_cost(registry: &Registry, grid: &TimeTable, weights: &PenaltyWeights) -> f64 {
    evaluate(registry, grid, weights).total
}
