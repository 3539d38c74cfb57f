//! Event creation helpers.

use coursetable_core::{CourseEvent, EventFactory, Position, Registry, RoomId};

/// `course_hours` events for every course, in registry order.
pub fn events_for(registry: &Registry, factory: &EventFactory) -> Vec<CourseEvent> {
    registry
        .courses()
        .iter()
        .flat_map(|course| factory.create_many(course, course.course_hours))
        .collect()
}

/// A single event of the course with `code`.
///
/// # Panics
///
/// Panics if the code is unknown.
pub fn event_of(registry: &Registry, factory: &EventFactory, code: &str) -> CourseEvent {
    let id = registry
        .course_by_code(code)
        .unwrap_or_else(|| panic!("unknown course code {code}"));
    factory.create(registry.course(id), 1)
}

pub fn pos(room: usize, slot: u32) -> Position {
    Position::new(RoomId::new(room), slot)
}
