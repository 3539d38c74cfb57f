//! Flattening solved weeks into room reservations.

use coursetable_core::{Registry, TimeTable};
use serde::Serialize;

/// Day of the teaching week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// The `index`-th day of the week, Monday being 0.
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// One grid and the teaching weeks (1-based) it is used for.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekTimetable {
    pub timetable: TimeTable,
    pub weeks: Vec<u32>,
}

/// A booked room for one hour of a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    /// Room code.
    pub room: String,
    /// Course code.
    pub course: String,
    pub students: u32,
    pub days: Vec<Weekday>,
    /// Teaching weeks, 1-based.
    pub weeks: Vec<u32>,
    /// Hours of the day, 1-based.
    pub hours: Vec<u32>,
}

/// One reservation per placed event of every grid, in grid order.
pub fn reservations(registry: &Registry, weeks: &[WeekTimetable]) -> Vec<Reservation> {
    let mut out = Vec::new();
    for week in weeks {
        let horizon = week.timetable.horizon();
        for (position, event) in week.timetable.placed_events() {
            let Some(day) = Weekday::from_index(horizon.day_of(position.slot)) else {
                continue;
            };
            out.push(Reservation {
                room: registry.room(position.room).code.clone(),
                course: registry.course(event.course()).code.clone(),
                students: event.student_amount(),
                days: vec![day],
                weeks: week.weeks.clone(),
                hours: vec![horizon.hour_of(position.slot) + 1],
            });
        }
    }
    out
}
