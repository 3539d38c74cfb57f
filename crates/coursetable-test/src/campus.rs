//! Canned problem instances.

use coursetable_core::{Horizon, Registry};

use crate::registry::RegistryFixture;

/// Two rooms, three one-hour courses with nothing in common.
pub fn two_rooms_three_courses() -> Registry {
    RegistryFixture::new()
        .room("R1", 60)
        .room("R2", 120)
        .course("ALG", 50, 1, &["alice"], &["BA1"])
        .course("BIO", 100, 1, &["bob"], &["BA2"])
        .course("CHE", 30, 1, &["carol"], &["BA3"])
        .build()
}

/// A week of a single slot: two courses taught by the same lecturer.
pub fn single_slot_lecturer_conflict() -> Registry {
    let horizon = Horizon::new(1, 1).expect("one-slot horizon");
    RegistryFixture::with_horizon(horizon)
        .room("R1", 100)
        .room("R2", 100)
        .course("ALG", 20, 1, &["alice"], &["BA1"])
        .course("GEO", 20, 1, &["alice"], &["BA2"])
        .build()
}

/// A course bigger than any room.
pub fn oversized_course() -> Registry {
    RegistryFixture::new()
        .room("R1", 30)
        .room("R2", 40)
        .course("BIG", 60, 1, &["alice"], &["BA1"])
        .build()
}

/// Two sites, five rooms and nine courses competing for shared lecturers
/// and curricula. Every course fits at least one room.
pub fn small_faculty() -> Registry {
    RegistryFixture::new()
        .site("NORTH", 51.05, 3.72)
        .room("N1", 40)
        .room("N2", 80)
        .room("N3", 200)
        .site("SOUTH", 51.02, 3.71)
        .room("S1", 60)
        .room("S2", 120)
        .curriculum("BA1", Some("NORTH"))
        .curriculum("BA2", Some("SOUTH"))
        .curriculum("MA1", Some("NORTH"))
        .course("CALC", 180, 4, &["alice"], &["BA1", "BA2"])
        .course("LINALG", 150, 3, &["alice", "bob"], &["BA1"])
        .course("PROG", 110, 4, &["carol"], &["BA1"])
        .course("STATS", 70, 3, &["bob"], &["BA2"])
        .course("PHYS", 90, 3, &["dave"], &["BA2"])
        .course("OPT", 35, 2, &["erin"], &["MA1"])
        .course("ML", 55, 3, &["erin", "carol"], &["MA1"])
        .course("GRAPH", 30, 2, &["bob"], &["MA1", "BA2"])
        .course("LOGIC", 60, 2, &["frank"], &["BA1", "MA1"])
        .build()
}
