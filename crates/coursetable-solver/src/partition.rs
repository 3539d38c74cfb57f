//! Splitting course hours into recurring events.

use std::fmt;

use coursetable_core::{CourseEvent, EventFactory, Registry, TimeTable, TEACHING_WEEKS};
use serde::Serialize;

/// How often an event repeats over the teaching weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// Every week.
    Weekly,
    /// Every week of one half of the term.
    Biweekly,
    /// Every week of one quarter of the term.
    Triweekly,
    /// A single week.
    Irregular,
}

impl Recurrence {
    pub const ALL: [Recurrence; 4] = [
        Recurrence::Weekly,
        Recurrence::Biweekly,
        Recurrence::Triweekly,
        Recurrence::Irregular,
    ];

    /// Teaching weeks one event of this recurrence stands for.
    pub fn weeks_covered(self) -> u32 {
        match self {
            Recurrence::Weekly => TEACHING_WEEKS,
            Recurrence::Biweekly => TEACHING_WEEKS / 2,
            Recurrence::Triweekly => TEACHING_WEEKS / 4,
            Recurrence::Irregular => 1,
        }
    }

    /// Independent grids the term is divided into for this recurrence.
    pub fn blocks(self) -> u32 {
        TEACHING_WEEKS / self.weeks_covered()
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Recurrence::Weekly => "weekly",
            Recurrence::Biweekly => "biweekly",
            Recurrence::Triweekly => "triweekly",
            Recurrence::Irregular => "irregular",
        };
        f.write_str(name)
    }
}

/// Events of every course, grouped by recurrence.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceBuckets {
    pub weekly: Vec<CourseEvent>,
    pub biweekly: Vec<CourseEvent>,
    pub triweekly: Vec<CourseEvent>,
    pub irregular: Vec<CourseEvent>,
}

impl RecurrenceBuckets {
    pub fn get(&self, recurrence: Recurrence) -> &[CourseEvent] {
        match recurrence {
            Recurrence::Weekly => &self.weekly,
            Recurrence::Biweekly => &self.biweekly,
            Recurrence::Triweekly => &self.triweekly,
            Recurrence::Irregular => &self.irregular,
        }
    }

    fn get_mut(&mut self, recurrence: Recurrence) -> &mut Vec<CourseEvent> {
        match recurrence {
            Recurrence::Weekly => &mut self.weekly,
            Recurrence::Biweekly => &mut self.biweekly,
            Recurrence::Triweekly => &mut self.triweekly,
            Recurrence::Irregular => &mut self.irregular,
        }
    }

    pub fn len(&self) -> usize {
        Recurrence::ALL.iter().map(|&r| self.get(r).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Events per recurrence for a course with `course_hours` hours over the
/// term, in [`Recurrence::ALL`] order.
///
/// Hours are taken greedily: as many weekly events as fit, then biweekly,
/// then triweekly, and the rest as single-week events.
pub fn recurrence_counts(course_hours: u32) -> [u32; 4] {
    let mut remaining = course_hours;
    Recurrence::ALL.map(|recurrence| {
        let covered = recurrence.weeks_covered();
        let count = remaining / covered;
        remaining %= covered;
        count
    })
}

/// Events of the most frequent recurrence a course with `course_hours`
/// hours has, zero for a course without hours.
pub fn top_level_events(course_hours: u32) -> u32 {
    recurrence_counts(course_hours)
        .into_iter()
        .find(|&count| count > 0)
        .unwrap_or(0)
}

/// Resets the remaining hours of every course in `grid` to its number of
/// events at its most frequent recurrence.
pub fn seed_remaining_hours(registry: &Registry, grid: &mut TimeTable) {
    for course in registry.courses() {
        grid.set_remaining_hours(course.id, i64::from(top_level_events(course.course_hours)));
    }
}

/// Creates the events of every course of `registry`, numbered per course.
pub fn partition_events(registry: &Registry, factory: &EventFactory) -> RecurrenceBuckets {
    let mut buckets = RecurrenceBuckets::default();
    for course in registry.courses() {
        let mut event_number = 0;
        for (recurrence, count) in Recurrence::ALL.into_iter().zip(recurrence_counts(course.course_hours)) {
            let bucket = buckets.get_mut(recurrence);
            for _ in 0..count {
                event_number += 1;
                bucket.push(factory.create(course, event_number));
            }
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursetable_test::RegistryFixture;

    #[test]
    fn test_counts_cascade() {
        assert_eq!(recurrence_counts(0), [0, 0, 0, 0]);
        assert_eq!(recurrence_counts(2), [0, 0, 0, 2]);
        assert_eq!(recurrence_counts(5), [0, 0, 1, 2]);
        assert_eq!(recurrence_counts(7), [0, 1, 0, 1]);
        assert_eq!(recurrence_counts(11), [0, 1, 1, 2]);
        assert_eq!(recurrence_counts(12), [1, 0, 0, 0]);
        assert_eq!(recurrence_counts(29), [2, 0, 1, 2]);
    }

    #[test]
    fn test_counts_cover_every_hour() {
        for hours in 0..100 {
            let weeks: u32 = Recurrence::ALL
                .iter()
                .zip(recurrence_counts(hours))
                .map(|(r, count)| r.weeks_covered() * count)
                .sum();
            assert_eq!(weeks, hours);
        }
    }

    #[test]
    fn test_partition_numbers_events_per_course() {
        let registry = RegistryFixture::new()
            .room("R1", 100)
            .course("ALG", 40, 20, &["alice"], &["BA1"])
            .course("BIO", 25, 4, &["bob"], &["BA2"])
            .build();
        let factory = EventFactory::new();

        let buckets = partition_events(&registry, &factory);

        // ALG: 20 = 12 + 6 + 0 + 2; BIO: 4 = 3 + 1.
        assert_eq!(buckets.weekly.len(), 1);
        assert_eq!(buckets.biweekly.len(), 1);
        assert_eq!(buckets.triweekly.len(), 1);
        assert_eq!(buckets.irregular.len(), 3);
        assert_eq!(buckets.len(), 6);

        let alg = registry.course_by_code("ALG").unwrap();
        let numbers: Vec<u32> = Recurrence::ALL
            .iter()
            .flat_map(|&r| buckets.get(r).iter())
            .filter(|e| e.course() == alg)
            .map(CourseEvent::event_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(buckets.weekly.iter().all(|e| e.student_amount() == 40));
    }

    #[test]
    fn test_top_level_events() {
        assert_eq!(top_level_events(0), 0);
        assert_eq!(top_level_events(2), 2);
        assert_eq!(top_level_events(7), 1);
        assert_eq!(top_level_events(23), 1);
        assert_eq!(top_level_events(24), 2);
        assert_eq!(top_level_events(5), 1);
    }

    #[test]
    fn test_seeded_grid_counts_top_level_events() {
        let registry = RegistryFixture::new()
            .room("R1", 100)
            .course("ALG", 40, 24, &["alice"], &["BA1"])
            .course("BIO", 25, 4, &["bob"], &["BA2"])
            .build();
        let mut grid = TimeTable::new(&registry);

        seed_remaining_hours(&registry, &mut grid);

        assert_eq!(grid.remaining_hours(registry.course_by_code("ALG").unwrap()), 2);
        assert_eq!(grid.remaining_hours(registry.course_by_code("BIO").unwrap()), 1);
    }

    #[test]
    fn test_blocks() {
        assert_eq!(Recurrence::Weekly.blocks(), 1);
        assert_eq!(Recurrence::Biweekly.blocks(), 2);
        assert_eq!(Recurrence::Triweekly.blocks(), 4);
        assert_eq!(Recurrence::Irregular.blocks(), 12);
        assert_eq!(Recurrence::Triweekly.to_string(), "triweekly");
    }
}
