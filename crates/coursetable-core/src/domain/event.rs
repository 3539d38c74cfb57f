//! Course events: the placeable units of a timetable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::course::Course;
use super::ids::{CourseId, CurriculumId, EventId, LecturerId};

/// One teaching hour of a course.
///
/// Identity is the [`EventId`]: two events with equal fields but different
/// ids are different events. `assigned_lecturer` is set exactly while the
/// event sits in a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseEvent {
    id: EventId,
    course: CourseId,
    lecturers: Arc<[LecturerId]>,
    curricula: Arc<[CurriculumId]>,
    student_amount: u32,
    event_number: u32,
    assigned_lecturer: Option<LecturerId>,
}

impl CourseEvent {
    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[inline]
    pub fn course(&self) -> CourseId {
        self.course
    }

    #[inline]
    pub fn lecturers(&self) -> &[LecturerId] {
        &self.lecturers
    }

    #[inline]
    pub fn curricula(&self) -> &[CurriculumId] {
        &self.curricula
    }

    #[inline]
    pub fn student_amount(&self) -> u32 {
        self.student_amount
    }

    #[inline]
    pub fn event_number(&self) -> u32 {
        self.event_number
    }

    #[inline]
    pub fn assigned_lecturer(&self) -> Option<LecturerId> {
        self.assigned_lecturer
    }

    pub(crate) fn set_assigned_lecturer(&mut self, lecturer: LecturerId) {
        self.assigned_lecturer = Some(lecturer);
    }

    pub(crate) fn take_assigned_lecturer(&mut self) -> Option<LecturerId> {
        self.assigned_lecturer.take()
    }
}

/// Hands out events with process-unique ids.
///
/// Shared by reference between sub-problems, possibly across threads.
#[derive(Debug, Default)]
pub struct EventFactory {
    next_id: AtomicU64,
}

impl EventFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> EventId {
        EventId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates the `event_number`-th event of `course`.
    pub fn create(&self, course: &Course, event_number: u32) -> CourseEvent {
        CourseEvent {
            id: self.next_id(),
            course: course.id,
            lecturers: Arc::clone(&course.lecturers),
            curricula: Arc::clone(&course.curricula),
            student_amount: course.student_amount,
            event_number,
            assigned_lecturer: None,
        }
    }

    /// Creates events `1..=count` of `course`.
    pub fn create_many(&self, course: &Course, count: u32) -> Vec<CourseEvent> {
        (1..=count).map(|n| self.create(course, n)).collect()
    }

    /// Copy of `event` with a fresh id and no assigned lecturer.
    pub fn duplicate(&self, event: &CourseEvent) -> CourseEvent {
        CourseEvent {
            id: self.next_id(),
            assigned_lecturer: None,
            ..event.clone()
        }
    }

    /// Splits `event` into a part of `first_amount` students and one with
    /// the remainder. Both parts get fresh ids.
    ///
    /// Returns `None` unless `0 < first_amount < event.student_amount()`.
    pub fn split(&self, event: &CourseEvent, first_amount: u32) -> Option<(CourseEvent, CourseEvent)> {
        if first_amount == 0 || first_amount >= event.student_amount {
            return None;
        }
        let mut first = self.duplicate(event);
        first.student_amount = first_amount;
        let mut second = self.duplicate(event);
        second.student_amount = event.student_amount - first_amount;
        Some((first, second))
    }
}
