//! Courses, lecturers and curricula.

use std::sync::Arc;

use super::ids::{CourseId, CurriculumId, LecturerId, SiteId};

/// A course with the number of weekly-grid hours it must be scheduled for.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub student_amount: u32,
    pub contact_hours: u32,
    /// Hours to schedule across the term
    pub course_hours: u32,
    /// Candidate lecturers; any one of them may teach a given event
    pub lecturers: Arc<[LecturerId]>,
    /// Curricula following this course; their students cannot overlap
    pub curricula: Arc<[CurriculumId]>,
}

impl Course {
    /// True when the two courses compete for a lecturer or a curriculum.
    pub fn conflicts_with(&self, other: &Course) -> bool {
        self.lecturers.iter().any(|l| other.lecturers.contains(l))
            || self.curricula.iter().any(|c| other.curricula.contains(c))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecturer {
    pub id: LecturerId,
    pub external_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Lecturer {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (true, _) => self.last_name.clone(),
            (_, true) => self.first_name.clone(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// A study programme: a group of students sharing courses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    pub id: CurriculumId,
    pub code: String,
    pub meta: Option<String>,
    /// Site the curriculum considers home; `None` when unknown
    pub home_site: Option<SiteId>,
}
