//! Immutable problem facts shared by every sub-problem.

use std::collections::HashMap;
use std::sync::Arc;

use super::course::{Course, Curriculum, Lecturer};
use super::ids::{CourseId, CurriculumId, LecturerId, RoomId, SiteId};
use super::site::{ClassRoom, Site};
use crate::horizon::Horizon;

/// Courses, lecturers, curricula, sites and rooms, indexed by dense ids.
///
/// Built once through [`RegistryBuilder`] and only read afterwards; every
/// id handed out by the builder indexes directly into this registry.
#[derive(Debug, Clone)]
pub struct Registry {
    horizon: Horizon,
    courses: Vec<Course>,
    lecturers: Vec<Lecturer>,
    curricula: Vec<Curriculum>,
    sites: Vec<Site>,
    rooms: Vec<ClassRoom>,
    course_codes: HashMap<String, CourseId>,
    lecturer_ids: HashMap<String, LecturerId>,
    curriculum_codes: HashMap<String, CurriculumId>,
    site_codes: HashMap<String, SiteId>,
    room_codes: HashMap<String, RoomId>,
}

impl Registry {
    pub fn builder(horizon: Horizon) -> RegistryBuilder {
        RegistryBuilder::new(horizon)
    }

    #[inline]
    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    #[inline]
    pub fn course(&self, id: CourseId) -> &Course {
        &self.courses[id.index()]
    }

    #[inline]
    pub fn lecturer(&self, id: LecturerId) -> &Lecturer {
        &self.lecturers[id.index()]
    }

    #[inline]
    pub fn curriculum(&self, id: CurriculumId) -> &Curriculum {
        &self.curricula[id.index()]
    }

    #[inline]
    pub fn site(&self, id: SiteId) -> &Site {
        &self.sites[id.index()]
    }

    #[inline]
    pub fn room(&self, id: RoomId) -> &ClassRoom {
        &self.rooms[id.index()]
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn lecturers(&self) -> &[Lecturer] {
        &self.lecturers
    }

    pub fn curricula(&self) -> &[Curriculum] {
        &self.curricula
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn rooms(&self) -> &[ClassRoom] {
        &self.rooms
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn lecturer_count(&self) -> usize {
        self.lecturers.len()
    }

    pub fn curriculum_count(&self) -> usize {
        self.curricula.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn course_by_code(&self, code: &str) -> Option<CourseId> {
        self.course_codes.get(code).copied()
    }

    pub fn lecturer_by_external_id(&self, external_id: &str) -> Option<LecturerId> {
        self.lecturer_ids.get(external_id).copied()
    }

    pub fn curriculum_by_code(&self, code: &str) -> Option<CurriculumId> {
        self.curriculum_codes.get(code).copied()
    }

    pub fn site_by_code(&self, code: &str) -> Option<SiteId> {
        self.site_codes.get(code).copied()
    }

    pub fn room_by_code(&self, code: &str) -> Option<RoomId> {
        self.room_codes.get(code).copied()
    }
}

/// Arguments for [`RegistryBuilder::add_course`].
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
    pub student_amount: u32,
    pub contact_hours: u32,
    pub course_hours: u32,
    pub lecturers: Vec<LecturerId>,
    pub curricula: Vec<CurriculumId>,
}

/// Incrementally assembles a [`Registry`].
///
/// Lecturers, curricula, sites and rooms are deduplicated by their code;
/// adding an existing code returns the id registered first.
#[derive(Debug)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    pub fn new(horizon: Horizon) -> Self {
        Self {
            registry: Registry {
                horizon,
                courses: Vec::new(),
                lecturers: Vec::new(),
                curricula: Vec::new(),
                sites: Vec::new(),
                rooms: Vec::new(),
                course_codes: HashMap::new(),
                lecturer_ids: HashMap::new(),
                curriculum_codes: HashMap::new(),
                site_codes: HashMap::new(),
                room_codes: HashMap::new(),
            },
        }
    }

    pub fn add_lecturer(&mut self, external_id: &str, first_name: &str, last_name: &str) -> LecturerId {
        let reg = &mut self.registry;
        if let Some(&id) = reg.lecturer_ids.get(external_id) {
            return id;
        }
        let id = LecturerId::new(reg.lecturers.len());
        reg.lecturers.push(Lecturer {
            id,
            external_id: external_id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        reg.lecturer_ids.insert(external_id.to_string(), id);
        id
    }

    pub fn add_curriculum(&mut self, code: &str, meta: Option<String>, home_site: Option<SiteId>) -> CurriculumId {
        let reg = &mut self.registry;
        if let Some(&id) = reg.curriculum_codes.get(code) {
            return id;
        }
        let id = CurriculumId::new(reg.curricula.len());
        reg.curricula.push(Curriculum {
            id,
            code: code.to_string(),
            meta,
            home_site,
        });
        reg.curriculum_codes.insert(code.to_string(), id);
        id
    }

    pub fn add_site(&mut self, code: &str, name: &str, latitude: f64, longitude: f64) -> SiteId {
        let reg = &mut self.registry;
        if let Some(&id) = reg.site_codes.get(code) {
            return id;
        }
        let id = SiteId::new(reg.sites.len());
        reg.sites.push(Site {
            id,
            code: code.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            rooms: Vec::new(),
        });
        reg.site_codes.insert(code.to_string(), id);
        id
    }

    /// Adds a classroom to `site`. Panics if `site` was not issued by this builder.
    pub fn add_room(&mut self, site: SiteId, code: &str, name: &str, capacity: u32) -> RoomId {
        let reg = &mut self.registry;
        if let Some(&id) = reg.room_codes.get(code) {
            return id;
        }
        let id = RoomId::new(reg.rooms.len());
        reg.rooms.push(ClassRoom {
            id,
            code: code.to_string(),
            name: name.to_string(),
            capacity,
            site,
        });
        reg.sites[site.index()].rooms.push(id);
        reg.room_codes.insert(code.to_string(), id);
        id
    }

    /// Adds a course. A repeated code replaces nothing and returns the first id.
    pub fn add_course(&mut self, course: NewCourse) -> CourseId {
        let reg = &mut self.registry;
        if let Some(&id) = reg.course_codes.get(&course.code) {
            return id;
        }
        let id = CourseId::new(reg.courses.len());
        reg.course_codes.insert(course.code.clone(), id);
        reg.courses.push(Course {
            id,
            code: course.code,
            name: course.name,
            student_amount: course.student_amount,
            contact_hours: course.contact_hours,
            course_hours: course.course_hours,
            lecturers: Arc::from(course.lecturers),
            curricula: Arc::from(course.curricula),
        });
        id
    }

    pub fn site_by_code(&self, code: &str) -> Option<SiteId> {
        self.registry.site_by_code(code)
    }

    pub fn build(self) -> Registry {
        self.registry
    }
}
