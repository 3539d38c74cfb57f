//! Coursetable Core - domain model and timetable grid
//!
//! This crate provides the building blocks every other coursetable crate
//! works on:
//! - The immutable [`Registry`] of courses, lecturers, curricula, sites and rooms
//! - [`CourseEvent`]s, the placeable teaching hours, and their [`EventFactory`]
//! - The weekly [`TimeTable`] grid with per-week lecturer and curriculum occupancy
//! - The JSON [`Dataset`] reader

pub mod bitset;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod horizon;
pub mod penalty;
pub mod timetable;

pub use bitset::BitSet;
pub use dataset::{Dataset, InputRules};
pub use domain::{
    ClassRoom, Course, CourseEvent, CourseId, Curriculum, CurriculumId, EventFactory, EventId, Lecturer,
    LecturerId, NewCourse, Registry, RegistryBuilder, RoomId, Site, SiteId,
};
pub use error::{Result, TimetableError};
pub use horizon::{Horizon, TEACHING_WEEKS};
pub use penalty::PenaltyWeights;
pub use timetable::{Position, TimeTable, Transaction};
