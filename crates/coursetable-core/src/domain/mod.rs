//! Domain model: problem facts and the events placed in a timetable.

mod course;
mod event;
mod ids;
mod registry;
mod site;

pub use course::{Course, Curriculum, Lecturer};
pub use event::{CourseEvent, EventFactory};
pub use ids::{CourseId, CurriculumId, EventId, LecturerId, RoomId, SiteId};
pub use registry::{NewCourse, Registry, RegistryBuilder};
pub use site::{haversine_km, ClassRoom, Site};
