//! Fluent registry construction for tests.
//!
//! ```ignore
//! let registry = RegistryFixture::new()
//!     .site("MAIN", 51.0, 3.7)
//!     .room("R1", 60)
//!     .course("MATH", 40, 3, &["alice"], &["BA1"])
//!     .build();
//! ```

use coursetable_core::{Horizon, NewCourse, Registry, RegistryBuilder, SiteId};

/// Builds a [`Registry`] from codes; lecturers and curricula are created
/// on first mention.
pub struct RegistryFixture {
    builder: RegistryBuilder,
    current_site: Option<SiteId>,
}

impl RegistryFixture {
    /// Default five-by-eight week.
    pub fn new() -> Self {
        Self::with_horizon(Horizon::default())
    }

    pub fn with_horizon(horizon: Horizon) -> Self {
        Self {
            builder: Registry::builder(horizon),
            current_site: None,
        }
    }

    /// Adds a site; following rooms belong to it.
    pub fn site(mut self, code: &str, latitude: f64, longitude: f64) -> Self {
        self.current_site = Some(self.builder.add_site(code, code, latitude, longitude));
        self
    }

    /// Adds a room to the last site, creating a site `MAIN` if needed.
    pub fn room(mut self, code: &str, capacity: u32) -> Self {
        let site = match self.current_site {
            Some(site) => site,
            None => {
                let site = self.builder.add_site("MAIN", "Main campus", 51.0, 3.7);
                self.current_site = Some(site);
                site
            }
        };
        self.builder.add_room(site, code, code, capacity);
        self
    }

    /// Registers a curriculum with a home site code.
    pub fn curriculum(mut self, code: &str, home_site: Option<&str>) -> Self {
        let home = home_site.and_then(|s| self.builder.site_by_code(s));
        self.builder.add_curriculum(code, None, home);
        self
    }

    pub fn course(
        mut self,
        code: &str,
        student_amount: u32,
        course_hours: u32,
        lecturers: &[&str],
        curricula: &[&str],
    ) -> Self {
        let lecturers = lecturers
            .iter()
            .map(|id| self.builder.add_lecturer(id, id, ""))
            .collect();
        let curricula = curricula
            .iter()
            .map(|c| self.builder.add_curriculum(c, None, None))
            .collect();
        self.builder.add_course(NewCourse {
            code: code.to_string(),
            name: code.to_string(),
            student_amount,
            contact_hours: course_hours,
            course_hours,
            lecturers,
            curricula,
        });
        self
    }

    pub fn build(self) -> Registry {
        self.builder.build()
    }
}

impl Default for RegistryFixture {
    fn default() -> Self {
        Self::new()
    }
}
