//! Input dataset: courses, lecturers, curricula, sites and rooms as JSON.
//!
//! Field names are English; the Dutch keys of the faculty export
//! (`vakken`, `lesgevers`, `programmas`, `lokalen`, ...) are accepted as
//! aliases, so an export can be read as-is.

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::domain::{NewCourse, Registry};
use crate::error::{Result, TimetableError};
use crate::horizon::Horizon;
use crate::penalty::PenaltyWeights;

/// Rules applied while turning a dataset into a registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputRules {
    /// Courses with fewer students are raised to this amount
    pub min_student_amount: u32,
    /// Courses with at least this many contact hours are skipped
    pub max_contact_hours: u32,
    /// Share of contact hours that is actually scheduled
    pub scheduled_hours_ratio: f64,
}

impl Default for InputRules {
    fn default() -> Self {
        Self {
            min_student_amount: 0,
            max_contact_hours: 75,
            scheduled_hours_ratio: 0.8,
        }
    }
}

impl InputRules {
    /// Hours scheduled for a course, or `None` if the course is skipped.
    pub fn course_hours(&self, contact_hours: u32) -> Option<u32> {
        if contact_hours == 0 || contact_hours >= self.max_contact_hours {
            return None;
        }
        Some((self.scheduled_hours_ratio * f64::from(contact_hours)).ceil() as u32)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    #[serde(default, alias = "academiejaar", deserialize_with = "lenient_string")]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub semester: Option<String>,
    #[serde(default, alias = "nothomepenalty")]
    pub not_home_penalty: Option<f64>,
    #[serde(default, alias = "kilometerpenalty")]
    pub kilometer_penalty: Option<f64>,
    #[serde(default, alias = "lateurenkost")]
    pub late_hour_penalty: Option<f64>,
    #[serde(default, alias = "minimaalStudentenaantal", deserialize_with = "lenient_u32_opt")]
    pub min_student_amount: Option<u32>,
    #[serde(alias = "vakken")]
    pub courses: Vec<CourseRecord>,
    #[serde(default)]
    pub sites: Vec<SiteRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseRecord {
    pub code: String,
    #[serde(default, alias = "cursusnaam")]
    pub name: String,
    #[serde(alias = "studenten", deserialize_with = "lenient_u32")]
    pub student_amount: u32,
    #[serde(alias = "contacturen", deserialize_with = "lenient_u32")]
    pub contact_hours: u32,
    #[serde(default, alias = "lesgevers")]
    pub lecturers: Vec<LecturerRecord>,
    #[serde(default, alias = "programmas")]
    pub curricula: Vec<CurriculumRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LecturerRecord {
    #[serde(alias = "UGentid", deserialize_with = "lenient_string_req")]
    pub external_id: String,
    #[serde(default, alias = "voornaam")]
    pub first_name: String,
    #[serde(default, alias = "naam")]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurriculumRecord {
    pub code: String,
    #[serde(default, alias = "mt1", deserialize_with = "lenient_string")]
    pub meta: Option<String>,
    #[serde(default, alias = "homesite", deserialize_with = "lenient_string")]
    pub home_site: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteRecord {
    pub code: String,
    #[serde(default, alias = "naam")]
    pub name: String,
    #[serde(alias = "xcoord")]
    pub latitude: f64,
    #[serde(alias = "ycoord")]
    pub longitude: f64,
    #[serde(default, alias = "lokalen")]
    pub rooms: Vec<RoomRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomRecord {
    #[serde(alias = "finummer")]
    pub code: String,
    #[serde(default, alias = "naam")]
    pub name: String,
    #[serde(alias = "capaciteit", deserialize_with = "lenient_u32")]
    pub capacity: u32,
}

impl Dataset {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TimetableError::InvalidDataset(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&contents)
    }

    /// Effective input rules: the dataset's minimum student amount wins.
    pub fn input_rules(&self, defaults: InputRules) -> InputRules {
        InputRules {
            min_student_amount: self.min_student_amount.unwrap_or(defaults.min_student_amount),
            ..defaults
        }
    }

    /// Effective penalty weights: weights present in the dataset win.
    pub fn penalty_weights(&self, defaults: PenaltyWeights) -> PenaltyWeights {
        PenaltyWeights {
            late_hour: self.late_hour_penalty.unwrap_or(defaults.late_hour),
            kilometer: self.kilometer_penalty.unwrap_or(defaults.kilometer),
            not_home: self.not_home_penalty.unwrap_or(defaults.not_home),
            ..defaults
        }
    }

    /// Builds the registry, skipping courses the rules exclude.
    ///
    /// Sites and rooms are registered first so curricula can refer to
    /// their home site; an unknown home site code becomes `None`.
    pub fn to_registry(&self, horizon: Horizon, rules: InputRules) -> Result<Registry> {
        let mut builder = Registry::builder(horizon);

        for site in &self.sites {
            let site_id = builder.add_site(&site.code, &site.name, site.latitude, site.longitude);
            for room in &site.rooms {
                builder.add_room(site_id, &room.code, &room.name, room.capacity);
            }
        }

        for course in &self.courses {
            let Some(course_hours) = rules.course_hours(course.contact_hours) else {
                continue;
            };
            let lecturers = course
                .lecturers
                .iter()
                .map(|l| builder.add_lecturer(&l.external_id, &l.first_name, &l.last_name))
                .collect();
            let curricula = course
                .curricula
                .iter()
                .map(|c| {
                    let home = c.home_site.as_deref().and_then(|code| builder.site_by_code(code));
                    builder.add_curriculum(&c.code, c.meta.clone(), home)
                })
                .collect();
            builder.add_course(NewCourse {
                code: course.code.clone(),
                name: course.name.clone(),
                student_amount: course.student_amount.max(rules.min_student_amount),
                contact_hours: course.contact_hours,
                course_hours,
                lecturers,
                curricula,
            });
        }

        Ok(builder.build())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(u64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(s) => s,
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    use serde::de::Error;
    match Scalar::deserialize(deserializer)? {
        Scalar::Int(n) => u32::try_from(n).map_err(D::Error::custom),
        Scalar::Float(f) if f >= 0.0 => Ok(f.round() as u32),
        Scalar::Text(s) => s.trim().parse().map_err(D::Error::custom),
        _ => Err(D::Error::custom("expected a non-negative number")),
    }
}

fn lenient_u32_opt<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u32>, D::Error> {
    lenient_u32(deserializer).map(Some)
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

fn lenient_string_req<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Scalar::deserialize(deserializer)?.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "academiejaar": 2024,
        "semester": 1,
        "nothomepenalty": 2.0,
        "kilometerpenalty": 0.5,
        "lateurenkost": 3.0,
        "minimaalStudentenaantal": "10",
        "vakken": [
            {
                "code": "A001",
                "cursusnaam": "Analysis",
                "studenten": "4",
                "contacturen": 30,
                "lesgevers": [{"UGentid": 801, "voornaam": "Emmy", "naam": "Noether"}],
                "programmas": [{"code": "BA1", "mt1": "x", "homesite": "S1"}]
            },
            {
                "code": "A002",
                "cursusnaam": "Thesis",
                "studenten": 20,
                "contacturen": 90,
                "lesgevers": [],
                "programmas": []
            },
            {
                "code": "A003",
                "cursusnaam": "Seminar",
                "studenten": 20,
                "contacturen": 0,
                "lesgevers": [],
                "programmas": []
            }
        ],
        "sites": [
            {"code": "S1", "naam": "Sterre", "xcoord": 51.02, "ycoord": 3.71,
             "lokalen": [{"finummer": "S1.01", "naam": "Aud A", "capaciteit": 200}]}
        ]
    }"#;

    #[test]
    fn test_parse_faculty_export() {
        let dataset = Dataset::from_json_str(EXPORT).unwrap();
        assert_eq!(dataset.courses.len(), 3);
        assert_eq!(dataset.min_student_amount, Some(10));
        assert_eq!(dataset.courses[0].lecturers[0].external_id, "801");
        assert_eq!(dataset.sites[0].rooms[0].capacity, 200);
        assert_eq!(dataset.academic_year.as_deref(), Some("2024"));
    }

    #[test]
    fn test_registry_applies_input_rules() {
        let dataset = Dataset::from_json_str(EXPORT).unwrap();
        let rules = dataset.input_rules(InputRules::default());
        let registry = dataset.to_registry(Horizon::default(), rules).unwrap();

        assert_eq!(registry.course_count(), 1);
        let analysis = registry.course(registry.course_by_code("A001").unwrap());
        assert_eq!(analysis.student_amount, 10);
        assert_eq!(analysis.course_hours, 24);

        let ba1 = registry.curriculum(analysis.curricula[0]);
        assert_eq!(ba1.home_site, registry.site_by_code("S1"));
        assert_eq!(ba1.meta.as_deref(), Some("x"));
    }

    #[test]
    fn test_penalty_overrides() {
        let dataset = Dataset::from_json_str(EXPORT).unwrap();
        let weights = dataset.penalty_weights(PenaltyWeights::default());
        assert_eq!(weights.late_hour, 3.0);
        assert_eq!(weights.kilometer, 0.5);
        assert_eq!(weights.not_home, 2.0);
        assert!(!weights.include_distance);
    }

    #[test]
    fn test_course_hours_rounds_up() {
        let rules = InputRules::default();
        assert_eq!(rules.course_hours(1), Some(1));
        assert_eq!(rules.course_hours(12), Some(10));
        assert_eq!(rules.course_hours(74), Some(60));
        assert_eq!(rules.course_hours(75), None);
        assert_eq!(rules.course_hours(0), None);
    }

    #[test]
    fn test_malformed_json_is_invalid_dataset() {
        let err = Dataset::from_json_str("{\"courses\": 3}").unwrap_err();
        assert!(matches!(err, TimetableError::InvalidDataset(_)));
    }
}
