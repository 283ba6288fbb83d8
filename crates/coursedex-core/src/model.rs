//! Catalog data model: partners, organizations, courses, course runs, programs.
//!
//! These are the records as they arrive from catalog files. Derived views
//! (program types, availability, aggregation keys) are computed by the index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A site operator whose catalog is searched independently of other partners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub short_code: String,
    #[serde(default)]
    pub name: String,
}

/// An institution that authors courses and programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub uuid: Uuid,
    pub key: String,
    pub title: String,
    /// Partner short code.
    pub partner: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub level_type: Option<String>,
    #[serde(default)]
    pub marketing_url: Option<String>,
    /// Organization keys.
    #[serde(default)]
    pub authoring_organizations: Vec<String>,
}

/// A scheduled offering of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRun {
    pub key: String,
    /// Key of the owning course.
    pub course: String,
    /// Overrides the course title when set.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub enrollment_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub enrollment_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: CourseRunStatus,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub pacing_type: PacingType,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub seat_types: Vec<String>,
    #[serde(default)]
    pub marketing_url: Option<String>,
    /// Overrides the course's authoring organizations when non-empty.
    #[serde(default)]
    pub authoring_organizations: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseRunStatus {
    #[default]
    Published,
    Unpublished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingType {
    #[default]
    InstructorPaced,
    SelfPaced,
}

/// A curated collection of courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub uuid: Uuid,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Program type name, e.g. `MicroMasters`.
    pub program_type: String,
    #[serde(default)]
    pub status: ProgramStatus,
    #[serde(default)]
    pub hidden: bool,
    /// Partner short code.
    pub partner: String,
    /// Course keys.
    #[serde(default)]
    pub courses: Vec<String>,
    /// Course run keys that belong to a listed course but not to the program.
    #[serde(default)]
    pub excluded_course_runs: Vec<String>,
    #[serde(default)]
    pub authoring_organizations: Vec<String>,
    #[serde(default)]
    pub marketing_slug: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    #[default]
    Active,
    Unpublished,
    Retired,
    Deleted,
}

impl CourseRunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseRunStatus::Published => "published",
            CourseRunStatus::Unpublished => "unpublished",
        }
    }
}

impl PacingType {
    pub fn as_str(self) -> &'static str {
        match self {
            PacingType::InstructorPaced => "instructor_paced",
            PacingType::SelfPaced => "self_paced",
        }
    }
}

impl ProgramStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgramStatus::Active => "active",
            ProgramStatus::Unpublished => "unpublished",
            ProgramStatus::Retired => "retired",
            ProgramStatus::Deleted => "deleted",
        }
    }

    /// Whether a program in this state may be advertised on its course runs.
    pub fn is_available(self) -> bool {
        !matches!(self, ProgramStatus::Unpublished | ProgramStatus::Deleted)
    }
}

/// A full catalog, possibly assembled from several files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub partners: Vec<Partner>,
    pub organizations: Vec<Organization>,
    pub courses: Vec<Course>,
    pub course_runs: Vec<CourseRun>,
    pub programs: Vec<Program>,
}

impl Catalog {
    /// Append every record of `other` to this catalog.
    pub fn merge(&mut self, other: Catalog) {
        self.partners.extend(other.partners);
        self.organizations.extend(other.organizations);
        self.courses.extend(other.courses);
        self.course_runs.extend(other.course_runs);
        self.programs.extend(other.programs);
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.partners.len()
            + self.organizations.len()
            + self.courses.len()
            + self.course_runs.len()
            + self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
