//! Indexed documents.
//!
//! Documents are denormalized at index time: a course run carries its course,
//! organizations, and the programs that reference its course, so that search
//! results can be filtered and rendered without touching the catalog again.

use crate::DocId;
use chrono::{DateTime, Utc};
use coursedex_core::model::{CourseRunStatus, PacingType, ProgramStatus};
use coursedex_core::Availability;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of an indexed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Program,
    CourseRun,
    Course,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Program => "program",
            ContentType::CourseRun => "courserun",
            ContentType::Course => "course",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "program" => Some(ContentType::Program),
            "courserun" | "course_run" => Some(ContentType::CourseRun),
            "course" => Some(ContentType::Course),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRef {
    pub key: String,
    pub name: String,
}

/// A program as seen from one of its courses or runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRef {
    pub uuid: Uuid,
    pub title: String,
    pub program_type: String,
    pub status: ProgramStatus,
    pub marketing_slug: Option<String>,
    /// The program lists this course run in its exclusions.
    pub excludes_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDoc {
    pub key: String,
    pub course_key: String,
    pub course_uuid: Uuid,
    pub title: String,
    pub short_description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub enrollment_start: Option<DateTime<Utc>>,
    pub enrollment_end: Option<DateTime<Utc>>,
    pub status: CourseRunStatus,
    pub hidden: bool,
    pub pacing_type: PacingType,
    pub language: Option<String>,
    pub seat_types: Vec<String>,
    pub marketing_url: Option<String>,
    pub level_type: Option<String>,
    pub partner: String,
    pub organizations: Vec<OrgRef>,
    pub programs: Vec<ProgramRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDoc {
    pub uuid: Uuid,
    pub key: String,
    pub title: String,
    pub short_description: Option<String>,
    pub level_type: Option<String>,
    pub marketing_url: Option<String>,
    pub partner: String,
    pub organizations: Vec<OrgRef>,
    /// Run documents of this course, in catalog order.
    pub runs: Vec<DocId>,
    pub programs: Vec<ProgramRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDoc {
    pub uuid: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub program_type: String,
    pub status: ProgramStatus,
    pub hidden: bool,
    pub partner: String,
    pub marketing_slug: Option<String>,
    pub organizations: Vec<OrgRef>,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Document {
    CourseRun(RunDoc),
    Course(CourseDoc),
    Program(ProgramDoc),
}

impl RunDoc {
    /// Programs that may be advertised on this run: not unpublished, not
    /// deleted, and not excluding the run.
    pub fn available_programs(&self) -> impl Iterator<Item = &ProgramRef> {
        self.programs
            .iter()
            .filter(|p| p.status.is_available() && !p.excludes_run)
    }

    /// Type names of [`Self::available_programs`], in catalog order.
    pub fn program_types(&self) -> Vec<String> {
        self.available_programs()
            .map(|p| p.program_type.clone())
            .collect()
    }

    pub fn availability(&self, now: DateTime<Utc>) -> Availability {
        Availability::classify(self.start, self.end, now)
    }

    pub fn org_keys(&self) -> Vec<String> {
        self.organizations.iter().map(|o| o.key.clone()).collect()
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end.is_some_and(|end| end <= now)
    }

    pub fn enrollment_closed(&self, now: DateTime<Utc>) -> bool {
        self.enrollment_end.is_some_and(|end| end <= now)
    }

    pub fn enrollment_open(&self, now: DateTime<Utc>) -> bool {
        self.enrollment_start.map_or(true, |start| start <= now) && !self.enrollment_closed(now)
    }
}

impl Document {
    pub fn content_type(&self) -> ContentType {
        match self {
            Document::CourseRun(_) => ContentType::CourseRun,
            Document::Course(_) => ContentType::Course,
            Document::Program(_) => ContentType::Program,
        }
    }

    /// Identifier exposed through the `id` query field.
    pub fn id(&self) -> String {
        match self {
            Document::CourseRun(run) => run.key.clone(),
            Document::Course(course) => course.uuid.to_string(),
            Document::Program(program) => program.uuid.to_string(),
        }
    }

    /// Key used to group a document with its siblings across content types.
    pub fn aggregation_key(&self) -> String {
        match self {
            Document::CourseRun(run) => format!("courserun:{}", run.course_key),
            Document::Course(course) => format!("course:{}", course.key),
            Document::Program(program) => format!("program:{}", program.uuid),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Document::CourseRun(run) => &run.title,
            Document::Course(course) => &course.title,
            Document::Program(program) => &program.title,
        }
    }

    pub fn partner(&self) -> &str {
        match self {
            Document::CourseRun(run) => &run.partner,
            Document::Course(course) => &course.partner,
            Document::Program(program) => &program.partner,
        }
    }

    pub fn organizations(&self) -> &[OrgRef] {
        match self {
            Document::CourseRun(run) => &run.organizations,
            Document::Course(course) => &course.organizations,
            Document::Program(program) => &program.organizations,
        }
    }

    /// Key used for the final tie-break in result ordering.
    pub fn sort_key(&self) -> &str {
        match self {
            Document::CourseRun(run) => &run.key,
            Document::Course(course) => &course.key,
            Document::Program(program) => &program.title,
        }
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        match self {
            Document::CourseRun(run) => run.start,
            _ => None,
        }
    }

    /// Published and visible runs, active and visible programs. Courses always pass.
    pub fn is_published(&self) -> bool {
        match self {
            Document::CourseRun(run) => run.status == CourseRunStatus::Published && !run.hidden,
            Document::Course(_) => true,
            Document::Program(program) => {
                program.status == ProgramStatus::Active && !program.hidden
            }
        }
    }

    /// Values of a keyword or text field. Unknown fields have no values.
    pub fn field_values(&self, field: &str, now: DateTime<Utc>) -> Vec<String> {
        let common = match field {
            "id" => Some(vec![self.id()]),
            "title" => Some(vec![self.title().to_string()]),
            "partner" => Some(vec![self.partner().to_string()]),
            "org" | "organizations" => Some(
                self.organizations()
                    .iter()
                    .map(|o| o.key.clone())
                    .collect(),
            ),
            "content_type" => Some(vec![self.content_type().as_str().to_string()]),
            "aggregation_key" => Some(vec![self.aggregation_key()]),
            _ => None,
        };
        if let Some(values) = common {
            return values;
        }

        match self {
            Document::CourseRun(run) => match field {
                "key" => vec![run.key.clone()],
                "course_key" => vec![run.course_key.clone()],
                "short_description" => run.short_description.iter().cloned().collect(),
                "pacing_type" => vec![run.pacing_type.as_str().to_string()],
                "language" => run.language.iter().cloned().collect(),
                "level_type" => run.level_type.iter().cloned().collect(),
                "status" => vec![run.status.as_str().to_string()],
                "program_types" => run.program_types(),
                "seat_types" => run.seat_types.clone(),
                "availability" => vec![run.availability(now).label().to_string()],
                _ => Vec::new(),
            },
            Document::Course(course) => match field {
                "key" => vec![course.key.clone()],
                "uuid" => vec![course.uuid.to_string()],
                "short_description" => course.short_description.iter().cloned().collect(),
                "level_type" => course.level_type.iter().cloned().collect(),
                _ => Vec::new(),
            },
            Document::Program(program) => match field {
                "uuid" => vec![program.uuid.to_string()],
                "type" | "program_type" => vec![program.program_type.clone()],
                "status" => vec![program.status.as_str().to_string()],
                "subtitle" => program.subtitle.iter().cloned().collect(),
                _ => Vec::new(),
            },
        }
    }

    /// Free-text fields searched by bare query words, as `(text, is_title)`.
    pub fn text_fields(&self) -> Vec<(&str, bool)> {
        let mut fields = vec![(self.title(), true)];
        for org in self.organizations() {
            fields.push((org.key.as_str(), false));
            fields.push((org.name.as_str(), false));
        }
        match self {
            Document::CourseRun(run) => {
                fields.push((run.key.as_str(), false));
                if let Some(desc) = &run.short_description {
                    fields.push((desc.as_str(), false));
                }
            }
            Document::Course(course) => {
                fields.push((course.key.as_str(), false));
                if let Some(desc) = &course.short_description {
                    fields.push((desc.as_str(), false));
                }
            }
            Document::Program(program) => {
                fields.push((program.program_type.as_str(), false));
                if let Some(subtitle) = &program.subtitle {
                    fields.push((subtitle.as_str(), false));
                }
            }
        }
        fields
    }

    /// Text fed to the trigram index for typeahead candidate lookup.
    pub fn typeahead_text(&self) -> String {
        let mut text = self.title().to_lowercase();
        for org in self.organizations() {
            text.push(' ');
            text.push_str(&org.key.to_lowercase());
        }
        text
    }
}

/// Split text into lowercase alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}
