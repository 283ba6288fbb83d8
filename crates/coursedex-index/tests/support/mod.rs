//! Shared fixture corpus for coursedex-index integration tests.
//!
//! Small and deterministic: every date is relative to a fixed `now()` so
//! availability buckets never drift.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use coursedex_core::model::{CourseRunStatus, PacingType, ProgramStatus};
use coursedex_index::{
    CourseDoc, DocTable, Document, OrgRef, ProgramDoc, ProgramRef, RunDoc, SearchEngine, Synonyms,
    TrigramIndex,
};
use uuid::Uuid;

pub struct Snapshot {
    pub docs: DocTable,
    pub trigrams: TrigramIndex,
    pub synonyms: Synonyms,
}

impl Snapshot {
    pub fn engine(&self) -> SearchEngine<'_> {
        SearchEngine::new(&self.docs, &self.trigrams, &self.synonyms)
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap_or_default()
}

pub fn org(key: &str) -> OrgRef {
    OrgRef {
        key: key.to_string(),
        name: format!("{key} University"),
    }
}

pub struct RunSpec {
    pub key: &'static str,
    pub course: &'static str,
    pub title: &'static str,
    pub org: &'static str,
    pub start_days: Option<i64>,
    pub end_days: Option<i64>,
    pub pacing: PacingType,
}

pub fn run(spec: &RunSpec, programs: Vec<ProgramRef>) -> RunDoc {
    let now = now();
    RunDoc {
        key: spec.key.to_string(),
        course_key: spec.course.to_string(),
        course_uuid: course_uuid(spec.course),
        title: spec.title.to_string(),
        short_description: None,
        start: spec.start_days.map(|d| now + Duration::days(d)),
        end: spec.end_days.map(|d| now + Duration::days(d)),
        enrollment_start: None,
        enrollment_end: None,
        status: CourseRunStatus::Published,
        hidden: false,
        pacing_type: spec.pacing,
        language: Some("en".to_string()),
        seat_types: vec!["verified".to_string()],
        marketing_url: None,
        level_type: Some("Introductory".to_string()),
        partner: "edx".to_string(),
        organizations: vec![org(spec.org)],
        programs,
    }
}

/// Stable uuid of a fixture course: its position in [`RUNS`].
pub fn course_uuid(course_key: &str) -> Uuid {
    let position = RUNS.iter().position(|s| s.course == course_key).unwrap_or(0);
    Uuid::from_u128(position as u128 + 1)
}

pub fn program(n: u128, title: &str, program_type: &str, org_key: &str) -> ProgramDoc {
    ProgramDoc {
        uuid: Uuid::from_u128(0x1000 + n),
        title: title.to_string(),
        subtitle: None,
        program_type: program_type.to_string(),
        status: ProgramStatus::Active,
        hidden: false,
        partner: "edx".to_string(),
        marketing_slug: None,
        organizations: vec![org(org_key)],
        courses: Vec::new(),
    }
}

pub fn program_ref(program: &ProgramDoc) -> ProgramRef {
    ProgramRef {
        uuid: program.uuid,
        title: program.title.clone(),
        program_type: program.program_type.clone(),
        status: program.status,
        marketing_slug: program.marketing_slug.clone(),
        excludes_run: false,
    }
}

pub const RUNS: &[RunSpec] = &[
    RunSpec {
        key: "course-v1:MITx+6.00x+2023",
        course: "MITx+6.00x",
        title: "Introduction to Computer Science",
        org: "MITx",
        start_days: Some(-400),
        end_days: Some(-200),
        pacing: PacingType::InstructorPaced,
    },
    RunSpec {
        key: "course-v1:MITx+6.00x+2024",
        course: "MITx+6.00x",
        title: "Introduction to Computer Science",
        org: "MITx",
        start_days: Some(-30),
        end_days: Some(60),
        pacing: PacingType::InstructorPaced,
    },
    RunSpec {
        key: "course-v1:HarvardX+CS50+2024",
        course: "HarvardX+CS50",
        title: "Computer Science Essentials",
        org: "HarvardX",
        start_days: Some(20),
        end_days: Some(120),
        pacing: PacingType::SelfPaced,
    },
    RunSpec {
        key: "course-v1:edX+Testing+2025",
        course: "edX+Testing",
        title: "Software Testing",
        org: "edX",
        start_days: Some(200),
        end_days: None,
        pacing: PacingType::SelfPaced,
    },
    RunSpec {
        key: "course-v1:edX+Data+2025",
        course: "edX+Data",
        title: "Data Science for Everyone",
        org: "edX",
        start_days: None,
        end_days: None,
        pacing: PacingType::InstructorPaced,
    },
];

/// Build a snapshot the way the loader does: runs, then courses, then
/// programs, each added to the trigram index as it is inserted.
pub fn snapshot() -> Snapshot {
    let cs_program = program(1, "Computer Science Foundations", "XSeries", "MITx");
    let data_program = program(2, "Data Science MicroMasters", "MicroMasters", "edX");

    let mut docs = DocTable::new();
    let mut trigrams = TrigramIndex::new();
    let mut add = |docs: &mut DocTable, doc: Document| {
        let text = doc.typeahead_text();
        let id = docs.insert(doc);
        trigrams.add(id, &text);
        id
    };

    let mut course_runs: Vec<(&str, Vec<_>)> = Vec::new();
    for spec in RUNS {
        let programs = match spec.course {
            "MITx+6.00x" | "HarvardX+CS50" => vec![program_ref(&cs_program)],
            "edX+Data" => vec![program_ref(&data_program)],
            _ => Vec::new(),
        };
        let id = add(&mut docs, Document::CourseRun(run(spec, programs)));
        match course_runs.iter_mut().find(|(course, _)| *course == spec.course) {
            Some((_, ids)) => ids.push(id),
            None => course_runs.push((spec.course, vec![id])),
        }
    }

    for (course_key, runs) in course_runs {
        let spec = RUNS
            .iter()
            .find(|s| s.course == course_key)
            .expect("course has a run");
        let course = CourseDoc {
            uuid: course_uuid(course_key),
            key: course_key.to_string(),
            title: spec.title.to_string(),
            short_description: None,
            level_type: Some("Introductory".to_string()),
            marketing_url: None,
            partner: "edx".to_string(),
            organizations: vec![org(spec.org)],
            runs,
            programs: Vec::new(),
        };
        add(&mut docs, Document::Course(course));
    }

    add(&mut docs, Document::Program(cs_program));
    add(&mut docs, Document::Program(data_program));

    Snapshot {
        docs,
        trigrams,
        synonyms: Synonyms::new(&[vec!["cs".to_string(), "computer".to_string()]]),
    }
}
