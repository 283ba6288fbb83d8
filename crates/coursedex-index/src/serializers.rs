//! Conversion of indexed documents into API payloads.

use crate::document::{CourseDoc, Document, OrgRef, ProgramDoc, ProgramRef, RunDoc};
use crate::engine::{CourseView, TypeaheadHits};
use chrono::{DateTime, Utc};
use coursedex_core::api::{
    AggregateResult, CourseDetail, CourseRunSearch, CourseRunSearchDetail, CourseRunSummary,
    CourseSearch, OrganizationSummary, ProgramSearch, ProgramSummary, TypeaheadCourseRun,
    TypeaheadProgram, TypeaheadResponse,
};

pub fn course_run(run: &RunDoc, now: DateTime<Utc>) -> CourseRunSearch {
    let org_keys = run.org_keys();
    CourseRunSearch {
        key: run.key.clone(),
        title: run.title.clone(),
        short_description: run.short_description.clone(),
        start: run.start,
        end: run.end,
        enrollment_start: run.enrollment_start,
        enrollment_end: run.enrollment_end,
        pacing_type: run.pacing_type.as_str().to_string(),
        language: run.language.clone(),
        org: org_keys.first().cloned(),
        authoring_organizations: org_keys,
        partner: run.partner.clone(),
        availability: run.availability(now).label().to_string(),
        marketing_url: run.marketing_url.clone(),
        content_type: "courserun".to_string(),
        aggregation_key: format!("courserun:{}", run.course_key),
        program_types: run.program_types(),
    }
}

pub fn course_run_detail(run: &RunDoc, now: DateTime<Utc>) -> CourseRunSearchDetail {
    CourseRunSearchDetail {
        run: course_run(run, now),
        course: run.course_key.clone(),
        course_uuid: run.course_uuid,
        status: run.status.as_str().to_string(),
        hidden: run.hidden,
        seat_types: run.seat_types.clone(),
        level_type: run.level_type.clone(),
        programs: run.available_programs().map(program_summary).collect(),
    }
}

pub fn program(program: &ProgramDoc) -> ProgramSearch {
    ProgramSearch {
        uuid: program.uuid,
        title: program.title.clone(),
        subtitle: program.subtitle.clone(),
        program_type: program.program_type.clone(),
        status: program.status.as_str().to_string(),
        hidden: program.hidden,
        partner: program.partner.clone(),
        marketing_slug: program.marketing_slug.clone(),
        authoring_organizations: program.organizations.iter().map(organization).collect(),
        content_type: "program".to_string(),
        aggregation_key: format!("program:{}", program.uuid),
    }
}

pub fn course(course: &CourseDoc) -> CourseSearch {
    CourseSearch {
        uuid: course.uuid,
        key: course.key.clone(),
        title: course.title.clone(),
        short_description: course.short_description.clone(),
        level_type: course.level_type.clone(),
        partner: course.partner.clone(),
        authoring_organizations: course.organizations.iter().map(|o| o.key.clone()).collect(),
        content_type: "course".to_string(),
        aggregation_key: format!("course:{}", course.key),
    }
}

/// Serialize a hit of the aggregate search by its content type.
pub fn aggregate(doc: &Document, now: DateTime<Utc>) -> AggregateResult {
    match doc {
        Document::CourseRun(run) => AggregateResult::CourseRun(course_run(run, now)),
        Document::Program(p) => AggregateResult::Program(program(p)),
        Document::Course(c) => AggregateResult::Course(course(c)),
    }
}

pub fn program_summary(program: &ProgramRef) -> ProgramSummary {
    ProgramSummary {
        uuid: program.uuid,
        title: program.title.clone(),
        program_type: program.program_type.clone(),
        status: program.status.as_str().to_string(),
        marketing_slug: program.marketing_slug.clone(),
    }
}

fn organization(org: &OrgRef) -> OrganizationSummary {
    OrganizationSummary {
        key: org.key.clone(),
        name: org.name.clone(),
    }
}

pub fn typeahead(hits: &TypeaheadHits<'_>) -> TypeaheadResponse {
    TypeaheadResponse {
        course_runs: hits
            .runs
            .iter()
            .map(|run| TypeaheadCourseRun {
                key: run.key.clone(),
                title: run.title.clone(),
                orgs: run.org_keys(),
                marketing_url: run.marketing_url.clone(),
            })
            .collect(),
        programs: hits
            .programs
            .iter()
            .map(|program| TypeaheadProgram {
                uuid: program.uuid,
                title: program.title.clone(),
                program_type: program.program_type.clone(),
                orgs: program.organizations.iter().map(|o| o.key.clone()).collect(),
                marketing_slug: program.marketing_slug.clone(),
            })
            .collect(),
    }
}

/// Serialize a course resource. `exclude_utm` drops the query string of
/// marketing URLs.
pub fn course_detail(view: &CourseView<'_>, now: DateTime<Utc>, exclude_utm: bool) -> CourseDetail {
    let marketing_url = |url: &Option<String>| {
        url.as_deref().map(|u| {
            if exclude_utm {
                strip_query(u).to_string()
            } else {
                u.to_string()
            }
        })
    };

    let course = view.course;
    CourseDetail {
        key: course.key.clone(),
        uuid: course.uuid,
        title: course.title.clone(),
        short_description: course.short_description.clone(),
        level_type: course.level_type.clone(),
        marketing_url: marketing_url(&course.marketing_url),
        partner: course.partner.clone(),
        owners: course.organizations.iter().map(organization).collect(),
        course_runs: view
            .runs
            .iter()
            .map(|run| CourseRunSummary {
                key: run.key.clone(),
                title: run.title.clone(),
                start: run.start,
                end: run.end,
                enrollment_start: run.enrollment_start,
                enrollment_end: run.enrollment_end,
                status: run.status.as_str().to_string(),
                hidden: run.hidden,
                pacing_type: run.pacing_type.as_str().to_string(),
                seat_types: run.seat_types.clone(),
                marketing_url: marketing_url(&run.marketing_url),
                availability: run.availability(now).label().to_string(),
            })
            .collect(),
        programs: view.programs.iter().map(|p| program_summary(p)).collect(),
    }
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}
