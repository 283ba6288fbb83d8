//! Denormalize a validated catalog into index documents.

use coursedex_core::model::{Course, CourseRun, Program};
use coursedex_core::Catalog;
use coursedex_index::{
    CourseDoc, DocTable, Document, OrgRef, ProgramDoc, ProgramRef, RunDoc, TrigramIndex,
};
use hashbrown::HashMap;
use tracing::debug;

/// Build the document table and trigram index.
///
/// Each course's runs are inserted before the course itself, and documents
/// reach the trigram index in id order.
pub fn build_documents(catalog: &Catalog) -> (DocTable, TrigramIndex) {
    let org_names: HashMap<&str, &str> = catalog
        .organizations
        .iter()
        .map(|o| (o.key.as_str(), o.name.as_str()))
        .collect();
    let orgs = |keys: &[String]| -> Vec<OrgRef> {
        keys.iter()
            .map(|key| OrgRef {
                key: key.clone(),
                name: org_names.get(key.as_str()).copied().unwrap_or_default().to_string(),
            })
            .collect()
    };

    let mut runs_by_course: HashMap<&str, Vec<&CourseRun>> = HashMap::new();
    for run in &catalog.course_runs {
        runs_by_course.entry(run.course.as_str()).or_default().push(run);
    }
    let mut programs_by_course: HashMap<&str, Vec<&Program>> = HashMap::new();
    for program in &catalog.programs {
        for course in &program.courses {
            programs_by_course.entry(course.as_str()).or_default().push(program);
        }
    }

    let mut docs = DocTable::new();
    let mut trigram_index = TrigramIndex::new();
    let mut insert = |doc: Document| {
        let text = doc.typeahead_text();
        let id = docs.insert(doc);
        trigram_index.add(id, &text);
        id
    };

    for course in &catalog.courses {
        let programs = programs_by_course
            .get(course.key.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let course_orgs = orgs(&course.authoring_organizations);

        let run_ids = runs_by_course
            .get(course.key.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|run| {
                let run_orgs = if run.authoring_organizations.is_empty() {
                    course_orgs.clone()
                } else {
                    orgs(&run.authoring_organizations)
                };
                insert(Document::CourseRun(run_doc(course, run, run_orgs, programs)))
            })
            .collect();

        insert(Document::Course(CourseDoc {
            uuid: course.uuid,
            key: course.key.clone(),
            title: course.title.clone(),
            short_description: course.short_description.clone(),
            level_type: course.level_type.clone(),
            marketing_url: course.marketing_url.clone(),
            partner: course.partner.clone(),
            organizations: course_orgs,
            runs: run_ids,
            programs: programs.iter().map(|p| program_ref(p, None)).collect(),
        }));
    }

    for program in &catalog.programs {
        insert(Document::Program(ProgramDoc {
            uuid: program.uuid,
            title: program.title.clone(),
            subtitle: program.subtitle.clone(),
            program_type: program.program_type.clone(),
            status: program.status,
            hidden: program.hidden,
            partner: program.partner.clone(),
            marketing_slug: program.marketing_slug.clone(),
            organizations: orgs(&program.authoring_organizations),
            courses: program.courses.clone(),
        }));
    }

    debug!(
        documents = docs.len(),
        trigrams = trigram_index.trigram_count(),
        "documents built"
    );
    (docs, trigram_index)
}

fn run_doc(course: &Course, run: &CourseRun, organizations: Vec<OrgRef>, programs: &[&Program]) -> RunDoc {
    RunDoc {
        key: run.key.clone(),
        course_key: course.key.clone(),
        course_uuid: course.uuid,
        title: run.title.clone().unwrap_or_else(|| course.title.clone()),
        short_description: run
            .short_description
            .clone()
            .or_else(|| course.short_description.clone()),
        start: run.start,
        end: run.end,
        enrollment_start: run.enrollment_start,
        enrollment_end: run.enrollment_end,
        status: run.status,
        hidden: run.hidden,
        pacing_type: run.pacing_type,
        language: run.language.clone(),
        seat_types: run.seat_types.clone(),
        marketing_url: run.marketing_url.clone(),
        level_type: course.level_type.clone(),
        partner: course.partner.clone(),
        organizations,
        programs: programs.iter().map(|p| program_ref(p, Some(run.key.as_str()))).collect(),
    }
}

fn program_ref(program: &Program, run_key: Option<&str>) -> ProgramRef {
    ProgramRef {
        uuid: program.uuid,
        title: program.title.clone(),
        program_type: program.program_type.clone(),
        status: program.status,
        marketing_slug: program.marketing_slug.clone(),
        excludes_run: run_key
            .is_some_and(|key| program.excluded_course_runs.iter().any(|r| r == key)),
    }
}
