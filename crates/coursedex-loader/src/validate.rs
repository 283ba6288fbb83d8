//! Referential checks over a merged catalog.

use coursedex_core::{Catalog, Error, Result};
use hashbrown::HashSet;
use std::fmt::Display;
use std::hash::Hash;

/// Check uniqueness and references. Every problem found is reported in one
/// `Error::Catalog`.
pub fn validate(catalog: &Catalog) -> Result<()> {
    let mut problems = Vec::new();

    let partners = unique(
        catalog.partners.iter().map(|p| p.short_code.as_str()),
        "partner",
        &mut problems,
    );
    let organizations = unique(
        catalog.organizations.iter().map(|o| o.key.as_str()),
        "organization",
        &mut problems,
    );
    let courses = unique(
        catalog.courses.iter().map(|c| c.key.as_str()),
        "course key",
        &mut problems,
    );
    unique(catalog.courses.iter().map(|c| c.uuid), "course uuid", &mut problems);
    let runs = unique(
        catalog.course_runs.iter().map(|r| r.key.as_str()),
        "course run",
        &mut problems,
    );
    unique(catalog.programs.iter().map(|p| p.uuid), "program uuid", &mut problems);

    let check_orgs = |owner: &str, keys: &[String], problems: &mut Vec<String>| {
        for key in keys {
            if !organizations.contains(key.as_str()) {
                problems.push(format!("{owner} references unknown organization '{key}'"));
            }
        }
    };

    for course in &catalog.courses {
        let owner = format!("course '{}'", course.key);
        if !partners.contains(course.partner.as_str()) {
            problems.push(format!("{owner} references unknown partner '{}'", course.partner));
        }
        check_orgs(&owner, &course.authoring_organizations, &mut problems);
    }

    for run in &catalog.course_runs {
        let owner = format!("course run '{}'", run.key);
        if !courses.contains(run.course.as_str()) {
            problems.push(format!("{owner} references unknown course '{}'", run.course));
        }
        check_orgs(&owner, &run.authoring_organizations, &mut problems);
    }

    for program in &catalog.programs {
        let owner = format!("program '{}'", program.uuid);
        if !partners.contains(program.partner.as_str()) {
            problems.push(format!("{owner} references unknown partner '{}'", program.partner));
        }
        for course in &program.courses {
            if !courses.contains(course.as_str()) {
                problems.push(format!("{owner} references unknown course '{course}'"));
            }
        }
        for run in &program.excluded_course_runs {
            if !runs.contains(run.as_str()) {
                problems.push(format!("{owner} excludes unknown course run '{run}'"));
            }
        }
        check_orgs(&owner, &program.authoring_organizations, &mut problems);
    }

    if problems.is_empty() {
        return Ok(());
    }
    Err(Error::Catalog(format!(
        "{} problem(s): {}",
        problems.len(),
        problems.join("; ")
    )))
}

/// Collect `items` into a set, recording each duplicate.
fn unique<T: Eq + Hash + Display>(
    items: impl Iterator<Item = T>,
    what: &str,
    problems: &mut Vec<String>,
) -> HashSet<T> {
    let mut seen = HashSet::new();
    for item in items {
        if seen.contains(&item) {
            problems.push(format!("duplicate {what} '{item}'"));
        } else {
            seen.insert(item);
        }
    }
    seen
}
