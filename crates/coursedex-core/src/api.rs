//! Wire payloads of the HTTP API.
//!
//! Shared by the server (which renders them) and the CLI (which prints them).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Page-number pagination envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub key: String,
    pub name: String,
}

/// Program reference embedded in course run and course payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub uuid: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub program_type: String,
    pub status: String,
    pub marketing_slug: Option<String>,
}

/// Course run as returned by list searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRunSearch {
    pub key: String,
    pub title: String,
    pub short_description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub enrollment_start: Option<DateTime<Utc>>,
    pub enrollment_end: Option<DateTime<Utc>>,
    pub pacing_type: String,
    pub language: Option<String>,
    /// First authoring organization key.
    pub org: Option<String>,
    pub authoring_organizations: Vec<String>,
    pub partner: String,
    pub availability: String,
    pub marketing_url: Option<String>,
    pub content_type: String,
    pub aggregation_key: String,
    pub program_types: Vec<String>,
}

/// Course run as returned by the detailed search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRunSearchDetail {
    #[serde(flatten)]
    pub run: CourseRunSearch,
    pub course: String,
    pub course_uuid: Uuid,
    pub status: String,
    pub hidden: bool,
    pub seat_types: Vec<String>,
    pub level_type: Option<String>,
    pub programs: Vec<ProgramSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSearch {
    pub uuid: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    #[serde(rename = "type")]
    pub program_type: String,
    pub status: String,
    pub hidden: bool,
    pub partner: String,
    pub marketing_slug: Option<String>,
    pub authoring_organizations: Vec<OrganizationSummary>,
    pub content_type: String,
    pub aggregation_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSearch {
    pub uuid: Uuid,
    pub key: String,
    pub title: String,
    pub short_description: Option<String>,
    pub level_type: Option<String>,
    pub partner: String,
    pub authoring_organizations: Vec<String>,
    pub content_type: String,
    pub aggregation_key: String,
}

/// One result of an aggregate search; the variant is visible through `content_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateResult {
    CourseRun(CourseRunSearch),
    Program(ProgramSearch),
    Course(CourseSearch),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFacetBucket {
    pub text: String,
    pub count: usize,
    pub narrow_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFacetCount {
    pub count: usize,
    pub narrow_url: String,
}

/// Faceted search response: paginated hits plus facet counts over all hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetedResponse<T> {
    pub objects: Page<T>,
    pub fields: BTreeMap<String, Vec<FieldFacetBucket>>,
    pub queries: BTreeMap<String, QueryFacetCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeaheadCourseRun {
    pub key: String,
    pub title: String,
    pub orgs: Vec<String>,
    pub marketing_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeaheadProgram {
    pub uuid: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub program_type: String,
    pub orgs: Vec<String>,
    pub marketing_slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeaheadResponse {
    pub course_runs: Vec<TypeaheadCourseRun>,
    pub programs: Vec<TypeaheadProgram>,
}

/// Course run embedded in a course resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRunSummary {
    pub key: String,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub enrollment_start: Option<DateTime<Utc>>,
    pub enrollment_end: Option<DateTime<Utc>>,
    pub status: String,
    pub hidden: bool,
    pub pacing_type: String,
    pub seat_types: Vec<String>,
    pub marketing_url: Option<String>,
    pub availability: String,
}

/// Course resource with its runs and programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    pub key: String,
    pub uuid: Uuid,
    pub title: String,
    pub short_description: Option<String>,
    pub level_type: Option<String>,
    pub marketing_url: Option<String>,
    pub partner: String,
    pub owners: Vec<OrganizationSummary>,
    pub course_runs: Vec<CourseRunSummary>,
    pub programs: Vec<ProgramSummary>,
}

/// Index statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub documents: usize,
    pub course_runs: usize,
    pub courses: usize,
    pub programs: usize,
    pub trigram_count: usize,
    pub last_updated: i64,
    pub reindexing: bool,
    pub version: String,
    pub git_sha: String,
}

/// Error body in the `{"detail": "..."}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
