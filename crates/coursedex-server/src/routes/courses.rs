//! Courses resource.

use super::{links, partner};
use crate::error::ApiError;
use crate::pagination::Pagination;
use crate::params::Params;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use coursedex_core::api::{CourseDetail, Page};
use coursedex_index::{serializers, CourseFilter, Expr};
use uuid::Uuid;

pub const COURSES_PATH: &str = "/api/v1/courses/";

pub async fn list(
    State(app): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Page<CourseDetail>>, ApiError> {
    let params = Params::new(pairs);
    let filter = course_filter(&app, &params)?;
    let pagination = Pagination::from_params(&params, &app.config.server)?;
    let exclude_utm = params.flag("exclude_utm");
    let now = Utc::now();

    let page = app.with_engine(|engine| {
        let views = engine.courses(&filter, now);
        pagination.apply(views, links(&app, &params, COURSES_PATH), |view| {
            serializers::course_detail(&view, now, exclude_utm)
        })
    })?;
    Ok(Json(page))
}

pub async fn detail(
    State(app): State<AppState>,
    Path(key): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CourseDetail>, ApiError> {
    let key = key.trim_end_matches('/');
    if !is_course_key(key) && Uuid::parse_str(key).is_err() {
        return Err(ApiError::not_found());
    }

    let params = Params::new(pairs);
    let filter = course_filter(&app, &params)?;
    let exclude_utm = params.flag("exclude_utm");
    let now = Utc::now();

    app.with_engine(|engine| {
        engine
            .course(key, &filter, now)
            .map(|view| serializers::course_detail(&view, now, exclude_utm))
    })
    .map(Json)
    .ok_or_else(ApiError::not_found)
}

fn course_filter(app: &AppState, params: &Params) -> Result<CourseFilter, ApiError> {
    let query = match params.non_empty("q") {
        Some(raw) => Some(Expr::parse(raw)?),
        None => None,
    };
    Ok(CourseFilter {
        query,
        keys: params.list("keys"),
        partner: Some(partner(app, params)),
        include_hidden_course_runs: params.flag("include_hidden_course_runs"),
        marketable_course_runs_only: params.flag("marketable_course_runs_only"),
        marketable_enrollable_course_runs_with_archived: params
            .flag("marketable_enrollable_course_runs_with_archived"),
        published_course_runs_only: params.flag("published_course_runs_only"),
        include_deleted_programs: params.flag("include_deleted_programs"),
    })
}

/// `org+number` or `org/number`.
fn is_course_key(key: &str) -> bool {
    let mut parts = key.split(['+', '/']);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(org), Some(number), None) => {
            let valid = |s: &str| !s.is_empty() && !s.chars().any(char::is_whitespace);
            valid(org) && valid(number)
        }
        _ => false,
    }
}
