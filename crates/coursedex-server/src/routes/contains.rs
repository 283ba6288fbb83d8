//! Catalog query membership checks.

use super::partner;
use crate::error::ApiError;
use crate::params::Params;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use coursedex_index::Expr;
use serde_json::{json, Map, Value};

pub const CONTAINS_PATH: &str = "/api/v1/catalog-query/contains/";

/// `{identifier: bool}` for every submitted course run id and course uuid.
pub async fn contains(
    State(app): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let params = Params::new(pairs);
    let course_run_ids = params.list("course_run_ids");
    let course_uuids = params.list("course_uuids");
    let has_ids = !course_run_ids.is_empty() || !course_uuids.is_empty();
    let Some(query) = params.non_empty("query").filter(|_| has_ids) else {
        return Err(ApiError::BadRequest(json!(
            "CatalogQueryContains endpoint requires query and identifiers list(s)"
        )));
    };

    let query = Expr::parse(query)?;
    let partner = partner(&app, &params);
    let now = Utc::now();

    let results = app.with_engine(|engine| {
        engine.contains(&query, &partner, &course_run_ids, &course_uuids, now)
    });
    Ok(Json(
        results
            .into_iter()
            .map(|(id, found)| (id, Value::Bool(found)))
            .collect(),
    ))
}
