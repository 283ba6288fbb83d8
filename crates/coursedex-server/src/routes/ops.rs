//! Health, status, and reindex.

use crate::error::ApiError;
use crate::params::Params;
use crate::state::{AppState, Reindex};
use axum::extract::{Query, State};
use axum::Json;
use coursedex_core::api::StatusResponse;
use coursedex_core::build_info::BUILD_INFO;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": BUILD_INFO.version }))
}

pub async fn status(State(app): State<AppState>) -> Json<StatusResponse> {
    Json(app.read().status())
}

/// Rebuild the index from the catalog directory. `dry_run=1` reports the
/// document count without replacing the served index.
pub async fn reindex(
    State(app): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let dry_run = Params::new(pairs).flag("dry_run");
    let outcome = tokio::task::spawn_blocking(move || app.reindex(dry_run))
        .await
        .map_err(|e| ApiError::Internal(format!("reindex task failed: {e}")))??;

    match outcome {
        Reindex::Completed { documents } => Ok(Json(json!({ "documents": documents }))),
        Reindex::AlreadyRunning => Err(ApiError::Conflict(
            "A reindex is already running.".to_string(),
        )),
    }
}
