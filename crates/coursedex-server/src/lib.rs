//! coursedex-server: HTTP API over the catalog index.

mod auth;
pub mod error;
pub mod pagination;
pub mod params;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, Reindex, ServerState};

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use routes::{contains, courses, ops, search};
use tracing::info;

/// Build the router. Everything except `/health` requires an API token.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/v1/status", get(ops::status))
        .route("/api/v1/admin/reindex", post(ops::reindex))
        .route(contains::CONTAINS_PATH, get(contains::contains))
        .route(search::COURSE_RUNS_PATH, get(search::course_runs))
        .route(search::COURSE_RUN_DETAILS_PATH, get(search::course_run_details))
        .route(search::COURSE_RUN_FACETS_PATH, get(search::course_run_facets))
        .route(search::ALL_PATH, get(search::all).post(search::all_post))
        .route(
            search::ALL_FACETS_PATH,
            get(search::all_facets).post(search::all_facets_post),
        )
        .route(search::TYPEAHEAD_PATH, get(search::typeahead))
        .route(courses::COURSES_PATH, get(courses::list))
        .route("/api/v1/courses/{*key}", get(courses::detail))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/health", get(ops::health))
        .merge(protected)
        .with_state(state)
}

/// Serve until ctrl-c.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let bind = state.config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("coursedex server listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("coursedex server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
