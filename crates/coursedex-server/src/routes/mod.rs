//! Request handlers.

pub mod contains;
pub mod courses;
pub mod ops;
pub mod search;

use crate::error::ApiError;
use crate::params::Params;
use crate::state::AppState;
use coursedex_index::Expr;

/// The requested partner, or the configured default.
fn partner(app: &AppState, params: &Params) -> String {
    params
        .non_empty("partner")
        .map_or_else(|| app.config.server.default_partner.clone(), str::to_string)
}

/// Parse a query-language parameter. Absent or blank matches everything.
fn query(params: &Params, name: &str) -> Result<Expr, ApiError> {
    match params.non_empty(name) {
        None => Ok(Expr::All),
        Some(raw) => Ok(Expr::parse(raw)?),
    }
}

/// Link context for pagination and facet URLs.
fn links<'a>(app: &'a AppState, params: &'a Params, path: &'a str) -> (&'a Params, &'a str, &'a str) {
    (params, app.config.server.public_base_url.as_str(), path)
}
