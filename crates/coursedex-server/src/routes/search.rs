//! Course run, aggregate, and typeahead search.

use super::{links, partner, query};
use crate::error::ApiError;
use crate::pagination::Pagination;
use crate::params::Params;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use coursedex_core::api::{
    AggregateResult, CourseRunSearch, CourseRunSearchDetail, FacetedResponse, FieldFacetBucket,
    Page, QueryFacetCount, TypeaheadResponse,
};
use coursedex_core::Availability;
use coursedex_index::{
    serializers, ContentType, Document, FacetField, Hit, Ordering, RunDoc, SearchEngine,
    SearchRequest, SelectedFacet,
};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

pub const COURSE_RUNS_PATH: &str = "/api/v1/search/course_runs/";
pub const COURSE_RUN_DETAILS_PATH: &str = "/api/v1/search/course_runs/details/";
pub const COURSE_RUN_FACETS_PATH: &str = "/api/v1/search/course_runs/facets/";
pub const ALL_PATH: &str = "/api/v1/search/all/";
pub const ALL_FACETS_PATH: &str = "/api/v1/search/all/facets/";
pub const TYPEAHEAD_PATH: &str = "/api/v1/search/typeahead/";

type Pairs = Query<Vec<(String, String)>>;

pub async fn course_runs(
    State(app): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<Page<CourseRunSearch>>, ApiError> {
    let params = Params::new(pairs);
    let request = course_run_request(&app, &params)?;
    let pagination = Pagination::from_params(&params, &app.config.server)?;
    let now = Utc::now();

    let page = app.with_engine(|engine| {
        let hits = engine.search(&request, now);
        pagination.apply(runs(&hits), links(&app, &params, COURSE_RUNS_PATH), |run| {
            serializers::course_run(run, now)
        })
    })?;
    Ok(Json(page))
}

pub async fn course_run_details(
    State(app): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<Page<CourseRunSearchDetail>>, ApiError> {
    let params = Params::new(pairs);
    let request = course_run_request(&app, &params)?;
    let pagination = Pagination::from_params(&params, &app.config.server)?;
    let now = Utc::now();

    let page = app.with_engine(|engine| {
        let hits = engine.search(&request, now);
        pagination.apply(
            runs(&hits),
            links(&app, &params, COURSE_RUN_DETAILS_PATH),
            |run| serializers::course_run_detail(run, now),
        )
    })?;
    Ok(Json(page))
}

pub async fn course_run_facets(
    State(app): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<FacetedResponse<CourseRunSearch>>, ApiError> {
    let params = Params::new(pairs);
    let request = course_run_request(&app, &params)?;
    let pagination = Pagination::from_params(&params, &app.config.server)?;
    let now = Utc::now();
    let (_, base, path) = links(&app, &params, COURSE_RUN_FACETS_PATH);

    let response = app.with_engine(|engine| {
        let hits = engine.search(&request, now);
        let objects = pagination.apply(runs(&hits), (&params, base, path), |run| {
            serializers::course_run(run, now)
        })?;
        Ok::<_, ApiError>(faceted(
            engine,
            &hits,
            FacetField::COURSE_RUN,
            objects,
            (&params, base, path),
            now,
        ))
    })?;
    Ok(Json(response))
}

pub async fn all(
    State(app): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<Page<AggregateResult>>, ApiError> {
    aggregate_page(&app, &Params::new(pairs)).map(Json)
}

pub async fn all_post(
    State(app): State<AppState>,
    Query(pairs): Pairs,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Page<AggregateResult>>, ApiError> {
    let mut params = Params::new(pairs);
    params.extend_from_json(body);
    aggregate_page(&app, &params).map(Json)
}

pub async fn all_facets(
    State(app): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<FacetedResponse<AggregateResult>>, ApiError> {
    aggregate_facets(&app, &Params::new(pairs)).map(Json)
}

pub async fn all_facets_post(
    State(app): State<AppState>,
    Query(pairs): Pairs,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<FacetedResponse<AggregateResult>>, ApiError> {
    let mut params = Params::new(pairs);
    params.extend_from_json(body);
    aggregate_facets(&app, &params).map(Json)
}

pub async fn typeahead(
    State(app): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<TypeaheadResponse>, ApiError> {
    let params = Params::new(pairs);
    let Some(q) = params.non_empty("q") else {
        return Err(ApiError::BadRequest(json!([
            "The 'q' querystring parameter is required for searching."
        ])));
    };
    let partner = partner(&app, &params);
    let search = &app.config.search;
    debug!(q, partner = partner.as_str(), "typeahead");

    let response = app.with_engine(|engine| {
        let hits = engine.typeahead(
            q,
            &partner,
            search.typeahead_result_count,
            search.typeahead_org_boost,
        );
        serializers::typeahead(&hits)
    });
    Ok(Json(response))
}

fn aggregate_page(app: &AppState, params: &Params) -> Result<Page<AggregateResult>, ApiError> {
    let request = aggregate_request(app, params)?;
    let pagination = Pagination::from_params(params, &app.config.server)?;
    let now = Utc::now();

    app.with_engine(|engine| {
        let hits = engine.search(&request, now);
        pagination.apply(hits, links(app, params, ALL_PATH), |hit| {
            serializers::aggregate(hit.doc, now)
        })
    })
}

fn aggregate_facets(
    app: &AppState,
    params: &Params,
) -> Result<FacetedResponse<AggregateResult>, ApiError> {
    let request = aggregate_request(app, params)?;
    let pagination = Pagination::from_params(params, &app.config.server)?;
    let now = Utc::now();
    let links = links(app, params, ALL_FACETS_PATH);

    app.with_engine(|engine| {
        let hits = engine.search(&request, now);
        let objects = pagination.apply(hits.clone(), links, |hit| {
            serializers::aggregate(hit.doc, now)
        })?;
        Ok::<_, ApiError>(faceted(engine, &hits, FacetField::AGGREGATE, objects, links, now))
    })
}

fn course_run_request(app: &AppState, params: &Params) -> Result<SearchRequest, ApiError> {
    let mut request = SearchRequest::course_runs(query(params, "q")?).with_partner(partner(app, params));
    request.selected_facets = selected_facets(params, FacetField::COURSE_RUN)?;
    request.selected_query_facets = selected_query_facets(params)?;
    Ok(request)
}

fn aggregate_request(app: &AppState, params: &Params) -> Result<SearchRequest, ApiError> {
    let mut request = SearchRequest::new(query(params, "q")?).with_partner(partner(app, params));

    let content_types = params.list("content_type");
    if !content_types.is_empty() {
        request.content_types = content_types
            .iter()
            .map(|raw| {
                ContentType::parse(raw).ok_or_else(|| {
                    ApiError::detail(format!("The content type [{raw}] is not valid."))
                })
            })
            .collect::<Result<_, _>>()?;
    }
    request.aggregation_keys = params.list("aggregation_key");
    if let Some(raw) = params.non_empty("ordering") {
        request.ordering = Ordering::parse(raw)
            .ok_or_else(|| ApiError::detail(format!("The ordering [{raw}] is not valid.")))?;
    }
    request.selected_facets = selected_facets(params, FacetField::AGGREGATE)?;
    request.selected_query_facets = selected_query_facets(params)?;
    Ok(request)
}

fn selected_facets(params: &Params, allowed: &[FacetField]) -> Result<Vec<SelectedFacet>, ApiError> {
    params
        .get_all("selected_facets")
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            SelectedFacet::parse(raw)
                .filter(|facet| allowed.contains(&facet.field))
                .ok_or_else(|| ApiError::detail(format!("The selected facet [{raw}] is not valid.")))
        })
        .collect()
}

fn selected_query_facets(params: &Params) -> Result<Vec<Availability>, ApiError> {
    params
        .get_all("selected_query_facets")
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            Availability::from_facet_name(raw.trim()).ok_or_else(|| {
                ApiError::detail(format!("The selected query facet [{raw}] is not valid."))
            })
        })
        .collect()
}

fn runs<'a>(hits: &[Hit<'a>]) -> Vec<&'a RunDoc> {
    hits.iter()
        .filter_map(|hit| match hit.doc {
            Document::CourseRun(run) => Some(run),
            _ => None,
        })
        .collect()
}

/// Wrap a page of results with field and query facet counts over every hit.
fn faceted<T>(
    engine: &SearchEngine<'_>,
    hits: &[Hit<'_>],
    fields: &[FacetField],
    objects: Page<T>,
    links: (&Params, &str, &str),
    now: DateTime<Utc>,
) -> FacetedResponse<T> {
    let (params, base, path) = links;
    let narrow = |name: &str, value: &str| params.url(base, path, &["page"], &[(name, value)]);

    let fields = engine
        .field_facets(hits, fields)
        .into_iter()
        .map(|(field, buckets)| {
            let buckets = buckets
                .into_iter()
                .map(|(text, count)| FieldFacetBucket {
                    narrow_url: narrow(
                        "selected_facets",
                        &SelectedFacet::new(field, text.as_str()).to_param(),
                    ),
                    text,
                    count,
                })
                .collect();
            (field.name().to_string(), buckets)
        })
        .collect();

    let queries: BTreeMap<String, QueryFacetCount> = engine
        .query_facets(hits, now)
        .into_iter()
        .map(|(availability, count)| {
            let name = availability.facet_name();
            (
                name.to_string(),
                QueryFacetCount {
                    count,
                    narrow_url: narrow("selected_query_facets", name),
                },
            )
        })
        .collect();

    FacetedResponse {
        objects,
        fields,
        queries,
    }
}
