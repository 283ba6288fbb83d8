//! In-process harness: a temporary catalog, a router over it, and request
//! helpers.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use coursedex_core::Config;
use coursedex_loader::Loader;
use coursedex_server::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TOKEN: &str = "test-token";
pub const BASE_URL: &str = "http://testserver.fake";

pub const DEMO_COURSE: &str = "3f7a1c2e-8b4d-4e6f-9a0b-1c2d3e4f5a6b";
pub const CS_COURSE: &str = "5b6c7d8e-9f0a-4b1c-8d2e-3f4a5b6c7d8e";
pub const CS50_COURSE: &str = "7d8e9f0a-1b2c-4d3e-8f4a-5b6c7d8e9f0a";
pub const PRO_COURSE: &str = "9f0a1b2c-3d4e-4f5a-8b6c-7d8e9f0a1b2c";
pub const CS_PROGRAM: &str = "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d";
pub const DELETED_PROGRAM: &str = "2b3c4d5e-6f7a-4b8c-9d0e-1f2a3b4c5d6e";

pub const DEMO_ARCHIVED: &str = "course-v1:edX+DemoX+Archived";
pub const DEMO_CURRENT: &str = "course-v1:edX+DemoX+Current";
pub const DEMO_HIDDEN: &str = "course-v1:edX+DemoX+Hidden";
pub const CS_SOON: &str = "course-v1:MITx+6.00x+Soon";
pub const CS_DRAFT: &str = "course-v1:MITx+6.00x+Draft";
pub const CS50_UPCOMING: &str = "course-v1:HarvardX+CS50+Upcoming";
pub const PRO_CURRENT: &str = "course-v1:Pro+Lead+Current";

/// RFC 3339 timestamp `days` from now.
fn days(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

pub fn catalog() -> Value {
    json!({
        "partners": [
            {"short_code": "edx", "name": "edX"},
            {"short_code": "mitxpro", "name": "MIT xPRO"}
        ],
        "organizations": [
            {"key": "edX", "name": "edX Inc."},
            {"key": "MITx", "name": "Massachusetts Institute of Technology"},
            {"key": "HarvardX", "name": "Harvard University"}
        ],
        "courses": [
            {
                "uuid": DEMO_COURSE,
                "key": "edX+DemoX",
                "title": "Demonstration Course",
                "partner": "edx",
                "level_type": "Introductory",
                "marketing_url": "https://www.example.com/course/demox?utm_source=edx",
                "authoring_organizations": ["edX"]
            },
            {
                "uuid": CS_COURSE,
                "key": "MITx+6.00x",
                "title": "Introduction to Computer Science",
                "partner": "edx",
                "authoring_organizations": ["MITx"]
            },
            {
                "uuid": CS50_COURSE,
                "key": "HarvardX+CS50",
                "title": "Computer Science for Everyone",
                "partner": "edx",
                "authoring_organizations": ["HarvardX"]
            },
            {
                "uuid": PRO_COURSE,
                "key": "Pro+Lead",
                "title": "Leadership Demonstration",
                "partner": "mitxpro",
                "authoring_organizations": ["MITx"]
            }
        ],
        "course_runs": [
            {
                "key": DEMO_ARCHIVED,
                "course": "edX+DemoX",
                "start": days(-400),
                "end": days(-30),
                "seat_types": ["audit"]
            },
            {
                "key": DEMO_CURRENT,
                "course": "edX+DemoX",
                "start": days(-10),
                "end": days(80),
                "enrollment_end": days(30),
                "pacing_type": "self_paced",
                "seat_types": ["verified", "audit"],
                "marketing_url": "https://www.example.com/course/demox-current?utm_source=edx"
            },
            {
                "key": DEMO_HIDDEN,
                "course": "edX+DemoX",
                "start": days(100),
                "hidden": true,
                "seat_types": ["verified"]
            },
            {
                "key": CS_SOON,
                "course": "MITx+6.00x",
                "start": days(20),
                "seat_types": ["verified"]
            },
            {
                "key": CS_DRAFT,
                "course": "MITx+6.00x",
                "start": days(200),
                "status": "unpublished"
            },
            {
                "key": CS50_UPCOMING,
                "course": "HarvardX+CS50",
                "start": days(200),
                "language": "es",
                "seat_types": ["audit"]
            },
            {
                "key": PRO_CURRENT,
                "course": "Pro+Lead",
                "start": days(-5),
                "seat_types": ["professional"]
            }
        ],
        "programs": [
            {
                "uuid": CS_PROGRAM,
                "title": "Computer Science Essentials",
                "program_type": "XSeries",
                "partner": "edx",
                "courses": ["MITx+6.00x", "HarvardX+CS50"],
                "authoring_organizations": ["MITx"],
                "marketing_slug": "cs-essentials"
            },
            {
                "uuid": DELETED_PROGRAM,
                "title": "Retired Demonstration Track",
                "program_type": "MicroMasters",
                "status": "deleted",
                "partner": "edx",
                "courses": ["edX+DemoX"],
                "authoring_organizations": ["edX"]
            }
        ]
    })
}

pub struct Harness {
    _temp: TempDir,
    pub catalog_path: PathBuf,
    pub state: AppState,
    router: Router,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let catalog_path = temp.path().join("catalog");
        write_json(&catalog_path, "catalog.json", &catalog());

        let mut config = Config {
            catalog_path: catalog_path.clone(),
            index_path: temp.path().join("index"),
            ..Config::default()
        };
        config.server.public_base_url = BASE_URL.to_string();
        config.server.api_tokens = vec![TOKEN.to_string()];
        config.server.worker_threads = 1;
        customize(&mut config);

        let snapshot = Loader::new(config.clone()).rebuild().expect("build index");
        let state = AppState::new(config, snapshot);
        let router = build_router(state.clone());

        Self {
            _temp: temp,
            catalog_path,
            state,
            router,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, body)
    }

    /// Authenticated GET of `path` with form-encoded `params`.
    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> (StatusCode, Value) {
        self.send(authorized(Method::GET, &with_query(path, params), Body::empty()))
            .await
    }

    /// Authenticated POST of a JSON body.
    pub async fn post_json(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let mut request = authorized(Method::POST, path, Body::from(body.to_string()));
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        self.send(request).await
    }

    pub async fn post(&self, path: &str, params: &[(&str, &str)]) -> (StatusCode, Value) {
        self.send(authorized(Method::POST, &with_query(path, params), Body::empty()))
            .await
    }

    /// GET without credentials.
    pub async fn get_anonymous(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .expect("build request");
        self.send(request).await
    }
}

pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{path}?{query}")
}

fn authorized(method: Method, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Token {TOKEN}"))
        .body(body)
        .expect("build request")
}

pub fn write_json(dir: &Path, relative: &str, value: &Value) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create catalog directory");
    }
    std::fs::write(&path, serde_json::to_vec_pretty(value).expect("serialize fixture"))
        .expect("write catalog file");
}

/// Field of every result, in order.
pub fn column(body: &Value, field: &str) -> Vec<String> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|r| r[field].as_str().unwrap_or_default().to_string())
        .collect()
}
