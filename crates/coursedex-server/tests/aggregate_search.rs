//! Aggregate search over course runs, programs, and courses.

mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::*;

const ALL: &str = "/api/v1/search/all/";
const ALL_FACETS: &str = "/api/v1/search/all/facets/";

#[tokio::test]
async fn default_results_are_programs_then_course_runs() {
    let harness = Harness::new();
    let (status, body) = harness.get(ALL, &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    assert_eq!(
        column(&body, "content_type"),
        vec!["program", "courserun", "courserun", "courserun", "courserun"]
    );

    let program = &body["results"][0];
    assert_eq!(program["uuid"], CS_PROGRAM);
    assert_eq!(program["type"], "XSeries");
    assert_eq!(program["aggregation_key"], format!("program:{CS_PROGRAM}"));
    assert_eq!(program["authoring_organizations"][0]["key"], "MITx");
    assert_eq!(
        program["authoring_organizations"][0]["name"],
        "Massachusetts Institute of Technology"
    );
}

#[tokio::test]
async fn content_types_and_aggregation_keys() {
    let harness = Harness::new();

    let (_, body) = harness.get(ALL, &[("content_type", "course")]).await;
    assert_eq!(column(&body, "key"), vec!["HarvardX+CS50", "MITx+6.00x", "edX+DemoX"]);

    let (_, body) = harness
        .get(
            ALL,
            &[
                ("content_type", "course"),
                ("aggregation_key", "course:edX+DemoX"),
            ],
        )
        .await;
    assert_eq!(column(&body, "key"), vec!["edX+DemoX"]);

    let (_, body) = harness.get(ALL, &[("content_type", "program,course")]).await;
    assert_eq!(body["count"], 4);

    let (_, body) = harness
        .get(ALL, &[("aggregation_key", "courserun:edX+DemoX")])
        .await;
    assert_eq!(column(&body, "key"), vec![DEMO_ARCHIVED, DEMO_CURRENT]);
}

#[tokio::test]
async fn post_body_matches_query_string() {
    let harness = Harness::new();
    let (status, body) = harness
        .post_json(
            ALL,
            &json!({
                "content_type": "course",
                "aggregation_key": ["course:edX+DemoX", "course:MITx+6.00x"]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["previous"], json!(null));
    assert_eq!(body["next"], json!(null));
    assert_eq!(column(&body, "key"), vec!["MITx+6.00x", "edX+DemoX"]);

    let (status, body) = harness
        .post_json(ALL_FACETS, &json!({"q": "computer", "content_type": ["courserun"]}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["objects"]["count"], 2);
}

#[tokio::test]
async fn ordering_by_start() {
    let harness = Harness::new();

    let (_, body) = harness
        .get(ALL, &[("content_type", "courserun"), ("ordering", "start")])
        .await;
    assert_eq!(
        column(&body, "key"),
        vec![DEMO_ARCHIVED, DEMO_CURRENT, CS_SOON, CS50_UPCOMING]
    );

    let (_, body) = harness
        .get(ALL, &[("content_type", "courserun"), ("ordering", "-start")])
        .await;
    assert_eq!(
        column(&body, "key"),
        vec![CS50_UPCOMING, CS_SOON, DEMO_CURRENT, DEMO_ARCHIVED]
    );
}

#[tokio::test]
async fn relevance_ranks_title_hits_first() {
    let harness = Harness::new();
    let (_, body) = harness.get(ALL, &[("q", "computer")]).await;

    assert_eq!(body["count"], 3);
    assert_eq!(body["results"][0]["content_type"], "program");
    assert_eq!(body["results"][0]["uuid"], CS_PROGRAM);
}

#[tokio::test]
async fn invalid_parameters_are_bad_requests() {
    let harness = Harness::new();

    let (status, body) = harness.get(ALL, &[("content_type", "video")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "The content type [video] is not valid."}));

    let (status, body) = harness.get(ALL, &[("ordering", "title")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "The ordering [title] is not valid."}));
}

#[tokio::test]
async fn facets_cover_content_type_and_program_type() {
    let harness = Harness::new();
    let (status, body) = harness.get(ALL_FACETS, &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["objects"]["count"], 5);
    assert_eq!(
        body["fields"]["content_type"],
        json!([
            {
                "text": "courserun",
                "count": 4,
                "narrow_url": format!("{BASE_URL}{ALL_FACETS}?selected_facets=content_type_exact%3Acourserun")
            },
            {
                "text": "program",
                "count": 1,
                "narrow_url": format!("{BASE_URL}{ALL_FACETS}?selected_facets=content_type_exact%3Aprogram")
            }
        ])
    );
    assert_eq!(body["fields"]["type"][0]["text"], "XSeries");
    assert_eq!(body["queries"]["availability_current"]["count"], 1);

    let (_, body) = harness
        .get(ALL_FACETS, &[("selected_facets", "type_exact:XSeries")])
        .await;
    assert_eq!(body["objects"]["count"], 1);
}
