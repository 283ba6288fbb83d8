//! Catalog fixtures written to a temporary directory.

#![allow(dead_code)]

use coursedex_core::Config;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

pub const DEMO_COURSE_UUID: &str = "6f1d3b4c-0d5e-4b8a-9c1e-2a3b4c5d6e7f";
pub const DATA_PROGRAM_UUID: &str = "0b7c9d2e-1f3a-4c5b-8d6e-7f8a9b0c1d2e";

pub fn partners_and_orgs() -> Value {
    json!({
        "partners": [{"short_code": "edx", "name": "edX"}],
        "organizations": [
            {"key": "edX", "name": "edX Inc."},
            {"key": "MITx", "name": "Massachusetts Institute of Technology"}
        ]
    })
}

pub fn courses() -> Value {
    json!({
        "courses": [{
            "uuid": DEMO_COURSE_UUID,
            "key": "edX+DemoX",
            "title": "Demonstration Course",
            "partner": "edx",
            "level_type": "Introductory",
            "authoring_organizations": ["edX"]
        }],
        "course_runs": [
            {
                "key": "course-v1:edX+DemoX+2023",
                "course": "edX+DemoX",
                "start": "2023-01-01T00:00:00Z",
                "end": "2023-06-01T00:00:00Z",
                "seat_types": ["audit"]
            },
            {
                "key": "course-v1:edX+DemoX+2030",
                "course": "edX+DemoX",
                "title": "Demonstration Course: Next Edition",
                "start": "2030-01-01T00:00:00Z",
                "pacing_type": "self_paced",
                "seat_types": ["verified"],
                "authoring_organizations": ["MITx"]
            }
        ]
    })
}

pub fn programs() -> Value {
    json!({
        "programs": [{
            "uuid": DATA_PROGRAM_UUID,
            "title": "Data Demonstrations",
            "program_type": "XSeries",
            "partner": "edx",
            "courses": ["edX+DemoX"],
            "excluded_course_runs": ["course-v1:edX+DemoX+2023"],
            "authoring_organizations": ["edX"]
        }]
    })
}

pub fn write_json(dir: &Path, relative: &str, value: &Value) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create catalog subdirectory");
    }
    std::fs::write(&path, serde_json::to_vec_pretty(value).expect("serialize fixture"))
        .expect("write catalog file");
}

/// A catalog split across nested files, plus a config pointing at it.
pub fn catalog_dir() -> (TempDir, Config) {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = temp.path().join("catalog");
    write_json(&catalog, "00-partners.json", &partners_and_orgs());
    write_json(&catalog, "courses/demo.json", &courses());
    write_json(&catalog, "programs/data.json", &programs());
    std::fs::write(catalog.join("README.md"), "not a catalog file").expect("write readme");

    let config = Config {
        catalog_path: catalog,
        index_path: temp.path().join("index"),
        ..Config::default()
    };
    (temp, config)
}
