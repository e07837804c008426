//! Shared helpers for lostfound-api integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use lostfound_api::detector::Detector;
use lostfound_api::{build_router, AppState, LifecycleCoordinator};
use lostfound_common::config::ClaimPolicy;
use lostfound_common::events::EventBus;
use lostfound_common::models::DetectedObject;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const BOUNDARY: &str = "lostfound-test-boundary";

/// Detector that reports one fixed object and counts its calls
#[derive(Default)]
pub struct FixedDetector {
    pub calls: AtomicUsize,
}

impl FixedDetector {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Detector for FixedDetector {
    fn detect(&self, _image_path: &Path) -> Vec<DetectedObject> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        vec![DetectedObject::from(json!({
            "class": "handbag",
            "confidence": 0.76,
            "bbox": [5, 10, 320, 400]
        }))]
    }
}

/// A router plus the pieces tests want to inspect
pub struct TestApp {
    pub router: axum::Router,
    pub state: AppState,
    pub detector: Arc<FixedDetector>,
    /// Keeps the uploads directory alive for the test's duration
    pub uploads: TempDir,
}

pub fn test_app(policy: ClaimPolicy) -> TestApp {
    let uploads = tempfile::tempdir().expect("create uploads dir");
    let detector = Arc::new(FixedDetector::default());
    let coordinator = LifecycleCoordinator::new(
        EventBus::new(64),
        detector.clone(),
        uploads.path().to_path_buf(),
        policy,
    );
    let state = AppState::new(Arc::new(coordinator), uploads.path().to_path_buf());

    TestApp {
        router: build_router(state.clone()),
        state,
        detector,
        uploads,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a multipart/form-data body from text fields and an optional file
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
