//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use inkframe::models::{AppConfig, ImageRecord};
use inkframe::server::{build_router, create_app_state_with, AppState};
use inkframe::services::{InMemoryScheduleStore, ScheduleStore};

use super::fixtures;

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
    pub schedule: Arc<InMemoryScheduleStore>,
}

impl TestApp {
    /// Create a new test application with a small display and in-memory state
    pub fn new() -> Self {
        Self::with_config(fixtures::test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let schedule = Arc::new(InMemoryScheduleStore::new());
        let state =
            create_app_state_with(&config, schedule.clone()).expect("Failed to create app state");

        // Build router using shared server module (same as production)
        let router = build_router(state.clone());

        Self {
            router,
            state,
            schedule,
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request without a body
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with a raw binary body
    pub async fn post_bytes(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/octet-stream")
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// Make a PUT request with JSON body
    pub async fn put_json(&self, path: &str, body: &serde_json::Value) -> TestResponse {
        let request = Request::put(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Upload a PNG and return the stored record
    pub async fn upload(&self, name: &str, png: Vec<u8>) -> ImageRecord {
        let response = self
            .post_bytes(&format!("/api/images?name={name}"), png)
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Upload failed: {}",
            response.text()
        );
        response.json()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Check if response is a BMP image
    pub fn is_bmp(&self) -> bool {
        self.body.len() >= 54 && &self.body[0..2] == b"BM"
    }
}
