// src/api/mock.rs
//! Scripted [`ApiBackend`] for tests.

use serde_json::{json, Value};
use std::sync::Mutex;

use super::client::{ApiBackend, ApiResponse, HttpMethod};
use super::error::ApiResult;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub endpoint: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct MockBackend {
    routes: Vec<(HttpMethod, String, ApiResult<ApiResponse>)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, method: HttpMethod, endpoint: &str, status: u16, body: Value) -> Self {
        self.routes.push((
            method,
            endpoint.trim_matches('/').to_string(),
            Ok(ApiResponse::new(status, body.to_string())),
        ));
        self
    }

    pub fn respond_data(self, method: HttpMethod, endpoint: &str, data: Value) -> Self {
        self.respond(method, endpoint, 200, json!({ "data": data }))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: HttpMethod) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.method == method).collect()
    }
}

impl ApiBackend for MockBackend {
    fn send(&self, method: HttpMethod, endpoint: &str, body: Option<&Value>) -> ApiResult<ApiResponse> {
        let endpoint = endpoint.trim_matches('/').to_string();
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            endpoint: endpoint.clone(),
            body: body.cloned(),
        });
        self.routes
            .iter()
            .find(|(m, e, _)| *m == method && *e == endpoint)
            .map(|(_, _, res)| res.clone())
            .unwrap_or_else(|| Ok(ApiResponse::new(200, r#"{"data": {}}"#)))
    }
}
