// src/api/client.rs
//! Client for the admin REST API.
//!
//! Every call is `<METHOD> {base}/{endpoint}` with a bearer token; non-GET
//! verbs carry a JSON body. Calls block the current render cycle. Retries and
//! auth are the server's concern.

use bevy::log::{debug, error};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use super::error::{ApiError, ApiResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const PING_ENDPOINT: &str = "common/ping";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw response: status plus body text. Decoding is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into [`ApiError::Status`].
    pub fn ensure_ok(self) -> ApiResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json(&self, endpoint: &str) -> ApiResult<Value> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// The document itself, or its `data` member when the body is nothing
    /// but a `{"data": {...}}` envelope.
    pub fn document(&self, endpoint: &str) -> ApiResult<Value> {
        match self.json(endpoint)? {
            Value::Object(mut obj) if obj.len() == 1 && obj.get("data").is_some_and(Value::is_object) => {
                Ok(obj.remove("data").unwrap_or_default())
            }
            other => Ok(other),
        }
    }

    /// The top-level `data` member of a successful read.
    pub fn data(&self, endpoint: &str) -> ApiResult<Value> {
        match self.json(endpoint)? {
            Value::Object(mut obj) => obj
                .remove("data")
                .ok_or_else(|| ApiError::MissingData(endpoint.to_string())),
            _ => Err(ApiError::MissingData(endpoint.to_string())),
        }
    }
}

/// The REST boundary. The console only ever talks to the API through this
/// trait, which lets tests script responses.
pub trait ApiBackend: Send + Sync {
    fn send(&self, method: HttpMethod, endpoint: &str, body: Option<&Value>) -> ApiResult<ApiResponse>;

    fn get(&self, endpoint: &str) -> ApiResult<ApiResponse> {
        self.send(HttpMethod::Get, endpoint, None)
    }

    fn post(&self, endpoint: &str, body: &Value) -> ApiResult<ApiResponse> {
        self.send(HttpMethod::Post, endpoint, Some(body))
    }

    fn patch(&self, endpoint: &str, body: &Value) -> ApiResult<ApiResponse> {
        self.send(HttpMethod::Patch, endpoint, Some(body))
    }

    fn delete(&self, endpoint: &str) -> ApiResult<ApiResponse> {
        self.send(HttpMethod::Delete, endpoint, None)
    }

    /// True when the server answers its ping with a success status.
    fn ping(&self) -> bool {
        match self.get(PING_ENDPOINT) {
            Ok(res) => res.is_success(),
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }
}

/// Blocking HTTP implementation of [`ApiBackend`].
pub struct ApiClient {
    base_url: String,
    token: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> ApiResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: base_url.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_matches('/'))
    }
}

impl ApiBackend for ApiClient {
    fn send(&self, method: HttpMethod, endpoint: &str, body: Option<&Value>) -> ApiResult<ApiResponse> {
        let url = self.url(endpoint);
        debug!("{} {}", method, url);
        let request = match method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
            HttpMethod::Put => self.http.put(&url),
            HttpMethod::Patch => self.http.patch(&url),
            HttpMethod::Delete => self.http.delete(&url),
        };
        let mut request = request.bearer_auth(&self.token);
        if method != HttpMethod::Get {
            if let Some(body) = body {
                request = request.json(body);
            }
        }
        let transport_err = |e: reqwest::Error| ApiError::Transport {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        };
        let response = request.send().map_err(transport_err)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_err)?;
        Ok(ApiResponse { status, body })
    }
}
