// src/api/error.rs

use thiserror::Error;

use crate::forms::FormError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Request to '{endpoint}' failed: {message}")]
    Transport { endpoint: String, message: String },
    #[error("API returned status code {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid JSON from '{endpoint}': {message}")]
    Decode { endpoint: String, message: String },
    #[error("Response from '{0}' has no 'data' field")]
    MissingData(String),
    #[error("No default schema found")]
    MissingSchema,
    #[error("Record has no '{0}' field")]
    MissingId(String),
    #[error("Invalid payload: {0}")]
    Payload(#[from] FormError),
}

pub type ApiResult<T> = Result<T, ApiError>;
