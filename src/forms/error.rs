// src/forms/error.rs

use thiserror::Error;

/// Failures raised while decoding flat keys, parsing schedule values, or
/// loading a schema. Callers on the decode path log these and fall back to a
/// default instead of aborting the whole payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Flat key '{0}' has an empty path segment")]
    EmptySegment(String),
    #[error("Flat key '{key}' has an invalid list index '{index}'")]
    InvalidListIndex { key: String, index: String },
    #[error("Cannot parse '{0}' as HH:MM")]
    InvalidTime(String),
    #[error("Cannot read hour and minute from cron expression '{0}'")]
    InvalidCron(String),
    #[error("Expected a mapping, got {0}")]
    NotAMapping(String),
}

pub type FormResult<T> = Result<T, FormError>;
