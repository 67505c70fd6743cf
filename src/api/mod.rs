// src/api/mod.rs

pub mod batch;
pub mod cache;
pub mod client;
pub mod error;
#[cfg(test)]
pub mod mock;
pub mod platforms;
pub mod tips;

pub use batch::{BatchReport, RowChanges};
pub use client::{ApiBackend, ApiClient, ApiResponse, HttpMethod};
pub use error::{ApiError, ApiResult};
pub use platforms::{PlatformAction, PlatformStore};
pub use tips::{TipBucket, TipsStore};
