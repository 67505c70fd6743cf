// src/api/cache.rs
//! Single-slot time-to-live cache for API reads.

use bevy::log::debug;
use std::time::{Duration, Instant};

use super::error::ApiResult;

pub const MIN_TTL_SECS: u64 = 5;
pub const MAX_TTL_SECS: u64 = 86_400;

/// Effective TTL: clamped to `MIN_TTL_SECS..=MAX_TTL_SECS`, or the minimum
/// when running in debug mode.
pub fn cache_ttl(secs: u64, debug: bool) -> Duration {
    if debug {
        return Duration::from_secs(MIN_TTL_SECS);
    }
    Duration::from_secs(secs.clamp(MIN_TTL_SECS, MAX_TTL_SECS))
}

#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    label: &'static str,
    ttl: Duration,
    entry: Option<(Instant, T)>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(label: &'static str, ttl_secs: u64, debug: bool) -> Self {
        Self {
            label,
            ttl: cache_ttl(ttl_secs, debug),
            entry: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get_at(&self, now: Instant) -> Option<&T> {
        match &self.entry {
            Some((stored, value)) if now.saturating_duration_since(*stored) < self.ttl => Some(value),
            _ => None,
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.get_at(Instant::now())
    }

    pub fn store_at(&mut self, now: Instant, value: T) {
        self.entry = Some((now, value));
    }

    /// Returns the cached value while fresh, otherwise runs `fetch`.
    /// Failed fetches are not cached.
    pub fn get_or_fetch<F>(&mut self, fetch: F) -> ApiResult<T>
    where
        F: FnOnce() -> ApiResult<T>,
    {
        let now = Instant::now();
        if let Some(value) = self.get_at(now) {
            return Ok(value.clone());
        }
        let value = fetch()?;
        self.store_at(now, value.clone());
        Ok(value)
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("Cache '{}' invalidated", self.label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;

    #[test]
    fn test_ttl_is_clamped() {
        assert_eq!(cache_ttl(1, false), Duration::from_secs(5));
        assert_eq!(cache_ttl(60, false), Duration::from_secs(60));
        assert_eq!(cache_ttl(1_000_000, false), Duration::from_secs(86_400));
        assert_eq!(cache_ttl(3600, true), Duration::from_secs(5));
    }

    #[test]
    fn test_fetches_once_while_fresh() {
        let mut cache = TtlCache::new("test", 60, false);
        let mut calls = 0;
        for _ in 0..3 {
            let v = cache
                .get_or_fetch(|| {
                    calls += 1;
                    Ok(vec![1, 2])
                })
                .unwrap();
            assert_eq!(v, vec![1, 2]);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_expiry_and_invalidate() {
        let mut cache = TtlCache::new("test", 60, false);
        let start = Instant::now();
        cache.store_at(start, 7);
        assert_eq!(cache.get_at(start + Duration::from_secs(59)), Some(&7));
        assert_eq!(cache.get_at(start + Duration::from_secs(60)), None);
        cache.invalidate();
        assert_eq!(cache.get_at(start), None);
    }

    #[test]
    fn test_failed_fetch_not_cached() {
        let mut cache: TtlCache<i32> = TtlCache::new("test", 60, false);
        assert!(cache.get_or_fetch(|| Err(ApiError::MissingSchema)).is_err());
        assert_eq!(cache.get_or_fetch(|| Ok(3)).unwrap(), 3);
    }
}
