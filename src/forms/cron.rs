// src/forms/cron.rs
//! Conversions for the `publish_schedule` field, which is stored as a daily
//! cron expression (`"M H * * *"`) but edited as an `HH:MM` time.

use bevy::log::warn;
use chrono::{NaiveTime, Timelike};

use super::error::{FormError, FormResult};
use super::field_value::FieldValue;

/// Field that is stored as cron and edited as a time.
pub const PUBLISH_SCHEDULE_FIELD: &str = "publish_schedule";
/// Fallback when the stored schedule is empty or unreadable (08:30 daily).
pub const DEFAULT_PUBLISH_SCHEDULE: &str = "30 8 * * *";

/// Parses the leading `HH:MM` of a time string (`"8:30"`, `"08:30:00"`).
pub fn parse_time_prefix(s: &str) -> FormResult<NaiveTime> {
    let mut parts = s.trim().split(':');
    let (Some(h), Some(m)) = (parts.next(), parts.next()) else {
        return Err(FormError::InvalidTime(s.to_string()));
    };
    let hour: u32 = h.trim().parse().map_err(|_| FormError::InvalidTime(s.to_string()))?;
    let minute: u32 = m.trim().parse().map_err(|_| FormError::InvalidTime(s.to_string()))?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| FormError::InvalidTime(s.to_string()))
}

/// Reads the minute and hour fields of a daily cron expression.
pub fn cron_to_time(expr: &str) -> FormResult<NaiveTime> {
    let mut fields = expr.split_whitespace();
    let (Some(m), Some(h)) = (fields.next(), fields.next()) else {
        return Err(FormError::InvalidCron(expr.to_string()));
    };
    let minute: u32 = m.parse().map_err(|_| FormError::InvalidCron(expr.to_string()))?;
    let hour: u32 = h.parse().map_err(|_| FormError::InvalidCron(expr.to_string()))?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| FormError::InvalidCron(expr.to_string()))
}

/// Like [`cron_to_time`], but an empty, `"None"` or malformed schedule yields
/// the time of [`DEFAULT_PUBLISH_SCHEDULE`].
pub fn cron_to_time_or_default(expr: &str) -> NaiveTime {
    let trimmed = expr.trim();
    if trimmed.is_empty() || trimmed == "None" {
        return default_publish_time();
    }
    cron_to_time(trimmed).unwrap_or_else(|e| {
        warn!("{}; using default schedule '{}'", e, DEFAULT_PUBLISH_SCHEDULE);
        default_publish_time()
    })
}

pub fn default_publish_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 30, 0).unwrap_or(NaiveTime::MIN)
}

pub fn time_to_cron_expr(time: NaiveTime) -> String {
    format!("{} {} * * *", time.minute(), time.hour())
}

/// Converts an `HH:MM` string to a daily cron expression. Strings without a
/// `:` are assumed to already be cron and pass through unchanged.
pub fn time_to_cron(value: &str) -> String {
    if !value.contains(':') {
        return value.to_string();
    }
    match parse_time_prefix(value) {
        Ok(time) => time_to_cron_expr(time),
        Err(e) => {
            warn!("{}; using default schedule '{}'", e, DEFAULT_PUBLISH_SCHEDULE);
            DEFAULT_PUBLISH_SCHEDULE.to_string()
        }
    }
}

/// Converts a decoded schedule value back to cron. Values that are neither
/// text nor time are returned unchanged.
pub fn schedule_value_to_cron(value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::Time(t) => FieldValue::Text(time_to_cron_expr(*t)),
        FieldValue::Text(s) => FieldValue::Text(time_to_cron(s)),
        other => other.clone(),
    }
}

/// Display form of a stored schedule (`"30 8 * * *"` becomes 08:30).
pub fn schedule_value_to_time(value: &FieldValue) -> NaiveTime {
    match value {
        FieldValue::Time(t) => *t,
        FieldValue::Text(s) => cron_to_time_or_default(s),
        _ => default_publish_time(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_cron_to_time() {
        assert_eq!(cron_to_time("30 8 * * *"), Ok(hm(8, 30)));
        assert_eq!(cron_to_time("15 14 * * *"), Ok(hm(14, 15)));
        assert!(cron_to_time("* * * * *").is_err());
        assert!(cron_to_time("30").is_err());
        assert!(cron_to_time("70 8 * * *").is_err());
    }

    #[test]
    fn test_malformed_schedule_falls_back() {
        assert_eq!(cron_to_time_or_default(""), hm(8, 30));
        assert_eq!(cron_to_time_or_default("None"), hm(8, 30));
        assert_eq!(cron_to_time_or_default("every day"), hm(8, 30));
        assert_eq!(cron_to_time_or_default("0 21 * * *"), hm(21, 0));
    }

    #[test]
    fn test_time_to_cron() {
        assert_eq!(time_to_cron("14:15"), "15 14 * * *");
        assert_eq!(time_to_cron("08:30:00"), "30 8 * * *");
        assert_eq!(time_to_cron("30 8 * * *"), "30 8 * * *");
        assert_eq!(time_to_cron("ab:cd"), DEFAULT_PUBLISH_SCHEDULE);
    }

    #[test]
    fn test_schedule_round_trip() {
        let shown = schedule_value_to_time(&FieldValue::text("30 8 * * *"));
        assert_eq!(shown.format("%H:%M").to_string(), "08:30");
        let edited = FieldValue::Time(hm(14, 15));
        assert_eq!(schedule_value_to_cron(&edited), FieldValue::text("15 14 * * *"));
        // Already wire-encoded by encode_for_wire
        assert_eq!(schedule_value_to_cron(&FieldValue::text("14:15")), FieldValue::text("15 14 * * *"));
    }

    #[test]
    fn test_parse_time_prefix() {
        assert_eq!(parse_time_prefix("8:30"), Ok(hm(8, 30)));
        assert_eq!(parse_time_prefix("23:59:59"), Ok(hm(23, 59)));
        assert!(parse_time_prefix("25:00").is_err());
        assert!(parse_time_prefix("noon").is_err());
    }
}
