// src/api/tips.rs
//! Tips: cached listing, date bucketing, and batch edits.

use bevy::log::warn;
use bevy::prelude::Resource;
use chrono::{Days, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use super::batch::{record_id, BatchReport};
use super::cache::TtlCache;
use super::client::ApiBackend;
use super::error::ApiResult;
use super::platforms::fetch_records;
use crate::forms::dict_utils::encode_payload_for_wire;
use crate::forms::field_value::{field_map_to_json, parse_datetime};
use crate::forms::{FieldMap, FieldValue};

pub const TIPS_ENDPOINT: &str = "hunch_club/tips/all";
pub const TIP_ENDPOINT: &str = "hunch_club/tips";
pub const TIPS_TTL_SECS: u64 = 3600;

pub const TIP_ID_FIELD: &str = "_id";
pub const TIP_DATETIME_FIELD: &str = "datetime";
/// Display format of `datetime` once a tip is loaded.
pub const TIP_DATETIME_FORMAT: &str = "%Y-%m-%d, %H:%M";
const TIP_SOURCE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column order of the tip tables.
pub const TIP_COLUMNS: &[&str] = &[
    "datetime",
    "event_type",
    "event_name",
    "participants",
    "selection",
    "odds",
    "free_tips",
    "premium_tip",
    "event_result",
    "bet_result",
];
/// Columns the tables let the user edit.
pub const EDITABLE_TIP_COLUMNS: &[&str] = &["free_tips", "premium_tip", "event_result", "bet_result"];
pub const BET_RESULT_OPTIONS: &[&str] = &["", "Win", "Lose", "Void"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TipBucket {
    Future,
    Tomorrow,
    Today,
    Yesterday,
    Previous,
}

impl TipBucket {
    pub const ALL: [TipBucket; 5] = [
        TipBucket::Future,
        TipBucket::Tomorrow,
        TipBucket::Today,
        TipBucket::Yesterday,
        TipBucket::Previous,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            TipBucket::Future => "Future",
            TipBucket::Tomorrow => "Tomorrow",
            TipBucket::Today => "Today",
            TipBucket::Yesterday => "Yesterday",
            TipBucket::Previous => "Previous",
        }
    }

    /// Bucket of a tip dated `date`, relative to `today`.
    pub fn of(date: NaiveDate, today: NaiveDate) -> Self {
        let tomorrow = today.checked_add_days(Days::new(1));
        let yesterday = today.checked_sub_days(Days::new(1));
        if Some(date) == tomorrow {
            TipBucket::Tomorrow
        } else if date == today {
            TipBucket::Today
        } else if Some(date) == yesterday {
            TipBucket::Yesterday
        } else if date > today {
            TipBucket::Future
        } else {
            TipBucket::Previous
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct TipsStore {
    tips: TtlCache<Vec<FieldMap>>,
}

impl TipsStore {
    pub fn new(debug: bool) -> Self {
        Self {
            tips: TtlCache::new("tips", TIPS_TTL_SECS, debug),
        }
    }

    /// All tips, newest first, ready for display.
    pub fn tips(&mut self, api: &dyn ApiBackend) -> ApiResult<Vec<FieldMap>> {
        self.tips
            .get_or_fetch(|| fetch_records(api, TIPS_ENDPOINT).map(prepare_tips))
    }

    pub fn invalidate(&mut self) {
        self.tips.invalidate();
    }

    pub fn update_tip(&self, api: &dyn ApiBackend, id: &str, row: &FieldMap) -> ApiResult<()> {
        let mut payload = row.clone();
        encode_payload_for_wire(&mut payload);
        let endpoint = format!("{}/{}", TIP_ENDPOINT, id);
        api.patch(&endpoint, &field_map_to_json(&payload))?.ensure_ok()?;
        Ok(())
    }

    /// PATCHes every edited row, keyed by the `_id` of the dataset row it
    /// came from. Never fails; problems are listed in the report.
    pub fn update_tips(
        &mut self,
        api: &dyn ApiBackend,
        edited_rows: &BTreeMap<usize, FieldMap>,
        dataset: &[FieldMap],
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for (&index, row) in edited_rows {
            let Some(original) = dataset.get(index) else {
                report.record_err(format!("Row {} is out of range", index));
                continue;
            };
            let Some(id) = record_id(original, TIP_ID_FIELD) else {
                report.record_err(format!("Row {} has no '{}'", index, TIP_ID_FIELD));
                continue;
            };
            match self.update_tip(api, &id, row) {
                Ok(()) => report.record_ok(format!("Tip {} updated", id)),
                Err(e) => report.record_err(format!("Error updating Tip {}: {}", id, e)),
            }
        }
        self.invalidate();
        report
    }
}

/// Sorts by `datetime` descending, drops `language`, and reformats
/// `datetime` for display.
pub fn prepare_tips(mut tips: Vec<FieldMap>) -> Vec<FieldMap> {
    tips.sort_by_cached_key(|tip| std::cmp::Reverse(datetime_sort_key(tip)));
    for tip in &mut tips {
        tip.shift_remove("language");
        if let Some(value) = tip.get_mut(TIP_DATETIME_FIELD) {
            if let Some(dt) = source_datetime(value) {
                *value = FieldValue::Text(dt.format(TIP_DATETIME_FORMAT).to_string());
            }
        }
    }
    tips
}

/// Unreadable datetimes sort as the oldest.
fn datetime_sort_key(tip: &FieldMap) -> Option<NaiveDateTime> {
    tip.get(TIP_DATETIME_FIELD).and_then(source_datetime)
}

fn source_datetime(value: &FieldValue) -> Option<NaiveDateTime> {
    match value {
        FieldValue::DateTime(dt) => Some(*dt),
        FieldValue::Text(s) => NaiveDateTime::parse_from_str(s.trim(), TIP_SOURCE_FORMAT)
            .ok()
            .or_else(|| parse_datetime(s)),
        _ => None,
    }
}

/// Calendar date of a prepared tip.
pub fn tip_date(tip: &FieldMap) -> Option<NaiveDate> {
    match tip.get(TIP_DATETIME_FIELD)? {
        FieldValue::DateTime(dt) => Some(dt.date()),
        FieldValue::Date(d) => Some(*d),
        FieldValue::Text(s) => s
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()),
        _ => None,
    }
}

/// Groups tips by date relative to `today`. Each bucket keeps the original
/// dataset index so edits can be mapped back. Undated tips go to Previous.
pub fn bucket_tips(tips: &[FieldMap], today: NaiveDate) -> BTreeMap<TipBucket, Vec<usize>> {
    let mut buckets: BTreeMap<TipBucket, Vec<usize>> =
        TipBucket::ALL.iter().map(|b| (*b, Vec::new())).collect();
    for (index, tip) in tips.iter().enumerate() {
        let bucket = match tip_date(tip) {
            Some(date) => TipBucket::of(date, today),
            None => {
                warn!("Tip at row {} has no readable datetime", index);
                TipBucket::Previous
            }
        };
        buckets.entry(bucket).or_default().push(index);
    }
    buckets
}
