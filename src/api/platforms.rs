// src/api/platforms.rs
//! Platform documents: cached reads, writes, and the form submission
//! dispatcher for the platforms page.

use bevy::log::{info, warn};
use bevy::prelude::Resource;
use chrono::NaiveDateTime;
use serde_json::Value;

use super::batch::{record_id, BatchReport, RowChanges};
use super::cache::TtlCache;
use super::client::ApiBackend;
use super::error::{ApiError, ApiResult};
use crate::forms::cron::{schedule_value_to_cron, PUBLISH_SCHEDULE_FIELD};
use crate::forms::dict_utils::encode_payload_for_wire;
use crate::forms::field_value::{field_map_from_json, field_map_to_json, parse_datetime};
use crate::forms::renderer::READONLY_DATETIME_FORMAT;
use crate::forms::{FieldMap, FieldValue, Schema, Submission};

pub const PLATFORMS_ENDPOINT: &str = "hunch_club/platforms";
pub const PLATFORM_FIELDS_ENDPOINT: &str = "hunch_club/platform/fields";
pub const PLATFORM_ENDPOINT: &str = "hunch_club/platform";
pub const PLATFORM_TEST_ENDPOINT: &str = "hunch_club/platform/test";

pub const PLATFORMS_TTL_SECS: u64 = 60;
pub const SCHEMA_TTL_SECS: u64 = 86_400;

pub const PLATFORM_ID_FIELD: &str = "id";
pub const NEXT_PUBLISH_FIELD: &str = "next_publish";
const COPY_SUFFIX: &str = " (Copy)";

/// Columns kept by [`quick_summary`].
pub const SUMMARY_COLUMNS: &[&str] = &[
    "active",
    "name",
    "publish_type",
    "tips_filter",
    "language",
    "channel",
    "next_publish",
    "max_tips",
    "sort_by",
    "sort_order",
    "tips_days_delta",
    "stake_amount",
    "id",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformAction {
    Save,
    Delete,
    Duplicate,
    TestPlatform,
}

impl PlatformAction {
    pub const ALL: [PlatformAction; 4] = [
        PlatformAction::Save,
        PlatformAction::Delete,
        PlatformAction::Duplicate,
        PlatformAction::TestPlatform,
    ];

    /// Button label; also the action half of the submission marker.
    pub fn label(&self) -> &'static str {
        match self {
            PlatformAction::Save => "Save",
            PlatformAction::Delete => "Delete",
            PlatformAction::Duplicate => "Duplicate",
            PlatformAction::TestPlatform => "Test Platform",
        }
    }

    pub fn parse(action: &str) -> Option<Self> {
        let action = action.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(action))
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PlatformStore {
    platforms: TtlCache<Vec<FieldMap>>,
    schema: TtlCache<Schema>,
}

impl PlatformStore {
    pub fn new(debug: bool) -> Self {
        Self {
            platforms: TtlCache::new("platforms", PLATFORMS_TTL_SECS, debug),
            schema: TtlCache::new("platform schema", SCHEMA_TTL_SECS, debug),
        }
    }

    pub fn platforms(&mut self, api: &dyn ApiBackend) -> ApiResult<Vec<FieldMap>> {
        self.platforms.get_or_fetch(|| fetch_records(api, PLATFORMS_ENDPOINT))
    }

    /// The default platform schema. Any failure, or an empty schema, is
    /// reported as [`ApiError::MissingSchema`].
    pub fn default_schema(&mut self, api: &dyn ApiBackend) -> ApiResult<Schema> {
        self.schema.get_or_fetch(|| {
            let data = api
                .get(PLATFORM_FIELDS_ENDPOINT)
                .and_then(|res| res.ensure_ok())
                .and_then(|res| res.document(PLATFORM_FIELDS_ENDPOINT));
            let schema = match data {
                Ok(data) => Schema::from_json(&data).map_err(|e| {
                    warn!("Platform schema is unusable: {}", e);
                    ApiError::MissingSchema
                })?,
                Err(e) => {
                    warn!("Could not load platform schema: {}", e);
                    return Err(ApiError::MissingSchema);
                }
            };
            if schema.is_empty() {
                return Err(ApiError::MissingSchema);
            }
            Ok(schema)
        })
    }

    pub fn invalidate(&mut self) {
        self.platforms.invalidate();
    }

    pub fn delete(&mut self, api: &dyn ApiBackend, id: &str) -> ApiResult<()> {
        let endpoint = format!("{}/{}", PLATFORM_ENDPOINT, id);
        let result = api.delete(&endpoint).and_then(|res| res.ensure_ok());
        self.invalidate();
        result?;
        info!("Platform '{}' deleted", id);
        Ok(())
    }

    pub fn update(&mut self, api: &dyn ApiBackend, id: &str, mut payload: FieldMap) -> ApiResult<()> {
        convert_schedule(&mut payload);
        let endpoint = format!("{}/{}", PLATFORM_ENDPOINT, id);
        let result = api
            .patch(&endpoint, &field_map_to_json(&payload))
            .and_then(|res| res.ensure_ok());
        self.invalidate();
        result?;
        info!("Platform '{}' updated", id);
        Ok(())
    }

    pub fn create(&mut self, api: &dyn ApiBackend, mut payload: FieldMap) -> ApiResult<()> {
        convert_schedule(&mut payload);
        payload.shift_remove(NEXT_PUBLISH_FIELD);
        let result = api
            .post(PLATFORM_ENDPOINT, &field_map_to_json(&payload))
            .and_then(|res| res.ensure_ok());
        self.invalidate();
        result?;
        info!("Platform created");
        Ok(())
    }

    pub fn duplicate(&mut self, api: &dyn ApiBackend, mut payload: FieldMap) -> ApiResult<()> {
        let name = payload
            .get("name")
            .map(FieldValue::to_string)
            .unwrap_or_default();
        payload.insert("name".into(), FieldValue::Text(format!("{}{}", name, COPY_SUFFIX)));
        self.create(api, payload)
    }

    /// Creates a platform from the schema defaults with the hint keys removed.
    pub fn add_new(&mut self, api: &dyn ApiBackend) -> ApiResult<()> {
        let schema = self.default_schema(api)?;
        self.create(api, schema.persistable_defaults())
    }

    /// Asks the server to post a test message with the given settings.
    pub fn test(&self, api: &dyn ApiBackend, mut payload: FieldMap) -> ApiResult<()> {
        convert_schedule(&mut payload);
        api.post(PLATFORM_TEST_ENDPOINT, &field_map_to_json(&payload))?
            .ensure_ok()?;
        Ok(())
    }

    /// Dispatches a decoded form submission. Returns a message for the
    /// feedback bar, or `None` when the submission was ignored.
    pub fn handle_submission(
        &mut self,
        api: &dyn ApiBackend,
        submission: &Submission,
    ) -> ApiResult<Option<String>> {
        let id = submission.event.entity_id.as_str();
        let known = self
            .platforms(api)?
            .iter()
            .any(|p| record_id(p, PLATFORM_ID_FIELD).as_deref() == Some(id));
        if !known {
            warn!("Submission for unknown platform '{}' ignored", id);
            return Ok(None);
        }
        if submission.payload.is_empty() {
            warn!("Submission for platform '{}' has no fields; ignored", id);
            return Ok(None);
        }
        let Some(action) = PlatformAction::parse(&submission.event.action) else {
            warn!("Unknown platform action '{}' ignored", submission.event.action);
            return Ok(None);
        };

        let mut payload = submission.payload.clone();
        encode_payload_for_wire(&mut payload);
        let message = match action {
            PlatformAction::Save => {
                self.update(api, id, payload)?;
                "Platform updated"
            }
            PlatformAction::Delete => {
                self.delete(api, id)?;
                "Platform deleted"
            }
            PlatformAction::Duplicate => {
                self.duplicate(api, payload)?;
                "Platform duplicated"
            }
            PlatformAction::TestPlatform => {
                self.test(api, payload)?;
                "Test message sent"
            }
        };
        Ok(Some(message.to_string()))
    }

    /// Applies the summary table's deletions and edits. Every row is
    /// attempted; failures are collected rather than returned.
    pub fn apply_summary_changes(
        &mut self,
        api: &dyn ApiBackend,
        changes: &RowChanges,
        rows: &[FieldMap],
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for &index in &changes.deleted_rows {
            let Some(id) = rows.get(index).and_then(|r| record_id(r, PLATFORM_ID_FIELD)) else {
                report.record_err(format!("Row {} has no platform id", index));
                continue;
            };
            match self.delete(api, &id) {
                Ok(()) => report.record_ok(format!("Platform {} deleted", id)),
                Err(e) => report.record_err(format!("Error deleting Platform {}: {}", id, e)),
            }
        }
        for (&index, edits) in &changes.edited_rows {
            if changes.deleted_rows.contains(&index) {
                continue;
            }
            let Some(id) = rows.get(index).and_then(|r| record_id(r, PLATFORM_ID_FIELD)) else {
                report.record_err(format!("Row {} has no platform id", index));
                continue;
            };
            let mut payload = edits.clone();
            encode_payload_for_wire(&mut payload);
            match self.update(api, &id, payload) {
                Ok(()) => report.record_ok(format!("Platform {} updated", id)),
                Err(e) => report.record_err(format!("Error updating Platform {}: {}", id, e)),
            }
        }
        report
    }
}

/// GETs `endpoint` and reads its `data` array as records. Non-mapping
/// entries are skipped.
pub(crate) fn fetch_records(api: &dyn ApiBackend, endpoint: &str) -> ApiResult<Vec<FieldMap>> {
    let data = api.get(endpoint)?.ensure_ok()?.data(endpoint)?;
    let Value::Array(items) = data else {
        warn!("'{}' returned no list; treating as empty", endpoint);
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(|item| match field_map_from_json(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping record from '{}': {}", endpoint, e);
                None
            }
        })
        .collect())
}

fn convert_schedule(payload: &mut FieldMap) {
    if let Some(schedule) = payload.get_mut(PUBLISH_SCHEDULE_FIELD) {
        *schedule = schedule_value_to_cron(schedule);
    }
}

fn next_publish_of(record: &FieldMap) -> Option<NaiveDateTime> {
    match record.get(NEXT_PUBLISH_FIELD)? {
        FieldValue::DateTime(dt) => Some(*dt),
        FieldValue::Text(s) => parse_datetime(s),
        _ => None,
    }
}

/// Summary rows: the summary columns in schema order, sorted by next publish
/// time. Platforms without one sort last.
pub fn quick_summary(platforms: &[FieldMap], schema: &Schema) -> Vec<FieldMap> {
    let columns: Vec<&str> = schema
        .field_names()
        .filter(|name| SUMMARY_COLUMNS.contains(name))
        .collect();
    let mut sorted: Vec<&FieldMap> = platforms.iter().collect();
    sorted.sort_by_key(|p| (next_publish_of(p).is_none(), next_publish_of(p)));
    sorted
        .into_iter()
        .map(|platform| {
            columns
                .iter()
                .map(|&column| {
                    let value = if column == NEXT_PUBLISH_FIELD {
                        match next_publish_of(platform) {
                            Some(dt) => FieldValue::Text(dt.format(READONLY_DATETIME_FORMAT).to_string()),
                            None => platform.get(column).cloned().unwrap_or_default(),
                        }
                    } else {
                        platform.get(column).cloned().unwrap_or_default()
                    };
                    (column.to_string(), value)
                })
                .collect()
        })
        .collect()
}

/// Selector label: `"🟢 [channel] [EN] [type] [free,vip] Name"`.
pub fn platform_label(platform: &FieldMap) -> String {
    let field = |name: &str| platform.get(name).map(FieldValue::to_string).unwrap_or_default();
    let status = if platform.get("active").is_some_and(FieldValue::is_truthy) {
        "🟢"
    } else {
        "🔴"
    };
    let filters = match platform.get("tips_filter") {
        Some(FieldValue::List(items)) => items.iter().map(FieldValue::to_string).collect::<Vec<_>>().join(","),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let name = field("name");
    let name = if name.trim().is_empty() { "<No Name>".to_string() } else { name };
    format!(
        "{} [{}] [{}] [{}] [{}] {}",
        status,
        field("channel"),
        field("language").to_uppercase(),
        field("publish_type"),
        filters,
        name
    )
}

#[cfg(test)]
#[path = "platforms_tests.rs"]
mod platforms_tests;
