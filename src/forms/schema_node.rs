// src/forms/schema_node.rs
//! Schema tree built once from the server's hint-convention mapping.
//!
//! The server sends one flat level per mapping, with hints as sibling keys:
//! `name`, `name_help`, `name_options`, `name_field`, `name_disabled`. Those are
//! resolved here so the renderer never re-scans siblings.

use indexmap::IndexMap;
use serde_json::Value;

use super::dict_utils::{merge, strip_hints};
use super::error::FormResult;
use super::field_kind::{parse_field_kind, FieldKind};
use super::field_value::{field_map_from_json, FieldMap, FieldValue};

pub const HELP_SUFFIX: &str = "_help";
pub const OPTIONS_SUFFIX: &str = "_options";
pub const FIELD_SUFFIX: &str = "_field";
pub const DISABLED_SUFFIX: &str = "_disabled";

const HINT_SUFFIXES: [&str; 4] = [HELP_SUFFIX, OPTIONS_SUFFIX, FIELD_SUFFIX, DISABLED_SUFFIX];

/// True for sidecar keys such as `language_options`.
pub fn is_hint_key(key: &str) -> bool {
    HINT_SUFFIXES
        .iter()
        .any(|suffix| key.len() > suffix.len() && key.ends_with(suffix))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaNode {
    pub name: String,
    /// Default (or projected) value. For nested nodes this is the mapping of
    /// the children's values, without hint keys.
    pub value: FieldValue,
    pub help: Option<String>,
    pub options: Vec<FieldValue>,
    pub field_override: Option<FieldKind>,
    pub disabled: bool,
    pub children: IndexMap<String, SchemaNode>,
}

impl SchemaNode {
    pub fn is_nested(&self) -> bool {
        self.value.is_map()
    }
}

/// A parsed entity schema. Keeps the raw mapping for projecting stored records
/// and for building create payloads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    raw: FieldMap,
    fields: IndexMap<String, SchemaNode>,
}

impl Schema {
    pub fn parse(raw: FieldMap) -> Self {
        let fields = build_nodes(&raw);
        Self { raw, fields }
    }

    pub fn from_json(value: &Value) -> FormResult<Self> {
        Ok(Self::parse(field_map_from_json(value)?))
    }

    pub fn raw(&self) -> &FieldMap {
        &self.raw
    }

    pub fn fields(&self) -> impl Iterator<Item = &SchemaNode> {
        self.fields.values()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Options declared for a top-level field (`<name>_options`).
    pub fn options_for(&self, name: &str) -> &[FieldValue] {
        self.fields
            .get(name)
            .map(|node| node.options.as_slice())
            .unwrap_or(&[])
    }

    /// Projects a stored record onto the schema defaults. Only schema fields
    /// are considered; nested mappings are merged so fields added to the
    /// schema later still show their defaults.
    pub fn project(&self, record: &FieldMap) -> Schema {
        let mut raw = self.raw.clone();
        for (key, default) in raw.iter_mut() {
            if is_hint_key(key) {
                continue;
            }
            let Some(stored) = record.get(key) else {
                continue;
            };
            match (default, stored) {
                (FieldValue::Map(defaults), FieldValue::Map(stored_map)) => merge(defaults, stored_map),
                (slot, stored) => *slot = stored.clone(),
            }
        }
        Schema::parse(raw)
    }

    /// The schema defaults with every hint key removed, ready to persist.
    pub fn persistable_defaults(&self) -> FieldMap {
        strip_hints(&self.raw)
    }
}

fn build_nodes(level: &FieldMap) -> IndexMap<String, SchemaNode> {
    level
        .iter()
        .filter(|(key, _)| !is_hint_key(key))
        .map(|(key, value)| (key.clone(), build_node(level, key, value)))
        .collect()
}

fn build_node(level: &FieldMap, name: &str, value: &FieldValue) -> SchemaNode {
    let hint = |suffix: &str| level.get(&format!("{}{}", name, suffix));

    let help = hint(HELP_SUFFIX).and_then(|v| match v {
        FieldValue::Null => None,
        FieldValue::Text(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });
    let options = match hint(OPTIONS_SUFFIX) {
        Some(FieldValue::List(items)) => items.clone(),
        Some(FieldValue::Null) | None => Vec::new(),
        Some(single) => vec![single.clone()],
    };
    let field_override = hint(FIELD_SUFFIX)
        .and_then(FieldValue::as_str)
        .and_then(parse_field_kind);
    let disabled = hint(DISABLED_SUFFIX).is_some_and(FieldValue::is_truthy);

    let (value, children) = match value {
        FieldValue::Map(inner) => {
            let children = build_nodes(inner);
            let values: FieldMap = children
                .iter()
                .map(|(k, node)| (k.clone(), node.value.clone()))
                .collect();
            (FieldValue::Map(values), children)
        }
        leaf => (leaf.clone(), IndexMap::new()),
    };

    SchemaNode {
        name: name.to_string(),
        value,
        help,
        options,
        field_override,
        disabled,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn platform_schema() -> Schema {
        Schema::from_json(&json!({
            "id": "",
            "name": "",
            "name_help": "Display name",
            "language": "en",
            "language_options": ["en", "pt"],
            "publish_schedule": "30 8 * * *",
            "publish_schedule_field": "time",
            "next_publish": "",
            "next_publish_disabled": true,
            "icons": {"win": "W", "win_help": "Shown on wins", "lose": "L"}
        }))
        .unwrap()
    }

    #[test]
    fn test_is_hint_key() {
        assert!(is_hint_key("name_help"));
        assert!(is_hint_key("language_options"));
        assert!(is_hint_key("x_field"));
        assert!(is_hint_key("x_disabled"));
        assert!(!is_hint_key("name"));
        assert!(!is_hint_key("_help"));
        assert!(!is_hint_key("helpful"));
    }

    #[test]
    fn test_hints_resolved_and_hidden() {
        let schema = platform_schema();
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(names, vec!["id", "name", "language", "publish_schedule", "next_publish", "icons"]);
        let name = schema.get("name").unwrap();
        assert_eq!(name.help.as_deref(), Some("Display name"));
        assert_eq!(schema.options_for("language"), &[FieldValue::text("en"), FieldValue::text("pt")]);
        assert_eq!(schema.get("publish_schedule").unwrap().field_override, Some(FieldKind::Time));
        assert!(schema.get("next_publish").unwrap().disabled);
    }

    #[test]
    fn test_nested_children() {
        let schema = platform_schema();
        let icons = schema.get("icons").unwrap();
        assert!(icons.is_nested());
        assert_eq!(icons.children.len(), 2);
        assert_eq!(icons.children["win"].help.as_deref(), Some("Shown on wins"));
        let values = icons.value.as_map().unwrap();
        assert!(!values.contains_key("win_help"));
    }

    #[test]
    fn test_project_keeps_defaults_for_new_fields() {
        let schema = platform_schema();
        let record = field_map_from_json(&json!({
            "id": "p1",
            "name": "Main",
            "icons": {"win": "✅"},
            "unknown": 5
        }))
        .unwrap();
        let projected = schema.project(&record);
        assert_eq!(projected.get("name").unwrap().value, FieldValue::text("Main"));
        assert_eq!(projected.get("language").unwrap().value, FieldValue::text("en"));
        let icons = projected.get("icons").unwrap();
        assert_eq!(icons.children["win"].value, FieldValue::text("✅"));
        assert_eq!(icons.children["lose"].value, FieldValue::text("L"));
        assert!(projected.get("unknown").is_none());
        // Hints survive projection
        assert_eq!(projected.get("name").unwrap().help.as_deref(), Some("Display name"));
    }

    #[test]
    fn test_persistable_defaults_strip_hints() {
        let defaults = platform_schema().persistable_defaults();
        assert!(defaults.contains_key("name"));
        assert!(!defaults.contains_key("name_help"));
        assert!(!defaults["icons"].as_map().unwrap().contains_key("win_help"));
    }
}
