// src/forms/widget.rs
//! Widget inference: decides which input represents a leaf value.
//!
//! Priority (first match wins):
//! 1. `password` override, or a text-like value whose name mentions
//!    api/token/password: masked text
//! 2. `id` / `_id`: rendered disabled and never keyed (see [`infer_widget`])
//! 3. bool: toggle
//! 4. number: number input, minimum 0
//! 5. date/datetime or `date` override: date picker
//! 6. time or `time` override: time picker
//! 7. list or non-empty options: multi-select with `multiselect`, otherwise
//!    single-select
//! 8. mapping: nested section
//! 9. text over 100 chars or `textarea` override: text area
//! 10. anything else: single-line text

use std::fmt;

use super::field_kind::FieldKind;
use super::field_value::FieldValue;

pub const LONG_TEXT_THRESHOLD: usize = 100;
const MASKED_NAME_MARKERS: [&str; 3] = ["api", "token", "password"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Toggle,
    Number,
    Date,
    Time,
    SelectOne,
    SelectMany,
    Password,
    LongText,
    ShortText,
    Nested,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Label-left/value-right versus label-above-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    #[default]
    Stacked,
    Columns,
}

/// Classification plus the identity rules that sit outside the kind itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferredWidget {
    pub kind: WidgetKind,
    pub disabled: bool,
    /// False when the widget must not be registered in the session store, so
    /// its value can never round-trip into an edit payload.
    pub keyed: bool,
}

pub fn is_identity_field(name: &str) -> bool {
    matches!(name.trim().to_lowercase().as_str(), "id" | "_id")
}

pub fn is_masked_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    MASKED_NAME_MARKERS.iter().any(|m| lower.contains(m))
}

/// Pure classification of one value. Deterministic for a given input.
pub fn classify(
    name: &str,
    value: &FieldValue,
    field_override: Option<&FieldKind>,
    options: &[FieldValue],
) -> WidgetKind {
    let text_like = matches!(value, FieldValue::Text(_) | FieldValue::Null);
    if field_override == Some(&FieldKind::Password) || (text_like && is_masked_name(name)) {
        return WidgetKind::Password;
    }
    match value {
        FieldValue::Bool(_) => return WidgetKind::Toggle,
        FieldValue::Int(_) | FieldValue::Float(_) => return WidgetKind::Number,
        FieldValue::Date(_) | FieldValue::DateTime(_) => return WidgetKind::Date,
        _ => {}
    }
    if field_override == Some(&FieldKind::Date) {
        return WidgetKind::Date;
    }
    if matches!(value, FieldValue::Time(_)) || field_override == Some(&FieldKind::Time) {
        return WidgetKind::Time;
    }
    let is_list = matches!(value, FieldValue::List(_));
    if is_list || !options.is_empty() {
        if field_override == Some(&FieldKind::Multiselect) || (is_list && options.is_empty()) {
            return WidgetKind::SelectMany;
        }
        return WidgetKind::SelectOne;
    }
    if value.is_map() {
        return WidgetKind::Nested;
    }
    let long_text = value
        .as_str()
        .is_some_and(|s| s.chars().count() > LONG_TEXT_THRESHOLD);
    if long_text || field_override == Some(&FieldKind::Textarea) {
        return WidgetKind::LongText;
    }
    WidgetKind::ShortText
}

/// [`classify`] plus the identity-field and disabled rules.
pub fn infer_widget(
    name: &str,
    value: &FieldValue,
    field_override: Option<&FieldKind>,
    options: &[FieldValue],
    disabled: bool,
) -> InferredWidget {
    let kind = classify(name, value, field_override, options);
    let disabled = disabled || is_identity_field(name);
    InferredWidget {
        kind,
        disabled,
        keyed: !disabled,
    }
}

/// `publish_type` becomes `Publish Type`. The raw name stays the identity key.
pub fn display_label(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn text(s: &str) -> FieldValue {
        FieldValue::text(s)
    }

    #[test]
    fn test_priority_table() {
        let none: &[FieldValue] = &[];
        assert_eq!(classify("active", &FieldValue::Bool(true), None, none), WidgetKind::Toggle);
        assert_eq!(classify("max_tips", &FieldValue::Int(3), None, none), WidgetKind::Number);
        assert_eq!(classify("odds", &FieldValue::Float(1.5), None, none), WidgetKind::Number);
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(classify("datetime", &FieldValue::DateTime(dt), None, none), WidgetKind::Date);
        assert_eq!(classify("day", &text("2024-01-01"), Some(&FieldKind::Date), none), WidgetKind::Date);
        let t = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        assert_eq!(classify("at", &FieldValue::Time(t), None, none), WidgetKind::Time);
        assert_eq!(classify("at", &text("08:30"), Some(&FieldKind::Time), none), WidgetKind::Time);
        assert_eq!(classify("icons", &FieldValue::Map(Default::default()), None, none), WidgetKind::Nested);
        assert_eq!(classify("name", &text("short"), None, none), WidgetKind::ShortText);
        assert_eq!(classify("name", &FieldValue::Null, None, none), WidgetKind::ShortText);
    }

    #[test]
    fn test_masking() {
        let none: &[FieldValue] = &[];
        assert_eq!(classify("api_token", &text("abc123"), None, none), WidgetKind::Password);
        assert_eq!(classify("Password", &FieldValue::Null, None, none), WidgetKind::Password);
        assert_eq!(classify("secret", &text("x"), Some(&FieldKind::Password), none), WidgetKind::Password);
        // The name heuristic never hides non-text values
        assert_eq!(classify("api_enabled", &FieldValue::Bool(true), None, none), WidgetKind::Toggle);
        // A masked long text stays single-line
        let long = "x".repeat(150);
        assert_eq!(classify("bot_token", &text(&long), None, none), WidgetKind::Password);
    }

    #[test]
    fn test_long_text() {
        let none: &[FieldValue] = &[];
        let long = "y".repeat(101);
        assert_eq!(classify("description", &text(&long), None, none), WidgetKind::LongText);
        assert_eq!(classify("description", &text(&"y".repeat(100)), None, none), WidgetKind::ShortText);
        assert_eq!(classify("footer", &text(""), Some(&FieldKind::Textarea), none), WidgetKind::LongText);
    }

    #[test]
    fn test_selects() {
        let opts = vec![text("en"), text("pt")];
        assert_eq!(classify("language", &text("pt"), None, &opts), WidgetKind::SelectOne);
        let list = FieldValue::List(vec![text("free")]);
        assert_eq!(
            classify("tips_filter", &list, Some(&FieldKind::Multiselect), &opts),
            WidgetKind::SelectMany
        );
        assert_eq!(classify("tips_filter", &list, None, &opts), WidgetKind::SelectOne);
        assert_eq!(classify("participants", &list, None, &[]), WidgetKind::SelectMany);
    }

    #[test]
    fn test_identity_fields_are_disabled_and_unkeyed() {
        let w = infer_widget(" ID ", &text("abc"), None, &[], false);
        assert_eq!(w.kind, WidgetKind::ShortText);
        assert!(w.disabled);
        assert!(!w.keyed);
        let w = infer_widget("_id", &text("abc"), None, &[], false);
        assert!(!w.keyed);
        let w = infer_widget("name", &text("abc"), None, &[], false);
        assert!(w.keyed && !w.disabled);
        let w = infer_widget("next_publish", &text("x"), None, &[], true);
        assert!(!w.keyed);
    }

    #[test]
    fn test_classification_is_stable() {
        let opts = vec![text("a")];
        let v = FieldValue::List(vec![text("a")]);
        let first = classify("x", &v, Some(&FieldKind::Multiselect), &opts);
        for _ in 0..10 {
            assert_eq!(classify("x", &v, Some(&FieldKind::Multiselect), &opts), first);
        }
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("publish_type"), "Publish Type");
        assert_eq!(display_label("API_token"), "Api Token");
        assert_eq!(display_label("name"), "Name");
    }
}
