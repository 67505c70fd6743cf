// src/forms/field_kind.rs

use std::fmt;

/// Explicit widget override declared through a `<field>_field` hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Password,
    Date,
    Time,
    Textarea,
    Multiselect,
    /// Unrecognised override; kept so it round-trips but never changes inference.
    Other(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Password => "password",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::Textarea => "textarea",
            FieldKind::Multiselect => "multiselect",
            FieldKind::Other(s) => s,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses a hint value. Blank input means "no override".
pub fn parse_field_kind(s: &str) -> Option<FieldKind> {
    let norm = s.trim();
    match norm.to_ascii_lowercase().as_str() {
        "" => None,
        "password" => Some(FieldKind::Password),
        "date" | "datetime" => Some(FieldKind::Date),
        "time" => Some(FieldKind::Time),
        "textarea" | "text_area" => Some(FieldKind::Textarea),
        "multiselect" | "multi_select" => Some(FieldKind::Multiselect),
        _ => Some(FieldKind::Other(norm.to_string())),
    }
}
