// src/forms/session.rs

use bevy::prelude::Resource;
use indexmap::IndexMap;

use super::field_value::FieldValue;
use super::flat_key::strip_entity;
use super::submission::{is_submitter_key, submitter_key};

/// Key-value store shared by the renderer (widget state) and the submission
/// decoder (markers). This is the only channel between the two, so tests can
/// seed it directly.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct FormSession {
    values: IndexMap<String, FieldValue>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.values.get_mut(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.values.insert(key.into(), value);
    }

    /// Seeds `key` with `default` unless the user already edited it in an
    /// earlier cycle. Returns the current value.
    pub fn register(&mut self, key: impl Into<String>, default: FieldValue) -> &FieldValue {
        self.values.entry(key.into()).or_insert(default)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.values.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// What a submit button does: flags `FormSubmitter:<id>-<action>`.
    pub fn mark_submitted(&mut self, entity_id: &str, action: &str) {
        self.set(submitter_key(entity_id, action), FieldValue::Bool(true));
    }

    pub fn clear_submissions(&mut self) {
        self.values.retain(|k, _| !is_submitter_key(k));
    }

    /// Drops every widget value owned by `entity_id`, so the next render seeds
    /// from fresh data.
    pub fn clear_entity(&mut self, entity_id: &str) -> usize {
        let before = self.values.len();
        self.values
            .retain(|k, _| is_submitter_key(k) || strip_entity(k, entity_id).is_none());
        before - self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_keeps_user_edits() {
        let mut session = FormSession::new();
        session.register("name_1", FieldValue::text("default"));
        session.set("name_1", FieldValue::text("edited"));
        let current = session.register("name_1", FieldValue::text("default"));
        assert_eq!(current, &FieldValue::text("edited"));
    }

    #[test]
    fn test_clear_entity_only_touches_owner() {
        let mut session = FormSession::new();
        session.set("name_1", FieldValue::text("a"));
        session.set("icons_1+win", FieldValue::text("w"));
        session.set("name_11", FieldValue::text("b"));
        session.mark_submitted("1", "Save");
        assert_eq!(session.clear_entity("1"), 2);
        assert!(session.contains_key("name_11"));
        assert!(session.contains_key("FormSubmitter:1-Save"));
        session.clear_submissions();
        assert_eq!(session.len(), 1);
    }
}
