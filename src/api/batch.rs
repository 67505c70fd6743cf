// src/api/batch.rs

use bevy::log::{error, info};
use std::collections::BTreeMap;

use crate::forms::{FieldMap, FieldValue};

/// Row edits collected from an editable table, addressed by row index into
/// the dataset that was shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowChanges {
    pub deleted_rows: Vec<usize>,
    pub edited_rows: BTreeMap<usize, FieldMap>,
}

impl RowChanges {
    pub fn is_empty(&self) -> bool {
        self.deleted_rows.is_empty() && self.edited_rows.is_empty()
    }

    /// Records one edited cell, merging with earlier edits to the same row.
    pub fn edit(&mut self, row: usize, column: &str, value: FieldValue) {
        self.edited_rows
            .entry(row)
            .or_default()
            .insert(column.to_string(), value);
    }

    pub fn toggle_delete(&mut self, row: usize) {
        match self.deleted_rows.iter().position(|r| *r == row) {
            Some(pos) => {
                self.deleted_rows.remove(pos);
            }
            None => self.deleted_rows.push(row),
        }
    }

    pub fn clear(&mut self) {
        self.deleted_rows.clear();
        self.edited_rows.clear();
    }
}

/// Outcome of a multi-row write. Rows are attempted independently; applied
/// rows are not rolled back when others fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub applied: Vec<String>,
    pub errors: Vec<String>,
}

impl BatchReport {
    pub fn record_ok(&mut self, what: impl Into<String>) {
        let what = what.into();
        info!("{}", what);
        self.applied.push(what);
    }

    pub fn record_err(&mut self, what: impl Into<String>) {
        let what = what.into();
        error!("{}", what);
        self.errors.push(what);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.errors.is_empty()
    }

    /// One line for the feedback bar; errors are joined.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!("{} change(s) applied", self.applied.len())
        } else {
            format!(
                "{} applied, {} failed: {}",
                self.applied.len(),
                self.errors.len(),
                self.errors.join("; ")
            )
        }
    }
}

/// String form of a record's identifier field. Integer ids are accepted.
pub fn record_id(record: &FieldMap, field: &str) -> Option<String> {
    match record.get(field)? {
        FieldValue::Text(s) if !s.is_empty() => Some(s.clone()),
        FieldValue::Int(i) => Some(i.to_string()),
        _ => None,
    }
}
