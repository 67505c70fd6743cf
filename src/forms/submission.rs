// src/forms/submission.rs
//! Submission decoder.
//!
//! A submit button sets `FormSubmitter:<entity_id>-<Action>` to true in the
//! session. On the next cycle the decoder finds that marker, collects the
//! entity's widget keys, and rebuilds the nested edit payload.

use bevy::log::{debug, warn};

use super::field_value::{FieldMap, FieldValue};
use super::flat_key::{decode, strip_entity};
use super::session::FormSession;

pub const SUBMITTER_PREFIX: &str = "FormSubmitter:";

/// A submit button press for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEvent {
    pub entity_id: String,
    /// Lower-cased button label, e.g. `save` or `test platform`.
    pub action: String,
}

/// A decoded submission: which entity, which button, and the edited values.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub event: SubmissionEvent,
    pub payload: FieldMap,
}

pub fn submitter_key(entity_id: &str, action: &str) -> String {
    format!("{}{}-{}", SUBMITTER_PREFIX, entity_id, action)
}

pub fn is_submitter_key(key: &str) -> bool {
    key.starts_with(SUBMITTER_PREFIX)
}

/// Parses a marker key. The split is on the last `-`, so ids may contain
/// dashes; action labels may not.
pub fn parse_submitter_key(key: &str) -> Option<SubmissionEvent> {
    let rest = key.strip_prefix(SUBMITTER_PREFIX)?;
    let (id, action) = rest.rsplit_once('-')?;
    if id.is_empty() || action.trim().is_empty() {
        return None;
    }
    Some(SubmissionEvent {
        entity_id: id.to_string(),
        action: action.trim().to_lowercase(),
    })
}

/// Finds the truthy submission marker. If several are set, the last one in
/// session insertion order wins and the others are reported in the log.
pub fn scan_submission(session: &FormSession) -> Option<SubmissionEvent> {
    let mut found: Option<SubmissionEvent> = None;
    for (key, value) in session.iter() {
        if !is_submitter_key(key) || !value.is_truthy() {
            continue;
        }
        match parse_submitter_key(key) {
            Some(event) => {
                if let Some(previous) = found.replace(event) {
                    warn!(
                        "More than one form submitted in one cycle; ignoring '{}' ({})",
                        previous.entity_id, previous.action
                    );
                }
            }
            None => warn!("Ignoring malformed submission marker '{}'", key),
        }
    }
    found
}

/// Collects the flat keys owned by `entity_id` with the id suffix removed.
pub fn collect_entity_fields(session: &FormSession, entity_id: &str) -> Vec<(String, FieldValue)> {
    session
        .iter()
        .filter(|(key, _)| !is_submitter_key(key))
        .filter_map(|(key, value)| strip_entity(key, entity_id).map(|k| (k, value.clone())))
        .collect()
}

/// Scans for a submission and decodes its payload. Returns `None` when no
/// marker is set.
pub fn process_form_submission(session: &FormSession) -> Option<Submission> {
    let event = scan_submission(session)?;
    let fields = collect_entity_fields(session, &event.entity_id);
    let payload = decode(fields.iter().map(|(k, v)| (k.as_str(), v)));
    debug!(
        "Decoded submission '{}' for '{}' with {} top-level fields",
        event.action,
        event.entity_id,
        payload.len()
    );
    Some(Submission { event, payload })
}
