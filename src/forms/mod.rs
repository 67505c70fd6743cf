// src/forms/mod.rs

// --- Public Interface ---
pub mod cron;
pub mod dict_utils;
pub mod error;
pub mod field_kind;
pub mod field_value;
pub mod flat_key;
pub mod renderer;
pub mod schema_node;
pub mod session;
pub mod submission;
#[cfg(test)]
pub(crate) mod test_shapes;
pub mod widget;

pub use error::{FormError, FormResult};
pub use field_kind::FieldKind;
pub use field_value::{FieldMap, FieldValue};
pub use renderer::{render_form, RenderOptions, RenderedField, RenderedForm};
pub use schema_node::{Schema, SchemaNode};
pub use session::FormSession;
pub use submission::{process_form_submission, scan_submission, Submission, SubmissionEvent};
pub use widget::{Layout, WidgetKind};
