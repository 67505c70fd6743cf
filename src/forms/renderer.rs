// src/forms/renderer.rs
//! Form renderer: walks a (projected) schema, infers a widget per leaf, and
//! registers every keyed leaf in the session under its flat key.
//!
//! The output is a backend-neutral widget tree; the egui painter in
//! `ui::form_widgets` draws it, and a CLI can print it.

use bevy::log::warn;
use chrono::{NaiveDate, NaiveTime};

use super::cron::{parse_time_prefix, schedule_value_to_time, PUBLISH_SCHEDULE_FIELD};
use super::field_kind::FieldKind;
use super::field_value::{parse_datetime, FieldValue, DATE_WIRE_FORMAT};
use super::flat_key::{child_key, widget_key};
use super::schema_node::{Schema, SchemaNode};
use super::session::FormSession;
use super::widget::{display_label, infer_widget, Layout, WidgetKind};

pub const TIME_STEP_SECS: u32 = 900;
pub const DEBUG_TIME_STEP_SECS: u32 = 60;
/// Display format for read-only datetimes such as `next_publish`.
pub const READONLY_DATETIME_FORMAT: &str = "%B %d, %Y, %H:%M";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub debug: bool,
    pub top_level_layout: Layout,
    pub nested_layout: Layout,
    /// Top-level fields not rendered at all.
    pub skip_fields: Vec<String>,
    /// Top-level fields shown disabled; datetimes are formatted for reading.
    pub readonly_fields: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            debug: false,
            top_level_layout: Layout::Stacked,
            nested_layout: Layout::Columns,
            skip_fields: Vec::new(),
            readonly_fields: Vec::new(),
        }
    }
}

impl RenderOptions {
    pub fn time_step_secs(&self) -> u32 {
        if self.debug {
            DEBUG_TIME_STEP_SECS
        } else {
            TIME_STEP_SECS
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedField {
    /// Raw field name; the identity, never the label.
    pub name: String,
    pub label: String,
    /// Session key; `None` for disabled and identity fields.
    pub key: Option<String>,
    pub kind: WidgetKind,
    pub layout: Layout,
    pub help: Option<String>,
    pub disabled: bool,
    /// Initial value, already normalized for `kind`.
    pub value: FieldValue,
    pub options: Vec<FieldValue>,
    pub time_step_secs: u32,
    pub children: Vec<RenderedField>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedForm {
    pub entity_id: String,
    pub fields: Vec<RenderedField>,
}

impl RenderedForm {
    /// Depth-first iteration over every rendered field.
    pub fn walk(&self) -> Vec<&RenderedField> {
        fn visit<'a>(fields: &'a [RenderedField], out: &mut Vec<&'a RenderedField>) {
            for field in fields {
                out.push(field);
                visit(&field.children, out);
            }
        }
        let mut out = Vec::new();
        visit(&self.fields, &mut out);
        out
    }

    pub fn find(&self, name: &str) -> Option<&RenderedField> {
        self.walk().into_iter().find(|f| f.name == name)
    }
}

/// Renders every schema field for one entity.
pub fn render_form(
    schema: &Schema,
    entity_id: &str,
    session: &mut FormSession,
    options: &RenderOptions,
) -> RenderedForm {
    let mut fields = Vec::new();
    for node in schema.fields() {
        if options.skip_fields.iter().any(|s| s == &node.name) {
            continue;
        }
        let key = widget_key(entity_id, &[node.name.as_str()]);
        let readonly = options.readonly_fields.iter().any(|s| s == &node.name);
        let field = if node.name == PUBLISH_SCHEDULE_FIELD {
            render_schedule(node, key, session, options)
        } else if readonly {
            render_readonly(node, options)
        } else {
            render_node(node, key, options.top_level_layout, false, session, options)
        };
        fields.push(field);
    }
    RenderedForm {
        entity_id: entity_id.to_string(),
        fields,
    }
}

fn render_node(
    node: &SchemaNode,
    key: String,
    layout: Layout,
    parent_disabled: bool,
    session: &mut FormSession,
    options: &RenderOptions,
) -> RenderedField {
    let inferred = infer_widget(
        &node.name,
        &node.value,
        node.field_override.as_ref(),
        &node.options,
        node.disabled || parent_disabled,
    );

    if inferred.kind == WidgetKind::Nested {
        let children = node
            .children
            .values()
            .map(|child| {
                render_node(
                    child,
                    child_key(&key, &child.name),
                    options.nested_layout,
                    inferred.disabled,
                    session,
                    options,
                )
            })
            .collect();
        return RenderedField {
            name: node.name.clone(),
            label: display_label(&node.name),
            key: Some(key),
            kind: WidgetKind::Nested,
            layout,
            help: node.help.clone(),
            disabled: inferred.disabled,
            value: FieldValue::Null,
            options: Vec::new(),
            time_step_secs: options.time_step_secs(),
            children,
        };
    }

    let widget_options = effective_options(inferred.kind, &node.value, &node.options);
    let initial = initial_value(inferred.kind, &node.name, &node.value, &widget_options);
    let (key, value) = if inferred.keyed {
        let current = session.register(key.clone(), initial).clone();
        (Some(key), current)
    } else {
        (None, initial)
    };

    RenderedField {
        name: node.name.clone(),
        label: display_label(&node.name),
        key,
        kind: inferred.kind,
        layout,
        help: node.help.clone(),
        disabled: inferred.disabled,
        value,
        options: widget_options,
        time_step_secs: options.time_step_secs(),
        children: Vec::new(),
    }
}

/// `publish_schedule` is stored as cron but edited as a time of day.
fn render_schedule(
    node: &SchemaNode,
    key: String,
    session: &mut FormSession,
    options: &RenderOptions,
) -> RenderedField {
    let mut schedule = node.clone();
    schedule.value = FieldValue::Time(schedule_value_to_time(&node.value));
    schedule.field_override = Some(FieldKind::Time);
    render_node(&schedule, key, options.top_level_layout, false, session, options)
}

fn render_readonly(node: &SchemaNode, options: &RenderOptions) -> RenderedField {
    let value = match &node.value {
        FieldValue::DateTime(dt) => FieldValue::Text(dt.format(READONLY_DATETIME_FORMAT).to_string()),
        FieldValue::Text(s) => match parse_datetime(s) {
            Some(dt) => FieldValue::Text(dt.format(READONLY_DATETIME_FORMAT).to_string()),
            None => FieldValue::Text(s.clone()),
        },
        other => other.clone(),
    };
    RenderedField {
        name: node.name.clone(),
        label: display_label(&node.name),
        key: None,
        kind: WidgetKind::ShortText,
        layout: options.top_level_layout,
        help: node.help.clone(),
        disabled: true,
        value,
        options: Vec::new(),
        time_step_secs: options.time_step_secs(),
        children: Vec::new(),
    }
}

/// Select candidates: declared options, or the list's own items when the
/// schema declares none.
fn effective_options(kind: WidgetKind, value: &FieldValue, declared: &[FieldValue]) -> Vec<FieldValue> {
    match kind {
        WidgetKind::SelectOne | WidgetKind::SelectMany if declared.is_empty() => {
            value.as_list().map(<[FieldValue]>::to_vec).unwrap_or_default()
        }
        WidgetKind::SelectOne | WidgetKind::SelectMany => declared.to_vec(),
        _ => Vec::new(),
    }
}

/// Normalizes a schema value into what the widget edits.
fn initial_value(kind: WidgetKind, name: &str, value: &FieldValue, options: &[FieldValue]) -> FieldValue {
    match kind {
        WidgetKind::Toggle => FieldValue::Bool(value.is_truthy()),
        // Stored numbers are kept as they are; the minimum only binds edits
        WidgetKind::Number => match value {
            FieldValue::Int(_) | FieldValue::Float(_) => value.clone(),
            _ => FieldValue::Int(0),
        },
        WidgetKind::Date => match value {
            FieldValue::Date(_) | FieldValue::DateTime(_) => value.clone(),
            FieldValue::Text(s) => parse_date_text(name, s),
            _ => FieldValue::Null,
        },
        WidgetKind::Time => match value {
            FieldValue::Time(_) => value.clone(),
            FieldValue::Text(s) => match parse_time_prefix(s) {
                Ok(t) => FieldValue::Time(t),
                Err(e) => {
                    warn!("Field '{}': {}; showing 00:00", name, e);
                    FieldValue::Time(NaiveTime::MIN)
                }
            },
            _ => FieldValue::Time(NaiveTime::MIN),
        },
        WidgetKind::SelectOne => {
            let index = options.iter().position(|o| o == value).unwrap_or(0);
            options.get(index).cloned().unwrap_or(FieldValue::Null)
        }
        WidgetKind::SelectMany => {
            let selected = match value {
                FieldValue::List(items) => items.iter().filter(|v| options.contains(v)).cloned().collect(),
                FieldValue::Null => Vec::new(),
                single if options.contains(single) => vec![single.clone()],
                _ => Vec::new(),
            };
            FieldValue::List(selected)
        }
        WidgetKind::Password | WidgetKind::LongText | WidgetKind::ShortText => match value {
            FieldValue::Text(_) => value.clone(),
            FieldValue::Null => FieldValue::text(""),
            other => FieldValue::Text(other.to_string()),
        },
        WidgetKind::Nested => FieldValue::Null,
    }
}

/// Readable date text is seeded verbatim, so an unedited save sends the
/// server's own string back. The painter parses it for display.
fn parse_date_text(name: &str, s: &str) -> FieldValue {
    if s.trim().is_empty() {
        return FieldValue::Null;
    }
    if date_text_parts(s).is_some() {
        return FieldValue::text(s);
    }
    warn!("Field '{}': cannot read '{}' as a date; leaving it empty", name, s);
    FieldValue::Null
}

/// Date and optional time of day in a stored date or datetime string.
pub fn date_text_parts(s: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    if let Some(dt) = parse_datetime(s) {
        return Some((dt.date(), Some(dt.time())));
    }
    NaiveDate::parse_from_str(s.trim(), DATE_WIRE_FORMAT)
        .ok()
        .map(|d| (d, None))
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod renderer_tests;
