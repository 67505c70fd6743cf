// src/ui/form_widgets.rs
//! Paints a [`RenderedForm`] with egui. Keyed widgets read their current
//! value from the [`FormSession`] and write edits straight back to it.

use bevy_egui::egui::{self, RichText};
use chrono::{Local, NaiveDate, NaiveTime, Timelike};

use crate::forms::renderer::date_text_parts;
use crate::forms::{FieldValue, FormSession, Layout, RenderedField, RenderedForm, WidgetKind};

const LABEL_WIDTH: f32 = 160.0;

pub fn paint_form(ui: &mut egui::Ui, form: &RenderedForm, session: &mut FormSession) {
    paint_fields(ui, &form.entity_id, &form.fields, session);
}

/// Runs of non-nested `Columns` fields share one two-column grid; nested
/// sections and `Stacked` fields break the run.
fn paint_fields(ui: &mut egui::Ui, salt: &str, fields: &[RenderedField], session: &mut FormSession) {
    let mut run: Vec<&RenderedField> = Vec::new();
    let mut run_index = 0;
    for field in fields {
        if field.layout == Layout::Columns && field.kind != WidgetKind::Nested {
            run.push(field);
            continue;
        }
        flush_grid(ui, salt, &mut run, &mut run_index, session);
        if field.kind == WidgetKind::Nested {
            paint_section(ui, field, session);
        } else {
            ui.label(RichText::new(&field.label).strong());
            paint_leaf(ui, field, session);
            ui.add_space(4.0);
        }
    }
    flush_grid(ui, salt, &mut run, &mut run_index, session);
}

fn flush_grid(
    ui: &mut egui::Ui,
    salt: &str,
    run: &mut Vec<&RenderedField>,
    run_index: &mut usize,
    session: &mut FormSession,
) {
    if run.is_empty() {
        return;
    }
    egui::Grid::new(format!("form_grid_{}_{}", salt, run_index))
        .num_columns(2)
        .min_col_width(LABEL_WIDTH)
        .striped(true)
        .show(ui, |grid| {
            for field in run.iter() {
                grid.label(field.label.as_str());
                paint_leaf(grid, field, session);
                grid.end_row();
            }
        });
    run.clear();
    *run_index += 1;
}

fn paint_section(ui: &mut egui::Ui, field: &RenderedField, session: &mut FormSession) {
    let heading = ui.label(RichText::new(&field.label).heading());
    if let Some(help) = &field.help {
        heading.on_hover_text(help.as_str());
    }
    let salt = field.key.clone().unwrap_or_else(|| field.name.clone());
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.add_enabled_ui(!field.disabled, |ui| {
            paint_fields(ui, &salt, &field.children, session);
        });
    });
    ui.add_space(6.0);
}

fn paint_leaf(ui: &mut egui::Ui, field: &RenderedField, session: &mut FormSession) {
    let current = field
        .key
        .as_deref()
        .and_then(|key| session.get(key))
        .unwrap_or(&field.value)
        .clone();
    let salt = field.key.clone().unwrap_or_else(|| field.name.clone());

    let edited = ui
        .add_enabled_ui(!field.disabled, |ui| {
            let (response, edited) = paint_widget(ui, &salt, field, current);
            if let Some(help) = &field.help {
                response.on_hover_text(help.as_str());
            }
            edited
        })
        .inner;

    if let (Some(key), Some(value)) = (field.key.as_deref(), edited) {
        session.set(key, value);
    }
}

/// Draws one widget. Returns the new value when the user changed it.
fn paint_widget(
    ui: &mut egui::Ui,
    salt: &str,
    field: &RenderedField,
    current: FieldValue,
) -> (egui::Response, Option<FieldValue>) {
    match field.kind {
        WidgetKind::Toggle => {
            let mut checked = current.is_truthy();
            let response = ui.checkbox(&mut checked, "");
            let edited = response.changed().then_some(FieldValue::Bool(checked));
            (response, edited)
        }
        WidgetKind::Number => paint_number(ui, current),
        WidgetKind::Date => paint_date(ui, salt, current),
        WidgetKind::Time => paint_time(ui, current, field.time_step_secs),
        WidgetKind::SelectOne => {
            let mut selected = current.clone();
            let response = egui::ComboBox::from_id_salt(salt)
                .selected_text(selected.to_string())
                .show_ui(ui, |ui| {
                    for option in &field.options {
                        ui.selectable_value(&mut selected, option.clone(), option.to_string());
                    }
                })
                .response;
            let edited = (selected != current).then_some(selected);
            (response, edited)
        }
        WidgetKind::SelectMany => paint_multiselect(ui, &field.options, current),
        WidgetKind::Password | WidgetKind::LongText | WidgetKind::ShortText => {
            let mut text = current.to_string();
            let edit = match field.kind {
                WidgetKind::Password => egui::TextEdit::singleline(&mut text).password(true),
                WidgetKind::LongText => egui::TextEdit::multiline(&mut text).desired_rows(4),
                _ => egui::TextEdit::singleline(&mut text),
            };
            let response = ui.add(edit.desired_width(f32::INFINITY));
            let edited = response.changed().then(|| FieldValue::Text(text.clone()));
            (response, edited)
        }
        WidgetKind::Nested => (ui.label(""), None),
    }
}

/// Edits are bounded below by zero; a stored negative value is shown and
/// saved unchanged until the user drags it.
fn paint_number(ui: &mut egui::Ui, current: FieldValue) -> (egui::Response, Option<FieldValue>) {
    match current {
        FieldValue::Float(mut f) => {
            let drag = egui::DragValue::new(&mut f)
                .speed(0.1)
                .range(0.0..=f64::MAX)
                .clamp_existing_to_range(false);
            let response = ui.add(drag);
            let edited = response.changed().then_some(FieldValue::Float(f));
            (response, edited)
        }
        other => {
            let mut i = match other {
                FieldValue::Int(i) => i,
                _ => 0,
            };
            let drag = egui::DragValue::new(&mut i)
                .speed(1.0)
                .range(0..=i64::MAX)
                .clamp_existing_to_range(false);
            let response = ui.add(drag);
            let edited = response.changed().then_some(FieldValue::Int(i));
            (response, edited)
        }
    }
}

fn paint_date(ui: &mut egui::Ui, salt: &str, current: FieldValue) -> (egui::Response, Option<FieldValue>) {
    let (mut date, time) = match &current {
        FieldValue::Date(d) => (*d, None),
        FieldValue::DateTime(dt) => (dt.date(), Some(dt.time())),
        FieldValue::Text(s) => date_text_parts(s).unwrap_or_else(|| (Local::now().date_naive(), None)),
        _ => (Local::now().date_naive(), None),
    };
    let response = ui.add(egui_extras::DatePickerButton::new(&mut date).id_salt(salt));
    let edited = response.changed().then(|| date_value(date, time));
    (response, edited)
}

fn date_value(date: NaiveDate, time: Option<NaiveTime>) -> FieldValue {
    match time {
        Some(t) => FieldValue::DateTime(date.and_time(t)),
        None => FieldValue::Date(date),
    }
}

/// A stored time that is off the step grid is shown and saved as stored.
/// Snapping applies to user drags only, so opening and saving a form never
/// moves a schedule.
fn paint_time(ui: &mut egui::Ui, current: FieldValue, step_secs: u32) -> (egui::Response, Option<FieldValue>) {
    let time = match current {
        FieldValue::Time(t) => t,
        _ => NaiveTime::MIN,
    };
    let step_minutes = (step_secs / 60).max(1);
    let mut hour = time.hour();
    let mut minute = time.minute();

    let inner = ui.horizontal(|ui| {
        let h = ui.add(egui::DragValue::new(&mut hour).range(0..=23).speed(0.1));
        ui.label(":");
        let m = ui.add(
            egui::DragValue::new(&mut minute)
                .range(0..=59)
                .speed(step_minutes as f64 / 4.0)
                .custom_formatter(|v, _| format!("{:02}", v as u32)),
        );
        h.union(m)
    });
    let response = inner.inner;
    if !response.changed() {
        return (response, None);
    }
    let minute = snap_minute(minute, step_minutes);
    let edited = NaiveTime::from_hms_opt(hour, minute, 0).map(FieldValue::Time);
    (response, edited)
}

/// Rounds to the nearest step, staying inside the hour.
fn snap_minute(minute: u32, step: u32) -> u32 {
    let snapped = ((minute + step / 2) / step) * step;
    if snapped >= 60 {
        60 - step.max(1)
    } else {
        snapped
    }
}

fn paint_multiselect(
    ui: &mut egui::Ui,
    options: &[FieldValue],
    current: FieldValue,
) -> (egui::Response, Option<FieldValue>) {
    let selected: Vec<FieldValue> = match current {
        FieldValue::List(items) => items,
        FieldValue::Null => Vec::new(),
        single => vec![single],
    };
    let inner = ui.horizontal_wrapped(|ui| {
        let mut changed_to = None;
        let mut response = ui.label("");
        for option in options {
            let mut checked = selected.contains(option);
            let r = ui.checkbox(&mut checked, option.to_string());
            if r.changed() {
                // Keep option order so unedited lists compare equal
                let next: Vec<FieldValue> = options
                    .iter()
                    .filter(|o| if *o == option { checked } else { selected.contains(o) })
                    .cloned()
                    .collect();
                changed_to = Some(FieldValue::List(next));
            }
            response = response.union(r);
        }
        (response, changed_to)
    });
    inner.inner
}
