// src/ui/pages/platforms_page.rs
use bevy_egui::egui;

use super::PageContext;
use crate::api::batch::record_id;
use crate::api::platforms::{platform_label, quick_summary, NEXT_PUBLISH_FIELD, PLATFORM_ID_FIELD};
use crate::api::{PlatformAction, PlatformStore};
use crate::forms::{render_form, FieldMap, FieldValue, FormSession, RenderOptions, Schema};
use crate::ui::form_widgets::paint_form;
use crate::ui::table_widgets::{CellEditor, NumberBounds, RowTable};

pub fn platform_render_options(debug: bool) -> RenderOptions {
    RenderOptions {
        debug,
        skip_fields: vec![PLATFORM_ID_FIELD.to_string()],
        readonly_fields: vec![NEXT_PUBLISH_FIELD.to_string()],
        ..Default::default()
    }
}

/// Paints the platforms page. Returns the newly selected platform id when
/// the selector changed.
pub fn show(
    ui: &mut egui::Ui,
    ctx: &mut PageContext,
    store: &mut PlatformStore,
    session: &mut FormSession,
    last_platform: Option<&str>,
) -> Option<String> {
    let schema = match store.default_schema(ctx.api) {
        Ok(schema) => schema,
        Err(e) => {
            ui.colored_label(egui::Color32::RED, format!("{}. Platform forms are unavailable.", e));
            return None;
        }
    };
    let platforms = match store.platforms(ctx.api) {
        Ok(platforms) => platforms,
        Err(e) => {
            ui.colored_label(egui::Color32::RED, format!("Could not load platforms: {}", e));
            return None;
        }
    };

    ui.horizontal(|ui| {
        if ui.button("Add New Platform").clicked() {
            let result = store.add_new(ctx.api);
            ctx.outcome(result, "Platform created");
        }
        if ui.button("Refresh").clicked() {
            store.invalidate();
        }
    });

    egui::CollapsingHeader::new("Quick Summary")
        .id_salt("platform_quick_summary")
        .default_open(false)
        .show(ui, |ui| show_summary(ui, ctx, store, &platforms, &schema));

    ui.separator();
    if platforms.is_empty() {
        ui.label("No platforms yet.");
        return None;
    }

    let current = last_platform
        .filter(|id| platforms.iter().any(|p| record_id(p, PLATFORM_ID_FIELD).as_deref() == Some(*id)))
        .map(str::to_string)
        .or_else(|| platforms.iter().find_map(|p| record_id(p, PLATFORM_ID_FIELD)))?;

    let mut choice = current.clone();
    let selected_label = find_platform(&platforms, &current).map(platform_label).unwrap_or_default();
    egui::ComboBox::from_id_salt("platform_selector")
        .width(520.0)
        .selected_text(selected_label)
        .show_ui(ui, |ui| {
            for platform in &platforms {
                if let Some(id) = record_id(platform, PLATFORM_ID_FIELD) {
                    ui.selectable_value(&mut choice, id, platform_label(platform));
                }
            }
        });

    let record = find_platform(&platforms, &choice)?;
    ui.add_space(8.0);
    let form = render_form(&schema.project(record), &choice, session, &platform_render_options(ctx.debug));
    paint_form(ui, &form, session);

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        for action in PlatformAction::ALL {
            if ui.button(action.label()).clicked() {
                session.mark_submitted(&choice, action.label());
            }
        }
    });

    (Some(choice.as_str()) != last_platform).then_some(choice)
}

fn find_platform<'a>(platforms: &'a [FieldMap], id: &str) -> Option<&'a FieldMap> {
    platforms
        .iter()
        .find(|p| record_id(p, PLATFORM_ID_FIELD).as_deref() == Some(id))
}

fn show_summary(
    ui: &mut egui::Ui,
    ctx: &mut PageContext,
    store: &mut PlatformStore,
    platforms: &[FieldMap],
    schema: &Schema,
) {
    let rows = quick_summary(platforms, schema);
    let columns: Vec<&str> = rows
        .first()
        .map(|row| row.keys().map(String::as_str).collect())
        .unwrap_or_default();
    let indices: Vec<usize> = (0..rows.len()).collect();

    RowTable {
        salt: "platform_summary",
        columns: &columns,
        rows: &rows,
        row_indices: &indices,
        deletable: true,
    }
    .show(ui, &mut ctx.state.summary_changes, summary_editor);

    let pending = !ctx.state.summary_changes.is_empty();
    if ui.add_enabled(pending, egui::Button::new("Save Changes")).clicked() {
        let report = store.apply_summary_changes(ctx.api, &ctx.state.summary_changes, &rows);
        ctx.report(&report);
        ctx.state.summary_changes.clear();
    }
}

fn summary_editor(column: &str, value: &FieldValue) -> CellEditor<'static> {
    if column == PLATFORM_ID_FIELD || column == NEXT_PUBLISH_FIELD {
        return CellEditor::ReadOnly;
    }
    match value {
        FieldValue::Bool(_) => CellEditor::Toggle,
        FieldValue::Int(_) | FieldValue::Float(_) => CellEditor::Number(summary_bounds(column)),
        FieldValue::Text(_) | FieldValue::Null => CellEditor::Text,
        _ => CellEditor::ReadOnly,
    }
}

fn summary_bounds(column: &str) -> NumberBounds {
    match column {
        "stake_amount" => NumberBounds::new(0.0, 1000.0, 0.01),
        "max_tips" => NumberBounds::new(0.0, 1000.0, 1.0),
        "tips_days_delta" => NumberBounds::new(-1000.0, 1000.0, 1.0),
        _ => NumberBounds::NON_NEGATIVE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options() {
        let options = platform_render_options(true);
        assert!(options.debug);
        assert_eq!(options.skip_fields, vec!["id".to_string()]);
        assert_eq!(options.readonly_fields, vec!["next_publish".to_string()]);
    }

    #[test]
    fn test_summary_editor() {
        assert_eq!(summary_editor("id", &FieldValue::text("p1")), CellEditor::ReadOnly);
        assert_eq!(summary_editor("active", &FieldValue::Bool(true)), CellEditor::Toggle);
        assert_eq!(
            summary_editor("max_tips", &FieldValue::Int(3)),
            CellEditor::Number(NumberBounds::new(0.0, 1000.0, 1.0))
        );
        match summary_editor("tips_days_delta", &FieldValue::Int(-1)) {
            CellEditor::Number(bounds) => assert!(bounds.min <= -1.0),
            other => panic!("expected a number editor, got {:?}", other),
        }
        assert_eq!(
            summary_editor("rating", &FieldValue::Float(1.5)),
            CellEditor::Number(NumberBounds::NON_NEGATIVE)
        );
        assert_eq!(summary_editor("tips_filter", &FieldValue::List(vec![])), CellEditor::ReadOnly);
    }
}
