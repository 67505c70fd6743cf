// src/ui/pages/tips_page.rs
use bevy_egui::egui;
use chrono::Local;

use super::PageContext;
use crate::api::tips::{bucket_tips, BET_RESULT_OPTIONS, TIP_COLUMNS};
use crate::api::{TipBucket, TipsStore};
use crate::forms::FieldValue;
use crate::ui::table_widgets::{CellEditor, RowTable};

pub fn show(ui: &mut egui::Ui, ctx: &mut PageContext, store: &mut TipsStore) {
    let tips = match store.tips(ctx.api) {
        Ok(tips) => tips,
        Err(e) => {
            ui.colored_label(egui::Color32::RED, format!("Could not load tips: {}", e));
            return;
        }
    };

    ui.horizontal(|ui| {
        let pending = !ctx.state.tip_changes.edited_rows.is_empty();
        if ui.add_enabled(pending, egui::Button::new("Save Changes")).clicked() {
            let report = store.update_tips(ctx.api, &ctx.state.tip_changes.edited_rows, &tips);
            ctx.report(&report);
            ctx.state.tip_changes.clear();
        }
        if ui.add_enabled(pending, egui::Button::new("Discard")).clicked() {
            ctx.state.tip_changes.clear();
        }
        if ui.button("Refresh").clicked() {
            store.invalidate();
        }
    });
    ui.separator();

    let buckets = bucket_tips(&tips, Local::now().date_naive());
    for bucket in TipBucket::ALL {
        let rows = buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[]);
        egui::CollapsingHeader::new(format!("{} ({})", bucket.title(), rows.len()))
            .id_salt(bucket.title())
            .default_open(matches!(bucket, TipBucket::Today | TipBucket::Tomorrow))
            .show(ui, |ui| {
                if rows.is_empty() {
                    ui.weak("No tips.");
                    return;
                }
                let salt = format!("tips_{}", bucket.title());
                RowTable {
                    salt: &salt,
                    columns: TIP_COLUMNS,
                    rows: &tips,
                    row_indices: rows,
                    deletable: false,
                }
                .show(ui, &mut ctx.state.tip_changes, tip_editor);
            });
    }
}

fn tip_editor(column: &str, _value: &FieldValue) -> CellEditor<'static> {
    match column {
        "free_tips" | "premium_tip" => CellEditor::Toggle,
        "event_result" => CellEditor::Text,
        "bet_result" => CellEditor::Choice(BET_RESULT_OPTIONS),
        _ => CellEditor::ReadOnly,
    }
}
