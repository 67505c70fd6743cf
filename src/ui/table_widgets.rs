// src/ui/table_widgets.rs
use bevy_egui::egui;

use crate::api::RowChanges;
use crate::forms::widget::display_label;
use crate::forms::{FieldMap, FieldValue};

/// How a table column may be edited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellEditor<'a> {
    ReadOnly,
    Toggle,
    Text,
    Number(NumberBounds),
    Choice(&'a [&'a str]),
}

/// Range and drag step for an editable numeric column. Out-of-range stored
/// values are shown as they are; only edits are bounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl NumberBounds {
    pub const NON_NEGATIVE: NumberBounds = NumberBounds { min: 0.0, max: f64::MAX, step: 0.1 };

    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }
}

/// Paints one cell. Returns the new value when the user changed it.
pub fn paint_cell(ui: &mut egui::Ui, salt: &str, value: &FieldValue, editor: CellEditor<'_>) -> Option<FieldValue> {
    match editor {
        CellEditor::ReadOnly => {
            ui.label(value.to_string());
            None
        }
        CellEditor::Toggle => {
            let mut checked = value.is_truthy();
            ui.checkbox(&mut checked, "")
                .changed()
                .then_some(FieldValue::Bool(checked))
        }
        CellEditor::Number(bounds) => {
            let mut n = value.as_f64().unwrap_or_default();
            let drag = egui::DragValue::new(&mut n)
                .speed(bounds.step)
                .range(bounds.min..=bounds.max)
                .clamp_existing_to_range(false);
            let changed = ui.add(drag).changed();
            changed.then(|| match value {
                FieldValue::Int(_) => FieldValue::Int(n.round() as i64),
                _ => FieldValue::Float(n),
            })
        }
        CellEditor::Text => {
            let mut text = value.to_string();
            ui.add(egui::TextEdit::singleline(&mut text).desired_width(140.0))
                .changed()
                .then(|| FieldValue::Text(text.clone()))
        }
        CellEditor::Choice(options) => {
            let current = value.to_string();
            let mut selected = current.clone();
            egui::ComboBox::from_id_salt(salt)
                .selected_text(selected.as_str())
                .show_ui(ui, |ui| {
                    for option in options {
                        ui.selectable_value(&mut selected, option.to_string(), *option);
                    }
                });
            (selected != current).then(|| FieldValue::Text(selected))
        }
    }
}

/// Editable grid over `rows`. Pending edits in `changes` are shown in place
/// of the stored values; `row_indices` maps displayed rows back to the
/// dataset. With `deletable`, a leading column toggles row deletion.
pub struct RowTable<'a> {
    pub salt: &'a str,
    pub columns: &'a [&'a str],
    pub rows: &'a [FieldMap],
    pub row_indices: &'a [usize],
    pub deletable: bool,
}

impl RowTable<'_> {
    pub fn show<F>(&self, ui: &mut egui::Ui, changes: &mut RowChanges, editor_for: F)
    where
        F: Fn(&str, &FieldValue) -> CellEditor<'static>,
    {
        let salt = self.salt;
        egui::ScrollArea::horizontal()
            .id_salt(format!("{}_scroll", salt))
            .auto_shrink([false, true])
            .show(ui, |ui| {
                egui::Grid::new(format!("{}_grid", salt))
                    .striped(true)
                    .show(ui, |grid| {
                        if self.deletable {
                            grid.strong("Delete");
                        }
                        for column in self.columns {
                            grid.strong(display_label(column));
                        }
                        grid.end_row();

                        for &index in self.row_indices {
                            let Some(row) = self.rows.get(index) else {
                                continue;
                            };
                            if self.deletable {
                                let mut marked = changes.deleted_rows.contains(&index);
                                if grid.checkbox(&mut marked, "").changed() {
                                    changes.toggle_delete(index);
                                }
                            }
                            for &column in self.columns {
                                let stored = row.get(column).cloned().unwrap_or_default();
                                let shown = changes
                                    .edited_rows
                                    .get(&index)
                                    .and_then(|edits| edits.get(column))
                                    .cloned()
                                    .unwrap_or(stored);
                                let cell_salt = format!("{}_{}_{}", salt, index, column);
                                if let Some(value) = paint_cell(grid, &cell_salt, &shown, editor_for(column, &shown)) {
                                    changes.edit(index, column, value);
                                }
                            }
                            grid.end_row();
                        }
                    });
            });
    }
}
