// TorrTide - GPL-3.0-or-later
// This file is part of TorrTide.
//
// Copyright (C) 2026 TorrTide contributors
//
// TorrTide is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// TorrTide is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with TorrTide.  If not, see <https://www.gnu.org/licenses/>.

//! Editor window for typed per-column filters.
//!
//! Each row picks a column, an operator legal for that column's kind,
//! and an operand typed as free text and parsed per kind. Rows that
//! fail to parse still compile (to match-all), so editing never blanks
//! the table.

use crate::core::field::{FieldKind, FieldValue};
use crate::core::property_filter::{
    FilterOperator, PropertyFilterDefinition, PropertyFilterList,
};
use crate::core::torrent::torrent_properties;
use chrono::{NaiveDate, TimeZone, Utc};
use egui::{ComboBox, Context, Ui};
use std::collections::HashMap;

/// Parse user input into the operand for `kind`. Empty or unparseable
/// input becomes None and the row degrades to match-all.
fn parse_operand(kind: FieldKind, raw: &str) -> Option<FieldValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match kind {
        FieldKind::Text => Some(FieldValue::Text(raw.to_string())),
        FieldKind::Enum => Some(FieldValue::Enum(Some(raw.to_string()))),
        FieldKind::Guid => Some(FieldValue::Guid(Some(raw.to_string()))),
        FieldKind::Number => raw.parse::<f64>().ok().map(|n| FieldValue::Number(Some(n))),
        FieldKind::Bool => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(FieldValue::Bool(Some(true))),
            "false" | "no" | "0" => Some(FieldValue::Bool(Some(false))),
            _ => None,
        },
        FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| FieldValue::Date(Some(Utc.from_utc_datetime(&dt)))),
    }
}

/// Window state: the filter list lives in the app; this holds only the
/// raw operand text per row (the typed value is derived from it).
pub struct PropertyFilterEditor {
    raw_values: HashMap<String, String>,
    new_column: Option<&'static str>,
    pub open: bool,
}

impl PropertyFilterEditor {
    pub fn new() -> Self {
        PropertyFilterEditor {
            raw_values: HashMap::new(),
            new_column: None,
            open: false,
        }
    }

    /// Show the editor; returns true when the list changed.
    pub fn show(&mut self, ctx: &Context, list: &mut PropertyFilterList) -> bool {
        if !self.open {
            return false;
        }
        let mut changed = false;
        let mut open = self.open;

        egui::Window::new("Filters")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                changed |= self.filter_rows(ui, list);
                ui.separator();
                changed |= self.add_row(ui, list);
            });

        self.open = open;
        changed
    }

    fn filter_rows(&mut self, ui: &mut Ui, list: &mut PropertyFilterList) -> bool {
        let registry = torrent_properties();
        let mut changed = false;
        let mut remove: Option<String> = None;
        let mut set_op: Option<(String, FilterOperator)> = None;
        let mut set_value: Option<(String, Option<FieldValue>)> = None;

        if list.is_empty() {
            ui.label("No filters active.");
        }

        for def in list.iter() {
            let Some(prop) = registry.resolve(&def.column) else {
                continue;
            };
            let kind = prop.kind;
            let current_op = FilterOperator::from_name(&def.operator);

            ui.horizontal(|ui| {
                ui.monospace(&def.column);

                let op_label = current_op.map_or("?", FilterOperator::name);
                ComboBox::from_id_salt(format!("op_{}", def.column))
                    .selected_text(op_label)
                    .show_ui(ui, |ui| {
                        for op in FilterOperator::for_kind(kind) {
                            if ui
                                .selectable_label(current_op == Some(*op), op.name())
                                .clicked()
                            {
                                set_op = Some((def.column.clone(), *op));
                            }
                        }
                    });

                if current_op.is_some_and(FilterOperator::expects_operand) {
                    let raw = self.raw_values.entry(def.column.clone()).or_default();
                    if ui.text_edit_singleline(raw).changed() {
                        set_value = Some((def.column.clone(), parse_operand(kind, raw)));
                    }
                }

                if ui.button("\u{2715}").clicked() {
                    remove = Some(def.column.clone());
                }
            });
        }

        if let Some((column, op)) = set_op {
            changed |= list.set_operator(&column, op);
        }
        if let Some((column, value)) = set_value {
            changed |= list.set_value(&column, value);
        }
        if let Some(column) = remove {
            changed |= list.remove(&column);
            self.raw_values.remove(&column);
        }
        changed
    }

    fn add_row(&mut self, ui: &mut Ui, list: &mut PropertyFilterList) -> bool {
        let registry = torrent_properties();
        let mut changed = false;

        ui.horizontal(|ui| {
            ComboBox::from_id_salt("new_filter_column")
                .selected_text(self.new_column.unwrap_or("column..."))
                .show_ui(ui, |ui| {
                    for id in registry.column_ids() {
                        if ui
                            .selectable_label(self.new_column == Some(id), id)
                            .clicked()
                        {
                            self.new_column = Some(id);
                        }
                    }
                });

            let can_add = self.new_column.is_some();
            if ui.add_enabled(can_add, egui::Button::new("Add")).clicked() {
                if let Some(column) = self.new_column.take() {
                    if let Some(prop) = registry.resolve(column) {
                        let default_op = FilterOperator::for_kind(prop.kind)
                            .first()
                            .copied()
                            .unwrap_or(FilterOperator::NotEmpty);
                        changed |= list.add(PropertyFilterDefinition::new(
                            column, default_op, None,
                        ));
                    }
                }
            }
        });
        changed
    }
}

impl Default for PropertyFilterEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operand_per_kind() {
        assert_eq!(
            parse_operand(FieldKind::Number, " 42 "),
            Some(FieldValue::Number(Some(42.0)))
        );
        assert_eq!(parse_operand(FieldKind::Number, "abc"), None);
        assert_eq!(
            parse_operand(FieldKind::Bool, "Yes"),
            Some(FieldValue::Bool(Some(true)))
        );
        assert_eq!(parse_operand(FieldKind::Text, ""), None);

        let Some(FieldValue::Date(Some(d))) = parse_operand(FieldKind::Date, "2026-08-30") else {
            panic!("date did not parse");
        };
        assert_eq!(d.to_rfc3339(), "2026-08-30T00:00:00+00:00");
        assert_eq!(parse_operand(FieldKind::Date, "30/08/2026"), None);
    }
}
