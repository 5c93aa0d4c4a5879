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

//! The column-options dialog: visibility, ordering and width overrides,
//! staged locally and applied as one batch on confirm.

use crate::core::Torrent;
use crate::storage::KvStore;
use crate::table::{DynamicTable, WidthOverride};
use egui::{Context, Ui};
use std::collections::{BTreeSet, HashMap};

/// One staged row in the dialog.
struct ColumnEntry {
    id: String,
    label: String,
    visible: bool,
    /// None means automatic width.
    width: Option<f32>,
}

/// Staged (not yet applied) edits; dropped on cancel.
pub struct ColumnOptionsDialog {
    entries: Vec<ColumnEntry>,
    open: bool,
}

impl ColumnOptionsDialog {
    /// Snapshot the table's current layout into editable state.
    pub fn open_for(table: &mut DynamicTable<Torrent>) -> Self {
        // present in current visual order: visible columns first in their
        // shown order, hidden ones after in definition order
        let visible: Vec<usize> = table.visible_columns().iter().map(|c| c.index).collect();
        let layout = table.layout();
        let mut entries = Vec::new();

        for &i in &visible {
            let def = table.def(i);
            entries.push(ColumnEntry {
                id: def.id().to_string(),
                label: def.display_header().to_string(),
                visible: true,
                width: match layout.widths.get(def.id()) {
                    Some(WidthOverride::Px(w)) => Some(*w),
                    Some(WidthOverride::Auto) => None,
                    None => def.default_width(),
                },
            });
        }
        for (i, def) in table.defs().iter().enumerate() {
            if visible.contains(&i) {
                continue;
            }
            entries.push(ColumnEntry {
                id: def.id().to_string(),
                label: def.display_header().to_string(),
                visible: false,
                width: def.default_width(),
            });
        }

        ColumnOptionsDialog {
            entries,
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the dialog. Returns true when the user applied the staged
    /// layout (the table was updated and persisted).
    pub fn show(
        &mut self,
        ctx: &Context,
        table: &mut DynamicTable<Torrent>,
        store: &dyn KvStore,
    ) -> bool {
        let mut applied = false;
        let mut open = self.open;

        egui::Window::new("Columns")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                self.entry_rows(ui);
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        self.apply(table, store);
                        applied = true;
                        self.open = false;
                    }
                    if ui.button("Cancel").clicked() {
                        self.open = false;
                    }
                });
            });

        // the window's own close button
        if !open {
            self.open = false;
        }
        applied
    }

    fn entry_rows(&mut self, ui: &mut Ui) {
        let mut swap: Option<(usize, usize)> = None;
        let count = self.entries.len();

        for (i, entry) in self.entries.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.checkbox(&mut entry.visible, "");
                if ui.add_enabled(i > 0, egui::Button::new("\u{2b06}")).clicked() {
                    swap = Some((i, i - 1));
                }
                if ui
                    .add_enabled(i + 1 < count, egui::Button::new("\u{2b07}"))
                    .clicked()
                {
                    swap = Some((i, i + 1));
                }
                ui.label(&entry.label);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut auto = entry.width.is_none();
                    if ui.checkbox(&mut auto, "auto").changed() {
                        entry.width = if auto { None } else { Some(100.0) };
                    }
                    if let Some(w) = &mut entry.width {
                        ui.add(
                            egui::DragValue::new(w)
                                .range(20.0..=2000.0)
                                .suffix(" px"),
                        );
                    }
                });
            });
        }

        if let Some((a, b)) = swap {
            self.entries.swap(a, b);
        }
    }

    fn apply(&self, table: &mut DynamicTable<Torrent>, store: &dyn KvStore) {
        let selected: BTreeSet<String> = self
            .entries
            .iter()
            .filter(|e| e.visible)
            .map(|e| e.id.clone())
            .collect();

        let mut widths = HashMap::new();
        let mut order = HashMap::new();
        let mut rank = 0u32;
        for entry in &self.entries {
            let default_width = table
                .defs()
                .iter()
                .find(|d| d.id() == entry.id)
                .and_then(|d| d.default_width());
            match entry.width {
                Some(w) if Some(w) != default_width => {
                    widths.insert(entry.id.clone(), WidthOverride::Px(w));
                }
                None if default_width.is_some() => {
                    widths.insert(entry.id.clone(), WidthOverride::Auto);
                }
                _ => {}
            }
            if entry.visible {
                order.insert(entry.id.clone(), rank);
                rank += 1;
            }
        }

        let applied = table.apply_column_options(selected, widths, order, store);
        if applied.any() {
            log::debug!("column options applied: {applied:?}");
        }
    }
}
