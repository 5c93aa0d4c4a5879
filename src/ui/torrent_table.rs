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

//! The main torrent table: column definitions and the egui rendering.

use crate::core::field::{FieldKind, FieldValue};
use crate::core::fmt::{format_bytes, format_eta, format_progress, format_ratio, format_speed};
use crate::core::Torrent;
use crate::storage::KvStore;
use crate::table::{ColumnDefinition, DynamicTable, SortDirection, WidthOverride};
use crate::table::dynamic_table::ClickModifiers;
use egui::Ui;
use egui_extras::{Column, TableBuilder};
use std::time::Instant;

/// Actions requested from the table's context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorrentTableEvent {
    Pause(Vec<String>),
    Resume(Vec<String>),
    Delete { hashes: Vec<String>, with_files: bool },
}

/// Every column the torrent table can show. Ids derive from the headers
/// and line up with the property-filter registry.
pub fn torrent_columns() -> Vec<ColumnDefinition<Torrent>> {
    vec![
        ColumnDefinition::new("Name", FieldKind::Text, |t: &Torrent| {
            FieldValue::Text(t.name.clone())
        })
        .with_width(320.0),
        ColumnDefinition::new("Size", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.size as f64))
        })
        .with_formatter(|t| format_bytes(t.size))
        .with_width(80.0),
        ColumnDefinition::new("Progress", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.progress))
        })
        .with_formatter(|t| format_progress(t.progress))
        .with_width(70.0),
        ColumnDefinition::new("State", FieldKind::Enum, |t: &Torrent| {
            FieldValue::Enum(Some(t.state.clone()))
        })
        .with_width(100.0),
        ColumnDefinition::new("Seeds", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.num_seeds as f64))
        })
        .with_formatter(|t| t.num_seeds.to_string())
        .with_width(55.0)
        .with_initial_direction(SortDirection::Descending),
        ColumnDefinition::new("Peers", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.num_leechs as f64))
        })
        .with_formatter(|t| t.num_leechs.to_string())
        .with_width(55.0)
        .with_initial_direction(SortDirection::Descending),
        ColumnDefinition::new("Down Speed", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.dlspeed as f64))
        })
        .with_formatter(|t| format_speed(t.dlspeed))
        .with_width(90.0)
        .with_initial_direction(SortDirection::Descending),
        ColumnDefinition::new("Up Speed", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.upspeed as f64))
        })
        .with_formatter(|t| format_speed(t.upspeed))
        .with_width(90.0)
        .with_initial_direction(SortDirection::Descending),
        ColumnDefinition::new("ETA", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.eta as f64))
        })
        .with_formatter(|t| format_eta(t.eta))
        .with_width(70.0),
        ColumnDefinition::new("Ratio", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.ratio))
        })
        .with_formatter(|t| format_ratio(t.ratio))
        .with_width(55.0)
        .with_initial_direction(SortDirection::Descending),
        ColumnDefinition::new("Category", FieldKind::Enum, |t: &Torrent| {
            FieldValue::Enum(if t.category.is_empty() {
                None
            } else {
                Some(t.category.clone())
            })
        })
        .with_width(100.0),
        ColumnDefinition::new("Tags", FieldKind::Text, |t: &Torrent| {
            FieldValue::Text(t.tags.join(", "))
        })
        .with_width(100.0)
        .disabled(),
        ColumnDefinition::new("Added On", FieldKind::Date, |t: &Torrent| {
            FieldValue::Date(t.added_date())
        })
        .with_formatter(|t| {
            t.added_date()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default()
        })
        .with_width(125.0)
        .with_initial_direction(SortDirection::Descending),
        ColumnDefinition::new("Completed On", FieldKind::Date, |t: &Torrent| {
            FieldValue::Date(t.completion_date())
        })
        .with_formatter(|t| {
            t.completion_date()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default()
        })
        .with_width(125.0)
        .with_initial_direction(SortDirection::Descending)
        .disabled(),
        ColumnDefinition::new("Downloaded", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.downloaded as f64))
        })
        .with_formatter(|t| format_bytes(t.downloaded))
        .with_width(90.0)
        .disabled(),
        ColumnDefinition::new("Uploaded", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.uploaded as f64))
        })
        .with_formatter(|t| format_bytes(t.uploaded))
        .with_width(90.0)
        .disabled(),
        ColumnDefinition::new("Tracker", FieldKind::Text, |t: &Torrent| {
            FieldValue::Text(t.tracker.clone())
        })
        .with_width(180.0)
        .disabled(),
        ColumnDefinition::new("Save Path", FieldKind::Text, |t: &Torrent| {
            FieldValue::Text(t.save_path.clone())
        })
        .with_width(200.0)
        .disabled(),
    ]
}

/// Render the torrent table for the already-filtered `rows`.
///
/// Sorting, selection and column toggling mutate `table` directly;
/// torrent actions come back as events for the caller to dispatch.
pub fn render(
    ui: &mut Ui,
    table: &mut DynamicTable<Torrent>,
    rows: &[&Torrent],
    store: &dyn KvStore,
) -> Vec<TorrentTableEvent> {
    let mut events = Vec::new();
    let order = table.order_rows(rows);
    let sort = table.sort().cloned();
    let visible: Vec<_> = table.visible_columns().to_vec();

    let header_height = ui.text_style_height(&egui::TextStyle::Heading);
    let available_height = ui.available_height();
    let body_height = available_height - header_height - 1.0;

    // Drag-resizes live in egui's table state; measure the header cells
    // and write changed widths back once the pointer is released.
    let pointer_released = ui.ctx().input(|i| i.pointer.any_released());

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .vscroll(true)
        .min_scrolled_height(body_height)
        .max_scroll_height(body_height);

    for col in &visible {
        builder = builder.column(match col.width {
            Some(w) => Column::initial(w).resizable(true).clip(true),
            None => Column::remainder().resizable(true).clip(true),
        });
    }

    let mut measured: Vec<(usize, f32)> = Vec::new();

    let mut sort_clicked: Option<String> = None;
    let mut toggle_clicked: Option<String> = None;
    let mut click: Option<(String, ClickModifiers)> = None;
    let mut long_press: Option<String> = None;
    let mut context_target: Option<String> = None;

    builder
        .header(header_height, |mut header| {
            for col in &visible {
                let def = table.def(col.index);
                let id = def.id().to_string();
                header.col(|ui| {
                    measured.push((col.index, ui.max_rect().width()));
                    let label = match &sort {
                        Some(s) if s.column == id => match s.direction {
                            SortDirection::Descending => {
                                format!("{} \u{2b07}", def.display_header())
                            }
                            SortDirection::Ascending | SortDirection::None => {
                                format!("{} \u{2b06}", def.display_header())
                            }
                        },
                        _ => def.display_header().to_string(),
                    };
                    let resp = ui.strong(label);
                    if resp.clicked() {
                        sort_clicked = Some(id.clone());
                    }
                    resp.context_menu(|ui| {
                        column_menu(ui, table, &mut toggle_clicked);
                    });
                });
            }
        })
        .body(|body| {
            body.rows(18.0, order.len(), |mut row| {
                let torrent = rows[order[row.index()]];
                row.set_selected(table.is_selected(&torrent.hash));

                for col in &visible {
                    let def = table.def(col.index);
                    row.col(|ui| {
                        ui.label(def.display(torrent));
                    });
                }

                let resp = row.response();
                let mods = resp.ctx.input(|i| ClickModifiers {
                    ctrl: i.modifiers.command,
                    alt: i.modifiers.alt,
                });
                if resp.long_touched() {
                    long_press = Some(torrent.hash.clone());
                } else if resp.clicked() {
                    click = Some((torrent.hash.clone(), mods));
                }
                if resp.secondary_clicked() {
                    context_target = Some(torrent.hash.clone());
                }
                resp.context_menu(|ui| {
                    let hashes: Vec<String> = table.selection().iter().cloned().collect();
                    action_menu(ui, hashes, &mut events);
                });
            });
        });

    if pointer_released {
        for (index, w) in measured {
            let stored = visible
                .iter()
                .find(|c| c.index == index)
                .and_then(|c| c.width);
            if let Some(cur) = stored {
                if (w - cur).abs() > 0.5 {
                    let id = table.def(index).id().to_string();
                    table.set_column_width(&id, WidthOverride::Px(w), store);
                }
            }
        }
    }

    let now = Instant::now();
    if let Some(hash) = long_press {
        table.handle_long_press(&hash, now);
    }
    if let Some(hash) = context_target {
        table.handle_context_menu(&hash);
    }
    if let Some((hash, mods)) = click {
        table.handle_row_click(&hash, mods, now);
    }
    if let Some(id) = sort_clicked {
        table.set_sort(&id, store);
    }
    if let Some(id) = toggle_clicked {
        table.toggle_column(&id, store);
    }

    events
}

fn column_menu(ui: &mut Ui, table: &DynamicTable<Torrent>, toggle: &mut Option<String>) {
    ui.label("Columns");
    ui.separator();
    for def in table.defs() {
        let shown = table.layout().selected.contains(def.id());
        let mut checked = shown;
        if ui.checkbox(&mut checked, def.display_header()).clicked() {
            *toggle = Some(def.id().to_string());
            ui.close();
        }
    }
}

fn action_menu(ui: &mut Ui, hashes: Vec<String>, events: &mut Vec<TorrentTableEvent>) {
    if hashes.is_empty() {
        ui.label("No selection");
        return;
    }
    if ui.button("Resume").clicked() {
        events.push(TorrentTableEvent::Resume(hashes.clone()));
        ui.close();
    }
    if ui.button("Pause").clicked() {
        events.push(TorrentTableEvent::Pause(hashes.clone()));
        ui.close();
    }
    ui.separator();
    if ui.button("Delete").clicked() {
        events.push(TorrentTableEvent::Delete {
            hashes: hashes.clone(),
            with_files: false,
        });
        ui.close();
    }
    if ui.button("Delete with files").clicked() {
        events.push(TorrentTableEvent::Delete {
            hashes,
            with_files: true,
        });
        ui.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::ids_are_unique;
    use crate::table::TableLayout;

    #[test]
    fn test_column_ids_unique_and_stable() {
        let defs = torrent_columns();
        assert!(ids_are_unique(&defs));
        let ids: Vec<&str> = defs.iter().map(ColumnDefinition::id).collect();
        // ids derive from headers; a rename here silently orphans stored
        // layouts, so pin them
        assert!(ids.contains(&"name"));
        assert!(ids.contains(&"down_speed"));
        assert!(ids.contains(&"up_speed"));
        assert!(ids.contains(&"added_on"));
        assert!(ids.contains(&"save_path"));
    }

    #[test]
    fn test_filterable_columns_resolve_in_registry() {
        let registry = crate::core::torrent::torrent_properties();
        for def in torrent_columns() {
            if def.id() == "tags" {
                // tags filter through the sidebar, not the property engine
                continue;
            }
            assert!(
                registry.resolve(def.id()).is_some(),
                "column {} has no filterable property",
                def.id()
            );
        }
    }

    #[test]
    fn test_default_layout_shows_core_columns() {
        let defs = torrent_columns();
        let selected = TableLayout::default_selection(&defs);
        assert!(selected.contains("name"));
        assert!(selected.contains("progress"));
        assert!(!selected.contains("save_path"));
        let sort = TableLayout::default_sort(&defs).unwrap();
        assert_eq!(sort.column, "name");
    }

    #[test]
    fn test_formatters_render_human_units() {
        let mut t = Torrent::new("h".to_string());
        t.size = 1_572_864;
        t.dlspeed = 2048;
        let defs = torrent_columns();
        let size = defs.iter().find(|d| d.id() == "size").unwrap();
        assert_eq!(size.display(&t), "1.5 MiB");
        let speed = defs.iter().find(|d| d.id() == "down_speed").unwrap();
        assert_eq!(speed.display(&t), "2.0 KiB/s");
    }
}
