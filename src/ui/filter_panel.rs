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

//! The filter sidebar: status list, category/tag/tracker trees, and the
//! search box.

use crate::core::filter::{
    CategoryFilter, FilterState, SearchField, StatusFilter, TagFilter, TrackerFilter,
};
use crate::core::MainData;
use egui::{Color32, RichText, Ui};

/// Render the sidebar; returns true when any filter changed so the
/// caller can recompute the visible set.
pub fn render(ui: &mut Ui, filter: &mut FilterState, data: &MainData) -> bool {
    let mut changed = false;

    ui.heading("Status");
    for status in StatusFilter::ALL {
        let selected = filter.status == *status;
        if ui.selectable_label(selected, status.label()).clicked() && !selected {
            filter.status = *status;
            changed = true;
        }
    }

    ui.separator();
    ui.horizontal(|ui| {
        ui.heading("Categories");
        if ui
            .checkbox(&mut filter.use_subcategories, "subtree")
            .on_hover_text("Match subcategories (a/b matches filter a)")
            .changed()
        {
            changed = true;
        }
    });
    changed |= category_list(ui, filter, data);

    ui.separator();
    ui.heading("Tags");
    changed |= tag_list(ui, filter, data);

    ui.separator();
    ui.heading("Trackers");
    changed |= tracker_list(ui, filter, data);

    ui.separator();
    changed |= search_box(ui, filter);

    changed
}

fn category_list(ui: &mut Ui, filter: &mut FilterState, data: &MainData) -> bool {
    let mut changed = false;
    let select = |ui: &mut Ui, label: &str, value: CategoryFilter, current: &CategoryFilter| {
        let selected = *current == value;
        if ui.selectable_label(selected, label).clicked() && !selected {
            return Some(value);
        }
        None
    };

    let current = filter.category.clone();
    if let Some(v) = select(ui, "All", CategoryFilter::All, &current) {
        filter.category = v;
        changed = true;
    }
    if let Some(v) = select(ui, "Uncategorized", CategoryFilter::Uncategorized, &current) {
        filter.category = v;
        changed = true;
    }
    for name in data.categories.keys() {
        if let Some(v) = select(ui, name, CategoryFilter::Name(name.clone()), &current) {
            filter.category = v;
            changed = true;
        }
    }
    changed
}

fn tag_list(ui: &mut Ui, filter: &mut FilterState, data: &MainData) -> bool {
    let mut changed = false;
    let current = filter.tag.clone();

    let all = current == TagFilter::All;
    if ui.selectable_label(all, "All").clicked() && !all {
        filter.tag = TagFilter::All;
        changed = true;
    }
    let untagged = current == TagFilter::Untagged;
    if ui.selectable_label(untagged, "Untagged").clicked() && !untagged {
        filter.tag = TagFilter::Untagged;
        changed = true;
    }
    for name in &data.tags {
        let selected = current == TagFilter::Name(name.clone());
        if ui.selectable_label(selected, name).clicked() && !selected {
            filter.tag = TagFilter::Name(name.clone());
            changed = true;
        }
    }
    changed
}

fn tracker_list(ui: &mut Ui, filter: &mut FilterState, data: &MainData) -> bool {
    let mut changed = false;
    let current = filter.tracker.clone();

    let all = current == TrackerFilter::All;
    if ui.selectable_label(all, "All").clicked() && !all {
        filter.tracker = TrackerFilter::All;
        changed = true;
    }
    let trackerless = current == TrackerFilter::Trackerless;
    if ui.selectable_label(trackerless, "Trackerless").clicked() && !trackerless {
        filter.tracker = TrackerFilter::Trackerless;
        changed = true;
    }
    for (url, hashes) in &data.trackers {
        let label = format!("{url} ({})", hashes.len());
        let selected = current == TrackerFilter::Url(url.clone());
        if ui.selectable_label(selected, label).clicked() && !selected {
            filter.tracker = TrackerFilter::Url(url.clone());
            changed = true;
        }
    }
    changed
}

fn search_box(ui: &mut Ui, filter: &mut FilterState) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        let edit = egui::TextEdit::singleline(&mut filter.search_text)
            .hint_text(if filter.use_regex {
                "Regex..."
            } else {
                "Search (+required -excluded)..."
            })
            .desired_width(f32::INFINITY);
        if ui.add(edit).changed() {
            changed = true;
        }
    });
    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt("search_field")
            .selected_text(filter.search_field.label())
            .show_ui(ui, |ui| {
                for field in SearchField::ALL {
                    if ui
                        .selectable_value(&mut filter.search_field, *field, field.label())
                        .changed()
                    {
                        changed = true;
                    }
                }
            });
        if ui.checkbox(&mut filter.use_regex, "Regex").changed() {
            changed = true;
        }
        if filter.use_regex && !filter.is_regex_valid {
            ui.label(RichText::new("invalid pattern").color(Color32::from_rgb(255, 100, 100)));
        }
    });
    changed
}
