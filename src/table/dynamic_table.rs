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

//! The configurable table orchestrator.
//!
//! Owns the column layout (loaded from and persisted to a `KvStore`),
//! the memoized visible-column list, row ordering, and row selection.
//! Rendering is elsewhere; this type is pure state and is exercised
//! directly by tests.

use crate::table::column::{
    ColumnDefinition, SortDirection, VisibleColumn, WidthOverride,
};
use crate::table::layout::{SortSpec, TableLayout};
use crate::storage::KvStore;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::{Duration, Instant};

/// A long-press suppresses the synthetic click that follows it within
/// this window (touch devices deliver both).
const LONG_PRESS_CLICK_SUPPRESSION: Duration = Duration::from_millis(500);

/// Static behavior switches for one table instance.
#[derive(Debug, Clone, Copy)]
pub struct TableConfig {
    /// Rows arrive already ordered (e.g. append-only logs); skip sorting.
    pub pre_sorted: bool,
    /// Plain clicks change the selection (single-select mode only).
    pub select_on_row_click: bool,
    /// Modifier-key multi-selection.
    pub multi_select: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            pre_sorted: false,
            select_on_row_click: true,
            multi_select: true,
        }
    }
}

/// Modifier keys active during a row click.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickModifiers {
    pub ctrl: bool,
    pub alt: bool,
}

/// External predicate narrowing the visible column set (e.g. hide
/// per-session columns when disconnected).
pub type ColumnFilter<T> = fn(&ColumnDefinition<T>) -> bool;

/// Result of a column-options dialog round trip: which pieces actually
/// changed (and were persisted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionsApplied {
    pub selection_changed: bool,
    pub widths_changed: bool,
    pub order_changed: bool,
    pub sort_changed: bool,
}

impl OptionsApplied {
    pub fn any(self) -> bool {
        self.selection_changed || self.widths_changed || self.order_changed || self.sort_changed
    }
}

pub struct DynamicTable<T> {
    defs: Vec<ColumnDefinition<T>>,
    layout: TableLayout,
    config: TableConfig,
    column_filter: Option<ColumnFilter<T>>,
    visible: Vec<VisibleColumn>,
    visible_dirty: bool,
    selection: BTreeSet<String>,
    last_long_press: Option<Instant>,
    initialized: bool,
}

impl<T> DynamicTable<T> {
    /// Construct with defaults; call [`Self::initialize`] before first
    /// use to load the persisted layout.
    pub fn new(
        type_name: &'static str,
        table_id: &str,
        defs: Vec<ColumnDefinition<T>>,
        config: TableConfig,
    ) -> Self {
        debug_assert!(crate::table::column::ids_are_unique(&defs));
        // Pre-init layout: defaults only, replaced by initialize().
        let layout = TableLayout::load(type_name, table_id, &defs, &crate::storage::MemoryStore::new());
        DynamicTable {
            defs,
            layout,
            config,
            column_filter: None,
            visible: Vec::new(),
            visible_dirty: true,
            selection: BTreeSet::new(),
            last_long_press: None,
            initialized: false,
        }
    }

    /// Load persisted layout and validate the sort. Idempotent.
    pub fn initialize(&mut self, type_name: &'static str, table_id: &str, store: &dyn KvStore) {
        if self.initialized {
            return;
        }
        self.layout = TableLayout::load(type_name, table_id, &self.defs, store);
        self.visible_dirty = true;
        self.ensure_sort_valid(store);
        self.initialized = true;
        log::debug!(
            "table {type_name}.{table_id} initialized: {} visible columns, sort {:?}",
            self.visible_columns().len(),
            self.layout.sort
        );
    }

    pub fn defs(&self) -> &[ColumnDefinition<T>] {
        &self.defs
    }

    pub fn def(&self, index: usize) -> &ColumnDefinition<T> {
        &self.defs[index]
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    pub fn set_column_filter(&mut self, filter: Option<ColumnFilter<T>>, store: &dyn KvStore) {
        self.column_filter = filter;
        self.visible_dirty = true;
        self.ensure_sort_valid(store);
    }

    /// The memoized visible/ordered column list. Recomputed only when a
    /// layout input changed since the last call.
    pub fn visible_columns(&mut self) -> &[VisibleColumn] {
        if self.visible_dirty {
            self.visible = self.compute_visible();
            self.visible_dirty = false;
        }
        &self.visible
    }

    fn effective_selection(&self) -> BTreeSet<String> {
        if self.layout.selected.is_empty() {
            TableLayout::default_selection(&self.defs)
        } else {
            self.layout.selected.clone()
        }
    }

    fn compute_visible(&self) -> Vec<VisibleColumn> {
        let selected = self.effective_selection();
        let mut indices: Vec<usize> = self
            .defs
            .iter()
            .enumerate()
            .filter(|(_, d)| selected.contains(d.id()))
            .filter(|(_, d)| self.column_filter.is_none_or(|f| f(d)))
            .map(|(i, _)| i)
            .collect();

        if !self.layout.order.is_empty() {
            let (mut ranked, unranked): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| self.layout.order.contains_key(self.defs[i].id()));
            // stable: ties keep original relative order
            ranked.sort_by_key(|&i| self.layout.order.get(self.defs[i].id()).copied());
            ranked.extend(unranked);
            indices = ranked;
        }

        // Defensive dedup by id; definition ids are unique, so this only
        // matters if a caller passed duplicated definitions.
        let mut seen = HashSet::new();
        indices.retain(|&i| seen.insert(self.defs[i].id().to_string()));

        indices
            .into_iter()
            .map(|i| VisibleColumn {
                index: i,
                width: self.resolve_width(i),
            })
            .collect()
    }

    fn resolve_width(&self, index: usize) -> Option<f32> {
        let def = &self.defs[index];
        match self.layout.widths.get(def.id()) {
            Some(WidthOverride::Px(w)) => Some(*w),
            Some(WidthOverride::Auto) => None,
            None => def.default_width(),
        }
    }

    // ----- sorting -------------------------------------------------------

    pub fn sort(&self) -> Option<&SortSpec> {
        self.layout.sort.as_ref()
    }

    /// Header click: same column toggles direction, a new column starts
    /// from its initial direction.
    pub fn set_sort(&mut self, column_id: &str, store: &dyn KvStore) {
        let direction = match &self.layout.sort {
            Some(spec) if spec.column == column_id => spec.direction.flipped(),
            _ => self
                .defs
                .iter()
                .find(|d| d.id() == column_id)
                .map(|d| d.initial_direction().or_ascending())
                .unwrap_or(SortDirection::Ascending),
        };
        self.layout.sort = Some(SortSpec {
            column: column_id.to_string(),
            direction,
        });
        self.layout.save_sort(store);
    }

    /// Re-validate the sort against the current visible set.
    ///
    /// Invariant: the sort column is always visible, or (empty visible
    /// set) the sort is cleared and its persisted entry removed. Returns
    /// true when the sort changed.
    pub fn ensure_sort_valid(&mut self, store: &dyn KvStore) -> bool {
        let visible_ids: Vec<&str> = {
            let cols = self.compute_visible();
            cols.iter().map(|c| self.defs[c.index].id()).collect()
        };

        if visible_ids.is_empty() {
            if self.layout.sort.is_some() {
                self.layout.sort = None;
                self.layout.save_sort(store);
                return true;
            }
            return false;
        }

        let valid = self
            .layout
            .sort
            .as_ref()
            .is_some_and(|s| visible_ids.contains(&s.column.as_str()));
        if valid {
            return false;
        }

        let fallback = visible_ids[0];
        let direction = self
            .defs
            .iter()
            .find(|d| d.id() == fallback)
            .map(|d| d.initial_direction().or_ascending())
            .unwrap_or(SortDirection::Ascending);
        self.layout.sort = Some(SortSpec {
            column: fallback.to_string(),
            direction,
        });
        self.layout.save_sort(store);
        true
    }

    /// Row order for `items`: indices into the slice. Accepts owned rows
    /// or references (filtered views borrow from the main data).
    ///
    /// Pre-sorted tables and tables without a resolvable sort column pass
    /// through unmodified; otherwise a stable sort by the sort column's
    /// accessor.
    pub fn order_rows<R: std::borrow::Borrow<T>>(&self, items: &[R]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..items.len()).collect();
        if self.config.pre_sorted {
            return order;
        }
        let Some(spec) = &self.layout.sort else {
            return order;
        };
        let Some(def) = self.defs.iter().find(|d| d.id() == spec.column) else {
            return order;
        };
        order.sort_by(|&a, &b| {
            let cmp = def
                .value(items[a].borrow())
                .cmp_for_sort(&def.value(items[b].borrow()));
            match spec.direction {
                SortDirection::Descending => cmp.reverse(),
                SortDirection::Ascending | SortDirection::None => cmp,
            }
        });
        order
    }

    // ----- column toggling & options dialog ------------------------------

    /// Toggle one column's visibility (e.g. from a header context menu).
    pub fn toggle_column(&mut self, column_id: &str, store: &dyn KvStore) {
        if !self.layout.selected.remove(column_id) {
            self.layout.selected.insert(column_id.to_string());
        }
        self.layout.save_selection(store);
        self.visible_dirty = true;
        self.ensure_sort_valid(store);
    }

    /// Apply a column-options dialog result. Only pieces that actually
    /// differ are persisted and reported; a cancel (identical values)
    /// is a complete no-op.
    pub fn apply_column_options(
        &mut self,
        selected: BTreeSet<String>,
        widths: HashMap<String, WidthOverride>,
        order: HashMap<String, u32>,
        store: &dyn KvStore,
    ) -> OptionsApplied {
        let mut applied = OptionsApplied::default();

        if selected != self.layout.selected {
            self.layout.selected = selected;
            self.layout.save_selection(store);
            applied.selection_changed = true;
        }
        if widths != self.layout.widths {
            self.layout.widths = widths;
            self.layout.save_widths(store);
            applied.widths_changed = true;
        }
        if order != self.layout.order {
            self.layout.order = order;
            self.layout.save_order(store);
            applied.order_changed = true;
        }

        if applied.selection_changed || applied.widths_changed || applied.order_changed {
            self.visible_dirty = true;
        }
        if self.ensure_sort_valid(store) {
            applied.sort_changed = true;
        }
        applied
    }

    /// Record a user width drag for one column.
    pub fn set_column_width(&mut self, column_id: &str, width: WidthOverride, store: &dyn KvStore) {
        if self.layout.widths.get(column_id) == Some(&width) {
            return;
        }
        self.layout.widths.insert(column_id.to_string(), width);
        self.layout.save_widths(store);
        self.visible_dirty = true;
    }

    // ----- selection ------------------------------------------------------

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selection.contains(key)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drop selected keys that no longer exist in the data set.
    pub fn retain_selection(&mut self, exists: impl Fn(&str) -> bool) {
        self.selection.retain(|k| exists(k));
    }

    /// Handle a row click. Returns true if the selection changed.
    ///
    /// Multi-select semantics: Ctrl toggles membership, Alt replaces
    /// with just this row, a plain click on an unselected row replaces,
    /// and a plain click on an already-selected row leaves the selection
    /// alone (so a multi-row drag does not collapse it).
    pub fn handle_row_click(&mut self, key: &str, mods: ClickModifiers, now: Instant) -> bool {
        if self.click_suppressed(now) {
            return false;
        }

        if !self.config.multi_select {
            if !self.config.select_on_row_click {
                return false;
            }
            let already = self.selection.len() == 1 && self.selection.contains(key);
            self.selection.clear();
            self.selection.insert(key.to_string());
            return !already;
        }

        if mods.ctrl {
            if !self.selection.remove(key) {
                self.selection.insert(key.to_string());
            }
            true
        } else if mods.alt {
            let already = self.selection.len() == 1 && self.selection.contains(key);
            self.selection.clear();
            self.selection.insert(key.to_string());
            !already
        } else if self.selection.contains(key) {
            // plain click on a selected row: keep the multi-selection
            false
        } else {
            self.selection.clear();
            self.selection.insert(key.to_string());
            true
        }
    }

    /// Handle a long-press (touch context menu). Selects the row if not
    /// already selected and arms click suppression.
    pub fn handle_long_press(&mut self, key: &str, now: Instant) -> bool {
        self.last_long_press = Some(now);
        if self.selection.contains(key) {
            return false;
        }
        self.selection.clear();
        self.selection.insert(key.to_string());
        true
    }

    /// Context-menu (right-click) selection: like long-press without the
    /// suppression window.
    pub fn handle_context_menu(&mut self, key: &str) -> bool {
        if self.selection.contains(key) {
            return false;
        }
        self.selection.clear();
        self.selection.insert(key.to_string());
        true
    }

    fn click_suppressed(&mut self, now: Instant) -> bool {
        match self.last_long_press {
            Some(at) if now.duration_since(at) < LONG_PRESS_CLICK_SUPPRESSION => {
                self.last_long_press = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldKind, FieldValue};
    use crate::storage::MemoryStore;
    use crate::table::layout::TableLayout;

    #[derive(Clone)]
    struct Row {
        name: String,
        size: i64,
    }

    fn defs() -> Vec<ColumnDefinition<Row>> {
        vec![
            ColumnDefinition::new("Name", FieldKind::Text, |r: &Row| {
                FieldValue::Text(r.name.clone())
            }),
            ColumnDefinition::new("Size", FieldKind::Number, |r: &Row| {
                FieldValue::Number(Some(r.size as f64))
            }),
            ColumnDefinition::new("Tracker", FieldKind::Text, |_| {
                FieldValue::Text(String::new())
            })
            .disabled(),
        ]
    }

    fn table(store: &MemoryStore) -> DynamicTable<Row> {
        let mut t = DynamicTable::new("test", "main", defs(), TableConfig::default());
        t.initialize("test", "main", store);
        t
    }

    fn visible_ids(t: &mut DynamicTable<Row>) -> Vec<String> {
        let indices: Vec<usize> = t.visible_columns().iter().map(|c| c.index).collect();
        indices
            .into_iter()
            .map(|i| t.def(i).id().to_string())
            .collect()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "bb".to_string(), size: 30 },
            Row { name: "aa".to_string(), size: 10 },
            Row { name: "cc".to_string(), size: 20 },
        ]
    }

    #[test]
    fn test_fresh_table_defaults() {
        // No stored layout: enabled columns visible, first enabled column
        // sorts ascending.
        let store = MemoryStore::new();
        let mut t = table(&store);
        assert_eq!(visible_ids(&mut t), vec!["name", "size"]);
        let sort = t.sort().unwrap();
        assert_eq!(sort.column, "name");
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_layout_round_trip_through_store() {
        let store = MemoryStore::new();
        {
            let mut t = table(&store);
            let selected: BTreeSet<String> =
                ["name", "size"].iter().map(|s| s.to_string()).collect();
            let widths =
                HashMap::from([("name".to_string(), WidthOverride::Px(300.0))]);
            let order =
                HashMap::from([("size".to_string(), 0), ("name".to_string(), 1)]);
            t.apply_column_options(selected, widths, order, &store);
        }

        // A fresh instance over the same store reproduces the layout:
        // size before name, name at 300px.
        let mut t = table(&store);
        assert_eq!(visible_ids(&mut t), vec!["size", "name"]);
        let name_col = t
            .visible_columns()
            .iter()
            .copied()
            .find(|c| c.index == 0)
            .unwrap();
        assert_eq!(name_col.width, Some(300.0));
    }

    #[test]
    fn test_order_ranks_with_unranked_appended() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        // rank only "size"; "name" is unranked and keeps original
        // relative order after the ranked ones
        let order = HashMap::from([("size".to_string(), 0)]);
        t.apply_column_options(t.layout().selected.clone(), HashMap::new(), order, &store);
        assert_eq!(visible_ids(&mut t), vec!["size", "name"]);
    }

    #[test]
    fn test_sort_falls_back_when_column_hidden() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        t.set_sort("size", &store);
        assert_eq!(t.sort().unwrap().column, "size");

        // hide "size": sort must fall back to the first visible column
        t.toggle_column("size", &store);
        let sort = t.sort().unwrap();
        assert_eq!(sort.column, "name");
        assert_eq!(sort.direction, SortDirection::Ascending);
        // and the fallback is persisted
        assert!(store.get("test.sort.main").is_some());
    }

    #[test]
    fn test_deselecting_all_falls_back_to_enabled() {
        // an all-deselected table would be unusable; the enabled set wins
        let store = MemoryStore::new();
        let mut t = table(&store);
        t.toggle_column("name", &store);
        t.toggle_column("size", &store);
        assert_eq!(visible_ids(&mut t), vec!["name", "size"]);
        assert!(t.sort().is_some());
    }

    #[test]
    fn test_empty_visible_set_clears_sort() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        assert!(store.get("test.sort.main").is_none());
        t.set_sort("size", &store);
        assert!(store.get("test.sort.main").is_some());

        // a filter rejecting every column empties the visible set; the
        // sort is cleared and its persisted entry dropped
        t.set_column_filter(Some(|_: &ColumnDefinition<Row>| false), &store);
        assert!(t.visible_columns().is_empty());
        assert!(t.sort().is_none());
        assert!(store.get("test.sort.main").is_none());
    }

    #[test]
    fn test_sort_invariant_under_column_filter() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        // filter out "name" (the sort column)
        t.set_column_filter(Some(|d: &ColumnDefinition<Row>| d.id() != "name"), &store);
        assert_eq!(visible_ids(&mut t), vec!["size"]);
        assert_eq!(t.sort().unwrap().column, "size");
    }

    #[test]
    fn test_row_ordering() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        let items = rows();

        // ascending by name
        assert_eq!(t.order_rows(&items), vec![1, 0, 2]);

        t.set_sort("size", &store);
        assert_eq!(t.order_rows(&items), vec![1, 2, 0]);

        // clicking the active column flips direction
        t.set_sort("size", &store);
        assert_eq!(t.order_rows(&items), vec![0, 2, 1]);
    }

    #[test]
    fn test_pre_sorted_passes_through() {
        let store = MemoryStore::new();
        let mut t = DynamicTable::new(
            "test",
            "log",
            defs(),
            TableConfig {
                pre_sorted: true,
                ..TableConfig::default()
            },
        );
        t.initialize("test", "log", &store);
        assert_eq!(t.order_rows(&rows()), vec![0, 1, 2]);
    }

    #[test]
    fn test_options_dialog_reports_only_changes() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        let selected = t.layout().selected.clone();
        let widths = t.layout().widths.clone();
        let order = t.layout().order.clone();

        // identical values: nothing persisted, nothing reported
        let applied = t.apply_column_options(selected.clone(), widths.clone(), order, &store);
        assert!(!applied.any());
        assert!(store.get("test.column_widths.main").is_none());

        // only widths change
        let widths = HashMap::from([("name".to_string(), WidthOverride::Px(120.0))]);
        let applied = t.apply_column_options(selected, widths, HashMap::new(), &store);
        assert!(applied.widths_changed);
        assert!(!applied.selection_changed);
        assert!(!applied.order_changed);
        assert!(store.get("test.column_widths.main").is_some());
        assert!(store.get("test.column_selection.main").is_none());
    }

    #[test]
    fn test_dragged_width_persists_across_reload() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        t.set_column_width("name", WidthOverride::Px(412.0), &store);
        assert_eq!(t.visible_columns()[0].width, Some(412.0));
        assert!(store.get("test.column_widths.main").is_some());

        // re-setting the same width must not rewrite the store
        store.remove("test.column_widths.main");
        t.set_column_width("name", WidthOverride::Px(412.0), &store);
        assert!(store.get("test.column_widths.main").is_none());

        t.set_column_width("name", WidthOverride::Px(413.0), &store);
        let mut reloaded = table(&store);
        assert_eq!(reloaded.visible_columns()[0].width, Some(413.0));
    }

    #[test]
    fn test_explicit_auto_width_beats_default() {
        let store = MemoryStore::new();
        let mut t = DynamicTable::new(
            "test",
            "main",
            vec![ColumnDefinition::new("Name", FieldKind::Text, |r: &Row| {
                FieldValue::Text(r.name.clone())
            })
            .with_width(250.0)],
            TableConfig::default(),
        );
        t.initialize("test", "main", &store);

        // no override: definition default applies
        assert_eq!(t.visible_columns()[0].width, Some(250.0));

        // explicit Auto is distinct from "no override"
        t.set_column_width("name", WidthOverride::Auto, &store);
        assert_eq!(t.visible_columns()[0].width, None);
    }

    #[test]
    fn test_empty_selection_falls_back_to_enabled() {
        let store = MemoryStore::new();
        store.set("test.column_selection.main", serde_json::json!([]));
        let mut t = table(&store);
        assert_eq!(visible_ids(&mut t), vec!["name", "size"]);
    }

    #[test]
    fn test_multi_select_semantics() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        let now = Instant::now();
        let plain = ClickModifiers::default();
        let ctrl = ClickModifiers { ctrl: true, alt: false };
        let alt = ClickModifiers { ctrl: false, alt: true };

        assert!(t.handle_row_click("a", plain, now));
        assert!(t.handle_row_click("b", ctrl, now));
        assert_eq!(t.selection().len(), 2);

        // plain click on an already-selected row keeps the selection
        assert!(!t.handle_row_click("a", plain, now));
        assert_eq!(t.selection().len(), 2);

        // plain click on an unselected row collapses to it
        assert!(t.handle_row_click("c", plain, now));
        assert_eq!(t.selection().len(), 1);
        assert!(t.is_selected("c"));

        // ctrl-click toggles off
        assert!(t.handle_row_click("c", ctrl, now));
        assert!(t.selection().is_empty());

        // alt-click replaces
        t.handle_row_click("a", plain, now);
        t.handle_row_click("b", ctrl, now);
        assert!(t.handle_row_click("b", alt, now));
        assert_eq!(t.selection().len(), 1);
        assert!(t.is_selected("b"));
    }

    #[test]
    fn test_long_press_suppresses_following_click() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        let t0 = Instant::now();

        assert!(t.handle_long_press("a", t0));
        assert!(t.is_selected("a"));

        // the synthetic click 100ms later is swallowed
        let changed = t.handle_row_click("b", ClickModifiers::default(), t0 + Duration::from_millis(100));
        assert!(!changed);
        assert!(t.is_selected("a"));

        // a real click beyond the window works again
        let changed = t.handle_row_click("b", ClickModifiers::default(), t0 + Duration::from_millis(700));
        assert!(changed);
        assert!(t.is_selected("b"));
    }

    #[test]
    fn test_single_select_gating() {
        let store = MemoryStore::new();
        let mut t = DynamicTable::new(
            "test",
            "main",
            defs(),
            TableConfig {
                multi_select: false,
                select_on_row_click: false,
                ..TableConfig::default()
            },
        );
        t.initialize("test", "main", &store);
        assert!(!t.handle_row_click("a", ClickModifiers::default(), Instant::now()));
        assert!(t.selection().is_empty());
    }

    #[test]
    fn test_retain_selection() {
        let store = MemoryStore::new();
        let mut t = table(&store);
        let now = Instant::now();
        t.handle_row_click("a", ClickModifiers::default(), now);
        t.handle_row_click("b", ClickModifiers { ctrl: true, alt: false }, now);

        t.retain_selection(|k| k == "a");
        assert!(t.is_selected("a"));
        assert!(!t.is_selected("b"));
    }

    #[test]
    fn test_default_sort_helper_matches_scenario() {
        // Scenario: [Name(enabled), Size(enabled), Tracker(disabled)]
        let sort = TableLayout::default_sort(&defs()).unwrap();
        assert_eq!(sort.column, "name");
        assert_eq!(sort.direction, SortDirection::Ascending);
    }
}
