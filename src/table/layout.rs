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

//! Persisted column layout: which columns are visible, their widths,
//! their order, and the active sort.
//!
//! Each of the four pieces is stored under its own deterministic key so
//! a corrupt entry only costs its own piece. Missing entries fall back
//! to defaults computed from the column definitions.

use crate::table::column::{ColumnDefinition, SortDirection, WidthOverride};
use crate::storage::{get_as, set_from, KvStore};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub const KIND_SELECTION: &str = "column_selection";
pub const KIND_WIDTHS: &str = "column_widths";
pub const KIND_ORDER: &str = "column_order";
pub const KIND_SORT: &str = "sort";

/// The persisted form of the active sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Runtime layout state of one table instance, identified by
/// `(type_name, table_id)` so several tables over the same entity type
/// persist independently.
#[derive(Debug, Clone)]
pub struct TableLayout {
    type_name: &'static str,
    table_id: String,
    pub selected: BTreeSet<String>,
    pub widths: HashMap<String, WidthOverride>,
    pub order: HashMap<String, u32>,
    pub sort: Option<SortSpec>,
}

impl TableLayout {
    pub fn key(type_name: &str, kind: &str, table_id: &str) -> String {
        format!("{type_name}.{kind}.{table_id}")
    }

    fn own_key(&self, kind: &str) -> String {
        Self::key(self.type_name, kind, &self.table_id)
    }

    /// Default visible set: the columns flagged enabled.
    pub fn default_selection<T>(defs: &[ColumnDefinition<T>]) -> BTreeSet<String> {
        defs.iter()
            .filter(|d| d.enabled())
            .map(|d| d.id().to_string())
            .collect()
    }

    /// Default sort: the first enabled column, using its initial
    /// direction (Ascending when it declares none).
    pub fn default_sort<T>(defs: &[ColumnDefinition<T>]) -> Option<SortSpec> {
        defs.iter().find(|d| d.enabled()).map(|d| SortSpec {
            column: d.id().to_string(),
            direction: d.initial_direction().or_ascending(),
        })
    }

    /// Load all four pieces, falling back per piece.
    pub fn load<T>(
        type_name: &'static str,
        table_id: &str,
        defs: &[ColumnDefinition<T>],
        store: &dyn KvStore,
    ) -> Self {
        let mut layout = TableLayout {
            type_name,
            table_id: table_id.to_string(),
            selected: BTreeSet::new(),
            widths: HashMap::new(),
            order: HashMap::new(),
            sort: None,
        };

        layout.selected = get_as::<BTreeSet<String>>(store, &layout.own_key(KIND_SELECTION))
            .unwrap_or_else(|| Self::default_selection(defs));
        layout.widths = get_as::<HashMap<String, WidthOverride>>(store, &layout.own_key(KIND_WIDTHS))
            .unwrap_or_default();
        layout.order = get_as::<HashMap<String, u32>>(store, &layout.own_key(KIND_ORDER))
            .unwrap_or_default();
        layout.sort = get_as::<SortSpec>(store, &layout.own_key(KIND_SORT))
            .or_else(|| Self::default_sort(defs));

        // Drop stored ids that no longer exist in the definition set.
        let known: BTreeSet<&str> = defs.iter().map(ColumnDefinition::id).collect();
        layout.selected.retain(|id| known.contains(id.as_str()));
        layout.widths.retain(|id, _| known.contains(id.as_str()));
        layout.order.retain(|id, _| known.contains(id.as_str()));

        layout
    }

    pub fn save_selection(&self, store: &dyn KvStore) {
        set_from(store, &self.own_key(KIND_SELECTION), &self.selected);
    }

    pub fn save_widths(&self, store: &dyn KvStore) {
        set_from(store, &self.own_key(KIND_WIDTHS), &self.widths);
    }

    pub fn save_order(&self, store: &dyn KvStore) {
        set_from(store, &self.own_key(KIND_ORDER), &self.order);
    }

    /// Persist the sort, or remove the entry entirely when sort is
    /// cleared (empty visible set).
    pub fn save_sort(&self, store: &dyn KvStore) {
        let key = self.own_key(KIND_SORT);
        match &self.sort {
            Some(spec) => set_from(store, &key, spec),
            None => store.remove(&key),
        }
    }
}
