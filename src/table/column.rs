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

//! Static column definitions for configurable tables.
//!
//! Definitions are immutable and shared across table instances; all
//! per-instance state (widths, order, sort) lives in the table's layout,
//! and width overrides are applied on the `VisibleColumn` view-model,
//! never back onto the shared definition.

use crate::core::field::{FieldKind, FieldValue};
use serde::{Deserialize, Serialize};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending | SortDirection::None => SortDirection::Ascending,
        }
    }

    /// Direction to use when a column first becomes the sort column.
    pub fn or_ascending(self) -> SortDirection {
        match self {
            SortDirection::None => SortDirection::Ascending,
            SortDirection::Ascending | SortDirection::Descending => self,
        }
    }
}

/// Stable column id derived from a header: lowercase, spaces to
/// underscores. Must be collision-free within one table's column set.
pub fn column_id_from_header(header: &str) -> String {
    header.to_lowercase().replace(' ', "_")
}

/// Describes one column of a table over rows of type `T`.
///
/// The accessor doubles as the sort selector; the optional formatter
/// replaces the raw value for rendering.
pub struct ColumnDefinition<T> {
    id: String,
    header: String,
    display_header: String,
    kind: FieldKind,
    accessor: fn(&T) -> FieldValue,
    formatter: Option<fn(&T) -> String>,
    default_width: Option<f32>,
    enabled: bool,
    initial_direction: SortDirection,
}

impl<T> ColumnDefinition<T> {
    pub fn new(header: &str, kind: FieldKind, accessor: fn(&T) -> FieldValue) -> Self {
        ColumnDefinition {
            id: column_id_from_header(header),
            header: header.to_string(),
            display_header: header.to_string(),
            kind,
            accessor,
            formatter: None,
            default_width: None,
            enabled: true,
            initial_direction: SortDirection::None,
        }
    }

    /// Override the derived id (for headers whose transform would collide
    /// or whose wording may change).
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Localizable label, independent of the stable header used for
    /// persistence keys.
    pub fn with_display_header(mut self, label: &str) -> Self {
        self.display_header = label.to_string();
        self
    }

    pub fn with_formatter(mut self, formatter: fn(&T) -> String) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.default_width = Some(width);
        self
    }

    /// Hidden unless the user selects it.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_initial_direction(mut self, direction: SortDirection) -> Self {
        self.initial_direction = direction;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn display_header(&self) -> &str {
        &self.display_header
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn default_width(&self) -> Option<f32> {
        self.default_width
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn initial_direction(&self) -> SortDirection {
        self.initial_direction
    }

    /// Sort value for a row.
    pub fn value(&self, item: &T) -> FieldValue {
        (self.accessor)(item)
    }

    /// Rendered cell text.
    pub fn display(&self, item: &T) -> String {
        match self.formatter {
            Some(f) => f(item),
            None => self.value(item).display(),
        }
    }
}

/// Per-column width override. `Auto` is an explicit user choice, distinct
/// from "no override" (absent from the map), which falls back to the
/// definition's default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WidthOverride {
    Auto,
    Px(f32),
}

/// View-model entry for one visible column: an index into the shared
/// definition slice plus the resolved width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleColumn {
    pub index: usize,
    pub width: Option<f32>,
}

/// True when no two definitions collapse to the same id.
pub fn ids_are_unique<T>(defs: &[ColumnDefinition<T>]) -> bool {
    let mut seen = std::collections::HashSet::new();
    defs.iter().all(|d| seen.insert(d.id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_col(header: &str) -> ColumnDefinition<String> {
        ColumnDefinition::new(header, FieldKind::Text, |s: &String| {
            FieldValue::Text(s.clone())
        })
    }

    #[test]
    fn test_id_derivation_is_deterministic() {
        assert_eq!(column_id_from_header("Name"), "name");
        assert_eq!(column_id_from_header("Down Speed"), "down_speed");
        assert_eq!(column_id_from_header("Added On"), "added_on");
        // deterministic across calls
        assert_eq!(
            column_id_from_header("Down Speed"),
            column_id_from_header("Down Speed")
        );
    }

    #[test]
    fn test_id_uniqueness_check() {
        let ok = vec![text_col("Name"), text_col("Size")];
        assert!(ids_are_unique(&ok));

        let colliding = vec![text_col("Down Speed"), text_col("down speed")];
        assert!(!ids_are_unique(&colliding));
    }

    #[test]
    fn test_explicit_id_override() {
        let col = text_col("# of Peers").with_id("peers");
        assert_eq!(col.id(), "peers");
        assert_eq!(col.header(), "# of Peers");
    }

    #[test]
    fn test_display_prefers_formatter() {
        let plain = text_col("Name");
        assert_eq!(plain.display(&"abc".to_string()), "abc");

        let shouty = text_col("Name").with_formatter(|s: &String| s.to_uppercase());
        assert_eq!(shouty.display(&"abc".to_string()), "ABC");
    }

    #[test]
    fn test_initial_direction_fallback() {
        assert_eq!(SortDirection::None.or_ascending(), SortDirection::Ascending);
        assert_eq!(
            SortDirection::Descending.or_ascending(),
            SortDirection::Descending
        );
        assert_eq!(SortDirection::Ascending.flipped(), SortDirection::Descending);
        assert_eq!(SortDirection::None.flipped(), SortDirection::Ascending);
    }
}
