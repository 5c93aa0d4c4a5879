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

//! Configurable table state: column definitions, persisted layout, and
//! the [`DynamicTable`] orchestrator tying them together.

pub mod column;
pub mod dynamic_table;
pub mod layout;

pub use column::{ColumnDefinition, SortDirection, VisibleColumn, WidthOverride};
pub use dynamic_table::{ClickModifiers, DynamicTable, TableConfig};
pub use layout::{SortSpec, TableLayout};
