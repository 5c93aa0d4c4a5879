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

//! User-composed property filters: typed operators compiled to predicates.
//!
//! A `PropertyFilterDefinition` is one row of the filter editor:
//! a column name, an operator name, and an optional operand. Compilation
//! is strictly fail-open - any unknown column, unknown operator, missing
//! operand, or kind mismatch yields an always-true predicate. A row the
//! user is still composing must never hide the whole table.

use crate::core::field::{FieldKind, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compiled row filter.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A typed accessor registered for one column of an entity type.
pub struct Property<T> {
    pub kind: FieldKind,
    pub get: fn(&T) -> FieldValue,
}

/// Construct-once mapping `column id -> typed accessor` per entity type.
pub struct PropertyRegistry<T> {
    props: BTreeMap<&'static str, Property<T>>,
}

impl<T> PropertyRegistry<T> {
    pub fn new() -> Self {
        PropertyRegistry {
            props: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, column: &'static str, kind: FieldKind, get: fn(&T) -> FieldValue) {
        self.props.insert(column, Property { kind, get });
    }

    pub fn resolve(&self, column: &str) -> Option<&Property<T>> {
        self.props.get(column)
    }

    pub fn column_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.props.keys().copied()
    }
}

impl<T> Default for PropertyRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Operators selectable in the filter editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Contains,
    NotContains,
    Equal,
    NotEqual,
    StartsWith,
    EndsWith,
    Empty,
    NotEmpty,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Is,
    IsNot,
    After,
    OnOrAfter,
    Before,
    OnOrBefore,
}

impl FilterOperator {
    /// Parse a stable operator name; unknown names yield `None` and the
    /// caller degrades to an always-true predicate.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "contains" => Some(FilterOperator::Contains),
            "not_contains" => Some(FilterOperator::NotContains),
            "equal" => Some(FilterOperator::Equal),
            "not_equal" => Some(FilterOperator::NotEqual),
            "starts_with" => Some(FilterOperator::StartsWith),
            "ends_with" => Some(FilterOperator::EndsWith),
            "empty" => Some(FilterOperator::Empty),
            "not_empty" => Some(FilterOperator::NotEmpty),
            "greater_than" => Some(FilterOperator::GreaterThan),
            "greater_than_or_equal" => Some(FilterOperator::GreaterThanOrEqual),
            "less_than" => Some(FilterOperator::LessThan),
            "less_than_or_equal" => Some(FilterOperator::LessThanOrEqual),
            "is" => Some(FilterOperator::Is),
            "is_not" => Some(FilterOperator::IsNot),
            "after" => Some(FilterOperator::After),
            "on_or_after" => Some(FilterOperator::OnOrAfter),
            "before" => Some(FilterOperator::Before),
            "on_or_before" => Some(FilterOperator::OnOrBefore),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::Equal => "equal",
            FilterOperator::NotEqual => "not_equal",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
            FilterOperator::Empty => "empty",
            FilterOperator::NotEmpty => "not_empty",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::GreaterThanOrEqual => "greater_than_or_equal",
            FilterOperator::LessThan => "less_than",
            FilterOperator::LessThanOrEqual => "less_than_or_equal",
            FilterOperator::Is => "is",
            FilterOperator::IsNot => "is_not",
            FilterOperator::After => "after",
            FilterOperator::OnOrAfter => "on_or_after",
            FilterOperator::Before => "before",
            FilterOperator::OnOrBefore => "on_or_before",
        }
    }

    /// Operators offered in the editor for a given field kind.
    pub fn for_kind(kind: FieldKind) -> &'static [FilterOperator] {
        match kind {
            FieldKind::Text => &[
                FilterOperator::Contains,
                FilterOperator::NotContains,
                FilterOperator::Equal,
                FilterOperator::NotEqual,
                FilterOperator::StartsWith,
                FilterOperator::EndsWith,
                FilterOperator::Empty,
                FilterOperator::NotEmpty,
            ],
            FieldKind::Number => &[
                FilterOperator::Equal,
                FilterOperator::NotEqual,
                FilterOperator::GreaterThan,
                FilterOperator::GreaterThanOrEqual,
                FilterOperator::LessThan,
                FilterOperator::LessThanOrEqual,
                FilterOperator::Empty,
                FilterOperator::NotEmpty,
            ],
            FieldKind::Bool => &[FilterOperator::Is],
            FieldKind::Date => &[
                FilterOperator::Is,
                FilterOperator::IsNot,
                FilterOperator::After,
                FilterOperator::OnOrAfter,
                FilterOperator::Before,
                FilterOperator::OnOrBefore,
                FilterOperator::Empty,
                FilterOperator::NotEmpty,
            ],
            FieldKind::Enum => &[FilterOperator::Is, FilterOperator::IsNot],
            FieldKind::Guid => &[FilterOperator::Equal, FilterOperator::NotEqual],
        }
    }

    /// Whether this operator needs an operand. Empty/NotEmpty take none;
    /// if a value is supplied anyway it is ignored, never an error.
    pub fn expects_operand(self) -> bool {
        !matches!(self, FilterOperator::Empty | FilterOperator::NotEmpty)
    }
}

/// One editable filter row. Mutated in place while the user edits;
/// serialized as part of saved filter sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilterDefinition {
    pub column: String,
    pub operator: String,
    pub value: Option<FieldValue>,
}

impl PropertyFilterDefinition {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: Option<FieldValue>) -> Self {
        PropertyFilterDefinition {
            column: column.into(),
            operator: operator.name().to_string(),
            value,
        }
    }
}

fn always_true<T: 'static>() -> Predicate<T> {
    Box::new(|_| true)
}

/// Compile one definition against a registry.
///
/// The compiled closure owns its operand; the entity accessor is a plain
/// fn pointer taken from the registry at compile time.
pub fn compile<T: 'static>(
    def: &PropertyFilterDefinition,
    registry: &PropertyRegistry<T>,
    case_sensitive: bool,
) -> Predicate<T> {
    let Some(op) = FilterOperator::from_name(&def.operator) else {
        log::debug!("unknown filter operator '{}', filter is a no-op", def.operator);
        return always_true();
    };
    let Some(prop) = registry.resolve(&def.column) else {
        log::debug!("unknown filter column '{}', filter is a no-op", def.column);
        return always_true();
    };
    let get = prop.get;

    // Empty/NotEmpty are constructible for every kind and ignore any
    // operand the editor may still be carrying.
    match op {
        FilterOperator::Empty => return Box::new(move |t| get(t).is_empty()),
        FilterOperator::NotEmpty => return Box::new(move |t| !get(t).is_empty()),
        FilterOperator::Contains
        | FilterOperator::NotContains
        | FilterOperator::Equal
        | FilterOperator::NotEqual
        | FilterOperator::StartsWith
        | FilterOperator::EndsWith
        | FilterOperator::GreaterThan
        | FilterOperator::GreaterThanOrEqual
        | FilterOperator::LessThan
        | FilterOperator::LessThanOrEqual
        | FilterOperator::Is
        | FilterOperator::IsNot
        | FilterOperator::After
        | FilterOperator::OnOrAfter
        | FilterOperator::Before
        | FilterOperator::OnOrBefore => {}
    }

    let Some(operand) = def.value.clone() else {
        return always_true();
    };

    match prop.kind {
        FieldKind::Text => compile_text(get, op, &operand, case_sensitive),
        FieldKind::Number => compile_number(get, op, &operand),
        FieldKind::Bool => compile_bool(get, op, &operand),
        FieldKind::Date => compile_date(get, op, &operand),
        FieldKind::Enum => compile_enum(get, op, &operand),
        FieldKind::Guid => compile_guid(get, op, &operand, case_sensitive),
    }
}

fn compile_text<T: 'static>(
    get: fn(&T) -> FieldValue,
    op: FilterOperator,
    operand: &FieldValue,
    case_sensitive: bool,
) -> Predicate<T> {
    let Some(raw) = operand.as_text() else {
        return always_true();
    };
    let needle = if case_sensitive {
        raw.to_string()
    } else {
        raw.to_lowercase()
    };

    let extract = move |t: &T| -> Option<String> {
        let value = get(t);
        let s = value.as_text()?.to_string();
        Some(if case_sensitive { s } else { s.to_lowercase() })
    };

    match op {
        FilterOperator::Contains => {
            Box::new(move |t| extract(t).is_some_and(|s| s.contains(&needle)))
        }
        FilterOperator::NotContains => {
            Box::new(move |t| !extract(t).is_some_and(|s| s.contains(&needle)))
        }
        FilterOperator::Equal => Box::new(move |t| extract(t).is_some_and(|s| s == needle)),
        FilterOperator::NotEqual => Box::new(move |t| !extract(t).is_some_and(|s| s == needle)),
        FilterOperator::StartsWith => {
            Box::new(move |t| extract(t).is_some_and(|s| s.starts_with(&needle)))
        }
        FilterOperator::EndsWith => {
            Box::new(move |t| extract(t).is_some_and(|s| s.ends_with(&needle)))
        }
        _ => always_true(),
    }
}

fn compile_number<T: 'static>(
    get: fn(&T) -> FieldValue,
    op: FilterOperator,
    operand: &FieldValue,
) -> Predicate<T> {
    let Some(operand) = operand.as_number() else {
        return always_true();
    };

    // Real comparisons: the upstream web client threw for the ordering
    // operators, which its own editor offered. That is a defect, not a
    // contract; here they compare actual values.
    match op {
        FilterOperator::Equal | FilterOperator::Is => {
            Box::new(move |t| get(t).as_number() == Some(operand))
        }
        FilterOperator::NotEqual | FilterOperator::IsNot => {
            Box::new(move |t| get(t).as_number() != Some(operand))
        }
        FilterOperator::GreaterThan => {
            Box::new(move |t| get(t).as_number().is_some_and(|n| n > operand))
        }
        FilterOperator::GreaterThanOrEqual => {
            Box::new(move |t| get(t).as_number().is_some_and(|n| n >= operand))
        }
        FilterOperator::LessThan => {
            Box::new(move |t| get(t).as_number().is_some_and(|n| n < operand))
        }
        FilterOperator::LessThanOrEqual => {
            Box::new(move |t| get(t).as_number().is_some_and(|n| n <= operand))
        }
        _ => always_true(),
    }
}

fn compile_bool<T: 'static>(
    get: fn(&T) -> FieldValue,
    op: FilterOperator,
    operand: &FieldValue,
) -> Predicate<T> {
    let Some(operand) = operand.as_bool() else {
        return always_true();
    };
    match op {
        FilterOperator::Is | FilterOperator::Equal => {
            Box::new(move |t| get(t).as_bool() == Some(operand))
        }
        _ => always_true(),
    }
}

fn compile_date<T: 'static>(
    get: fn(&T) -> FieldValue,
    op: FilterOperator,
    operand: &FieldValue,
) -> Predicate<T> {
    let Some(operand) = operand.as_date() else {
        return always_true();
    };
    match op {
        FilterOperator::Is => Box::new(move |t| get(t).as_date() == Some(operand)),
        FilterOperator::IsNot => Box::new(move |t| get(t).as_date() != Some(operand)),
        FilterOperator::After => {
            Box::new(move |t| get(t).as_date().is_some_and(|d| d > operand))
        }
        FilterOperator::OnOrAfter => {
            Box::new(move |t| get(t).as_date().is_some_and(|d| d >= operand))
        }
        FilterOperator::Before => {
            Box::new(move |t| get(t).as_date().is_some_and(|d| d < operand))
        }
        FilterOperator::OnOrBefore => {
            Box::new(move |t| get(t).as_date().is_some_and(|d| d <= operand))
        }
        _ => always_true(),
    }
}

fn compile_enum<T: 'static>(
    get: fn(&T) -> FieldValue,
    op: FilterOperator,
    operand: &FieldValue,
) -> Predicate<T> {
    let Some(operand) = operand.as_text().map(str::to_string) else {
        return always_true();
    };
    match op {
        FilterOperator::Is | FilterOperator::Equal => {
            Box::new(move |t| get(t).as_text() == Some(operand.as_str()))
        }
        FilterOperator::IsNot | FilterOperator::NotEqual => {
            Box::new(move |t| get(t).as_text() != Some(operand.as_str()))
        }
        _ => always_true(),
    }
}

fn compile_guid<T: 'static>(
    get: fn(&T) -> FieldValue,
    op: FilterOperator,
    operand: &FieldValue,
    case_sensitive: bool,
) -> Predicate<T> {
    let Some(raw) = operand.as_text() else {
        return always_true();
    };
    let needle = if case_sensitive {
        raw.to_string()
    } else {
        raw.to_lowercase()
    };
    let normalize = move |s: &str| {
        if case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    };
    match op {
        FilterOperator::Equal | FilterOperator::Is => Box::new(move |t| {
            get(t).as_text().map(normalize) == Some(needle.clone())
        }),
        FilterOperator::NotEqual | FilterOperator::IsNot => Box::new(move |t| {
            get(t).as_text().map(normalize) != Some(needle.clone())
        }),
        _ => always_true(),
    }
}

/// The set of active filter rows, AND-combined.
///
/// At most one definition per column: adding a second is rejected and the
/// editor updates the existing row in place instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilterList {
    defs: Vec<PropertyFilterDefinition>,
}

impl PropertyFilterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and leaves the list untouched) if the column
    /// already carries a filter.
    pub fn add(&mut self, def: PropertyFilterDefinition) -> bool {
        if self.defs.iter().any(|d| d.column == def.column) {
            log::debug!("column '{}' already filtered, update it in place", def.column);
            return false;
        }
        self.defs.push(def);
        true
    }

    pub fn remove(&mut self, column: &str) -> bool {
        let before = self.defs.len();
        self.defs.retain(|d| d.column != column);
        self.defs.len() != before
    }

    pub fn set_operator(&mut self, column: &str, operator: FilterOperator) -> bool {
        if let Some(def) = self.defs.iter_mut().find(|d| d.column == column) {
            def.operator = operator.name().to_string();
            true
        } else {
            false
        }
    }

    pub fn set_value(&mut self, column: &str, value: Option<FieldValue>) -> bool {
        if let Some(def) = self.defs.iter_mut().find(|d| d.column == column) {
            def.value = value;
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyFilterDefinition> {
        self.defs.iter()
    }

    /// Compile every row and conjoin them.
    pub fn compile_all<T: 'static>(
        &self,
        registry: &PropertyRegistry<T>,
        case_sensitive: bool,
    ) -> Predicate<T> {
        let compiled: Vec<Predicate<T>> = self
            .defs
            .iter()
            .map(|d| compile(d, registry, case_sensitive))
            .collect();
        Box::new(move |t| compiled.iter().all(|p| p(t)))
    }
}
