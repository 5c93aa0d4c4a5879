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

//! Typed field values shared by the column model and the filter engine.
//!
//! Every column accessor returns a `FieldValue`; the property filter
//! engine dispatches on the matching `FieldKind` when compiling
//! predicates, and the table uses the same values for sorting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Type tag for a filterable/sortable entity property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Number,
    Bool,
    Date,
    Enum,
    Guid,
}

/// A typed value extracted from an entity property.
///
/// Missing values are carried as `None` inside the variant so that
/// Empty/NotEmpty operators and sort ordering can treat "unknown" and
/// "present" uniformly per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(Option<f64>),
    Bool(Option<bool>),
    Date(Option<DateTime<Utc>>),
    Enum(Option<String>),
    Guid(Option<String>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Enum(_) => FieldKind::Enum,
            FieldValue::Guid(_) => FieldKind::Guid,
        }
    }

    /// Whitespace-normalized emptiness test used by Empty/NotEmpty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Bool(b) => b.is_none(),
            FieldValue::Date(d) => d.is_none(),
            FieldValue::Enum(s) | FieldValue::Guid(s) => {
                s.as_ref().is_none_or(|v| v.trim().is_empty())
            }
        }
    }

    /// Text content of string-like variants, `None` for the rest.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Enum(s) | FieldValue::Guid(s) => s.as_deref(),
            FieldValue::Number(_) | FieldValue::Bool(_) | FieldValue::Date(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(_)
            | FieldValue::Bool(_)
            | FieldValue::Date(_)
            | FieldValue::Enum(_)
            | FieldValue::Guid(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Text(_)
            | FieldValue::Number(_)
            | FieldValue::Date(_)
            | FieldValue::Enum(_)
            | FieldValue::Guid(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => *d,
            FieldValue::Text(_)
            | FieldValue::Number(_)
            | FieldValue::Bool(_)
            | FieldValue::Enum(_)
            | FieldValue::Guid(_) => None,
        }
    }

    /// Total ordering used for table sorting.
    ///
    /// Missing values sort first; mismatched kinds compare equal so a
    /// half-configured column never panics the sort.
    pub fn cmp_for_sort(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            (FieldValue::Number(a), FieldValue::Number(b)) => match (a, b) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => x.total_cmp(y),
            },
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Enum(a), FieldValue::Enum(b))
            | (FieldValue::Guid(a), FieldValue::Guid(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    /// Plain rendering used when a column has no dedicated formatter.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.map(|v| v.to_string()).unwrap_or_default(),
            FieldValue::Bool(b) => b.map(|v| v.to_string()).unwrap_or_default(),
            FieldValue::Date(d) => d
                .map(|v| v.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            FieldValue::Enum(s) | FieldValue::Guid(s) => s.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emptiness() {
        assert!(FieldValue::Text("   ".to_string()).is_empty());
        assert!(!FieldValue::Text("x".to_string()).is_empty());
        assert!(FieldValue::Number(None).is_empty());
        assert!(!FieldValue::Number(Some(0.0)).is_empty());
        assert!(FieldValue::Enum(None).is_empty());
    }

    #[test]
    fn test_sort_ordering() {
        let a = FieldValue::Number(Some(1.0));
        let b = FieldValue::Number(Some(2.0));
        assert_eq!(a.cmp_for_sort(&b), Ordering::Less);
        assert_eq!(FieldValue::Number(None).cmp_for_sort(&a), Ordering::Less);

        // Text compares case-insensitively
        let x = FieldValue::Text("Beta".to_string());
        let y = FieldValue::Text("alpha".to_string());
        assert_eq!(x.cmp_for_sort(&y), Ordering::Greater);
    }

    #[test]
    fn test_mismatched_kinds_compare_equal() {
        let a = FieldValue::Text("abc".to_string());
        let b = FieldValue::Number(Some(1.0));
        assert_eq!(a.cmp_for_sort(&b), Ordering::Equal);
    }
}
