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

//! The torrent entity as tracked between sync snapshots.

use crate::core::field::{FieldKind, FieldValue};
use crate::core::property_filter::PropertyRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One torrent as known to the UI.
///
/// Field names follow the daemon's sync payload; timestamps are unix
/// seconds as sent on the wire, with `-1` meaning "not known".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Torrent {
    pub hash: String,
    pub name: String,
    pub size: i64,
    pub downloaded: i64,
    pub uploaded: i64,
    pub progress: f64,
    pub state: String,
    pub category: String,
    pub tags: Vec<String>,
    pub tracker: String,
    pub dlspeed: i64,
    pub upspeed: i64,
    pub ratio: f64,
    pub eta: i64,
    pub num_seeds: i64,
    pub num_leechs: i64,
    pub added_on: i64,
    pub completion_on: i64,
    pub save_path: String,
}

impl Torrent {
    pub fn new(hash: String) -> Self {
        Torrent {
            hash,
            name: String::new(),
            size: 0,
            downloaded: 0,
            uploaded: 0,
            progress: 0.0,
            state: String::new(),
            category: String::new(),
            tags: Vec::new(),
            tracker: String::new(),
            dlspeed: 0,
            upspeed: 0,
            ratio: 0.0,
            eta: -1,
            num_seeds: 0,
            num_leechs: 0,
            added_on: -1,
            completion_on: -1,
            save_path: String::new(),
        }
    }

    /// Completion is derived, never stored: a torrent is finished when
    /// every known byte has been downloaded (exact equality).
    pub fn is_finished(&self) -> bool {
        self.size >= 0 && self.downloaded == self.size
    }

    pub fn added_date(&self) -> Option<DateTime<Utc>> {
        unix_date(self.added_on)
    }

    pub fn completion_date(&self) -> Option<DateTime<Utc>> {
        unix_date(self.completion_on)
    }
}

fn unix_date(secs: i64) -> Option<DateTime<Utc>> {
    if secs < 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

/// Process-wide property registry for [`Torrent`].
///
/// Maps stable column ids to typed accessors; built once and shared by
/// the filter engine and the table (explicit registry instead of
/// reflection-style name lookup).
pub fn torrent_properties() -> &'static PropertyRegistry<Torrent> {
    static REGISTRY: OnceLock<PropertyRegistry<Torrent>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut reg = PropertyRegistry::new();
        reg.register("name", FieldKind::Text, |t: &Torrent| {
            FieldValue::Text(t.name.clone())
        });
        reg.register("size", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.size as f64))
        });
        reg.register("downloaded", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.downloaded as f64))
        });
        reg.register("uploaded", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.uploaded as f64))
        });
        reg.register("progress", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.progress))
        });
        reg.register("state", FieldKind::Enum, |t: &Torrent| {
            FieldValue::Enum(Some(t.state.clone()))
        });
        reg.register("category", FieldKind::Text, |t: &Torrent| {
            FieldValue::Text(t.category.clone())
        });
        reg.register("tracker", FieldKind::Text, |t: &Torrent| {
            FieldValue::Text(t.tracker.clone())
        });
        reg.register("down_speed", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.dlspeed as f64))
        });
        reg.register("up_speed", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.upspeed as f64))
        });
        reg.register("ratio", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.ratio))
        });
        reg.register("eta", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(if t.eta < 0 { None } else { Some(t.eta as f64) })
        });
        reg.register("seeds", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.num_seeds as f64))
        });
        reg.register("peers", FieldKind::Number, |t: &Torrent| {
            FieldValue::Number(Some(t.num_leechs as f64))
        });
        reg.register("added_on", FieldKind::Date, |t: &Torrent| {
            FieldValue::Date(t.added_date())
        });
        reg.register("completed_on", FieldKind::Date, |t: &Torrent| {
            FieldValue::Date(t.completion_date())
        });
        reg.register("save_path", FieldKind::Text, |t: &Torrent| {
            FieldValue::Text(t.save_path.clone())
        });
        reg.register("finished", FieldKind::Bool, |t: &Torrent| {
            FieldValue::Bool(Some(t.is_finished()))
        });
        reg
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_is_exact_equality() {
        let mut t = Torrent::new("h1".to_string());
        t.size = 100;
        t.downloaded = 50;
        assert!(!t.is_finished());

        t.downloaded = 100;
        assert!(t.is_finished());

        t.size = -1;
        assert!(!t.is_finished());
    }

    #[test]
    fn test_unknown_dates_are_none() {
        let t = Torrent::new("h1".to_string());
        assert!(t.added_date().is_none());
        assert!(t.completion_date().is_none());
    }

    #[test]
    fn test_registry_resolves_typed_accessors() {
        let reg = torrent_properties();
        let mut t = Torrent::new("h1".to_string());
        t.size = 42;

        let prop = reg.resolve("size").unwrap();
        assert_eq!(prop.kind, FieldKind::Number);
        assert_eq!((prop.get)(&t), FieldValue::Number(Some(42.0)));

        assert!(reg.resolve("no_such_column").is_none());
    }
}
