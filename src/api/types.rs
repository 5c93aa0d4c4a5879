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

//! Wire types for the daemon's `sync/maindata` endpoint.
//!
//! Every torrent/server-state field is optional: an incremental snapshot
//! carries only the fields that changed since the previous `rid`. The
//! patch appliers report whether anything actually changed so the merge
//! engine can detect no-op deltas.

use crate::core::torrent::Torrent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Partial torrent fields from one sync payload.
///
/// `tags` arrives as a comma-separated string on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TorrentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dlspeed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upspeed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_seeds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_leechs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_on: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_on: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_path: Option<String>,
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Applies `patch` onto `target`, returning true if any field changed.
fn patch_field<V: PartialEq + Clone>(target: &mut V, patch: Option<&V>) -> bool {
    match patch {
        Some(v) if v != target => {
            *target = v.clone();
            true
        }
        _ => false,
    }
}

impl TorrentPatch {
    /// Materialize a brand-new torrent from this patch (first sighting of
    /// a hash; absent fields keep their zero defaults).
    pub fn into_torrent(self, hash: String) -> Torrent {
        let mut t = Torrent::new(hash);
        self.apply(&mut t);
        t
    }

    /// Patch an existing torrent in place. Fields absent from the delta
    /// are left untouched. Returns true if anything changed.
    pub fn apply(&self, t: &mut Torrent) -> bool {
        let mut changed = false;
        changed |= patch_field(&mut t.name, self.name.as_ref());
        changed |= patch_field(&mut t.size, self.size.as_ref());
        changed |= patch_field(&mut t.downloaded, self.downloaded.as_ref());
        changed |= patch_field(&mut t.uploaded, self.uploaded.as_ref());
        changed |= patch_field(&mut t.progress, self.progress.as_ref());
        changed |= patch_field(&mut t.state, self.state.as_ref());
        changed |= patch_field(&mut t.category, self.category.as_ref());
        changed |= patch_field(&mut t.tracker, self.tracker.as_ref());
        changed |= patch_field(&mut t.dlspeed, self.dlspeed.as_ref());
        changed |= patch_field(&mut t.upspeed, self.upspeed.as_ref());
        changed |= patch_field(&mut t.ratio, self.ratio.as_ref());
        changed |= patch_field(&mut t.eta, self.eta.as_ref());
        changed |= patch_field(&mut t.num_seeds, self.num_seeds.as_ref());
        changed |= patch_field(&mut t.num_leechs, self.num_leechs.as_ref());
        changed |= patch_field(&mut t.added_on, self.added_on.as_ref());
        changed |= patch_field(&mut t.completion_on, self.completion_on.as_ref());
        changed |= patch_field(&mut t.save_path, self.save_path.as_ref());
        if let Some(raw) = &self.tags {
            let tags = split_tags(raw);
            if tags != t.tags {
                t.tags = tags;
                changed = true;
            }
        }
        changed
    }
}

/// Partial global transfer/server statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerStatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dl_info_speed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_info_speed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dl_rate_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_rate_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_space_on_disk: Option<i64>,
}

/// A category as reported by the daemon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "savePath")]
    pub save_path: String,
}

/// One payload from `sync/maindata`.
///
/// `full_update` means "discard local state and rebuild"; otherwise the
/// maps/lists carry additions, partial changes, and removals-by-key
/// relative to the previous `rid`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub rid: i64,
    #[serde(default)]
    pub full_update: bool,
    #[serde(default)]
    pub torrents: HashMap<String, TorrentPatch>,
    #[serde(default)]
    pub torrents_removed: Vec<String>,
    #[serde(default)]
    pub categories: HashMap<String, Category>,
    #[serde(default)]
    pub categories_removed: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tags_removed: Vec<String>,
    #[serde(default)]
    pub trackers: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub trackers_removed: Vec<String>,
    #[serde(default)]
    pub server_state: Option<ServerStatePatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_reports_noop() {
        let mut t = Torrent::new("h".to_string());
        t.name = "x".to_string();
        t.size = 10;

        let patch = TorrentPatch {
            name: Some("x".to_string()),
            size: Some(10),
            ..TorrentPatch::default()
        };
        assert!(!patch.apply(&mut t));

        let patch = TorrentPatch {
            size: Some(20),
            ..TorrentPatch::default()
        };
        assert!(patch.apply(&mut t));
        assert_eq!(t.size, 20);
        // untouched fields survive the patch
        assert_eq!(t.name, "x");
    }

    #[test]
    fn test_tags_split_from_wire_string() {
        let mut t = Torrent::new("h".to_string());
        let patch = TorrentPatch {
            tags: Some("linux, iso ,,daily".to_string()),
            ..TorrentPatch::default()
        };
        assert!(patch.apply(&mut t));
        assert_eq!(t.tags, vec!["linux", "iso", "daily"]);

        // same tags again is a no-op
        assert!(!patch.apply(&mut t));

        let clear = TorrentPatch {
            tags: Some(String::new()),
            ..TorrentPatch::default()
        };
        assert!(clear.apply(&mut t));
        assert!(t.tags.is_empty());
    }

    #[test]
    fn test_snapshot_deserializes_with_defaults() {
        let snap: SyncSnapshot = serde_json::from_str(r#"{"rid": 3}"#).unwrap();
        assert_eq!(snap.rid, 3);
        assert!(!snap.full_update);
        assert!(snap.torrents.is_empty());
        assert!(snap.server_state.is_none());
    }
}
