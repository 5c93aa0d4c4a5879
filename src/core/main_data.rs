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

//! Merged daemon state and the snapshot reconciliation algorithm.
//!
//! The polling loop owns one `MainData` and is its only writer. A full
//! snapshot rebuilds it from scratch; incremental snapshots are patch
//! sequences applied strictly in arrival order. Each merge reports what
//! changed so the UI can skip redundant work, plus the added/finished
//! transitions the notification layer turns into toasts.

use crate::api::types::{Category, SyncSnapshot};
use crate::core::torrent::Torrent;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};

/// Global transfer statistics, fully overwritten from each snapshot's
/// present fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerState {
    pub dl_speed: i64,
    pub up_speed: i64,
    pub dl_rate_limit: i64,
    pub up_rate_limit: i64,
    pub connection_status: String,
    pub refresh_interval: i64,
    pub free_space: i64,
}

/// A torrent's added/finished change observed during one merge.
/// Ephemeral: handed to the notification layer and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentTransition {
    pub hash: String,
    pub name: String,
    pub is_added: bool,
    pub previous_finished: bool,
    pub current_finished: bool,
}

impl TorrentTransition {
    pub fn just_finished(&self) -> bool {
        !self.previous_finished && self.current_finished
    }
}

/// What one incremental merge changed.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Any torrent field changed, a torrent was added/removed, or a
    /// server-state scalar changed.
    pub data_changed: bool,
    /// Categories/tags/trackers changed; filter option lists must be
    /// recomputed even when no torrent row did.
    pub filter_changed: bool,
    pub transitions: Vec<TorrentTransition>,
}

/// The client's merged view of the daemon.
#[derive(Debug, Clone, Default)]
pub struct MainData {
    /// Keyed by torrent hash; insertion order is stable across patches.
    pub torrents: IndexMap<String, Torrent>,
    pub categories: BTreeMap<String, Category>,
    pub tags: BTreeSet<String>,
    pub trackers: BTreeMap<String, Vec<String>>,
    pub server_state: ServerState,
    /// Set by the polling loop on transport failure, cleared by the next
    /// successful snapshot.
    pub lost_connection: bool,
}

impl MainData {
    /// Build fresh state from a full snapshot. No transitions: there is
    /// no previous state to diff against on this path.
    pub fn from_snapshot(snapshot: SyncSnapshot) -> Self {
        let mut data = MainData::default();
        for (hash, patch) in snapshot.torrents {
            let torrent = patch.into_torrent(hash.clone());
            data.torrents.insert(hash, torrent);
        }
        for (name, mut category) in snapshot.categories {
            if category.name.is_empty() {
                category.name.clone_from(&name);
            }
            data.categories.insert(name, category);
        }
        data.tags.extend(snapshot.tags);
        for (url, hashes) in snapshot.trackers {
            data.trackers.insert(url, hashes);
        }
        if let Some(patch) = snapshot.server_state {
            apply_server_state(&mut data.server_state, &patch);
        }
        data.torrents.sort_keys();
        log::debug!(
            "full snapshot: {} torrents, {} categories, {} tags",
            data.torrents.len(),
            data.categories.len(),
            data.tags.len()
        );
        data
    }

    /// Apply an incremental snapshot in place.
    ///
    /// Must be called with snapshots in arrival order; the payload is a
    /// patch sequence, not idempotent-by-timestamp.
    pub fn merge(&mut self, snapshot: SyncSnapshot) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for (hash, patch) in snapshot.torrents {
            if let Some(existing) = self.torrents.get_mut(&hash) {
                let previous_finished = existing.is_finished();
                let changed = patch.apply(existing);
                let current_finished = existing.is_finished();
                if changed {
                    outcome.data_changed = true;
                }
                if previous_finished != current_finished {
                    outcome.transitions.push(TorrentTransition {
                        hash: hash.clone(),
                        name: existing.name.clone(),
                        is_added: false,
                        previous_finished,
                        current_finished,
                    });
                }
            } else {
                let torrent = patch.into_torrent(hash.clone());
                outcome.transitions.push(TorrentTransition {
                    hash: hash.clone(),
                    name: torrent.name.clone(),
                    is_added: true,
                    previous_finished: false,
                    current_finished: torrent.is_finished(),
                });
                self.torrents.insert(hash, torrent);
                outcome.data_changed = true;
            }
        }

        for hash in &snapshot.torrents_removed {
            if self.torrents.shift_remove(hash).is_some() {
                outcome.data_changed = true;
            }
        }

        for (name, mut category) in snapshot.categories {
            if category.name.is_empty() {
                category.name.clone_from(&name);
            }
            if self.categories.get(&name) != Some(&category) {
                self.categories.insert(name, category);
                outcome.filter_changed = true;
            }
        }
        for name in &snapshot.categories_removed {
            if self.categories.remove(name).is_some() {
                outcome.filter_changed = true;
            }
        }

        for tag in snapshot.tags {
            if self.tags.insert(tag) {
                outcome.filter_changed = true;
            }
        }
        for tag in &snapshot.tags_removed {
            if self.tags.remove(tag) {
                outcome.filter_changed = true;
            }
        }

        for (url, hashes) in snapshot.trackers {
            if self.trackers.get(&url) != Some(&hashes) {
                self.trackers.insert(url, hashes);
                outcome.filter_changed = true;
            }
        }
        for url in &snapshot.trackers_removed {
            if self.trackers.remove(url).is_some() {
                outcome.filter_changed = true;
            }
        }

        if let Some(patch) = snapshot.server_state {
            if apply_server_state(&mut self.server_state, &patch) {
                outcome.data_changed = true;
            }
        }

        self.lost_connection = false;

        outcome
    }
}

fn apply_server_state(
    state: &mut ServerState,
    patch: &crate::api::types::ServerStatePatch,
) -> bool {
    let before = state.clone();
    if let Some(v) = patch.dl_info_speed {
        state.dl_speed = v;
    }
    if let Some(v) = patch.up_info_speed {
        state.up_speed = v;
    }
    if let Some(v) = patch.dl_rate_limit {
        state.dl_rate_limit = v;
    }
    if let Some(v) = patch.up_rate_limit {
        state.up_rate_limit = v;
    }
    if let Some(v) = &patch.connection_status {
        state.connection_status.clone_from(v);
    }
    if let Some(v) = patch.refresh_interval {
        state.refresh_interval = v;
    }
    if let Some(v) = patch.free_space_on_disk {
        state.free_space = v;
    }
    *state != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ServerStatePatch, TorrentPatch};
    use std::collections::HashMap;

    fn patch(name: &str, size: i64, downloaded: i64) -> TorrentPatch {
        TorrentPatch {
            name: Some(name.to_string()),
            size: Some(size),
            downloaded: Some(downloaded),
            ..TorrentPatch::default()
        }
    }

    fn snapshot(torrents: Vec<(&str, TorrentPatch)>) -> SyncSnapshot {
        SyncSnapshot {
            rid: 1,
            torrents: torrents
                .into_iter()
                .map(|(h, p)| (h.to_string(), p))
                .collect::<HashMap<_, _>>(),
            ..SyncSnapshot::default()
        }
    }

    #[test]
    fn test_full_snapshot_emits_no_transitions() {
        let data = MainData::from_snapshot(snapshot(vec![("h1", patch("a", 10, 10))]));
        assert_eq!(data.torrents.len(), 1);
        assert!(data.torrents["h1"].is_finished());
        // from_snapshot has no outcome by construction; this test pins the
        // shape of the full-replace path.
    }

    #[test]
    fn test_merge_add_and_noop_patch() {
        // Scenario: h1 already complete, delta re-states h1 unchanged and
        // adds an unfinished h2.
        let mut data = MainData::from_snapshot(snapshot(vec![("h1", patch("a", 10, 10))]));

        let delta = snapshot(vec![
            (
                "h1",
                TorrentPatch {
                    downloaded: Some(10),
                    ..TorrentPatch::default()
                },
            ),
            ("h2", patch("b", 5, 0)),
        ]);
        let outcome = data.merge(delta);

        assert!(outcome.data_changed);
        assert_eq!(outcome.transitions.len(), 1);
        let tr = &outcome.transitions[0];
        assert_eq!(tr.hash, "h2");
        assert!(tr.is_added);
        assert!(!tr.previous_finished);
        assert!(!tr.current_finished);
    }

    #[test]
    fn test_finish_transition_emitted_exactly_once() {
        let mut data = MainData::from_snapshot(snapshot(vec![("h1", patch("a", 100, 50))]));

        let delta = snapshot(vec![(
            "h1",
            TorrentPatch {
                downloaded: Some(100),
                ..TorrentPatch::default()
            },
        )]);
        let outcome = data.merge(delta.clone());
        assert_eq!(outcome.transitions.len(), 1);
        let tr = &outcome.transitions[0];
        assert!(!tr.is_added);
        assert!(!tr.previous_finished);
        assert!(tr.current_finished);
        assert!(tr.just_finished());

        // Replaying the now-identical delta is a no-op: no change, no
        // second notification.
        let outcome = data.merge(delta);
        assert!(!outcome.data_changed);
        assert!(outcome.transitions.is_empty());
    }

    #[test]
    fn test_added_already_finished() {
        let mut data = MainData::default();
        let outcome = data.merge(snapshot(vec![("h1", patch("a", 100, 100))]));
        assert_eq!(outcome.transitions.len(), 1);
        let tr = &outcome.transitions[0];
        assert!(tr.is_added);
        assert!(!tr.previous_finished);
        assert!(tr.current_finished);
    }

    #[test]
    fn test_removal_changes_data_without_transition() {
        let mut data = MainData::from_snapshot(snapshot(vec![("h1", patch("a", 10, 0))]));
        let delta = SyncSnapshot {
            rid: 2,
            torrents_removed: vec!["h1".to_string(), "unknown".to_string()],
            ..SyncSnapshot::default()
        };
        let outcome = data.merge(delta);
        assert!(outcome.data_changed);
        assert!(outcome.transitions.is_empty());
        assert!(data.torrents.is_empty());
    }

    #[test]
    fn test_aux_collections_set_filter_changed_only() {
        let mut data = MainData::default();
        let delta = SyncSnapshot {
            rid: 2,
            tags: vec!["linux".to_string()],
            categories: HashMap::from([(
                "movies".to_string(),
                Category {
                    name: "movies".to_string(),
                    save_path: "/dl/movies".to_string(),
                },
            )]),
            ..SyncSnapshot::default()
        };
        let outcome = data.merge(delta);
        assert!(outcome.filter_changed);
        assert!(!outcome.data_changed);

        // removing them flips filter_changed again
        let delta = SyncSnapshot {
            rid: 3,
            tags_removed: vec!["linux".to_string()],
            categories_removed: vec!["movies".to_string()],
            ..SyncSnapshot::default()
        };
        let outcome = data.merge(delta);
        assert!(outcome.filter_changed);
        assert!(data.tags.is_empty());
        assert!(data.categories.is_empty());

        // removing what is not there is a no-op
        let delta = SyncSnapshot {
            rid: 4,
            tags_removed: vec!["linux".to_string()],
            ..SyncSnapshot::default()
        };
        let outcome = data.merge(delta);
        assert!(!outcome.filter_changed);
    }

    #[test]
    fn test_server_state_scalars_overwrite() {
        let mut data = MainData::default();
        let delta = SyncSnapshot {
            rid: 2,
            server_state: Some(ServerStatePatch {
                dl_info_speed: Some(1000),
                connection_status: Some("connected".to_string()),
                ..ServerStatePatch::default()
            }),
            ..SyncSnapshot::default()
        };
        let outcome = data.merge(delta.clone());
        assert!(outcome.data_changed);
        assert_eq!(data.server_state.dl_speed, 1000);
        assert_eq!(data.server_state.connection_status, "connected");

        // identical scalars: no change
        let outcome = data.merge(delta);
        assert!(!outcome.data_changed);
    }

    #[test]
    fn test_merge_clears_lost_connection() {
        let mut data = MainData::default();
        data.lost_connection = true;
        data.merge(SyncSnapshot {
            rid: 2,
            ..SyncSnapshot::default()
        });
        assert!(!data.lost_connection);
    }
}
