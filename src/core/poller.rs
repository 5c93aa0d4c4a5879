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

//! The polling loop: one background task fetching sync snapshots.
//!
//! The task is the single writer of `MainData`. After each merge it
//! publishes an atomic pointer swap (`ArcSwap`) for the UI thread to
//! read, and pushes transitions over an mpsc channel drained each frame.
//! Ticks are strictly serialized - a fetch in flight delays the next
//! tick, never overlaps it, because the merge state is a patch sequence
//! that cannot be applied out of order.

use crate::api::ApiClient;
use crate::core::main_data::{MainData, TorrentTransition};
use arc_swap::ArcSwap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Where the loop currently stands, for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerStatus {
    Connecting,
    Running,
    ConnectionLost,
    /// Terminal: the loop has stopped and will not retry; the session
    /// must be re-established.
    Stopped(String),
}

/// Handle held by the UI thread.
pub struct PollerHandle {
    data: Arc<ArcSwap<MainData>>,
    status: Arc<Mutex<PollerStatus>>,
    transitions_rx: Receiver<Vec<TorrentTransition>>,
    stop_tx: watch::Sender<bool>,
}

impl PollerHandle {
    /// Latest published state. Swapped, never mutated in place, so the
    /// guard is safe to hold across a frame.
    pub fn data(&self) -> arc_swap::Guard<Arc<MainData>> {
        self.data.load()
    }

    /// Owned handle to the latest state, free of the guard's borrow.
    pub fn data_arc(&self) -> Arc<MainData> {
        self.data.load_full()
    }

    pub fn status(&self) -> PollerStatus {
        self.status
            .lock()
            .map(|s| s.clone())
            .unwrap_or(PollerStatus::Connecting)
    }

    /// Drain all transition batches that arrived since the last frame.
    pub fn drain_transitions(&self) -> Vec<TorrentTransition> {
        let mut all = Vec::new();
        while let Ok(batch) = self.transitions_rx.try_recv() {
            all.extend(batch);
        }
        all
    }

    /// Cooperative cancellation; the task exits at its next suspension
    /// point without leaving a dangling timer.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn the polling task onto `rt`.
///
/// `repaint` is invoked after every published change so the UI wakes up
/// without busy-polling.
pub fn spawn(
    rt: &tokio::runtime::Handle,
    client: ApiClient,
    interval: Duration,
    repaint: impl Fn() + Send + Sync + 'static,
) -> PollerHandle {
    let data = Arc::new(ArcSwap::from_pointee(MainData::default()));
    let status = Arc::new(Mutex::new(PollerStatus::Connecting));
    let (transitions_tx, transitions_rx) = channel();
    let (stop_tx, stop_rx) = watch::channel(false);

    rt.spawn(run(
        client,
        interval,
        data.clone(),
        status.clone(),
        transitions_tx,
        stop_rx,
        repaint,
    ));

    PollerHandle {
        data,
        status,
        transitions_rx,
        stop_tx,
    }
}

fn set_status(slot: &Mutex<PollerStatus>, value: PollerStatus) {
    if let Ok(mut s) = slot.lock() {
        *s = value;
    }
}

async fn run(
    client: ApiClient,
    interval: Duration,
    shared: Arc<ArcSwap<MainData>>,
    status: Arc<Mutex<PollerStatus>>,
    transitions_tx: Sender<Vec<TorrentTransition>>,
    mut stop_rx: watch::Receiver<bool>,
    repaint: impl Fn() + Send + Sync + 'static,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut rid = 0i64;
    let mut current: Option<MainData> = None;

    log::info!("sync poller started (interval {interval:?})");

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    log::info!("sync poller stopping");
                    break;
                }
            }
            _ = ticker.tick() => {
                match client.sync_main_data(rid).await {
                    Ok(snapshot) => {
                        rid = snapshot.rid;
                        let full = snapshot.full_update || current.is_none();
                        if full {
                            let data = MainData::from_snapshot(snapshot);
                            shared.store(Arc::new(data.clone()));
                            current = Some(data);
                            set_status(&status, PollerStatus::Running);
                            repaint();
                        } else if let Some(data) = current.as_mut() {
                            let was_lost = data.lost_connection;
                            let outcome = data.merge(snapshot);
                            if !outcome.transitions.is_empty() {
                                let _ = transitions_tx.send(outcome.transitions.clone());
                            }
                            if outcome.data_changed || outcome.filter_changed || was_lost {
                                shared.store(Arc::new(data.clone()));
                                repaint();
                            }
                            set_status(&status, PollerStatus::Running);
                        }
                    }
                    Err(e) if e.is_terminal() => {
                        log::warn!("sync poller stopping on terminal error: {e}");
                        set_status(&status, PollerStatus::Stopped(e.to_string()));
                        repaint();
                        break;
                    }
                    Err(e) => {
                        log::warn!("sync fetch failed (transient): {e}");
                        if let Some(data) = current.as_mut() {
                            data.lost_connection = true;
                            shared.store(Arc::new(data.clone()));
                        }
                        set_status(&status, PollerStatus::ConnectionLost);
                        repaint();
                    }
                }
            }
        }
    }
}
