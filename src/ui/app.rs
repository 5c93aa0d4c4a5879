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

//! Main application: wires the poller, filters, table and dialogs into
//! the egui frame loop.

use crate::api::ApiClient;
use crate::core::filter::FilterState;
use crate::core::fmt::{format_bytes, format_speed};
use crate::core::poller::{self, PollerHandle, PollerStatus};
use crate::core::property_filter::{Predicate, PropertyFilterList};
use crate::core::torrent::torrent_properties;
use crate::core::Torrent;
use crate::storage::{JsonFileStore, KvStore, MemoryStore};
use crate::table::{DynamicTable, TableConfig};
use crate::ui::column_options::ColumnOptionsDialog;
use crate::ui::property_filters::PropertyFilterEditor;
use crate::ui::toasts::ToastManager;
use crate::ui::{filter_panel, torrent_table};
use egui::{Color32, RichText};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

/// Outcome of a fire-and-forget torrent action, reported back to the
/// frame loop for a toast.
enum ActionResult {
    Done(String),
    Failed(String),
}

/// Main application state
pub struct TorrTideApp {
    /// Owns the poller task; dropped last, on exit.
    _rt: tokio::runtime::Runtime,
    client: ApiClient,
    poller: PollerHandle,
    rt_handle: tokio::runtime::Handle,

    store: Box<dyn KvStore>,
    table: DynamicTable<Torrent>,
    filter: FilterState,
    property_filters: PropertyFilterList,
    props_predicate: Predicate<Torrent>,

    filter_editor: PropertyFilterEditor,
    column_dialog: Option<ColumnOptionsDialog>,
    toasts: ToastManager,

    action_tx: Sender<ActionResult>,
    action_rx: Receiver<ActionResult>,
}

impl TorrTideApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        rt: tokio::runtime::Runtime,
        client: ApiClient,
        poll_interval: Duration,
    ) -> Self {
        let rt_handle = rt.handle().clone();
        let repaint_ctx = cc.egui_ctx.clone();
        let poller = poller::spawn(&rt_handle, client.clone(), poll_interval, move || {
            repaint_ctx.request_repaint();
        });

        let store: Box<dyn KvStore> = match JsonFileStore::default_location() {
            Some(s) => Box::new(s),
            None => {
                log::warn!("no config directory available, layout will not persist");
                Box::new(MemoryStore::new())
            }
        };

        let mut table = DynamicTable::new(
            "torrent",
            "main",
            torrent_table::torrent_columns(),
            TableConfig::default(),
        );
        table.initialize("torrent", "main", store.as_ref());

        let property_filters = PropertyFilterList::new();
        let props_predicate = property_filters.compile_all(torrent_properties(), false);
        let (action_tx, action_rx) = channel();

        TorrTideApp {
            _rt: rt,
            client,
            poller,
            rt_handle,
            store,
            table,
            filter: FilterState::new(),
            property_filters,
            props_predicate,
            filter_editor: PropertyFilterEditor::new(),
            column_dialog: None,
            toasts: ToastManager::new(),
            action_tx,
            action_rx,
        }
    }

    /// Surface torrent lifecycle changes from the last poll as toasts.
    fn process_transitions(&mut self) {
        for transition in self.poller.drain_transitions() {
            if transition.is_added {
                self.toasts.show_info(format!("Added: {}", transition.name));
            } else if transition.just_finished() {
                self.toasts
                    .show_success(format!("Finished: {}", transition.name));
            }
        }
    }

    fn process_action_results(&mut self) {
        while let Ok(result) = self.action_rx.try_recv() {
            match result {
                ActionResult::Done(msg) => self.toasts.show_success(msg),
                ActionResult::Failed(msg) => self.toasts.show_error(msg),
            }
        }
    }

    fn dispatch(&self, event: torrent_table::TorrentTableEvent, ctx: &egui::Context) {
        use torrent_table::TorrentTableEvent;

        let client = self.client.clone();
        let tx = self.action_tx.clone();
        let ctx = ctx.clone();
        self.rt_handle.spawn(async move {
            let (what, result) = match event {
                TorrentTableEvent::Pause(hashes) => ("Paused", client.pause(&hashes).await),
                TorrentTableEvent::Resume(hashes) => ("Resumed", client.resume(&hashes).await),
                TorrentTableEvent::Delete { hashes, with_files } => {
                    ("Deleted", client.delete(&hashes, with_files).await)
                }
            };
            let msg = match result {
                Ok(()) => ActionResult::Done(what.to_string()),
                Err(e) => ActionResult::Failed(format!("{what} failed: {e}")),
            };
            let _ = tx.send(msg);
            ctx.request_repaint();
        });
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Columns").clicked() {
                    self.column_dialog = Some(ColumnOptionsDialog::open_for(&mut self.table));
                }
                let filters_active = !self.property_filters.is_empty();
                let label = if filters_active {
                    RichText::new("Filters \u{25cf}").color(Color32::from_rgb(120, 180, 255))
                } else {
                    RichText::new("Filters")
                };
                if ui.button(label).clicked() {
                    self.filter_editor.open = !self.filter_editor.open;
                }
            });
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context, shown: usize, total: usize) {
        let data = self.poller.data_arc();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{shown} of {total} torrents"));
                ui.separator();
                ui.label(format!(
                    "\u{2b07} {}  \u{2b06} {}",
                    format_speed(data.server_state.dl_speed),
                    format_speed(data.server_state.up_speed)
                ));
                ui.separator();
                ui.label(format!(
                    "Free space: {}",
                    format_bytes(data.server_state.free_space)
                ));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.poller.status() {
                        PollerStatus::Connecting => {
                            ui.label("Connecting...");
                        }
                        PollerStatus::Running => {
                            ui.label(data.server_state.connection_status.clone());
                        }
                        PollerStatus::ConnectionLost => {
                            ui.colored_label(
                                Color32::from_rgb(255, 180, 80),
                                "Connection lost, retrying...",
                            );
                        }
                        PollerStatus::Stopped(reason) => {
                            ui.colored_label(
                                Color32::from_rgb(255, 100, 100),
                                format!("Stopped: {reason}"),
                            );
                        }
                    }
                });
            });
        });
    }
}

impl eframe::App for TorrTideApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_transitions();
        self.process_action_results();

        let data = self.poller.data_arc();

        self.top_bar(ctx);

        egui::SidePanel::left("filter_panel")
            .default_width(180.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    filter_panel::render(ui, &mut self.filter, &data);
                });
            });

        if self.filter_editor.show(ctx, &mut self.property_filters) {
            self.props_predicate = self
                .property_filters
                .compile_all(torrent_properties(), false);
        }

        if let Some(dialog) = &mut self.column_dialog {
            dialog.show(ctx, &mut self.table, self.store.as_ref());
            if !dialog.is_open() {
                self.column_dialog = None;
            }
        }

        let total = data.torrents.len();
        let props = &self.props_predicate;
        let rows: Vec<&Torrent> = self
            .filter
            .apply(data.torrents.values())
            .into_iter()
            .filter(|t| props(t))
            .collect();
        let shown = rows.len();

        // selection may reference torrents removed by the last poll
        self.table
            .retain_selection(|hash| data.torrents.contains_key(hash));

        self.status_bar(ctx, shown, total);

        let mut events = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            if data.lost_connection {
                ui.colored_label(
                    Color32::from_rgb(255, 180, 80),
                    "Showing stale data: the last sync failed.",
                );
            }
            events = torrent_table::render(ui, &mut self.table, &rows, self.store.as_ref());
        });

        for event in events {
            self.dispatch(event, ctx);
        }

        self.toasts.show(ctx);
    }
}
