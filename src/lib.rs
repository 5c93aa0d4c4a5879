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

//! TorrTide - a native desktop client for qBittorrent-compatible daemons.
//!
//! The crate is split into the daemon-facing API client (`api`), the
//! domain core (`core`: merged torrent state, filters, polling), the
//! layout persistence store (`storage`), the generic configurable table
//! (`table`), and the egui front-end (`ui`).

pub mod api;
pub mod core;
pub mod storage;
pub mod table;
pub mod ui;
