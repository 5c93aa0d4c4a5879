/// `TorrTide` - A native client for qBittorrent-compatible daemons
///
/// Copyright (C) 2026 TorrTide contributors
///
/// This program is free software: you can redistribute it and/or modify
/// it under the terms of the GNU General Public License as published by
/// the Free Software Foundation, either version 3 of the License, or
/// (at your option) any later version.
///
/// This program is distributed in the hope that it will be useful,
/// but WITHOUT ANY WARRANTY; without even the implied warranty of
/// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
/// GNU General Public License for more details.
///
/// You should have received a copy of the GNU General Public License
/// along with this program.  If not, see <https://www.gnu.org/licenses/>.
use anyhow::Context;
use clap::Parser;
use std::time::Duration;
use torrtide::api::ApiClient;
use torrtide::ui::TorrTideApp;

#[derive(Parser, Debug)]
#[command(name = "torrtide")]
#[command(version)]
#[command(about = "A native desktop client for qBittorrent-compatible daemons", long_about = None)]
struct Args {
    /// Base URL of the daemon's web API (e.g. http://localhost:8080)
    #[arg(value_name = "URL")]
    url: String,

    /// Web API username
    #[arg(short, long, default_value = "admin")]
    username: String,

    /// Web API password (prefer the TORRTIDE_PASSWORD environment variable)
    #[arg(short, long, env = "TORRTIDE_PASSWORD", default_value = "")]
    password: String,

    /// Poll interval in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1500)]
    interval: u64,
}

fn main() -> anyhow::Result<()> {
    // Initialize logger with millisecond precision timestamps
    // Set RUST_LOG environment variable to override (e.g., RUST_LOG=debug)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!(
        "TorrTide starting up (version {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let args = Args::parse();

    let base = reqwest::Url::parse(&args.url)
        .with_context(|| format!("invalid daemon URL: {}", args.url))?;
    let client = ApiClient::new(base).context("failed to build API client")?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    rt.block_on(client.login(&args.username, &args.password))
        .context("login failed")?;
    log::info!("logged in to {} as {}", args.url, args.username);

    let interval = Duration::from_millis(args.interval.max(250));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TorrTide",
        native_options,
        Box::new(move |cc| Ok(Box::new(TorrTideApp::new(cc, rt, client, interval)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
