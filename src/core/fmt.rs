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

//! Human-readable formatting for table cells.

const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// ETA value the daemon uses for "infinity".
const ETA_INFINITE: i64 = 8_640_000;

pub fn format_bytes(bytes: i64) -> String {
    if bytes < 0 {
        return "-".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

pub fn format_speed(bytes_per_sec: i64) -> String {
    if bytes_per_sec <= 0 {
        return "-".to_string();
    }
    format!("{}/s", format_bytes(bytes_per_sec))
}

pub fn format_progress(fraction: f64) -> String {
    format!("{:.1}%", (fraction * 100.0).clamp(0.0, 100.0))
}

pub fn format_ratio(ratio: f64) -> String {
    format!("{ratio:.2}")
}

pub fn format_eta(seconds: i64) -> String {
    if seconds < 0 || seconds >= ETA_INFINITE {
        return "∞".to_string();
    }
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(1_572_864), "1.5 MiB");
        assert_eq!(format_bytes(-1), "-");
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(0), "-");
        assert_eq!(format_speed(1024), "1.0 KiB/s");
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(-1), "∞");
        assert_eq!(format_eta(8_640_000), "∞");
        assert_eq!(format_eta(45), "45s");
        assert_eq!(format_eta(90), "1m 30s");
        assert_eq!(format_eta(3_700), "1h 1m");
        assert_eq!(format_eta(90_000), "1d 1h");
    }

    #[test]
    fn test_format_progress_clamps() {
        assert_eq!(format_progress(0.5), "50.0%");
        assert_eq!(format_progress(1.2), "100.0%");
    }
}
