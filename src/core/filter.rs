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

//! Categorical filters and free-text search over the torrent list.
//!
//! The status mapping encodes the daemon's raw state strings, not UI
//! preference - keep it in sync with the protocol.

use crate::core::torrent::Torrent;
use fancy_regex::Regex;

/// The daemon's status buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Downloading,
    Seeding,
    Completed,
    Resumed,
    Paused,
    Active,
    Inactive,
    Stalled,
    StalledUploading,
    StalledDownloading,
    Checking,
    Errored,
}

impl StatusFilter {
    pub const ALL: &'static [StatusFilter] = &[
        StatusFilter::All,
        StatusFilter::Downloading,
        StatusFilter::Seeding,
        StatusFilter::Completed,
        StatusFilter::Resumed,
        StatusFilter::Paused,
        StatusFilter::Active,
        StatusFilter::Inactive,
        StatusFilter::Stalled,
        StatusFilter::StalledUploading,
        StatusFilter::StalledDownloading,
        StatusFilter::Checking,
        StatusFilter::Errored,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Downloading => "Downloading",
            StatusFilter::Seeding => "Seeding",
            StatusFilter::Completed => "Completed",
            StatusFilter::Resumed => "Resumed",
            StatusFilter::Paused => "Paused",
            StatusFilter::Active => "Active",
            StatusFilter::Inactive => "Inactive",
            StatusFilter::Stalled => "Stalled",
            StatusFilter::StalledUploading => "Stalled uploading",
            StatusFilter::StalledDownloading => "Stalled downloading",
            StatusFilter::Checking => "Checking",
            StatusFilter::Errored => "Errored",
        }
    }

    pub fn matches(self, t: &Torrent) -> bool {
        let state = t.state.as_str();
        match self {
            StatusFilter::All => true,
            StatusFilter::Downloading => matches!(
                state,
                "downloading"
                    | "metaDL"
                    | "forcedMetaDL"
                    | "queuedDL"
                    | "stalledDL"
                    | "checkingDL"
                    | "forcedDL"
                    | "pausedDL"
                    | "stoppedDL"
            ),
            StatusFilter::Seeding => matches!(
                state,
                "uploading" | "queuedUP" | "stalledUP" | "checkingUP" | "forcedUP"
            ),
            StatusFilter::Completed => state.contains("UP"),
            StatusFilter::Paused => {
                state.starts_with("paused") || state.starts_with("stopped")
            }
            StatusFilter::Resumed => !StatusFilter::Paused.matches(t),
            StatusFilter::Stalled => matches!(state, "stalledUP" | "stalledDL"),
            StatusFilter::StalledUploading => state == "stalledUP",
            StatusFilter::StalledDownloading => state == "stalledDL",
            StatusFilter::Checking => matches!(
                state,
                "checkingUP" | "checkingDL" | "checkingResumeData"
            ),
            StatusFilter::Errored => matches!(state, "error" | "missingFiles"),
            StatusFilter::Active => {
                // Stalled torrents count as active only while actually
                // moving bytes, mirroring the daemon's own UI.
                match state {
                    "stalledDL" => t.upspeed > 0,
                    "stalledUP" => t.dlspeed > 0,
                    "downloading" | "metaDL" | "forcedMetaDL" | "forcedDL" | "uploading"
                    | "forcedUP" => true,
                    _ => false,
                }
            }
            StatusFilter::Inactive => !StatusFilter::Active.matches(t),
        }
    }
}

/// Category axis: the sentinel variants come from the sidebar's fixed
/// rows, `Name` from the daemon's category list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Uncategorized,
    Name(String),
}

impl CategoryFilter {
    pub fn matches(&self, t: &Torrent, use_subcategories: bool) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Uncategorized => t.category.is_empty(),
            CategoryFilter::Name(name) => {
                t.category == *name
                    || (use_subcategories && t.category.starts_with(&format!("{name}/")))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Untagged,
    Name(String),
}

impl TagFilter {
    pub fn matches(&self, t: &Torrent) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Untagged => t.tags.is_empty(),
            TagFilter::Name(tag) => t.tags.iter().any(|x| x == tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackerFilter {
    #[default]
    All,
    Trackerless,
    Url(String),
}

impl TrackerFilter {
    pub fn matches(&self, t: &Torrent) -> bool {
        match self {
            TrackerFilter::All => true,
            TrackerFilter::Trackerless => t.tracker.is_empty(),
            TrackerFilter::Url(url) => t.tracker == *url,
        }
    }
}

/// Which torrent field the free-text search reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Name,
    SavePath,
    Tracker,
}

impl SearchField {
    pub const ALL: &'static [SearchField] =
        &[SearchField::Name, SearchField::SavePath, SearchField::Tracker];

    pub fn label(self) -> &'static str {
        match self {
            SearchField::Name => "Name",
            SearchField::SavePath => "Save path",
            SearchField::Tracker => "Tracker",
        }
    }

    fn extract<'a>(self, t: &'a Torrent) -> &'a str {
        match self {
            SearchField::Name => &t.name,
            SearchField::SavePath => &t.save_path,
            SearchField::Tracker => &t.tracker,
        }
    }
}

/// Parsed search terms. Space-delimited; `+` marks a required term,
/// `-` an excluded one.
///
/// Semantics (pinned by tests): every required term must be present,
/// every excluded term absent, and if plain terms exist at least one of
/// them must be present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchTerms {
    required: Vec<String>,
    excluded: Vec<String>,
    plain: Vec<String>,
}

impl SearchTerms {
    pub fn parse(text: &str) -> Self {
        let mut terms = SearchTerms::default();
        for token in text.split_whitespace() {
            if let Some(rest) = token.strip_prefix('+') {
                if !rest.is_empty() {
                    terms.required.push(rest.to_lowercase());
                }
            } else if let Some(rest) = token.strip_prefix('-') {
                if !rest.is_empty() {
                    terms.excluded.push(rest.to_lowercase());
                }
            } else {
                terms.plain.push(token.to_lowercase());
            }
        }
        terms
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty() && self.plain.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        let haystack = name.to_lowercase();
        if self.required.iter().any(|t| !haystack.contains(t)) {
            return false;
        }
        if self.excluded.iter().any(|t| haystack.contains(t)) {
            return false;
        }
        if self.plain.is_empty() {
            return true;
        }
        self.plain.iter().any(|t| haystack.contains(t))
    }
}

/// One immutable snapshot of every filter axis. Rebuilt (and its search
/// recompiled) whenever the user touches a filter control.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub status: StatusFilter,
    pub category: CategoryFilter,
    pub tag: TagFilter,
    pub tracker: TrackerFilter,
    pub use_subcategories: bool,
    pub search_text: String,
    pub search_field: SearchField,
    pub use_regex: bool,
    pub is_regex_valid: bool,
}

impl FilterState {
    pub fn new() -> Self {
        FilterState {
            is_regex_valid: true,
            ..FilterState::default()
        }
    }

    /// Compile the search once; the returned predicate conjoins all axes.
    ///
    /// An invalid regex marks `is_regex_valid` false and the search
    /// degrades to match-all - a half-typed pattern must never blank the
    /// table.
    pub fn predicate(&mut self) -> impl Fn(&Torrent) -> bool + '_ {
        let regex = if self.use_regex && !self.search_text.is_empty() {
            match Regex::new(&format!("(?i){}", self.search_text)) {
                Ok(re) => {
                    self.is_regex_valid = true;
                    Some(re)
                }
                Err(e) => {
                    log::debug!("invalid search regex: {e}");
                    self.is_regex_valid = false;
                    None
                }
            }
        } else {
            self.is_regex_valid = true;
            None
        };
        let terms = if self.use_regex {
            SearchTerms::default()
        } else {
            SearchTerms::parse(&self.search_text)
        };

        move |t: &Torrent| {
            if !self.status.matches(t) {
                return false;
            }
            if !self.category.matches(t, self.use_subcategories) {
                return false;
            }
            if !self.tag.matches(t) {
                return false;
            }
            if !self.tracker.matches(t) {
                return false;
            }
            let haystack = self.search_field.extract(t);
            if let Some(re) = &regex {
                return re.is_match(haystack).unwrap_or(false);
            }
            terms.is_empty() || terms.matches(haystack)
        }
    }

    /// Visible subset of `torrents`, preserving input order.
    pub fn apply<'a>(&mut self, torrents: impl Iterator<Item = &'a Torrent>) -> Vec<&'a Torrent> {
        let pred = self.predicate();
        torrents.filter(|t| pred(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent(name: &str, state: &str, category: &str) -> Torrent {
        let mut t = Torrent::new(format!("hash-{name}"));
        t.name = name.to_string();
        t.state = state.to_string();
        t.category = category.to_string();
        t
    }

    #[test]
    fn test_uncategorized_matches_empty_only() {
        let mut fs = FilterState::new();
        fs.category = CategoryFilter::Uncategorized;
        let a = torrent("a", "downloading", "");
        let b = torrent("b", "downloading", "Movies");
        let visible = fs.apply([&a, &b].into_iter());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "a");
    }

    #[test]
    fn test_subcategory_prefix_match() {
        let cat = CategoryFilter::Name("linux".to_string());
        let exact = torrent("a", "downloading", "linux");
        let sub = torrent("b", "downloading", "linux/iso");
        let other = torrent("c", "downloading", "linux-books");

        assert!(cat.matches(&exact, false));
        assert!(!cat.matches(&sub, false));
        assert!(cat.matches(&sub, true));
        assert!(!cat.matches(&other, true));
    }

    #[test]
    fn test_tag_filter() {
        let mut tagged = torrent("a", "downloading", "");
        tagged.tags = vec!["linux".to_string(), "iso".to_string()];
        let untagged = torrent("b", "downloading", "");

        assert!(TagFilter::All.matches(&tagged));
        assert!(TagFilter::Untagged.matches(&untagged));
        assert!(!TagFilter::Untagged.matches(&tagged));
        assert!(TagFilter::Name("iso".to_string()).matches(&tagged));
        assert!(!TagFilter::Name("iso".to_string()).matches(&untagged));
    }

    #[test]
    fn test_tracker_filter() {
        let mut t = torrent("a", "downloading", "");
        t.tracker = "https://tracker.example/announce".to_string();
        let bare = torrent("b", "downloading", "");

        assert!(TrackerFilter::Trackerless.matches(&bare));
        assert!(!TrackerFilter::Trackerless.matches(&t));
        assert!(TrackerFilter::Url("https://tracker.example/announce".to_string()).matches(&t));
    }

    #[test]
    fn test_status_mapping_spot_checks() {
        let dl = torrent("a", "downloading", "");
        let stalled_up = torrent("b", "stalledUP", "");
        let paused = torrent("c", "pausedDL", "");
        let err = torrent("d", "missingFiles", "");
        let checking = torrent("e", "checkingResumeData", "");

        assert!(StatusFilter::Downloading.matches(&dl));
        assert!(StatusFilter::Seeding.matches(&stalled_up));
        assert!(StatusFilter::Completed.matches(&stalled_up));
        assert!(!StatusFilter::Completed.matches(&dl));
        assert!(StatusFilter::Paused.matches(&paused));
        assert!(!StatusFilter::Resumed.matches(&paused));
        assert!(StatusFilter::Resumed.matches(&dl));
        assert!(StatusFilter::Stalled.matches(&stalled_up));
        assert!(StatusFilter::StalledUploading.matches(&stalled_up));
        assert!(!StatusFilter::StalledDownloading.matches(&stalled_up));
        assert!(StatusFilter::Errored.matches(&err));
        assert!(StatusFilter::Checking.matches(&checking));
    }

    #[test]
    fn test_active_consults_speeds_for_stalled() {
        let mut stalled = torrent("a", "stalledDL", "");
        assert!(!StatusFilter::Active.matches(&stalled));
        assert!(StatusFilter::Inactive.matches(&stalled));

        stalled.upspeed = 100;
        assert!(StatusFilter::Active.matches(&stalled));
        assert!(!StatusFilter::Inactive.matches(&stalled));
    }

    #[test]
    fn test_search_term_semantics() {
        let terms = SearchTerms::parse("ubuntu debian");
        // OR across plain terms: any one suffices
        assert!(terms.matches("Ubuntu 24.04 LTS"));
        assert!(terms.matches("Debian 13 netinst"));
        assert!(!terms.matches("Fedora Workstation"));

        let terms = SearchTerms::parse("+iso ubuntu debian");
        assert!(terms.matches("ubuntu-24.04.iso"));
        assert!(!terms.matches("ubuntu-24.04.torrent")); // +iso missing

        let terms = SearchTerms::parse("linux -beta");
        assert!(terms.matches("linux 6.18 stable"));
        assert!(!terms.matches("linux 6.19 beta 2"));

        // only prefixes, no plain terms: prefixes alone decide
        let terms = SearchTerms::parse("+iso -beta");
        assert!(terms.matches("ubuntu.iso"));
        assert!(!terms.matches("ubuntu-beta.iso"));
    }

    #[test]
    fn test_search_field_selects_haystack() {
        let mut on_name = torrent("ubuntu-24.04", "downloading", "");
        on_name.save_path = "/srv/other".to_string();
        let mut on_path = torrent("some.iso", "downloading", "");
        on_path.save_path = "/srv/ubuntu".to_string();
        on_path.tracker = "https://tracker.ubuntu.com/announce".to_string();

        let mut fs = FilterState::new();
        fs.search_text = "ubuntu".to_string();
        assert_eq!(fs.apply([&on_name, &on_path].into_iter()).len(), 1);
        assert_eq!(fs.apply([&on_name, &on_path].into_iter())[0].name, "ubuntu-24.04");

        fs.search_field = SearchField::SavePath;
        let visible = fs.apply([&on_name, &on_path].into_iter());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "some.iso");

        fs.search_field = SearchField::Tracker;
        fs.use_regex = true;
        fs.search_text = r"tracker\.ubuntu".to_string();
        let visible = fs.apply([&on_name, &on_path].into_iter());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "some.iso");
    }

    #[test]
    fn test_invalid_regex_fails_open() {
        let mut fs = FilterState::new();
        fs.use_regex = true;
        fs.search_text = "[unclosed".to_string();
        let a = torrent("anything", "downloading", "");
        let visible = fs.apply(std::iter::once(&a));
        assert_eq!(visible.len(), 1);
        assert!(!fs.is_regex_valid);
    }

    #[test]
    fn test_regex_search() {
        let mut fs = FilterState::new();
        fs.use_regex = true;
        fs.search_text = r"ubuntu-\d+\.\d+".to_string();
        let a = torrent("Ubuntu-24.04", "downloading", "");
        let b = torrent("ubuntu-daily", "downloading", "");
        let visible = fs.apply([&a, &b].into_iter());
        assert_eq!(visible.len(), 1);
        assert!(fs.is_regex_valid);
    }
}
