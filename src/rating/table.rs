//! Must-watch table ordering
//!
//! The table lists viewable episodes at or above the must-watch threshold.
//! Clicking a column header sorts by it; clicking the same header again flips
//! the direction.

use super::tier::Thresholds;
use crate::feed::EpisodeRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Composite key stride. Assumes fewer than 1000 episodes per season.
const KEY_STRIDE: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Season,
    Episode,
    Title,
    Rating,
    Votes,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Season,
        SortColumn::Episode,
        SortColumn::Title,
        SortColumn::Rating,
        SortColumn::Votes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Season => "season",
            SortColumn::Episode => "episode",
            SortColumn::Title => "title",
            SortColumn::Rating => "rating",
            SortColumn::Votes => "votes",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort column: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Season,
            ascending: true,
        }
    }
}

impl SortState {
    pub fn new(column: SortColumn, ascending: bool) -> Self {
        Self { column, ascending }
    }

    /// Header click: same column flips direction, a new column starts ascending.
    pub fn toggle(self, column: SortColumn) -> Self {
        let ascending = if self.column == column { !self.ascending } else { true };
        Self { column, ascending }
    }

    /// Header arrow shown next to the active column.
    pub fn indicator(&self) -> &'static str {
        if self.ascending {
            "▲"
        } else {
            "▼"
        }
    }

    pub fn compare(&self, a: &EpisodeRecord, b: &EpisodeRecord) -> Ordering {
        let ord = compare_by(self.column, a, b);
        if self.ascending {
            ord
        } else {
            ord.reverse()
        }
    }
}

fn compare_by(column: SortColumn, a: &EpisodeRecord, b: &EpisodeRecord) -> Ordering {
    match column {
        SortColumn::Season => season_key(a).cmp(&season_key(b)),
        SortColumn::Episode => episode_key(a).cmp(&episode_key(b)),
        SortColumn::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortColumn::Rating => a.rating.total_cmp(&b.rating),
        SortColumn::Votes => a.votes.cmp(&b.votes),
    }
}

fn season_key(e: &EpisodeRecord) -> u64 {
    e.season as u64 * KEY_STRIDE + e.episode as u64
}

fn episode_key(e: &EpisodeRecord) -> u64 {
    e.episode as u64 * KEY_STRIDE + e.season as u64
}

/// Viewable episodes rated at or above the must-watch threshold, in source order.
///
/// A repeated season/episode keeps only its last viewable row, the same one
/// the heatmap shows, so the table always matches the must-watch count.
pub fn must_watch<'a>(episodes: &'a [EpisodeRecord], thresholds: &Thresholds) -> Vec<&'a EpisodeRecord> {
    let mut last_row: HashMap<(u32, u32), usize> = HashMap::new();
    for (idx, e) in episodes.iter().enumerate().filter(|(_, e)| e.is_viewable()) {
        last_row.insert((e.season, e.episode), idx);
    }

    episodes
        .iter()
        .enumerate()
        .filter(|(idx, e)| last_row.get(&(e.season, e.episode)) == Some(idx))
        .map(|(_, e)| e)
        .filter(|e| e.rating >= thresholds.must_watch())
        .collect()
}

pub fn sort(rows: &mut [&EpisodeRecord], state: SortState) {
    rows.sort_by(|a, b| state.compare(a, b));
}
