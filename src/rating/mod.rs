//! Per-show rating views
//!
//! Everything the dashboard shows for one show is computed here, in one pass,
//! from the show's episodes plus the current thresholds and sort order:
//!
//! - [`ShowSummary`]: episode count, average rating, season count
//! - [`TierCounts`]: how many episodes land in each tier
//! - [`grid::Grid`]: the sparse season × episode heatmap
//! - the must-watch table, already sorted
//!
//! The tier counts are taken from the grid cells themselves, so the count
//! panel and the heatmap colors can never disagree.

pub mod grid;
pub mod table;
pub mod tier;

pub use grid::{Grid, GridCell, GridRow};
pub use table::{SortColumn, SortState};
pub use tier::{classify, Slider, Thresholds, Tier};

use crate::feed::EpisodeRecord;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowSummary {
    /// All rows for the show, specials included
    pub episode_count: usize,
    /// Mean over all rows, unrated ones counting as 0; `None` for no rows
    pub average_rating: Option<f64>,
    pub season_count: usize,
}

impl ShowSummary {
    pub fn from_episodes(episodes: &[EpisodeRecord]) -> Self {
        let average_rating = if episodes.is_empty() {
            None
        } else {
            Some(episodes.iter().map(|e| e.rating).sum::<f64>() / episodes.len() as f64)
        };

        let seasons: BTreeSet<u32> = episodes.iter().map(|e| e.season).collect();

        Self {
            episode_count: episodes.len(),
            average_rating,
            season_count: seasons.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub must_watch: usize,
    pub consider: usize,
    pub skip: usize,
}

impl TierCounts {
    pub fn from_grid(grid: &Grid) -> Self {
        let mut counts = Self::default();
        for cell in grid.cells() {
            match cell.tier {
                Tier::MustWatch => counts.must_watch += 1,
                Tier::Consider => counts.consider += 1,
                Tier::Skip => counts.skip += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.must_watch + self.consider + self.skip
    }
}

/// Everything needed to draw one show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowView {
    pub show: String,
    pub thresholds: Thresholds,
    pub sort: SortState,
    pub summary: ShowSummary,
    pub counts: TierCounts,
    pub grid: Grid,
    pub must_watch: Vec<EpisodeRecord>,
}

pub fn display_show(
    show: &str,
    episodes: &[EpisodeRecord],
    thresholds: &Thresholds,
    sort: SortState,
) -> ShowView {
    let grid = grid::build(episodes, thresholds);
    let counts = TierCounts::from_grid(&grid);

    let mut rows = table::must_watch(episodes, thresholds);
    table::sort(&mut rows, sort);

    tracing::debug!(
        show = %show,
        cells = grid.cell_count(),
        must_watch = rows.len(),
        "rendered show"
    );

    ShowView {
        show: show.to_string(),
        thresholds: *thresholds,
        sort,
        summary: ShowSummary::from_episodes(episodes),
        counts,
        grid,
        must_watch: rows.into_iter().cloned().collect(),
    }
}
