//! Season × episode heatmap grid
//!
//! Rows are episode numbers, columns are seasons. The grid is sparse on
//! purpose: a row only exists if some season has that episode, and a row only
//! carries cells for the seasons that actually have it. A show with a
//! 13-episode first season and an 8-episode second season therefore has
//! rows E9..E13 holding a single cell each.

use super::tier::{Thresholds, Tier};
use crate::feed::EpisodeRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub season: u32,
    pub episode: u32,
    pub title: String,
    pub rating: f64,
    pub votes: u64,
    pub imdb_link: String,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub episode: u32,
    /// One cell per season that has this episode, seasons ascending
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grid {
    /// Column headers: seasons with at least one viewable episode
    pub seasons: Vec<u32>,
    pub rows: Vec<GridRow>,
}

impl Grid {
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }

    pub fn get(&self, season: u32, episode: u32) -> Option<&GridCell> {
        self.rows
            .iter()
            .find(|r| r.episode == episode)
            .and_then(|r| r.cells.iter().find(|c| c.season == season))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the heatmap grid for one show.
///
/// Only viewable episodes (episode > 0, rating > 0) take part. If the sheet
/// lists the same season/episode twice, the later row wins.
pub fn build(episodes: &[EpisodeRecord], thresholds: &Thresholds) -> Grid {
    let mut by_season: BTreeMap<u32, BTreeMap<u32, &EpisodeRecord>> = BTreeMap::new();

    for ep in episodes.iter().filter(|e| e.is_viewable()) {
        by_season.entry(ep.season).or_default().insert(ep.episode, ep);
    }

    let seasons: Vec<u32> = by_season.keys().copied().collect();
    let present: BTreeSet<u32> = by_season.values().flat_map(|eps| eps.keys().copied()).collect();

    let mut rows = Vec::with_capacity(present.len());
    for episode in present {
        let cells = by_season
            .values()
            .filter_map(|eps| eps.get(&episode))
            .map(|ep| GridCell {
                season: ep.season,
                episode: ep.episode,
                title: ep.title.clone(),
                rating: ep.rating,
                votes: ep.votes,
                imdb_link: ep.imdb_link.clone(),
                tier: thresholds.classify(ep.rating),
            })
            .collect();

        rows.push(GridRow { episode, cells });
    }

    Grid { seasons, rows }
}
