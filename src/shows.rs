//! Episodes grouped by show
//!
//! Grouping uses the exact show string. Lookups from user input (search box,
//! `?show=` parameter) fall back to a case-insensitive match.

use crate::feed::EpisodeRecord;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ShowIndex {
    // BTreeMap keeps names in ordinal (case-sensitive) order
    shows: BTreeMap<String, Vec<EpisodeRecord>>,
}

impl ShowIndex {
    /// Group records by show, keeping source row order within each show.
    pub fn build(episodes: &[EpisodeRecord]) -> Self {
        let mut shows: BTreeMap<String, Vec<EpisodeRecord>> = BTreeMap::new();
        for episode in episodes {
            shows
                .entry(episode.show.clone())
                .or_default()
                .push(episode.clone());
        }
        Self { shows }
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    /// All show names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.shows.keys().map(String::as_str).collect()
    }

    /// Exact lookup.
    pub fn get(&self, name: &str) -> Option<&[EpisodeRecord]> {
        self.shows.get(name).map(Vec::as_slice)
    }

    /// Resolve a user-typed name to the stored one: exact match first, then
    /// the first case-insensitive match in sorted order.
    pub fn find(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.shows.get_key_value(name) {
            return Some(key.as_str());
        }
        let wanted = name.to_lowercase();
        self.shows
            .keys()
            .find(|key| key.to_lowercase() == wanted)
            .map(String::as_str)
    }

    /// Names containing `term`, case-insensitively. Empty term lists all.
    pub fn search(&self, term: &str) -> Vec<&str> {
        let term = term.to_lowercase();
        self.shows
            .keys()
            .filter(|name| name.to_lowercase().contains(&term))
            .map(String::as_str)
            .collect()
    }
}
