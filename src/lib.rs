//! Bingeworthy - find the episodes of a TV show worth watching
//!
//! Bingeworthy reads a published spreadsheet of IMDB episode ratings and, for
//! any show in it, draws a season × episode heatmap and lists the must-watch
//! episodes.
//!
//! # Overview
//!
//! Data flows one way:
//!
//! ```text
//! CSV text ─► feed::csv ─► feed::records ─► ShowIndex
//!                                              │  (show selected)
//!                                              ▼
//!                      rating::grid + rating::tier + rating::table ─► ShowView
//! ```
//!
//! # Tiers
//!
//! Two thresholds split ratings into three tiers:
//!
//! | Rating | Tier |
//! |--------|------|
//! | below `consider` | Skip |
//! | `consider` up to `must_watch` | Consider |
//! | `must_watch` and above | Must-watch |
//!
//! The defaults are 7.0 and 8.0, and must-watch always stays at least 0.1
//! above consider.
//!
//! # Quick Start
//!
//! ```no_run
//! use bingeworthy::{feed, rating, SortState, Thresholds};
//!
//! let data = feed::load(&feed::FeedSource::default()).expect("feed");
//! if let Some(episodes) = data.index.get("Breaking Bad") {
//!     let view = rating::display_show("Breaking Bad", episodes, &Thresholds::default(), SortState::default());
//!     println!("{} must-watch episodes", view.counts.must_watch);
//! }
//! ```
//!
//! # Modules
//!
//! - [`feed`]: fetching and parsing the ratings sheet
//! - [`shows`]: episodes grouped by show, name lookup and search
//! - [`rating`]: tiers, heatmap grid, must-watch table
//! - [`state`]: dashboard state, UI events and URL parameters
//! - [`serve`]: local web dashboard
//! - [`report`]: HTML / JSON / CSV exports

pub mod error;
pub mod feed;
pub mod rating;
pub mod report;
pub mod serve;
pub mod shows;
pub mod state;

pub use error::FeedError;
pub use feed::{Dataset, EpisodeRecord, FeedSource};
pub use rating::{ShowView, SortColumn, SortState, Thresholds, Tier};
pub use shows::ShowIndex;
pub use state::{AppState, Outcome, UiEvent};

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PUBLIC API TESTS
    // ==========================================================================
    //
    // These tests verify the public API surface is correct and documented.
    // ==========================================================================

    #[test]
    fn test_public_defaults() {
        let t = Thresholds::default();
        assert_eq!((t.consider(), t.must_watch()), (7.0, 8.0));

        assert_eq!(SortState::default(), SortState::new(SortColumn::Season, true));

        let state = AppState::new();
        assert_eq!(state.current_show, None);
        assert_eq!(state.thresholds, t);
        assert!(state.animate);

        assert_eq!(FeedSource::default(), FeedSource::Url(feed::DEFAULT_FEED_URL.to_string()));
    }

    #[test]
    fn test_tier_classes_distinct() {
        let classes = [Tier::MustWatch, Tier::Consider, Tier::Skip].map(|t| t.css_class());
        assert_eq!(classes, ["excellent", "good", "average"]);
        assert_eq!(Thresholds::default().classify(8.0), Tier::MustWatch);
    }

    // ==========================================================================
    // END-TO-END
    // ==========================================================================
    //
    // Raw feed text all the way through to the rendered view, using only the
    // crate-root exports.
    // ==========================================================================

    const FEED: &str = "Show,Season,Episode,Title,Rating,Votes,IMDB Link\n\
        Foo,1,1,Pilot,9.2,\"1,204\",https://www.imdb.com/title/tt0000001/\n\
        Foo,1,2,Second,6.5,800,https://www.imdb.com/title/tt0000002/\n\
        Foo,2,1,Return,8.0,950,https://www.imdb.com/title/tt0000003/\n";

    #[test]
    fn test_end_to_end_default_thresholds() {
        let data = Dataset::from_csv(FEED);
        let mut state = AppState::new();

        let outcome = state.update(&data.index, UiEvent::ShowSelected { name: "Foo".into() });
        assert!(outcome.rerender);

        let view = state.view(&data.index).unwrap();
        assert_eq!(view.counts.must_watch, 2);
        assert_eq!(view.counts.consider, 0);
        assert_eq!(view.counts.skip, 1);

        let table: Vec<(u32, u32)> = view.must_watch.iter().map(|e| (e.season, e.episode)).collect();
        assert_eq!(table, vec![(1, 1), (2, 1)]);
        assert_eq!(view.must_watch[0].votes, 1204);

        assert_eq!(view.summary.episode_count, 3);
        assert_eq!(view.summary.season_count, 2);
    }

    #[test]
    fn test_special_parsed_but_not_shown() {
        let feed = format!("{}Foo,1,0,Making Of,6.0,10,https://www.imdb.com/title/tt0000009/\n", FEED);
        let data = Dataset::from_csv(&feed);
        assert_eq!(data.episodes.len(), 4, "special is in the raw dataset");

        let episodes = data.index.get("Foo").unwrap();
        let view = rating::display_show("Foo", episodes, &Thresholds::default(), SortState::default());

        assert!(view.grid.cells().all(|c| c.episode > 0));
        assert_eq!(view.counts.total(), 3);
        assert!(view.must_watch.iter().all(|e| e.episode > 0));
    }

    #[test]
    fn test_sparse_grid_end_to_end() {
        let feed = "Show,Season,Episode,Title,Rating,Votes,IMDB Link\n\
            Foo,1,1,a,8.0,1,x\nFoo,1,2,b,8.0,1,x\nFoo,1,3,c,8.0,1,x\n\
            Foo,2,1,d,8.0,1,x\nFoo,2,2,e,8.0,1,x\n";
        let data = Dataset::from_csv(feed);
        let view = rating::display_show(
            "Foo",
            data.index.get("Foo").unwrap(),
            &Thresholds::default(),
            SortState::default(),
        );

        assert_eq!(view.grid.rows.len(), 3);
        let last = &view.grid.rows[2];
        assert_eq!(last.episode, 3);
        assert_eq!(last.cells.iter().map(|c| c.season).collect::<Vec<_>>(), vec![1]);
    }
}
