//! Ratings feed loading
//!
//! The ratings live in a published spreadsheet. Loading is a one-shot
//! pipeline that runs once per session:
//!
//! ```text
//! raw text ──► csv::parse ──► records::build ──► ShowIndex
//! ```
//!
//! A local CSV file can stand in for the URL, which is handy offline and in
//! tests.

pub mod csv;
pub mod records;

pub use records::EpisodeRecord;

use crate::error::FeedError;
use crate::shows::ShowIndex;
use std::fmt;
use std::path::PathBuf;

/// Spreadsheet holding the episode ratings.
pub const SHEET_ID: &str = "1B5iPZgD3AVaQQM9dFa-2V-lj5RGEPTClJi-gvlrmIJY";

/// CSV export of the first sheet.
pub const DEFAULT_FEED_URL: &str =
    "https://docs.google.com/spreadsheets/d/1B5iPZgD3AVaQQM9dFa-2V-lj5RGEPTClJi-gvlrmIJY/gviz/tq?tqx=out:csv&gid=0";

/// Where the raw CSV comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl Default for FeedSource {
    fn default() -> Self {
        FeedSource::Url(DEFAULT_FEED_URL.to_string())
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{}", url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Everything parsed from one load of the feed.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Admitted records in source row order, specials included
    pub episodes: Vec<EpisodeRecord>,
    pub index: ShowIndex,
}

impl Dataset {
    pub fn from_csv(text: &str) -> Self {
        let rows = csv::parse(text);
        let episodes = records::build(&rows);
        let index = ShowIndex::build(&episodes);

        tracing::info!(
            episodes = episodes.len(),
            shows = index.len(),
            "dataset ready"
        );

        Self { episodes, index }
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Fetch the raw feed text. Non-success HTTP status is an error; no retry.
pub fn fetch_text(source: &FeedSource) -> Result<String, FeedError> {
    match source {
        FeedSource::Url(url) => {
            tracing::debug!(url = %url, "fetching feed");
            let response = reqwest::blocking::get(url.as_str())?;
            let status = response.status();
            tracing::debug!(status = status.as_u16(), "feed response");

            if !status.is_success() {
                return Err(FeedError::Status(status.as_u16()));
            }

            let text = response.text()?;
            tracing::debug!(bytes = text.len(), "feed downloaded");
            Ok(text)
        }
        FeedSource::File(path) => {
            tracing::debug!(path = %path.display(), "reading feed file");
            Ok(std::fs::read_to_string(path)?)
        }
    }
}

/// Fetch and parse in one go.
pub fn load(source: &FeedSource) -> Result<Dataset, FeedError> {
    let text = fetch_text(source)?;
    Ok(Dataset::from_csv(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FEED: &str = "Show,Season,Episode,Title,Rating,Votes,IMDB Link\n\
        Foo,1,1,Pilot,9.2,1000,https://www.imdb.com/title/tt0000001/\n\
        Foo,1,2,Second,6.5,800,https://www.imdb.com/title/tt0000002/\n\
        Bar,1,1,Start,7.7,50,https://www.imdb.com/title/tt0000003/\n";

    #[test]
    fn test_dataset_from_csv() {
        let data = Dataset::from_csv(FEED);
        assert_eq!(data.episodes.len(), 3);
        assert_eq!(data.index.names(), vec!["Bar", "Foo"]);
        assert_eq!(data.index.get("Foo").map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_dataset_from_short_feed_is_empty() {
        let data = Dataset::from_csv("Show,Season,Episode,Title,Rating,Votes,Link");
        assert!(data.is_empty());
        assert!(data.index.is_empty());
    }

    #[test]
    fn test_default_source_is_sheet_url() {
        match FeedSource::default() {
            FeedSource::Url(url) => {
                assert!(url.contains(SHEET_ID));
                assert!(url.contains("tqx=out:csv"));
            }
            other => panic!("unexpected default source: {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FEED.as_bytes()).unwrap();

        let data = load(&FeedSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(data.episodes.len(), 3);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = load(&FeedSource::File(PathBuf::from("/definitely/not/here.csv"))).unwrap_err();
        assert!(matches!(err, FeedError::Io(_)));
    }
}
