//! Episode records built from parsed CSV rows
//!
//! The header row decides where each logical column lives, so the sheet can
//! reorder or re-case its columns freely. Numeric cells are read leniently:
//! anything unparseable becomes 0 rather than dropping the row, and rows with
//! a zero episode number or zero rating simply fall out of the views later.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header names tried, in order, for the IMDB link column.
const LINK_COLUMNS: [&str; 3] = ["imdb link", "imdblink", "link"];

/// One row of the ratings sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub show: String,
    pub season: u32,
    /// 0 marks specials and other non-canonical entries
    pub episode: u32,
    pub title: String,
    pub rating: f64,
    pub votes: u64,
    pub imdb_link: String,
}

impl EpisodeRecord {
    /// Episodes that take part in the grid, the counts and the must-watch table.
    pub fn is_viewable(&self) -> bool {
        self.episode > 0 && self.rating > 0.0
    }
}

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    pub show: Option<usize>,
    pub season: Option<usize>,
    pub episode: Option<usize>,
    pub title: Option<usize>,
    pub rating: Option<usize>,
    pub votes: Option<usize>,
    pub link: Option<usize>,
}

impl ColumnLayout {
    /// Resolve logical columns case-insensitively from the header cells.
    pub fn from_header(header: &[String]) -> Self {
        // Last occurrence wins for repeated header names
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (idx, name) in header.iter().enumerate() {
            positions.insert(name.to_lowercase(), idx);
        }

        let layout = Self {
            show: positions.get("show").copied(),
            season: positions.get("season").copied(),
            episode: positions.get("episode").copied(),
            title: positions.get("title").copied(),
            rating: positions.get("rating").copied(),
            votes: positions.get("votes").copied(),
            link: LINK_COLUMNS.iter().find_map(|name| positions.get(*name).copied()),
        };

        for missing in layout.missing() {
            tracing::warn!(column = missing, "feed header is missing a column");
        }

        layout
    }

    /// Names of logical columns the header did not provide.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("show", self.show),
            ("season", self.season),
            ("episode", self.episode),
            ("title", self.title),
            ("rating", self.rating),
            ("votes", self.votes),
            ("imdb link", self.link),
        ]
        .into_iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Build admitted episode records from parsed rows (header first).
pub fn build(rows: &[Vec<String>]) -> Vec<EpisodeRecord> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    let layout = ColumnLayout::from_header(header);
    let mut records = Vec::with_capacity(data.len());
    let mut short_rows = 0usize;

    for (line, fields) in data.iter().enumerate() {
        if fields.len() < header.len() {
            short_rows += 1;
            tracing::debug!(
                line = line + 2,
                fields = fields.len(),
                expected = header.len(),
                "skipping row with insufficient fields"
            );
            continue;
        }

        if let Some(record) = build_record(&layout, fields) {
            records.push(record);
        } else {
            tracing::trace!(line = line + 2, "row rejected by admission check");
        }
    }

    tracing::info!(
        rows = data.len(),
        admitted = records.len(),
        short = short_rows,
        "built episode records"
    );

    records
}

/// Coerce one row; `None` when the row fails admission.
fn build_record(layout: &ColumnLayout, fields: &[String]) -> Option<EpisodeRecord> {
    let cell = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).map(String::as_str).unwrap_or("");

    let season = parse_int(cell(layout.season));
    if season < 0 {
        return None;
    }

    let record = EpisodeRecord {
        show: cell(layout.show).to_string(),
        season: clamp_u32(season),
        episode: clamp_u32(parse_int(cell(layout.episode))),
        title: cell(layout.title).to_string(),
        rating: non_negative(parse_float(cell(layout.rating))),
        votes: parse_int(&cell(layout.votes).replace(',', "")).max(0) as u64,
        imdb_link: cell(layout.link).to_string(),
    };

    if record.show.is_empty() || record.title.is_empty() {
        return None;
    }

    Some(record)
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Read a leading integer: optional sign then digits. Anything else is 0.
pub fn parse_int(text: &str) -> i64 {
    let text = text.trim();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    rest[..digits]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

/// Read the longest leading decimal number, exponent included. Anything else is 0.
pub fn parse_float(text: &str) -> f64 {
    let text = text.trim();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if frac_digits > 0 || int_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    // Optional exponent, only taken when at least one digit follows
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-') | Some(b'+')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end..].iter().take_while(|b| b.is_ascii_digit()).count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().unwrap_or(0.0)
}
