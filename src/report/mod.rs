//! Report generation for a rendered show
//!
//! A [`ShowView`] can be saved outside the dashboard in three formats:
//!
//! - **HTML**: self-contained heatmap page, tier counts and must-watch table
//! - **JSON**: the full view, for programmatic consumption
//! - **CSV**: the must-watch table, for spreadsheets
//!
//! # Usage
//!
//! ```ignore
//! use bingeworthy::report;
//!
//! // Automatically picks format based on extension
//! report::generate("foo.html", &view)?;  // HTML
//! report::generate("foo.json", &view)?;  // JSON
//! report::generate("foo.csv", &view)?;   // CSV
//! ```

pub mod csv;
pub mod html;
pub mod json;

use crate::rating::ShowView;
use std::io;
use std::path::Path;

/// Generate a report in the appropriate format based on file extension
pub fn generate<P: AsRef<Path>>(path: P, view: &ShowView) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "html" | "htm" => html::write(&mut file, view),
        "json" => json::write(&mut file, view),
        _ => csv::write(&mut file, view),
    }
}

/// File-name friendly form of a show name: `"Fargo (2014)"` → `"fargo-2014"`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("show");
    }
    out
}
