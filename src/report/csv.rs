//! CSV report of the must-watch table, in its current sort order

use crate::rating::ShowView;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, view: &ShowView) -> io::Result<()> {
    writeln!(writer, "Season,Episode,Title,Rating,Votes,IMDB Link")?;
    for ep in &view.must_watch {
        writeln!(
            writer,
            "{},{},{},{:.1},{},{}",
            ep.season,
            ep.episode,
            quote(&ep.title),
            ep.rating,
            ep.votes,
            quote(&ep.imdb_link)
        )?;
    }
    Ok(())
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
