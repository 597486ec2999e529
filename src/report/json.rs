//! JSON report: the full show view plus when it was generated

use crate::rating::ShowView;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    #[serde(flatten)]
    view: &'a ShowView,
}

pub fn write<W: Write>(writer: &mut W, view: &ShowView) -> io::Result<()> {
    let report = JsonReport {
        generated: chrono::Local::now().to_rfc3339(),
        view,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}
