//! Line-oriented delimited text parsing
//!
//! The feed is a spreadsheet CSV export. Fields are comma separated and may be
//! wrapped in double quotes so that a title like `"Drama, Part 2"` survives as
//! one field. The scanner is deliberately simple:
//!
//! - one record per `\n`-terminated line (no embedded newlines in quotes)
//! - every `"` toggles the "inside quotes" flag and is not copied
//! - a `,` only separates fields while outside quotes
//! - fields are trimmed, and a stray leading/trailing quote is stripped
//!
//! Blank lines are skipped entirely, so they never count as data rows.

/// Split one line into trimmed fields.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields.into_iter().map(|f| strip_quotes(&f)).collect()
}

fn strip_quotes(field: &str) -> String {
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.trim().to_string()
}

/// Parse a whole document into rows, header first.
///
/// Returns an empty vector when there is no header plus at least one data line.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        tracing::warn!(lines = lines.len(), "CSV has insufficient lines");
        return Vec::new();
    }

    lines.into_iter().map(parse_line).collect()
}
