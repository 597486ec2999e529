//! HTML report: a static snapshot of the dashboard for one show

use crate::rating::{GridRow, ShowView, SortColumn};
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, view: &ShowView) -> io::Result<()> {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M");
    let average = view
        .summary
        .average_rating
        .map(|a| format!("{:.2}", a))
        .unwrap_or_else(|| "–".to_string());

    // Write the full HTML document
    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} · Bingeworthy</title>
    <style>
        :root {{
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --skip: #f44336;
            --consider: #ffc107;
            --must: #4caf50;
            --accent: #58a6ff;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }}
        .container {{ max-width: 1400px; margin: 0 auto; padding: 2rem; }}
        .header {{ margin-bottom: 1.5rem; padding-bottom: 1rem; border-bottom: 1px solid var(--border); }}
        .logo {{ font-size: 2rem; font-weight: 800; }}
        .subtitle {{ color: var(--dim); }}

        /* Counts */
        .stats {{ display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; margin-bottom: 1.5rem; }}
        .stat {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.25rem;
            text-align: center;
        }}
        .stat-value {{ font-size: 2.5rem; font-weight: 700; line-height: 1; }}
        .stat-label {{ color: var(--dim); font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.05em; margin-top: 0.5rem; }}
        .stat.skip .stat-value {{ color: var(--skip); }}
        .stat.consider .stat-value {{ color: var(--consider); }}
        .stat.must .stat-value {{ color: var(--must); }}

        /* Heatmap */
        .card {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.25rem;
            margin-bottom: 1.5rem;
            overflow-x: auto;
        }}
        .season-header, .heatmap-row {{ display: flex; gap: 4px; margin-bottom: 4px; }}
        .season-header {{ padding-left: 52px; }}
        .season-label, .row-label {{ width: 48px; min-width: 48px; text-align: center; color: var(--dim); font-size: 0.75rem; }}
        .episode-cell {{
            width: 48px; min-width: 48px; height: 32px;
            display: flex; align-items: center; justify-content: center;
            border-radius: 4px; font-size: 0.8rem; font-weight: 600;
            color: #0d1117; text-decoration: none;
        }}
        .episode-cell.excellent {{ background: var(--must); }}
        .episode-cell.good {{ background: var(--consider); }}
        .episode-cell.average {{ background: var(--skip); }}

        /* Table */
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ padding: 0.6rem 0.8rem; text-align: left; border-bottom: 1px solid var(--border); }}
        th {{ font-size: 0.75rem; text-transform: uppercase; letter-spacing: 0.05em; color: var(--dim); }}
        tr.season-even td {{ background: rgba(255,255,255,0.02); }}
        a {{ color: var(--accent); }}

        .footer {{
            margin-top: 2rem;
            padding-top: 1rem;
            border-top: 1px solid var(--border);
            color: var(--dim);
            font-size: 0.875rem;
            text-align: center;
        }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <div class="logo">{title}</div>
            <div class="subtitle">{episodes} episodes · average {average} · {seasons} seasons · consider ≥ {consider:.1} · must-watch ≥ {must_watch:.1}</div>
        </div>

        <div class="stats">
            <div class="stat skip">
                <div class="stat-value">{skip}</div>
                <div class="stat-label">Skip</div>
            </div>
            <div class="stat consider">
                <div class="stat-value">{consider_count}</div>
                <div class="stat-label">Consider</div>
            </div>
            <div class="stat must">
                <div class="stat-value">{must_count}</div>
                <div class="stat-label">Must-watch</div>
            </div>
        </div>

        <div class="card" id="heatmap">
{heatmap}
        </div>

{table}
        <div class="footer">Generated by Bingeworthy · {generated}</div>
    </div>
</body>
</html>
"#,
        title = html_escape(&view.show),
        episodes = view.summary.episode_count,
        average = average,
        seasons = view.summary.season_count,
        consider = view.thresholds.consider(),
        must_watch = view.thresholds.must_watch(),
        skip = view.counts.skip,
        consider_count = view.counts.consider,
        must_count = view.counts.must_watch,
        heatmap = heatmap_html(view),
        table = table_html(view),
        generated = generated,
    )?;

    Ok(())
}

fn heatmap_html(view: &ShowView) -> String {
    let mut out = String::from("            <div class=\"season-header\">");
    for season in &view.grid.seasons {
        out.push_str(&format!("<div class=\"season-label\">S{}</div>", season));
    }
    out.push_str("</div>\n");

    for row in &view.grid.rows {
        out.push_str(&row_html(row));
    }
    out
}

fn row_html(row: &GridRow) -> String {
    let cells: String = row
        .cells
        .iter()
        .map(|cell| {
            format!(
                r#"<a class="episode-cell {class}" href="{link}" target="_blank" title="{title} (S{season}E{episode}) · {votes} votes">{rating:.1}</a>"#,
                class = cell.tier.css_class(),
                link = html_escape(&cell.imdb_link),
                title = html_escape(&cell.title),
                season = cell.season,
                episode = cell.episode,
                votes = cell.votes,
                rating = cell.rating,
            )
        })
        .collect();

    format!(
        "            <div class=\"heatmap-row\"><div class=\"row-label\">E{}</div>{}</div>\n",
        row.episode, cells
    )
}

fn table_html(view: &ShowView) -> String {
    if view.must_watch.is_empty() {
        return String::new();
    }

    let headers: String = SortColumn::ALL
        .iter()
        .map(|col| {
            let arrow = if *col == view.sort.column { view.sort.indicator() } else { "" };
            format!("<th>{} {}</th>", col, arrow)
        })
        .collect();

    let rows: String = view
        .must_watch
        .iter()
        .map(|ep| {
            format!(
                "                <tr{even}><td>{}</td><td>{}</td><td>{}</td><td>{:.1}</td><td>{} votes</td><td><a href=\"{}\" target=\"_blank\">IMDb</a></td></tr>\n",
                ep.season,
                ep.episode,
                html_escape(&ep.title),
                ep.rating,
                ep.votes,
                html_escape(&ep.imdb_link),
                even = if ep.season % 2 == 0 { " class=\"season-even\"" } else { "" },
            )
        })
        .collect();

    format!(
        r#"        <div class="card">
            <h3>Must-watch episodes ({count})</h3>
            <table>
                <thead><tr>{headers}<th></th></tr></thead>
                <tbody>
{rows}                </tbody>
            </table>
        </div>
"#,
        count = view.must_watch.len(),
        headers = headers,
        rows = rows,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_view;

    fn render() -> String {
        let mut out = Vec::new();
        write(&mut out, &sample_view()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_html_has_heatmap_cells() {
        let html = render();
        assert!(html.contains("id=\"heatmap\""));
        assert!(html.contains("<div class=\"season-label\">S1</div><div class=\"season-label\">S2</div>"));
        assert_eq!(html.matches("class=\"episode-cell ").count(), 3);
        assert_eq!(html.matches("episode-cell excellent").count(), 2);
        assert_eq!(html.matches("episode-cell average").count(), 1);
    }

    #[test]
    fn test_html_escapes_titles() {
        let html = render();
        assert!(html.contains("&lt;Return&gt;"));
        assert!(html.contains("The &quot;Second&quot; One"));
        assert!(!html.contains("<Return>"));
    }

    #[test]
    fn test_html_table_marks_sort_column() {
        let html = render();
        assert!(html.contains("Must-watch episodes (2)"));
        assert!(html.contains("<th>season ▲</th>"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a & b <c>"), "a &amp; b &lt;c&gt;");
    }
}
