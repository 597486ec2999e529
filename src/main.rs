use bingeworthy::feed::{self, Dataset, FeedSource, DEFAULT_FEED_URL};
use bingeworthy::rating::tier::{DEFAULT_CONSIDER, DEFAULT_MUST_WATCH};
use bingeworthy::{AppState, FeedError, ShowView, SortColumn, SortState, Thresholds, Tier, UiEvent};
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bingeworthy")]
#[command(author, version, about = "Find the must-watch episodes of any TV show")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// CSV feed URL (published spreadsheet export)
    #[arg(long, global = true, env = "BINGEWORTHY_FEED_URL", default_value = DEFAULT_FEED_URL)]
    feed: String,

    /// Read the feed from a local CSV file instead of the URL
    #[arg(long, global = true, env = "BINGEWORTHY_FEED_FILE")]
    file: Option<PathBuf>,

    /// More diagnostics (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only print results
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive web dashboard
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3002", env = "BINGEWORTHY_PORT")]
        port: u16,

        /// Don't open a browser window
        #[arg(long)]
        no_open: bool,
    },

    /// List show names
    Shows {
        /// Only names containing this text (case-insensitive)
        filter: Option<String>,
    },

    /// Print the heatmap and must-watch list for one show
    Show {
        /// Show name (case-insensitive)
        name: String,

        /// Lowest rating worth considering (5.0-9.5)
        #[arg(long, default_value_t = DEFAULT_CONSIDER)]
        consider: f64,

        /// Lowest must-watch rating (5.0-9.5)
        #[arg(long, default_value_t = DEFAULT_MUST_WATCH)]
        must_watch: f64,

        /// Must-watch table column to sort by
        #[arg(long, value_enum, default_value_t = SortColumn::Season)]
        sort: SortColumn,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Write a report (.html, .json, .csv); a directory gets a timestamped HTML file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Don't prompt to open the report
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    let source = match &args.file {
        Some(path) => FeedSource::File(path.clone()),
        None => FeedSource::Url(args.feed.clone()),
    };

    match args.command {
        Command::Serve { port, no_open } => {
            let loaded = load_with_spinner(&source, args.quiet);
            if let Err(e) = bingeworthy::serve::start(port, loaded, !no_open) {
                eprintln!("Server error: {}", e);
                std::process::exit(1);
            }
        }

        Command::Shows { filter } => {
            let data = load_or_exit(&source, args.quiet);
            let names = data.index.search(filter.as_deref().unwrap_or(""));
            for name in &names {
                println!("{}", name);
            }
            if !args.quiet {
                eprintln!("\n\x1b[90m{} of {} shows\x1b[0m", names.len(), data.index.len());
            }
        }

        Command::Show { name, consider, must_watch, sort, desc, output, no_open } => {
            let data = load_or_exit(&source, args.quiet);
            let mut state = AppState::new();

            let selected = state.update(&data.index, UiEvent::ShowSelected { name: name.clone() });
            if !selected.rerender {
                eprintln!("No show named \"{}\"", name);
                let similar = data.index.search(&name);
                if !similar.is_empty() {
                    eprintln!("Did you mean:");
                    for s in similar.iter().take(5) {
                        eprintln!("  {}", s);
                    }
                }
                std::process::exit(1);
            }

            // Same rules as the address bar: out-of-range values fall back to the defaults
            state.thresholds = Thresholds::new(
                threshold_arg("consider", consider, DEFAULT_CONSIDER),
                threshold_arg("must-watch", must_watch, DEFAULT_MUST_WATCH),
            );
            state.sort = SortState::new(sort, !desc);

            let Some(view) = state.view(&data.index) else {
                std::process::exit(1);
            };

            print_view(&view, args.quiet);

            if let Some(path) = output {
                write_report(path, &view, args.quiet || no_open);
            }
        }
    }
}

fn threshold_arg(flag: &str, value: f64, default: f64) -> f64 {
    if Thresholds::in_range(value) {
        value
    } else {
        eprintln!(
            "\x1b[33m--{} {} is outside 5.0-9.5, using {:.1}\x1b[0m",
            flag, value, default
        );
        default
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "bingeworthy=info",
            _ => "bingeworthy=debug",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_with_spinner(source: &FeedSource, quiet: bool) -> Result<Dataset, FeedError> {
    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Loading ratings from {}", source));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let result = feed::load(source);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    result
}

fn load_or_exit(source: &FeedSource, quiet: bool) -> Dataset {
    match load_with_spinner(source, quiet) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("\x1b[31mFailed to load TV show data.\x1b[0m\nError: {}", e);
            std::process::exit(1);
        }
    }
}

fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::MustWatch => "\x1b[32m", // Green
        Tier::Consider => "\x1b[33m",  // Yellow
        Tier::Skip => "\x1b[31m",      // Red
    }
}

fn print_view(view: &ShowView, quiet: bool) {
    let reset = "\x1b[0m";

    if !quiet {
        eprintln!("\x1b[1m{}\x1b[0m", view.show);
        eprintln!("{}", "─".repeat(70));
        eprintln!(
            "{} episodes · average {} · {} seasons · consider ≥ {:.1} · must-watch ≥ {:.1}\n",
            view.summary.episode_count,
            view.summary
                .average_rating
                .map(|a| format!("{:.2}", a))
                .unwrap_or_else(|| "n/a".to_string()),
            view.summary.season_count,
            view.thresholds.consider(),
            view.thresholds.must_watch(),
        );
    }

    // Heatmap, aligned by season column
    print!("     ");
    for season in &view.grid.seasons {
        print!("{:>5}", format!("S{}", season));
    }
    println!();
    for row in &view.grid.rows {
        print!("{:<5}", format!("E{}", row.episode));
        for season in &view.grid.seasons {
            match row.cells.iter().find(|c| c.season == *season) {
                Some(cell) => print!("{}{:>5.1}{}", tier_color(cell.tier), cell.rating, reset),
                None => print!("{:>5}", ""),
            }
        }
        println!();
    }

    if !quiet {
        eprintln!("\n{}", "─".repeat(70));
        eprintln!("\x1b[1mEpisodes:\x1b[0m");
        eprintln!("  \x1b[32m★ Must-watch:\x1b[0m {}", view.counts.must_watch);
        eprintln!("  \x1b[33m? Consider:\x1b[0m   {}", view.counts.consider);
        eprintln!("  \x1b[31m✗ Skip:\x1b[0m       {}", view.counts.skip);
    }

    if view.must_watch.is_empty() {
        return;
    }

    println!(
        "\n{:<7} {:<8} {:<40} {:>6} {:>10}  {}",
        header(view.sort, SortColumn::Season),
        header(view.sort, SortColumn::Episode),
        header(view.sort, SortColumn::Title),
        header(view.sort, SortColumn::Rating),
        header(view.sort, SortColumn::Votes),
        "IMDB"
    );
    for ep in &view.must_watch {
        println!(
            "{:<7} {:<8} {:<40} {:>6.1} {:>10}  {}",
            ep.season,
            ep.episode,
            truncate(&ep.title, 40),
            ep.rating,
            ep.votes,
            ep.imdb_link
        );
    }
}

fn header(sort: SortState, column: SortColumn) -> String {
    let name = column.as_str().to_uppercase();
    if sort.column == column {
        format!("{}{}", name, sort.indicator())
    } else {
        name
    }
}

fn write_report(path: PathBuf, view: &ShowView, no_prompt: bool) {
    let path = if path.is_dir() {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        path.join(format!("{}_{}.html", bingeworthy::report::slug(&view.show), timestamp))
    } else {
        path
    };

    if let Err(e) = bingeworthy::report::generate(&path, view) {
        eprintln!("Failed to write report: {}", e);
        std::process::exit(1);
    }
    eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", path.display());

    if no_prompt {
        return;
    }

    eprint!("\nOpen report? [Y/n] ");
    io::stderr().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        let input = input.trim().to_lowercase();
        if input.is_empty() || input == "y" || input == "yes" {
            if let Err(e) = open::that(&path) {
                eprintln!("Failed to open report: {}", e);
            }
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
