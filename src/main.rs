use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use backblast_parser::analytics::{self, NameMap};
use backblast_parser::parser::{self, dates};
use backblast_parser::settings::Settings;
use backblast_parser::timestamps::to_unix_timestamp;
use backblast_parser::{BeatdownRecord, Error, SourceBeatdown};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "backblast", about = "Parse F3 backblasts into structured records")]
struct Cli {
    /// Pretty-print JSON (overrides BACKBLAST_PRETTY)
    #[arg(long, global = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one backblast and print the record as JSON
    Parse {
        /// Backblast text file (default: stdin)
        path: Option<PathBuf>,
        /// AO channel id to use when the text names none
        #[arg(long)]
        ao: Option<String>,
        /// Print a display-name summary of the beatdown instead of the full record
        #[arg(long)]
        details: bool,
        /// JSON object mapping user id -> display name (with --details)
        #[arg(long)]
        users: Option<PathBuf>,
        /// JSON object mapping AO channel id -> AO name (with --details)
        #[arg(long)]
        aos: Option<PathBuf>,
    },
    /// Parse JSON-lines beatdown rows ({backblast, ao_id, timestamp, ts_edited})
    Batch {
        input: PathBuf,
    },
    /// Print attachment URLs from a message's JSON metadata
    Files {
        /// JSON file (default: stdin)
        path: Option<PathBuf>,
    },
    /// Weekly (or monthly) summary over JSON-lines beatdown rows
    Summary {
        input: PathBuf,
        /// Any date in the target period, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        week: Option<String>,
        /// Cover the whole calendar month instead of Monday..Sunday
        #[arg(long)]
        month: bool,
        /// JSON object mapping user id -> display name
        #[arg(long)]
        users: Option<PathBuf>,
        /// JSON object mapping AO channel id -> AO name
        #[arg(long)]
        aos: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load().context("loading settings")?;
    settings.pretty |= cli.pretty;

    match cli.command {
        Commands::Parse {
            path,
            ao,
            details,
            users,
            aos,
        } => {
            let text = read_input(path.as_deref())?;
            let mut parsed = parser::parse_backblast(&text);
            parsed.backfill_ao_id(ao.as_deref().or(settings.default_ao_id.as_deref()));
            if details {
                let user_map = load_name_map(users.as_deref())?;
                let ao_map = load_name_map(aos.as_deref())?;
                let details = analytics::beatdown_details(&parsed, &user_map, &ao_map);
                print_json(&details, settings.pretty)?;
            } else {
                print_json(&parsed, settings.pretty)?;
            }
        }
        Commands::Batch { input } => {
            let rows = load_rows(&input)?;
            let records = build_records(&rows, &settings);
            for record in &records {
                // one record per line regardless of --pretty
                println!("{}", serde_json::to_string(record)?);
            }
            info!(
                rows = rows.len(),
                records = records.len(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "batch done"
            );
        }
        Commands::Files { path } => {
            let json = read_input(path.as_deref())?;
            match parser::extract_files_from_json(&json) {
                Some(urls) => urls.iter().for_each(|u| println!("{}", u)),
                None => eprintln!("No files found."),
            }
        }
        Commands::Summary {
            input,
            week,
            month,
            users,
            aos,
        } => {
            let at = match week.as_deref() {
                Some(raw) => dates::parse_iso(raw)
                    .ok_or_else(|| Error::InvalidDate(raw.to_string()))?
                    .and_hms_opt(12, 0, 0)
                    .map(|dt| dt.and_utc())
                    .ok_or_else(|| Error::InvalidDate(raw.to_string()))?,
                None => chrono::Utc::now(),
            };
            let (start, end) = if month {
                analytics::month_range(at)
            } else {
                analytics::week_range(at)
            };
            info!(
                period_start = %start.format(dates::ISO_FORMAT),
                period_end = %end.format(dates::ISO_FORMAT),
                oldest_ts = to_unix_timestamp(start),
                latest_ts = to_unix_timestamp(end),
                "generating summary"
            );

            let rows = load_rows(&input)?;
            let beatdowns: Vec<_> = build_records(&rows, &settings)
                .into_iter()
                .filter(|r| r.timestamp >= start && r.timestamp <= end)
                .map(|r| r.backblast)
                .collect();
            if beatdowns.is_empty() {
                println!(
                    "No beatdowns found for {} to {}",
                    start.format(dates::ISO_FORMAT),
                    end.format(dates::ISO_FORMAT)
                );
                return Ok(());
            }

            let user_map = load_name_map(users.as_deref())?;
            let ao_map = load_name_map(aos.as_deref())?;
            let summary = analytics::weekly_summary(&beatdowns, &user_map, &ao_map);
            print_json(&summary, settings.pretty)?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// JSON-lines rows; malformed lines are logged and skipped.
fn load_rows(path: &Path) -> anyhow::Result<Vec<SourceBeatdown>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let rows = raw
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| match SourceBeatdown::from_json(line) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!(line = i + 1, %err, "skipping malformed row");
                None
            }
        })
        .collect();
    Ok(rows)
}

fn load_name_map(path: Option<&Path>) -> anyhow::Result<NameMap> {
    let Some(path) = path else {
        return Ok(NameMap::new());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Parse rows in parallel, `chunk_size` at a time. Rows without a usable
/// timestamp are dropped with a warning.
fn build_records(rows: &[SourceBeatdown], settings: &Settings) -> Vec<BeatdownRecord> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(rows.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut records = Vec::with_capacity(rows.len());
    for chunk in rows.chunks(settings.chunk_size.max(1)) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|row| {
                let mut row = row.clone();
                if row.ao_id.is_none() {
                    row.ao_id = settings.default_ao_id.clone();
                }
                BeatdownRecord::from_source(&row)
            })
            .collect();

        for result in results {
            match result {
                Ok(record) => records.push(record),
                Err(err) => warn!(%err, "skipping row"),
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    records
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
