//! stacksift: Search stack frames in captured profiling data
//!
//! Loads a profile (speedscope JSON or collapsed stacks), rebuilds the
//! per-thread flame charts, and searches the frames by fuzzy text or
//! delimited regex query.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stacksift::diagnostics::LogDiagnostics;
use stacksift::fuzzy::{FuzzyIndex, FuzzyIndexOptions};
use stacksift::profile::{load_profile, FlamegraphFrame, ProfileFormat, ProfileGroup};
use stacksift::search::frame_search;

#[derive(Parser)]
#[command(name = "stacksift")]
#[command(about = "Search stack frames in captured profiling data")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a profile's frames by fuzzy text or /pattern/flags query
    Search {
        /// Path to the profile file
        profile: PathBuf,

        /// Free-text query, or a delimited regex literal like /^foo$/i
        query: String,

        /// Thread index to search (default: the profile's active thread)
        #[arg(short, long, conflicts_with = "all_threads")]
        thread: Option<usize>,

        /// Search every thread's frames in thread order
        #[arg(long)]
        all_threads: bool,

        /// Fuzzy looseness, 0.0 (exact span) to 1.0 (any match)
        #[arg(long, default_value_t = 0.3)]
        threshold: f64,

        /// Input format: speedscope, collapsed (default: inferred from file name)
        #[arg(long)]
        input_format: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// List the threads recorded in a profile
    Threads {
        /// Path to the profile file
        profile: PathBuf,

        /// Input format: speedscope, collapsed (default: inferred from file name)
        #[arg(long)]
        input_format: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[derive(Serialize)]
struct MatchRecord<'a> {
    key: &'a str,
    name: &'a str,
    file: Option<&'a str>,
    line: Option<u32>,
    start: Option<f64>,
    end: Option<f64>,
    depth: usize,
}

#[derive(Serialize)]
struct ThreadRecord<'a> {
    index: usize,
    name: &'a str,
    frames: usize,
    total_weight: f64,
    active: bool,
}

fn load(profile: &PathBuf, input_format: Option<String>) -> Result<ProfileGroup> {
    if !profile.exists() {
        bail!("Profile not found: {}", profile.display());
    }
    let format = input_format
        .map(|s| s.parse::<ProfileFormat>())
        .transpose()?;
    load_profile(profile, format)
}

/// Frames of the requested thread, or of every thread appended in order.
fn select_frames<'a>(
    group: &'a ProfileGroup,
    thread: Option<usize>,
    all_threads: bool,
) -> Result<Vec<&'a FlamegraphFrame>> {
    if all_threads {
        return Ok(group.all_frames());
    }
    let index = thread.unwrap_or(group.active_profile_index);
    let Some(graph) = group.profiles.get(index) else {
        bail!(
            "Thread {} not found, profile has {} threads",
            index,
            group.profiles.len()
        );
    };
    Ok(graph.frames.iter().collect())
}

fn format_position(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{v:.3}"),
        None => "-".to_string(),
    }
}

/// Run the search command
fn run_search(
    profile: PathBuf,
    query: String,
    thread: Option<usize>,
    all_threads: bool,
    threshold: f64,
    input_format: Option<String>,
    format: String,
) -> Result<()> {
    let group = load(&profile, input_format)?;
    let frames = select_frames(&group, thread, all_threads)?;

    let index = FuzzyIndex::build(
        &frames,
        FuzzyIndexOptions {
            threshold,
            include_matches: true,
        },
    );
    let results = frame_search(&query, &frames, &index, &LogDiagnostics);

    match format.as_str() {
        "json" => {
            let records: Vec<MatchRecord> = results
                .iter()
                .map(|(key, frame)| MatchRecord {
                    key,
                    name: &frame.frame.name,
                    file: frame.frame.file.as_deref(),
                    line: frame.frame.line,
                    start: frame.start,
                    end: frame.end,
                    depth: frame.depth,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        _ => {
            let headers = ["START", "END", "DEPTH", "NAME", "FILE"];
            let rows: Vec<Vec<String>> = results
                .values()
                .map(|frame| {
                    vec![
                        format_position(frame.start),
                        format_position(frame.end),
                        frame.depth.to_string(),
                        frame.frame.name.clone(),
                        frame.frame.file.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&headers, &rows);
        }
    }

    eprintln!("{} matching frames", results.len());
    Ok(())
}

/// Run the threads command
fn run_threads(profile: PathBuf, input_format: Option<String>, format: String) -> Result<()> {
    let group = load(&profile, input_format)?;

    match format.as_str() {
        "json" => {
            let records: Vec<ThreadRecord> = group
                .profiles
                .iter()
                .enumerate()
                .map(|(index, graph)| ThreadRecord {
                    index,
                    name: &graph.name,
                    frames: graph.frames.len(),
                    total_weight: graph.total_weight,
                    active: index == group.active_profile_index,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        _ => {
            let headers = ["#", "NAME", "FRAMES", "WEIGHT", ""];
            let rows: Vec<Vec<String>> = group
                .profiles
                .iter()
                .enumerate()
                .map(|(index, graph)| {
                    vec![
                        index.to_string(),
                        graph.name.clone(),
                        graph.frames.len().to_string(),
                        format_position(Some(graph.total_weight)),
                        if index == group.active_profile_index {
                            "active".to_string()
                        } else {
                            String::new()
                        },
                    ]
                })
                .collect();
            print_table(&headers, &rows);
        }
    }

    Ok(())
}

const MAX_COLUMN_WIDTH: usize = 60;

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("(no results)");
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, val) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(val.chars().count());
            }
        }
    }
    for w in &mut widths {
        *w = (*w).min(MAX_COLUMN_WIDTH);
    }

    let render = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| {
                let truncated: String = if cell.chars().count() > w {
                    cell.chars().take(w.saturating_sub(3)).collect::<String>() + "..."
                } else {
                    cell.clone()
                };
                format!("{truncated:<w$}")
            })
            .collect::<Vec<String>>()
            .join("  ")
    };

    println!(
        "{}",
        render(headers.iter().map(|h| h.to_string()).collect())
    );
    println!(
        "{}",
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<String>>()
            .join("  ")
    );
    for row in rows {
        println!("{}", render(row.clone()));
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Search {
            profile,
            query,
            thread,
            all_threads,
            threshold,
            input_format,
            format,
        } => run_search(
            profile,
            query,
            thread,
            all_threads,
            threshold,
            input_format,
            format,
        ),
        Commands::Threads {
            profile,
            input_format,
            format,
        } => run_threads(profile, input_format, format),
    }
}
