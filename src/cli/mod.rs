//! Command-line parsing for the coordinate fixer.
//!
//! Argument parsing stays separate from the engine; handlers live in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::CoordinateKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cfx", version, about = "Classify, repair and project scraped coordinates (UTM 13N/14N, lat/lng)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a single coordinate pair and print the result.
    Convert(ConvertArgs),
    /// Process every row of a CSV file.
    Batch(BatchArgs),
    /// Write a synthetic CSV of damaged coordinates.
    Sample(SampleArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ConvertArgs {
    /// First axis: easting or longitude. Free text is accepted ("781,265 m").
    #[arg(allow_hyphen_values = true)]
    pub x: String,

    /// Second axis: northing or latitude.
    #[arg(allow_hyphen_values = true)]
    pub y: String,

    /// Skip classification and treat the pair as this kind.
    #[arg(long, value_enum)]
    pub kind: Option<CoordinateKind>,

    /// Print the full result as JSON instead of a report.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Input CSV with a header row.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Write per-record results to CSV.
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Write the summary and full per-record results to JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,

    /// Column holding the first axis (easting/longitude).
    #[arg(long, default_value = "x")]
    pub x_col: String,

    /// Column holding the second axis (northing/latitude).
    #[arg(long, default_value = "y")]
    pub y_col: String,

    /// Column holding the record id (defaults to the CSV line number).
    #[arg(long)]
    pub id_col: Option<String>,

    /// Worker threads (overrides COORDFIX_THREADS).
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of records to generate.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV (stdout when omitted).
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}
