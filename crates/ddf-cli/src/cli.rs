//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ddf-etl",
    version,
    about = "Normalize UN SDG indicator tables into a DDF dataset",
    long_about = "Download per-series indicator tables from the UN SDG API and\n\
                  re-normalize them into DDF datapoints, entities, and concepts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download every series' source CSV from the SDG API.
    Fetch(FetchArgs),

    /// Run the normalization pipeline over downloaded source tables.
    Build(BuildArgs),
}

#[derive(Parser)]
pub struct FetchArgs {
    /// Directory the source CSVs are written to.
    #[arg(long = "source-dir", value_name = "DIR", default_value = "source")]
    pub source_dir: PathBuf,

    /// API base URL (defaults to $SDG_API_BASE, then the UN Stats host).
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Concurrent download workers (capped at 8).
    #[arg(long = "jobs", value_name = "N", default_value_t = 2)]
    pub jobs: usize,

    /// Keep already-downloaded CSVs instead of cleaning the directory first.
    #[arg(long = "keep-existing")]
    pub keep_existing: bool,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Directory containing `<SeriesCode>.csv` source tables.
    #[arg(long = "source-dir", value_name = "DIR", default_value = "source")]
    pub source_dir: PathBuf,

    /// Directory the dataset files are written to.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// API base URL (defaults to $SDG_API_BASE, then the UN Stats host).
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
