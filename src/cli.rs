//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::AnalysisJob;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// av-signals - per-frame luminance, loudness and amplitude from a video
///
/// Runs ffprobe three times over the video and writes one CSV per signal:
/// <name>-luminance.csv, <name>-loudness(EBUR128,LUFS).csv and
/// <name>-amplitude.csv.
///
/// Examples:
///   av-signals stimulus.mp4
///   av-signals stimulus.mp4 ./features
///   av-signals stimulus.mp4 --jobs loudness --summary json
///   av-signals stimulus.mp4 --dry-run
///   av-signals --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Video file to analyze
    ///
    /// Checked after the probing tool, so a missing tool is reported first.
    #[arg(value_name = "VIDEO_FILE")]
    pub video: Option<PathBuf>,

    /// Directory for the CSV files
    ///
    /// Created if missing. Defaults to the directory containing the video.
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// ffprobe executable to use
    #[arg(long, value_name = "PATH", env = "AV_SIGNALS_FFPROBE")]
    pub ffprobe: Option<String>,

    /// Analyses to run (comma-separated)
    ///
    /// Example: --jobs luminance,amplitude
    #[arg(long, value_name = "JOBS", value_delimiter = ',')]
    pub jobs: Option<Vec<AnalysisJob>>,

    /// Summary printed after the run (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub summary: Option<SummaryFormat>,

    /// Print the ffprobe commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .av-signals.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .av-signals.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Format of the end-of-run summary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    /// Human-readable list of output files (default)
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Usage line printed when the video argument is missing.
    pub fn usage() -> String {
        Self::command().render_usage().to_string()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref jobs) = self.jobs {
            if jobs.is_empty() {
                return Err("--jobs needs at least one analysis".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}
