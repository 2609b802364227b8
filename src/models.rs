//! Data models for a signal extraction run.
//!
//! This module contains the request, job and artifact types shared by the
//! probe runner and the summary output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the fixed per-frame analyses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisJob {
    /// Video luma statistics (min/mean/max/frame difference)
    Luminance,
    /// EBU R128 momentary loudness in LUFS
    Loudness,
    /// Audio RMS and peak level in dBFS
    Amplitude,
}

impl fmt::Display for AnalysisJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AnalysisJob {
    /// All jobs in the order they run.
    pub const ALL: [AnalysisJob; 3] = [
        AnalysisJob::Luminance,
        AnalysisJob::Loudness,
        AnalysisJob::Amplitude,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnalysisJob::Luminance => "luminance",
            AnalysisJob::Loudness => "loudness",
            AnalysisJob::Amplitude => "amplitude",
        }
    }

    /// Suffix appended to the base name, without the `.csv` extension.
    pub fn file_tag(&self) -> &'static str {
        match self {
            AnalysisJob::Luminance => "luminance",
            AnalysisJob::Loudness => "loudness(EBUR128,LUFS)",
            AnalysisJob::Amplitude => "amplitude",
        }
    }

    /// Output file name for a given base name.
    ///
    /// The base name is kept as raw OS bytes so non-UTF-8 names survive.
    pub fn file_name(&self, base_name: impl AsRef<OsStr>) -> OsString {
        let mut name = base_name.as_ref().to_os_string();
        name.push("-");
        name.push(self.file_tag());
        name.push(".csv");
        name
    }

    /// Human-readable progress label.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisJob::Luminance => "video luminance",
            AnalysisJob::Loudness => "perceptual loudness (EBU R128)",
            AnalysisJob::Amplitude => "audio amplitude",
        }
    }

    /// Sort into canonical order and drop duplicates.
    pub fn normalize(jobs: &[AnalysisJob]) -> Vec<AnalysisJob> {
        let mut jobs = jobs.to_vec();
        jobs.sort();
        jobs.dedup();
        jobs
    }
}

/// Strip the final extension from the video's file name.
pub fn base_name(video: &Path) -> OsString {
    video
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("video"))
}

/// A resolved request: absolute video path plus output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub video: PathBuf,
    pub out_dir: PathBuf,
}

impl InvocationRequest {
    pub fn base_name(&self) -> OsString {
        base_name(&self.video)
    }

    /// Where a job writes its CSV.
    pub fn artifact(&self, job: AnalysisJob) -> OutputArtifact {
        OutputArtifact {
            job,
            path: self.out_dir.join(job.file_name(&self.base_name())),
        }
    }

    pub fn artifacts(&self, jobs: &[AnalysisJob]) -> Vec<OutputArtifact> {
        jobs.iter().map(|job| self.artifact(*job)).collect()
    }
}

/// A CSV file produced by one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    pub job: AnalysisJob,
    pub path: PathBuf,
}

/// What happened when a job ran.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub job: AnalysisJob,
    pub output: PathBuf,
    /// Size of the CSV after the tool exited.
    pub bytes_written: u64,
    /// Tool exit code; `None` if it was killed by a signal.
    pub exit_code: Option<i32>,
    pub duration_seconds: f64,
}

/// Summary of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub video: PathBuf,
    pub out_dir: PathBuf,
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub jobs: Vec<JobOutcome>,
    pub duration_seconds: f64,
}
