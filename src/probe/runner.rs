//! Runs the probing tool for one analysis job.
//!
//! Each job is a single child process whose stdout is redirected into the
//! job's CSV file. Stderr is discarded and the exit status is only recorded.

use super::filtergraph::probe_args;
use crate::error::SignalsError;
use crate::models::{AnalysisJob, InvocationRequest, JobOutcome};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info};

/// Options for running jobs.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Probing tool executable (name on PATH or explicit path).
    pub tool: String,
    /// Whether to show a spinner while a job runs.
    pub show_progress: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            tool: "ffprobe".to_string(),
            show_progress: true,
        }
    }
}

/// Executes analysis jobs against a single request.
pub struct ProbeRunner {
    options: RunnerOptions,
}

impl ProbeRunner {
    pub fn new(options: RunnerOptions) -> Self {
        Self { options }
    }

    pub fn tool(&self) -> &str {
        &self.options.tool
    }

    /// Render the command line for a job, for dry runs and logs.
    pub fn command_line(&self, job: AnalysisJob, request: &InvocationRequest) -> String {
        let mut parts = vec![self.options.tool.clone()];
        parts.extend(
            probe_args(job, &request.video)
                .into_iter()
                .map(|arg| shell_quote(&arg.to_string_lossy())),
        );
        parts.join(" ")
    }

    /// Run one job, writing its CSV into the request's output directory.
    pub async fn run_job(
        &self,
        job: AnalysisJob,
        request: &InvocationRequest,
    ) -> Result<JobOutcome> {
        let artifact = request.artifact(job);
        let start = Instant::now();

        let file = File::create(&artifact.path).map_err(|source| SignalsError::OutputFile {
            path: artifact.path.clone(),
            source,
        })?;

        debug!("Running: {}", self.command_line(job, request));

        let spinner = self.spinner(job);

        let status = Command::new(&self.options.tool)
            .args(probe_args(job, &request.video))
            .stdin(Stdio::null())
            .stdout(Stdio::from(file))
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| SignalsError::ToolStart {
                tool: self.options.tool.clone(),
                source,
            });

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let status = status?;
        if !status.success() {
            debug!("{} job: {} exited with {}", job, self.options.tool, status);
        }

        let bytes_written = tokio::fs::metadata(&artifact.path)
            .await
            .map(|m| m.len())
            .unwrap_or(0);

        info!(
            "{} job wrote {} bytes to {}",
            job,
            bytes_written,
            artifact.path.display()
        );

        Ok(JobOutcome {
            job,
            output: artifact.path,
            bytes_written,
            exit_code: status.code(),
            duration_seconds: start.elapsed().as_secs_f64(),
        })
    }

    fn spinner(&self, job: AnalysisJob) -> Option<ProgressBar> {
        if !self.options.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("extracting {}", job.label()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Quote an argument for display in a POSIX shell.
pub(crate) fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=,:".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request(out_dir: PathBuf) -> InvocationRequest {
        InvocationRequest {
            video: PathBuf::from("/videos/clip.mp4"),
            out_dir,
        }
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("csv"), "csv");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
        assert_eq!(shell_quote("x(y)"), "'x(y)'");
    }

    #[test]
    fn test_command_line() {
        let runner = ProbeRunner::new(RunnerOptions::default());
        let line = runner.command_line(AnalysisJob::Loudness, &request(PathBuf::from("/out")));
        assert!(line.starts_with("ffprobe -f lavfi -i amovie=/videos/clip.mp4,ebur128=metadata=1"));
        assert!(line.ends_with("-of csv"));
    }

    #[cfg(unix)]
    fn fake_tool(dir: &std::path::Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-ffprobe");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_job_redirects_stdout_only() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let tool = fake_tool(
            temp_dir.path(),
            "echo \"frame,0.000000,$4\"\necho noise >&2",
        );
        let runner = ProbeRunner::new(RunnerOptions {
            tool,
            show_progress: false,
        });

        let req = request(temp_dir.path().to_path_buf());
        let outcome = runner.run_job(AnalysisJob::Luminance, &req).await.unwrap();

        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.output, temp_dir.path().join("clip-luminance.csv"));

        let csv = std::fs::read_to_string(&outcome.output).unwrap();
        assert_eq!(csv, "frame,0.000000,movie=/videos/clip.mp4,signalstats\n");
        assert_eq!(outcome.bytes_written, csv.len() as u64);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_tool_still_yields_outcome() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let tool = fake_tool(temp_dir.path(), "echo partial\nexit 3");
        let runner = ProbeRunner::new(RunnerOptions {
            tool,
            show_progress: false,
        });

        let req = request(temp_dir.path().to_path_buf());
        let outcome = runner.run_job(AnalysisJob::Amplitude, &req).await.unwrap();

        assert_eq!(outcome.exit_code, Some(3));
        let csv = std::fs::read_to_string(&outcome.output).unwrap();
        assert_eq!(csv, "partial\n");
    }

    #[tokio::test]
    async fn test_missing_output_dir_is_an_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let runner = ProbeRunner::new(RunnerOptions {
            tool: "ffprobe".to_string(),
            show_progress: false,
        });

        let req = request(temp_dir.path().join("missing"));
        let err = runner
            .run_job(AnalysisJob::Luminance, &req)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SignalsError>(),
            Some(SignalsError::OutputFile { .. })
        ));
    }
}
