//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.av-signals.toml` files.

use crate::cli::SummaryFormat;
use crate::models::AnalysisJob;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".av-signals.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Probing tool settings.
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Which analyses to run.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Summary format printed at the end of a run.
    #[serde(default)]
    pub summary: SummaryFormat,
}

/// Probing tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Executable name or path.
    #[serde(default = "default_executable")]
    pub executable: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
        }
    }
}

fn default_executable() -> String {
    "ffprobe".to_string()
}

/// Analysis selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_jobs")]
    pub jobs: Vec<AnalysisJob>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
        }
    }
}

fn default_jobs() -> Vec<AnalysisJob> {
    AnalysisJob::ALL.to_vec()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments (and their env fallbacks) take precedence over config
    /// file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref ffprobe) = args.ffprobe {
            self.probe.executable = ffprobe.clone();
        }

        if let Some(ref jobs) = args.jobs {
            self.analysis.jobs = jobs.clone();
        }
        self.analysis.jobs = AnalysisJob::normalize(&self.analysis.jobs);

        if let Some(summary) = args.summary {
            self.general.summary = summary;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.probe.executable, "ffprobe");
        assert_eq!(config.analysis.jobs, AnalysisJob::ALL.to_vec());
        assert_eq!(config.general.summary, SummaryFormat::Text);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
summary = "json"

[probe]
executable = "/opt/ffmpeg/bin/ffprobe"

[analysis]
jobs = ["amplitude", "luminance"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.summary, SummaryFormat::Json);
        assert_eq!(config.probe.executable, "/opt/ffmpeg/bin/ffprobe");
        assert_eq!(
            config.analysis.jobs,
            vec![AnalysisJob::Amplitude, AnalysisJob::Luminance]
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("[general]\nsummary = \"text\"\n").unwrap();
        assert_eq!(config.probe.executable, "ffprobe");
        assert_eq!(config.analysis.jobs.len(), 3);
    }

    #[test]
    fn test_unknown_job_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[analysis]\njobs = [\"color\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_with_args() {
        use clap::Parser;

        let mut config = Config::default();
        config.probe.executable = "from-config".to_string();

        let args = crate::cli::Args::try_parse_from([
            "av-signals",
            "clip.mp4",
            "--ffprobe",
            "from-cli",
            "--jobs",
            "amplitude,loudness,amplitude",
            "--summary",
            "json",
        ])
        .unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.probe.executable, "from-cli");
        assert_eq!(
            config.analysis.jobs,
            vec![AnalysisJob::Loudness, AnalysisJob::Amplitude]
        );
        assert_eq!(config.general.summary, SummaryFormat::Json);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[probe]\nexecutable = \"ffprobe7\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.probe.executable, "ffprobe7");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[probe]"));
        assert!(toml_str.contains("[analysis]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.analysis.jobs, AnalysisJob::ALL.to_vec());
    }
}
