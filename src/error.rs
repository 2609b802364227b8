//! Error types surfaced to the user.
//!
//! Most plumbing uses `anyhow`; these are the cases `main` needs to
//! recognize so it can print the right hint.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors with a dedicated user-facing message.
#[derive(Debug, Error)]
pub enum SignalsError {
    /// The probing tool could not be found on PATH.
    #[error("{tool} not found on PATH")]
    ToolNotFound { tool: String },

    /// The required video argument was not given.
    #[error("missing required argument <VIDEO_FILE>")]
    Usage,

    /// The tool exists but could not be spawned.
    #[error("failed to start {tool}: {source}")]
    ToolStart {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A CSV file could not be created.
    #[error("failed to create {}: {source}", .path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SignalsError {
    /// Install hint printed alongside [`SignalsError::ToolNotFound`].
    pub fn install_hint(&self) -> Option<String> {
        match self {
            SignalsError::ToolNotFound { tool } => Some(format!(
                "{} is part of FFmpeg. Install it first, e.g.\n   \
                 macOS:  brew install ffmpeg\n   \
                 Debian: sudo apt install ffmpeg\n   \
                 or point --ffprobe / AV_SIGNALS_FFPROBE at an existing binary.",
                tool
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_message() {
        let err = SignalsError::ToolNotFound {
            tool: "ffprobe".to_string(),
        };
        assert_eq!(err.to_string(), "ffprobe not found on PATH");
        let hint = err.install_hint().unwrap();
        assert!(hint.contains("brew install ffmpeg"));
        assert!(hint.contains("apt install ffmpeg"));
    }

    #[test]
    fn test_hint_only_for_missing_tool() {
        assert!(SignalsError::Usage.install_hint().is_none());
    }

    #[test]
    fn test_output_dir_message_includes_path() {
        let err = SignalsError::OutputDir {
            path: PathBuf::from("/nope/out"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope/out"));
    }
}
