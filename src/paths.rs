//! Input and output path resolution.

use crate::error::SignalsError;
use crate::models::InvocationRequest;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Make `path` absolute against the current directory without touching the
/// filesystem, so a missing video still resolves.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

/// Resolve the video path and output directory for a run.
///
/// Without `out_dir` the video's own directory is used. Symlinks are not
/// followed: names and directories come from the path as given. Nothing is
/// created.
pub fn resolve_request(video: &Path, out_dir: Option<&Path>) -> Result<InvocationRequest> {
    if !video.exists() {
        warn!(
            "Video file does not exist: {} (outputs will be empty)",
            video.display()
        );
    }
    let video = absolute(video)?;

    let out_dir = match out_dir {
        Some(dir) => absolute(dir)?,
        None => video
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/")),
    };

    debug!("Video: {}", video.display());
    debug!("Output directory: {}", out_dir.display());

    Ok(InvocationRequest { video, out_dir })
}

/// Create the output directory (and parents) if it does not exist yet.
pub fn prepare_output_dir(out_dir: &Path) -> Result<(), SignalsError> {
    std::fs::create_dir_all(out_dir).map_err(|source| SignalsError::OutputDir {
        path: out_dir.to_path_buf(),
        source,
    })
}
