//! Probing tool discovery.

use crate::error::SignalsError;
use std::io;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Check that `tool` can be launched.
///
/// Runs `<tool> -version` with all output discarded. Only a failure to spawn
/// counts; the exit status of the version probe is ignored.
pub async fn ensure_available(tool: &str) -> Result<(), SignalsError> {
    let status = Command::new(tool)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) => {
            debug!("Found {} (version probe exited with {})", tool, status);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("{} not found", tool);
            Err(SignalsError::ToolNotFound {
                tool: tool.to_string(),
            })
        }
        Err(e) => Err(SignalsError::ToolStart {
            tool: tool.to_string(),
            source: e,
        }),
    }
}
