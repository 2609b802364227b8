//! ffprobe integration.
//!
//! This module locates the probing tool, builds the lavfi filter graphs for
//! each analysis job and runs the jobs one after another.

pub mod filtergraph;
pub mod locator;
pub mod runner;

pub use locator::ensure_available;
pub use runner::{ProbeRunner, RunnerOptions};
