//! Filter-graph construction for each analysis job.
//!
//! The video path is spliced into a lavfi graph as the `filename` option of
//! the `movie`/`amovie` source, so it has to survive two rounds of
//! unescaping: once as an option value, once as part of the graph text.

use crate::models::AnalysisJob;
use std::ffi::OsString;
use std::path::Path;

/// Bytes special inside a filter option value.
const OPTION_SPECIAL: &[u8] = b"\\':";

/// Bytes special inside a filter-graph description.
const GRAPH_SPECIAL: &[u8] = b"\\'[],;";

// All specials are ASCII, so escaping byte-wise never splits a multi-byte
// sequence and leaves non-UTF-8 names intact.
fn escape_with(value: &[u8], special: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for &b in value {
        if special.contains(&b) {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

fn escape_bytes(raw: &[u8]) -> Vec<u8> {
    escape_with(&escape_with(raw, OPTION_SPECIAL), GRAPH_SPECIAL)
}

/// Escape a path so it reaches a source filter unchanged.
#[cfg(unix)]
pub fn escape_path(path: &Path) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};
    OsString::from_vec(escape_bytes(path.as_os_str().as_bytes()))
}

/// Escape a path so it reaches a source filter unchanged.
#[cfg(not(unix))]
pub fn escape_path(path: &Path) -> OsString {
    let raw = path.to_string_lossy();
    OsString::from(String::from_utf8_lossy(&escape_bytes(raw.as_bytes())).into_owned())
}

/// Filter-graph string for a job.
pub fn filter_graph(job: AnalysisJob, video: &Path) -> OsString {
    let (source, filter) = match job {
        AnalysisJob::Luminance => ("movie", "signalstats"),
        AnalysisJob::Loudness => ("amovie", "ebur128=metadata=1"),
        AnalysisJob::Amplitude => ("amovie", "astats=metadata=1:reset=1"),
    };
    let mut graph = OsString::from(source);
    graph.push("=");
    graph.push(escape_path(video));
    graph.push(",");
    graph.push(filter);
    graph
}

/// Frame tags extracted for a job, in column order.
pub fn frame_tags(job: AnalysisJob) -> &'static [&'static str] {
    match job {
        AnalysisJob::Luminance => &[
            "lavfi.signalstats.YMIN",
            "lavfi.signalstats.YAVG",
            "lavfi.signalstats.YMAX",
            "lavfi.signalstats.YDIF",
        ],
        AnalysisJob::Loudness => &["lavfi.r128.M"],
        AnalysisJob::Amplitude => &[
            "lavfi.astats.Overall.RMS_level",
            "lavfi.astats.Overall.Peak_level",
        ],
    }
}

/// `-show_entries` value: the frame timestamp followed by the job's tags.
pub fn show_entries(job: AnalysisJob) -> String {
    format!("frame=pts_time:frame_tags={}", frame_tags(job).join(","))
}

/// Full argument list passed to the probing tool.
pub fn probe_args(job: AnalysisJob, video: &Path) -> Vec<OsString> {
    vec![
        "-f".into(),
        "lavfi".into(),
        "-i".into(),
        filter_graph(job, video),
        "-show_entries".into(),
        show_entries(job).into(),
        "-of".into(),
        "csv".into(),
    ]
}
