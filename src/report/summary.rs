//! End-of-run summary output.
//!
//! This module renders the final listing of CSV files, either as text for a
//! terminal or as JSON for scripts.

use crate::models::RunSummary;
use crate::probe::runner::shell_quote;
use anyhow::Result;

/// Script that merges the three CSVs onto one timebase and plots them.
pub const COMPOSITE_SCRIPT: &str = "composite-stimuli-features.py";

/// Generate the human-readable summary.
pub fn generate_text_summary(summary: &RunSummary) -> String {
    let mut output = String::new();

    output.push_str("\n📊 Signal extraction complete\n");
    output.push_str(&format!("   Video:  {}\n", summary.video.display()));
    output.push_str(&format!("   Output: {}\n", summary.out_dir.display()));
    output.push_str(&format!("   Tool:   {}\n\n", summary.tool));

    output.push_str("   Files:\n");
    for outcome in &summary.jobs {
        output.push_str(&format!("     📄 {}\n", outcome.output.display()));
    }
    output.push_str(&format!("\n   Duration: {:.1}s\n", summary.duration_seconds));

    output.push_str(&generate_next_step_hint(summary));

    output
}

/// Hint pointing at the composition/visualization step.
fn generate_next_step_hint(summary: &RunSummary) -> String {
    format!(
        "\n➡️  Next: combine and plot the signals with\n   python {} --data_dir {}\n",
        COMPOSITE_SCRIPT,
        shell_quote(&summary.out_dir.to_string_lossy())
    )
}

/// Generate the JSON summary.
pub fn generate_json_summary(summary: &RunSummary) -> Result<String> {
    let json = serde_json::to_string_pretty(summary)?;
    Ok(json)
}
