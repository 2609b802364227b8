//! Run summary generation.

pub mod summary;

pub use summary::{generate_json_summary, generate_text_summary};
