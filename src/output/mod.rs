//! Output module for crawl payloads and run summaries
//!
//! This module handles:
//! - Serializing the success and error payloads returned to the caller
//! - Generating markdown summaries of a run
//! - Recording crawl statistics

mod markdown;
pub mod stats;
mod types;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{log_statistics, CrawlStats};
pub use types::{CrawlPayload, ErrorPayload, OutputError, OutputResult, RunSummary};

use serde::Serialize;
use std::io::Write;

/// Writes a value as JSON followed by a newline
///
/// # Arguments
///
/// * `writer` - Destination, usually stdout
/// * `value` - The payload to serialize
/// * `pretty` - Use indented output
pub fn write_json<W: Write, T: Serialize>(
    mut writer: W,
    value: &T,
    pretty: bool,
) -> OutputResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
