//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of one run,
//! including statistics, the discovered links, and screenshot results.

use crate::output::types::{OutputResult, RunSummary};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of a run to disk
///
/// # Arguments
///
/// * `summary` - The run summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
///
/// # Arguments
///
/// * `summary` - The run summary data
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();
    let stats = &summary.stats;

    md.push_str("# Sitecap Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", summary.seed));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        summary.duration_seconds()
    ));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Page statistics
    md.push_str("## Pages\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Fetched | {} |\n", stats.pages_fetched));
    md.push_str(&format!("| Skipped | {} |\n", stats.pages_skipped));
    md.push_str(&format!("| Failed | {} |\n", stats.pages_failed));
    md.push('\n');
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    // Link statistics
    md.push_str("## Links\n\n");
    md.push_str(&format!("- **From HTML**: {}\n", stats.html_links));
    md.push_str(&format!("- **From Sitemap**: {}\n", stats.sitemap_links));
    md.push_str(&format!("- **Unique Total**: {}\n\n", stats.total_links));

    if summary.links.is_empty() {
        md.push_str("*No links discovered.*\n\n");
    } else {
        for link in &summary.links {
            md.push_str(&format!("- {}\n", link));
        }
        md.push('\n');
    }

    // Screenshots
    if let Some(captures) = &summary.captures {
        md.push_str("## Screenshots\n\n");
        md.push_str(&format!(
            "- **Captured**: {}\n- **Failed**: {}\n\n",
            stats.captures_succeeded, stats.captures_failed
        ));

        if !captures.is_empty() {
            md.push_str("| URL | Screenshot |\n");
            md.push_str("|-----|------------|\n");
            for capture in captures {
                let path = capture.screenshot_path.as_deref().unwrap_or("*failed*");
                md.push_str(&format!("| {} | {} |\n", capture.url, path));
            }
            md.push('\n');
        }
    }

    md
}
