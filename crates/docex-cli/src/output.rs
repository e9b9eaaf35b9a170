//! End-of-run summary printed to stdout.

use colored::Colorize;
use docex_core::ExportSummary;
use std::path::Path;

/// Render the summary lines for a finished export.
pub fn format_summary(summary: &ExportSummary, root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} document(s) from {} categor{} into {}",
        "Exported".green().bold(),
        summary.documents,
        summary.categories,
        if summary.categories == 1 { "y" } else { "ies" },
        root.display()
    )];

    let images = summary.images;
    if images.downloaded + images.failed + images.remote > 0 {
        lines.push(format!(
            "  images: {} downloaded, {} linked remotely, {} failed",
            images.downloaded, images.remote, images.failed
        ));
    }

    let mut problems = Vec::new();
    if summary.skipped > 0 {
        problems.push(format!("{} document(s) skipped", summary.skipped));
    }
    if summary.api_failures > 0 {
        problems.push(format!("{} API request(s) failed", summary.api_failures));
    }
    if images.malformed_blocks > 0 {
        problems.push(format!(
            "{} malformed image block(s) left as is",
            images.malformed_blocks
        ));
    }
    if summary.categories_truncated {
        problems.push("category listing was cut short".to_string());
    }
    if !problems.is_empty() {
        lines.push(format!("  {} {}", "warning:".yellow().bold(), problems.join(", ")));
    }
    lines
}

/// Print the summary to stdout.
pub fn print_summary(summary: &ExportSummary, root: &Path) {
    for line in format_summary(summary, root) {
        println!("{line}");
    }
}
