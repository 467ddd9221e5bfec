//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Bulk
//!
//! ```text
//! [1/3] Processing beach.jpg
//!     bordered: 1200x1500
//! [2/3] Processing broken.png
//!     failed: Failed to decode broken.png: ...
//! [3/3] Processing dunes.webp
//!     bordered: 840x1050
//! Processed 2/3 images (1 failed)
//! Saved 2/2 images to out
//! ```
//!
//! ## Single / preview
//!
//! ```text
//! beach.jpg
//!     border: 5% #ffffff
//!     original: 1200x900 (preview 400x300)
//!     bordered: 1320x1650 (preview 240x300)
//! Saved to out/bordered_beach_4x5_5pct_white.jpg
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::imaging::{BorderSpec, fit_display};
use crate::process::{BatchReport, ItemOutcome, ProcessEvent};
use crate::save::BulkSaveReport;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn dims((w, h): (u32, u32)) -> String {
    format!("{}x{}", w, h)
}

/// `WxH (preview wxh)`, with preview sizes from the display scaler.
fn dims_with_preview(size: (u32, u32), preview_box: (u32, u32)) -> String {
    let (w, h) = fit_display(size, preview_box);
    format!("{} (preview {:.0}x{:.0})", dims(size), w, h)
}

fn describe_border(border: &BorderSpec) -> String {
    format!("{}% {}", border.percentage(), border.color())
}

// ============================================================================
// Bulk processing
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::ItemStarted { index, total, name } => {
            vec![format!("[{}/{}] Processing {}", index, total, name)]
        }
        ProcessEvent::ItemFinished { outcome, .. } => match outcome {
            ItemOutcome::Processed { width, height } => {
                vec![format!("{}bordered: {}", indent(1), dims((*width, *height)))]
            }
            ItemOutcome::Failed { message, .. } => {
                vec![format!("{}failed: {}", indent(1), message)]
            }
        },
        ProcessEvent::BatchFinished(report) => format_batch_report(report),
    }
}

/// One-line summary of a batch.
pub fn format_batch_report(report: &BatchReport) -> Vec<String> {
    let mut line = format!(
        "Processed {}/{} images",
        report.succeeded, report.total
    );
    if report.failed > 0 {
        line.push_str(&format!(" ({} failed)", report.failed));
    }
    vec![line]
}

// ============================================================================
// Saving
// ============================================================================

/// Per-item failures, then the summary line.
///
/// Successful writes are not listed individually; the summary covers them.
pub fn format_save_report(report: &BulkSaveReport) -> Vec<String> {
    let mut lines = Vec::new();
    for item in report.results.iter().filter(|r| !r.success) {
        lines.push(format!(
            "{}not saved: {}: {}",
            indent(1),
            item.source_name,
            item.error.as_deref().unwrap_or("unknown error")
        ));
    }
    let summary = report.summary();
    lines.push(format!(
        "Saved {}/{} images to {}",
        summary.successful,
        summary.total,
        report.output_folder.display()
    ));
    lines
}

pub fn print_save_report(report: &BulkSaveReport) {
    for line in format_save_report(report) {
        println!("{}", line);
    }
}

pub fn format_saved(path: &Path) -> String {
    format!("Saved to {}", path.display())
}

pub fn format_cancelled(what: &str) -> String {
    format!("{} cancelled: no output given", what)
}

// ============================================================================
// Queue intake
// ============================================================================

/// Summary of adding sources to a queue.
///
/// ```text
/// Queued 3 images (1 duplicate skipped)
/// ```
pub fn format_queued(added: usize, offered: usize) -> String {
    let skipped = offered.saturating_sub(added);
    let noun = if added == 1 { "image" } else { "images" };
    match skipped {
        0 => format!("Queued {} {}", added, noun),
        1 => format!("Queued {} {} (1 duplicate skipped)", added, noun),
        n => format!("Queued {} {} ({} duplicates skipped)", added, noun, n),
    }
}

// ============================================================================
// Single image
// ============================================================================

/// Sizes of one rendered image, for the single-image and preview commands.
#[derive(Debug, Clone)]
pub struct SingleSummary<'a> {
    pub name: &'a str,
    pub border: &'a BorderSpec,
    pub original: (u32, u32),
    pub bordered: (u32, u32),
    pub preview_box: (u32, u32),
}

/// Header, border, and original/bordered sizes with their preview sizes.
pub fn format_single_output(summary: &SingleSummary<'_>) -> Vec<String> {
    vec![
        summary.name.to_string(),
        format!("{}border: {}", indent(1), describe_border(summary.border)),
        format!(
            "{}original: {}",
            indent(1),
            dims_with_preview(summary.original, summary.preview_box)
        ),
        format!(
            "{}bordered: {}",
            indent(1),
            dims_with_preview(summary.bordered, summary.preview_box)
        ),
    ]
}

pub fn print_single_output(summary: &SingleSummary<'_>) {
    for line in format_single_output(summary) {
        println!("{}", line);
    }
}
