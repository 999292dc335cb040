//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! # Output Format
//!
//! ## Index
//!
//! ```text
//! 001 ISS (2 images)
//!     ARISS Series 23
//!         ISS-2025-04-12_07.09.59 @ 2025-04-12T07:09:59Z
//!         ISS-2025-04-12_08.45.10 @ 2025-04-12T08:45:10Z
//! 002 NOAA-19 (1 image)
//!     General
//!         20250411_1932 @ 2025-04-11T19:32:00Z
//!
//! Generated index for 3 images at ./data.json
//! ```
//!
//! ## Browse
//!
//! The terminal display surface is [`TextSink`]; it turns render ops into
//! lines as the gallery emits them:
//!
//! ```text
//! Showing 3 images
//! April 2025
//!     001 ISS · ARISS Series 23 · 2025/04/12 08:45 UTC
//!     002 ISS · ARISS Series 23 · 2025/04/12 07:09 UTC
//!     003 NOAA-19 · General · 2025/04/11 19:32 UTC
//! -- end --
//! ```

use crate::facets::Facets;
use crate::gallery::{Card, DetailView, GalleryError, RenderOp, RenderSink, SentinelState};
use crate::scan::ScanOutput;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Listing number for satellites and cards: `001`, `042`, `1234`.
fn number(n: usize) -> String {
    format!("{n:03}")
}

/// Nesting for the satellite → event → image listing.
fn indent(level: usize) -> String {
    " ".repeat(4 * level)
}

fn plural_images(n: usize) -> String {
    if n == 1 {
        "1 image".to_string()
    } else {
        format!("{n} images")
    }
}

// ============================================================================
// Index output
// ============================================================================

/// Format the indexer result: records grouped by satellite, then event.
///
/// Grouping follows first appearance, so the listing mirrors traversal order.
pub fn format_scan_output(output: &ScanOutput, manifest_path: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    let mut satellites: Vec<(&str, Vec<(&str, Vec<usize>)>)> = Vec::new();
    for (i, record) in output.records.iter().enumerate() {
        let sat_pos = match satellites.iter().position(|(s, _)| *s == record.satellite) {
            Some(pos) => pos,
            None => {
                satellites.push((&record.satellite, Vec::new()));
                satellites.len() - 1
            }
        };
        let events = &mut satellites[sat_pos].1;
        let event = record.event_or_general();
        match events.iter_mut().find(|(e, _)| *e == event) {
            Some((_, members)) => members.push(i),
            None => events.push((event, vec![i])),
        }
    }

    for (pos, (satellite, events)) in satellites.iter().enumerate() {
        let count: usize = events.iter().map(|(_, m)| m.len()).sum();
        lines.push(format!(
            "{} {} ({})",
            number(pos + 1),
            satellite,
            plural_images(count)
        ));
        for (event, members) in events {
            lines.push(format!("{}{}", indent(1), event));
            for &i in members {
                let record = &output.records[i];
                lines.push(format!(
                    "{}{} @ {}",
                    indent(2),
                    record.filename,
                    record.date
                ));
            }
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Generated index for {} images at {}",
        output.records.len(),
        manifest_path.display()
    ));
    lines
}

pub fn print_scan_output(output: &ScanOutput, manifest_path: &Path) {
    for line in format_scan_output(output, manifest_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Facets output
// ============================================================================

/// Format the sidebar facets with their counts.
pub fn format_facets(facets: &Facets) -> Vec<String> {
    let mut lines = vec!["Satellites".to_string()];
    lines.push(format!("{}All", indent(1)));
    for satellite in &facets.satellites {
        lines.push(format!("{}{}", indent(1), satellite));
    }

    lines.push("Dates".to_string());
    lines.push(format!("{}All dates [{}]", indent(1), facets.total));
    for month in &facets.months {
        lines.push(format!(
            "{}{} [{}]  ({})",
            indent(1),
            month.value.label(),
            month.count,
            month.value
        ));
    }

    lines.push("Events".to_string());
    lines.push(format!("{}All events [{}]", indent(1), facets.total));
    for event in &facets.events {
        lines.push(format!("{}{} [{}]", indent(1), event.value, event.count));
    }
    lines
}

pub fn print_facets(facets: &Facets) {
    for line in format_facets(facets) {
        println!("{}", line);
    }
}

// ============================================================================
// Browse output
// ============================================================================

fn card_line(card: &Card) -> String {
    format!(
        "{}{} {} · {} · {}",
        indent(1),
        number(card.position + 1),
        card.satellite,
        card.event,
        card.date_label
    )
}

/// Format a detail view as a caption block.
pub fn format_detail(detail: &DetailView) -> Vec<String> {
    vec![
        detail.satellite.clone(),
        format!("{} - {}", detail.event, detail.date),
        format!("{}{}", indent(1), detail.path),
    ]
}

/// Terminal display surface: render ops become lines, drained by the caller.
#[derive(Debug, Default)]
pub struct TextSink {
    lines: Vec<String>,
    headers: usize,
}

impl TextSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lines produced since the last call.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Month headers printed since the last `Clear`.
    pub fn header_count(&self) -> usize {
        self.headers
    }
}

impl RenderSink for TextSink {
    fn apply(&mut self, op: RenderOp) {
        match op {
            RenderOp::Clear => self.headers = 0,
            RenderOp::Stats(n) => self.lines.push(format!("Showing {}", plural_images(n))),
            RenderOp::NoResults => self.lines.push("No matching images".to_string()),
            RenderOp::NewGroup { key, cards } => {
                self.headers += 1;
                self.lines.push(key.label());
                self.lines.extend(cards.iter().map(card_line));
            }
            RenderOp::ExtendGroup { cards, .. } => {
                self.lines.extend(cards.iter().map(card_line));
            }
            RenderOp::Sentinel(SentinelState::Armed) => {
                self.lines.push("-- more --".to_string());
            }
            RenderOp::Sentinel(SentinelState::Hidden) => {
                self.lines.push("-- end --".to_string());
            }
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Format a fatal CLI error, with a next step when one is known.
///
/// Every error type carries its source in its own message, so only the top
/// level is printed.
pub fn format_error(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut lines = vec![format!("Error: {err}")];
    match err.downcast_ref::<GalleryError>() {
        Some(GalleryError::Read { .. }) => {
            lines.push("Run 'satgal index' first to generate the manifest.".to_string());
        }
        Some(GalleryError::Parse { .. }) => {
            lines.push("Run 'satgal index' to regenerate the manifest.".to_string());
        }
        None => {}
    }
    lines
}

pub fn print_error(err: &(dyn std::error::Error + 'static)) {
    for line in format_error(err) {
        eprintln!("{}", line);
    }
}
