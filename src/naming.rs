//! Centralized path and filename parsing for the images tree.
//!
//! Everything the indexer knows about an image comes from where it sits and
//! what it is called:
//!
//! ```text
//! assets/images/                         # images root
//! ├── ISS/                               # satellite
//! │   └── ARISS_Series_23/               # event (underscores → spaces)
//! │       └── ISS-2025-04-12_07.09.59.jpg
//! └── NOAA/
//!     └── 20250412_0709.png              # no event folder → "General"
//! ```
//!
//! ## Capture dates
//!
//! Two filename conventions are recognised, anywhere in the stem, first match wins:
//!
//! - **SSTV decoder style**: `YYYY-MM-DD` + `_` or space + `HH.MM` + optional `.SS`
//!   (`ISS-2025-04-12_07.09.59`)
//! - **Compact style**: `YYYYMMDD` + `_` or `-` + `HHMM` + optional `SS`
//!   (`20250412_0709`, `noaa19-20250412-070959`)
//!
//! Both produce `YYYY-MM-DDTHH:MM:SSZ`, seconds defaulting to `00`. Digits are
//! copied verbatim and not range-checked; the gallery treats an impossible
//! date the same as any other unparseable one.

use crate::types::{GENERAL_EVENT, UNKNOWN_SATELLITE};
use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

static SSTV_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})-([0-9]{2})-([0-9]{2})[_\s]([0-9]{2})\.([0-9]{2})(?:\.([0-9]{2}))?")
        .expect("static regex")
});

static COMPACT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})([0-9]{2})([0-9]{2})[_-]([0-9]{2})([0-9]{2})([0-9]{2})?")
        .expect("static regex")
});

/// Extract a capture timestamp from a filename stem.
///
/// - `"ISS-2025-04-12_07.09.59"` → `Some("2025-04-12T07:09:59Z")`
/// - `"ISS-2025-04-12 07.09"` → `Some("2025-04-12T07:09:00Z")`
/// - `"20250412_0709"` → `Some("2025-04-12T07:09:00Z")`
/// - `"holiday"` → `None`
pub fn parse_capture_date(stem: &str) -> Option<String> {
    let caps = SSTV_DATE
        .captures(stem)
        .or_else(|| COMPACT_DATE.captures(stem))?;
    let seconds = caps.get(6).map(|m| m.as_str()).unwrap_or("00");
    Some(format!(
        "{}-{}-{}T{}:{}:{}Z",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5], seconds
    ))
}

/// Where an image sits in the tree, reduced to display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub satellite: String,
    pub event: String,
}

/// Classify an image by its path relative to the images root.
///
/// - `NOAA/Hurricane_Watch/img1.png` → satellite `NOAA`, event `Hurricane Watch`
/// - `NOAA/img1.png` → satellite `NOAA`, event `General`
/// - `img1.png` → satellite `Unknown`, event `General`
///
/// Deeper nesting keeps the first folder under the satellite as the event.
pub fn classify(relative: &Path) -> Placement {
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let satellite = if segments.len() >= 2 {
        segments[0].clone()
    } else {
        UNKNOWN_SATELLITE.to_string()
    };
    let event = if segments.len() >= 3 {
        event_display_name(&segments[1])
    } else {
        GENERAL_EVENT.to_string()
    };

    Placement { satellite, event }
}

/// Event folder name for display: underscores become spaces.
pub fn event_display_name(folder: &str) -> String {
    folder.replace('_', " ")
}
