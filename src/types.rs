//! Shared types used by both halves of the toolkit.
//!
//! [`ImageRecord`] is the unit of the manifest: the indexer serializes a
//! `Vec<ImageRecord>` to JSON and the gallery deserializes it back. The field
//! set is the wire format, so it must stay identical on both sides.

use serde::{Deserialize, Deserializer, Serialize};

/// Event category used when an image has no event folder.
pub const GENERAL_EVENT: &str = "General";

/// Satellite name used when an image sits directly in the images root.
pub const UNKNOWN_SATELLITE: &str = "Unknown";

/// One image in the manifest.
///
/// ```json
/// {
///   "path": "assets/images/ISS/ARISS_Series_23/ISS-2025-04-12_07.09.59.jpg",
///   "satellite": "ISS",
///   "event": "ARISS Series 23",
///   "date": "2025-04-12T07:09:59Z",
///   "filename": "ISS-2025-04-12_07.09.59"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// File location relative to the site root, `/`-separated
    pub path: String,
    /// Capturing station or spacecraft
    pub satellite: String,
    /// Event tag; empty, `null` or missing in hand-written manifests
    #[serde(default, deserialize_with = "null_as_empty")]
    pub event: String,
    /// ISO-8601 timestamp, kept verbatim even when unparseable
    pub date: String,
    /// File stem without extension
    pub filename: String,
}

impl ImageRecord {
    /// Event name with the `General` fallback applied.
    pub fn event_or_general(&self) -> &str {
        if self.event.is_empty() {
            GENERAL_EVENT
        } else {
            &self.event
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
