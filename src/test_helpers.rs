//! Shared test utilities for the satgal test suite.
//!
//! Provides record builders for the pure gallery code and filesystem helpers
//! for the scanner.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();
//! let iss = find_record(&output.records, "ISS-2025-04-12_07.09.59");
//!
//! // 30 April records followed by 5 March records, newest first
//! let records = monthly_records(&[(2025, 4, 30), (2025, 3, 5)]);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::types::ImageRecord;

// =========================================================================
// Fixture setup
// =========================================================================

/// A fresh copy of the `fixtures/site/` ground-station tree in a temp directory.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    for entry in walkdir::WalkDir::new(&fixtures) {
        let entry = entry.unwrap();
        let target = tmp.path().join(entry.path().strip_prefix(&fixtures).unwrap());
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }
    tmp
}

/// Create a placeholder file (and its parents) under `root`.
pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "fake image").unwrap();
    path
}

// =========================================================================
// Record builders
// =========================================================================

/// A record with a path derived from its fields.
pub fn record(satellite: &str, event: &str, date: &str) -> ImageRecord {
    let filename = format!("{}-{}", satellite, date.replace(':', "."));
    ImageRecord {
        path: format!("assets/images/{satellite}/{filename}.jpg"),
        satellite: satellite.to_string(),
        event: event.to_string(),
        date: date.to_string(),
        filename,
    }
}

/// `count` records per `(year, month, count)` entry, newest first within
/// each month. Up to 96 records per month.
pub fn monthly_records(months: &[(i32, u32, usize)]) -> Vec<ImageRecord> {
    let mut records = Vec::new();
    for &(year, month, count) in months {
        for i in 0..count {
            let day = 28 - i / 24;
            let hour = 23 - i % 24;
            let date = format!("{year:04}-{month:02}-{day:02}T{hour:02}:00:00Z");
            records.push(record("SAT", "", &date));
        }
    }
    records
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// Find a record by filename stem. Panics if not found.
pub fn find_record<'a>(records: &'a [ImageRecord], filename: &str) -> &'a ImageRecord {
    records
        .iter()
        .find(|r| r.filename == filename)
        .unwrap_or_else(|| {
            let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
            panic!("record '{filename}' not found. Available: {names:?}")
        })
}
