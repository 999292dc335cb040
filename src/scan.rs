//! Filesystem scanning and manifest generation.
//!
//! The offline half of satgal. Walks the images tree and produces the flat
//! manifest (`data.json`) that the gallery loads.
//!
//! ## Directory Structure
//!
//! ```text
//! site/                                  # Site root (record paths are relative to it)
//! ├── config.toml                        # Optional
//! ├── data.json                          # Written by `satgal index`
//! └── assets/images/                     # Images root
//!     ├── ISS/                           # Satellite
//!     │   └── ARISS_Series_23/           # Event (optional level)
//!     │       ├── ISS-2025-04-12_07.09.59.jpg
//!     │       └── ISS-2025-04-12_08.45.10.jpg
//!     └── NOAA-19/
//!         └── 20250411_1932.png          # Event "General"
//! ```
//!
//! ## Record fields
//!
//! - `satellite` / `event`: from the folders, see [`naming::classify`]
//! - `date`: from the filename, see [`naming::parse_capture_date`]; when neither
//!   pattern matches, the file's modification time in UTC
//! - `path`: relative to the site root, always `/`-separated
//!
//! ## Ordering
//!
//! Records come out in traversal order (depth first, entries sorted by name
//! within each directory). The manifest is deliberately left unsorted by
//! date; the gallery sorts at load time.
//!
//! Symlinked files and folders are followed and recorded under the link's
//! own path. A link cycle is a walk error.
//!
//! ## Missing root
//!
//! A missing images root is not an error: the scanner logs a warning and
//! returns an empty manifest, so a fresh checkout still produces a valid
//! (empty) `data.json`.

use crate::config::IndexerConfig;
use crate::naming;
use crate::types::ImageRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image outside site root: {0}")]
    OutsideRoot(PathBuf),
}

/// Result of a scan: the manifest plus the paths it was built from.
#[derive(Debug)]
pub struct ScanOutput {
    pub images_root: PathBuf,
    pub records: Vec<ImageRecord>,
}

/// Scan `<site_root>/<images_dir>` and build the manifest records.
pub fn scan(site_root: &Path, config: &IndexerConfig) -> Result<ScanOutput, ScanError> {
    let images_root = site_root.join(&config.images_dir);
    let mut records = Vec::new();

    if !images_root.is_dir() {
        log::warn!(
            "Directory {} does not exist, writing an empty manifest",
            images_root.display()
        );
        return Ok(ScanOutput {
            images_root,
            records,
        });
    }

    log::info!("Scanning {}", images_root.display());

    for entry in WalkDir::new(&images_root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_image_extension(entry.path(), &config.extensions) {
            continue;
        }
        let record = build_record(entry.path(), site_root, &images_root)?;
        log::debug!("{} -> {} / {}", record.path, record.satellite, record.event);
        records.push(record);
    }

    Ok(ScanOutput {
        images_root,
        records,
    })
}

/// Serialize the records as pretty JSON, creating parent directories.
pub fn write_manifest(records: &[ImageRecord], path: &Path) -> Result<(), ScanError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

fn build_record(path: &Path, site_root: &Path, images_root: &Path) -> Result<ImageRecord, ScanError> {
    let site_rel = path
        .strip_prefix(site_root)
        .map_err(|_| ScanError::OutsideRoot(path.to_path_buf()))?;
    let root_rel = path
        .strip_prefix(images_root)
        .map_err(|_| ScanError::OutsideRoot(path.to_path_buf()))?;

    let placement = naming::classify(root_rel);
    let filename = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let date = match naming::parse_capture_date(&filename) {
        Some(date) => date,
        None => modified_utc(path)?,
    };

    Ok(ImageRecord {
        path: to_web_path(site_rel),
        satellite: placement.satellite,
        event: placement.event,
        date,
        filename,
    })
}

/// File modification time as RFC 3339 UTC with millisecond precision.
fn modified_utc(path: &Path) -> Result<String, ScanError> {
    let modified = fs::metadata(path)?.modified()?;
    let dt: DateTime<Utc> = modified.into();
    Ok(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn to_web_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_timestamp;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn scan_fixture_tree() {
        let tmp = setup_fixtures();
        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();

        // notes.txt is skipped
        assert_eq!(output.records.len(), 5);
        assert!(output.records.iter().all(|r| !r.path.ends_with(".txt")));
    }

    #[test]
    fn path_with_event_folder() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "assets/images/NOAA/Hurricane_Watch/img1.png");

        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();
        let record = &output.records[0];
        assert_eq!(record.path, "assets/images/NOAA/Hurricane_Watch/img1.png");
        assert_eq!(record.satellite, "NOAA");
        assert_eq!(record.event, "Hurricane Watch");
        assert_eq!(record.filename, "img1");
    }

    #[test]
    fn path_without_event_folder() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "assets/images/NOAA/img1.png");

        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();
        let record = &output.records[0];
        assert_eq!(record.satellite, "NOAA");
        assert_eq!(record.event, "General");
    }

    #[test]
    fn date_from_filename_patterns() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "assets/images/ISS/ISS-2025-04-12_07.09.59.jpg");
        touch(tmp.path(), "assets/images/METEOR/20250412_0709.jpg");

        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();
        let iss = find_record(&output.records, "ISS-2025-04-12_07.09.59");
        let meteor = find_record(&output.records, "20250412_0709");
        assert_eq!(iss.date, "2025-04-12T07:09:59Z");
        assert_eq!(meteor.date, "2025-04-12T07:09:00Z");
    }

    #[test]
    fn date_falls_back_to_mtime() {
        let tmp = TempDir::new().unwrap();
        let path = touch(tmp.path(), "assets/images/ISS/snapshot.jpg");

        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();
        let record = &output.records[0];

        let expected: DateTime<Utc> = fs::metadata(&path).unwrap().modified().unwrap().into();
        let parsed = parse_timestamp(&record.date).unwrap();
        assert!(record.date.ends_with('Z'));
        assert_eq!(parsed.timestamp_millis(), expected.timestamp_millis());
    }

    #[test]
    fn extensions_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "assets/images/ISS/a.JPG");
        touch(tmp.path(), "assets/images/ISS/b.Jpeg");
        touch(tmp.path(), "assets/images/ISS/c.webp");
        touch(tmp.path(), "assets/images/ISS/d.gif");
        touch(tmp.path(), "assets/images/ISS/e.wav");

        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();
        let names: Vec<&str> = output.records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_and_folders_are_indexed() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let elsewhere = touch(tmp.path(), "elsewhere/20250412_0709.jpg");
        let images = tmp.path().join("assets/images");
        fs::create_dir_all(images.join("ISS")).unwrap();
        symlink(&elsewhere, images.join("ISS/20250412_0709.jpg")).unwrap();
        symlink(tmp.path().join("elsewhere"), images.join("NOAA")).unwrap();

        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();
        let paths: Vec<&str> = output.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "assets/images/ISS/20250412_0709.jpg",
                "assets/images/NOAA/20250412_0709.jpg",
            ]
        );
        assert_eq!(output.records[1].satellite, "NOAA");
        assert!(output.records.iter().all(|r| r.date == "2025-04-12T07:09:00Z"));
    }

    #[test]
    fn custom_extension_list() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "assets/images/ISS/a.jpg");
        touch(tmp.path(), "assets/images/ISS/b.png");

        let config = IndexerConfig {
            extensions: vec!["png".to_string()],
            ..IndexerConfig::default()
        };
        let output = scan(tmp.path(), &config).unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].filename, "b");
    }

    #[test]
    fn traversal_order_preserved_not_date_sorted() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "assets/images/A/20200101_0000.jpg");
        touch(tmp.path(), "assets/images/B/20250101_0000.jpg");
        touch(tmp.path(), "assets/images/A/Event/20300101_0000.jpg");

        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();
        let paths: Vec<&str> = output.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "assets/images/A/20200101_0000.jpg",
                "assets/images/A/Event/20300101_0000.jpg",
                "assets/images/B/20250101_0000.jpg",
            ]
        );
    }

    #[test]
    fn missing_root_yields_empty_manifest() {
        let tmp = TempDir::new().unwrap();
        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();
        assert!(output.records.is_empty());
        assert!(output.images_root.ends_with("assets/images"));
    }

    #[test]
    fn write_manifest_round_trips_fields() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "assets/images/NOAA/Hurricane_Watch/20250412_0709.png");
        let output = scan(tmp.path(), &IndexerConfig::default()).unwrap();

        let manifest_path = tmp.path().join("out/data.json");
        write_manifest(&output.records, &manifest_path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
        let first = &json[0];
        assert_eq!(first["satellite"], "NOAA");
        assert_eq!(first["event"], "Hurricane Watch");
        assert_eq!(first["date"], "2025-04-12T07:09:00Z");
        assert_eq!(first["filename"], "20250412_0709");
        assert_eq!(first["path"], "assets/images/NOAA/Hurricane_Watch/20250412_0709.png");
    }

    #[test]
    fn write_empty_manifest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        write_manifest(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
