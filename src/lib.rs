//! # satgal
//!
//! A gallery for satellite imagery received at home ground stations: SSTV
//! pictures from the ISS, APT and LRPT weather images from NOAA and METEOR.
//! The folder layout is the data source: the first folder under the images
//! root names the satellite, the next one the event, and the capture time
//! comes from the filename.
//!
//! # Architecture: Two Halves, One Manifest
//!
//! ```text
//! 1. Index     assets/images/  →  data.json       (filesystem → flat records)
//! 2. Gallery   data.json       →  render ops      (filter → group → batch)
//!                                    │
//!                                    ├── TextSink   terminal listing
//!                                    └── HtmlSink   standalone HTML page
//! ```
//!
//! The two halves never talk to each other directly. The indexer writes the
//! manifest in traversal order; the gallery sorts it newest first when it
//! loads it, computes the sidebar facets once, and from then on only the
//! filter selection changes.
//!
//! The gallery never touches a display. [`gallery::Gallery`] returns
//! [`gallery::RenderOp`]s (new month group, extend last group, sentinel
//! armed/hidden, …) and a [`gallery::RenderSink`] applies them. Filtering and
//! grouping are plain functions over slices, testable without any sink.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Indexer: walks the images root, produces manifest records |
//! | [`naming`] | Path classification and filename capture-date patterns |
//! | [`types`] | [`types::ImageRecord`], the manifest wire format |
//! | [`dates`] | Lenient timestamp parsing, UTC month keys, card date format |
//! | [`filter`] | [`filter::FilterState`] and the pure filtering pass |
//! | [`group`] | Month grouping, newest first, Unknown last |
//! | [`facets`] | Satellite / month / event facets with counts |
//! | [`gallery`] | Filtered view, batch rendering, month-boundary merge, detail view |
//! | [`output`] | CLI formatting and the terminal display surface |
//! | [`render`] | HTML display surface and page rendering (Maud) |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//!
//! # Design Decisions
//!
//! ## Numeric Month Keys For The Merge
//!
//! When a batch boundary falls inside a month, the next batch must extend the
//! month already on screen instead of printing a second header. The decision
//! compares [`dates::GroupKey`] values carried through rendering, never header
//! text, so two months can't merge just because their labels look alike.
//!
//! ## UTC Everywhere
//!
//! Satellite passes are logged in UTC. Month buckets, the month filter and
//! card dates all use UTC components, so the same manifest groups identically
//! on every machine.

pub mod config;
pub mod dates;
pub mod facets;
pub mod filter;
pub mod gallery;
pub mod group;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
