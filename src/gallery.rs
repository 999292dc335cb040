//! The gallery pipeline: manifest → filtered view → batched render ops.
//!
//! [`Gallery`] owns the manifest for its whole lifetime and all the state
//! derived from it. Every interaction returns a list of [`RenderOp`]s instead
//! of touching a display, so the pipeline is testable without one; a
//! [`RenderSink`] turns the ops into terminal lines or HTML.
//!
//! ## Flow
//!
//! ```text
//! load ──► sort by date desc ──► facets (once)
//!                 │
//! apply_filters ──┴─► filtered indices ──► reset ──► first batch
//!                                                      │
//! on_sentinel_visible ──► render_next_batch ◄──────────┘
//! ```
//!
//! ## Batches and the month-boundary merge
//!
//! Each batch takes the next `batch_size` filtered records and groups them by
//! month. When a batch boundary falls inside a month, the first group of the
//! new batch has the same [`GroupKey`] as the last group already on screen;
//! it is emitted as [`RenderOp::ExtendGroup`] so the month keeps one header.

use crate::dates::{GroupKey, format_card_date, parse_timestamp};
use crate::facets::Facets;
use crate::filter::{FilterState, apply_filters};
use crate::group::group_by_month;
use crate::types::ImageRecord;
use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BATCH_SIZE: usize = 24;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Cannot read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One thumbnail card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Position in the filtered sequence; key for [`Gallery::detail`].
    pub position: usize,
    pub path: String,
    pub satellite: String,
    pub event: String,
    /// `YYYY/MM/DD HH:MM UTC`, or the raw date when unparseable.
    pub date_label: String,
}

impl Card {
    fn new(position: usize, record: &ImageRecord) -> Self {
        Self {
            position,
            path: record.path.clone(),
            satellite: record.satellite.clone(),
            event: record.event_or_general().to_string(),
            date_label: format_card_date(&record.date),
        }
    }
}

/// Single-image detail view opened from a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub path: String,
    pub satellite: String,
    pub event: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelState {
    /// More records remain; the next visibility event loads a batch.
    Armed,
    /// Everything is rendered.
    Hidden,
}

/// A render instruction for a display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Remove everything from the card area.
    Clear,
    /// Number of records in the filtered view.
    Stats(usize),
    /// Placeholder for an empty filtered view.
    NoResults,
    /// Header plus a new grid.
    NewGroup { key: GroupKey, cards: Vec<Card> },
    /// Append to the grid of the last group, which has this key.
    ExtendGroup { key: GroupKey, cards: Vec<Card> },
    Sentinel(SentinelState),
}

/// A display surface that consumes render ops in order.
pub trait RenderSink {
    fn apply(&mut self, op: RenderOp);
}

/// Batch progress over the current filtered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub rendered_count: usize,
    pub batch_size: usize,
    /// Set while a batch is being built; a second request is a no-op.
    pub loading: bool,
    /// Key of the group most recently put on screen.
    pub last_group: Option<GroupKey>,
}

impl RenderState {
    fn new(batch_size: usize) -> Self {
        Self {
            rendered_count: 0,
            batch_size: batch_size.max(1),
            loading: false,
            last_group: None,
        }
    }

    fn reset(&mut self) {
        self.rendered_count = 0;
        self.loading = false;
        self.last_group = None;
    }
}

#[derive(Debug)]
pub struct Gallery {
    records: Vec<ImageRecord>,
    facets: Facets,
    filter: FilterState,
    filtered: Vec<usize>,
    render: RenderState,
}

impl Gallery {
    /// Build a gallery from manifest records.
    ///
    /// Records are sorted newest first; invalid dates go last in manifest
    /// order. Nothing is rendered until [`Gallery::apply_filters`] runs.
    pub fn new(mut records: Vec<ImageRecord>, batch_size: usize) -> Self {
        sort_newest_first(&mut records);
        let facets = Facets::from_records(&records);
        let filter = FilterState::default();
        let filtered = apply_filters(&records, &filter);
        Self {
            records,
            facets,
            filter,
            filtered,
            render: RenderState::new(batch_size),
        }
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path, batch_size: usize) -> Result<Self, GalleryError> {
        let content = fs::read_to_string(path).map_err(|source| GalleryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<ImageRecord> =
            serde_json::from_str(&content).map_err(|source| GalleryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded {} images from {}", records.len(), path.display());
        Ok(Self::new(records, batch_size))
    }

    /// Manifest records, newest first.
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    /// Number of records in the current filtered view.
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Records in the current filtered view, in display order.
    pub fn filtered_records(&self) -> impl Iterator<Item = &ImageRecord> {
        self.filtered.iter().map(|&i| &self.records[i])
    }

    pub fn has_more(&self) -> bool {
        self.render.rendered_count < self.filtered.len()
    }

    /// Replace the filter, recompute the view and render its first batch.
    pub fn apply_filters(&mut self, filter: FilterState) -> Vec<RenderOp> {
        self.filter = filter;
        self.filtered = apply_filters(&self.records, &self.filter);
        self.render.reset();
        log::debug!(
            "Filter {:?} matched {} of {}",
            self.filter,
            self.filtered.len(),
            self.records.len()
        );

        let mut ops = vec![RenderOp::Clear, RenderOp::Stats(self.filtered.len())];
        if self.filtered.is_empty() {
            ops.push(RenderOp::NoResults);
            return ops;
        }
        ops.extend(self.render_next_batch());
        ops
    }

    /// Render the next batch of the filtered view.
    ///
    /// Returns no ops while another batch is in progress.
    pub fn render_next_batch(&mut self) -> Vec<RenderOp> {
        if self.render.loading {
            return Vec::new();
        }
        self.render.loading = true;
        let ops = self.build_batch();
        self.render.loading = false;
        ops
    }

    /// Visibility callback for the sentinel at the end of the list.
    pub fn on_sentinel_visible(&mut self) -> Vec<RenderOp> {
        if self.render.loading || !self.has_more() {
            return Vec::new();
        }
        self.render_next_batch()
    }

    /// Detail view for the record at `position` in the filtered view.
    pub fn detail(&self, position: usize) -> Option<DetailView> {
        let record = &self.records[*self.filtered.get(position)?];
        Some(DetailView {
            path: record.path.clone(),
            satellite: record.satellite.clone(),
            event: record.event_or_general().to_string(),
            date: record.date.clone(),
        })
    }

    /// Feed `ops` to `sink` in order.
    pub fn drive(ops: Vec<RenderOp>, sink: &mut dyn RenderSink) {
        for op in ops {
            sink.apply(op);
        }
    }

    fn build_batch(&mut self) -> Vec<RenderOp> {
        let start = self.render.rendered_count;
        let end = (start + self.render.batch_size).min(self.filtered.len());
        if start >= end {
            return vec![RenderOp::Sentinel(SentinelState::Hidden)];
        }

        let batch = (start..end).map(|pos| (pos, &self.records[self.filtered[pos]]));
        let groups = group_by_month(batch);

        let mut ops = Vec::with_capacity(groups.len() + 1);
        let mut last_group = self.render.last_group;
        for (i, group) in groups.iter().enumerate() {
            let cards: Vec<Card> = group
                .items
                .iter()
                .map(|(pos, record)| Card::new(*pos, record))
                .collect();

            if i == 0 && last_group == Some(group.key) {
                ops.push(RenderOp::ExtendGroup {
                    key: group.key,
                    cards,
                });
            } else {
                ops.push(RenderOp::NewGroup {
                    key: group.key,
                    cards,
                });
            }
            last_group = Some(group.key);
        }

        log::debug!(
            "Rendered batch {}..{} as {} group(s)",
            start,
            end,
            groups.len()
        );

        self.render.rendered_count = end;
        self.render.last_group = last_group;

        let sentinel = if self.has_more() {
            SentinelState::Armed
        } else {
            SentinelState::Hidden
        };
        ops.push(RenderOp::Sentinel(sentinel));
        ops
    }
}

/// Newest first; records with unparseable dates after all others.
fn sort_newest_first(records: &mut [ImageRecord]) {
    // Reverse(None) is the largest key; the sort is stable.
    records.sort_by_cached_key(|r| Reverse(parse_timestamp(&r.date)));
}
