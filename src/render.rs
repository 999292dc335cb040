//! Static HTML display surface.
//!
//! [`HtmlSink`] consumes the same render ops as the terminal sink and keeps
//! the resulting sections in memory; [`render_page`] wraps them in a full
//! document with the sidebar facets and a CSS-only detail overlay per card.
//!
//! ## Markup
//!
//! ```text
//! main#gallery
//! ├── h2.date-group-header        "April 2025"
//! ├── div.gallery-grid
//! │   └── a.card href="#detail-0"
//! │       ├── div.card-image-wrapper > img.card-image loading=lazy
//! │       └── div.card-info > h3.card-title, div.card-meta
//! └── ...
//! div.lightbox#detail-0           shown via :target
//! ```
//!
//! The page needs no JavaScript: facet entries are plain markup reflecting
//! the selection the page was rendered with, and the detail overlay opens
//! through the URL fragment.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating,
//! which escapes every interpolated value.

use crate::dates::GroupKey;
use crate::facets::Facets;
use crate::filter::{FilterState, Selection};
use crate::gallery::{Card, DetailView, RenderOp, RenderSink, SentinelState};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/style.css");

#[derive(Debug)]
struct Section {
    key: GroupKey,
    cards: Vec<Card>,
}

/// HTML display surface that accumulates the card area.
#[derive(Debug, Default)]
pub struct HtmlSink {
    sections: Vec<Section>,
    stats: Option<usize>,
    no_results: bool,
    sentinel: Option<SentinelState>,
}

impl HtmlSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions of every card rendered so far, in display order.
    pub fn card_positions(&self) -> Vec<usize> {
        self.sections
            .iter()
            .flat_map(|s| s.cards.iter().map(|c| c.position))
            .collect()
    }

    pub fn stats(&self) -> Option<usize> {
        self.stats
    }

    /// Markup for the card area.
    pub fn to_markup(&self) -> Markup {
        html! {
            @if self.no_results {
                div.no-results { "No matching images" }
            }
            @for section in &self.sections {
                h2.date-group-header data-month=(section.key.sort_key()) { (section.key.label()) }
                div.gallery-grid {
                    @for card in &section.cards {
                        (render_card(card))
                    }
                }
            }
            @if self.sentinel == Some(SentinelState::Armed) {
                div.sentinel { div.loading-spinner {} }
            }
        }
    }
}

impl RenderSink for HtmlSink {
    fn apply(&mut self, op: RenderOp) {
        match op {
            RenderOp::Clear => {
                self.sections.clear();
                self.no_results = false;
                self.sentinel = None;
            }
            RenderOp::Stats(n) => self.stats = Some(n),
            RenderOp::NoResults => self.no_results = true,
            RenderOp::NewGroup { key, cards } => self.sections.push(Section { key, cards }),
            RenderOp::ExtendGroup { key, cards } => match self.sections.last_mut() {
                Some(last) if last.key == key => last.cards.extend(cards),
                _ => self.sections.push(Section { key, cards }),
            },
            RenderOp::Sentinel(state) => self.sentinel = Some(state),
        }
    }
}

fn detail_anchor(position: usize) -> String {
    format!("detail-{position}")
}

/// A single thumbnail card linking to its detail overlay.
pub fn render_card(card: &Card) -> Markup {
    html! {
        a.card href=(format!("#{}", detail_anchor(card.position))) {
            div.card-image-wrapper {
                img.card-image
                    src=(card.path)
                    alt=(format!("{} - {}", card.satellite, card.event))
                    loading="lazy";
            }
            div.card-info {
                h3.card-title { (card.satellite) }
                div.card-meta {
                    span.event-tag { (card.event) }
                    span.date { (card.date_label) }
                }
            }
        }
    }
}

/// The detail overlay for one image.
pub fn render_detail(position: usize, detail: &DetailView) -> Markup {
    html! {
        div.lightbox id=(detail_anchor(position)) {
            a.close href="#" { "\u{00d7}" }
            img src=(detail.path) alt=(detail.satellite);
            div.caption {
                strong { (detail.satellite) }
                br;
                (detail.event) " - " (detail.date)
            }
        }
    }
}

fn render_sidebar(facets: &Facets, filter: &FilterState) -> Markup {
    html! {
        aside.sidebar id="sidebar" {
            h2 { "Satellites" }
            div id="satelliteFilters" {
                span.filter-btn.active[filter.satellite == Selection::All] data-filter="all" { "All" }
                @for satellite in &facets.satellites {
                    span.filter-btn.active[filter.satellite.is_only(satellite)]
                        data-filter=(satellite) { (satellite) }
                }
            }
            h2 { "Dates" }
            ul.archive-list id="dateArchive" {
                li {
                    a.active[filter.month == Selection::All] {
                        span { "All dates" }
                        span.archive-count { "[" (facets.total) "]" }
                    }
                }
                @for month in &facets.months {
                    li {
                        a.active[filter.month.is_only(&month.value)] data-month=(month.value) {
                            span { (month.value.label()) }
                            span.archive-count { "[" (month.count) "]" }
                        }
                    }
                }
            }
            h2 { "Events" }
            ul.archive-list id="eventArchive" {
                li {
                    a.active[filter.event == Selection::All] {
                        span { "All events" }
                        span.archive-count { "[" (facets.total) "]" }
                    }
                }
                @for event in &facets.events {
                    li {
                        a.active[filter.event.is_only(&event.value)] data-event=(event.value) {
                            span { (event.value) }
                            span.archive-count { "[" (event.count) "]" }
                        }
                    }
                }
            }
        }
    }
}

/// Inputs for a full gallery page.
pub struct PageContext<'a> {
    pub title: &'a str,
    pub facets: &'a Facets,
    pub filter: &'a FilterState,
    pub details: &'a [(usize, DetailView)],
}

/// A complete standalone HTML document.
pub fn render_page(ctx: &PageContext<'_>, gallery: &HtmlSink) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (ctx.title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.main-layout {
                    (render_sidebar(ctx.facets, ctx.filter))
                    div.content {
                        h1 { (ctx.title) }
                        @if let Some(n) = gallery.stats() {
                            p.gallery-stats id="gallery-stats" { "Showing " (n) " images" }
                        }
                        @if let Some(summary) = ctx.filter.summary() {
                            p.filter-summary { (summary) }
                        }
                        main id="gallery" { (gallery.to_markup()) }
                    }
                }
                @for (position, detail) in ctx.details {
                    (render_detail(*position, detail))
                }
            }
        }
    }
}

/// A minimal page carrying only an inline error, for a manifest that failed to load.
pub fn render_error_page(title: &str, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.error { (message) }
            }
        }
    }
}
