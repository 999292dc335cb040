//! Sidebar facets, computed once from the full manifest.
//!
//! Facets never change after load; only the active selection among them
//! does. Counts always refer to the whole manifest, not the filtered view.
//!
//! Ordering rules:
//!
//! - **Satellites**: first appearance in the (date-sorted) manifest
//! - **Months**: newest first; records with invalid dates are not counted
//! - **Events**: most images first, ties in first-appearance order, and
//!   `General` always last regardless of its count

use crate::dates::MonthKey;
use crate::types::{GENERAL_EVENT, ImageRecord};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount<T> {
    pub value: T,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facets {
    /// Size of the manifest, shown next to the "all" entries.
    pub total: usize,
    pub satellites: Vec<String>,
    pub months: Vec<FacetCount<MonthKey>>,
    pub events: Vec<FacetCount<String>>,
}

impl Facets {
    pub fn from_records(records: &[ImageRecord]) -> Self {
        let mut satellites: Vec<String> = Vec::new();
        for record in records {
            if !satellites.contains(&record.satellite) {
                satellites.push(record.satellite.clone());
            }
        }

        let mut months = count_in_order(records.iter().filter_map(|r| MonthKey::of(&r.date)));
        months.sort_by(|a, b| b.value.cmp(&a.value));

        let mut events =
            count_in_order(records.iter().map(|r| r.event_or_general().to_string()));
        events.sort_by(|a, b| {
            let a_general = a.value == GENERAL_EVENT;
            let b_general = b.value == GENERAL_EVENT;
            a_general
                .cmp(&b_general)
                .then_with(|| b.count.cmp(&a.count))
        });

        Self {
            total: records.len(),
            satellites,
            months,
            events,
        }
    }
}

/// Count values, returning entries in first-appearance order.
fn count_in_order<T, I>(values: I) -> Vec<FacetCount<T>>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<FacetCount<T>> = Vec::new();
    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push(FacetCount { value, count: 1 });
            }
        }
    }
    counts
}
