//! Filter state and the pure filtering pass.
//!
//! Four independent predicates, each defaulting to "match all":
//!
//! | Predicate | Matches when |
//! |-----------|--------------|
//! | satellite | `All`, or equal to `record.satellite` |
//! | month     | `All`, or equal to the record's UTC year-month (invalid dates never match) |
//! | event     | `All`, or equal to the record's event with `General` substituted for empty |
//! | search    | empty, or a case-insensitive substring of satellite, event, or raw date |
//!
//! A record is kept when all four match. Output preserves manifest order.

use crate::dates::MonthKey;
use crate::types::ImageRecord;

/// One facet selection: everything, or a single value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    /// True only for an explicit selection of `value`.
    pub fn is_only(&self, value: &T) -> bool {
        matches!(self, Selection::Only(wanted) if wanted == value)
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map(Selection::Only).unwrap_or(Selection::All)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub satellite: Selection<String>,
    pub month: Selection<MonthKey>,
    pub event: Selection<String>,
    /// Raw search box text; matching lowercases it.
    pub search: String,
}

impl FilterState {
    /// True when no predicate narrows the result.
    pub fn is_unfiltered(&self) -> bool {
        self.satellite == Selection::All
            && self.month == Selection::All
            && self.event == Selection::All
            && self.search.is_empty()
    }

    /// Active predicates as one line, e.g. `Filtered by satellite ISS, month 2025-04`.
    pub fn summary(&self) -> Option<String> {
        if self.is_unfiltered() {
            return None;
        }
        let mut parts = Vec::new();
        if let Selection::Only(satellite) = &self.satellite {
            parts.push(format!("satellite {satellite}"));
        }
        if let Selection::Only(month) = &self.month {
            parts.push(format!("month {month}"));
        }
        if let Selection::Only(event) = &self.event {
            parts.push(format!("event {event}"));
        }
        if !self.search.is_empty() {
            parts.push(format!("search \"{}\"", self.search));
        }
        Some(format!("Filtered by {}", parts.join(", ")))
    }

    pub fn matches(&self, record: &ImageRecord) -> bool {
        self.matches_with_term(record, &self.search.to_lowercase())
    }

    fn matches_with_term(&self, record: &ImageRecord, term: &str) -> bool {
        let satellite_ok = self.satellite.matches(&record.satellite);
        let month_ok = match &self.month {
            Selection::All => true,
            Selection::Only(key) => MonthKey::of(&record.date).as_ref() == Some(key),
        };
        let event_ok = match &self.event {
            Selection::All => true,
            Selection::Only(e) => e == record.event_or_general(),
        };
        satellite_ok && month_ok && event_ok && matches_search(record, term)
    }
}

/// `term` must already be lowercase.
fn matches_search(record: &ImageRecord, term: &str) -> bool {
    term.is_empty()
        || record.satellite.to_lowercase().contains(term)
        || record.event_or_general().to_lowercase().contains(term)
        || record.date.to_lowercase().contains(term)
}

/// Indices of the records matching `filter`, in manifest order.
pub fn apply_filters(records: &[ImageRecord], filter: &FilterState) -> Vec<usize> {
    let term = filter.search.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches_with_term(r, &term))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn sample() -> Vec<ImageRecord> {
        vec![
            record("ISS", "ARISS Series 23", "2025-04-12T07:09:59Z"),
            record("NOAA-19", "", "2025-04-11T19:32:00Z"),
            record("NOAA-19", "Hurricane Watch", "2025-03-02T06:15:00Z"),
            record("METEOR-M2", "Winter Solstice", "2024-12-21T09:30:00Z"),
            record("ISS", "", "not a date"),
        ]
    }

    #[test]
    fn unfiltered_returns_everything_in_order() {
        let records = sample();
        let filter = FilterState::default();
        assert!(filter.is_unfiltered());
        assert_eq!(apply_filters(&records, &filter), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn empty_manifest() {
        assert!(apply_filters(&[], &FilterState::default()).is_empty());
    }

    #[test]
    fn satellite_equality() {
        let records = sample();
        let filter = FilterState {
            satellite: Selection::Only("NOAA-19".into()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filter), vec![1, 2]);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(filter.matches(r), r.satellite == "NOAA-19", "record {i}");
        }
    }

    #[test]
    fn satellite_is_not_substring_match() {
        let records = sample();
        let filter = FilterState {
            satellite: Selection::Only("NOAA".into()),
            ..Default::default()
        };
        assert!(apply_filters(&records, &filter).is_empty());
    }

    #[test]
    fn month_filter_uses_utc_month() {
        let records = sample();
        let filter = FilterState {
            month: Selection::Only(MonthKey::new(2025, 4)),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filter), vec![0, 1]);
    }

    #[test]
    fn month_filter_never_matches_invalid_date() {
        let records = vec![record("ISS", "", "garbage")];
        let filter = FilterState {
            month: Selection::Only(MonthKey::new(2025, 4)),
            ..Default::default()
        };
        assert!(apply_filters(&records, &filter).is_empty());
    }

    #[test]
    fn event_filter_substitutes_general() {
        let records = sample();
        let filter = FilterState {
            event: Selection::Only("General".into()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filter), vec![1, 4]);
    }

    #[test]
    fn search_is_case_insensitive_partial() {
        let records = sample();
        let by_satellite = FilterState {
            search: "noaa".into(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &by_satellite), vec![1, 2]);

        let by_event = FilterState {
            search: "HURRICANE".into(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &by_event), vec![2]);

        let by_date = FilterState {
            search: "2024-12".into(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &by_date), vec![3]);
    }

    #[test]
    fn search_matches_date_case_insensitively() {
        let records = sample();
        let filter = FilterState {
            search: "t07:09".into(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filter), vec![0]);
    }

    #[test]
    fn search_matches_general_substitute() {
        let records = sample();
        let filter = FilterState {
            search: "gener".into(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filter), vec![1, 4]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let records = sample();
        let filter = FilterState {
            satellite: Selection::Only("NOAA-19".into()),
            month: Selection::Only(MonthKey::new(2025, 3)),
            search: "watch".into(),
            ..Default::default()
        };
        assert!(!filter.is_unfiltered());
        assert_eq!(apply_filters(&records, &filter), vec![2]);
    }

    #[test]
    fn summary_lists_active_predicates() {
        assert_eq!(FilterState::default().summary(), None);

        let filter = FilterState {
            satellite: Selection::Only("NOAA-19".into()),
            month: Selection::Only(MonthKey::new(2025, 3)),
            search: "watch".into(),
            ..Default::default()
        };
        assert_eq!(
            filter.summary().as_deref(),
            Some("Filtered by satellite NOAA-19, month 2025-03, search \"watch\"")
        );
    }

    #[test]
    fn selection_from_option() {
        assert_eq!(Selection::<String>::from(None), Selection::All);
        assert_eq!(
            Selection::from(Some("ISS".to_string())),
            Selection::Only("ISS".to_string())
        );
        assert!(Selection::Only(3).matches(&3));
        assert!(!Selection::Only(3).matches(&4));
        assert!(Selection::All.matches(&4));
        assert!(!Selection::All.is_only(&4));
        assert!(Selection::Only(4).is_only(&4));
    }
}
