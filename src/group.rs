//! Month grouping.
//!
//! Records are bucketed by the UTC year-month of their date; invalid dates go
//! to [`GroupKey::Unknown`]. Buckets keep their records in input order and are
//! sorted newest month first, Unknown last.
//!
//! The gallery groups `(position, &record)` pairs so cards keep their place in
//! the filtered view; [`Dated`] covers both shapes.

use crate::dates::GroupKey;
use crate::types::ImageRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup<T> {
    pub key: GroupKey,
    pub items: Vec<T>,
}

/// Anything carrying a raw manifest date.
pub trait Dated {
    fn raw_date(&self) -> &str;
}

impl Dated for ImageRecord {
    fn raw_date(&self) -> &str {
        &self.date
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn raw_date(&self) -> &str {
        (**self).raw_date()
    }
}

/// A record tagged with its position in the filtered view.
impl<T: Dated> Dated for (usize, T) {
    fn raw_date(&self) -> &str {
        self.1.raw_date()
    }
}

/// Group `items` by month, newest first.
pub fn group_by_month<T, I>(items: I) -> Vec<MonthGroup<T>>
where
    T: Dated,
    I: IntoIterator<Item = T>,
{
    group_by_key(items, |item| GroupKey::of(item.raw_date()))
}

/// The sort is stable, so two buckets with the same sort key keep first-seen
/// order (only possible for months with a zero or negative year).
fn group_by_key<T, I, F>(items: I, key_of: F) -> Vec<MonthGroup<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> GroupKey,
{
    let mut groups: Vec<MonthGroup<T>> = Vec::new();
    for item in items {
        let key = key_of(&item);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.items.push(item),
            None => groups.push(MonthGroup {
                key,
                items: vec![item],
            }),
        }
    }
    groups.sort_by(|a, b| b.key.sort_key().cmp(&a.key.sort_key()));
    groups
}
