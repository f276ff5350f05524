//! Derived views - read-only projections over a store snapshot.
//!
//! A [`View`] borrows records and narrows, orders, or folds them without ever
//! touching the store. Everything is recomputed per call; collections are
//! small (dozens of records at most).
//!
//! ```ignore
//! let active_high = manager
//!     .view()
//!     .where_eq(|r| r.status, AllocationStatus::Active)
//!     .where_eq(|r| r.priority, Priority::High);
//!
//! let share = percentage_of(active_high.sum(|r| r.budget), manager.view().sum(|r| r.budget));
//! ```

mod aggregate;

pub use aggregate::{percentage_of, round_to_tenth, GroupStats, Reducer};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Record, RecordId};

/// Sort direction for [`View::sort`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn toggle(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// A typed column a view can be ordered by.
///
/// Implemented by small per-entity enums so sort options chosen in a UI map
/// to accessor code rather than to field-name strings.
pub trait SortKey<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// A typed numeric column that can be summed, averaged, or grouped.
pub trait Metric<T> {
    fn value(&self, record: &T) -> f64;
}

/// An ordered, borrowed selection of records.
#[derive(Debug)]
pub struct View<'a, T> {
    records: Vec<&'a Record<T>>,
}

impl<T> Clone for View<'_, T> {
    fn clone(&self) -> Self {
        View {
            records: self.records.clone(),
        }
    }
}

impl<'a, T: Entity> View<'a, T> {
    pub fn new(records: &'a [Record<T>]) -> Self {
        View {
            records: records.iter().collect(),
        }
    }

    /// Keep records matching `predicate`. Chained filters combine with AND.
    pub fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool,
    {
        self.records.retain(|record| predicate(&record.fields));
        self
    }

    /// Keep records whose field (read through `field`) equals `value`.
    pub fn where_eq<V, F>(self, field: F, value: V) -> Self
    where
        V: PartialEq,
        F: Fn(&T) -> V,
    {
        self.filter(|fields| field(fields) == value)
    }

    /// Case-insensitive substring match over the entity's search fields.
    /// A blank needle keeps everything.
    pub fn search(self, needle: &str) -> Self {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return self;
        }
        self.filter(|fields| {
            fields
                .search_text()
                .iter()
                .any(|text| text.to_lowercase().contains(&needle))
        })
    }

    /// Stable sort by a typed key.
    pub fn sort<K: SortKey<T>>(mut self, key: &K, direction: Direction) -> Self {
        self.records
            .sort_by(|a, b| direction.apply(key.compare(&a.fields, &b.fields)));
        self
    }

    /// Stable sort by any `Ord` projection.
    pub fn sort_by_key<K, F>(mut self, key: F, direction: Direction) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        self.records
            .sort_by(|a, b| direction.apply(key(&a.fields).cmp(&key(&b.fields))));
        self
    }

    pub fn records(&self) -> &[&'a Record<T>] {
        &self.records
    }

    pub fn first(&self) -> Option<&'a Record<T>> {
        self.records.first().copied()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|record| record.id).collect()
    }

    pub fn labels(&self) -> Vec<&'a str> {
        self.records.iter().map(|record| record.label()).collect()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fold a numeric selector over the selection.
    pub fn aggregate<F>(&self, selector: F, reducer: Reducer) -> f64
    where
        F: Fn(&T) -> f64,
    {
        reducer.reduce(self.records.iter().map(|record| selector(&record.fields)))
    }

    /// [`aggregate`](Self::aggregate) over a typed metric.
    pub fn aggregate_metric<M: Metric<T>>(&self, metric: &M, reducer: Reducer) -> f64 {
        self.aggregate(|fields| metric.value(fields), reducer)
    }

    pub fn sum<F>(&self, selector: F) -> f64
    where
        F: Fn(&T) -> f64,
    {
        self.aggregate(selector, Reducer::Sum)
    }

    pub fn average<F>(&self, selector: F) -> f64
    where
        F: Fn(&T) -> f64,
    {
        self.aggregate(selector, Reducer::Average)
    }

    /// Share of `whole`'s total held by this selection, in percent.
    pub fn share_of<F>(&self, whole: &View<'_, T>, selector: F) -> f64
    where
        F: Fn(&T) -> f64,
    {
        percentage_of(self.sum(&selector), whole.sum(&selector))
    }

    /// Count of this selection relative to `whole`'s count, in percent.
    pub fn count_share_of(&self, whole: &View<'_, T>) -> f64 {
        percentage_of(self.count() as f64, whole.count() as f64)
    }

    /// Partition by a key (usually an enumerated field) and count each part.
    pub fn group_by<K, F>(&self, key: F) -> BTreeMap<K, GroupStats>
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        self.group_sum(key, |_| 0.0)
    }

    /// Partition by a key and count and sum a numeric selector per part.
    pub fn group_sum<K, F, S>(&self, key: F, selector: S) -> BTreeMap<K, GroupStats>
    where
        K: Ord,
        F: Fn(&T) -> K,
        S: Fn(&T) -> f64,
    {
        let mut groups: BTreeMap<K, GroupStats> = BTreeMap::new();
        for record in &self.records {
            let stats = groups.entry(key(&record.fields)).or_default();
            stats.count += 1;
            stats.sum += selector(&record.fields);
        }
        groups
    }
}

impl<'a, T> IntoIterator for View<'a, T> {
    type Item = &'a Record<T>;
    type IntoIter = std::vec::IntoIter<&'a Record<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
