//! Aggregator - numeric reductions and groupings over a view.
//!
//! Reductions skip missing cells. When nothing is left to reduce the result
//! is `None`, which serializes as `null`; NaN never leaves this module.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::{Column, DatasetView, Record, YearRange};

/// Ordering of grouped totals by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Ordering of distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctOrder {
    FirstSeen,
    Sorted,
}

/// Per-year reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearReduction {
    Sum,
    Mean,
}

/// Summed value of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub group: String,
    pub total: f64,
}

/// Reduced value of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub value: Option<f64>,
}

/// Read-only aggregation over a filtered view.
pub struct Aggregator<'v, 'a, R> {
    view: &'v DatasetView<'a, R>,
}

impl<'v, 'a, R: Record> Aggregator<'v, 'a, R> {
    pub fn new(view: &'v DatasetView<'a, R>) -> Self {
        Self { view }
    }

    fn values(&self, column: Column) -> Vec<f64> {
        self.view.iter().filter_map(|row| row.number(column)).collect()
    }

    /// Sum of non-missing values.
    pub fn sum(&self, column: Column) -> Option<f64> {
        self.values(column)
            .into_iter()
            .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
    }

    /// Arithmetic mean of non-missing values.
    pub fn mean(&self, column: Column) -> Option<f64> {
        let (sum, count) = self
            .values(column)
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    pub fn min(&self, column: Column) -> Option<f64> {
        self.values(column).into_iter().min_by(f64::total_cmp)
    }

    pub fn max(&self, column: Column) -> Option<f64> {
        self.values(column).into_iter().max_by(f64::total_cmp)
    }

    /// Inclusive range of the year column.
    pub fn year_range(&self) -> Option<YearRange> {
        let mut years = self.view.iter().map(|row| row.year());
        let first = years.next()?;
        let (min, max) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Some(YearRange(min, max))
    }

    /// Sums `value` per distinct `group` and keeps the first `top_n` groups.
    ///
    /// Groups are ordered by total (descending unless `order` says
    /// otherwise); equal totals fall back to the group key, ascending. Rows
    /// with a missing group key are skipped; missing values add nothing.
    pub fn group_sum(
        &self,
        group: Column,
        value: Column,
        top_n: usize,
        order: SortOrder,
    ) -> Vec<GroupTotal> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for row in self.view.iter() {
            if let Some(key) = row.text(group) {
                *totals.entry(key).or_insert(0.0) += row.number(value).unwrap_or(0.0);
            }
        }

        let mut ranked: Vec<GroupTotal> = totals
            .into_iter()
            .map(|(group, total)| GroupTotal {
                group: group.to_string(),
                total,
            })
            .collect();

        ranked.sort_by(|a, b| {
            let by_value = match order {
                SortOrder::Descending => b.total.total_cmp(&a.total),
                SortOrder::Ascending => a.total.total_cmp(&b.total),
            };
            by_value.then_with(|| a.group.cmp(&b.group))
        });
        ranked.truncate(top_n);
        ranked
    }

    /// One value per distinct year, ascending by year.
    ///
    /// A year whose cells are all missing is reported with no value.
    pub fn group_reduce_by_year(&self, value: Column, op: YearReduction) -> Vec<YearValue> {
        let mut per_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for row in self.view.iter() {
            let entry = per_year.entry(row.year()).or_insert((0.0, 0));
            if let Some(v) = row.number(value) {
                entry.0 += v;
                entry.1 += 1;
            }
        }

        per_year
            .into_iter()
            .map(|(year, (sum, count))| YearValue {
                year,
                value: (count > 0).then(|| match op {
                    YearReduction::Sum => sum,
                    YearReduction::Mean => sum / count as f64,
                }),
            })
            .collect()
    }

    /// Distinct non-missing values of a text column.
    pub fn distinct(
        &self,
        column: Column,
        order: DistinctOrder,
        limit: Option<usize>,
    ) -> Vec<String> {
        let cells = self.view.iter().filter_map(|row| row.text(column));
        let mut values: Vec<String> = match order {
            DistinctOrder::Sorted => cells
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect(),
            DistinctOrder::FirstSeen => {
                let mut seen = HashSet::new();
                cells
                    .filter(|value| seen.insert(*value))
                    .map(str::to_string)
                    .collect()
            }
        };
        if let Some(limit) = limit {
            values.truncate(limit);
        }
        values
    }
}
