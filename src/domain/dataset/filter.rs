//! FilterEngine - bounded criteria to row predicate.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::{Column, DatasetKind, DatasetView, Record};

/// Optional constraints on a dataset's rows.
///
/// Unknown keys in the incoming JSON are ignored. Text keys that do not
/// apply to the dataset being queried are ignored as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_start: Option<i32>,

    #[serde(
        default,
        deserialize_with = "deserialize_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_end: Option<i32>,
}

impl FilterCriteria {
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_subdivision(mut self, subdivision: impl Into<String>) -> Self {
        self.subdivision = Some(subdivision.into());
        self
    }

    pub fn with_crop(mut self, crop: impl Into<String>) -> Self {
        self.crop = Some(crop.into());
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn with_years(mut self, start: Option<i32>, end: Option<i32>) -> Self {
        self.year_start = start;
        self.year_end = end;
        self
    }

    /// Text constraints that apply to `kind`, as (column, needle) pairs.
    ///
    /// For rainfall, `state` is an alias of `subdivision`; when both are
    /// present `subdivision` wins.
    pub fn text_constraints(&self, kind: DatasetKind) -> Vec<(Column, &str)> {
        match kind {
            DatasetKind::CropProduction => [
                (Column::State, self.state.as_deref()),
                (Column::Crop, self.crop.as_deref()),
                (Column::Season, self.season.as_deref()),
            ]
            .into_iter()
            .filter_map(|(column, needle)| needle.map(|n| (column, n)))
            .collect(),
            DatasetKind::Rainfall => self
                .subdivision
                .as_deref()
                .or(self.state.as_deref())
                .map(|needle| vec![(Column::Subdivision, needle)])
                .unwrap_or_default(),
            DatasetKind::SocialGroups => Vec::new(),
        }
    }
}

/// Accepts integers, integral floats and numeric strings.
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearInput {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let raw: Option<YearInput> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(YearInput::Int(v)) => i32::try_from(v)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("year out of range: {}", v))),
        Some(YearInput::Float(v)) if v.fract() == 0.0 && v.abs() <= f64::from(i32::MAX) => {
            Ok(Some(v as i32))
        }
        Some(YearInput::Float(v)) => Err(de::Error::custom(format!("invalid year: {}", v))),
        Some(YearInput::Text(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid year: '{}'", s))),
    }
}

/// A compiled row predicate for one dataset.
#[derive(Debug, Clone)]
pub struct RowPredicate {
    text: Vec<(Column, String)>,
    year_start: Option<i32>,
    year_end: Option<i32>,
}

impl RowPredicate {
    /// True iff the row satisfies every constraint.
    ///
    /// A missing text cell never matches a text constraint.
    pub fn matches<R: Record>(&self, row: &R) -> bool {
        let year = row.year();
        if self.year_start.is_some_and(|start| year < start) {
            return false;
        }
        if self.year_end.is_some_and(|end| year > end) {
            return false;
        }
        self.text.iter().all(|(column, needle)| {
            row.text(*column)
                .is_some_and(|value| value.to_lowercase().contains(needle.as_str()))
        })
    }

    /// True when the predicate accepts every row.
    pub fn is_unconstrained(&self) -> bool {
        self.text.is_empty() && self.year_start.is_none() && self.year_end.is_none()
    }
}

/// Translates `FilterCriteria` into row predicates and applies them.
pub struct FilterEngine;

impl FilterEngine {
    /// Compiles criteria for a dataset; needles are lower-cased once here.
    pub fn compile(kind: DatasetKind, criteria: &FilterCriteria) -> RowPredicate {
        RowPredicate {
            text: criteria
                .text_constraints(kind)
                .into_iter()
                .map(|(column, needle)| (column, needle.to_lowercase()))
                .collect(),
            year_start: criteria.year_start,
            year_end: criteria.year_end,
        }
    }

    /// Returns a new view holding the rows of `view` that satisfy `criteria`.
    pub fn apply<'a, R: Record>(
        view: &DatasetView<'a, R>,
        criteria: &FilterCriteria,
    ) -> DatasetView<'a, R> {
        let predicate = Self::compile(R::KIND, criteria);
        if predicate.is_unconstrained() {
            return view.clone();
        }
        view.iter().filter(|row| predicate.matches(*row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::{CropRecord, RainfallRecord};
    use proptest::prelude::*;

    fn crop_rows() -> Vec<CropRecord> {
        vec![
            CropRecord::new("Punjab", "Ludhiana", 2010, "Rabi", "Wheat", 100.0, 400.0),
            CropRecord::new("Punjab", "Amritsar", 2012, "Kharif", "Rice", 80.0, 300.0),
            CropRecord::new("Haryana", "Karnal", 2011, "Rabi", "Wheat", 90.0, 350.0),
            CropRecord::new("West Bengal", "Nadia", 2015, "Kharif     ", "Rice", 50.0, 150.0),
        ]
    }

    fn rainfall_rows() -> Vec<RainfallRecord> {
        vec![
            RainfallRecord::new("Coastal Karnataka", 2001, 3500.0),
            RainfallRecord::new("North Interior Karnataka", 2001, 700.0),
            RainfallRecord::new("Kerala", 2002, 2900.0),
        ]
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let rows = crop_rows();
        let view = DatasetView::from_slice(&rows);

        let result = FilterEngine::apply(&view, &FilterCriteria::default().with_state("punj"));

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.state.as_deref() == Some("Punjab")));
    }

    #[test]
    fn missing_cell_never_matches() {
        let mut rows = crop_rows();
        rows[0].crop = None;
        let view = DatasetView::from_slice(&rows);

        let result = FilterEngine::apply(&view, &FilterCriteria::default().with_crop(""));

        assert_eq!(result.len(), 3);
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let rows = crop_rows();
        let view = DatasetView::from_slice(&rows);

        let result = FilterEngine::apply(
            &view,
            &FilterCriteria::default().with_years(Some(2010), Some(2011)),
        );

        let years: Vec<i32> = result.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2010, 2011]);
    }

    #[test]
    fn inverted_year_bounds_yield_empty_view() {
        let rows = crop_rows();
        let view = DatasetView::from_slice(&rows);

        let result = FilterEngine::apply(
            &view,
            &FilterCriteria::default().with_years(Some(2015), Some(2010)),
        );

        assert!(result.is_empty());
    }

    #[test]
    fn keys_combine_with_and() {
        let rows = crop_rows();
        let view = DatasetView::from_slice(&rows);

        let criteria = FilterCriteria::default()
            .with_state("Punjab")
            .with_crop("wheat")
            .with_season("rabi");
        let result = FilterEngine::apply(&view, &criteria);

        assert_eq!(result.len(), 1);
        assert_eq!(result.iter().next().unwrap().district.as_deref(), Some("Ludhiana"));
    }

    #[test]
    fn punjab_filter_on_haryana_only_data_is_empty() {
        let rows = vec![CropRecord::new("Haryana", "Karnal", 2012, "Rabi", "Wheat", 1.0, 2.0)];
        let view = DatasetView::from_slice(&rows);

        let criteria = FilterCriteria::default()
            .with_state("Punjab")
            .with_years(Some(2010), Some(2015));

        assert!(FilterEngine::apply(&view, &criteria).is_empty());
    }

    #[test]
    fn state_aliases_subdivision_for_rainfall() {
        let rows = rainfall_rows();
        let view = DatasetView::from_slice(&rows);

        let result = FilterEngine::apply(&view, &FilterCriteria::default().with_state("karnataka"));

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn subdivision_takes_precedence_over_state() {
        let rows = rainfall_rows();
        let view = DatasetView::from_slice(&rows);

        let criteria = FilterCriteria::default()
            .with_state("karnataka")
            .with_subdivision("kerala");
        let result = FilterEngine::apply(&view, &criteria);

        assert_eq!(result.len(), 1);
        assert_eq!(result.iter().next().unwrap().subdivision.as_deref(), Some("Kerala"));
    }

    #[test]
    fn inapplicable_keys_are_ignored() {
        let rows = rainfall_rows();
        let view = DatasetView::from_slice(&rows);

        let criteria = FilterCriteria::default().with_crop("rice").with_season("kharif");

        assert_eq!(FilterEngine::apply(&view, &criteria).len(), 3);
    }

    #[test]
    fn unknown_json_keys_are_ignored() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"state": "Punjab", "district": "Ludhiana"}"#).unwrap();
        assert_eq!(criteria, FilterCriteria::default().with_state("Punjab"));
    }

    #[test]
    fn years_accept_numeric_strings_and_integral_floats() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"year_start": "2001", "year_end": 2005.0}"#).unwrap();
        assert_eq!(criteria.year_start, Some(2001));
        assert_eq!(criteria.year_end, Some(2005));
    }

    #[test]
    fn non_numeric_year_is_rejected() {
        let result = serde_json::from_str::<FilterCriteria>(r#"{"year_start": "last decade"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn null_year_means_unconstrained() {
        let criteria: FilterCriteria = serde_json::from_str(r#"{"year_start": null}"#).unwrap();
        assert_eq!(criteria.year_start, None);
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            needle in "[a-zA-Z ]{0,4}",
            start in proptest::option::of(2008i32..2017),
            end in proptest::option::of(2008i32..2017),
        ) {
            let rows = crop_rows();
            let view = DatasetView::from_slice(&rows);
            let criteria = FilterCriteria::default()
                .with_state(needle.clone())
                .with_years(start, end);

            let once = FilterEngine::apply(&view, &criteria);
            let twice = FilterEngine::apply(&once, &criteria);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn filtered_rows_respect_year_bounds(start in 2008i32..2017, end in 2008i32..2017) {
            let rows = crop_rows();
            let view = DatasetView::from_slice(&rows);
            let criteria = FilterCriteria::default().with_years(Some(start), Some(end));

            for row in FilterEngine::apply(&view, &criteria).iter() {
                prop_assert!(row.year >= start && row.year <= end);
            }
        }
    }
}
