//! Fixed summary shapes returned to the reasoning engine.

use serde::Serialize;

use crate::domain::dataset::{
    Aggregator, Column, CropRecord, DatasetView, DistinctOrder, GroupTotal, RainfallRecord,
    SortOrder, YearRange, YearReduction, YearValue,
};

use super::ExecutorLimits;

/// Summary of the crop rows matching one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropProductionSummary {
    pub total_rows: usize,
    pub states: Vec<String>,
    pub crops: Vec<String>,
    pub year_range: YearRange,
    pub total_production: Option<f64>,
    pub total_area: Option<f64>,
    pub top_crops_by_production: Vec<GroupTotal>,
    pub production_by_year: Vec<YearValue>,
    pub districts: Vec<String>,
}

impl CropProductionSummary {
    /// Summarizes a view; `None` when the view is empty.
    pub fn from_view(view: &DatasetView<'_, CropRecord>, limits: &ExecutorLimits) -> Option<Self> {
        let agg = Aggregator::new(view);
        let year_range = agg.year_range()?;

        Some(Self {
            total_rows: view.len(),
            states: agg.distinct(Column::State, DistinctOrder::FirstSeen, None),
            crops: agg.distinct(Column::Crop, DistinctOrder::FirstSeen, None),
            year_range,
            total_production: agg.sum(Column::Production),
            total_area: agg.sum(Column::Area),
            top_crops_by_production: agg.group_sum(
                Column::Crop,
                Column::Production,
                limits.top_crops,
                SortOrder::Descending,
            ),
            production_by_year: agg.group_reduce_by_year(Column::Production, YearReduction::Sum),
            districts: agg.distinct(
                Column::District,
                DistinctOrder::FirstSeen,
                Some(limits.districts),
            ),
        })
    }
}

/// Summary of the rainfall rows matching one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainfallSummary {
    pub total_rows: usize,
    pub subdivisions: Vec<String>,
    pub year_range: YearRange,
    pub average_annual_rainfall: Option<f64>,
    pub min_rainfall: Option<f64>,
    pub max_rainfall: Option<f64>,
    pub rainfall_by_year: Vec<YearValue>,
}

impl RainfallSummary {
    /// Summarizes a view; `None` when the view is empty.
    pub fn from_view(view: &DatasetView<'_, RainfallRecord>) -> Option<Self> {
        let agg = Aggregator::new(view);
        let year_range = agg.year_range()?;

        Some(Self {
            total_rows: view.len(),
            subdivisions: agg.distinct(Column::Subdivision, DistinctOrder::FirstSeen, None),
            year_range,
            average_annual_rainfall: agg.mean(Column::Annual),
            min_rainfall: agg.min(Column::Annual),
            max_rainfall: agg.max(Column::Annual),
            rainfall_by_year: agg.group_reduce_by_year(Column::Annual, YearReduction::Mean),
        })
    }
}
