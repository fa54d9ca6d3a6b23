//! TabularStore - immutable holder of the loaded datasets.

use serde::Serialize;

use super::{
    Aggregator, Column, CropRecord, DatasetKind, DatasetView, DistinctOrder, LoadError,
    OpaqueTable, RainfallRecord, Record,
};
use crate::ports::DatasetSource;

/// Inclusive `[start, end]` year range; serializes as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange(pub i32, pub i32);

/// A loaded, typed table with its source column list.
#[derive(Debug, Clone)]
pub struct Table<R> {
    columns: Vec<String>,
    rows: Vec<R>,
}

impl<R: Record> Table<R> {
    pub fn new(columns: Vec<String>, rows: Vec<R>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// View over every row.
    pub fn view(&self) -> DatasetView<'_, R> {
        DatasetView::from_slice(&self.rows)
    }
}

/// Shape-only summary of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOverview {
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Summary of the crop production dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropProductionOverview {
    pub rows: usize,
    pub columns: Vec<String>,
    pub states: Vec<String>,
    pub crops: Vec<String>,
    pub seasons: Vec<String>,
    pub year_range: Option<YearRange>,
}

/// Summary of the rainfall dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RainfallOverview {
    pub rows: usize,
    pub columns: Vec<String>,
    pub subdivisions: Vec<String>,
    pub year_range: Option<YearRange>,
}

/// Summary of every present dataset. Absent datasets are `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataSummary {
    pub crop_production: Option<CropProductionOverview>,
    pub rainfall: Option<RainfallOverview>,
    pub social_groups: Option<TableOverview>,
}

/// Holds the three datasets for the lifetime of the process.
///
/// There are no mutation methods; share it behind an `Arc` and read from
/// any number of tasks.
#[derive(Debug, Clone, Default)]
pub struct TabularStore {
    crop_production: Option<Table<CropRecord>>,
    rainfall: Option<Table<RainfallRecord>>,
    social_groups: Option<OpaqueTable>,
}

impl TabularStore {
    /// Loads every dataset from `source`.
    ///
    /// A dataset the source reports as absent stays absent; any load error
    /// aborts.
    pub fn load(source: &dyn DatasetSource) -> Result<Self, LoadError> {
        let crop_production = source.load_crop_production()?;
        let rainfall = source.load_rainfall()?;
        let social_groups = source.load_social_groups()?;

        let store = Self::from_tables(crop_production, rainfall, social_groups);
        for kind in [
            DatasetKind::CropProduction,
            DatasetKind::Rainfall,
            DatasetKind::SocialGroups,
        ] {
            match store.row_count(kind) {
                Some(rows) => tracing::info!(dataset = %kind, rows, "Loaded dataset"),
                None => tracing::warn!(dataset = %kind, "Dataset not found, queries will return no data"),
            }
        }
        Ok(store)
    }

    /// Builds a store from already-loaded tables.
    pub fn from_tables(
        crop_production: Option<Table<CropRecord>>,
        rainfall: Option<Table<RainfallRecord>>,
        social_groups: Option<OpaqueTable>,
    ) -> Self {
        Self {
            crop_production,
            rainfall,
            social_groups,
        }
    }

    pub fn crop_production(&self) -> Option<&Table<CropRecord>> {
        self.crop_production.as_ref()
    }

    pub fn rainfall(&self) -> Option<&Table<RainfallRecord>> {
        self.rainfall.as_ref()
    }

    pub fn social_groups(&self) -> Option<&OpaqueTable> {
        self.social_groups.as_ref()
    }

    /// All crop rows, or an empty view when the dataset is absent.
    pub fn crop_view(&self) -> DatasetView<'_, CropRecord> {
        self.crop_production
            .as_ref()
            .map(Table::view)
            .unwrap_or_else(DatasetView::empty)
    }

    /// All rainfall rows, or an empty view when the dataset is absent.
    pub fn rainfall_view(&self) -> DatasetView<'_, RainfallRecord> {
        self.rainfall
            .as_ref()
            .map(Table::view)
            .unwrap_or_else(DatasetView::empty)
    }

    /// Row count of a dataset, `None` when absent.
    pub fn row_count(&self, kind: DatasetKind) -> Option<usize> {
        match kind {
            DatasetKind::CropProduction => self.crop_production.as_ref().map(Table::len),
            DatasetKind::Rainfall => self.rainfall.as_ref().map(Table::len),
            DatasetKind::SocialGroups => self.social_groups.as_ref().map(|t| t.row_count),
        }
    }

    /// Per-dataset shape plus sorted category values and year range.
    pub fn summary(&self) -> DataSummary {
        DataSummary {
            crop_production: self.crop_production.as_ref().map(|table| {
                let view = table.view();
                let agg = Aggregator::new(&view);
                CropProductionOverview {
                    rows: table.len(),
                    columns: table.columns().to_vec(),
                    states: agg.distinct(Column::State, DistinctOrder::Sorted, None),
                    crops: agg.distinct(Column::Crop, DistinctOrder::Sorted, None),
                    seasons: agg.distinct(Column::Season, DistinctOrder::Sorted, None),
                    year_range: agg.year_range(),
                }
            }),
            rainfall: self.rainfall.as_ref().map(|table| {
                let view = table.view();
                let agg = Aggregator::new(&view);
                RainfallOverview {
                    rows: table.len(),
                    columns: table.columns().to_vec(),
                    subdivisions: agg.distinct(Column::Subdivision, DistinctOrder::Sorted, None),
                    year_range: agg.year_range(),
                }
            }),
            social_groups: self.social_groups.as_ref().map(|table| TableOverview {
                rows: table.row_count,
                columns: table.columns.clone(),
            }),
        }
    }
}
