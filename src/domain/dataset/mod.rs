//! Dataset Domain Module
//!
//! In-memory tabular layer over the crop production, rainfall and social
//! groups datasets.
//!
//! # Architecture
//!
//! - **Records**: typed rows and the closed column vocabulary
//! - **TabularStore**: immutable holder of the loaded datasets and their summary
//! - **FilterEngine**: compiles `FilterCriteria` into a row predicate
//! - **Aggregator**: reductions, grouped totals and distinct values over a view
//!
//! Views borrow rows from the store; nothing in this module mutates a
//! dataset once it has been loaded.

mod aggregate;
mod errors;
mod filter;
mod records;
mod store;
mod view;

pub use aggregate::{Aggregator, DistinctOrder, GroupTotal, SortOrder, YearReduction, YearValue};
pub use errors::LoadError;
pub use filter::{FilterCriteria, FilterEngine, RowPredicate};
pub use records::{Column, CropRecord, DatasetKind, Month, OpaqueTable, RainfallRecord, Record};
pub use store::{
    CropProductionOverview, DataSummary, RainfallOverview, Table, TableOverview, TabularStore,
    YearRange,
};
pub use view::DatasetView;
