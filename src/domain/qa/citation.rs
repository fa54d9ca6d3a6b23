//! Source citations derived from execution results.

use serde::Serialize;

use crate::domain::query::{ExecutionResults, RequestType};

/// A citable data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataSource {
    CropProduction,
    Rainfall,
    GeneralKnowledge,
}

impl DataSource {
    pub fn citation(&self) -> &'static str {
        match self {
            DataSource::CropProduction => {
                "Ministry of Agriculture & Farmers Welfare - Crop Production Dataset"
            }
            DataSource::Rainfall => "India Meteorological Department - Rainfall Dataset",
            DataSource::GeneralKnowledge => "General knowledge",
        }
    }

    /// Source behind a result label, if the label names a dataset.
    pub fn for_label(label: &str) -> Option<Self> {
        if label.starts_with(RequestType::CropProduction.label_prefix()) {
            Some(DataSource::CropProduction)
        } else if label.starts_with(RequestType::Rainfall.label_prefix()) {
            Some(DataSource::Rainfall)
        } else {
            None
        }
    }
}

/// Deduplicated citations for every dataset label in `results`, in order of
/// first appearance. `error_*` labels cite nothing.
pub fn cite(results: &ExecutionResults) -> Vec<String> {
    let mut sources: Vec<DataSource> = Vec::new();
    for source in results.labels().filter_map(DataSource::for_label) {
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
    sources
        .into_iter()
        .map(|source| source.citation().to_string())
        .collect()
}
