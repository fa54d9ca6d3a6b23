//! GetDataSummaryHandler - Query handler for the loaded datasets' overview.

use std::sync::Arc;

use crate::domain::dataset::{DataSummary, TabularStore};

/// The store never changes after startup, so the summary is computed once.
pub struct GetDataSummaryHandler {
    summary: Arc<DataSummary>,
}

impl GetDataSummaryHandler {
    pub fn new(store: &TabularStore) -> Self {
        Self {
            summary: Arc::new(store.summary()),
        }
    }

    pub fn handle(&self) -> Arc<DataSummary> {
        Arc::clone(&self.summary)
    }
}
