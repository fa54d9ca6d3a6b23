//! DataRequestExecutor - runs a batch of data requests against the store.
//!
//! Each request gets its own label and outcome. A failing or empty request
//! never prevents the rest of the batch from running.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::dataset::{FilterEngine, TabularStore};

use super::{CropProductionSummary, DataRequest, RainfallSummary, RequestError, RequestType};

/// Error text for a request whose filters match no rows.
pub const NO_DATA_MESSAGE: &str = "No data found for given filters";

/// Caps applied to the list-valued parts of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorLimits {
    pub top_crops: usize,
    pub districts: usize,
}

impl Default for ExecutorLimits {
    fn default() -> Self {
        Self {
            top_crops: 10,
            districts: 20,
        }
    }
}

/// Result of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestOutcome {
    Crop(CropProductionSummary),
    Rainfall(RainfallSummary),
    Error { error: String },
}

impl RequestOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn no_data() -> Self {
        Self::error(NO_DATA_MESSAGE)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Labelled outcomes in request order. Serializes as a JSON object whose
/// keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResults {
    entries: Vec<(String, RequestOutcome)>,
}

impl ExecutionResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, outcome: RequestOutcome) {
        self.entries.push((label.into(), outcome));
    }

    pub fn get(&self, label: &str) -> Option<&RequestOutcome> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, outcome)| outcome)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RequestOutcome)> {
        self.entries
            .iter()
            .map(|(label, outcome)| (label.as_str(), outcome))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ExecutionResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, outcome) in &self.entries {
            map.serialize_entry(label, outcome)?;
        }
        map.end()
    }
}

/// Executes data requests over a shared, read-only store.
#[derive(Clone)]
pub struct DataRequestExecutor {
    store: Arc<TabularStore>,
    limits: ExecutorLimits,
}

impl DataRequestExecutor {
    pub fn new(store: Arc<TabularStore>, limits: ExecutorLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> ExecutorLimits {
        self.limits
    }

    /// Runs untyped directive entries in order.
    ///
    /// Entry `i` is labelled `crop_data_i` or `rainfall_data_i` by type; an
    /// entry that cannot be understood is labelled `error_i`.
    pub fn execute(&self, requests: &[Value]) -> ExecutionResults {
        let mut results = ExecutionResults::new();

        for (index, raw) in requests.iter().enumerate() {
            match DataRequest::from_value(raw) {
                Ok(request) => {
                    let label = format!("{}_{}", request.request_type.label_prefix(), index);
                    let outcome = self.run(&request);
                    if outcome.is_error() {
                        tracing::debug!(label = %label, "Data request matched no rows");
                    }
                    results.push(label, outcome);
                }
                Err(err) => {
                    tracing::warn!(index, error = %err, "Rejected data request");
                    results.push(format!("error_{}", index), Self::rejected(&err));
                }
            }
        }

        tracing::debug!(requests = requests.len(), "Executed data requests");
        results
    }

    /// Runs a single typed request.
    pub fn run(&self, request: &DataRequest) -> RequestOutcome {
        match request.request_type {
            RequestType::CropProduction => {
                let view = FilterEngine::apply(&self.store.crop_view(), &request.filters);
                CropProductionSummary::from_view(&view, &self.limits)
                    .map(RequestOutcome::Crop)
                    .unwrap_or_else(RequestOutcome::no_data)
            }
            RequestType::Rainfall => {
                let view = FilterEngine::apply(&self.store.rainfall_view(), &request.filters);
                RainfallSummary::from_view(&view)
                    .map(RequestOutcome::Rainfall)
                    .unwrap_or_else(RequestOutcome::no_data)
            }
        }
    }

    fn rejected(err: &RequestError) -> RequestOutcome {
        RequestOutcome::error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::{CropRecord, RainfallRecord, Table, YearRange};
    use serde_json::json;

    fn store() -> Arc<TabularStore> {
        let crops = vec![
            CropRecord::new("Punjab", "Ludhiana", 2010, "Rabi", "Wheat", 100.0, 400.0),
            CropRecord::new("Punjab", "Amritsar", 2011, "Kharif", "Rice", 80.0, 300.0),
            CropRecord::new("Haryana", "Karnal", 2010, "Rabi", "Wheat", 90.0, 350.0),
            CropRecord::new("Haryana", "Hisar", 2011, "Rabi", "Mustard", 40.0, 60.0),
            CropRecord::new("Kerala", "Idukki", 2010, "Whole Year", "Cardamom", 5.0, 2.0),
        ];
        let rainfall = vec![
            RainfallRecord::new("Punjab", 2010, 600.0),
            RainfallRecord::new("Punjab", 2011, 500.0),
            RainfallRecord::new("Haryana Delhi & Chandigarh", 2010, 550.0),
        ];
        Arc::new(TabularStore::from_tables(
            Some(Table::new(vec![], crops)),
            Some(Table::new(vec![], rainfall)),
            None,
        ))
    }

    fn executor() -> DataRequestExecutor {
        DataRequestExecutor::new(store(), ExecutorLimits::default())
    }

    #[test]
    fn labels_follow_request_index_and_type() {
        let results = executor().execute(&[
            json!({"type": "crop_production", "filters": {"state": "Punjab"}}),
            json!({"type": "rainfall", "filters": {"state": "Punjab"}}),
        ]);

        assert_eq!(
            results.labels().collect::<Vec<_>>(),
            vec!["crop_data_0", "rainfall_data_1"]
        );
    }

    #[test]
    fn compares_two_states() {
        let results = executor().execute(&[
            json!({"type": "crop_production", "filters": {"state": "Punjab"}}),
            json!({"type": "crop_production", "filters": {"state": "Haryana"}}),
        ]);

        let Some(RequestOutcome::Crop(punjab)) = results.get("crop_data_0") else {
            panic!("expected crop summary");
        };
        assert_eq!(punjab.total_rows, 2);
        assert_eq!(punjab.states, vec!["Punjab"]);
        assert_eq!(punjab.total_production, Some(700.0));
        assert_eq!(punjab.year_range, YearRange(2010, 2011));

        let Some(RequestOutcome::Crop(haryana)) = results.get("crop_data_1") else {
            panic!("expected crop summary");
        };
        assert_eq!(haryana.top_crops_by_production[0].group, "Wheat");
        assert_eq!(haryana.top_crops_by_production[0].total, 350.0);
    }

    #[test]
    fn empty_filter_result_reports_no_data() {
        let results = executor().execute(&[json!({
            "type": "crop_production",
            "filters": {"state": "Atlantis"}
        })]);

        assert_eq!(results.get("crop_data_0"), Some(&RequestOutcome::no_data()));
        assert_eq!(
            serde_json::to_value(&results).unwrap(),
            json!({"crop_data_0": {"error": "No data found for given filters"}})
        );
    }

    #[test]
    fn unsupported_type_does_not_stop_the_batch() {
        let results = executor().execute(&[
            json!({"type": "soil_health"}),
            json!({"type": "rainfall", "filters": {"state": "Punjab"}}),
        ]);

        assert_eq!(
            results.get("error_0"),
            Some(&RequestOutcome::error("unsupported type"))
        );
        assert!(matches!(
            results.get("rainfall_data_1"),
            Some(RequestOutcome::Rainfall(_))
        ));
    }

    #[test]
    fn malformed_request_is_labelled_as_error() {
        let results = executor().execute(&[json!({
            "type": "crop_production",
            "filters": {"year_start": "soon"}
        })]);

        assert!(results.get("error_0").is_some_and(RequestOutcome::is_error));
    }

    #[test]
    fn rainfall_prefers_subdivision_over_state() {
        let results = executor().execute(&[json!({
            "type": "rainfall",
            "filters": {"state": "Punjab", "subdivision": "Haryana"}
        })]);

        let Some(RequestOutcome::Rainfall(summary)) = results.get("rainfall_data_0") else {
            panic!("expected rainfall summary");
        };
        assert_eq!(summary.subdivisions, vec!["Haryana Delhi & Chandigarh"]);
    }

    #[test]
    fn execution_is_idempotent() {
        let requests = [
            json!({"type": "crop_production", "filters": {"crop": "wheat", "year_end": 2010}}),
            json!({"type": "rainfall"}),
        ];
        let executor = executor();

        assert_eq!(executor.execute(&requests), executor.execute(&requests));
    }

    #[test]
    fn serializes_in_request_order() {
        let results = executor().execute(&[
            json!({"type": "rainfall"}),
            json!({"type": "crop_production"}),
        ]);

        let text = serde_json::to_string(&results).unwrap();
        let rainfall_at = text.find("rainfall_data_0").unwrap();
        let crop_at = text.find("crop_data_1").unwrap();
        assert!(rainfall_at < crop_at);
    }

    #[test]
    fn empty_batch_gives_empty_results() {
        assert!(executor().execute(&[]).is_empty());
    }
}
