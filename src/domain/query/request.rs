//! DataRequest - a typed request for one dataset.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::dataset::FilterCriteria;

/// Dataset a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    CropProduction,
    Rainfall,
}

impl RequestType {
    /// Parses the directive's `type` field.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "crop_production" => Some(RequestType::CropProduction),
            "rainfall" => Some(RequestType::Rainfall),
            _ => None,
        }
    }

    /// Prefix of result labels for this type (`crop_data_0`, ...).
    pub fn label_prefix(&self) -> &'static str {
        match self {
            RequestType::CropProduction => "crop_data",
            RequestType::Rainfall => "rainfall_data",
        }
    }
}

/// A single data request. Built from a directive entry and consumed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRequest {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(default)]
    pub filters: FilterCriteria,
}

impl DataRequest {
    pub fn new(request_type: RequestType, filters: FilterCriteria) -> Self {
        Self {
            request_type,
            filters,
        }
    }

    /// Builds a request from one untyped directive entry.
    ///
    /// An absent or unknown `type` is [`RequestError::UnsupportedType`]; a
    /// malformed `filters` object is [`RequestError::Invalid`].
    pub fn from_value(value: &Value) -> Result<Self, RequestError> {
        let entry = value
            .as_object()
            .ok_or_else(|| RequestError::invalid("request must be a JSON object"))?;

        let request_type = entry
            .get("type")
            .and_then(Value::as_str)
            .and_then(RequestType::parse)
            .ok_or(RequestError::UnsupportedType)?;

        let filters = match entry.get("filters") {
            None | Some(Value::Null) => FilterCriteria::default(),
            Some(raw) => serde_json::from_value(raw.clone())
                .map_err(|e| RequestError::invalid(format!("invalid filters: {}", e)))?,
        };

        Ok(Self::new(request_type, filters))
    }
}

/// Errors confined to a single request of a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("unsupported type")]
    UnsupportedType,

    #[error("{0}")]
    Invalid(String),
}

impl RequestError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
