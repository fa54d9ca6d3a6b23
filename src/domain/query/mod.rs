//! Query Domain Module
//!
//! Turns typed data requests from the reasoning engine into compact,
//! JSON-serializable summaries of the matching rows.

mod executor;
mod request;
mod summary;

pub use executor::{DataRequestExecutor, ExecutionResults, ExecutorLimits, RequestOutcome};
pub use request::{DataRequest, RequestError, RequestType};
pub use summary::{CropProductionSummary, RainfallSummary};
