//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, state machine)
//! - `dataset` - Tabular store, filtering and aggregation
//! - `query` - Data requests from the reasoning engine and their execution
//! - `qa` - Directives, prompts, citations and the exchange state machine

pub mod dataset;
pub mod foundation;
pub mod qa;
pub mod query;
