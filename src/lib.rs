//! Samarth - question answering over Indian agricultural and climate data
//!
//! Questions go to a reasoning engine together with an overview of the loaded
//! crop production and rainfall datasets. The engine may ask for filtered
//! aggregates, which are computed locally and sent back before it answers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
