//! Core domain types and logic.

pub mod ohlcv;
pub mod instrument;
pub mod simulator;
pub mod order;
pub mod portfolio;
pub mod policy;
pub mod universe;
pub mod evaluator;
pub mod indicator;
pub mod signal;
pub mod metrics;
pub mod config_validation;
pub mod error;
