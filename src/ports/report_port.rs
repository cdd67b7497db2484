//! Report output port trait.

use crate::domain::error::TradesimError;
use crate::domain::evaluator::EvaluationResult;
use crate::domain::instrument::PriceBook;
use crate::domain::signal::SignalFrame;

/// Port for writing simulation and signal outputs.
pub trait ReportPort {
    /// One row per day with each policy's total equity.
    fn write_equity(&self, result: &EvaluationResult, output_path: &str)
        -> Result<(), TradesimError>;

    /// Simulated price history, day 0 included.
    fn write_prices(&self, prices: &PriceBook, output_path: &str) -> Result<(), TradesimError>;

    fn write_signals(&self, frame: &SignalFrame, output_path: &str)
        -> Result<(), TradesimError>;
}
