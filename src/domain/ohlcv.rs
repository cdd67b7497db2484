//! OHLCV bar representation.

use chrono::NaiveDate;

use super::error::TradesimError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<i64>,
}

impl OhlcvBar {
    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Close position within the bar's range, 0..=100.
    ///
    /// A flat bar (high == low) has an IBS of exactly 50.
    pub fn internal_bar_strength(&self) -> f64 {
        let range = self.range();
        if range == 0.0 {
            return 50.0;
        }
        (self.close - self.low) / range * 100.0
    }

    pub fn is_bull(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bear(&self) -> bool {
        self.close < self.open
    }

    /// Check positivity and `low <= open, close <= high`.
    pub fn validate(&self, index: usize) -> Result<(), TradesimError> {
        let fail = |reason: String| Err(TradesimError::InvalidBar { index, reason });

        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return fail(format!("{name} must be a positive number, got {value}"));
            }
        }
        if self.low > self.high {
            return fail(format!("low {} above high {}", self.low, self.high));
        }
        if self.open < self.low || self.open > self.high {
            return fail(format!("open {} outside [{}, {}]", self.open, self.low, self.high));
        }
        if self.close < self.low || self.close > self.high {
            return fail(format!(
                "close {} outside [{}, {}]",
                self.close, self.low, self.high
            ));
        }
        Ok(())
    }
}
