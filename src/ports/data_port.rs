//! Data access port trait.

use crate::domain::error::TradesimError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` in ascending date order, optionally clipped to
    /// `[start_date, end_date]` (both inclusive).
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, TradesimError>;
}
