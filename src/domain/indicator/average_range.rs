//! Average bar range: trailing simple mean of (high - low).
//!
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_average_range(bars: &[OhlcvBar], lookback: usize) -> IndicatorSeries {
    let ranges: Vec<f64> = bars.iter().map(OhlcvBar::range).collect();
    let mut series = rolling_mean(bars, &ranges, lookback);
    series.indicator_type = IndicatorType::AverageRange(lookback);
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(day: u32, high: f64, low: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: low,
            high,
            low,
            close: high,
            volume: None,
        }
    }

    #[test]
    fn average_range_basic() {
        let bars = vec![
            make_bar(1, 110.0, 100.0),
            make_bar(2, 115.0, 105.0),
            make_bar(3, 130.0, 110.0),
            make_bar(4, 120.0, 116.0),
        ];
        let series = calculate_average_range(&bars, 3);

        assert_eq!(series.indicator_type, IndicatorType::AverageRange(3));
        assert_eq!(series.valid_at(1), None);
        // (10 + 10 + 20) / 3
        assert!((series.valid_at(2).unwrap() - 40.0 / 3.0).abs() < 1e-9);
        // (10 + 20 + 4) / 3
        assert!((series.valid_at(3).unwrap() - 34.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn flat_bars_have_zero_range() {
        let bars: Vec<OhlcvBar> = (1..=4).map(|d| make_bar(d, 100.0, 100.0)).collect();
        let series = calculate_average_range(&bars, 2);
        assert_eq!(series.valid_at(3), Some(0.0));
    }

    #[test]
    fn insufficient_bars_all_invalid() {
        let bars = vec![make_bar(1, 110.0, 100.0)];
        let series = calculate_average_range(&bars, 8);
        assert_eq!(series.values.len(), 1);
        assert!(!series.values[0].valid);
    }
}
