//! Exponential Moving Average of close.
//!
//! k = 2/(n+1), EMA[0] = C[0], then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! The recursion runs from the first bar; the first (n-1) points are
//! still reported invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let Some(first) = bars.first() else {
        return IndicatorSeries::empty(IndicatorType::Ema(period));
    };
    if period == 0 {
        return IndicatorSeries::empty(IndicatorType::Ema(period));
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = first.close;
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i > 0 {
                ema = bar.close * k + ema * (1.0 - k);
            }
            let valid = i + 1 >= period;
            IndicatorPoint {
                date: bar.date,
                valid,
                value: if valid { ema } else { 0.0 },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}
