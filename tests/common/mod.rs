#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use tradesim::domain::error::TradesimError;
use tradesim::domain::instrument::{Instrument, PriceBook};
pub use tradesim::domain::ohlcv::OhlcvBar;
use tradesim::domain::signal::{SignalConfig, Smoothing};
use tradesim::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, TradesimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TradesimError::Data {
                reason: reason.clone(),
            });
        }
        let bars: Vec<OhlcvBar> = self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .collect();
        if bars.is_empty() {
            return Err(TradesimError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(i: usize) -> NaiveDate {
    date(2024, 1, 1) + chrono::Duration::days(i as i64)
}

pub fn make_bar(i: usize, open: f64, high: f64, low: f64, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: day(i),
        open,
        high,
        low,
        close,
        volume: Some(1000),
    }
}

/// Three quiet bars around 100 followed by two wide bullish bars closing near their highs.
pub fn bullish_breakout() -> Vec<OhlcvBar> {
    vec![
        make_bar(0, 100.0, 101.0, 99.0, 100.0),
        make_bar(1, 100.0, 101.0, 99.0, 100.0),
        make_bar(2, 100.0, 101.0, 99.0, 100.0),
        make_bar(3, 100.0, 106.0, 99.5, 105.5),
        make_bar(4, 105.6, 108.5, 105.2, 108.0),
    ]
}

/// Mirror image of [`bullish_breakout`].
pub fn bearish_breakdown() -> Vec<OhlcvBar> {
    vec![
        make_bar(0, 100.0, 101.0, 99.0, 100.0),
        make_bar(1, 100.0, 101.0, 99.0, 100.0),
        make_bar(2, 100.0, 101.0, 99.0, 100.0),
        make_bar(3, 100.0, 100.5, 94.0, 94.5),
        make_bar(4, 94.4, 94.8, 91.5, 92.0),
    ]
}

/// Short-window config that fits the breakout fixtures.
pub fn small_signal_config() -> SignalConfig {
    SignalConfig {
        ma_length: 3,
        smoothing: Smoothing::Simple,
        ibs_bull_min: 65.0,
        ibs_bear_max: 35.0,
        abr_lookback: 3,
    }
}

pub fn price_book(series: &[(&str, &[f64])]) -> PriceBook {
    PriceBook::new(
        series
            .iter()
            .map(|(symbol, prices)| Instrument::from_history(*symbol, prices.to_vec()).unwrap())
            .collect(),
    )
}

pub fn bars_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date,
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume.unwrap_or(0)
        ));
    }
    out
}
