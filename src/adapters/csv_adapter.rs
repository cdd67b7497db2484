//! CSV file data adapter.
//!
//! Reads `<SYMBOL>.csv` files with a `date,open,high,low,close[,volume]` header
//! from a base directory.

use crate::domain::error::TradesimError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_err(reason: String) -> TradesimError {
    TradesimError::Data { reason }
}

fn parse_price(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, TradesimError> {
    record
        .get(idx)
        .ok_or_else(|| data_err(format!("missing {} column", name)))?
        .trim()
        .parse()
        .map_err(|e| data_err(format!("invalid {} value: {}", name, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, TradesimError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| data_err("missing date column".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| data_err(format!("invalid date format: {}", e)))?;

            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            let volume = match record.get(5).map(str::trim) {
                None | Some("") => None,
                Some(v) => Some(
                    v.parse::<i64>()
                        .map_err(|e| data_err(format!("invalid volume value: {}", e)))?,
                ),
            };

            bars.push(OhlcvBar {
                date,
                open: parse_price(&record, 1, "open")?,
                high: parse_price(&record, 2, "high")?,
                low: parse_price(&record, 3, "low")?,
                close: parse_price(&record, 4, "close")?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(data_err(format!(
                "duplicate date {} in {}",
                pair[0].date,
                path.display()
            )));
        }
        log::debug!("loaded {} bars for {} from {}", bars.len(), symbol, path.display());

        if bars.is_empty() {
            return Err(TradesimError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }
}
