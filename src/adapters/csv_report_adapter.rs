//! CSV report adapter implementing ReportPort.
//!
//! Writes equity curves, price histories and signal frames as plain CSV so
//! they can be charted with any external tool.

use crate::domain::error::TradesimError;
use crate::domain::evaluator::EvaluationResult;
use crate::domain::instrument::PriceBook;
use crate::domain::signal::SignalFrame;
use crate::ports::report_port::ReportPort;

use std::io;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_rows(
    output_path: &str,
    header: &[String],
    rows: &[Vec<String>],
) -> Result<(), TradesimError> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(io::Error::from)?;
    wtr.write_record(header).map_err(io::Error::from)?;
    for row in rows {
        wtr.write_record(row).map_err(io::Error::from)?;
    }
    wtr.flush()?;
    log::info!("wrote {} rows to {}", rows.len(), output_path);
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

fn equity_rows(result: &EvaluationResult) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = vec!["day".to_string()];
    header.extend(result.runs.iter().map(|r| r.policy.name.clone()));

    let days = result
        .runs
        .iter()
        .map(|r| r.equity_curve.len())
        .max()
        .unwrap_or(0);

    let rows = (0..days)
        .map(|i| {
            let mut row = vec![(i + 1).to_string()];
            row.extend(
                result
                    .runs
                    .iter()
                    .map(|r| fmt_opt(r.equity_curve.get(i).map(|p| p.equity))),
            );
            row
        })
        .collect();

    (header, rows)
}

fn price_rows(prices: &PriceBook) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = vec!["day".to_string()];
    header.extend(prices.instruments().iter().map(|i| i.symbol().to_string()));

    let rows = (0..=prices.days())
        .map(|day| {
            let mut row = vec![day.to_string()];
            row.extend(
                prices
                    .instruments()
                    .iter()
                    .map(|i| fmt_opt(i.price_at(day))),
            );
            row
        })
        .collect();

    (header, rows)
}

fn signal_rows(frame: &SignalFrame) -> (Vec<String>, Vec<Vec<String>>) {
    let header = [
        "date",
        "valid",
        "ma",
        "bar_range",
        "avg_range",
        "ibs",
        "bull_signal",
        "bear_signal",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let rows = frame
        .rows
        .iter()
        .map(|r| {
            vec![
                r.date.format("%Y-%m-%d").to_string(),
                r.valid.to_string(),
                fmt_opt(r.ma),
                format!("{:.4}", r.bar_range),
                fmt_opt(r.avg_range),
                format!("{:.2}", r.ibs),
                r.bull_signal.to_string(),
                r.bear_signal.to_string(),
            ]
        })
        .collect();

    (header, rows)
}

impl ReportPort for CsvReportAdapter {
    fn write_equity(
        &self,
        result: &EvaluationResult,
        output_path: &str,
    ) -> Result<(), TradesimError> {
        let (header, rows) = equity_rows(result);
        write_rows(output_path, &header, &rows)
    }

    fn write_prices(&self, prices: &PriceBook, output_path: &str) -> Result<(), TradesimError> {
        let (header, rows) = price_rows(prices);
        write_rows(output_path, &header, &rows)
    }

    fn write_signals(
        &self,
        frame: &SignalFrame,
        output_path: &str,
    ) -> Result<(), TradesimError> {
        let (header, rows) = signal_rows(frame);
        write_rows(output_path, &header, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluator::{run_simulation, SimulationConfig};
    use crate::domain::policy::PolicyConfig;
    use crate::domain::signal::{generate_signals, SignalConfig};
    use crate::domain::indicator::test_bars::make_bars;
    use crate::domain::simulator::make_rng;
    use std::fs;
    use tempfile::TempDir;

    fn sample_result(days: usize) -> EvaluationResult {
        let config = SimulationConfig {
            seed: Some(7),
            days,
            ..SimulationConfig::default()
        };
        let policies = PolicyConfig::default().policies();
        run_simulation(&config, &policies, false, &mut make_rng(config.seed))
    }

    #[test]
    fn equity_csv_has_one_column_per_policy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("equity.csv");
        let result = sample_result(5);

        CsvReportAdapter::new()
            .write_equity(&result, path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "day,buy_on_drop,buy_on_rise");
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("1,"));
        assert!(lines[5].starts_with("5,"));
    }

    #[test]
    fn prices_csv_includes_day_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prices.csv");
        let result = sample_result(3);

        CsvReportAdapter::new()
            .write_prices(&result.prices, path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "day,AAPL,GOOGL");
        assert_eq!(lines[1], "0,150.0000,2800.0000");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn signals_csv_leaves_warmup_columns_blank() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signals.csv");
        let closes: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let config = SignalConfig {
            ma_length: 5,
            abr_lookback: 3,
            ..SignalConfig::default()
        };
        let frame = generate_signals(&make_bars(&closes), &config).unwrap();

        CsvReportAdapter::new()
            .write_signals(&frame, path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "date,valid,ma,bar_range,avg_range,ibs,bull_signal,bear_signal"
        );
        assert_eq!(lines.len(), 13);
        assert!(lines[1].contains(",false,,"));
        assert!(lines[6].contains(",true,"));
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let result = sample_result(2);
        let err = CsvReportAdapter::new()
            .write_equity(&result, "/nonexistent/dir/equity.csv")
            .unwrap_err();
        assert!(matches!(err, TradesimError::Io(_)));
    }
}
