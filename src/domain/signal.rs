//! "Always-in" bull/bear signal generator.
//!
//! A bull signal needs two consecutive bullish bars closing above the moving
//! average, both with a strong internal bar strength, while the current or
//! prior bar's range exceeds the trailing average range. Bear signals mirror
//! this. Every derived value uses only the current bar, the prior bar and
//! trailing windows.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::error::TradesimError;
use super::indicator::average_range::calculate_average_range;
use super::indicator::ema::calculate_ema;
use super::indicator::sma::calculate_sma;
use super::indicator::IndicatorSeries;
use super::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    Simple,
    #[default]
    Exponential,
}

impl FromStr for Smoothing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma" | "simple" => Ok(Smoothing::Simple),
            "ema" | "exponential" => Ok(Smoothing::Exponential),
            other => Err(format!("unknown smoothing '{other}' (expected sma or ema)")),
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Smoothing::Simple => write!(f, "sma"),
            Smoothing::Exponential => write!(f, "ema"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub ma_length: usize,
    pub smoothing: Smoothing,
    pub ibs_bull_min: f64,
    pub ibs_bear_max: f64,
    pub abr_lookback: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            ma_length: 20,
            smoothing: Smoothing::Exponential,
            ibs_bull_min: 65.0,
            ibs_bear_max: 35.0,
            abr_lookback: 8,
        }
    }
}

impl SignalConfig {
    /// Bars with undefined inputs at the start of any sequence.
    pub fn warmup(&self) -> usize {
        self.ma_length.max(self.abr_lookback)
    }
}

/// Derived columns and signals for one bar.
///
/// Rows inside the warmup window have `valid == false`, no `ma`/`avg_range`,
/// and every flag false.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub valid: bool,
    pub ma: Option<f64>,
    pub bar_range: f64,
    pub avg_range: Option<f64>,
    pub ibs: f64,
    pub is_bull: bool,
    pub is_bear: bool,
    pub prior_bull: bool,
    pub prior_bear: bool,
    pub bull_trend: bool,
    pub bear_trend: bool,
    pub bull_ibs_ok: bool,
    pub bear_ibs_ok: bool,
    pub range_ok: bool,
    pub bull_signal: bool,
    pub bear_signal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalFrame {
    pub config: SignalConfig,
    pub warmup: usize,
    pub rows: Vec<SignalRow>,
}

impl SignalFrame {
    pub fn bull_count(&self) -> usize {
        self.rows.iter().filter(|r| r.bull_signal).count()
    }

    pub fn bear_count(&self) -> usize {
        self.rows.iter().filter(|r| r.bear_signal).count()
    }

    pub fn bull_dates(&self) -> Vec<NaiveDate> {
        self.rows
            .iter()
            .filter(|r| r.bull_signal)
            .map(|r| r.date)
            .collect()
    }

    pub fn bear_dates(&self) -> Vec<NaiveDate> {
        self.rows
            .iter()
            .filter(|r| r.bear_signal)
            .map(|r| r.date)
            .collect()
    }
}

fn moving_average(bars: &[OhlcvBar], config: &SignalConfig) -> IndicatorSeries {
    match config.smoothing {
        Smoothing::Simple => calculate_sma(bars, config.ma_length),
        Smoothing::Exponential => calculate_ema(bars, config.ma_length),
    }
}

/// Compute signal rows for `bars`.
///
/// Fails with `InvalidBar` on malformed input and with `InsufficientHistory`
/// when no bar lies past the warmup window.
pub fn generate_signals(
    bars: &[OhlcvBar],
    config: &SignalConfig,
) -> Result<SignalFrame, TradesimError> {
    if config.ma_length == 0 {
        return Err(TradesimError::invalid(
            "signals",
            "ma_length",
            "ma_length must be at least 1",
        ));
    }
    if config.abr_lookback == 0 {
        return Err(TradesimError::invalid(
            "signals",
            "abr_lookback",
            "abr_lookback must be at least 1",
        ));
    }

    for (i, bar) in bars.iter().enumerate() {
        bar.validate(i)?;
    }

    let warmup = config.warmup();
    if bars.len() <= warmup {
        return Err(TradesimError::InsufficientHistory {
            bars: bars.len(),
            minimum: warmup + 1,
        });
    }

    let ma = moving_average(bars, config);
    let avg_range = calculate_average_range(bars, config.abr_lookback);

    let rows = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let bar_range = bar.range();
            let ibs = bar.internal_bar_strength();

            if i < warmup {
                return SignalRow {
                    date: bar.date,
                    valid: false,
                    ma: None,
                    bar_range,
                    avg_range: None,
                    ibs,
                    is_bull: false,
                    is_bear: false,
                    prior_bull: false,
                    prior_bear: false,
                    bull_trend: false,
                    bear_trend: false,
                    bull_ibs_ok: false,
                    bear_ibs_ok: false,
                    range_ok: false,
                    bull_signal: false,
                    bear_signal: false,
                };
            }

            // Past warmup: i >= 1 and both trailing series are valid here.
            let prior = &bars[i - 1];
            let ma_now = ma.values[i].value;
            let avg = avg_range.values[i].value;
            let prior_ibs = prior.internal_bar_strength();

            let is_bull = bar.is_bull();
            let is_bear = bar.is_bear();
            let prior_bull = prior.is_bull();
            let prior_bear = prior.is_bear();

            // The prior close is compared against the current average.
            let bull_trend = bar.close > ma_now && prior.close > ma_now;
            let bear_trend = bar.close < ma_now && prior.close < ma_now;

            let bull_ibs_ok = ibs > config.ibs_bull_min && prior_ibs > config.ibs_bull_min;
            let bear_ibs_ok = ibs < config.ibs_bear_max && prior_ibs < config.ibs_bear_max;

            let range_ok = bar_range > avg || prior.range() > avg;

            SignalRow {
                date: bar.date,
                valid: true,
                ma: Some(ma_now),
                bar_range,
                avg_range: Some(avg),
                ibs,
                is_bull,
                is_bear,
                prior_bull,
                prior_bear,
                bull_trend,
                bear_trend,
                bull_ibs_ok,
                bear_ibs_ok,
                range_ok,
                bull_signal: is_bull && prior_bull && bull_trend && bull_ibs_ok && range_ok,
                bear_signal: is_bear && prior_bear && bear_trend && bear_ibs_ok && range_ok,
            }
        })
        .collect();

    Ok(SignalFrame {
        config: config.clone(),
        warmup,
        rows,
    })
}
