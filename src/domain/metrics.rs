//! Performance metrics for a policy's equity curve.

use super::evaluator::PolicyRun;
use super::portfolio::EquityPoint;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_equity: f64,
    pub profit: f64,
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_duration: usize,
    pub buys_filled: usize,
    pub sells_filled: usize,
    pub rejected: usize,
    pub skipped: usize,
}

impl Metrics {
    pub fn compute(run: &PolicyRun, risk_free_rate: f64) -> Self {
        let initial_capital = run.portfolio.initial_capital;
        let final_equity = run.final_equity();

        let total_return = if initial_capital > 0.0 {
            (final_equity - initial_capital) / initial_capital
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_duration) =
            compute_drawdown(initial_capital, &run.equity_curve);
        let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;

        Metrics {
            final_equity,
            profit: final_equity - initial_capital,
            total_return,
            sharpe_ratio: compute_sharpe(initial_capital, &run.equity_curve, daily_rf),
            max_drawdown,
            max_drawdown_duration,
            buys_filled: run.portfolio.buys_filled,
            sells_filled: run.portfolio.sells_filled,
            rejected: run.portfolio.rejected,
            skipped: run.skipped_count(),
        }
    }
}

/// Largest peak-to-trough fall (fraction of peak) and longest stretch of days below a peak.
/// The starting capital counts as the first peak.
fn compute_drawdown(initial_capital: f64, equity_curve: &[EquityPoint]) -> (f64, usize) {
    let mut peak = initial_capital;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0usize;
    let mut current_dd_duration = 0usize;

    for point in equity_curve {
        if point.equity >= peak {
            peak = point.equity;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}

fn compute_sharpe(initial_capital: f64, equity_curve: &[EquityPoint], daily_rf: f64) -> f64 {
    let mut prev = initial_capital;
    let mut returns = Vec::with_capacity(equity_curve.len());
    for point in equity_curve {
        returns.push(if prev > 0.0 {
            (point.equity - prev) / prev
        } else {
            0.0
        });
        prev = point.equity;
    }

    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        ((mean - daily_rf) / stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}
