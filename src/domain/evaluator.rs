//! Strategy evaluator: replays one shared price path through several policies.
//!
//! The path is simulated once; every policy then trades against the same
//! read-only [`PriceBook`] with its own [`Portfolio`], so comparisons are fair
//! and sequential and parallel evaluation give identical results.

use rand::Rng;
use rayon::prelude::*;

use super::instrument::PriceBook;
use super::order::{Order, OrderOutcome, Side};
use super::policy::{Decision, Policy};
use super::portfolio::{EquityPoint, Portfolio};
use super::simulator::{PricePathSimulator, DEFAULT_VOLATILITY};
use super::universe::{build_price_book, default_universe, InstrumentSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub seed: Option<u64>,
    pub days: usize,
    pub volatility: f64,
    pub starting_cash: f64,
    pub instruments: Vec<InstrumentSpec>,
    pub risk_free_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: None,
            days: 30,
            volatility: DEFAULT_VOLATILITY,
            starting_cash: 10_000.0,
            instruments: default_universe(),
            risk_free_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeEvent {
    Executed { order: Order, outcome: OrderOutcome },
    /// Zero-quantity order dropped under `ZeroQuantity::Skip`.
    Skipped { side: Side },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub day: usize,
    pub symbol: String,
    pub event: TradeEvent,
}

/// One policy's pass over the shared price path.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRun {
    pub policy: Policy,
    /// One point per simulated day, days 1..=N.
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<TradeRecord>,
    pub portfolio: Portfolio,
}

impl PolicyRun {
    pub fn final_equity(&self) -> f64 {
        self.equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.portfolio.initial_capital)
    }

    /// Equity minus starting cash, per day.
    pub fn profit_curve(&self) -> Vec<f64> {
        self.equity_curve
            .iter()
            .map(|p| p.equity - self.portfolio.initial_capital)
            .collect()
    }

    pub fn skipped_count(&self) -> usize {
        self.trades
            .iter()
            .filter(|t| matches!(t.event, TradeEvent::Skipped { .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub prices: PriceBook,
    pub runs: Vec<PolicyRun>,
}

impl EvaluationResult {
    pub fn run(&self, name: &str) -> Option<&PolicyRun> {
        self.runs.iter().find(|r| r.policy.name == name)
    }
}

/// Drive one policy through every day of `book` with a fresh ledger.
pub fn evaluate_policy(book: &PriceBook, policy: &Policy, starting_cash: f64) -> PolicyRun {
    let days = book.days();
    let mut portfolio = Portfolio::new(starting_cash);
    let mut equity_curve = Vec::with_capacity(days);
    let mut trades = Vec::new();

    for day in 1..=days {
        for instrument in book.instruments() {
            let (Some(change), Some(price)) = (instrument.change_at(day), instrument.price_at(day))
            else {
                continue;
            };

            let event = match policy.decide(instrument.symbol(), change) {
                Decision::Hold => continue,
                Decision::Skip { side } => TradeEvent::Skipped { side },
                Decision::Submit(order) => {
                    let outcome = portfolio.submit(&order, price);
                    match &outcome {
                        OrderOutcome::Filled(_) => {
                            log::debug!("[{}] day {}: {} @ {:.2}", policy.name, day, order, price)
                        }
                        OrderOutcome::Rejected(reason) => log::debug!(
                            "[{}] day {}: {} rejected ({})",
                            policy.name,
                            day,
                            order,
                            reason
                        ),
                    }
                    TradeEvent::Executed { order, outcome }
                }
            };

            trades.push(TradeRecord {
                day,
                symbol: instrument.symbol().to_string(),
                event,
            });
        }

        equity_curve.push(EquityPoint {
            day,
            equity: portfolio.value(&book.prices_at(day)),
        });
    }

    PolicyRun {
        policy: policy.clone(),
        equity_curve,
        trades,
        portfolio,
    }
}

/// Evaluate every policy against the same book. Order of `runs` follows `policies`.
pub fn evaluate_policies(
    book: &PriceBook,
    policies: &[Policy],
    starting_cash: f64,
    parallel: bool,
) -> Vec<PolicyRun> {
    if parallel {
        policies
            .par_iter()
            .map(|policy| evaluate_policy(book, policy, starting_cash))
            .collect()
    } else {
        policies
            .iter()
            .map(|policy| evaluate_policy(book, policy, starting_cash))
            .collect()
    }
}

/// Simulate the configured universe once, then evaluate all policies on it.
pub fn run_simulation<R: Rng + ?Sized>(
    config: &SimulationConfig,
    policies: &[Policy],
    parallel: bool,
    rng: &mut R,
) -> EvaluationResult {
    let simulator = PricePathSimulator::new(config.volatility);
    let mut book = build_price_book(&config.instruments);
    simulator.simulate(&mut book, config.days, rng);

    log::info!(
        "evaluating {} policies over {} days ({} instruments)",
        policies.len(),
        config.days,
        book.len()
    );

    let runs = evaluate_policies(&book, policies, config.starting_cash, parallel);
    EvaluationResult { prices: book, runs }
}
