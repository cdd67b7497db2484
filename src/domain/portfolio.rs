//! Cash and share ledger with mark-to-market valuation.

use std::collections::HashMap;

use super::instrument::Instrument;
use super::order::{Fill, Order, OrderOutcome, RejectReason, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub day: usize,
    pub equity: f64,
}

/// Long-only ledger. Cash and every holding stay non-negative: an order
/// either applies in full or leaves the ledger untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    holdings: HashMap<String, u64>,
    pub buys_filled: usize,
    pub sells_filled: usize,
    pub rejected: usize,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            holdings: HashMap::new(),
            buys_filled: 0,
            sells_filled: 0,
            rejected: 0,
        }
    }

    pub fn holding(&self, symbol: &str) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn holdings(&self) -> &HashMap<String, u64> {
        &self.holdings
    }

    pub fn buy(&mut self, symbol: &str, price: f64, quantity: u64) -> OrderOutcome {
        let cost = price * quantity as f64;
        if self.cash < cost {
            self.rejected += 1;
            return OrderOutcome::Rejected(RejectReason::InsufficientCash {
                required: cost,
                available: self.cash,
            });
        }

        let held = self.holding(symbol);
        let Some(total) = held.checked_add(quantity) else {
            self.rejected += 1;
            return OrderOutcome::Rejected(RejectReason::PositionOverflow {
                requested: quantity,
                held,
            });
        };

        self.cash -= cost;
        self.holdings.insert(symbol.to_string(), total);
        self.buys_filled += 1;

        OrderOutcome::Filled(Fill {
            side: Side::Buy,
            quantity,
            price,
            amount: cost,
        })
    }

    pub fn sell(&mut self, symbol: &str, price: f64, quantity: u64) -> OrderOutcome {
        let held = self.holding(symbol);
        if held < quantity {
            self.rejected += 1;
            return OrderOutcome::Rejected(RejectReason::InsufficientShares {
                requested: quantity,
                held,
            });
        }

        let proceeds = price * quantity as f64;
        self.holdings.insert(symbol.to_string(), held - quantity);
        self.cash += proceeds;
        self.sells_filled += 1;

        OrderOutcome::Filled(Fill {
            side: Side::Sell,
            quantity,
            price,
            amount: proceeds,
        })
    }

    pub fn submit(&mut self, order: &Order, price: f64) -> OrderOutcome {
        match order.side {
            Side::Buy => self.buy(&order.symbol, price, order.quantity),
            Side::Sell => self.sell(&order.symbol, price, order.quantity),
        }
    }

    /// Buy at the instrument's current price.
    pub fn buy_instrument(&mut self, instrument: &Instrument, quantity: u64) -> OrderOutcome {
        self.buy(instrument.symbol(), instrument.price(), quantity)
    }

    /// Sell at the instrument's current price.
    pub fn sell_instrument(&mut self, instrument: &Instrument, quantity: u64) -> OrderOutcome {
        self.sell(instrument.symbol(), instrument.price(), quantity)
    }

    /// cash + Σ holding * price over the symbols present in `price_map`.
    pub fn value(&self, price_map: &HashMap<String, f64>) -> f64 {
        let holdings_value: f64 = self
            .holdings
            .iter()
            .filter_map(|(symbol, &qty)| price_map.get(symbol).map(|&p| qty as f64 * p))
            .sum();
        self.cash + holdings_value
    }

    /// Mark to market at each instrument's current price.
    pub fn value_of(&self, instruments: &[Instrument]) -> f64 {
        let holdings_value: f64 = instruments
            .iter()
            .map(|i| self.holding(i.symbol()) as f64 * i.price())
            .sum();
        self.cash + holdings_value
    }
}
