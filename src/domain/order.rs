//! Orders and their outcomes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A single day's instruction for one instrument. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub symbol: String,
    pub side: Side,
    pub quantity: u64,
}

impl Order {
    pub fn buy(symbol: impl Into<String>, quantity: u64) -> Self {
        Order {
            symbol: symbol.into(),
            side: Side::Buy,
            quantity,
        }
    }

    pub fn sell(symbol: impl Into<String>, quantity: u64) -> Self {
        Order {
            symbol: symbol.into(),
            side: Side::Sell,
            quantity,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.side, self.quantity, self.symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub side: Side,
    pub quantity: u64,
    pub price: f64,
    /// Cash moved by the fill: cost for a buy, proceeds for a sell.
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    InsufficientCash { required: f64, available: f64 },
    InsufficientShares { requested: u64, held: u64 },
    PositionOverflow { requested: u64, held: u64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InsufficientCash {
                required,
                available,
            } => write!(
                f,
                "insufficient cash: need {:.2}, have {:.2}",
                required, available
            ),
            RejectReason::InsufficientShares { requested, held } => {
                write!(f, "insufficient shares: sell {}, hold {}", requested, held)
            }
            RejectReason::PositionOverflow { requested, held } => {
                write!(f, "position overflow: buy {}, hold {}", requested, held)
            }
        }
    }
}

/// Result of submitting an order to a ledger.
///
/// Rejection is an ordinary outcome: the ledger is left untouched and the run
/// carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Filled(Fill),
    Rejected(RejectReason),
}

impl OrderOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, OrderOutcome::Filled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, OrderOutcome::Rejected(_))
    }
}
