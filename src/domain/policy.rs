//! Trading policies: map a day-over-day price change to an order.

use std::fmt;
use std::str::FromStr;

use super::order::{Order, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Buy when the price fell, sell when it rose.
    BuyOnDrop,
    /// Buy when the price rose, sell when it fell.
    BuyOnRise,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::BuyOnDrop => "buy_on_drop",
            Direction::BuyOnRise => "buy_on_rise",
        }
    }

    /// Side for a change; an unchanged price trades nothing.
    pub fn side_for(&self, change: f64) -> Option<Side> {
        if change < 0.0 {
            Some(match self {
                Direction::BuyOnDrop => Side::Buy,
                Direction::BuyOnRise => Side::Sell,
            })
        } else if change > 0.0 {
            Some(match self {
                Direction::BuyOnDrop => Side::Sell,
                Direction::BuyOnRise => Side::Buy,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy_on_drop" => Ok(Direction::BuyOnDrop),
            "buy_on_rise" => Ok(Direction::BuyOnRise),
            other => Err(format!(
                "unknown policy '{other}' (expected buy_on_drop or buy_on_rise)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityRule {
    Fixed(u64),
    /// floor(|change| * scaling_factor)
    Weighted { scaling_factor: f64 },
}

impl QuantityRule {
    pub fn quantity_for(&self, change: f64) -> u64 {
        match *self {
            QuantityRule::Fixed(q) => q,
            QuantityRule::Weighted { scaling_factor } => {
                (change.abs() * scaling_factor).floor() as u64
            }
        }
    }
}

/// What to do with an order whose quantity truncated to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroQuantity {
    /// Do not submit; the evaluator logs the day as skipped.
    #[default]
    Skip,
    /// Submit anyway; the ledger fills it without moving cash or shares.
    Submit,
}

impl FromStr for ZeroQuantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(ZeroQuantity::Skip),
            "submit" => Ok(ZeroQuantity::Submit),
            other => Err(format!(
                "unknown zero_quantity mode '{other}' (expected skip or submit)"
            )),
        }
    }
}

/// What a policy wants for one instrument on one day.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Price unchanged.
    Hold,
    /// A side was chosen but the quantity came out as zero and was not submitted.
    Skip { side: Side },
    Submit(Order),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub name: String,
    pub direction: Direction,
    pub quantity: QuantityRule,
    pub zero_quantity: ZeroQuantity,
}

impl Policy {
    pub fn new(direction: Direction, quantity: QuantityRule) -> Self {
        Policy {
            name: direction.name().to_string(),
            direction,
            quantity,
            zero_quantity: ZeroQuantity::default(),
        }
    }

    pub fn with_zero_quantity(mut self, mode: ZeroQuantity) -> Self {
        self.zero_quantity = mode;
        self
    }

    pub fn decide(&self, symbol: &str, change: f64) -> Decision {
        let Some(side) = self.direction.side_for(change) else {
            return Decision::Hold;
        };
        let quantity = self.quantity.quantity_for(change);
        if quantity == 0 && self.zero_quantity == ZeroQuantity::Skip {
            return Decision::Skip { side };
        }
        Decision::Submit(Order {
            symbol: symbol.to_string(),
            side,
            quantity,
        })
    }
}

/// Policy settings shared by every direction in a comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    pub directions: Vec<Direction>,
    pub quantity: QuantityRule,
    pub zero_quantity: ZeroQuantity,
    pub parallel: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            directions: vec![Direction::BuyOnDrop, Direction::BuyOnRise],
            quantity: QuantityRule::Fixed(1),
            zero_quantity: ZeroQuantity::Skip,
            parallel: false,
        }
    }
}

impl PolicyConfig {
    pub fn policies(&self) -> Vec<Policy> {
        self.directions
            .iter()
            .map(|&d| Policy::new(d, self.quantity).with_zero_quantity(self.zero_quantity))
            .collect()
    }
}
