//! Instrument universe for a simulation run.
//!
//! Parses `SYMBOL:PRICE` lists from configuration, e.g. `AAPL:150, GOOGL:2800`.

use std::collections::HashSet;

use super::instrument::{Instrument, PriceBook};

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSpec {
    pub symbol: String,
    pub initial_price: f64,
}

impl InstrumentSpec {
    pub fn new(symbol: impl Into<String>, initial_price: f64) -> Self {
        InstrumentSpec {
            symbol: symbol.into(),
            initial_price,
        }
    }
}

/// The pair the simulator starts from when nothing is configured.
pub fn default_universe() -> Vec<InstrumentSpec> {
    vec![
        InstrumentSpec::new("AAPL", 150.0),
        InstrumentSpec::new("GOOGL", 2800.0),
    ]
}

/// Fresh price book with each instrument at its initial price.
pub fn build_price_book(specs: &[InstrumentSpec]) -> PriceBook {
    PriceBook::new(
        specs
            .iter()
            .map(|s| Instrument::new(s.symbol.clone(), s.initial_price))
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in instrument list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("missing price for {0} (expected SYMBOL:PRICE)")]
    MissingPrice(String),

    #[error("invalid price for {symbol}: {value}")]
    InvalidPrice { symbol: String, value: String },
}

pub fn parse_instruments(input: &str) -> Result<Vec<InstrumentSpec>, UniverseError> {
    let mut specs = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }

        let (symbol, price) = match trimmed.split_once(':') {
            Some((s, p)) => (s.trim().to_uppercase(), p.trim()),
            None => return Err(UniverseError::MissingPrice(trimmed.to_uppercase())),
        };
        if symbol.is_empty() {
            return Err(UniverseError::EmptyToken);
        }

        let initial_price: f64 = match price.parse() {
            Ok(p) if p > 0.0 && f64::is_finite(p) => p,
            _ => {
                return Err(UniverseError::InvalidPrice {
                    symbol,
                    value: price.to_string(),
                })
            }
        };

        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        specs.push(InstrumentSpec {
            symbol,
            initial_price,
        });
    }

    Ok(specs)
}
