//! Instruments and their append-only price histories.

use std::collections::HashMap;

/// A tradable symbol with its simulated daily price history.
///
/// `history[0]` is the initial price; each simulated day appends one entry.
/// The history is never empty, so the current price is always defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    symbol: String,
    history: Vec<f64>,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, initial_price: f64) -> Self {
        Instrument {
            symbol: symbol.into(),
            history: vec![initial_price],
        }
    }

    /// Instrument with a known history, e.g. replayed from a file. `None` if `history` is empty.
    pub fn from_history(symbol: impl Into<String>, history: Vec<f64>) -> Option<Self> {
        if history.is_empty() {
            return None;
        }
        Some(Instrument {
            symbol: symbol.into(),
            history,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Latest price in the history.
    pub fn price(&self) -> f64 {
        self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Number of simulated days (history length minus the initial price).
    pub fn days(&self) -> usize {
        self.history.len() - 1
    }

    pub fn price_at(&self, day: usize) -> Option<f64> {
        self.history.get(day).copied()
    }

    /// Fractional change from `day - 1` to `day`. None for day 0 or past the end.
    pub fn change_at(&self, day: usize) -> Option<f64> {
        if day == 0 {
            return None;
        }
        let today = self.price_at(day)?;
        let yesterday = self.history[day - 1];
        Some((today - yesterday) / yesterday)
    }

    pub(crate) fn push_price(&mut self, price: f64) {
        self.history.push(price);
    }
}

/// The instruments of one simulation run, in declaration order.
///
/// Built once by the simulator, then shared read-only by every policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBook {
    instruments: Vec<Instrument>,
}

impl PriceBook {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        PriceBook { instruments }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub(crate) fn instruments_mut(&mut self) -> &mut [Instrument] {
        &mut self.instruments
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Days available for every instrument.
    pub fn days(&self) -> usize {
        self.instruments.iter().map(Instrument::days).min().unwrap_or(0)
    }

    /// symbol -> price on `day`, skipping instruments without that day.
    pub fn prices_at(&self, day: usize) -> HashMap<String, f64> {
        self.instruments
            .iter()
            .filter_map(|i| i.price_at(day).map(|p| (i.symbol.clone(), p)))
            .collect()
    }

    pub fn current_prices(&self) -> HashMap<String, f64> {
        self.instruments
            .iter()
            .map(|i| (i.symbol.clone(), i.price()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_instrument() -> Instrument {
        let mut inst = Instrument::new("AAPL", 150.0);
        inst.push_price(153.0);
        inst.push_price(148.41);
        inst
    }

    #[test]
    fn new_instrument_has_initial_price() {
        let inst = Instrument::new("AAPL", 150.0);
        assert_eq!(inst.symbol(), "AAPL");
        assert_eq!(inst.history(), &[150.0]);
        assert_eq!(inst.price(), 150.0);
        assert_eq!(inst.days(), 0);
    }

    #[test]
    fn push_appends_and_updates_price() {
        let inst = sample_instrument();
        assert_eq!(inst.days(), 2);
        assert_eq!(inst.price(), 148.41);
        assert_eq!(inst.price_at(1), Some(153.0));
        assert_eq!(inst.price_at(3), None);
    }

    #[test]
    fn from_history_requires_a_price() {
        assert!(Instrument::from_history("AAPL", vec![]).is_none());
        let inst = Instrument::from_history("AAPL", vec![150.0, 153.0]).unwrap();
        assert_eq!(inst.days(), 1);
        assert_eq!(inst.price(), 153.0);
    }

    #[test]
    fn change_at() {
        let inst = sample_instrument();
        assert_eq!(inst.change_at(0), None);
        assert!((inst.change_at(1).unwrap() - 0.02).abs() < 1e-12);
        assert!((inst.change_at(2).unwrap() - (148.41 - 153.0) / 153.0).abs() < 1e-12);
        assert_eq!(inst.change_at(3), None);
    }

    #[test]
    fn book_days_is_shortest_history() {
        let mut short = Instrument::new("GOOGL", 2800.0);
        short.push_price(2790.0);
        let book = PriceBook::new(vec![sample_instrument(), short]);
        assert_eq!(book.days(), 1);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn book_prices_at() {
        let book = PriceBook::new(vec![sample_instrument(), Instrument::new("GOOGL", 2800.0)]);
        let day0 = book.prices_at(0);
        assert_eq!(day0.get("AAPL"), Some(&150.0));
        assert_eq!(day0.get("GOOGL"), Some(&2800.0));

        let day1 = book.prices_at(1);
        assert_eq!(day1.get("AAPL"), Some(&153.0));
        assert!(!day1.contains_key("GOOGL"));
    }

    #[test]
    fn book_lookup() {
        let book = PriceBook::new(vec![sample_instrument()]);
        assert!(book.get("AAPL").is_some());
        assert!(book.get("MSFT").is_none());
        assert_eq!(book.current_prices().get("AAPL"), Some(&148.41));
    }

    #[test]
    fn empty_book() {
        let book = PriceBook::default();
        assert!(book.is_empty());
        assert_eq!(book.days(), 0);
    }
}
