//! Random-walk price path simulator.
//!
//! Each step multiplies the current price by `1 + δ`, with δ drawn uniformly
//! from `[-volatility, +volatility]`. Randomness is always supplied by the
//! caller so runs can be reproduced from a seed.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::instrument::{Instrument, PriceBook};

pub const DEFAULT_VOLATILITY: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct PricePathSimulator {
    volatility: f64,
    step_dist: Uniform<f64>,
}

impl Default for PricePathSimulator {
    fn default() -> Self {
        PricePathSimulator::new(DEFAULT_VOLATILITY)
    }
}

impl PricePathSimulator {
    pub fn new(volatility: f64) -> Self {
        let v = volatility.abs();
        PricePathSimulator {
            volatility: v,
            step_dist: Uniform::new_inclusive(-v, v),
        }
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Advance one instrument by one day and return the new price.
    pub fn step<R: Rng + ?Sized>(&self, instrument: &mut Instrument, rng: &mut R) -> f64 {
        let delta = self.step_dist.sample(rng);
        let next = instrument.price() * (1.0 + delta);
        instrument.push_price(next);
        next
    }

    /// Advance every instrument once, in declaration order.
    pub fn advance_day<R: Rng + ?Sized>(&self, book: &mut PriceBook, rng: &mut R) {
        for instrument in book.instruments_mut() {
            self.step(instrument, rng);
        }
    }

    pub fn simulate<R: Rng + ?Sized>(&self, book: &mut PriceBook, days: usize, rng: &mut R) {
        for _ in 0..days {
            self.advance_day(book, rng);
        }
        log::debug!(
            "simulated {} days for {} instruments (volatility {})",
            days,
            book.len(),
            self.volatility
        );
    }
}

/// Seeded RNG when a seed is given, entropy-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> PriceBook {
        PriceBook::new(vec![
            Instrument::new("AAPL", 150.0),
            Instrument::new("GOOGL", 2800.0),
        ])
    }

    #[test]
    fn step_stays_within_bounds() {
        let sim = PricePathSimulator::new(0.05);
        let mut rng = make_rng(Some(7));
        let mut inst = Instrument::new("AAPL", 150.0);
        for _ in 0..500 {
            let before = inst.price();
            let after = sim.step(&mut inst, &mut rng);
            let change = (after - before) / before;
            assert!(change >= -0.05 - 1e-12 && change <= 0.05 + 1e-12);
        }
        assert_eq!(inst.days(), 500);
    }

    #[test]
    fn zero_volatility_is_flat() {
        let sim = PricePathSimulator::new(0.0);
        let mut rng = make_rng(Some(1));
        let mut b = book();
        sim.simulate(&mut b, 10, &mut rng);
        assert!(b.instruments()[0].history().iter().all(|&p| p == 150.0));
    }

    #[test]
    fn simulate_appends_one_price_per_day() {
        let sim = PricePathSimulator::default();
        let mut rng = make_rng(Some(42));
        let mut b = book();
        sim.simulate(&mut b, 30, &mut rng);
        assert_eq!(b.days(), 30);
        for inst in b.instruments() {
            assert_eq!(inst.history().len(), 31);
            assert!(inst.history().iter().all(|&p| p > 0.0));
        }
    }

    #[test]
    fn same_seed_same_path() {
        let sim = PricePathSimulator::default();
        let mut a = book();
        let mut b = book();
        sim.simulate(&mut a, 30, &mut make_rng(Some(2024)));
        sim.simulate(&mut b, 30, &mut make_rng(Some(2024)));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_path() {
        let sim = PricePathSimulator::default();
        let mut a = book();
        let mut b = book();
        sim.simulate(&mut a, 30, &mut make_rng(Some(1)));
        sim.simulate(&mut b, 30, &mut make_rng(Some(2)));
        assert_ne!(a, b);
    }

    #[test]
    fn negative_volatility_is_treated_as_magnitude() {
        let sim = PricePathSimulator::new(-0.02);
        assert_eq!(sim.volatility(), 0.02);
    }
}
