//! Configuration validation.
//!
//! Validates all config fields before a run. Missing keys fall back to their
//! defaults; present keys must hold sensible values.

use crate::domain::error::TradesimError;
use crate::domain::policy::{Direction, ZeroQuantity};
use crate::domain::signal::Smoothing;
use crate::domain::universe::parse_instruments;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_starting_cash(config)?;
    validate_days(config)?;
    validate_volatility(config)?;
    validate_seed(config)?;
    validate_instruments(config)?;
    validate_risk_free_rate(config)?;
    Ok(())
}

pub fn validate_policy_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_policies(config)?;
    validate_quantity(config)?;
    validate_zero_quantity(config)?;
    config.get_bool("policy", "parallel")?;
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_lengths(config)?;
    validate_ibs_thresholds(config)?;
    validate_smoothing(config)?;
    Ok(())
}

fn validate_starting_cash(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_double("simulation", "starting_cash")?;
    if value.is_some_and(|cash| cash <= 0.0) {
        return Err(TradesimError::invalid(
            "simulation",
            "starting_cash",
            "starting_cash must be positive",
        ));
    }
    Ok(())
}

fn validate_days(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_int("simulation", "days")?;
    if value.is_some_and(|days| days < 1) {
        return Err(TradesimError::invalid(
            "simulation",
            "days",
            "days must be at least 1",
        ));
    }
    Ok(())
}

fn validate_volatility(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_double("simulation", "volatility")?;
    if value.is_some_and(|v| !(0.0..1.0).contains(&v)) {
        return Err(TradesimError::invalid(
            "simulation",
            "volatility",
            "volatility must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match config.get_string("simulation", "seed") {
        Some(s) if s.trim().parse::<u64>().is_err() => Err(TradesimError::invalid(
            "simulation",
            "seed",
            "seed must be a non-negative integer",
        )),
        _ => Ok(()),
    }
}

fn validate_instruments(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    if let Some(list) = config.get_string("simulation", "instruments") {
        parse_instruments(&list)
            .map_err(|e| TradesimError::invalid("simulation", "instruments", e.to_string()))?;
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_double("simulation", "risk_free_rate")?;
    if value.is_some_and(|rate| !(0.0..1.0).contains(&rate)) {
        return Err(TradesimError::invalid(
            "simulation",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_policies(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let Some(list) = config.get_string("policy", "policies") else {
        return Ok(());
    };
    let mut count = 0;
    for token in list.split(',') {
        token
            .parse::<Direction>()
            .map_err(|e| TradesimError::invalid("policy", "policies", e))?;
        count += 1;
    }
    if count == 0 {
        return Err(TradesimError::invalid(
            "policy",
            "policies",
            "at least one policy is required",
        ));
    }
    Ok(())
}

fn validate_quantity(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let mode = config
        .get_string("policy", "quantity")
        .unwrap_or_else(|| "fixed".to_string());
    match mode.trim().to_lowercase().as_str() {
        "fixed" => {
            if config
                .get_int("policy", "fixed_quantity")?
                .is_some_and(|q| q < 1)
            {
                return Err(TradesimError::invalid(
                    "policy",
                    "fixed_quantity",
                    "fixed_quantity must be at least 1",
                ));
            }
        }
        "weighted" => {
            if config
                .get_double("policy", "scaling_factor")?
                .is_some_and(|sf| sf <= 0.0)
            {
                return Err(TradesimError::invalid(
                    "policy",
                    "scaling_factor",
                    "scaling_factor must be positive",
                ));
            }
        }
        other => {
            return Err(TradesimError::invalid(
                "policy",
                "quantity",
                format!("unknown quantity mode '{other}' (expected fixed or weighted)"),
            ))
        }
    }
    Ok(())
}

fn validate_zero_quantity(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    if let Some(mode) = config.get_string("policy", "zero_quantity") {
        mode.parse::<ZeroQuantity>()
            .map_err(|e| TradesimError::invalid("policy", "zero_quantity", e))?;
    }
    Ok(())
}

fn validate_lengths(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    for key in ["ma_length", "abr_lookback"] {
        if config.get_int("signals", key)?.is_some_and(|n| n < 1) {
            return Err(TradesimError::invalid(
                "signals",
                key,
                format!("{key} must be at least 1"),
            ));
        }
    }
    Ok(())
}

fn validate_ibs_thresholds(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    for key in ["ibs_bull_min", "ibs_bear_max"] {
        let value = config.get_double("signals", key)?;
        if value.is_some_and(|v| !(0.0..=100.0).contains(&v)) {
            return Err(TradesimError::invalid(
                "signals",
                key,
                format!("{key} must be between 0 and 100"),
            ));
        }
    }
    Ok(())
}

fn validate_smoothing(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    if let Some(s) = config.get_string("signals", "smoothing") {
        s.parse::<Smoothing>()
            .map_err(|e| TradesimError::invalid("signals", "smoothing", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockConfig {
        values: HashMap<(String, String), String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                values: HashMap::new(),
            }
        }

        fn set(mut self, section: &str, key: &str, value: &str) -> Self {
            self.values
                .insert((section.to_string(), key.to_string()), value.to_string());
            self
        }
    }

    impl ConfigPort for MockConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.values
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }
    }

    fn assert_invalid(result: Result<(), TradesimError>, expected_key: &str) {
        match result {
            Err(TradesimError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_valid_defaults() {
        let config = MockConfig::new();
        assert!(validate_simulation_config(&config).is_ok());
        assert!(validate_policy_config(&config).is_ok());
        assert!(validate_signal_config(&config).is_ok());
    }

    #[test]
    fn full_valid_config() {
        let config = MockConfig::new()
            .set("simulation", "seed", "42")
            .set("simulation", "days", "60")
            .set("simulation", "volatility", "0.02")
            .set("simulation", "starting_cash", "5000")
            .set("simulation", "instruments", "AAPL:150, MSFT:410")
            .set("policy", "policies", "buy_on_drop, buy_on_rise")
            .set("policy", "quantity", "weighted")
            .set("policy", "scaling_factor", "150")
            .set("policy", "zero_quantity", "submit")
            .set("signals", "smoothing", "sma")
            .set("signals", "ma_length", "10");
        assert!(validate_simulation_config(&config).is_ok());
        assert!(validate_policy_config(&config).is_ok());
        assert!(validate_signal_config(&config).is_ok());
    }

    #[test]
    fn starting_cash_must_be_positive() {
        let config = MockConfig::new().set("simulation", "starting_cash", "0");
        assert_invalid(validate_simulation_config(&config), "starting_cash");
    }

    #[test]
    fn days_must_be_positive() {
        let config = MockConfig::new().set("simulation", "days", "0");
        assert_invalid(validate_simulation_config(&config), "days");
    }

    #[test]
    fn days_must_be_an_integer() {
        let config = MockConfig::new().set("simulation", "days", "abc");
        assert_invalid(validate_simulation_config(&config), "days");
    }

    #[test]
    fn starting_cash_must_be_finite() {
        let config = MockConfig::new().set("simulation", "starting_cash", "nan");
        assert_invalid(validate_simulation_config(&config), "starting_cash");
        let config = MockConfig::new().set("simulation", "starting_cash", "inf");
        assert_invalid(validate_simulation_config(&config), "starting_cash");
    }

    #[test]
    fn unparsable_numbers_rejected_in_every_section() {
        let config = MockConfig::new().set("simulation", "risk_free_rate", "low");
        assert_invalid(validate_simulation_config(&config), "risk_free_rate");

        let config = MockConfig::new()
            .set("policy", "quantity", "weighted")
            .set("policy", "scaling_factor", "nan");
        assert_invalid(validate_policy_config(&config), "scaling_factor");

        let config = MockConfig::new().set("signals", "ibs_bear_max", "NaN");
        assert_invalid(validate_signal_config(&config), "ibs_bear_max");

        let config = MockConfig::new().set("signals", "ma_length", "twenty");
        assert_invalid(validate_signal_config(&config), "ma_length");
    }

    #[test]
    fn parallel_must_be_boolean() {
        let config = MockConfig::new().set("policy", "parallel", "maybe");
        assert_invalid(validate_policy_config(&config), "parallel");
    }

    #[test]
    fn volatility_range() {
        let config = MockConfig::new().set("simulation", "volatility", "1.5");
        assert_invalid(validate_simulation_config(&config), "volatility");
        let config = MockConfig::new().set("simulation", "volatility", "-0.1");
        assert_invalid(validate_simulation_config(&config), "volatility");
    }

    #[test]
    fn seed_must_be_integer() {
        let config = MockConfig::new().set("simulation", "seed", "abc");
        assert_invalid(validate_simulation_config(&config), "seed");
    }

    #[test]
    fn instruments_must_parse() {
        let config = MockConfig::new().set("simulation", "instruments", "AAPL:150,AAPL:151");
        assert_invalid(validate_simulation_config(&config), "instruments");
    }

    #[test]
    fn risk_free_rate_range() {
        let config = MockConfig::new().set("simulation", "risk_free_rate", "2");
        assert_invalid(validate_simulation_config(&config), "risk_free_rate");
    }

    #[test]
    fn unknown_policy_rejected() {
        let config = MockConfig::new().set("policy", "policies", "buy_on_drop,hodl");
        assert_invalid(validate_policy_config(&config), "policies");
    }

    #[test]
    fn unknown_quantity_mode_rejected() {
        let config = MockConfig::new().set("policy", "quantity", "kelly");
        assert_invalid(validate_policy_config(&config), "quantity");
    }

    #[test]
    fn fixed_quantity_at_least_one() {
        let config = MockConfig::new().set("policy", "fixed_quantity", "0");
        assert_invalid(validate_policy_config(&config), "fixed_quantity");
    }

    #[test]
    fn scaling_factor_positive() {
        let config = MockConfig::new()
            .set("policy", "quantity", "weighted")
            .set("policy", "scaling_factor", "-1");
        assert_invalid(validate_policy_config(&config), "scaling_factor");
    }

    #[test]
    fn zero_quantity_mode_rejected() {
        let config = MockConfig::new().set("policy", "zero_quantity", "round_up");
        assert_invalid(validate_policy_config(&config), "zero_quantity");
    }

    #[test]
    fn signal_lengths_at_least_one() {
        let config = MockConfig::new().set("signals", "abr_lookback", "0");
        assert_invalid(validate_signal_config(&config), "abr_lookback");
    }

    #[test]
    fn ibs_thresholds_in_range() {
        let config = MockConfig::new().set("signals", "ibs_bull_min", "120");
        assert_invalid(validate_signal_config(&config), "ibs_bull_min");
    }

    #[test]
    fn smoothing_rejected() {
        let config = MockConfig::new().set("signals", "smoothing", "wma");
        assert_invalid(validate_signal_config(&config), "smoothing");
    }
}
