//! Configuration access port trait.

use crate::domain::error::TradesimError;

/// Section/key lookups over a loaded configuration.
///
/// Typed lookups return `Ok(None)` for a missing key and `ConfigInvalid` for
/// a value that does not parse. Doubles must also be finite.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, TradesimError> {
        self.get_string(section, key)
            .map(|raw| {
                raw.trim().parse::<i64>().map_err(|_| {
                    TradesimError::invalid(section, key, format!("'{raw}' is not an integer"))
                })
            })
            .transpose()
    }

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, TradesimError> {
        let Some(raw) = self.get_string(section, key) else {
            return Ok(None);
        };
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(TradesimError::invalid(
                section,
                key,
                format!("'{raw}' is not a finite number"),
            )),
        }
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, TradesimError> {
        let Some(raw) = self.get_string(section, key) else {
            return Ok(None);
        };
        match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(TradesimError::invalid(
                section,
                key,
                format!("'{raw}' is not a boolean"),
            )),
        }
    }
}
