//! INI file configuration adapter.

use crate::domain::error::TradesimError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, TradesimError> {
        self.config
            .getint(section, key)
            .map_err(|reason| TradesimError::invalid(section, key, reason))
    }

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, TradesimError> {
        match self.config.getfloat(section, key) {
            Ok(Some(value)) if !value.is_finite() => Err(TradesimError::invalid(
                section,
                key,
                format!("{value} is not a finite number"),
            )),
            other => other.map_err(|reason| TradesimError::invalid(section, key, reason)),
        }
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, TradesimError> {
        self.config
            .get(section, key)
            .map(|raw| {
                Self::parse_bool(&raw).ok_or_else(|| {
                    TradesimError::invalid(section, key, format!("'{raw}' is not a boolean"))
                })
            })
            .transpose()
    }
}
