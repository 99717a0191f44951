use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    errors::FinanceError,
    utils::{ensure_dir, paths::PathResolver, write_atomic},
};

pub const CONFIG_KEYS: [&str; 4] = ["locale", "currency", "active_book", "savings_goal"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub active_book: String,
    /// Yearly target the paid savings are measured against.
    #[serde(default = "Config::default_savings_goal")]
    pub savings_goal: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            active_book: "default".into(),
            savings_goal: Self::default_savings_goal(),
        }
    }
}

impl Config {
    /// Sets one of [`CONFIG_KEYS`] from its textual value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), FinanceError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(FinanceError::Config(format!("`{key}` cannot be empty")));
        }
        match key {
            "locale" => self.locale = value.to_string(),
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(FinanceError::Config(format!(
                        "currency must be a three-letter code, got `{value}`"
                    )));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "active_book" => self.active_book = value.to_string(),
            "savings_goal" => {
                self.savings_goal = Decimal::from_str(value)
                    .ok()
                    .filter(|goal| *goal > Decimal::ZERO)
                    .ok_or_else(|| {
                        FinanceError::Config(format!(
                            "savings_goal must be a positive amount, got `{value}`"
                        ))
                    })?;
            }
            other => {
                return Err(FinanceError::Config(format!(
                    "unknown key `{other}` (expected one of {})",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            ("active_book", self.active_book.clone()),
            ("savings_goal", self.savings_goal.to_string()),
        ]
    }

    fn default_savings_goal() -> Decimal {
        Decimal::new(100_000, 0)
    }
}

/// Loads and saves [`Config`] as JSON under the application home directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, FinanceError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, FinanceError> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the stored configuration, falling back to defaults when absent.
    pub fn load(&self) -> Result<Config, FinanceError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data)
            .map_err(|err| FinanceError::Config(format!("{}: {err}", self.path.display())))
    }

    pub fn save(&self, config: &Config) -> Result<(), FinanceError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
