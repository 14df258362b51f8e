use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::shared::errors::AppError;
use crate::shared::types::{Currency, DcaPair};
use crate::shared::utils::{expand_env, parse_duration};

#[derive(Debug, Clone, Deserialize)]
pub struct KrakenCfg {
    pub key: String,
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpCfg {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
}

/// Bot configuration, read from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub kraken: KrakenCfg,
    pub smtp: SmtpCfg,
    /// Recipient of the failure emails
    pub notify: String,
    /// Interval between two runs, e.g. `24h`
    pub frequency: String,
    pub currency: Currency,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub pairs: Vec<DcaPair>,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the configuration file, expanding `${VAR}` references first
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, AppError> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("cannot read the configuration file {}: {}", path.display(), e))
        })?;

        Self::parse(&expand_env(&config_content))
    }

    pub fn parse(content: &str) -> Result<Config, AppError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("failed to parse the configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.kraken.key.trim().is_empty() {
            return Err(AppError::ConfigError("the kraken key is not specified".to_string()));
        }
        if self.kraken.secret.trim().is_empty() {
            return Err(AppError::ConfigError("the kraken secret is not specified".to_string()));
        }

        for pair in &self.pairs {
            if pair.pair.trim().is_empty() {
                return Err(AppError::ConfigError("a pair symbol is empty".to_string()));
            }
            if !pair.amount.is_finite() || pair.amount <= 0.0 {
                return Err(AppError::ConfigError(format!(
                    "the {} amount must be a positive number, got {}",
                    pair.pair, pair.amount
                )));
            }
        }

        if self.frequency_duration()?.is_zero() {
            return Err(AppError::ConfigError("the frequency must not be zero".to_string()));
        }

        Ok(())
    }

    pub fn frequency_duration(&self) -> Result<Duration, AppError> {
        parse_duration(&self.frequency)
    }
}
