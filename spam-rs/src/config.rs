use crate::error::{Result, SpamError};
use crate::scoring::DEFAULT_CUTOFF;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub classifier: ClassifierConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Spamicity at or above which a message is spam
    pub cutoff: f64,
    /// Reduce words to their English stem
    pub stemming: bool,
    pub min_token_len: usize,
    pub max_token_len: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpamError::Config(e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SpamError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let cutoff = self.classifier.cutoff;
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(SpamError::Config(format!(
                "classifier.cutoff must be within [0, 1], got {}",
                cutoff
            )));
        }

        if self.classifier.min_token_len == 0
            || self.classifier.min_token_len > self.classifier.max_token_len
        {
            return Err(SpamError::Config(format!(
                "invalid token length bounds: min {} / max {}",
                self.classifier.min_token_len, self.classifier.max_token_len
            )));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(SpamError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://spam.db".to_string(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            stemming: true,
            min_token_len: 1,
            max_token_len: 40,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
