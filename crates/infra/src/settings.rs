//! Runtime settings, loaded with the `config` crate.
//!
//! Defaults are built in; environment variables prefixed `STOCKYARD` with
//! `__` as the section separator override them, e.g.
//! `STOCKYARD__LEDGER__MAX_CONFLICT_RETRIES=8`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "STOCKYARD";

const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 5;
const DEFAULT_REVIEW_PERIOD_DAYS: i64 = 7;
const MAX_REVIEW_PERIOD_DAYS: i64 = 3650;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub ledger: LedgerSettings,
    pub surplus: SurplusSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerSettings {
    /// Attempts after the first when a commit hits a version conflict.
    pub max_conflict_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SurplusSettings {
    /// Minimum days between evaluation and secondary approval.
    pub review_period_days: i64,
}

impl SurplusSettings {
    /// Saturates instead of overflowing for hand-built settings that skipped
    /// validation.
    pub fn review_period(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.review_period_days).unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogSettings {
    pub filter: String,
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ledger: LedgerSettings {
                max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            },
            surplus: SurplusSettings {
                review_period_days: DEFAULT_REVIEW_PERIOD_DAYS,
            },
            log: LogSettings {
                filter: DEFAULT_LOG_FILTER.to_owned(),
                json: true,
            },
        }
    }
}

impl Settings {
    /// Defaults overridden by `STOCKYARD__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    /// Defaults overridden by an explicit environment source (tests pass a
    /// `source` map here instead of touching the process environment).
    pub fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default(
                "ledger.max_conflict_retries",
                i64::from(DEFAULT_MAX_CONFLICT_RETRIES),
            )?
            .set_default("surplus.review_period_days", DEFAULT_REVIEW_PERIOD_DAYS)?
            .set_default("log.filter", DEFAULT_LOG_FILTER)?
            .set_default("log.json", true)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let days = self.surplus.review_period_days;
        if !(0..=MAX_REVIEW_PERIOD_DAYS).contains(&days) {
            return Err(ConfigError::Message(format!(
                "surplus.review_period_days must be between 0 and {}, got {}",
                MAX_REVIEW_PERIOD_DAYS, days
            )));
        }
        Ok(())
    }
}
