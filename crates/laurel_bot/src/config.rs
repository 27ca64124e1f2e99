//! Layered bot configuration.
//!
//! Sources, lowest precedence first:
//! 1. Bundled defaults (`laurel.toml` at the workspace root)
//! 2. `~/.config/laurel/laurel.toml`
//! 3. `./laurel.toml`, or the file passed with `--config`
//! 4. `LAUREL_*` environment variables, `__` separating sections
//!    (`LAUREL_DATABASE__URL`, `LAUREL_SERVER__PORT`)

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use laurel_error::{ConfigError, LaurelError, LaurelResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../laurel.toml");

/// Chat-facing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSettings {
    /// Command prefix
    pub prefix: String,
}

/// Storage options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite path, or `:memory:`
    pub url: String,
}

/// Health server options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

/// Cooldown map housekeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownSettings {
    /// Seconds between prune passes
    pub prune_interval_seconds: u64,
    /// Entries older than this many seconds are dropped
    pub max_age_seconds: u64,
}

impl CooldownSettings {
    /// Time between prune passes, at least one second.
    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval_seconds.max(1))
    }

    /// Age after which an entry is dropped.
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.max_age_seconds).unwrap_or(i64::MAX))
    }
}

/// Complete bot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaurelConfig {
    /// Chat-facing options
    pub bot: BotSettings,
    /// Storage options
    pub database: DatabaseSettings,
    /// Health server options
    pub server: ServerSettings,
    /// Cooldown map housekeeping
    pub cooldowns: CooldownSettings,
}

impl LaurelConfig {
    /// Load from every layer, with `./laurel.toml` as the local override.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a present file is malformed or a
    /// value has the wrong type.
    #[instrument]
    pub fn load() -> LaurelResult<Self> {
        let builder = Self::base()
            .add_source(File::with_name("laurel").required(false))
            .add_source(Self::environment());
        Self::finish(builder)
    }

    /// Load with `path` as the local override instead of `./laurel.toml`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `path` is missing or malformed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> LaurelResult<Self> {
        let builder = Self::base()
            .add_source(File::from(path.as_ref()))
            .add_source(Self::environment());
        Self::finish(builder)
    }

    /// Bundled defaults only.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled file is malformed.
    pub fn defaults() -> LaurelResult<Self> {
        Self::finish(
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)),
        )
    }

    fn base() -> ConfigBuilder<DefaultState> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config/laurel/laurel.toml");
            debug!(path = %user_config.display(), "Checking user configuration");
            builder = builder.add_source(File::from(user_config).required(false));
        }
        builder
    }

    fn environment() -> Environment {
        Environment::with_prefix("LAUREL")
            .prefix_separator("_")
            .separator("__")
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> LaurelResult<Self> {
        builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| {
                LaurelError::from(ConfigError::new(format!(
                    "Failed to load configuration: {}",
                    e
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_parse() {
        let config = LaurelConfig::defaults().unwrap();
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.database.url, "data/laurel.db");
        assert_eq!(config.server.port, 10000);
        assert!(config.cooldowns.max_age_seconds >= 600);
    }

    #[test]
    fn prune_interval_never_zero() {
        let settings = CooldownSettings {
            prune_interval_seconds: 0,
            max_age_seconds: 10,
        };
        assert_eq!(settings.prune_interval(), Duration::from_secs(1));
        assert_eq!(settings.max_age(), chrono::Duration::seconds(10));
    }
}
