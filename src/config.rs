use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::render::{DEFAULT_WINDOW, RenderOptions};
use crate::session::StoreLimits;

/// Environment variable holding the Telegram bot token.
pub const TOKEN_ENV: &str = "PANTRY_TELEGRAM_TOKEN";

/// Errors from reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Bot settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Recipe catalog file (JSON or YAML).
    pub catalog: PathBuf,
    /// Channel users must join, e.g. `@my_channel`. No gating when unset.
    pub channel: Option<String>,
    /// Number of top matches offered as buttons.
    pub suggestion_window: usize,
    /// Reclaim sessions idle for this many seconds.
    pub session_idle_ttl_secs: Option<u64>,
    /// Upper bound on live sessions.
    pub max_sessions: Option<usize>,
    pub telegram: TelegramConfig,
}

/// Telegram long-poll settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TelegramConfig {
    pub api_base: String,
    pub poll_timeout_secs: u64,
    pub retry_delay_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("recipes.json"),
            channel: None,
            suggestion_window: DEFAULT_WINDOW,
            session_idle_ttl_secs: None,
            max_sessions: None,
            telegram: TelegramConfig::default(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_owned(),
            poll_timeout_secs: 30,
            retry_delay_secs: 5,
        }
    }
}

impl BotConfig {
    /// Read and validate a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse and validate YAML config text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid YAML or fails validation.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.suggestion_window == 0 {
            return Err(ConfigError::Invalid(
                "suggestion_window must be at least 1".to_owned(),
            ));
        }
        if self.max_sessions == Some(0) {
            return Err(ConfigError::Invalid(
                "max_sessions must be at least 1".to_owned(),
            ));
        }
        if self.telegram.api_base.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "telegram.api_base must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn store_limits(&self) -> StoreLimits {
        StoreLimits {
            idle_ttl: self.session_idle_ttl_secs.map(Duration::from_secs),
            max_sessions: self.max_sessions,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            window: self.suggestion_window,
            channel: self.channel.clone(),
            user_name: None,
        }
    }
}
