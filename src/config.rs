//! Configuration types, built from environment variables.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::channels::slack::{DEFAULT_SLACK_API_BASE, SlackConfig};
use crate::error::ConfigError;

const DEFAULT_MAIL_LOG_PATH: &str = "./data/mail-events.log";
const DEFAULT_PORT: u16 = 8080;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub slack: SlackConfig,
    /// Suppression endpoint; `None` selects the in-memory registrar.
    pub suppression_url: Option<String>,
    pub suppression_token: Option<SecretString>,
    /// Audit log file for raw payloads.
    pub mail_log_path: PathBuf,
    pub port: u16,
}

impl HandlerConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require =
            |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let slack = SlackConfig {
            bot_token: SecretString::from(require("SLACK_BOT_TOKEN")?),
            channel: require("SLACK_CHANNEL_NAME")?,
            api_base: get("SLACK_API_BASE").unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string()),
        };

        let port = match get("MAIL_EVENT_HANDLER_PORT") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "MAIL_EVENT_HANDLER_PORT".into(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            slack,
            suppression_url: get("SUPPRESSION_API_URL"),
            suppression_token: get("SUPPRESSION_API_TOKEN").map(SecretString::from),
            mail_log_path: get("MAIL_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MAIL_LOG_PATH)),
            port,
        })
    }
}
