//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// One week.
const MAX_EVERY_MINUTES: u64 = 7 * 24 * 60;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listing endpoint and HTTP behavior
    #[serde(default)]
    pub source: SourceConfig,

    /// Snapshot persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Polling cadence
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Outgoing mail server
    #[serde(default)]
    pub mail: MailConfig,

    /// Digest rendering
    #[serde(default)]
    pub digest: DigestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(AppError::config("source.url is empty"));
        }
        if self.source.records_key.trim().is_empty() {
            return Err(AppError::config("source.records_key is empty"));
        }
        if url::Url::parse(&self.source.site_base_url).is_err() {
            return Err(AppError::config(format!(
                "source.site_base_url '{}' is not a valid URL",
                self.source.site_base_url
            )));
        }
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::config("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::config("source.timeout_secs must be > 0"));
        }
        if self.storage.state_file.as_os_str().is_empty() {
            return Err(AppError::config("storage.state_file is empty"));
        }
        if self.schedule.every_minutes == 0 {
            return Err(AppError::config("schedule.every_minutes must be > 0"));
        }
        if self.schedule.every_minutes > MAX_EVERY_MINUTES {
            return Err(AppError::config(format!(
                "schedule.every_minutes must be <= {}",
                MAX_EVERY_MINUTES
            )));
        }
        if self.schedule.poll_tick_secs == 0 {
            return Err(AppError::config("schedule.poll_tick_secs must be > 0"));
        }
        if self.mail.smtp_host.trim().is_empty() {
            return Err(AppError::config("mail.smtp_host is empty"));
        }
        Ok(())
    }
}

/// Listing endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint returning the JSON listing
    #[serde(default = "defaults::source_url")]
    pub url: String,

    /// Top-level key holding the records array
    #[serde(default = "defaults::records_key")]
    pub records_key: String,

    /// Base URL that record paths are relative to
    #[serde(default = "defaults::site_base_url")]
    pub site_base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::source_url(),
            records_key: defaults::records_key(),
            site_base_url: defaults::site_base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the last baseline
    #[serde(default = "defaults::state_file")]
    pub state_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: defaults::state_file(),
        }
    }
}

/// Polling cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes between checks
    #[serde(default = "defaults::every_minutes")]
    pub every_minutes: u64,

    /// Seconds between wake-ups looking for a due check
    #[serde(default = "defaults::poll_tick_secs")]
    pub poll_tick_secs: u64,
}

impl ScheduleConfig {
    pub fn every(&self) -> Duration {
        Duration::from_secs(self.every_minutes.saturating_mul(60))
    }

    pub fn poll_tick(&self) -> Duration {
        Duration::from_secs(self.poll_tick_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            every_minutes: defaults::every_minutes(),
            poll_tick_secs: defaults::poll_tick_secs(),
        }
    }
}

/// SMTP submission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// STARTTLS submission port
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
        }
    }
}

/// How ages are worded in the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeStyle {
    /// Whole elapsed months, borrowing across month ends
    #[default]
    Calendar,
    /// Byte-compatible with historical digests (year and month fields subtracted separately)
    Legacy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestConfig {
    #[serde(default)]
    pub age_style: AgeStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Mail secrets, read once from the environment at startup.
#[derive(Clone)]
pub struct Credentials {
    pub sender: Mailbox,
    pub password: String,
    pub recipient: Mailbox,
}

impl Credentials {
    pub const SENDER_VAR: &'static str = "MY_ADDRESS";
    pub const PASSWORD_VAR: &'static str = "PASSWORD";
    pub const RECIPIENT_VAR: &'static str = "RECIPIENT";

    /// Read credentials from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::config(format!("environment variable {key} is not set")))
        };

        let sender = require(Self::SENDER_VAR)?;
        let password = require(Self::PASSWORD_VAR)?;
        let recipient = require(Self::RECIPIENT_VAR)?;

        Ok(Self {
            sender: parse_mailbox(Self::SENDER_VAR, &sender)?,
            password,
            recipient: parse_mailbox(Self::RECIPIENT_VAR, &recipient)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("sender", &self.sender.to_string())
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient.to_string())
            .finish()
    }
}

fn parse_mailbox(key: &str, value: &str) -> Result<Mailbox> {
    value
        .trim()
        .parse()
        .map_err(|e| AppError::config(format!("{key} is not a valid address: {e}")))
}

mod defaults {
    use std::path::PathBuf;

    // Source defaults
    pub fn source_url() -> String {
        "https://www.battersea.org.uk/api/animals/cats".into()
    }
    pub fn records_key() -> String {
        "animals".into()
    }
    pub fn site_base_url() -> String {
        "https://www.battersea.org.uk".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; catwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Storage defaults
    pub fn state_file() -> PathBuf {
        PathBuf::from("data/old_cat_data.json")
    }

    // Schedule defaults
    pub fn every_minutes() -> u64 {
        20
    }
    pub fn poll_tick_secs() -> u64 {
        60
    }

    // Mail defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.schedule.every_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_huge_interval() {
        let mut config = Config::default();
        config.schedule.every_minutes = u64::MAX;
        assert!(config.validate().is_err());
        assert_eq!(config.schedule.every(), Duration::from_secs(u64::MAX));

        config.schedule.every_minutes = MAX_EVERY_MINUTES;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.source.site_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [schedule]
            every_minutes = 5

            [digest]
            age_style = "legacy"
            "#,
        )
        .unwrap();

        assert_eq!(config.schedule.every(), Duration::from_secs(300));
        assert_eq!(config.schedule.poll_tick(), Duration::from_secs(60));
        assert_eq!(config.digest.age_style, AgeStyle::Legacy);
        assert_eq!(config.source.records_key, "animals");
        assert_eq!(config.mail.smtp_port, 587);
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(Config::load("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn credentials_from_lookup() {
        let creds = Credentials::from_lookup(lookup(&[
            ("MY_ADDRESS", "watcher@example.com"),
            ("PASSWORD", "hunter2"),
            ("RECIPIENT", "me@example.com"),
        ]))
        .unwrap();

        assert_eq!(creds.sender.email.to_string(), "watcher@example.com");
        assert_eq!(creds.recipient.email.to_string(), "me@example.com");
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }

    #[test]
    fn credentials_missing_var_is_config_error() {
        let err = Credentials::from_lookup(lookup(&[
            ("MY_ADDRESS", "watcher@example.com"),
            ("PASSWORD", "hunter2"),
        ]))
        .unwrap_err();

        assert!(err.is_fatal());
        assert!(err.to_string().contains("RECIPIENT"));
    }

    #[test]
    fn credentials_blank_var_is_missing() {
        let err = Credentials::from_lookup(lookup(&[
            ("MY_ADDRESS", "watcher@example.com"),
            ("PASSWORD", "   "),
            ("RECIPIENT", "me@example.com"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("PASSWORD"));
    }

    #[test]
    fn credentials_reject_bad_address() {
        let err = Credentials::from_lookup(lookup(&[
            ("MY_ADDRESS", "not-an-address"),
            ("PASSWORD", "hunter2"),
            ("RECIPIENT", "me@example.com"),
        ]))
        .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }
}
