//! Application configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Channel deals are posted to unless overridden.
pub const DEFAULT_CHANNEL_ID: u64 = 1450212923296452678;
/// Minutes between polling cycles.
pub const DEFAULT_POLL_INTERVAL_MINUTES: u64 = 60;
/// Longest accepted polling interval (one week).
pub const MAX_POLL_INTERVAL_MINUTES: u64 = 7 * 24 * 60;
pub const DEFAULT_LIVENESS_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Discord token is missing (set DISCORD_TOKEN)")]
    MissingCredential,
    #[error("Channel id must be non-zero")]
    InvalidChannelId,
    #[error("Poll interval must be between 1 and 10080 minutes, got {0}")]
    InvalidInterval(u64),
    #[error("Discount threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(u8),
    #[error("HTTP timeout must be at least 1 second, got {0}")]
    InvalidTimeout(u64),
}

/// Application configuration, loaded once at startup.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Discord bot token. Never serialized.
    #[serde(skip_serializing, default)]
    pub token: String,
    /// Destination channel for deal messages.
    pub channel_id: u64,
    /// Minutes between cycles.
    pub poll_interval_minutes: u64,
    /// Minimum Steam discount to announce.
    pub discount_threshold_percent: u8,
    /// Bind address of the liveness endpoint.
    pub liveness_addr: SocketAddr,
    /// Upstream request timeout in seconds.
    pub http_timeout_secs: u64,
    /// Logging level.
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("poll_interval_minutes", &self.poll_interval_minutes)
            .field("discount_threshold_percent", &self.discount_threshold_percent)
            .field("liveness_addr", &self.liveness_addr)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            channel_id: DEFAULT_CHANNEL_ID,
            poll_interval_minutes: DEFAULT_POLL_INTERVAL_MINUTES,
            discount_threshold_percent: deals_feeds::DEFAULT_DISCOUNT_THRESHOLD,
            liveness_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Check every field; the process must not start on an invalid config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        if self.channel_id == 0 {
            return Err(ConfigError::InvalidChannelId);
        }
        if self.poll_interval_minutes == 0
            || self.poll_interval_minutes > MAX_POLL_INTERVAL_MINUTES
        {
            return Err(ConfigError::InvalidInterval(self.poll_interval_minutes));
        }
        if self.discount_threshold_percent > 100 {
            return Err(ConfigError::InvalidThreshold(self.discount_threshold_percent));
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.http_timeout_secs));
        }
        Ok(())
    }

    /// Interval between cycles, capped at `MAX_POLL_INTERVAL_MINUTES`.
    pub fn poll_interval(&self) -> Duration {
        let minutes = self.poll_interval_minutes.min(MAX_POLL_INTERVAL_MINUTES);
        Duration::from_secs(minutes * 60)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
