//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use chrono::{FixedOffset, Weekday};
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Webhook ===
    /// Discord-compatible webhook URL. Required unless `dry_run` is set.
    #[serde(default)]
    pub discord_webhook_url: String,

    // === State ===
    /// Path of the persisted state record.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    // === Price provider ===
    /// CoinGecko-compatible API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Provider coin identifier (e.g. "bitcoin").
    #[serde(default = "default_coin_id")]
    pub coin_id: String,

    /// Quote currency (e.g. "usd").
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    // === Alerting ===
    /// Percentage bands, ascending (e.g. "5,10,15").
    #[serde(default = "default_alert_bands")]
    pub alert_bands: Vec<u32>,

    // === Retry ===
    /// Total attempts per HTTP operation.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay before the first retry; doubles per failed attempt.
    #[serde(default = "default_retry_base_delay_secs")]
    pub retry_base_delay_secs: u64,

    /// Per-request timeout.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    // === Calendar ===
    /// Fixed UTC offset, in hours, for all calendar computations.
    #[serde(default)]
    pub utc_offset_hours: i32,

    /// Weekday of the weekly summary (chrono name, e.g. "sun").
    #[serde(default = "default_weekly_summary_weekday")]
    pub weekly_summary_weekday: String,

    /// Local hour of the weekly summary.
    #[serde(default)]
    pub weekly_summary_hour: u32,

    /// Local hour of the monthly summary (fires on the last day of month).
    #[serde(default = "default_monthly_summary_hour")]
    pub monthly_summary_hour: u32,

    // === Operation modes ===
    /// Log alerts instead of posting them.
    #[serde(default)]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".state/btc_state.json")
}

fn default_api_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_coin_id() -> String {
    "bitcoin".to_string()
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_alert_bands() -> Vec<u32> {
    vec![5, 10, 15]
}

fn default_retry_attempts() -> u32 {
    4
}

fn default_retry_base_delay_secs() -> u64 {
    3
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_weekly_summary_weekday() -> String {
    "sun".to_string()
}

fn default_monthly_summary_hour() -> u32 {
    23
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.dry_run {
            if self.discord_webhook_url.is_empty() {
                return Err("DISCORD_WEBHOOK_URL is required".to_string());
            }
            if !self.discord_webhook_url.starts_with("http") {
                return Err("DISCORD_WEBHOOK_URL must be an http(s) URL".to_string());
            }
        }

        if self.alert_bands.is_empty() {
            return Err("ALERT_BANDS must not be empty".to_string());
        }
        if self.alert_bands.iter().any(|&b| b == 0) {
            return Err("ALERT_BANDS must be positive".to_string());
        }
        if !self.alert_bands.windows(2).all(|w| w[0] < w[1]) {
            return Err("ALERT_BANDS must be strictly ascending".to_string());
        }

        if self.retry_attempts == 0 {
            return Err("RETRY_ATTEMPTS must be at least 1".to_string());
        }

        if self.weekly_summary_hour > 23 || self.monthly_summary_hour > 23 {
            return Err("summary hours must be 0-23".to_string());
        }
        if self.weekly_weekday().is_none() {
            return Err(format!(
                "WEEKLY_SUMMARY_WEEKDAY '{}' is not a weekday name",
                self.weekly_summary_weekday
            ));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err("UTC_OFFSET_HOURS must be between -12 and 14".to_string());
        }

        Ok(())
    }

    /// Parsed weekday of the weekly summary.
    pub fn weekly_weekday(&self) -> Option<Weekday> {
        self.weekly_summary_weekday.parse().ok()
    }

    /// Fixed offset used for all calendar computations.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }
}
