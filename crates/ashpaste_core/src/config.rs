//! Configuration loading from environment variables.

use crate::constants::*;
use crate::db::{PoolSettings, RetryPolicy, StorageTarget};
use crate::lifecycle::BurnMode;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration for ashpaste.
#[derive(Debug, Clone)]
pub struct Config {
    /// Embedded-mode data directory.
    pub db_path: String,
    /// Networked-mode connection string; selects networked mode when set.
    pub database_url: Option<String>,
    pub port: u16,
    pub max_paste_size: usize,
    pub burn_mode: BurnMode,
    pub connect_attempts: u32,
    pub pool: PoolSettings,
    pub storage_timeout: Duration,
    /// Zero disables the background sweeper.
    pub sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            database_url: None,
            port: DEFAULT_PORT,
            max_paste_size: DEFAULT_MAX_PASTE_SIZE,
            burn_mode: BurnMode::default(),
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            pool: PoolSettings::default(),
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows USERPROFILE
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("ashpaste")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}='{}'; using default", name, raw);
            None
        }
    }
}

fn env_secs(name: &str, default: Duration) -> Duration {
    env_parse::<u64>(name)
        .map(Duration::from_secs)
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = PoolSettings::default();
        Self {
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(|_| default_db_path()),
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            port: env_parse("PORT").unwrap_or(DEFAULT_PORT),
            max_paste_size: env_parse("MAX_PASTE_SIZE").unwrap_or(DEFAULT_MAX_PASTE_SIZE),
            burn_mode: env_parse("BURN_MODE").unwrap_or_default(),
            connect_attempts: env_parse("DB_CONNECT_ATTEMPTS")
                .unwrap_or(DEFAULT_CONNECT_ATTEMPTS),
            pool: PoolSettings {
                max_idle: env_parse("DB_MAX_IDLE_CONNS").unwrap_or(defaults.max_idle),
                max_open: env_parse("DB_MAX_OPEN_CONNS").unwrap_or(defaults.max_open),
                max_lifetime: env_secs("DB_CONN_MAX_LIFETIME_SECS", defaults.max_lifetime),
                max_idle_time: env_secs("DB_CONN_MAX_IDLE_SECS", defaults.max_idle_time),
            },
            storage_timeout: env_secs("STORAGE_TIMEOUT_SECS", DEFAULT_STORAGE_TIMEOUT),
            sweep_interval: env_secs("SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL),
        }
    }

    /// Storage target selected by this configuration.
    ///
    /// Networked mode wins whenever `DATABASE_URL` was provided.
    pub fn storage_target(&self) -> StorageTarget {
        match &self.database_url {
            Some(url) => StorageTarget::Networked { url: url.clone() },
            None => StorageTarget::Embedded {
                dir: PathBuf::from(&self.db_path),
            },
        }
    }

    /// Connect retry policy derived from `connect_attempts`.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.connect_attempts,
            ..RetryPolicy::default()
        }
    }
}
