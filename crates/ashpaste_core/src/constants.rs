//! Shared constants used across ashpaste crates.

use std::time::Duration;

/// Default API port.
pub const DEFAULT_PORT: u16 = 38480;

/// Default maximum paste size accepted at creation, in bytes.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Shortest accepted paste lifetime.
pub const MIN_EXPIRY_MINUTES: i64 = 1;
/// Longest accepted paste lifetime (365 days).
pub const MAX_EXPIRY_MINUTES: i64 = 365 * 24 * 60;

/// Startup connection attempts before giving up.
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;
/// Unit for the quadratic connect backoff (`base * attempt^2`).
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);
/// Liveness probe timeout used for each connect attempt.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound for a health check (ping plus row count).
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound for closing the storage handle during shutdown.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pool defaults for networked mode.
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 5;
/// Maximum open connections in networked mode.
pub const DEFAULT_MAX_OPEN_CONNS: u32 = 25;
/// Connections are recycled after this long.
pub const DEFAULT_CONN_MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);
/// Idle connections above the warm floor are reaped after this long.
pub const DEFAULT_CONN_MAX_IDLE_TIME: Duration = Duration::from_secs(10 * 60);

/// Per-operation storage timeout for request-path queries.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(30);
/// Default period of the expired-row sweeper.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// File name for the redb database within the configured data directory.
pub const REDB_FILE_NAME: &str = "pastes.redb";
