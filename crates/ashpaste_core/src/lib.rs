//! Core domain library for ashpaste (config, storage, validation, lifecycle).

/// Time sources.
pub mod clock;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Storage connection management and paste persistence.
pub mod db;
/// Application error types.
pub mod error;
/// Read-time lifecycle state machine.
pub mod lifecycle;
/// Data models for API requests and persistence.
pub mod models;
/// Create / read / delete orchestration.
pub mod service;
/// Background expiry sweeper.
pub mod sweeper;
/// Pre-persistence content checks.
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use db::{ConnectionManager, Database, PasteStore};
pub use error::{AppError, HealthCheckError, ValidationError};
pub use lifecycle::{BurnMode, LifecycleEvaluator, PasteState};
pub use service::PasteService;
pub use validation::ContentValidator;
