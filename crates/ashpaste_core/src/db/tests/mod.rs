//! Storage, connection and lifecycle integration tests.

use super::*;
use crate::error::{AppError, HealthCheckError};
use crate::lifecycle::BurnMode;
use crate::models::paste::*;
use crate::test_support::{setup_service, setup_temp_db, test_clock};
use chrono::Duration as ChronoDuration;

fn sample_paste(content: &str, burn: bool, lifetime: ChronoDuration) -> Paste {
    let now = chrono::Utc::now();
    Paste::new(content.to_string(), String::new(), burn, now + lifetime, now)
}

fn create_request(content: &str, burn: bool, expiry_minutes: i64) -> CreatePasteRequest {
    CreatePasteRequest {
        content: content.to_string(),
        language: String::new(),
        burn,
        expiry_minutes,
    }
}

mod basic_ops;
