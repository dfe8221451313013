//! Shared test-only helpers for ashpaste_core.

use crate::{
    clock::ManualClock, lifecycle::BurnMode, service::PasteService,
    validation::ContentValidator, Database,
};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

/// Creates an isolated embedded database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing file.
///
/// # Panics
/// Panics if temp-dir creation or database initialization fails.
pub(crate) async fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db = Database::open_embedded(&temp_dir.path().join("db"))
        .await
        .expect("db");
    (db, temp_dir)
}

/// Fixed starting instant for manual clocks.
pub(crate) fn test_clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap())
}

/// Service over a fresh temp database driven by a manual clock.
pub(crate) async fn setup_service(
    burn_mode: BurnMode,
) -> (PasteService, ManualClock, Database, TempDir) {
    let (db, temp_dir) = setup_temp_db().await;
    let clock = test_clock();
    let service = PasteService::new(
        db.pastes.clone(),
        ContentValidator::new(1024),
        burn_mode,
        Arc::new(clock.clone()),
    );
    (service, clock, db, temp_dir)
}
