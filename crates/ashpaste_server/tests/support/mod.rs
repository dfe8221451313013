//! Shared integration-test server bootstrap helpers.

use ashpaste_core::{clock::ManualClock, ContentValidator};
use ashpaste_server::{create_app, AppState, BurnMode, Config, Database, PasteService};
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) const TEST_MAX_PASTE_SIZE: usize = 4096;

pub(crate) struct TestApp {
    pub server: TestServer,
    pub clock: ManualClock,
    pub db: Database,
    pub _temp: TempDir,
}

pub(crate) fn test_config(temp_dir: &TempDir, burn_mode: BurnMode) -> Config {
    Config {
        port: 0,
        db_path: temp_dir
            .path()
            .join("db")
            .to_str()
            .expect("db path")
            .to_string(),
        max_paste_size: TEST_MAX_PASTE_SIZE,
        burn_mode,
        ..Config::default()
    }
}

pub(crate) async fn setup_test_app(burn_mode: BurnMode) -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(&temp_dir, burn_mode);
    let db = Database::connect(&config).await.expect("open db");
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap());
    let service = PasteService::new(
        db.pastes.clone(),
        ContentValidator::new(config.max_paste_size),
        config.burn_mode,
        Arc::new(clock.clone()),
    );
    let state = AppState::with_service(config, db.clone(), service);
    let server = TestServer::new(create_app(state)).expect("server");
    TestApp {
        server,
        clock,
        db,
        _temp: temp_dir,
    }
}
