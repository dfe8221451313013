//! Basic paste store CRUD tests.

use super::*;
use crate::clock::Clock;
use crate::sweeper::sweep_once;

#[tokio::test]
async fn paste_create_fetch_delete_roundtrip() {
    let (db, _temp) = setup_temp_db().await;

    let paste = sample_paste("Test content", false, ChronoDuration::minutes(10));
    db.pastes.create(&paste).await.expect("create");

    let fetched = db
        .pastes
        .fetch_by_id(&paste.id.to_string())
        .await
        .expect("fetch");
    assert_eq!(fetched, paste);

    db.pastes
        .delete_by_id(&paste.id.to_string())
        .await
        .expect("delete");
    assert!(matches!(
        db.pastes.fetch_by_id(&paste.id.to_string()).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn paste_create_rejects_duplicate_id_without_overwrite() {
    let (db, _temp) = setup_temp_db().await;

    let original = sample_paste("original", false, ChronoDuration::minutes(10));
    db.pastes.create(&original).await.expect("create original");

    let mut conflicting = sample_paste("conflicting", true, ChronoDuration::minutes(10));
    conflicting.id = original.id;
    let err = db
        .pastes
        .create(&conflicting)
        .await
        .expect_err("duplicate id create must fail");
    assert!(
        matches!(err, AppError::StorageMessage(ref message) if message.contains("already exists")),
        "unexpected duplicate-create error: {}",
        err
    );
    assert!(err.is_storage_failure());

    let stored = db.pastes.fetch(original.id).await.expect("fetch").expect("row");
    assert_eq!(stored.content, "original");
}

#[tokio::test]
async fn malformed_ids_are_rejected_before_storage() {
    let (db, _temp) = setup_temp_db().await;
    db.close().await.expect("close");

    // With the handle closed, reaching storage would fail differently.
    assert!(matches!(
        db.pastes.fetch_by_id("definitely-not-a-uuid").await,
        Err(AppError::InvalidId)
    ));
    assert!(matches!(
        db.pastes.delete_by_id("1234").await,
        Err(AppError::InvalidId)
    ));
}

#[tokio::test]
async fn delete_is_not_idempotent() {
    let (db, _temp) = setup_temp_db().await;

    let missing = uuid::Uuid::new_v4().to_string();
    assert!(matches!(
        db.pastes.delete_by_id(&missing).await,
        Err(AppError::NotFound)
    ));

    let paste = sample_paste("delete me", false, ChronoDuration::minutes(10));
    db.pastes.create(&paste).await.expect("create");
    let id = paste.id.to_string();
    db.pastes.delete_by_id(&id).await.expect("first delete");
    assert!(matches!(
        db.pastes.delete_by_id(&id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn take_returns_row_exactly_once() {
    let (db, _temp) = setup_temp_db().await;

    let paste = sample_paste("once", true, ChronoDuration::minutes(10));
    db.pastes.create(&paste).await.expect("create");

    let taken = db.pastes.take(paste.id).await.expect("take");
    assert_eq!(taken.map(|p| p.content).as_deref(), Some("once"));
    assert!(db.pastes.take(paste.id).await.expect("second take").is_none());
}

#[tokio::test]
async fn purge_and_sweep_remove_only_expired_rows() {
    let (db, _temp) = setup_temp_db().await;
    let clock = test_clock();
    let now = clock.now();

    let expired = Paste::new(
        "old".into(),
        String::new(),
        false,
        now - ChronoDuration::minutes(1),
        now - ChronoDuration::minutes(2),
    );
    let live = Paste::new(
        "new".into(),
        String::new(),
        false,
        now + ChronoDuration::minutes(1),
        now,
    );
    db.pastes.create(&expired).await.expect("create expired");
    db.pastes.create(&live).await.expect("create live");
    assert_eq!(db.pastes.count().await.expect("count"), 2);

    assert_eq!(sweep_once(&db.pastes, &clock).await, 1);
    assert!(db.pastes.fetch(expired.id).await.expect("fetch").is_none());
    assert!(db.pastes.fetch(live.id).await.expect("fetch").is_some());

    clock.advance(ChronoDuration::minutes(5));
    assert_eq!(
        db.pastes.purge_expired(clock.now()).await.expect("purge"),
        1
    );
    assert_eq!(db.pastes.count().await.expect("count"), 0);
}

#[tokio::test]
async fn reopening_embedded_store_preserves_rows() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let dir = temp.path().join("db");
    let paste = sample_paste("durable", false, ChronoDuration::minutes(10));

    {
        let db = Database::open_embedded(&dir).await.expect("open");
        db.pastes.create(&paste).await.expect("create");
        db.close().await.expect("close");
    }

    let db = Database::open_embedded(&dir).await.expect("reopen");
    let fetched = db.pastes.fetch(paste.id).await.expect("fetch").expect("row");
    assert_eq!(fetched.content, "durable");
}
