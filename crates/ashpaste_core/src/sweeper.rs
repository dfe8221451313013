//! Background removal of expired rows.
//!
//! Lazy expiry on read stays authoritative; the sweeper only keeps storage
//! from accumulating pastes nobody reads again.

use crate::{clock::Clock, db::PasteStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Run one sweep.
///
/// # Returns
/// Number of rows removed, or 0 when the sweep failed (the failure is logged).
pub async fn sweep_once(store: &PasteStore, clock: &dyn Clock) -> u64 {
    match store.purge_expired(clock.now()).await {
        Ok(0) => 0,
        Ok(removed) => {
            tracing::info!("Expiry sweep removed {} paste(s)", removed);
            removed
        }
        Err(err) => {
            tracing::warn!("Expiry sweep failed: {}", err);
            0
        }
    }
}

/// Spawn the periodic sweeper.
///
/// # Returns
/// `None` when `interval` is zero (sweeping disabled).
pub fn spawn_expiry_sweeper(
    store: PasteStore,
    clock: Arc<dyn Clock>,
    interval: Duration,
) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        tracing::info!("Expiry sweeper disabled");
        return None;
    }
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweep_once(&store, clock.as_ref()).await;
        }
    }))
}
