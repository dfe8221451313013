//! Read-time lifecycle evaluation: live, expired or burn-consumed.
//!
//! A paste moves `Live -> {Expired, Consumed} -> gone` and never back. The
//! transition is decided on every read; removal goes through the store's
//! atomic take so at most one reader can ever be handed burn content.

use crate::{
    clock::Clock,
    db::PasteStore,
    error::AppError,
    models::paste::Paste,
};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// State of a fetched paste at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteState {
    Live,
    Expired,
    /// Burn-after-read paste being consumed by this read.
    Consumed,
}

/// What a read does with a burn-after-read paste.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BurnMode {
    /// Delete on first access and report `Gone` without serving content.
    #[default]
    Destroy,
    /// Serve the content to the one reader whose take removed the row.
    ServeOnce,
}

impl FromStr for BurnMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "destroy" => Ok(BurnMode::Destroy),
            "serve-once" | "serve_once" => Ok(BurnMode::ServeOnce),
            other => Err(format!("unknown burn mode '{}'", other)),
        }
    }
}

/// Classify a paste. Expiry wins over burn.
pub fn evaluate(paste: &Paste, now: DateTime<Utc>) -> PasteState {
    if paste.is_expired_at(now) {
        PasteState::Expired
    } else if paste.burn {
        PasteState::Consumed
    } else {
        PasteState::Live
    }
}

/// Applies [`evaluate`] on reads and performs the resulting deletions.
#[derive(Clone)]
pub struct LifecycleEvaluator {
    store: PasteStore,
    clock: Arc<dyn Clock>,
    burn_mode: BurnMode,
}

impl LifecycleEvaluator {
    pub fn new(store: PasteStore, clock: Arc<dyn Clock>, burn_mode: BurnMode) -> Self {
        Self {
            store,
            clock,
            burn_mode,
        }
    }

    pub fn burn_mode(&self) -> BurnMode {
        self.burn_mode
    }

    /// Fetch and evaluate a paste for a read.
    ///
    /// # Returns
    /// The paste when it may be served to this caller.
    ///
    /// # Errors
    /// - `InvalidId` / `NotFound` from the fetch.
    /// - `Gone` for expired pastes and consumed burn pastes (including when a
    ///   concurrent reader removed the row first).
    /// - Storage failures from the fetch, or from the take in serve-once mode.
    pub async fn read(&self, id: &str) -> Result<Paste, AppError> {
        let paste = self.store.fetch_by_id(id).await?;
        let now = self.clock.now();

        match evaluate(&paste, now) {
            PasteState::Live => Ok(paste),
            PasteState::Expired => {
                self.retire(paste.id, "expired").await;
                Err(AppError::Gone)
            }
            PasteState::Consumed => match self.burn_mode {
                BurnMode::Destroy => {
                    self.retire(paste.id, "burned").await;
                    Err(AppError::Gone)
                }
                BurnMode::ServeOnce => match self.store.take(paste.id).await? {
                    Some(taken) => {
                        tracing::info!("Served burn-after-read paste {} once", taken.id);
                        Ok(taken)
                    }
                    None => Err(AppError::Gone),
                },
            },
        }
    }

    /// Remove a paste whose content is being withheld.
    ///
    /// Content is withheld regardless of the outcome, so failures are logged
    /// rather than returned; the row is retried on the next read or sweep.
    async fn retire(&self, id: Uuid, reason: &str) {
        match self.store.take(id).await {
            Ok(Some(_)) => tracing::info!("Removed {} paste {}", reason, id),
            Ok(None) => tracing::debug!("Paste {} already removed by a concurrent reader", id),
            Err(err) => tracing::warn!("Failed to remove {} paste {}: {}", reason, id, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn paste(burn: bool, expires_in: Duration, now: DateTime<Utc>) -> Paste {
        Paste::new("body".into(), String::new(), burn, now + expires_in, now)
    }

    #[test]
    fn evaluate_state_matrix() {
        let now = Utc.with_ymd_and_hms(2026, 2, 2, 2, 2, 2).unwrap();
        let cases = [
            (false, Duration::minutes(5), PasteState::Live),
            (true, Duration::minutes(5), PasteState::Consumed),
            (false, Duration::minutes(-1), PasteState::Expired),
            (true, Duration::minutes(-1), PasteState::Expired),
            (false, Duration::zero(), PasteState::Live),
        ];
        for (burn, expires_in, expected) in cases {
            assert_eq!(
                evaluate(&paste(burn, expires_in, now), now),
                expected,
                "burn={} expires_in={:?}",
                burn,
                expires_in
            );
        }
    }

    #[test]
    fn burn_mode_parses_known_values() {
        assert_eq!("destroy".parse::<BurnMode>(), Ok(BurnMode::Destroy));
        assert_eq!(" Serve-Once ".parse::<BurnMode>(), Ok(BurnMode::ServeOnce));
        assert_eq!("serve_once".parse::<BurnMode>(), Ok(BurnMode::ServeOnce));
        assert!("sometimes".parse::<BurnMode>().is_err());
        assert_eq!(BurnMode::default(), BurnMode::Destroy);
    }
}
