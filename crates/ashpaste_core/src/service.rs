//! Create / read / delete flows wired from validator, store and lifecycle.

use crate::{
    clock::{Clock, SystemClock},
    config::Config,
    db::PasteStore,
    error::AppError,
    lifecycle::{BurnMode, LifecycleEvaluator},
    models::paste::{CreatePasteRequest, CreatePasteResponse, Paste},
    validation::ContentValidator,
};
use std::sync::Arc;

/// Entry point for the three paste operations.
#[derive(Clone)]
pub struct PasteService {
    store: PasteStore,
    validator: ContentValidator,
    lifecycle: LifecycleEvaluator,
    clock: Arc<dyn Clock>,
}

impl PasteService {
    pub fn new(
        store: PasteStore,
        validator: ContentValidator,
        burn_mode: BurnMode,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let lifecycle = LifecycleEvaluator::new(store.clone(), clock.clone(), burn_mode);
        Self {
            store,
            validator,
            lifecycle,
            clock,
        }
    }

    /// Service over `store` using the limits in `config` and wall-clock time.
    pub fn from_config(store: PasteStore, config: &Config) -> Self {
        Self::new(
            store,
            ContentValidator::new(config.max_paste_size),
            config.burn_mode,
            Arc::new(SystemClock),
        )
    }

    pub fn store(&self) -> &PasteStore {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn burn_mode(&self) -> BurnMode {
        self.lifecycle.burn_mode()
    }

    /// Validate and persist a JSON create request.
    ///
    /// # Errors
    /// `InvalidInput` for rejected content, storage failures from the insert.
    pub async fn create(&self, req: CreatePasteRequest) -> Result<CreatePasteResponse, AppError> {
        self.create_raw(
            req.content.into_bytes(),
            &req.language,
            req.burn,
            req.expiry_minutes,
        )
        .await
    }

    /// Validate and persist raw submitted bytes.
    ///
    /// # Errors
    /// `InvalidInput` for rejected content, storage failures from the insert.
    pub async fn create_raw(
        &self,
        content: Vec<u8>,
        language: &str,
        burn: bool,
        expiry_minutes: i64,
    ) -> Result<CreatePasteResponse, AppError> {
        let now = self.clock.now();
        let validated = self
            .validator
            .validate(content, language, burn, expiry_minutes, now)?;
        let paste = Paste::new(
            validated.content,
            validated.language,
            validated.burn,
            validated.expires_at,
            now,
        );
        self.store.create(&paste).await?;
        tracing::debug!(
            "Created paste {} (burn={}, expires_at={})",
            paste.id,
            paste.burn,
            paste.expires_at
        );
        Ok(CreatePasteResponse {
            id: paste.id.to_string(),
        })
    }

    /// Structured read through the lifecycle evaluator.
    pub async fn get(&self, id: &str) -> Result<Paste, AppError> {
        self.lifecycle.read(id).await
    }

    /// Raw read; same lifecycle rules, content only.
    pub async fn get_raw(&self, id: &str) -> Result<String, AppError> {
        Ok(self.lifecycle.read(id).await?.content)
    }

    /// Unconditional delete, independent of lifecycle state.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.store.delete_by_id(id).await
    }
}
