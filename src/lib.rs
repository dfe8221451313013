//! Root crate facade for the ashpaste server and its core library.

pub use ashpaste_core::{
    clock, lifecycle, service, sweeper, validation, BurnMode, Clock, ConnectionManager,
    ContentValidator, HealthCheckError, LifecycleEvaluator, ManualClock, PasteService,
    PasteState, PasteStore, SystemClock, ValidationError,
};
pub use ashpaste_server::{
    config, create_app, db, error, handlers, models, raw_body_limit, request_body_limit,
    resolve_bind_address, serve_router, AppError, AppState, Config, Database, DEFAULT_PORT,
};
