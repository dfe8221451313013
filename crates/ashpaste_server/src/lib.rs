//! HTTP server wiring for ashpaste (API, handlers, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for paste and health endpoints.
pub mod handlers;

pub use ashpaste_core::{
    config, db, models, AppError, BurnMode, Config, Database, PasteService, DEFAULT_PORT,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Slack on top of the content bound for framing and the other request fields.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Worst-case JSON growth per content byte (`\u0001` for a control char).
const JSON_ESCAPE_FACTOR: usize = 6;

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub service: Arc<PasteService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Connected database handle.
    ///
    /// # Returns
    /// A new [`AppState`] whose service uses wall-clock time.
    pub fn new(config: Config, db: Database) -> Self {
        let service = PasteService::from_config(db.pastes.clone(), &config);
        Self::with_service(config, db, service)
    }

    /// Construct shared application state around a pre-built service.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Connected database handle.
    /// - `service`: Paste service, e.g. one driven by a manual clock.
    ///
    /// # Returns
    /// A new [`AppState`] wired to the provided service.
    pub fn with_service(config: Config, db: Database, service: PasteService) -> Self {
        Self {
            db: Arc::new(db),
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}

/// Largest JSON request body accepted for a given paste size cap.
///
/// Sized so content at the cap still fits when every byte is escaped. The
/// exact content limit is enforced by the validator after decoding.
pub fn request_body_limit(max_paste_size: usize) -> usize {
    max_paste_size
        .saturating_mul(JSON_ESCAPE_FACTOR)
        .saturating_add(BODY_LIMIT_SLACK)
}

/// Largest raw request body accepted for a given paste size cap.
pub fn raw_body_limit(max_paste_size: usize) -> usize {
    max_paste_size.saturating_add(BODY_LIMIT_SLACK)
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
///
/// # Returns
/// Configured `axum::Router`.
pub fn create_app(state: AppState) -> Router {
    let max_paste_size = state.config.max_paste_size;

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route(
            "/api/paste",
            post(handlers::paste::create_paste)
                .layer(DefaultBodyLimit::max(request_body_limit(max_paste_size))),
        )
        .route("/api/paste/raw", post(handlers::paste::create_raw_paste))
        .route(
            "/api/paste/:id",
            get(handlers::paste::get_paste).delete(handlers::paste::delete_paste),
        )
        .route("/api/paste/:id/raw", get(handlers::paste::get_raw_paste))
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(raw_body_limit(max_paste_size)))
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let requested = std::env::var("BIND").ok();
    resolve_bind_override(requested.as_deref(), config.port, allow_public_access)
}

fn resolve_bind_override(
    requested: Option<&str>,
    port: u16,
    allow_public_access: bool,
) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], port));
    let requested = match requested {
        Some(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        None => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Returns
/// `Ok(())` when the server exits cleanly.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
