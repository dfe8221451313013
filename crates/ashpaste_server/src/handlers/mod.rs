//! HTTP request handlers.

/// Storage health endpoint.
pub mod health;
/// Paste-related endpoints.
pub mod paste;
