//! Data models for API requests and persistence.

/// Paste rows and request/response payloads.
pub mod paste;
