//! Core error types for dayflow-core.
//!
//! One error enum per concern, aggregated into [`CoreError`]. Failures are
//! never retried inside the library; every rejected operation propagates to
//! the caller.

use thiserror::Error;

/// Core error type for dayflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Remote backend errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the remote data client.
///
/// Every variant carries the underlying transport or backend message so the
/// caller can surface it verbatim.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport-level failure (connect, TLS, timeout)
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not decode into the expected shape
    #[error("Failed to decode {table} response: {message}")]
    Decode { table: &'static str, message: String },

    /// A write that must return a row returned none
    #[error("No matching row in {table}")]
    MissingRow { table: &'static str },

    /// Fetch aborted because the owning user changed mid-flight
    #[error("Fetch cancelled")]
    Cancelled,
}

/// Authentication-specific errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Credential sign-in/sign-up rejected by the auth backend
    #[error("Authentication failed ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Transport-level failure talking to the auth backend
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Persisted session could not be read or written
    #[error("Session storage error: {0}")]
    SessionStore(String),

    /// Operation requires a signed-in user
    #[error("Not authenticated")]
    NotAuthenticated,

    /// OAuth redirect completed without a usable session
    #[error("OAuth callback failed: {0}")]
    CallbackFailed(String),

    /// Auth response body did not decode
    #[error("Failed to decode auth response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown platform name
    #[error("Unknown platform '{0}' (expected web, ios, android or desktop)")]
    UnknownPlatform(String),

    /// Backend URL present but unparseable
    #[error("Invalid backend URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
