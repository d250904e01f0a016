//! Error types for the request pipeline.

use crate::transport::TransportError;
use taskdeck_storage::StorageError;
use thiserror::Error;

/// Error type for token claims decoding.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Token is not a three-segment compact token
    #[error("token is not a three-segment compact token")]
    MalformedToken,

    /// Claims segment is not valid base64url
    #[error("claims segment is not valid base64url: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// Claims payload is not valid JSON
    #[error("claims payload is not parseable: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Error type for the token refresh flow.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No refresh token is stored; refresh is impossible without a login.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The refresh call failed or returned unusable data. Both tokens have
    /// been cleared by the time this is returned.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// Credential storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error type surfaced to API callers.
///
/// Redirect-to-login outcomes are deliberately *not* errors; they are
/// ordinary return values (see [`crate::ExecuteOutcome`]). An `ApiError`
/// always means the call itself failed in a way the caller may want to
/// present.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("failed to decode response body (HTTP {status}): {message}")]
    Decode { status: u16, message: String },

    /// Network-level failure unrelated to authentication.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Credential storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Request lifecycle bookkeeping rejected a transition. Indicates a bug
    /// in the executor rather than a caller mistake.
    #[error("invalid request state transition: {0}")]
    State(String),
}
