//! Durable credential storage for the taskdeck client.
//!
//! This crate holds the two token slots the client persists across runs:
//! the short-lived access token and the long-lived refresh token. The
//! backend is pluggable via the [`TokenStore`] trait; [`FileStorage`]
//! provides the default file-backed implementation.

mod credentials;
mod file;
mod keys;
mod traits;

pub use credentials::CredentialStore;
pub use file::FileStorage;
pub use keys::StorageKeys;
pub use traits::TokenStore;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Encoding/decoding error
    #[error("encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
