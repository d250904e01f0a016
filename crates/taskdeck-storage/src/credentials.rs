//! High-level API for the two credential slots.

use crate::{StorageKeys, StorageResult, TokenStore};

/// Typed facade over a [`TokenStore`] holding the access and refresh tokens.
///
/// The two slots are meant to be present or absent together: login and a
/// successful refresh write both (or leave the refresh token untouched when
/// the server does not rotate it), while [`CredentialStore::clear`] always
/// removes both. Writers are the token refresher and the login/logout flows
/// only; request execution paths just read.
pub struct CredentialStore {
    storage: Box<dyn TokenStore>,
}

impl CredentialStore {
    /// Create a credential store over the given backend.
    pub fn new(storage: Box<dyn TokenStore>) -> Self {
        Self { storage }
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::ACCESS_TOKEN)
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::REFRESH_TOKEN)
    }

    /// Replace the access token.
    pub fn set_access_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::ACCESS_TOKEN, token)
    }

    /// Replace the refresh token.
    pub fn set_refresh_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::REFRESH_TOKEN, token)
    }

    /// Store both tokens, as after a successful login.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> StorageResult<()> {
        self.set_access_token(access_token)?;
        self.set_refresh_token(refresh_token)
    }

    /// Whether an access token is stored ("logged in" as far as the client
    /// can tell without a server round trip).
    pub fn has_credentials(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::ACCESS_TOKEN)
    }

    /// Remove both tokens.
    pub fn clear(&self) -> StorageResult<()> {
        self.storage.delete(StorageKeys::ACCESS_TOKEN)?;
        self.storage.delete(StorageKeys::REFRESH_TOKEN)?;
        tracing::debug!("credentials cleared");
        Ok(())
    }
}
