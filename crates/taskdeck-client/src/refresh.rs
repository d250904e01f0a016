//! Single-flight token refresh.
//!
//! Any number of concurrent requests may observe a 401 for the same stale
//! access token, but at most one refresh call reaches the server. The first
//! caller through the lock performs the exchange; everyone queued behind it
//! re-reads the store and adopts whatever the winner produced, success or
//! failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use taskdeck_storage::CredentialStore;

use crate::error::AuthError;
use crate::transport::{RequestDescriptor, Transport};

/// Endpoint for exchanging a refresh token for a new access token.
pub const REFRESH_PATH: &str = "/api/refresh";

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    /// Servers may rotate the refresh token; absent means keep the old one.
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Coordinates token refreshes across concurrent requests.
pub struct TokenRefresher {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialStore>,
    refresh_lock: Mutex<()>,
}

impl TokenRefresher {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Obtain a fresh access token, refreshing at most once per staleness.
    ///
    /// On any refresh failure both stored tokens are cleared before the
    /// error is returned, so a later request starts from a clean
    /// "not logged in" state instead of retrying a dead refresh token.
    pub async fn refresh(&self) -> Result<String, AuthError> {
        // Snapshot before taking the lock; if the token changes while we
        // wait, somebody else already refreshed on our behalf.
        let stale = self.credentials.access_token()?;

        let _guard = self.refresh_lock.lock().await;

        let current = self.credentials.access_token()?;
        if current != stale {
            if let Some(token) = current {
                tracing::debug!("adopting access token refreshed by concurrent request");
                return Ok(token);
            }
            // Tokens were cleared while we waited: the winner's refresh
            // failed, and so has ours.
            return Err(AuthError::RefreshFailed(
                "refresh already failed for this session".to_string(),
            ));
        }

        let refresh_token = self
            .credentials
            .refresh_token()?
            .ok_or(AuthError::NoRefreshToken)?;

        tracing::debug!("refreshing access token");
        match self.perform_refresh(&refresh_token).await {
            Ok(response) => {
                self.credentials.set_access_token(&response.access_token)?;
                if let Some(rotated) = &response.refresh_token {
                    self.credentials.set_refresh_token(rotated)?;
                }
                tracing::debug!("access token refreshed");
                Ok(response.access_token)
            }
            Err(reason) => {
                tracing::warn!(reason = %reason, "token refresh failed, clearing credentials");
                self.credentials.clear()?;
                Err(AuthError::RefreshFailed(reason))
            }
        }
    }

    async fn perform_refresh(&self, refresh_token: &str) -> Result<RefreshResponse, String> {
        let body = serde_json::to_value(RefreshRequest { refresh_token })
            .map_err(|e| format!("failed to encode refresh request: {}", e))?;
        let request = RequestDescriptor::post(REFRESH_PATH, body);

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("refresh endpoint returned HTTP {}", response.status));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| format!("unparseable refresh response: {}", e))
    }
}
