//! Login, registration, and logout against the auth endpoints.
//!
//! These calls run outside the authenticated pipeline: login and register
//! have no token to attach yet, and logout is purely local.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use taskdeck_storage::CredentialStore;

use crate::error::ApiError;
use crate::normalize::normalize;
use crate::transport::{RequestDescriptor, Transport};

const LOGIN_PATH: &str = "/api/login";
const REGISTER_PATH: &str = "/api/register";

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

/// Client for the unauthenticated auth endpoints.
pub struct AuthClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialStore>,
}

impl AuthClient {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Log in and persist the returned token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = RequestDescriptor::post(
            LOGIN_PATH,
            json!({"email": email, "password": password}),
        );
        let response = self.transport.send(&request).await?;
        let tokens: LoginResponse =
            normalize(&response)?.ok_or_else(|| ApiError::Decode {
                status: response.status,
                message: "login response had no body".to_string(),
            })?;

        self.credentials
            .set_tokens(&tokens.access_token, &tokens.refresh_token)?;
        tracing::info!("logged in");
        Ok(())
    }

    /// Create an account. Does not log in; callers follow with [`login`].
    ///
    /// [`login`]: AuthClient::login
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let request = RequestDescriptor::post(
            REGISTER_PATH,
            json!({"username": username, "email": email, "password": password}),
        );
        let response = self.transport.send(&request).await?;
        let _: Option<serde_json::Value> = normalize(&response)?;
        tracing::info!(username = %username, "account registered");
        Ok(())
    }

    /// Forget the stored credentials. Local only; no server call.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.credentials.clear()?;
        tracing::info!("logged out");
        Ok(())
    }
}
