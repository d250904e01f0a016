//! Local decoding of access token claims.
//!
//! The payload segment of the compact token is decoded without verifying
//! the signature or the expiry. The result is display data only; nothing
//! authorization-relevant may depend on it. The server remains the sole
//! judge of whether a token is valid.

use crate::error::DecodeError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

/// Claims carried in the access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id
    pub user_id: i64,
    /// Username
    pub username: String,
    /// User email
    pub email: String,
    /// Expiration time (UTC timestamp); informational only, never checked
    /// client-side
    #[serde(default)]
    pub exp: i64,
}

/// Decode the claims of a compact signed token without verification.
///
/// Fails with a typed [`DecodeError`] on malformed structure, invalid
/// base64url, or a non-parseable payload; callers treat any failure as
/// "not authenticated".
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let mut segments = token.split('.');
    let payload = segments
        .nth(1)
        .filter(|s| !s.is_empty())
        .ok_or(DecodeError::MalformedToken)?;
    // Header and payload must be followed by exactly one signature segment.
    if segments.next().is_none() || segments.next().is_some() {
        return Err(DecodeError::MalformedToken);
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    let claims = serde_json::from_slice(&bytes)?;
    Ok(claims)
}
