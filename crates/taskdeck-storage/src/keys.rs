//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// Access token (short-lived, attached to every authenticated request)
    pub const ACCESS_TOKEN: &'static str = "access_token";

    /// Refresh token (long-lived, used only to obtain new access tokens)
    pub const REFRESH_TOKEN: &'static str = "refresh_token";
}
