//! Display-only session identity derived from the stored access token.

use taskdeck_storage::CredentialStore;

use crate::claims::decode_claims;

/// Who the UI should show as logged in. Purely cosmetic; the server
/// re-checks the token on every request regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Resolve the current session from stored credentials, if any.
///
/// A missing token, a storage failure, or an undecodable token all resolve
/// to `None`; there is no error path because the only consumer is display.
pub fn resolve_session(credentials: &CredentialStore) -> Option<Session> {
    let token = match credentials.access_token() {
        Ok(Some(token)) => token,
        Ok(None) => return None,
        Err(e) => {
            tracing::debug!(error = %e, "could not read access token for session display");
            return None;
        }
    };

    match decode_claims(&token) {
        Ok(claims) => Some(Session {
            id: claims.user_id,
            username: claims.username,
            email: claims.email,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "stored access token is not decodable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde_json::json;
    use std::sync::Mutex;
    use taskdeck_storage::{StorageResult, TokenStore};

    struct MemoryStorage {
        values: Mutex<std::collections::BTreeMap<String, String>>,
    }

    impl MemoryStorage {
        fn new() -> Self {
            Self {
                values: Mutex::new(Default::default()),
            }
        }
    }

    impl TokenStore for MemoryStorage {
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        fn delete(&self, key: &str) -> StorageResult<bool> {
            Ok(self.values.lock().unwrap().remove(key).is_some())
        }
    }

    fn token_for(user_id: i64, username: &str, email: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            json!({"user_id": user_id, "username": username, "email": email, "exp": 0})
                .to_string()
                .as_bytes(),
        );
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_resolves_identity_from_token() {
        let store = CredentialStore::new(Box::new(MemoryStorage::new()));
        store
            .set_access_token(&token_for(9, "ada", "ada@example.com"))
            .unwrap();

        assert_eq!(
            resolve_session(&store),
            Some(Session {
                id: 9,
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
            })
        );
    }

    #[test]
    fn test_no_token_resolves_to_none() {
        let store = CredentialStore::new(Box::new(MemoryStorage::new()));
        assert_eq!(resolve_session(&store), None);
    }

    #[test]
    fn test_garbage_token_resolves_to_none() {
        let store = CredentialStore::new(Box::new(MemoryStorage::new()));
        store.set_access_token("not-a-token").unwrap();
        assert_eq!(resolve_session(&store), None);
    }
}
