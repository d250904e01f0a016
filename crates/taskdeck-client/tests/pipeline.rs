//! End-to-end pipeline tests against an in-process fake server.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use taskdeck_client::{
    ApiOutcome, AuthClient, RawResponse, RequestDescriptor, RequestExecutor, TaskClient,
    TokenRefresher, Transport, TransportError, REFRESH_PATH,
};
use taskdeck_storage::{CredentialStore, StorageResult, TokenStore};

struct MemoryStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    fn new() -> Self {
        Self {
            values: Mutex::new(BTreeMap::new()),
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

/// Fake API server: tracks which access token is currently valid, rejects
/// everything else with 401, and mints a new token on refresh. The refresh
/// handler stalls briefly so concurrent requests genuinely overlap.
struct FakeServer {
    valid_token: Mutex<String>,
    refresh_calls: AtomicUsize,
    task_calls: AtomicUsize,
    accept_refresh: bool,
}

impl FakeServer {
    fn new(valid_token: &str) -> Self {
        Self {
            valid_token: Mutex::new(valid_token.to_string()),
            refresh_calls: AtomicUsize::new(0),
            task_calls: AtomicUsize::new(0),
            accept_refresh: true,
        }
    }

    fn rejecting_refresh(valid_token: &str) -> Self {
        Self {
            accept_refresh: false,
            ..Self::new(valid_token)
        }
    }

    fn expire_token(&self) {
        *self.valid_token.lock().unwrap() = "expired".to_string();
    }
}

#[async_trait]
impl Transport for FakeServer {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        if request.path == REFRESH_PATH {
            let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(Duration::from_millis(30)).await;
            if !self.accept_refresh {
                return Ok(RawResponse {
                    status: 401,
                    body: json!({"error": "invalid refresh token"}).to_string(),
                });
            }
            let minted = format!("minted-{}", call);
            *self.valid_token.lock().unwrap() = minted.clone();
            return Ok(RawResponse {
                status: 200,
                body: json!({"access_token": minted}).to_string(),
            });
        }

        self.task_calls.fetch_add(1, Ordering::SeqCst);
        let expected = format!("Bearer {}", self.valid_token.lock().unwrap());
        if request.authorization() != Some(expected.as_str()) {
            return Ok(RawResponse {
                status: 401,
                body: json!({"error": "invalid token"}).to_string(),
            });
        }

        Ok(RawResponse {
            status: 200,
            body: json!([{
                "id": 1,
                "title": "only task",
                "description": "",
                "status": "pending",
                "user_id": 1,
                "created_at": null,
                "updated_at": null,
                "position": 0,
            }])
            .to_string(),
        })
    }
}

fn pipeline(server: Arc<FakeServer>) -> (TaskClient, Arc<CredentialStore>) {
    let store = Arc::new(CredentialStore::new(Box::new(MemoryStorage::new())));
    let refresher = Arc::new(TokenRefresher::new(server.clone(), store.clone()));
    let executor = Arc::new(RequestExecutor::new(server, store.clone(), refresher));
    (TaskClient::new(executor), store)
}

#[tokio::test]
async fn test_stale_token_recovers_transparently() {
    let server = Arc::new(FakeServer::new("fresh"));
    let (client, store) = pipeline(server.clone());
    store.set_tokens("fresh", "ref-1").unwrap();

    server.expire_token();

    let tasks = match client.list().await.unwrap() {
        ApiOutcome::Success(tasks) => tasks,
        other => panic!("expected tasks, got {:?}", other),
    };
    assert_eq!(tasks.len(), 1);
    assert_eq!(server.refresh_calls.load(Ordering::SeqCst), 1);
    // Original attempt plus one retry.
    assert_eq!(server.task_calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        store.access_token().unwrap(),
        Some("minted-1".to_string())
    );
}

#[tokio::test]
async fn test_concurrent_stale_requests_share_one_refresh() {
    let server = Arc::new(FakeServer::new("fresh"));
    let (client, store) = pipeline(server.clone());
    store.set_tokens("fresh", "ref-1").unwrap();

    server.expire_token();

    let (a, b, c) = tokio::join!(client.list(), client.list(), client.list());

    assert!(matches!(a.unwrap(), ApiOutcome::Success(tasks) if tasks.len() == 1));
    assert!(matches!(b.unwrap(), ApiOutcome::Success(tasks) if tasks.len() == 1));
    assert!(matches!(c.unwrap(), ApiOutcome::Success(tasks) if tasks.len() == 1));
    assert_eq!(server.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_dead_refresh_token_forces_login() {
    let server = Arc::new(FakeServer::rejecting_refresh("fresh"));
    let (client, store) = pipeline(server.clone());
    store.set_tokens("fresh", "ref-1").unwrap();

    server.expire_token();

    assert!(matches!(
        client.list().await.unwrap(),
        ApiOutcome::RedirectToLogin
    ));
    assert!(!store.has_credentials().unwrap());

    // The next call short-circuits: no token, no network.
    let tasks_before = server.task_calls.load(Ordering::SeqCst);
    assert!(matches!(
        client.list().await.unwrap(),
        ApiOutcome::RedirectToLogin
    ));
    assert_eq!(server.task_calls.load(Ordering::SeqCst), tasks_before);
}

#[tokio::test]
async fn test_login_then_list_uses_fresh_tokens() {
    struct LoginServer {
        inner: FakeServer,
    }

    #[async_trait]
    impl Transport for LoginServer {
        async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
            if request.path == "/api/login" {
                return Ok(RawResponse {
                    status: 200,
                    body: json!({"access_token": "fresh", "refresh_token": "ref-1"}).to_string(),
                });
            }
            self.inner.send(request).await
        }
    }

    let server = Arc::new(LoginServer {
        inner: FakeServer::new("fresh"),
    });
    let store = Arc::new(CredentialStore::new(Box::new(MemoryStorage::new())));
    let auth = AuthClient::new(server.clone(), store.clone());
    let refresher = Arc::new(TokenRefresher::new(server.clone(), store.clone()));
    let executor = Arc::new(RequestExecutor::new(server.clone(), store.clone(), refresher));
    let client = TaskClient::new(executor);

    auth.login("a@b.c", "hunter2").await.unwrap();
    assert!(store.has_credentials().unwrap());

    assert!(matches!(
        client.list().await.unwrap(),
        ApiOutcome::Success(tasks) if tasks.len() == 1
    ));
    assert_eq!(server.inner.refresh_calls.load(Ordering::SeqCst), 0);
}
