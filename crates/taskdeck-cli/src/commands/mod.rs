//! CLI command implementations.

mod auth;
mod tasks;

pub use auth::{login, logout, register, status, whoami};
pub use tasks::{
    task_add, task_done, task_list, task_move, task_rm, task_show, task_stats, task_update,
};

use std::sync::Arc;

use anyhow::Result;

use taskdeck_client::{
    ApiOutcome, AuthClient, HttpTransport, RequestExecutor, TaskClient, TokenRefresher, Transport,
};
use taskdeck_storage::{CredentialStore, FileStorage};

use crate::config::{Config, Paths};
use crate::output::{self, OutputFormat};

/// Everything a command needs: auth surface, task surface, and the
/// credential store for local-only operations.
pub struct Clients {
    pub auth: AuthClient,
    pub tasks: TaskClient,
    pub credentials: Arc<CredentialStore>,
}

/// Wire the full pipeline from config and on-disk credentials.
pub fn build_clients(config: &Config) -> Result<Clients> {
    let paths = Paths::new()?;
    paths.ensure_dirs()?;

    let api_url = config.api_url()?;
    tracing::debug!(api_url = %api_url, "building API clients");
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(api_url.as_str()));
    let credentials = Arc::new(CredentialStore::new(Box::new(FileStorage::new(
        paths.credentials_file(),
    ))));

    let refresher = Arc::new(TokenRefresher::new(transport.clone(), credentials.clone()));
    let executor = Arc::new(RequestExecutor::new(
        transport.clone(),
        credentials.clone(),
        refresher,
    ));

    Ok(Clients {
        auth: AuthClient::new(transport, credentials.clone()),
        tasks: TaskClient::new(executor),
        credentials,
    })
}

/// Unwrap an API outcome, printing the login hint on redirect.
pub fn require_login<T>(outcome: ApiOutcome<T>, format: &OutputFormat) -> Option<T> {
    match outcome {
        ApiOutcome::Success(value) => Some(value),
        ApiOutcome::RedirectToLogin => {
            output::print_error("Not logged in. Run 'taskdeck login' first.", format);
            None
        }
    }
}
