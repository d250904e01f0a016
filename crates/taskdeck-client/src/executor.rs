//! Bearer attachment and 401 handling for outbound requests.

use std::sync::Arc;

use taskdeck_storage::CredentialStore;

use crate::error::ApiError;
use crate::refresh::TokenRefresher;
use crate::request_fsm::{RequestMachine, RequestMachineInput};
use crate::transport::{RawResponse, RequestDescriptor, Transport};

/// Outcome of an executed request.
///
/// A missing or unrecoverable credential is not an error; it is a signal
/// that the caller should send the user back to login. Errors are reserved
/// for calls that actually failed.
#[derive(Debug)]
pub enum ExecuteOutcome {
    /// The server answered; status may still be non-2xx.
    Response(RawResponse),
    /// No usable credential exists. Nothing was retried; the caller should
    /// route the user to login.
    RedirectToLogin,
}

/// Executes requests with bearer attachment, refreshing and retrying once
/// on 401.
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialStore>,
    refresher: Arc<TokenRefresher>,
}

impl RequestExecutor {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialStore>,
        refresher: Arc<TokenRefresher>,
    ) -> Self {
        Self {
            transport,
            credentials,
            refresher,
        }
    }

    /// Execute `request` with the stored access token attached.
    ///
    /// On a 401 the token is refreshed and the request replayed exactly
    /// once; the replayed response is final whatever its status. With no
    /// stored token the request is never sent at all.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ExecuteOutcome, ApiError> {
        let mut machine = RequestMachine::new();

        let Some(token) = self.credentials.access_token()? else {
            step(&mut machine, RequestMachineInput::CredentialMissing)?;
            tracing::debug!(path = %request.path, "no access token, redirecting to login");
            return Ok(ExecuteOutcome::RedirectToLogin);
        };
        step(&mut machine, RequestMachineInput::CredentialFound)?;

        step(&mut machine, RequestMachineInput::Dispatched)?;
        let response = self.transport.send(&request.with_bearer(&token)).await?;

        if !response.is_unauthorized() {
            step(&mut machine, RequestMachineInput::Resolved)?;
            return Ok(ExecuteOutcome::Response(response));
        }
        step(&mut machine, RequestMachineInput::Unauthorized)?;

        tracing::debug!(path = %request.path, "got 401, attempting token refresh");
        let fresh = match self.refresher.refresh().await {
            Ok(token) => token,
            Err(e) => {
                step(&mut machine, RequestMachineInput::RefreshFailed)?;
                tracing::debug!(reason = %e, "refresh failed, redirecting to login");
                return Ok(ExecuteOutcome::RedirectToLogin);
            }
        };
        step(&mut machine, RequestMachineInput::RefreshSucceeded)?;

        let retried = self.transport.send(&request.with_bearer(&fresh)).await?;
        // Terminal regardless of status; a second 401 is not retried.
        step(&mut machine, RequestMachineInput::Resolved)?;
        Ok(ExecuteOutcome::Response(retried))
    }
}

fn step(machine: &mut RequestMachine, input: RequestMachineInput) -> Result<(), ApiError> {
    machine
        .consume(&input)
        .map(|_| ())
        .map_err(|_| ApiError::State(format!("{:?} rejected in {:?}", input, machine.state())))
}
