//! Authenticated request pipeline for the taskdeck API.
//!
//! This crate provides:
//! - A transport seam over the HTTP client so the pipeline is testable
//!   without a server
//! - Bearer attachment with refresh-and-retry-once on 401, driven by an
//!   explicit per-request state machine
//! - Single-flight coordination of token refreshes across concurrent calls
//! - Response normalization into typed results
//! - Local (unverified) token claims decoding for display identity
//! - The task and auth API surfaces that consume the pipeline

mod auth_api;
mod claims;
mod error;
mod executor;
mod normalize;
mod refresh;
mod request_fsm;
mod session;
mod tasks;
mod transport;

pub use auth_api::AuthClient;
pub use claims::{decode_claims, Claims};
pub use error::{ApiError, AuthError, DecodeError};
pub use executor::{ExecuteOutcome, RequestExecutor};
pub use normalize::normalize;
pub use refresh::{TokenRefresher, REFRESH_PATH};
pub use request_fsm::{RequestMachine, RequestMachineInput, RequestMachineState};
pub use session::{resolve_session, Session};
pub use tasks::{ApiOutcome, Task, TaskClient, TaskDraft, UserStatistics};
pub use transport::{
    HttpTransport, Method, RawResponse, RequestDescriptor, Transport, TransportError,
};
