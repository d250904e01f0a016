//! Per-request lifecycle state machine using rust-fsm.
//!
//! Each executed request walks an explicit machine instead of ad hoc
//! control flow, so the retry rules are structural:
//!
//! ```text
//! ┌──────────┐ CredentialMissing  ┌─────────────────┐
//! │   Init   │ ─────────────────► │ RedirectPending │
//! └────┬─────┘                    └─────────────────┘
//!      │ CredentialFound                  ▲
//!      ▼                                  │ RefreshFailed
//! ┌──────────┐ Dispatched ┌──────┐        │
//! │ Attached │ ──────────►│ Sent │        │
//! └──────────┘            └──┬───┘        │
//!            Resolved ◄──────┤            │
//!               │            │ Unauthorized
//!               ▼            ▼            │
//!           ┌──────┐   ┌────────────┐─────┘
//!           │ Done │   │ Refreshing │
//!           └──────┘   └─────┬──────┘
//!               ▲            │ RefreshSucceeded
//!               │            ▼
//!               │ Resolved ┌──────────┐
//!               └──────────│ Retrying │
//!                          └──────────┘
//! ```
//!
//! `Retrying` has no `Unauthorized` edge: a second 401 can only resolve as
//! a terminal response, which is what makes "at most one retry per call"
//! and "retry only after a successful refresh" invariants rather than
//! incidental control flow.

use rust_fsm::*;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub request_machine(Init)

    Init => {
        CredentialFound => Attached,
        CredentialMissing => RedirectPending
    },
    Attached => {
        Dispatched => Sent
    },
    Sent => {
        Resolved => Done,
        Unauthorized => Refreshing
    },
    Refreshing => {
        RefreshSucceeded => Retrying,
        RefreshFailed => RedirectPending
    },
    Retrying => {
        Resolved => Done
    }
}

// Re-export the generated types with clearer names
pub use request_machine::Input as RequestMachineInput;
pub use request_machine::State as RequestMachineState;
pub use request_machine::StateMachine as RequestMachine;
