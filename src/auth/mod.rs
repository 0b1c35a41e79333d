//! Session management: flow orchestration and token ownership.
//!
//! This module provides:
//! - `SessionFlow`: the per-invocation request lifecycle (started, then
//!   exactly one of succeeded/failed) for every identity interaction
//! - `TokenStore`: the shared, single-slot owner of the session token
//! - `EventSink` and `SessionEvent`: the observer seam for derived state

pub mod flow;
pub mod token;

pub use flow::{EventSink, FlowKind, FlowPayload, SessionEvent, SessionFlow};
pub use token::TokenStore;
