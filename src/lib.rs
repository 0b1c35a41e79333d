//! Client-side authentication session manager.
//!
//! This crate owns the request-lifecycle plumbing between an application and
//! its remote identity service:
//!
//! - [`SessionFlow`]: orchestrates login, password-reset request and
//!   confirmation, email verification, and profile fetch, emitting
//!   started/succeeded/failed events for each invocation
//! - [`TokenStore`]: the single authoritative slot for the session token
//! - [`IdentityClient`]: `reqwest`-backed implementation of the identity
//!   API, attaching the bearer token to authenticated requests
//! - [`EventSink`]: observer interface for deriving UI-visible state
//!
//! Presentation, routing, and durable storage behind the token slot are the
//! embedding application's concern; every failure here is delivered as a
//! `FlowFailed` event rather than an error the caller has to handle.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiError, IdentityApi, IdentityClient};
pub use auth::{EventSink, FlowKind, FlowPayload, SessionEvent, SessionFlow, TokenStore};
pub use config::Config;
pub use models::{Credentials, NewPasswordRequest, PasswordResetConfirmation, Profile};
