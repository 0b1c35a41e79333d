//! Session flow orchestration.
//!
//! Every interaction with the identity service runs through the same shape:
//! emit a started event, await the one client call, then emit exactly one
//! terminal event - succeeded with a payload, or failed with a normalized
//! message. Flows never return errors; a caller always gets the terminal
//! event back, and observers see the same event through the [`EventSink`].

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{ApiError, IdentityApi};
use crate::models::{Credentials, NewPasswordRequest, Profile};

use super::TokenStore;

/// The flavors of identity service interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum FlowKind {
    Login,
    PasswordResetRequest,
    PasswordResetConfirm,
    EmailVerification,
    ProfileFetch,
}

impl std::fmt::Display for FlowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowKind::Login => "login",
            FlowKind::PasswordResetRequest => "password-reset-request",
            FlowKind::PasswordResetConfirm => "password-reset-confirm",
            FlowKind::EmailVerification => "email-verification",
            FlowKind::ProfileFetch => "profile-fetch",
        };
        write!(f, "{name}")
    }
}

/// What a succeeded flow hands to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum FlowPayload {
    /// Login, password-reset confirmation, and email verification carry
    /// nothing; their effect is the token slot or server-side state.
    Empty,
    /// Password-reset request: the server's message, verbatim.
    Message(String),
    /// Profile fetch: the fresh snapshot.
    Profile(Profile),
}

/// Lifecycle events delivered to the [`EventSink`].
///
/// For one flow invocation, exactly one `FlowStarted` is followed by exactly
/// one terminal event. `LoggedOut` and `MessagesCleared` come from the two
/// synchronous operations; they share the clear-token side effect but stay
/// distinguishable downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum SessionEvent {
    FlowStarted {
        flow: FlowKind,
    },
    FlowSucceeded {
        flow: FlowKind,
        payload: FlowPayload,
    },
    FlowFailed {
        flow: FlowKind,
        error: String,
    },
    LoggedOut,
    MessagesCleared,
}

/// Observer interface for session events.
///
/// Implementations (a reducer, a UI channel) live outside this crate and
/// derive whatever visible state they need. `emit` is called synchronously
/// from the flow, so it must not block.
pub trait EventSink {
    fn emit(&self, event: SessionEvent);
}

/// Sink for callers that only care about the returned terminal event.
impl EventSink for () {
    fn emit(&self, _event: SessionEvent) {}
}

/// Orchestrator for the five identity flows plus logout/clear.
///
/// One instance serves any number of invocations; concurrent flows are
/// independent and unordered with respect to each other. If two flows race
/// on the token slot, the later write wins - there is no generation check,
/// and a started flow cannot be cancelled. Callers that need to ignore a
/// superseded result must discard its events at the sink.
pub struct SessionFlow<C, S> {
    client: C,
    tokens: TokenStore,
    sink: S,
}

impl<C: IdentityApi, S: EventSink> SessionFlow<C, S> {
    pub fn new(client: C, tokens: TokenStore, sink: S) -> Self {
        Self {
            client,
            tokens,
            sink,
        }
    }

    /// Handle to the shared token slot.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Exchange credentials for a session; installs the returned token.
    pub async fn login(&self, credentials: Credentials) -> SessionEvent {
        self.run(FlowKind::Login, self.client.login(&credentials), |tokens, token| {
            tokens.set(token);
            Ok(FlowPayload::Empty)
        })
        .await
    }

    /// Ask for a reset link; the server's message becomes the payload.
    pub async fn request_password_reset(&self, usermail: &str) -> SessionEvent {
        self.run(
            FlowKind::PasswordResetRequest,
            self.client.request_password_reset(usermail),
            |_, message| Ok(FlowPayload::Message(message)),
        )
        .await
    }

    /// Set a new password from a reset link; installs the confirmation's
    /// token. A confirmation without one fails the flow - the slot is never
    /// written on a partial success.
    pub async fn confirm_password_reset(&self, request: NewPasswordRequest) -> SessionEvent {
        self.run(
            FlowKind::PasswordResetConfirm,
            self.client.confirm_password_reset(&request),
            |tokens, confirmation| match confirmation.token {
                Some(token) => {
                    tokens.set(token);
                    Ok(FlowPayload::Empty)
                }
                None => Err(ApiError::InvalidResponse(
                    "password reset confirmation carried no session token".to_string(),
                )),
            },
        )
        .await
    }

    /// Ask the service to (re)send the verification email.
    pub async fn verify_email(&self, usermail: &str) -> SessionEvent {
        self.run(
            FlowKind::EmailVerification,
            self.client.verify_email(usermail),
            |_, ()| Ok(FlowPayload::Empty),
        )
        .await
    }

    /// Fetch the authenticated user's profile. Requires an active session;
    /// without one the service answers 401 and the flow fails like any
    /// other.
    pub async fn fetch_profile(&self) -> SessionEvent {
        self.run(
            FlowKind::ProfileFetch,
            self.client.fetch_profile(),
            |_, profile| Ok(FlowPayload::Profile(profile)),
        )
        .await
    }

    /// End the session. Synchronous: clears the token slot and notifies the
    /// sink. Idempotent.
    pub fn logout(&self) -> SessionEvent {
        self.tokens.clear();
        let event = SessionEvent::LoggedOut;
        self.sink.emit(event.clone());
        event
    }

    /// Dismiss transient messages. Shares the clear-token side effect with
    /// [`logout`](Self::logout) but emits a distinct event so observers can
    /// tell a dismissed banner from an ended session.
    pub fn clear_messages(&self) -> SessionEvent {
        self.tokens.clear();
        let event = SessionEvent::MessagesCleared;
        self.sink.emit(event.clone());
        event
    }

    /// The shared flow shape. The operation future is inert until polled,
    /// so observers always see the started event before any request leaves.
    /// `settle` applies the flow's token effect; the slot is untouched on
    /// any failure path.
    async fn run<T, Fut, Settle>(&self, kind: FlowKind, operation: Fut, settle: Settle) -> SessionEvent
    where
        Fut: Future<Output = Result<T, ApiError>>,
        Settle: FnOnce(&TokenStore, T) -> Result<FlowPayload, ApiError>,
    {
        self.sink.emit(SessionEvent::FlowStarted { flow: kind });
        debug!(flow = %kind, "flow started");

        let event = match operation.await {
            Ok(value) => match settle(&self.tokens, value) {
                Ok(payload) => SessionEvent::FlowSucceeded {
                    flow: kind,
                    payload,
                },
                Err(err) => SessionEvent::FlowFailed {
                    flow: kind,
                    error: err.normalized_message(),
                },
            },
            Err(err) => SessionEvent::FlowFailed {
                flow: kind,
                error: err.normalized_message(),
            },
        };

        match &event {
            SessionEvent::FlowFailed { error, .. } => {
                warn!(flow = %kind, error = %error, "flow failed");
            }
            _ => debug!(flow = %kind, "flow succeeded"),
        }

        self.sink.emit(event.clone());
        event
    }
}
