use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login input: identifier plus secret.
///
/// Only ever sent as the body of the login request; never stored by this
/// crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Input to the password-reset confirmation flow.
///
/// The reset token arrives out of band (the link in the reset email); the
/// identity service acks the new password with an opaque body, so the token
/// travels client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewPasswordRequest {
    pub id: String,
    pub password: String,
    /// Session token from the reset link, if the link carried one.
    pub token: Option<String>,
}

/// Result of a password-reset confirmation call.
///
/// A confirmation without a token cannot establish a session and is treated
/// as a failed flow, not a partial success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordResetConfirmation {
    pub token: Option<String>,
}

/// Read-only snapshot of the authenticated user.
///
/// Replaced wholesale on every successful profile fetch; no field-level
/// merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub username: Option<String>,
    #[serde(rename = "emailVerified", default)]
    pub email_verified: bool,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}
