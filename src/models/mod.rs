//! Data models exchanged with the identity service.
//!
//! - `Credentials`: login input, discarded after the call
//! - `NewPasswordRequest`: password-reset confirmation input
//! - `PasswordResetConfirmation`: outcome of a confirmation call
//! - `Profile`: read-only snapshot of the authenticated user

pub mod user;

pub use user::{Credentials, NewPasswordRequest, PasswordResetConfirmation, Profile};
