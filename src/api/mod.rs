//! Identity service API module.
//!
//! `IdentityApi` is the pure request/response interface the session flows
//! depend on; `IdentityClient` implements it over HTTP. Errors are
//! classified by `ApiError` and never escape the flow layer.

pub mod client;
pub mod error;

pub use client::{IdentityApi, IdentityClient};
pub use error::ApiError;
