//! HTTP client for the remote identity service.
//!
//! `IdentityApi` is the request/response seam the session flows run against;
//! `IdentityClient` is the production implementation over `reqwest`. The
//! client is stateless apart from a shared [`TokenStore`] handle it reads
//! when attaching the bearer token to authenticated requests.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::auth::TokenStore;
use crate::config::Config;
use crate::models::{Credentials, NewPasswordRequest, PasswordResetConfirmation, Profile};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Login endpoint; responds with `{"user":{"token":...}}`
const LOGIN_PATH: &str = "auth";

/// Password-reset request endpoint; responds with `{"success":{"message":...}}`
const REMIND_PASSWORD_PATH: &str = "remind-password";

/// Password-reset confirmation endpoint; the ack body is opaque
const NEW_PASSWORD_PATH: &str = "new-password";

/// Email verification endpoint; the ack body is opaque
const VERIFY_EMAIL_PATH: &str = "verify-email";

/// Profile endpoint; responds with `{"user":Profile}`, bearer auth required
const USER_PATH: &str = "user";

/// Operations offered by the identity service.
///
/// One method per flow, plain values in and out, no retries and no caching.
/// Implementations other than [`IdentityClient`] exist only for tests.
#[allow(async_fn_in_trait)]
pub trait IdentityApi {
    /// Exchange credentials for a session token.
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;

    /// Ask the service to mail a reset link; returns the server's message.
    async fn request_password_reset(&self, usermail: &str) -> Result<String, ApiError>;

    /// Submit the new password chosen from a reset link.
    async fn confirm_password_reset(
        &self,
        request: &NewPasswordRequest,
    ) -> Result<PasswordResetConfirmation, ApiError>;

    /// Ask the service to (re)send the verification email.
    async fn verify_email(&self, usermail: &str) -> Result<(), ApiError>;

    /// Fetch the profile of the currently authenticated user.
    async fn fetch_profile(&self) -> Result<Profile, ApiError>;
}

/// Identity service client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl IdentityClient {
    /// Create a new client from deployment config and the shared token slot.
    pub fn new(config: &Config, tokens: TokenStore) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body detail if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Read a success body and parse it, downgrading parse failures to
    /// `InvalidResponse` rather than surfacing serde internals.
    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| ApiError::InvalidResponse(err.to_string()))
    }
}

impl IdentityApi for IdentityClient {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let url = self.endpoint(LOGIN_PATH);
        debug!(url = %url, "posting login");

        let response = self
            .client
            .post(&url)
            .json(&LoginBody { user: credentials })
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let parsed: LoginResponse = Self::parse_json(response).await?;
        Ok(parsed.user.token)
    }

    async fn request_password_reset(&self, usermail: &str) -> Result<String, ApiError> {
        let url = self.endpoint(REMIND_PASSWORD_PATH);
        debug!(url = %url, "posting password-reset request");

        let response = self
            .client
            .post(&url)
            .json(&UsermailBody { usermail })
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let parsed: RemindPasswordResponse = Self::parse_json(response).await?;
        Ok(parsed.success.message)
    }

    async fn confirm_password_reset(
        &self,
        request: &NewPasswordRequest,
    ) -> Result<PasswordResetConfirmation, ApiError> {
        let url = self.endpoint(NEW_PASSWORD_PATH);
        debug!(url = %url, "posting new password");

        let body = NewPasswordBody {
            user: NewPasswordUser {
                id: &request.id,
                password: &request.password,
            },
        };
        let response = self.client.post(&url).json(&body).send().await?;
        Self::check_response(response).await?;

        // The ack body is opaque; the session token travels with the reset
        // link rather than the response.
        Ok(PasswordResetConfirmation {
            token: request.token.clone(),
        })
    }

    async fn verify_email(&self, usermail: &str) -> Result<(), ApiError> {
        let url = self.endpoint(VERIFY_EMAIL_PATH);
        debug!(url = %url, "posting verification email request");

        let response = self
            .client
            .post(&url)
            .json(&UsermailBody { usermail })
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let url = self.endpoint(USER_PATH);
        debug!(url = %url, "fetching profile");

        let mut request = self.client.get(&url);
        if let Some(token) = self.tokens.get() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let response = Self::check_response(response).await?;

        let parsed: ProfileResponse = Self::parse_json(response).await?;
        Ok(parsed.user)
    }
}

// Wire types for the identity service's JSON shapes - internal only

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    user: &'a Credentials,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    token: String,
}

#[derive(Debug, Serialize)]
struct UsermailBody<'a> {
    usermail: &'a str,
}

#[derive(Debug, Deserialize)]
struct RemindPasswordResponse {
    success: SuccessDetail,
}

#[derive(Debug, Deserialize)]
struct SuccessDetail {
    message: String,
}

#[derive(Debug, Serialize)]
struct NewPasswordBody<'a> {
    user: NewPasswordUser<'a>,
}

#[derive(Debug, Serialize)]
struct NewPasswordUser<'a> {
    id: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    user: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_body_shape() {
        let credentials = Credentials {
            email: "a@b.com".to_string(),
            password: "hunter2".to_string(),
        };
        let json = serde_json::to_value(LoginBody { user: &credentials })
            .expect("login body should serialize");
        assert_eq!(
            json,
            serde_json::json!({"user": {"email": "a@b.com", "password": "hunter2"}})
        );
    }

    #[test]
    fn test_new_password_body_omits_reset_token() {
        let request = NewPasswordRequest {
            id: "42".to_string(),
            password: "correct horse".to_string(),
            token: Some("reset-token".to_string()),
        };
        let body = NewPasswordBody {
            user: NewPasswordUser {
                id: &request.id,
                password: &request.password,
            },
        };
        let json = serde_json::to_value(&body).expect("new password body should serialize");
        // The reset token never goes over the wire.
        assert_eq!(
            json,
            serde_json::json!({"user": {"id": "42", "password": "correct horse"}})
        );
    }

    #[test]
    fn test_parse_login_response() {
        let parsed: LoginResponse = serde_json::from_str(r#"{"user":{"token":"abc"}}"#)
            .expect("login response should parse");
        assert_eq!(parsed.user.token, "abc");
    }

    #[test]
    fn test_parse_remind_password_response() {
        let parsed: RemindPasswordResponse =
            serde_json::from_str(r#"{"success":{"message":"check your inbox"}}"#)
                .expect("remind password response should parse");
        assert_eq!(parsed.success.message, "check your inbox");
    }

    #[test]
    fn test_parse_profile_response() {
        let json = r#"{
            "user": {
                "id": "u-17",
                "email": "a@b.com",
                "username": "ada",
                "emailVerified": true,
                "createdAt": "2024-03-01T10:30:00Z"
            }
        }"#;
        let parsed: ProfileResponse =
            serde_json::from_str(json).expect("profile response should parse");
        assert_eq!(parsed.user.id, "u-17");
        assert_eq!(parsed.user.username.as_deref(), Some("ada"));
        assert!(parsed.user.email_verified);
        assert!(parsed.user.created_at.is_some());
    }

    #[test]
    fn test_parse_profile_response_minimal() {
        // Older accounts come back with only an id.
        let parsed: ProfileResponse = serde_json::from_str(r#"{"user":{"id":"u-1"}}"#)
            .expect("minimal profile should parse");
        assert_eq!(parsed.user.id, "u-1");
        assert!(!parsed.user.email_verified);
        assert!(parsed.user.created_at.is_none());
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let config = Config {
            base_url: "https://identity.example.com/api/".to_string(),
            ..Config::default()
        };
        let client =
            IdentityClient::new(&config, TokenStore::new()).expect("client should build");
        assert_eq!(
            client.endpoint(LOGIN_PATH),
            "https://identity.example.com/api/auth"
        );
    }
}
