use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("identity service returned {status}")]
    Protocol {
        status: reqwest::StatusCode,
        /// Server-supplied `error.message`, when the body carried one.
        message: Option<String>,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies echoed into logs
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Failure bodies are expected to look like `{"error":{"message":"..."}}`,
/// but the shape is not guaranteed.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Build a protocol error from a non-success response, pulling the
    /// server message out of the body when it matches the expected shape.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Some(parsed.error.message),
            Err(_) => {
                if !body.is_empty() {
                    debug!(status = %status, body = %Self::truncate_body(body), "failure body without error shape");
                }
                None
            }
        };
        ApiError::Protocol { status, message }
    }

    /// The detail carried into a failed flow event: the server-supplied
    /// message when present, the error's display form otherwise.
    pub fn normalized_message(&self) -> String {
        match self {
            ApiError::Protocol {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_extracts_server_message() {
        let err = ApiError::from_status(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"bad credentials"}}"#,
        );
        match &err {
            ApiError::Protocol { status, message } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(message.as_deref(), Some("bad credentials"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.normalized_message(), "bad credentials");
    }

    #[test]
    fn from_status_tolerates_missing_error_shape() {
        let err = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, "<html>oops</html>");
        match &err {
            ApiError::Protocol { status, message } => {
                assert_eq!(status.as_u16(), 502);
                assert!(message.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.normalized_message(),
            "identity service returned 502 Bad Gateway"
        );
    }

    #[test]
    fn from_status_tolerates_empty_body() {
        let err = ApiError::from_status(reqwest::StatusCode::NOT_FOUND, "");
        assert!(matches!(err, ApiError::Protocol { message: None, .. }));
    }

    #[test]
    fn invalid_response_uses_display_form() {
        let err = ApiError::InvalidResponse("missing token".to_string());
        assert_eq!(err.normalized_message(), "invalid response: missing token");
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let body = "x".repeat(2 * MAX_ERROR_BODY_LENGTH);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with("total bytes)"));
    }
}
