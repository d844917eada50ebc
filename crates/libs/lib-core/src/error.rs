//! # Centralized Error Handling
//!
//! [`AppError`] is what the HTTP layer sees from the auth core. It follows the
//! `thiserror` pattern and converts from the typed errors of `lib-auth`.
//!
//! ## Error Categories
//!
//! 1. **Authentication failures** (401) - expected, caller-caused
//!    - wrong password ([`PwdError::Mismatch`])
//!    - bad, foreign, tampered or expired token (every [`TokenError`] except `Signing`)
//!
//! 2. **Server Errors** (500) - environment or data problems
//!    - [`Config`](AppError::Config)
//!    - [`Internal`](AppError::Internal): hashing/signing failures, worker
//!      failures, and stored hashes that cannot be parsed
//!
//! Messages never contain a plaintext password or the signing secret; the
//! source errors are built so that they cannot.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use lib_auth::{PwdError, TokenError};
use serde_json::json;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type for the auth core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials or token were rejected.
    ///
    /// **HTTP Status**: 401 Unauthorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error (unexpected failures).
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message.
    ///
    /// For internal errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Config(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal",
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = Json(json!({
            "error": self.user_message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

impl From<PwdError> for AppError {
    fn from(err: PwdError) -> Self {
        match err {
            // Same message whether the email or the password was wrong
            PwdError::Mismatch => AppError::Unauthorized("Incorrect email or password".to_string()),
            PwdError::MalformedHash(_) | PwdError::Hashing(_) | PwdError::Worker(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => AppError::Internal(err.to_string()),
            TokenError::SignatureInvalid | TokenError::Expired | TokenError::Malformed(_) => {
                AppError::Unauthorized(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_map_to_unauthorized() {
        let cases: Vec<AppError> = vec![
            PwdError::Mismatch.into(),
            TokenError::SignatureInvalid.into(),
            TokenError::Expired.into(),
            TokenError::Malformed("not a compact JWS".to_string()).into(),
        ];

        for err in cases {
            assert!(matches!(err, AppError::Unauthorized(_)), "{err:?}");
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_environment_failures_map_to_internal() {
        let cases: Vec<AppError> = vec![
            PwdError::Hashing("rng unavailable".to_string()).into(),
            PwdError::Worker("task panicked".to_string()).into(),
            PwdError::MalformedHash("missing algorithm".to_string()).into(),
            TokenError::Signing("bad key".to_string()).into(),
        ];

        for err in cases {
            assert!(matches!(err, AppError::Internal(_)), "{err:?}");
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.user_message(), "An internal error occurred");
        }
    }

    #[test]
    fn test_expired_token_message() {
        let err = AppError::from(TokenError::Expired);
        assert_eq!(err.user_message(), "Token has expired");
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::from(PwdError::Mismatch).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("body should be JSON");

        assert_eq!(value["error"], "Incorrect email or password");
        assert_eq!(value["code"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_internal_response_hides_details() {
        let response = AppError::Config("JWT_SECRET must be set in environment".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("JWT_SECRET"));
    }
}
