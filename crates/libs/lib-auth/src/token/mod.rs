//! # JWT Token Management
//!
//! Issuance and validation of HS256-signed access tokens.
//!
//! Tokens carry the registered claims `iss`, `sub`, `iat` and `exp` only.
//! `iat`/`exp` keep microsecond precision (see [`NumericDate`]), so a token
//! is valid for exactly its TTL, sub-second TTLs included.
//!
//! Validation order is fixed: signature first, then claim shape and issuer,
//! then expiry. A token that was tampered with reports
//! [`TokenError::SignatureInvalid`] even if it is also expired.

mod numeric_date;

use std::collections::HashSet;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lib_utils::now_utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

pub use numeric_date::NumericDate;

/// Issuer stamped into every token and required on validation.
pub const ISSUER: &str = "Chirpy";

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT Claims structure containing user authentication information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user ID)
    pub sub: String,
    /// Issued at time
    pub iat: NumericDate,
    /// Expiration time
    pub exp: NumericDate,
}

/// Token issuance and validation failures.
///
/// Messages never include the token, the secret, or claim values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Claims could not be built or signed.
    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// The signature does not verify under the given secret.
    #[error("Token signature is invalid")]
    SignatureInvalid,

    /// The current time is at or past `exp`.
    #[error("Token has expired")]
    Expired,

    /// The token or its claims could not be interpreted.
    #[error("Malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureInvalid,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer => TokenError::Malformed("unexpected issuer".to_string()),
            ErrorKind::MissingRequiredClaim(claim) => {
                TokenError::Malformed(format!("missing claim `{claim}`"))
            }
            ErrorKind::InvalidToken => TokenError::Malformed("not a compact JWS".to_string()),
            ErrorKind::Base64(_) => TokenError::Malformed("invalid base64 segment".to_string()),
            ErrorKind::Json(_) => TokenError::Malformed("invalid header or claims".to_string()),
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Issue a signed token for `subject` that expires `ttl` from now.
pub fn issue_token(subject: Uuid, secret: &str, ttl: Duration) -> Result<String, TokenError> {
    let now = now_utc();
    let ttl = ChronoDuration::from_std(ttl)
        .map_err(|_| TokenError::Signing("ttl is out of range".to_string()))?;
    let exp = now
        .checked_add_signed(ttl)
        .ok_or_else(|| TokenError::Signing("expiry is out of range".to_string()))?;

    let claims = Claims {
        iss: ISSUER.to_string(),
        sub: subject.to_string(),
        iat: NumericDate::from_datetime(now),
        exp: NumericDate::from_datetime(exp),
    };

    let token = encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("[TOKEN] Signing failed: {}", e);
        TokenError::Signing(e.to_string())
    })?;

    debug!("[TOKEN] Issued token for {} (exp: {})", claims.sub, claims.exp.timestamp());
    Ok(token)
}

/// Verify a token's signature, issuer and expiry, returning its claims.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(ALGORITHM);
    // Expiry is checked below against the precise clock with no leeway.
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    // jsonwebtoken only understands integer `exp`; presence of `exp`/`iat` is
    // enforced by deserializing into `Claims` instead.
    validation.required_spec_claims = ["iss", "sub"]
        .into_iter()
        .map(String::from)
        .collect::<HashSet<_>>();

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| {
            let err = TokenError::from(e);
            debug!("[TOKEN] Rejected token: {}", err);
            err
        })?;

    let claims = token_data.claims;
    if NumericDate::from_datetime(now_utc()) >= claims.exp {
        debug!("[TOKEN] Rejected token for {}: expired at {}", claims.sub, claims.exp.timestamp());
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

/// Validate a token and return the user ID it was issued for.
pub fn validate_token(token: &str, secret: &str) -> Result<Uuid, TokenError> {
    let claims = decode_claims(token, secret)?;

    Uuid::parse_str(&claims.sub)
        .map_err(|_| TokenError::Malformed("subject is not a UUID".to_string()))
}

/// Extract the token from an `Authorization` header value (`Bearer <token>`).
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(header_value: &str) -> Result<&str, TokenError> {
    let (scheme, token) = header_value
        .trim()
        .split_once(' ')
        .unwrap_or((header_value.trim(), ""));

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(TokenError::Malformed("missing bearer scheme".to_string()));
    }

    let token = token.trim();

    if token.is_empty() {
        return Err(TokenError::Malformed("empty bearer token".to_string()));
    }
    Ok(token)
}
