//! # Authentication Library
//!
//! Password hashing and JWT issuance/validation for Chirpy.
//!
//! Both halves are stateless: the signing secret is always passed in by the
//! caller, and nothing here reads configuration or touches shared state.

pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use pwd::{hash_password, hash_password_async, verify_password, verify_password_async, PwdError};
pub use token::{bearer_token, decode_claims, issue_token, validate_token, Claims, NumericDate, TokenError, ISSUER};
