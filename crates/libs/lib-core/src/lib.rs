//! # Core Library
//!
//! Configuration and the application-wide error type for Chirpy's auth core.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::AuthConfig;
pub use error::{AppError, Result};
