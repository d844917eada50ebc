//! # Auth Configuration
//!
//! Signing secret and token lifetime, loaded from environment variables and
//! validated on startup to fail fast if misconfigured.
//!
//! There is no global instance: the host process builds one [`AuthConfig`]
//! and passes it (or its secret) to whatever needs to issue or validate
//! tokens.
//!
//! | Variable          | Required | Default | Notes                     |
//! |-------------------|----------|---------|---------------------------|
//! | `JWT_SECRET`      | yes      |         | at least 32 bytes         |
//! | `JWT_TTL_SECONDS` | no       | 3600    | 1 second to 30 days       |

use std::fmt;
use std::time::Duration;

use lib_utils::envs::{self, get_env, get_env_parse_or};
use tracing::info;

use crate::error::{AppError, Result};

/// Default token lifetime in seconds (1 hour).
pub const DEFAULT_TTL_SECONDS: u64 = 3600;

/// Longest accepted token lifetime in seconds (30 days).
pub const MAX_TTL_SECONDS: u64 = 30 * 24 * 3600;

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Token signing configuration.
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = get_env("JWT_SECRET").map_err(config_error)?;
        let ttl_seconds = get_env_parse_or("JWT_TTL_SECONDS", DEFAULT_TTL_SECONDS).map_err(config_error)?;

        let config = Self::new(jwt_secret, Duration::from_secs(ttl_seconds));
        config.validate()?;

        info!("[CONFIG] Auth config loaded (token ttl: {}s)", ttl_seconds);
        Ok(config)
    }

    /// Validate configuration values against security rules.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LEN} bytes long"
            )));
        }

        let ttl = self.token_ttl.as_secs();
        if !(1..=MAX_TTL_SECONDS).contains(&ttl) {
            return Err(AppError::Config(format!(
                "JWT_TTL_SECONDS must be between 1 and {MAX_TTL_SECONDS}"
            )));
        }

        Ok(())
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

// The secret must never reach logs through `{:?}`.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

fn config_error(err: envs::Error) -> AppError {
    match err {
        envs::Error::MissingEnv(name) => AppError::Config(format!("{name} must be set in environment")),
        envs::Error::WrongFormat(name) => AppError::Config(format!("{name} has an invalid value")),
    }
}
