//! # Utilities Library
//!
//! Shared helpers for environment variables and UTC time.

pub mod envs;
pub mod time;

// Re-export commonly used functions
pub use envs::{get_env, get_env_parse, get_env_parse_or};
pub use time::{format_time, from_unix, now_utc};
