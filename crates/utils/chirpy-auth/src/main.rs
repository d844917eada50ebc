//! # Chirpy Auth Utility
//!
//! Operator tool for the credential and token core: hash or check a password,
//! mint a token for a user, or inspect a token.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package chirpy-auth --bin chirpy_auth -- hash             # password on stdin
//! cargo run --package chirpy-auth --bin chirpy_auth -- verify <hash>    # password on stdin
//! cargo run --package chirpy-auth --bin chirpy_auth -- issue <user-id>
//! cargo run --package chirpy-auth --bin chirpy_auth -- validate <token>
//! ```
//!
//! `issue` and `validate` read `JWT_SECRET` / `JWT_TTL_SECONDS` from the
//! environment (or `.env`). Passwords are read from stdin so they do not end
//! up in shell history or the process list. Results go to stdout, logs to
//! stderr.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{bail, Context};
use lib_auth::{decode_claims, hash_password, issue_token, validate_token, verify_password, PwdError};
use lib_core::AuthConfig;
use lib_utils::{format_time, from_unix};
use tracing::{debug, info};
use uuid::Uuid;

const USAGE: &str = "usage: chirpy_auth <hash | verify <hash> | issue <user-id> | validate <token>>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Hash,
    Verify { hash: String },
    Issue { subject: Uuid },
    Validate { token: String },
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    match args {
        [cmd] if cmd == "hash" => Ok(Command::Hash),
        [cmd, hash] if cmd == "verify" => Ok(Command::Verify { hash: hash.clone() }),
        [cmd, subject] if cmd == "issue" => {
            let subject = Uuid::parse_str(subject).context("user id must be a UUID")?;
            Ok(Command::Issue { subject })
        }
        [cmd, token] if cmd == "validate" => Ok(Command::Validate { token: token.clone() }),
        _ => bail!(USAGE),
    }
}

fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => tracing_subscriber::EnvFilter::new(&log_level),
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn run(command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Hash => {
            let password = read_password()?;
            println!("{}", hash_password(&password)?);
        }
        Command::Verify { hash } => {
            let password = read_password()?;
            match verify_password(&password, &hash) {
                Ok(()) => println!("match"),
                Err(PwdError::Mismatch) => {
                    println!("mismatch");
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Issue { subject } => {
            let config = AuthConfig::from_env()?;
            let token = issue_token(subject, config.jwt_secret(), config.token_ttl())?;
            info!("Issued token for {} (ttl: {:?})", subject, config.token_ttl());
            println!("{token}");
        }
        Command::Validate { token } => {
            let config = AuthConfig::from_env()?;
            let subject = validate_token(&token, config.jwt_secret())?;
            let claims = decode_claims(&token, config.jwt_secret())?;
            let expires = from_unix(claims.exp.timestamp())?;
            debug!("Token issued by {} at {}", claims.iss, claims.iat.timestamp());
            println!("{subject}");
            println!("expires {}", format_time(expires));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;
    run(command)
}
