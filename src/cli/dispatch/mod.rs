//! Command-line argument dispatch and server initialization.
//!
//! Maps validated CLI arguments to a server action. TTLs are rejected here,
//! once, at startup; a malformed or non-positive lifetime never reaches the
//! request path.

use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let secret = matches
        .get_one::<String>("secret")
        .cloned()
        .context("missing required argument: --secret")?;

    let refresh_token_ttl_seconds = ttl(matches, "refresh-token-ttl-seconds")?;
    let access_token_ttl_seconds = ttl(matches, "access-token-ttl-seconds")?;
    let session_cookie_ttl_seconds = ttl(matches, "session-cookie-ttl-seconds")?;

    Ok(Action::Server(Args {
        port,
        dsn,
        secret: SecretString::from(secret),
        refresh_token_ttl_seconds,
        access_token_ttl_seconds,
        session_cookie_ttl_seconds,
        production: matches.get_flag("production"),
    }))
}

fn ttl(matches: &clap::ArgMatches, name: &str) -> Result<i64> {
    let seconds = matches
        .get_one::<i64>(name)
        .copied()
        .with_context(|| format!("missing required argument: --{name}"))?;
    if seconds <= 0 {
        anyhow::bail!("--{name} must be positive, got {seconds}");
    }
    Ok(seconds)
}
