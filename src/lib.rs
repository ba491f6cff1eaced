//! # Sezamo (OTP login & session issuance)
//!
//! `sezamo` completes a one-time-password second factor: given a pending
//! user and a submitted code it decides whether to grant a session, then
//! mints a short-lived access token and a long-lived rotating refresh
//! session.
//!
//! ## Verification
//!
//! Codes are compared by exact string equality against the stored
//! challenge. Failed comparisons increment an attempt counter atomically in
//! the store; once three failures accumulate, the challenge is dead and the
//! caller must restart from credential entry. Expiry is only reported for a
//! code that would otherwise match, so probing an expired challenge still
//! consumes attempts.
//!
//! ## Issuance
//!
//! A successful verification mints an HS256 access token carrying
//! `{id, role, app_access: false, admin_access: false}`, persists a 64-char
//! refresh session with request provenance, deletes every expired session
//! store-wide, and clears the challenge. In session mode the refresh token
//! is additionally bound into the access token and delivered as an
//! `HttpOnly` cookie.
//!
//! Unknown users and wrong codes are reported with one shared message to
//! prevent account enumeration.

pub mod api;
pub mod cli;
pub mod token;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
