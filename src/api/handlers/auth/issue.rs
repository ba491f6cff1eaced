//! Credential issuance after a successful OTP verification.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::state::AuthConfig;
use super::storage::{SessionRecord, SessionStore, UserRecord, UserStore};
use super::utils::generate_refresh_token;
use crate::token::{sign_hs256, AccessTokenClaims, TOKEN_ISSUER};

/// Provenance captured verbatim from the login request.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub origin: Option<String>,
}

/// Everything the transport needs to answer a successful login.
#[derive(Debug)]
pub(crate) struct IssuedCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in_ms: i64,
    pub user_id: Uuid,
}

/// Mint an access token and a refresh session for a verified user.
///
/// Issuance is deliberately not idempotent: every call produces a fresh
/// refresh token and a new session row. Any store failure aborts the whole
/// issuance so the caller never sees partial credentials. A crash between
/// the session insert and the challenge reset leaves an orphaned session
/// with a still-pending OTP, which is an accepted risk.
pub(crate) async fn issue_session(
    users: &dyn UserStore,
    sessions: &dyn SessionStore,
    config: &AuthConfig,
    user: &UserRecord,
    context: RequestContext,
    session_mode: bool,
    now: DateTime<Utc>,
) -> Result<IssuedCredentials> {
    let refresh_token = generate_refresh_token()?;
    let refresh_expires_at = now + Duration::seconds(config.refresh_token_ttl_seconds());

    // Session mode binds the access token to this refresh token and uses the
    // session-cookie lifetime instead of the short bearer lifetime.
    let access_ttl_seconds = if session_mode {
        config.session_cookie_ttl_seconds()
    } else {
        config.access_token_ttl_seconds()
    };

    let claims = AccessTokenClaims {
        id: user.id.to_string(),
        role: user.role.map(|role| role.to_string()),
        app_access: false,
        admin_access: false,
        session: session_mode.then(|| refresh_token.clone()),
        iss: TOKEN_ISSUER.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(access_ttl_seconds)).timestamp(),
    };
    let access_token =
        sign_hs256(config.secret_bytes(), &claims).context("failed to sign access token")?;

    sessions
        .insert_session(&SessionRecord {
            token: refresh_token.clone(),
            user_id: user.id,
            expires_at: refresh_expires_at,
            ip: context.ip,
            user_agent: context.user_agent,
            origin: context.origin,
        })
        .await?;

    sessions.delete_expired_sessions(now).await?;

    users.reset_challenge_and_activate(user.id, now).await?;

    Ok(IssuedCredentials {
        access_token,
        refresh_token,
        expires_in_ms: access_ttl_seconds * 1000,
        user_id: user.id,
    })
}
