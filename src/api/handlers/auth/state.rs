//! Auth configuration and shared handler state.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use super::storage::{SessionStore, UserStore};

const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 15 * 60;
const DEFAULT_SESSION_COOKIE_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Typed configuration for token and session issuance.
///
/// TTLs are validated at startup; a malformed value aborts the process
/// instead of silently issuing zero-lifetime tokens.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    secret: SecretString,
    refresh_token_ttl_seconds: i64,
    access_token_ttl_seconds: i64,
    session_cookie_ttl_seconds: i64,
    production: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            refresh_token_ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
            access_token_ttl_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            session_cookie_ttl_seconds: DEFAULT_SESSION_COOKIE_TTL_SECONDS,
            production: false,
        }
    }

    #[must_use]
    pub fn with_refresh_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_access_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_cookie_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_cookie_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }

    pub(crate) fn refresh_token_ttl_seconds(&self) -> i64 {
        self.refresh_token_ttl_seconds
    }

    pub(crate) fn access_token_ttl_seconds(&self) -> i64 {
        self.access_token_ttl_seconds
    }

    pub(crate) fn session_cookie_ttl_seconds(&self) -> i64 {
        self.session_cookie_ttl_seconds
    }

    /// Cookies only get the `Secure` attribute in production deployments.
    pub(crate) fn production(&self) -> bool {
        self.production
    }
}

/// Shared state handed to the auth handlers via `Extension`.
pub struct AuthState {
    config: AuthConfig,
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
}

impl AuthState {
    pub fn new(config: AuthConfig, users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            users,
            sessions,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub(crate) fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new(SecretString::from("secret".to_string()));

        assert_eq!(
            config.refresh_token_ttl_seconds(),
            super::DEFAULT_REFRESH_TOKEN_TTL_SECONDS
        );
        assert_eq!(
            config.access_token_ttl_seconds(),
            super::DEFAULT_ACCESS_TOKEN_TTL_SECONDS
        );
        assert_eq!(
            config.session_cookie_ttl_seconds(),
            super::DEFAULT_SESSION_COOKIE_TTL_SECONDS
        );
        assert!(!config.production());

        let config = config
            .with_refresh_token_ttl_seconds(120)
            .with_access_token_ttl_seconds(30)
            .with_session_cookie_ttl_seconds(60)
            .with_production(true);

        assert_eq!(config.refresh_token_ttl_seconds(), 120);
        assert_eq!(config.access_token_ttl_seconds(), 30);
        assert_eq!(config.session_cookie_ttl_seconds(), 60);
        assert!(config.production());
        assert_eq!(config.secret_bytes(), b"secret");
    }
}
