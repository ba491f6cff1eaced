//! Small helpers for refresh tokens, cookies, and request provenance.

use anyhow::{Context, Result};
use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};

use super::state::AuthConfig;

/// Cookie carrying the refresh token in session mode.
pub(crate) const REFRESH_COOKIE_NAME: &str = "sezamo_refresh_token";

/// Refresh tokens are 64 base64url characters (48 random bytes).
const REFRESH_TOKEN_BYTES: usize = 48;

/// Create a new refresh token.
///
/// The raw value is returned to the caller and stored verbatim as the
/// session lookup key; collisions at this entropy are treated as impossible.
pub(crate) fn generate_refresh_token() -> Result<String> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate refresh token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Build the `HttpOnly` refresh-token cookie set in session mode.
pub(crate) fn refresh_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = config.refresh_token_ttl_seconds();
    let mut cookie = format!(
        "{REFRESH_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age}"
    );
    if config.production() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Extract a client IP from common proxy headers.
pub(crate) fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Read a header as a trimmed, non-empty string.
pub(crate) fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> AuthConfig {
        AuthConfig::new(SecretString::from("secret".to_string()))
    }

    #[test]
    fn refresh_token_is_64_url_safe_chars() -> Result<()> {
        let token = generate_refresh_token()?;
        assert_eq!(token.len(), 64);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        Ok(())
    }

    #[test]
    fn refresh_tokens_are_distinct() -> Result<()> {
        assert_ne!(generate_refresh_token()?, generate_refresh_token()?);
        Ok(())
    }

    #[test]
    fn refresh_cookie_development_omits_secure() -> Result<()> {
        let cookie = refresh_cookie(&config(), "token")?;
        let cookie = cookie.to_str()?;
        assert!(cookie.starts_with("sezamo_refresh_token=token; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
        Ok(())
    }

    #[test]
    fn refresh_cookie_production_is_secure() -> Result<()> {
        let cookie = refresh_cookie(&config().with_production(true), "token")?;
        assert!(cookie.to_str()?.ends_with("; Secure"));
        Ok(())
    }

    #[test]
    fn extract_client_ip_prefers_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(extract_client_ip(&headers), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(extract_client_ip(&headers), Some("9.9.9.9".to_string()));
    }

    #[test]
    fn header_string_skips_empty_values() {
        let mut headers = HeaderMap::new();
        headers.insert("origin", HeaderValue::from_static("  "));
        assert_eq!(header_string(&headers, "origin"), None);
        headers.insert("origin", HeaderValue::from_static("https://app.sezamo.dev"));
        assert_eq!(
            header_string(&headers, "origin"),
            Some("https://app.sezamo.dev".to_string())
        );
    }
}
