//! Request/response types for the OTP login endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct OtpLoginRequest {
    pub user_id: String,
    pub otp: String,
    /// Session mode: also deliver the refresh token as a cookie and bind it
    /// into the access token.
    #[serde(default)]
    pub session: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct OtpLoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in milliseconds.
    pub expires_in_ms: i64,
    pub id: Uuid,
}

/// Structured failure body.
///
/// `step` is present only when the caller should restart the challenge from
/// credential entry (attempt cap reached or challenge expired).
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginFailure {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

impl LoginFailure {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            step: None,
        }
    }

    pub(crate) fn restart(message: &str) -> Self {
        Self {
            message: message.to_string(),
            step: Some("enter-email".to_string()),
        }
    }
}
