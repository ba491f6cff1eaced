//! OTP login endpoint.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use super::{
    issue::{issue_session, RequestContext},
    state::AuthState,
    types::{LoginFailure, OtpLoginRequest, OtpLoginResponse},
    utils::{extract_client_ip, header_string, refresh_cookie},
    verify::{verify_otp, VerifyOutcome},
};

// Unknown users and wrong codes share one message to block enumeration.
const INVALID_CREDENTIALS: &str = "Invalid user or OTP";

#[utoipa::path(
    post,
    path = "/v1/auth/otp",
    request_body = OtpLoginRequest,
    responses(
        (status = 200, description = "OTP accepted, credentials issued", body = OtpLoginResponse),
        (status = 400, description = "Missing user_id or otp", body = LoginFailure),
        (status = 403, description = "Verification failed", body = LoginFailure),
        (status = 500, description = "Internal error", body = LoginFailure)
    ),
    tag = "auth"
)]
pub async fn otp_login(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<OtpLoginRequest>>,
) -> impl IntoResponse {
    // Missing or empty inputs are caller errors and never touch the store.
    let request = match payload {
        Some(Json(request)) if !request.user_id.is_empty() && !request.otp.is_empty() => request,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(LoginFailure::new("user_id and otp are required")),
            )
                .into_response();
        }
    };

    // A malformed id cannot match any user; report it like an unknown one.
    let Ok(user_id) = Uuid::parse_str(&request.user_id) else {
        return (
            StatusCode::FORBIDDEN,
            Json(LoginFailure::new(INVALID_CREDENTIALS)),
        )
            .into_response();
    };

    let now = Utc::now();

    let outcome = match verify_otp(auth_state.users(), user_id, &request.otp, now).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("OTP verification failed: {err:#}");
            return internal_error();
        }
    };

    let user = match outcome {
        VerifyOutcome::Accepted(user) => user,
        VerifyOutcome::InvalidUser | VerifyOutcome::InvalidOtp => {
            return (
                StatusCode::FORBIDDEN,
                Json(LoginFailure::new(INVALID_CREDENTIALS)),
            )
                .into_response();
        }
        VerifyOutcome::TooManyAttempts => {
            return (
                StatusCode::FORBIDDEN,
                Json(LoginFailure::restart("Too many attempts")),
            )
                .into_response();
        }
        VerifyOutcome::Expired => {
            return (
                StatusCode::FORBIDDEN,
                Json(LoginFailure::restart("OTP expired")),
            )
                .into_response();
        }
    };

    let context = RequestContext {
        ip: extract_client_ip(&headers),
        user_agent: header_string(&headers, "user-agent"),
        origin: header_string(&headers, "origin"),
    };

    let credentials = match issue_session(
        auth_state.users(),
        auth_state.sessions(),
        auth_state.config(),
        &user,
        context,
        request.session,
        now,
    )
    .await
    {
        Ok(credentials) => credentials,
        Err(err) => {
            error!("Credential issuance failed: {err:#}");
            return internal_error();
        }
    };

    let mut response_headers = HeaderMap::new();
    if request.session {
        match refresh_cookie(auth_state.config(), &credentials.refresh_token) {
            Ok(cookie) => {
                response_headers.insert(SET_COOKIE, cookie);
            }
            Err(err) => {
                error!("Failed to build refresh cookie: {err}");
                return internal_error();
            }
        }
    }

    let body = OtpLoginResponse {
        access_token: credentials.access_token,
        refresh_token: credentials.refresh_token,
        expires_in_ms: credentials.expires_in_ms,
        id: credentials.user_id,
    };

    (StatusCode::OK, response_headers, Json(body)).into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(LoginFailure::new("Internal server error")),
    )
        .into_response()
}
