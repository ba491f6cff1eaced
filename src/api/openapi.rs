//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use super::handlers::auth::types::{LoginFailure, OtpLoginRequest, OtpLoginResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sezamo",
        description = "OTP second-factor verification and session issuance"
    ),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::auth::otp_login::otp_login
    ),
    components(schemas(OtpLoginRequest, OtpLoginResponse, LoginFailure)),
    tags(
        (name = "auth", description = "OTP login"),
        (name = "health", description = "Liveness")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
