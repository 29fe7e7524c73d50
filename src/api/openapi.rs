use crate::api::handlers::{self, health, login, signup, verify_otp};
use crate::credentials::{EnrollmentMaterial, PrincipalInfo};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        signup::signup,
        login::login,
        verify_otp::verify_otp
    ),
    components(
        schemas(
            handlers::ErrorResponse,
            health::Health,
            signup::SignupRequest,
            signup::SignupResponse,
            login::LoginRequest,
            login::LoginResponse,
            verify_otp::VerifyOtpRequest,
            verify_otp::VerifyOtpResponse,
            PrincipalInfo,
            EnrollmentMaterial
        )
    ),
    tags(
        (name = "auth", description = "Signup, login, and OTP verification"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
