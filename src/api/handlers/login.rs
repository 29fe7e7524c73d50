use super::{ErrorResponse, error_response};
use crate::credentials::{CredentialService, PrincipalInfo};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl fmt::Debug for LoginRequest {
    // keep the password out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    requires_otp: bool,
    principal: PrincipalInfo,
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Password verified, OTP required next", body = LoginResponse),
        (status = 400, description = "Unknown email or wrong password", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(service, payload))]
pub async fn login(
    service: Extension<CredentialService>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    match service.login(&request.email, &request.password).await {
        Ok(outcome) => {
            debug!("Password accepted, awaiting OTP");

            (
                StatusCode::OK,
                Json(LoginResponse {
                    requires_otp: outcome.requires_otp,
                    principal: outcome.principal,
                }),
            )
                .into_response()
        }

        Err(err) => error_response(&err),
    }
}
