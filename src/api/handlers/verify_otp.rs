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
pub struct VerifyOtpRequest {
    email: String,
    code: String,
}

impl fmt::Debug for VerifyOtpRequest {
    // the code is a live credential for its step
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyOtpRequest")
            .field("email", &self.email)
            .field("code", &"<redacted>")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    authenticated: bool,
    principal: PrincipalInfo,
}

#[utoipa::path(
    post,
    path= "/verify-otp",
    request_body = VerifyOtpRequest,
    responses (
        (status = 200, description = "Code accepted, session may start", body = VerifyOtpResponse),
        (status = 400, description = "Wrong or expired code", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(service, payload))]
pub async fn verify_otp(
    service: Extension<CredentialService>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    match service.verify_otp(&request.email, &request.code).await {
        Ok(principal) => {
            debug!("OTP accepted");

            (
                StatusCode::OK,
                Json(VerifyOtpResponse {
                    authenticated: true,
                    principal,
                }),
            )
                .into_response()
        }

        Err(err) => error_response(&err),
    }
}
