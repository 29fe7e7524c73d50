use super::{ErrorResponse, error_response};
use crate::credentials::{CredentialService, EnrollmentMaterial};
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
pub struct SignupRequest {
    name: String,
    email: String,
    password: String,
}

impl fmt::Debug for SignupRequest {
    // keep the password out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    enrollment_material: EnrollmentMaterial,
}

#[utoipa::path(
    post,
    path= "/signup",
    request_body = SignupRequest,
    responses (
        (status = 201, description = "Principal registered, enrollment material returned", body = SignupResponse),
        (status = 400, description = "Invalid field or email already registered", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(service, payload))]
pub async fn signup(
    service: Extension<CredentialService>,
    payload: Option<Json<SignupRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    match service
        .signup(&request.name, &request.email, &request.password)
        .await
    {
        Ok(enrollment_material) => {
            debug!("Signup accepted");

            (
                StatusCode::CREATED,
                Json(SignupResponse {
                    enrollment_material,
                }),
            )
                .into_response()
        }

        Err(err) => error_response(&err),
    }
}
