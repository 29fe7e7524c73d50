//! Route handlers and shared wire types.
//!
//! Handlers stay thin: decode the payload, call into
//! [`CredentialService`](crate::credentials::CredentialService), map the
//! outcome onto the wire. Field validation and flow rules live in the
//! service, not here.

pub mod health;
pub mod login;
pub mod root;
pub mod signup;
pub mod verify_otp;

use crate::credentials::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Wire form of a failed flow: `{"error": "<kind>"}`.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps a flow failure onto its status code and `{"error": kind}` body.
///
/// Recoverable failures are client errors; only storage and internal
/// failures surface as 5xx.
pub fn error_response(err: &AuthError) -> Response {
    let status = match err {
        AuthError::Validation(_)
        | AuthError::DuplicateEmail
        | AuthError::InvalidCredentials
        | AuthError::InvalidOtp => StatusCode::BAD_REQUEST,
        AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        AuthError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("{}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.kind().to_string(),
        }),
    )
        .into_response()
}
