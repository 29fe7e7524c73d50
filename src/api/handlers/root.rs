use crate::api::APP_USER_AGENT;
use axum::response::IntoResponse;

// service banner, undocumented on purpose
pub async fn root() -> impl IntoResponse {
    APP_USER_AGENT
}
