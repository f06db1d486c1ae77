use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::clear_session_cookie_value;
use crate::config;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

/// DELETE /auth/session - Clear the session cookie. The provider-side session
/// simply expires; there is nothing to revoke here.
pub async fn logout() -> Result<Response, ApiError> {
    let cookie = clear_session_cookie_value(&config::config().security);

    let mut response =
        ApiResponse::success(json!({ "message": "Sessione terminata." })).into_response();
    let value = HeaderValue::from_str(&cookie)
        .map_err(|_| ApiError::internal_server_error("Failed to build session cookie"))?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}
