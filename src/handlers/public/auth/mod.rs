mod login;
mod logout;
mod magic_link;

pub use login::login;
pub use logout::logout;
pub use magic_link::{magic_link_callback, magic_link_request};

use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::provider::AuthenticatedUser;
use crate::auth::{generate_session_token, session_cookie_value, Claims};
use crate::config;
use crate::database::repository::ProfileRepository;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

/// Shared tail of every successful sign-in: make sure the profile row exists,
/// mint a session token and attach the session cookie to the response.
pub(super) async fn establish_session(user: AuthenticatedUser) -> Result<Response, ApiError> {
    let profiles = ProfileRepository::from_manager().await?;
    profiles.ensure(user.id, &user.email).await?;

    let claims = Claims::new(user.id, user.email.clone());
    let token = generate_session_token(&claims)?;
    let cookie = session_cookie_value(&token, &config::config().security);

    let mut response = ApiResponse::success(json!({
        "user": { "id": user.id, "email": user.email }
    }))
    .into_response();

    let value = HeaderValue::from_str(&cookie)
        .map_err(|_| ApiError::internal_server_error("Failed to build session cookie"))?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}
