use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::provider::AuthProvider;
use crate::error::ApiError;

use super::establish_session;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - Password sign-in through the external auth provider.
/// On success the session cookie is set and a minimal user object returned.
pub async fn login(
    State(provider): State<Arc<dyn AuthProvider>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email e password sono obbligatorie"));
    }

    let user = provider.sign_in_with_password(email, &payload.password).await?;
    establish_session(user).await
}
