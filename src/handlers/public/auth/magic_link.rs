use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::provider::AuthProvider;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

use super::establish_session;

#[derive(Debug, Deserialize)]
pub struct MagicLinkRequest {
    pub email: String,
}

/// POST /auth/magic-link - Ask the provider to email a one-time sign-in link.
/// Always responds 202 on acceptance; whether the address exists is not
/// revealed.
pub async fn magic_link_request(
    State(provider): State<Arc<dyn AuthProvider>>,
    Json(payload): Json<MagicLinkRequest>,
) -> ApiResult<serde_json::Value> {
    let email = payload.email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("Email obbligatoria"));
    }

    provider.send_magic_link(email).await?;
    Ok(ApiResponse::accepted(json!({
        "message": "Se l'indirizzo esiste, riceverai un link di accesso."
    })))
}

#[derive(Debug, Deserialize)]
pub struct MagicLinkCallback {
    pub token: String,
}

/// GET /auth/callback?token= - Consume a one-time link token and establish
/// the session cookie.
pub async fn magic_link_callback(
    State(provider): State<Arc<dyn AuthProvider>>,
    Query(query): Query<MagicLinkCallback>,
) -> Result<Response, ApiError> {
    if query.token.is_empty() {
        return Err(ApiError::bad_request("Token mancante"));
    }

    let user = provider.verify_magic_link(&query.token).await?;
    establish_session(user).await
}
