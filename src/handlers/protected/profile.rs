use axum::{Extension, Json};

use crate::database::models::ProfileRecord;
use crate::database::repository::{ProfileChanges, ProfileRepository};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/profile - The signed-in operator's profile.
pub async fn get(Extension(user): Extension<AuthUser>) -> ApiResult<ProfileRecord> {
    let repo = ProfileRepository::from_manager().await?;
    Ok(ApiResponse::success(repo.fetch(user.user_id).await?))
}

/// PUT /api/profile - Update the signed-in operator's editable fields.
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Json(changes): Json<ProfileChanges>,
) -> ApiResult<ProfileRecord> {
    let repo = ProfileRepository::from_manager().await?;
    Ok(ApiResponse::success(repo.update(user.user_id, &changes).await?))
}
