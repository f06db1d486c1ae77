use std::sync::Mutex;

use async_trait::async_trait;
use axum::extract::Path;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{CategoryRecord, SectorRecord};
use crate::database::repository::SectorRepository;
use crate::draft::{
    CategorySeed, DraftError, Feedback, SaveError, SectorDraft, SectorSavePayload, SectorSaver,
    SectorSeed,
};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

/// Raw draft input as submitted by the admin UI. Untrimmed; normalization and
/// duplicate rejection happen in the draft editor model, not here.
#[derive(Debug, Deserialize)]
pub struct SectorInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub prompt_template: String,
    #[serde(default)]
    pub categories: Vec<CategoryInput>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub id: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SectorWithCategories {
    #[serde(flatten)]
    pub sector: SectorRecord,
    pub categories: Vec<CategoryRecord>,
}

/// GET /api/sectors - All sectors, newest first.
pub async fn list() -> ApiResult<Vec<SectorRecord>> {
    let repo = SectorRepository::from_manager().await?;
    Ok(ApiResponse::success(repo.list().await?))
}

/// GET /api/sectors/:id - One sector with its ordered categories.
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<SectorWithCategories> {
    let repo = SectorRepository::from_manager().await?;
    let (sector, categories) = repo.fetch(id).await?;
    Ok(ApiResponse::success(SectorWithCategories { sector, categories }))
}

/// POST /api/sectors - Create a sector from raw draft input.
pub async fn create(Json(input): Json<SectorInput>) -> ApiResult<SectorWithCategories> {
    let saved = save_through_draft(None, input).await?;
    Ok(ApiResponse::created(saved))
}

/// PUT /api/sectors/:id - Replace a sector (and its category set) from raw
/// draft input.
pub async fn update(
    Path(id): Path<Uuid>,
    Json(input): Json<SectorInput>,
) -> ApiResult<SectorWithCategories> {
    let saved = save_through_draft(Some(id), input).await?;
    Ok(ApiResponse::success(saved))
}

/// Run raw input through the draft editor model so the server applies the
/// same trimming, duplicate rejection and normalization the UI does, then
/// persist via the repository saver.
async fn save_through_draft(
    sector_id: Option<Uuid>,
    input: SectorInput,
) -> Result<SectorWithCategories, ApiError> {
    let mut draft = match sector_id {
        Some(id) => {
            // Categories already carrying an id are the trusted baseline;
            // only genuinely new names go through the duplicate check below.
            let seed = SectorSeed {
                id,
                name: input.name.clone(),
                description: Some(input.description.clone()),
                platforms: Vec::new(),
                prompt_template: Some(input.prompt_template.clone()),
            };
            let baseline: Vec<CategorySeed> = input
                .categories
                .iter()
                .filter_map(|c| c.id.map(|id| CategorySeed { id, name: c.name.trim().to_string() }))
                .collect();
            SectorDraft::from_existing(&seed, &baseline)
        }
        None => {
            reject_preexisting_categories(&input)?;
            let mut draft = SectorDraft::new();
            draft.set_name(input.name.clone());
            draft.set_description(input.description.clone());
            draft.set_prompt_template(input.prompt_template.clone());
            draft
        }
    };

    for tag in dedupe(&input.platforms) {
        draft.toggle_platform(&tag);
    }

    for category in input.categories.iter().filter(|c| c.id.is_none()) {
        draft.add_category(&category.name);
        if let Some(Feedback::Error(msg)) = draft.feedback() {
            return Err(ApiError::validation_error(msg.clone()));
        }
    }

    // Surface validation failures with their exact message before handing
    // off to the saver.
    draft.build_save_payload().map_err(ApiError::from)?;

    let repo = SectorRepository::from_manager().await?;
    let saver = TrackingSaver { repo, saved_id: Mutex::new(None) };
    draft.submit(&saver).await;

    match draft.feedback() {
        Some(Feedback::Ok(_)) => {}
        Some(Feedback::Error(msg)) => {
            // The conversion logs the detail and hands the client a generic
            // message; the raw database error never leaves the server.
            return Err(ApiError::from(DraftError::ExternalSave(msg.clone())));
        }
        None => return Err(ApiError::internal_server_error("Save produced no feedback")),
    }

    let saved_id = saver
        .saved_id
        .lock()
        .ok()
        .and_then(|id| *id)
        .ok_or_else(|| ApiError::internal_server_error("Save completed without an id"))?;

    let (sector, categories) = saver.repo.fetch(saved_id).await?;
    Ok(SectorWithCategories { sector, categories })
}

/// A brand-new sector cannot reference already-persisted categories.
/// Dropping their ids silently would lose data, so the input is rejected.
fn reject_preexisting_categories(input: &SectorInput) -> Result<(), ApiError> {
    if input.categories.iter().any(|c| c.id.is_some()) {
        return Err(ApiError::bad_request(
            "Un nuovo settore non puo' avere categorie gia' esistenti",
        ));
    }
    Ok(())
}

fn dedupe(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        if !seen.contains(tag) {
            seen.push(tag.clone());
        }
    }
    seen
}

/// Repository-backed saver that records the id the save resolved to, so the
/// handler can echo the persisted sector back.
struct TrackingSaver {
    repo: SectorRepository,
    saved_id: Mutex<Option<Uuid>>,
}

#[async_trait]
impl SectorSaver for TrackingSaver {
    async fn save_sector(&self, payload: &SectorSavePayload) -> Result<(), SaveError> {
        let id = self.repo.save(payload).await.map_err(|e| SaveError(e.to_string()))?;
        if let Ok(mut slot) = self.saved_id.lock() {
            *slot = Some(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn input_with(categories: Vec<CategoryInput>) -> SectorInput {
        SectorInput {
            name: "Ristoranti".to_string(),
            description: String::new(),
            platforms: Vec::new(),
            prompt_template: String::new(),
            categories,
        }
    }

    #[test]
    fn create_input_with_persisted_category_ids_is_rejected() {
        let input = input_with(vec![CategoryInput {
            id: Some(Uuid::new_v4()),
            name: "Pizzerie".to_string(),
        }]);

        let err = reject_preexisting_categories(&input).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn create_input_with_only_new_categories_passes() {
        let input = input_with(vec![CategoryInput { id: None, name: "Pizzerie".to_string() }]);
        assert!(reject_preexisting_categories(&input).is_ok());
    }
}
