use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Normalized output of `SectorDraft::build_save_payload`. This is the whole
/// truth about the sector: the saver treats the category list as the complete
/// desired set, not a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorSavePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<Uuid>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub platforms: Vec<String>,
    pub categories: Vec<CategorySavePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
}

/// A category as it leaves the editor. `id` is present only for rows that
/// existed before editing began; draft-local ids never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySavePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
}

/// Failure reported by a `SectorSaver`. Carries only a message; transport,
/// retries and idempotency of the remote effect belong to the implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SaveError(pub String);

/// Persistence seam for the draft editor. The production implementation is
/// `SectorRepository`; tests inject recording mocks.
#[async_trait]
pub trait SectorSaver: Send + Sync {
    async fn save_sector(&self, payload: &SectorSavePayload) -> Result<(), SaveError>;
}
