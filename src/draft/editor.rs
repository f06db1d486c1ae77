use uuid::Uuid;

use super::error::DraftError;
use super::payload::{CategorySavePayload, SectorSavePayload, SectorSaver};

pub const DUPLICATE_CATEGORY_MSG: &str = "Categoria gia' presente.";
pub const NAME_REQUIRED_MSG: &str = "Il nome del settore e' obbligatorio.";
pub const SAVED_OK_MSG: &str = "Settore salvato.";

/// Submission status of the draft. `Saving` only while an injected save call
/// is in flight; every path restores `Idle` before `submit` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
}

/// Last user-facing feedback produced by an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Ok(String),
    Error(String),
}

/// A persisted sector as supplied by the outside world when the editor opens
/// in edit mode.
#[derive(Debug, Clone)]
pub struct SectorSeed {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub platforms: Vec<String>,
    pub prompt_template: Option<String>,
}

/// A persisted category supplied alongside a `SectorSeed`.
#[derive(Debug, Clone)]
pub struct CategorySeed {
    pub id: Uuid,
    pub name: String,
}

/// A category row inside the draft. Every row has a `local_id` for list
/// reconciliation; only pre-existing rows also carry a durable `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub local_id: Uuid,
    pub id: Option<Uuid>,
    pub name: String,
}

impl CategoryDraft {
    fn existing(id: Uuid, name: impl Into<String>) -> Self {
        Self { local_id: Uuid::new_v4(), id: Some(id), name: name.into() }
    }

    fn new(name: impl Into<String>) -> Self {
        Self { local_id: Uuid::new_v4(), id: None, name: name.into() }
    }
}

/// In-memory draft of a sector being edited. Exclusively owned by one editing
/// session; no operation here touches the outside world except `submit`.
#[derive(Debug)]
pub struct SectorDraft {
    sector_id: Option<Uuid>,
    name: String,
    description: String,
    platforms: Vec<String>,
    categories: Vec<CategoryDraft>,
    prompt_template: String,
    pending_category_name: String,
    status: SaveStatus,
    feedback: Option<Feedback>,
}

impl Default for SectorDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl SectorDraft {
    /// Creation mode: empty scalars, no categories.
    pub fn new() -> Self {
        Self {
            sector_id: None,
            name: String::new(),
            description: String::new(),
            platforms: Vec::new(),
            categories: Vec::new(),
            prompt_template: String::new(),
            pending_category_name: String::new(),
            status: SaveStatus::Idle,
            feedback: None,
        }
    }

    /// Edit mode: seed scalars and categories from persisted records. Each
    /// seeded category gets a fresh local id; input order is preserved.
    pub fn from_existing(sector: &SectorSeed, categories: &[CategorySeed]) -> Self {
        let mut draft = Self::new();
        draft.reset_from(sector, categories);
        draft
    }

    /// Replace the draft with a freshly supplied baseline. This is
    /// unconditional: scalar fields, platforms and the whole category
    /// collection are overwritten, discarding any unsaved edits. The editor
    /// always reflects the latest externally supplied state, never a merge.
    pub fn reset_from(&mut self, sector: &SectorSeed, categories: &[CategorySeed]) {
        self.sector_id = Some(sector.id);
        self.name = sector.name.clone();
        self.description = sector.description.clone().unwrap_or_default();
        self.platforms = sector.platforms.clone();
        self.prompt_template = sector.prompt_template.clone().unwrap_or_default();
        self.categories = categories
            .iter()
            .map(|c| CategoryDraft::existing(c.id, c.name.clone()))
            .collect();
        self.pending_category_name.clear();
        self.feedback = None;
    }

    // Read-only snapshot accessors. Rendering layers consume these; nothing
    // else about the internal state is exposed.

    pub fn sector_id(&self) -> Option<Uuid> {
        self.sector_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    pub fn categories(&self) -> &[CategoryDraft] {
        &self.categories
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    pub fn pending_category_name(&self) -> &str {
        &self.pending_category_name
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_prompt_template(&mut self, template: impl Into<String>) {
        self.prompt_template = template.into();
    }

    pub fn set_pending_category_name(&mut self, name: impl Into<String>) {
        self.pending_category_name = name.into();
    }

    /// Toggle membership of a platform tag: remove it when present, append it
    /// when absent. The tag itself is unconstrained here; restricting input to
    /// the known platform enumeration is the caller's concern.
    pub fn toggle_platform(&mut self, tag: &str) {
        if let Some(pos) = self.platforms.iter().position(|p| p == tag) {
            self.platforms.remove(pos);
        } else {
            self.platforms.push(tag.to_string());
        }
    }

    /// Append a category named after the trimmed input.
    ///
    /// Empty-after-trim input is silently ignored (the add button's own
    /// guard). A name matching an existing category case-insensitively leaves
    /// the collection untouched and surfaces error feedback. On success the
    /// new row gets a fresh local id and any prior error feedback is cleared.
    pub fn add_category(&mut self, raw_name: &str) {
        let name = raw_name.trim();
        if name.is_empty() {
            return;
        }

        // Full Unicode lowercasing: category names are Italian and often
        // accented, which ASCII-only comparison would let through.
        let needle = name.to_lowercase();
        let duplicate = self
            .categories
            .iter()
            .any(|c| c.name.to_lowercase() == needle);
        if duplicate {
            self.feedback = Some(Feedback::Error(DUPLICATE_CATEGORY_MSG.to_string()));
            return;
        }

        self.categories.push(CategoryDraft::new(name));
        if matches!(self.feedback, Some(Feedback::Error(_))) {
            self.feedback = None;
        }
    }

    /// Add the pending category name, clearing it on success.
    pub fn add_pending_category(&mut self) {
        let name = std::mem::take(&mut self.pending_category_name);
        let before = self.categories.len();
        self.add_category(&name);
        if self.categories.len() == before {
            // Rejected: keep the text so the user can correct it.
            self.pending_category_name = name;
        }
    }

    /// Remove the category with the given local id, preserving the relative
    /// order of the rest. Removing an absent id is tolerated as a no-op.
    pub fn remove_category(&mut self, local_id: Uuid) {
        self.categories.retain(|c| c.local_id != local_id);
    }

    /// Build the normalized save payload. Pure and idempotent: no state is
    /// mutated and no ids are generated here, so repeated calls over unchanged
    /// state yield equal payloads.
    pub fn build_save_payload(&self) -> Result<SectorSavePayload, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::Validation(NAME_REQUIRED_MSG.to_string()));
        }

        Ok(SectorSavePayload {
            sector_id: self.sector_id,
            name: name.to_string(),
            description: non_empty(&self.description),
            platforms: self.platforms.clone(),
            categories: self
                .categories
                .iter()
                .map(|c| CategorySavePayload { id: c.id, name: c.name.trim().to_string() })
                .collect(),
            prompt_template: non_empty(&self.prompt_template),
        })
    }

    /// Validate, normalize and hand the payload to the injected saver.
    ///
    /// Re-entrant calls while a save is already in flight are ignored. Every
    /// path (validation short-circuit, save success, save failure) restores
    /// `Idle` and leaves explanatory feedback behind.
    pub async fn submit(&mut self, saver: &dyn SectorSaver) {
        if self.status == SaveStatus::Saving {
            tracing::debug!("submit ignored: save already in flight");
            return;
        }

        self.status = SaveStatus::Saving;
        self.feedback = None;

        let payload = match self.build_save_payload() {
            Ok(p) => p,
            Err(e) => {
                self.feedback = Some(Feedback::Error(e.to_string()));
                self.status = SaveStatus::Idle;
                return;
            }
        };

        match saver.save_sector(&payload).await {
            Ok(()) => {
                tracing::info!(sector = %payload.name, "sector saved");
                self.feedback = Some(Feedback::Ok(SAVED_OK_MSG.to_string()));
            }
            Err(e) => {
                tracing::warn!(sector = %payload.name, error = %e, "sector save failed");
                self.feedback = Some(Feedback::Error(
                    DraftError::ExternalSave(e.to_string()).to_string(),
                ));
            }
        }
        self.status = SaveStatus::Idle;
    }
}

/// Trim and normalize optional free text: empty-after-trim means "absent".
fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
