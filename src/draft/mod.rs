// Draft editor model for sectors and their categories.
//
// Everything in here is plain in-memory state with no database or HTTP
// dependency. The only seam to the outside world is the `SectorSaver`
// trait, injected into `SectorDraft::submit`.

pub mod editor;
pub mod error;
pub mod payload;

pub use editor::{CategoryDraft, CategorySeed, Feedback, SaveStatus, SectorDraft, SectorSeed};
pub use error::DraftError;
pub use payload::{CategorySavePayload, SaveError, SectorSavePayload, SectorSaver};
