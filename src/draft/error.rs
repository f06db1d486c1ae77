use thiserror::Error;

/// Errors raised by the draft editor. Both kinds are recoverable: the draft
/// always returns to an editable state with user-facing feedback text.
#[derive(Debug, Error)]
pub enum DraftError {
    /// A required field is empty after trimming, or a category name collides
    /// case-insensitively with an existing one. Never reaches the saver.
    #[error("{0}")]
    Validation(String),

    /// The injected saver reported a failure. The cause is not inspected
    /// beyond its message.
    #[error("save failed: {0}")]
    ExternalSave(String),
}
