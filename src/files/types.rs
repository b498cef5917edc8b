use crate::client::types::{FileName, StoreError};
use serde::Serialize;

/// What the editor view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditorState {
    /// At most one file is selected at a time.
    pub selected_file: Option<FileName>,
    /// Holds unsaved edits; it is not derived from the file listing.
    pub content: String,
    /// Set by local edits, cleared when the buffer is loaded from or written to the cluster.
    pub dirty: bool,
    /// The last load was only partially assembled by the cluster.
    pub partial: bool,
    pub loading: bool,
    /// Only the most recent failure is kept.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// Another operation is still in flight.
    #[error("another operation is in progress")]
    Busy,

    #[error("deletion was not confirmed")]
    Declined,

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Guard consulted before a delete is dispatched.
pub trait DeleteConfirmation: Send + Sync {
    fn confirm_delete(&self, name: &FileName) -> bool;
}

impl<F> DeleteConfirmation for F
where
    F: Fn(&FileName) -> bool + Send + Sync,
{
    fn confirm_delete(&self, name: &FileName) -> bool {
        self(name)
    }
}

/// Confirms every delete, for non-interactive use.
pub struct AssumeYes;

impl DeleteConfirmation for AssumeYes {
    fn confirm_delete(&self, _name: &FileName) -> bool {
        true
    }
}
