//! File Lifecycle Controller
//!
//! Owns the file listing and the editor state, and keeps both consistent with
//! the cluster across create/read/write/append/delete.
//!
//! ## Responsibilities
//! - **Single flight**: A busy flag admits one network operation at a time;
//!   a call made while another is in flight is rejected with `Busy`.
//! - **Reconciliation**: After each successful round trip the local state is
//!   updated the way the cluster would now report it (listing refreshed after
//!   create/delete, buffer re-read after append).
//! - **Error funnel**: Every failure ends up in the single `error` field,
//!   replacing whatever was there.

use super::types::*;
use crate::client::store::RemoteStore;
use crate::client::types::{FileName, StoreError};

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct FileController {
    store: Arc<dyn RemoteStore>,
    files: RwLock<Vec<FileName>>,
    editor: RwLock<EditorState>,
    loading: AtomicBool,
}

/// Clears the busy flag when the operation finishes or its future is dropped.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl FileController {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            files: RwLock::new(Vec::new()),
            editor: RwLock::new(EditorState::default()),
            loading: AtomicBool::new(false),
        }
    }

    /// The listing as of the last successful refresh.
    pub fn files(&self) -> Vec<FileName> {
        self.files.read().clone()
    }

    pub fn editor(&self) -> EditorState {
        let mut state = self.editor.read().clone();
        state.loading = self.is_loading();
        state
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<BusyGuard<'_>, ControllerError> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                tracing::debug!("Rejected operation while another is in flight");
                ControllerError::Busy
            })?;
        Ok(BusyGuard {
            flag: &self.loading,
        })
    }

    fn clear_error(&self) {
        self.editor.write().error = None;
    }

    fn record_failure(&self, context: String, error: StoreError) -> ControllerError {
        tracing::warn!("{}: {}", context, error);
        self.editor.write().error = Some(format!("{}: {}", context, error));
        ControllerError::Store(error)
    }

    fn reject(&self, message: &str) -> ControllerError {
        self.editor.write().error = Some(message.to_string());
        ControllerError::Invalid(message.to_string())
    }

    /// Replaces the listing wholesale. On failure the previous listing is kept.
    pub async fn refresh_list(&self) -> Result<(), ControllerError> {
        let _busy = self.begin()?;
        self.clear_error();
        self.reload_files().await
    }

    async fn reload_files(&self) -> Result<(), ControllerError> {
        match self.store.list_files().await {
            Ok(files) => {
                tracing::debug!("File listing refreshed ({} files)", files.len());
                *self.files.write() = files;
                Ok(())
            }
            Err(e) => Err(self.record_failure("Failed to list files".to_string(), e)),
        }
    }

    /// Loads a file into the editor.
    ///
    /// If the read fails, the selection is cleared with the content so the
    /// editor never shows a file it could not read.
    pub async fn select(&self, name: impl Into<FileName>) -> Result<(), ControllerError> {
        let name = name.into();
        let _busy = self.begin()?;
        self.clear_error();
        self.load(&name).await
    }

    async fn load(&self, name: &FileName) -> Result<(), ControllerError> {
        match self.store.read_file(name).await {
            Ok(content) => {
                let mut editor = self.editor.write();
                editor.selected_file = Some(name.clone());
                editor.content = content.text;
                editor.partial = content.partial;
                editor.dirty = false;
                Ok(())
            }
            Err(e) => {
                {
                    let mut editor = self.editor.write();
                    editor.selected_file = None;
                    editor.content.clear();
                    editor.partial = false;
                    editor.dirty = false;
                }
                Err(self.record_failure(format!("Failed to read {}", name), e))
            }
        }
    }

    /// Creates a file, refreshes the listing and selects the new file with the
    /// given content. The content is not read back.
    pub async fn create(
        &self,
        name: impl Into<FileName>,
        content: &str,
    ) -> Result<(), ControllerError> {
        let _busy = self.begin()?;
        let name = FileName(name.into().0.trim().to_string());
        if name.as_str().is_empty() {
            return Err(self.reject("File name is required"));
        }
        self.clear_error();

        if let Err(e) = self.store.create_file(&name, content).await {
            return Err(self.record_failure(format!("Failed to create {}", name), e));
        }
        tracing::info!("Created {} ({} bytes)", name, content.len());

        // The file exists even if the listing cannot be refreshed; the listing
        // failure stays in `error`.
        let _ = self.reload_files().await;

        let mut editor = self.editor.write();
        editor.selected_file = Some(name);
        editor.content = content.to_string();
        editor.partial = false;
        editor.dirty = false;
        Ok(())
    }

    /// Overwrites the whole file. The listing is not touched.
    pub async fn write(
        &self,
        name: impl Into<FileName>,
        content: &str,
    ) -> Result<(), ControllerError> {
        let name = name.into();
        let _busy = self.begin()?;
        self.clear_error();

        if let Err(e) = self.store.write_file(&name, content).await {
            return Err(self.record_failure(format!("Failed to write {}", name), e));
        }
        tracing::info!("Wrote {} ({} bytes)", name, content.len());

        let mut editor = self.editor.write();
        if editor.selected_file.as_ref() == Some(&name) {
            editor.content = content.to_string();
            editor.partial = false;
            editor.dirty = false;
        }
        Ok(())
    }

    /// Appends on the server, then re-reads the file so the buffer holds the
    /// cluster's post-append content rather than a local concatenation.
    pub async fn append(&self, name: impl Into<FileName>, text: &str) -> Result<(), ControllerError> {
        let _busy = self.begin()?;
        let name = name.into();
        if text.trim().is_empty() {
            return Err(self.reject("Nothing to append"));
        }
        self.clear_error();

        if let Err(e) = self.store.append_file(&name, text).await {
            return Err(self.record_failure(format!("Failed to append to {}", name), e));
        }
        tracing::info!("Appended {} bytes to {}", text.len(), name);

        self.load(&name).await
    }

    /// Deletes a file once `confirmation` agrees, then refreshes the listing.
    ///
    /// The editor is only touched when the deleted file is the selected one.
    /// Nobody is asked to confirm while another operation is in flight.
    pub async fn delete(
        &self,
        name: impl Into<FileName>,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<(), ControllerError> {
        let _busy = self.begin()?;
        let name = name.into();
        if !confirmation.confirm_delete(&name) {
            tracing::debug!("Delete of {} not confirmed", name);
            return Err(ControllerError::Declined);
        }

        if let Err(e) = self.store.delete_file(&name).await {
            return Err(self.record_failure(format!("Failed to delete {}", name), e));
        }
        tracing::info!("Deleted {}", name);

        {
            let mut editor = self.editor.write();
            if editor.selected_file.as_ref() == Some(&name) {
                editor.selected_file = None;
                editor.content.clear();
                editor.partial = false;
                editor.dirty = false;
                editor.error = None;
            }
        }

        self.reload_files().await
    }

    /// Presents a blank creation form. The listing is not touched.
    ///
    /// Refused while a load is in flight, since the load would land on top of
    /// the blank form.
    pub fn start_new_file(&self) -> Result<(), ControllerError> {
        let _busy = self.begin()?;
        let mut editor = self.editor.write();
        editor.selected_file = None;
        editor.content.clear();
        editor.partial = false;
        editor.dirty = false;
        editor.error = None;
        Ok(())
    }

    /// Records a local, unsaved edit of the buffer. Refused while an
    /// operation is in flight.
    pub fn edit_content(&self, content: impl Into<String>) -> Result<(), ControllerError> {
        let _busy = self.begin()?;
        let mut editor = self.editor.write();
        editor.content = content.into();
        editor.dirty = true;
        Ok(())
    }
}
