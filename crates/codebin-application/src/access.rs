//! Sharing-list edits for the currently open file.

use std::sync::Arc;

use codebin_core::error::{CodebinError, Result};
use codebin_core::file::{CodeFile, FileStore};
use codebin_core::session::EditorSession;
use tokio::sync::Mutex;

/// Use case for editing who can see the bound file.
///
/// The server is the source of truth for authorization and owner
/// protection; this service only dispatches the change and refreshes
/// the session's bound-file mirror from the server's answer. Buffer
/// text is never touched, so unsaved edits survive an access change.
pub struct AccessControlService {
    file_store: Arc<dyn FileStore>,
    session: Arc<Mutex<EditorSession>>,
}

impl AccessControlService {
    pub fn new(file_store: Arc<dyn FileStore>, session: Arc<Mutex<EditorSession>>) -> Self {
        Self {
            file_store,
            session,
        }
    }

    /// Grants `email` access to the bound file.
    ///
    /// # Returns
    ///
    /// - `Ok(CodeFile)`: the refreshed file, including the new viewer
    /// - `Err(Precondition)`: no file is bound
    /// - `Err(Validation)`: `email` is empty
    pub async fn add_viewer(&self, email: &str) -> Result<CodeFile> {
        let id = self.bound_file_id().await?;
        let email = normalized(email)?;

        let updated = self.file_store.grant_access(&id, email).await?;
        tracing::debug!("[Access] Granted {} access to {}", email, id);

        self.session.lock().await.mark_synced(updated.clone());
        Ok(updated)
    }

    /// Revokes `email`'s access to the bound file.
    ///
    /// Revoking the owner is rejected by the server; the resulting
    /// error is passed through unchanged.
    pub async fn remove_viewer(&self, email: &str) -> Result<CodeFile> {
        let id = self.bound_file_id().await?;
        let email = normalized(email)?;

        let updated = self.file_store.revoke_access(&id, email).await?;
        tracing::debug!("[Access] Revoked {} access to {}", email, id);

        self.session.lock().await.mark_synced(updated.clone());
        Ok(updated)
    }

    async fn bound_file_id(&self) -> Result<String> {
        let session = self.session.lock().await;
        session
            .binding
            .as_ref()
            .map(|file| file.id.clone())
            .ok_or_else(|| CodebinError::precondition("no file is open"))
    }
}

fn normalized(email: &str) -> Result<&str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(CodebinError::validation("email must not be empty"));
    }
    Ok(email)
}
