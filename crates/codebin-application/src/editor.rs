//! Editor session use case implementation.
//!
//! This module provides the `EditorService` which orchestrates the editor
//! session state machine: binding and unbinding remote files, autosaving
//! local drafts while unbound, and dispatching save/delete/compile
//! operations while keeping the visible state consistent.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use codebin_core::compile::CompileBackend;
use codebin_core::draft::DraftStore;
use codebin_core::error::{CodebinError, Result};
use codebin_core::file::{CatalogCache, FilePatch, FileStore, NewFile};
use codebin_core::language::Language;
use codebin_core::session::{EditorSession, EditorState};
use tokio::sync::Mutex;

/// Clears the in-progress flag when the operation ends, regardless of
/// how it ends.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Compare-and-set acquisition. Losers fail immediately; there is
    /// no queue of waiting operations.
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CodebinError::busy("another operation"));
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Use case for driving the editor session.
///
/// `EditorService` coordinates between the session aggregate, the remote
/// file store, the local draft store, and the compile backend. All state
/// transitions go through here so that every remote-touching operation is
/// atomic with respect to what the user sees: full success, or the prior
/// state retained with the error surfaced.
///
/// # Responsibilities
///
/// - Applying buffer edits, with draft write-through while unbound
/// - Opening, saving, creating, and deleting remote files
/// - Enforcing the single-in-flight-operation rule (`Busy` errors)
/// - Submitting the current buffer for remote compilation
///
/// # Thread Safety
///
/// The session lives behind an async mutex; the in-progress flag is an
/// `AtomicBool` so conflicting operations are rejected without waiting.
pub struct EditorService {
    file_store: Arc<dyn FileStore>,
    draft_store: Arc<dyn DraftStore>,
    catalog_cache: Arc<dyn CatalogCache>,
    compile_backend: Arc<dyn CompileBackend>,
    session: Arc<Mutex<EditorSession>>,
    busy: AtomicBool,
}

impl EditorService {
    /// Creates a new `EditorService` around an existing session handle.
    ///
    /// The session is shared (e.g. with the access-control service), so
    /// the handle is injected rather than constructed here.
    pub fn new(
        file_store: Arc<dyn FileStore>,
        draft_store: Arc<dyn DraftStore>,
        catalog_cache: Arc<dyn CatalogCache>,
        compile_backend: Arc<dyn CompileBackend>,
        session: Arc<Mutex<EditorSession>>,
    ) -> Self {
        Self {
            file_store,
            draft_store,
            catalog_cache,
            compile_backend,
            session,
            busy: AtomicBool::new(false),
        }
    }

    /// Returns a copy of the current session for rendering.
    pub async fn snapshot(&self) -> EditorSession {
        self.session.lock().await.clone()
    }

    /// Returns the current binding state.
    pub async fn state(&self) -> EditorState {
        self.session.lock().await.state()
    }

    /// Replaces the buffer text.
    ///
    /// While unbound, the draft for the active language is written
    /// through on every call, so the stored draft always equals the
    /// buffer. Edits are never rejected: they proceed even while a
    /// remote operation is in flight, and whoever finishes later wins.
    pub async fn edit(&self, text: String) -> Result<EditorState> {
        let mut session = self.session.lock().await;
        session.buffer = text;

        if !session.is_bound() {
            self.draft_store
                .save_draft(session.language, &session.buffer)
                .await?;
        }

        Ok(session.state())
    }

    /// Opens a remote file and binds the session to it.
    ///
    /// Replaces any current binding. On failure the session keeps its
    /// prior state and the error is surfaced.
    ///
    /// # Returns
    ///
    /// - `Ok(EditorState::BoundClean)`: file fetched and bound
    /// - `Err(NotFound)`: unknown id or no access
    /// - `Err(Validation)`: the file's stored extension is not a
    ///   supported language
    /// - `Err(Busy)`: another operation is in flight
    pub async fn open(&self, id: &str) -> Result<EditorState> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let file = self.file_store.get_file(id).await?;
        let language = file.language().ok_or_else(|| {
            CodebinError::validation(format!("unsupported file extension '{}'", file.extension))
        })?;

        tracing::debug!("[Editor] Opened file {} ({})", file.id, language);
        let mut session = self.session.lock().await;
        session.bind(file, language);
        Ok(session.state())
    }

    /// Saves the buffer to the bound remote file.
    ///
    /// The buffer is captured at dispatch; an edit arriving while the
    /// save is in flight is retained and leaves the session dirty
    /// afterwards. On failure nothing changes and the session stays
    /// dirty.
    pub async fn save(&self) -> Result<EditorState> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (id, code) = {
            let session = self.session.lock().await;
            let file = session
                .binding
                .as_ref()
                .ok_or_else(|| CodebinError::precondition("no file is open"))?;
            (file.id.clone(), session.buffer.clone())
        };

        let updated = self.file_store.update_file(&id, FilePatch::code(code)).await?;

        tracing::debug!("[Editor] Saved file {}", updated.id);
        let mut session = self.session.lock().await;
        session.mark_synced(updated);
        Ok(session.state())
    }

    /// Creates a new remote file from the current unbound buffer and
    /// binds the session to it.
    pub async fn save_as(&self, name: &str) -> Result<EditorState> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (language, code) = {
            let session = self.session.lock().await;
            if session.is_bound() {
                return Err(CodebinError::precondition(
                    "a file is already open; save it or start a new buffer first",
                ));
            }
            (session.language, session.buffer.clone())
        };

        let created = self
            .file_store
            .create_file(NewFile::new(name, language, code))
            .await?;

        tracing::debug!("[Editor] Created file {} as '{}'", created.id, name);
        let mut session = self.session.lock().await;
        session.mark_synced(created);
        Ok(session.state())
    }

    /// Discards the binding (the remote file is untouched) and restores
    /// the unbound draft for the current language.
    ///
    /// # Returns
    ///
    /// `true` when unsaved changes were discarded. Warning the user
    /// before the discard is the caller's policy, via [`Self::snapshot`].
    pub async fn new_buffer(&self) -> Result<bool> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let language = self.session.lock().await.language;
        let draft = self.load_draft_or_warn(language).await;

        let mut session = self.session.lock().await;
        let discarded = session.dirty();
        session.reset(language, draft);
        Ok(discarded)
    }

    /// Deletes the bound remote file, prunes it from the catalog cache,
    /// and returns the session to the unbound draft.
    ///
    /// On remote failure the session keeps its binding.
    pub async fn delete(&self) -> Result<EditorState> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (id, language) = {
            let session = self.session.lock().await;
            let file = session
                .binding
                .as_ref()
                .ok_or_else(|| CodebinError::precondition("no file is open"))?;
            (file.id.clone(), session.language)
        };

        self.file_store.delete_file(&id).await?;
        tracing::debug!("[Editor] Deleted file {}", id);

        // The cache is never authoritative; pruning it is best-effort.
        if let Err(e) = self.catalog_cache.remove(&id).await {
            tracing::warn!("[Editor] Failed to prune catalog cache: {}", e);
        }

        let draft = self.load_draft_or_warn(language).await;
        let mut session = self.session.lock().await;
        session.reset(language, draft);
        Ok(session.state())
    }

    /// Switches the unbound session to another language, restoring that
    /// language's draft (or its starter snippet).
    ///
    /// Once a file is bound its language is fixed by the stored
    /// extension; callers must start a new buffer first.
    pub async fn set_language(&self, language: Language) -> Result<EditorState> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        // Binding can only change under the in-progress flag, so one
        // check here holds until the guard drops.
        if self.session.lock().await.is_bound() {
            return Err(CodebinError::precondition(
                "language is fixed while a file is open",
            ));
        }

        let draft = self.load_draft_or_warn(language).await;
        let mut session = self.session.lock().await;
        session.reset(language, draft);
        Ok(session.state())
    }

    /// Submits the current buffer for remote compilation.
    ///
    /// Holds the in-progress flag for the duration, like any other
    /// remote operation. The returned text is the program output or the
    /// compiler's error listing; both arrive as `Ok`.
    pub async fn compile_current(&self, input: &str) -> Result<String> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (language, code) = {
            let session = self.session.lock().await;
            (session.language, session.buffer.clone())
        };

        tracing::debug!("[Editor] Compiling {} buffer ({} bytes)", language, code.len());
        self.compile_backend.compile(language, &code, input).await
    }

    async fn load_draft_or_warn(&self, language: Language) -> Option<String> {
        match self.draft_store.load_draft(language).await {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!("[Editor] Failed to load draft for {}: {}", language, e);
                None
            }
        }
    }
}
