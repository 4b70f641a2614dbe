//! In-memory fakes of the port traits, shared by the service tests.
//!
//! The file store fake mirrors the backend's observable rules (owner
//! always retains access, deleting twice reports not-found) so tests
//! against it exercise the same contract the HTTP client translates.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use codebin_core::chat::{Chat, ChatStore};
use codebin_core::compile::CompileBackend;
use codebin_core::draft::DraftStore;
use codebin_core::error::{CodebinError, Result};
use codebin_core::file::{CatalogCache, CodeFile, FilePatch, FileStore, NewFile};
use codebin_core::generative::GenerativeBackend;
use codebin_core::language::Language;

pub(crate) struct InMemoryFileStore {
    owner: String,
    files: Mutex<HashMap<String, CodeFile>>,
    next_id: AtomicUsize,
    fail_next: Mutex<Option<&'static str>>,
}

impl InMemoryFileStore {
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            files: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            fail_next: Mutex::new(None),
        }
    }

    /// Seeds a file without going through `create_file`.
    pub fn insert(&self, file: CodeFile) {
        self.files.lock().unwrap().insert(file.id.clone(), file);
    }

    /// Returns the stored file, if any.
    pub fn get(&self, id: &str) -> Option<CodeFile> {
        self.files.lock().unwrap().get(id).cloned()
    }

    /// Makes the next call of the named operation fail with a server
    /// error. Operation names: "list", "get", "create", "update",
    /// "delete", "grant", "revoke".
    pub fn fail_next(&self, operation: &'static str) {
        *self.fail_next.lock().unwrap() = Some(operation);
    }

    fn take_failure(&self, operation: &str) -> Result<()> {
        let mut slot = self.fail_next.lock().unwrap();
        if *slot == Some(operation) {
            *slot = None;
            return Err(CodebinError::server(500, "simulated server failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn list_visible_files(&self) -> Result<Vec<CodeFile>> {
        self.take_failure("list")?;
        let mut files: Vec<CodeFile> = self.files.lock().unwrap().values().cloned().collect();
        files.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(files)
    }

    async fn get_file(&self, id: &str) -> Result<CodeFile> {
        self.take_failure("get")?;
        self.get(id)
            .ok_or_else(|| CodebinError::not_found("file", id))
    }

    async fn create_file(&self, new_file: NewFile) -> Result<CodeFile> {
        self.take_failure("create")?;
        if new_file.file_name.is_empty() {
            return Err(CodebinError::validation("file name must not be empty"));
        }

        let id = format!("f{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut visible_to_users = vec![self.owner.clone()];
        for email in new_file.visible_to_users {
            if !visible_to_users.contains(&email) {
                visible_to_users.push(email);
            }
        }

        let file = CodeFile {
            id: id.clone(),
            file_name: new_file.file_name,
            extension: new_file.extension,
            code: new_file.code,
            owner_email: self.owner.clone(),
            visible_to_users,
        };
        self.files.lock().unwrap().insert(id, file.clone());
        Ok(file)
    }

    async fn update_file(&self, id: &str, patch: FilePatch) -> Result<CodeFile> {
        self.take_failure("update")?;
        let mut files = self.files.lock().unwrap();
        let file = files
            .get_mut(id)
            .ok_or_else(|| CodebinError::not_found("file", id))?;

        if let Some(file_name) = patch.file_name {
            file.file_name = file_name;
        }
        if let Some(extension) = patch.extension {
            file.extension = extension;
        }
        if let Some(code) = patch.code {
            file.code = code;
        }
        Ok(file.clone())
    }

    async fn delete_file(&self, id: &str) -> Result<()> {
        self.take_failure("delete")?;
        self.files
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CodebinError::not_found("file", id))
    }

    async fn grant_access(&self, id: &str, user_email: &str) -> Result<CodeFile> {
        self.take_failure("grant")?;
        let mut files = self.files.lock().unwrap();
        let file = files
            .get_mut(id)
            .ok_or_else(|| CodebinError::not_found("file", id))?;

        if !file.visible_to_users.iter().any(|u| u == user_email) {
            file.visible_to_users.push(user_email.to_string());
        }
        Ok(file.clone())
    }

    async fn revoke_access(&self, id: &str, user_email: &str) -> Result<CodeFile> {
        self.take_failure("revoke")?;
        let mut files = self.files.lock().unwrap();
        let file = files
            .get_mut(id)
            .ok_or_else(|| CodebinError::not_found("file", id))?;

        if file.owner_email == user_email {
            return Err(CodebinError::validation(
                "the owner's access cannot be revoked",
            ));
        }
        file.visible_to_users.retain(|u| u != user_email);
        Ok(file.clone())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryDraftStore {
    drafts: Mutex<HashMap<Language, String>>,
}

impl InMemoryDraftStore {
    pub fn get(&self, language: Language) -> Option<String> {
        self.drafts.lock().unwrap().get(&language).cloned()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn load_draft(&self, language: Language) -> Result<Option<String>> {
        Ok(self.get(language))
    }

    async fn save_draft(&self, language: Language, text: &str) -> Result<()> {
        self.drafts
            .lock()
            .unwrap()
            .insert(language, text.to_string());
        Ok(())
    }

    async fn clear_draft(&self, language: Language) -> Result<()> {
        self.drafts.lock().unwrap().remove(&language);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryCatalogCache {
    files: Mutex<Vec<CodeFile>>,
}

impl InMemoryCatalogCache {
    pub fn seed(&self, files: Vec<CodeFile>) {
        *self.files.lock().unwrap() = files;
    }

    pub fn snapshot(&self) -> Vec<CodeFile> {
        self.files.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogCache for InMemoryCatalogCache {
    async fn load(&self) -> Result<Vec<CodeFile>> {
        Ok(self.snapshot())
    }

    async fn store(&self, files: &[CodeFile]) -> Result<()> {
        *self.files.lock().unwrap() = files.to_vec();
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.files.lock().unwrap().retain(|f| f.id != id);
        Ok(())
    }
}

/// Compile backend that records the last request and answers with a
/// fixed output.
pub(crate) struct RecordingCompileBackend {
    output: String,
    last: Mutex<Option<(Language, String, String)>>,
}

impl RecordingCompileBackend {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            last: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<(Language, String, String)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompileBackend for RecordingCompileBackend {
    async fn compile(&self, language: Language, code: &str, input: &str) -> Result<String> {
        if language.compile_route().is_none() {
            return Err(CodebinError::validation(format!(
                "{} cannot be compiled remotely",
                language
            )));
        }
        *self.last.lock().unwrap() = Some((language, code.to_string(), input.to_string()));
        Ok(self.output.clone())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryChatStore {
    chats: Mutex<Vec<Chat>>,
}

impl InMemoryChatStore {
    pub fn snapshot(&self) -> Vec<Chat> {
        self.chats.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn load_all(&self) -> Result<Vec<Chat>> {
        Ok(self.snapshot())
    }

    async fn save_all(&self, chats: &[Chat]) -> Result<()> {
        *self.chats.lock().unwrap() = chats.to_vec();
        Ok(())
    }
}

/// Generative backend whose reply is computed from the prompt, so
/// fan-out tests stay deterministic regardless of polling order.
pub(crate) struct ScriptedGenerativeBackend {
    reply_fn: Box<dyn Fn(&str) -> Result<String> + Send + Sync>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerativeBackend {
    pub fn new(reply_fn: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            reply_fn: Box::new(reply_fn),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedGenerativeBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.reply_fn)(prompt)
    }
}
