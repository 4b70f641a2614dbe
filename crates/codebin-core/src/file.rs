//! Remote code file model and store contract.
//!
//! `CodeFile` mirrors the backend's wire representation (camelCase JSON).
//! Instances are owned by the remote store; the client only holds copies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::language::Language;

/// A persisted code file as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    /// Server-assigned opaque identifier.
    pub id: String,
    pub file_name: String,
    /// Stored language tag, e.g. "py" or "cpp".
    pub extension: String,
    #[serde(default)]
    pub code: String,
    pub owner_email: String,
    /// Emails granted access. The owner is always a member; the server
    /// rejects attempts to remove them.
    #[serde(default)]
    pub visible_to_users: Vec<String>,
}

impl CodeFile {
    /// Resolves the stored extension to a supported language, if any.
    pub fn language(&self) -> Option<Language> {
        Language::from_extension(&self.extension)
    }

    pub fn is_owner(&self, email: &str) -> bool {
        self.owner_email == email
    }

    pub fn is_visible_to(&self, email: &str) -> bool {
        self.owner_email == email || self.visible_to_users.iter().any(|u| u == email)
    }
}

/// Payload for creating a new remote file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    pub file_name: String,
    pub extension: String,
    pub code: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub visible_to_users: Vec<String>,
}

impl NewFile {
    pub fn new(
        file_name: impl Into<String>,
        language: Language,
        code: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            extension: language.extension().to_string(),
            code: code.into(),
            visible_to_users: Vec::new(),
        }
    }
}

/// Partial update payload. Only fields present in the JSON body change
/// on the server, so absent fields must not be serialized at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl FilePatch {
    /// A patch that replaces only the code text.
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }
}

/// An abstract client for the remote file collection.
///
/// This trait defines the contract against the backend's file API,
/// decoupling session logic from the HTTP transport. Every operation
/// requires a resolvable caller identity.
///
/// # Implementation Notes
///
/// Implementations must be single-shot: no retries, no client-side
/// timeout beyond the transport default. The server is authoritative for
/// authorization and ownership protection; implementations only translate
/// its responses into the error taxonomy.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Lists every file the caller may view.
    async fn list_visible_files(&self) -> Result<Vec<CodeFile>>;

    /// Fetches a file by id.
    ///
    /// # Returns
    ///
    /// - `Ok(CodeFile)`: the file as stored
    /// - `Err(NotFound)`: unknown id or no access (the server does not
    ///   distinguish the two)
    async fn get_file(&self, id: &str) -> Result<CodeFile>;

    /// Creates a new file; the server assigns the id.
    async fn create_file(&self, new_file: NewFile) -> Result<CodeFile>;

    /// Applies a partial update and returns the updated file.
    async fn update_file(&self, id: &str, patch: FilePatch) -> Result<CodeFile>;

    /// Deletes a file. Deleting an already-absent id yields `NotFound`.
    async fn delete_file(&self, id: &str) -> Result<()>;

    /// Grants `user_email` access and returns the updated file.
    async fn grant_access(&self, id: &str, user_email: &str) -> Result<CodeFile>;

    /// Revokes `user_email`'s access and returns the updated file.
    /// Revoking the owner is rejected by the server.
    async fn revoke_access(&self, id: &str, user_email: &str) -> Result<CodeFile>;
}

/// Local cache of the last file listing.
///
/// Best-effort only: never authoritative, refreshed on every successful
/// list and pruned on delete.
#[async_trait]
pub trait CatalogCache: Send + Sync {
    async fn load(&self) -> Result<Vec<CodeFile>>;

    /// Replaces the cached listing wholesale.
    async fn store(&self, files: &[CodeFile]) -> Result<()>;

    /// Drops one entry by id. Absent ids are ignored.
    async fn remove(&self, id: &str) -> Result<()>;
}
