//! File catalog operations outside the editor session.
//!
//! These back the non-interactive CLI commands: they target files by id
//! directly and never touch the session aggregate.

use std::sync::Arc;

use codebin_core::error::Result;
use codebin_core::file::{CatalogCache, CodeFile, FileStore, NewFile};
use codebin_core::language::Language;

/// A file listing, with its provenance.
#[derive(Debug, Clone)]
pub struct CatalogListing {
    pub files: Vec<CodeFile>,
    /// True when the backend was unreachable and the listing came from
    /// the local cache instead.
    pub from_cache: bool,
}

/// Use case for browsing and mutating the remote file collection.
///
/// Every successful listing refreshes the local catalog cache; when the
/// backend cannot be reached the last cached listing is served instead,
/// clearly marked as such. The cache is never authoritative.
pub struct CatalogService {
    file_store: Arc<dyn FileStore>,
    cache: Arc<dyn CatalogCache>,
}

impl CatalogService {
    pub fn new(file_store: Arc<dyn FileStore>, cache: Arc<dyn CatalogCache>) -> Self {
        Self { file_store, cache }
    }

    /// Lists every file visible to the caller.
    ///
    /// Transport failures fall back to the cached listing; auth and
    /// server errors propagate, since stale data would mask them.
    pub async fn list(&self) -> Result<CatalogListing> {
        match self.file_store.list_visible_files().await {
            Ok(files) => {
                if let Err(e) = self.cache.store(&files).await {
                    tracing::warn!("[Catalog] Failed to refresh cache: {}", e);
                }
                Ok(CatalogListing {
                    files,
                    from_cache: false,
                })
            }
            Err(e) if e.is_network() => {
                tracing::warn!("[Catalog] Backend unreachable, serving cached listing: {}", e);
                let files = self.cache.load().await?;
                Ok(CatalogListing {
                    files,
                    from_cache: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, id: &str) -> Result<CodeFile> {
        self.file_store.get_file(id).await
    }

    /// Creates a file from the given code text.
    pub async fn create(&self, name: &str, language: Language, code: &str) -> Result<CodeFile> {
        let created = self
            .file_store
            .create_file(NewFile::new(name, language, code))
            .await?;
        tracing::debug!("[Catalog] Created file {} as '{}'", created.id, name);
        Ok(created)
    }

    /// Deletes a file by id and prunes it from the cache.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.file_store.delete_file(id).await?;
        tracing::debug!("[Catalog] Deleted file {}", id);

        if let Err(e) = self.cache.remove(id).await {
            tracing::warn!("[Catalog] Failed to prune cache: {}", e);
        }
        Ok(())
    }

    pub async fn share(&self, id: &str, email: &str) -> Result<CodeFile> {
        self.file_store.grant_access(id, email).await
    }

    pub async fn revoke(&self, id: &str, email: &str) -> Result<CodeFile> {
        self.file_store.revoke_access(id, email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryCatalogCache, InMemoryFileStore};
    use async_trait::async_trait;
    use codebin_core::error::CodebinError;
    use codebin_core::file::FilePatch;

    fn sample(id: &str) -> CodeFile {
        CodeFile {
            id: id.to_string(),
            file_name: format!("{}.py", id),
            extension: "py".to_string(),
            code: "print(1)".to_string(),
            owner_email: "alice@example.com".to_string(),
            visible_to_users: vec!["alice@example.com".to_string()],
        }
    }

    #[tokio::test]
    async fn test_list_refreshes_cache() {
        let store = Arc::new(InMemoryFileStore::new("alice@example.com"));
        store.insert(sample("f1"));
        let cache = Arc::new(InMemoryCatalogCache::default());
        let service = CatalogService::new(store, cache.clone());

        let listing = service.list().await.unwrap();
        assert!(!listing.from_cache);
        assert_eq!(listing.files.len(), 1);
        assert_eq!(cache.snapshot().len(), 1);
    }

    /// Always unreachable, like a backend with no route to it.
    struct OfflineFileStore;

    #[async_trait]
    impl FileStore for OfflineFileStore {
        async fn list_visible_files(&self) -> Result<Vec<CodeFile>> {
            Err(CodebinError::network("connection refused"))
        }
        async fn get_file(&self, _id: &str) -> Result<CodeFile> {
            Err(CodebinError::network("connection refused"))
        }
        async fn create_file(&self, _new_file: NewFile) -> Result<CodeFile> {
            Err(CodebinError::network("connection refused"))
        }
        async fn update_file(&self, _id: &str, _patch: FilePatch) -> Result<CodeFile> {
            Err(CodebinError::network("connection refused"))
        }
        async fn delete_file(&self, _id: &str) -> Result<()> {
            Err(CodebinError::network("connection refused"))
        }
        async fn grant_access(&self, _id: &str, _email: &str) -> Result<CodeFile> {
            Err(CodebinError::network("connection refused"))
        }
        async fn revoke_access(&self, _id: &str, _email: &str) -> Result<CodeFile> {
            Err(CodebinError::network("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_list_falls_back_to_cache_when_offline() {
        let cache = Arc::new(InMemoryCatalogCache::default());
        cache.seed(vec![sample("f1"), sample("f2")]);
        let service = CatalogService::new(Arc::new(OfflineFileStore), cache);

        let listing = service.list().await.unwrap();
        assert!(listing.from_cache);
        assert_eq!(listing.files.len(), 2);
    }

    #[tokio::test]
    async fn test_list_server_error_propagates() {
        let store = Arc::new(InMemoryFileStore::new("alice@example.com"));
        store.fail_next("list");
        let service = CatalogService::new(store, Arc::new(InMemoryCatalogCache::default()));

        // A server-side failure must not be papered over with stale data.
        assert!(service.list().await.is_err());
    }

    #[tokio::test]
    async fn test_delete_prunes_cache() {
        let store = Arc::new(InMemoryFileStore::new("alice@example.com"));
        store.insert(sample("f1"));
        let cache = Arc::new(InMemoryCatalogCache::default());
        cache.seed(vec![sample("f1")]);
        let service = CatalogService::new(store, cache.clone());

        service.delete("f1").await.unwrap();
        assert!(cache.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let store = Arc::new(InMemoryFileStore::new("alice@example.com"));
        let service = CatalogService::new(store, Arc::new(InMemoryCatalogCache::default()));

        let created = service
            .create("demo", Language::Python, "print('hi')")
            .await
            .unwrap();
        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched.code, "print('hi')");
        assert_eq!(fetched.extension, "py");
    }
}
