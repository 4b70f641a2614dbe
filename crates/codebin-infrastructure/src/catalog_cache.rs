//! Offline snapshot of the remote file catalog.

use std::path::PathBuf;

use async_trait::async_trait;
use codebin_core::error::Result;
use codebin_core::file::{CatalogCache, CodeFile};

use crate::storage::JsonStore;

/// Stores the last seen file listing so the catalog can still be shown
/// when the backend is unreachable.
pub struct JsonCatalogCache {
    store: JsonStore,
}

impl JsonCatalogCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }
}

#[async_trait]
impl CatalogCache for JsonCatalogCache {
    async fn load(&self) -> Result<Vec<CodeFile>> {
        let files: Option<Vec<CodeFile>> = self.store.load()?;
        Ok(files.unwrap_or_default())
    }

    async fn store(&self, files: &[CodeFile]) -> Result<()> {
        self.store.save(&files)
    }

    async fn remove(&self, file_id: &str) -> Result<()> {
        self.store.update(Vec::<CodeFile>::new(), |files| {
            files.retain(|f| f.id != file_id);
            Ok(())
        })
    }
}
