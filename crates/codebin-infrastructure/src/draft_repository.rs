//! JSON-backed draft storage.
//!
//! All drafts live in one small document keyed by language tag, so a
//! put is a load-modify-rewrite of a file that stays a few kilobytes.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use codebin_core::draft::DraftStore;
use codebin_core::error::Result;
use codebin_core::language::Language;

use crate::storage::JsonStore;

type DraftMap = HashMap<Language, String>;

/// On-device draft store for unbound buffers.
pub struct JsonDraftRepository {
    store: JsonStore,
}

impl JsonDraftRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }
}

#[async_trait]
impl DraftStore for JsonDraftRepository {
    async fn load_draft(&self, language: Language) -> Result<Option<String>> {
        let drafts: Option<DraftMap> = self.store.load()?;
        Ok(drafts.and_then(|mut map| map.remove(&language)))
    }

    async fn save_draft(&self, language: Language, text: &str) -> Result<()> {
        self.store.update(DraftMap::new(), |drafts| {
            drafts.insert(language, text.to_string());
            Ok(())
        })
    }

    async fn clear_draft(&self, language: Language) -> Result<()> {
        self.store.update(DraftMap::new(), |drafts| {
            drafts.remove(&language);
            Ok(())
        })
    }
}
