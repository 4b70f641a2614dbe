//! Per-language local draft storage contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::language::Language;

/// On-device storage for unsaved buffers, keyed by language.
///
/// Drafts substitute for dirty tracking while no remote file is open: the
/// buffer is written through on every edit, so a put must stay cheap. At
/// most one draft per language is retained; the most recent write wins.
/// Draft content never leaves the device.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Returns the stored draft for `language`, if one exists.
    async fn load_draft(&self, language: Language) -> Result<Option<String>>;

    /// Overwrites the draft for `language`.
    async fn save_draft(&self, language: Language, text: &str) -> Result<()>;

    /// Removes the draft for `language`. Absent drafts are ignored.
    async fn clear_draft(&self, language: Language) -> Result<()>;
}
