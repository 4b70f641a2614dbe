//! Remote compilation contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::language::Language;

/// Client for the backend compile endpoint.
///
/// The backend compiles and runs the submitted code server-side and
/// answers with plain text: either the program's output or compiler
/// error text. A failed compilation is still a successful call; the
/// failure shows up in the returned text, not as an `Err`.
#[async_trait]
pub trait CompileBackend: Send + Sync {
    /// Submits `code` with the given stdin `input` for compilation.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: program output or compiler error text
    /// - `Err(Validation)`: `language` has no compile route
    /// - `Err(Network)`/`Err(Server)`: transport or HTTP failure
    async fn compile(&self, language: Language, code: &str, input: &str) -> Result<String>;
}
