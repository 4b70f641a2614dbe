//! The editor session aggregate.
//!
//! A session owns the in-memory buffer and, when a remote file is open,
//! a local mirror of that file. Whether the session is dirty is always
//! derived by comparing the buffer against the mirror's stored text,
//! never tracked by counting edits.

use serde::Serialize;

use crate::file::CodeFile;
use crate::language::Language;

/// Derived binding state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditorState {
    /// Editing a fresh or local-draft buffer; no remote file open.
    Unbound,
    /// Buffer matches the last-loaded/saved remote content.
    BoundClean,
    /// Buffer diverges from the last-loaded/saved remote content.
    BoundDirty,
}

impl std::fmt::Display for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unbound => "unbound",
            Self::BoundClean => "bound (clean)",
            Self::BoundDirty => "bound (dirty)",
        };
        f.write_str(label)
    }
}

/// Transient editing state: current language, buffer text, and the
/// optionally bound remote file.
///
/// Constructed once per application instance and passed explicitly to
/// everything that needs it; there is no global session. The bound file's
/// `code` field always holds the last text known to match the remote
/// store, so `dirty == (buffer != binding.code)` by construction.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub language: Language,
    pub buffer: String,
    pub binding: Option<CodeFile>,
}

impl EditorSession {
    /// Starts an unbound session with the language's starter snippet.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            buffer: language.default_snippet().to_string(),
            binding: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Recomputes the dirty flag by comparison. Meaningless while unbound.
    pub fn dirty(&self) -> bool {
        self.binding
            .as_ref()
            .is_some_and(|file| file.code != self.buffer)
    }

    pub fn state(&self) -> EditorState {
        match &self.binding {
            None => EditorState::Unbound,
            Some(file) if file.code == self.buffer => EditorState::BoundClean,
            Some(_) => EditorState::BoundDirty,
        }
    }

    /// Binds the session to a fetched remote file, replacing the buffer
    /// with the file's content. The caller resolves `language` from the
    /// file's extension beforehand.
    pub fn bind(&mut self, file: CodeFile, language: Language) {
        self.buffer = file.code.clone();
        self.language = language;
        self.binding = Some(file);
    }

    /// Replaces the bound-file mirror after a successful save or access
    /// change. The buffer is left untouched so edits made while the
    /// operation was in flight survive.
    pub fn mark_synced(&mut self, file: CodeFile) {
        self.binding = Some(file);
    }

    /// Discards the binding without touching the remote file.
    pub fn unbind(&mut self) {
        self.binding = None;
    }

    /// Resets to an unbound buffer in the given language. `text` takes the
    /// place of the starter snippet when a draft exists.
    pub fn reset(&mut self, language: Language, text: Option<String>) {
        self.language = language;
        self.buffer = text.unwrap_or_else(|| language.default_snippet().to_string());
        self.binding = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_file(code: &str) -> CodeFile {
        CodeFile {
            id: "f1".to_string(),
            file_name: "solution".to_string(),
            extension: "py".to_string(),
            code: code.to_string(),
            owner_email: "alice@example.com".to_string(),
            visible_to_users: vec!["alice@example.com".to_string()],
        }
    }

    #[test]
    fn test_new_session_is_unbound_with_snippet() {
        let session = EditorSession::new(Language::Cpp);
        assert_eq!(session.state(), EditorState::Unbound);
        assert_eq!(session.buffer, Language::Cpp.default_snippet());
        assert!(!session.dirty());
    }

    #[test]
    fn test_bind_is_clean_and_edit_dirties() {
        let mut session = EditorSession::new(Language::Python);
        session.bind(remote_file("print(1)"), Language::Python);
        assert_eq!(session.state(), EditorState::BoundClean);

        session.buffer = "print(2)".to_string();
        assert_eq!(session.state(), EditorState::BoundDirty);
        assert!(session.dirty());
    }

    #[test]
    fn test_restoring_text_returns_to_clean() {
        let mut session = EditorSession::new(Language::Python);
        session.bind(remote_file("print(1)"), Language::Python);

        session.buffer = "print(2)".to_string();
        assert_eq!(session.state(), EditorState::BoundDirty);

        // Equality comparison, not edit counting
        session.buffer = "print(1)".to_string();
        assert_eq!(session.state(), EditorState::BoundClean);
    }

    #[test]
    fn test_mark_synced_keeps_buffer() {
        let mut session = EditorSession::new(Language::Python);
        session.bind(remote_file("print(1)"), Language::Python);
        session.buffer = "print(2)".to_string();

        session.mark_synced(remote_file("print(2)"));
        assert_eq!(session.state(), EditorState::BoundClean);
        assert_eq!(session.buffer, "print(2)");
    }

    #[test]
    fn test_reset_discards_binding() {
        let mut session = EditorSession::new(Language::Python);
        session.bind(remote_file("print(1)"), Language::Python);

        session.reset(Language::Java, None);
        assert_eq!(session.state(), EditorState::Unbound);
        assert_eq!(session.buffer, Language::Java.default_snippet());
        assert_eq!(session.language, Language::Java);
    }
}
