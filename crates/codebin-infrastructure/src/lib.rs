pub mod catalog_cache;
pub mod chat_repository;
pub mod config_service;
pub mod credentials;
pub mod draft_repository;
pub mod http;
pub mod paths;
pub mod storage;

pub use crate::catalog_cache::JsonCatalogCache;
pub use crate::chat_repository::JsonChatRepository;
pub use crate::config_service::{AppConfig, ConfigService};
pub use crate::credentials::{CredentialsStore, StoredCredentials};
pub use crate::draft_repository::JsonDraftRepository;
pub use crate::http::{GenerativeApiClient, HttpCompileClient, HttpFileStore};
pub use crate::paths::CodebinPaths;
