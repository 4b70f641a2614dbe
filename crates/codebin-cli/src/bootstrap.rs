//! Wires the service graph every command runs against.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;

use codebin_application::{
    AccessControlService, CatalogService, ChatService, ConverterService, EditorService,
};
use codebin_core::auth::{AuthEvent, AuthWatcher};
use codebin_core::draft::DraftStore;
use codebin_core::language::Language;
use codebin_core::session::EditorSession;
use codebin_infrastructure::{
    AppConfig, CodebinPaths, ConfigService, CredentialsStore, GenerativeApiClient,
    HttpCompileClient, HttpFileStore, JsonCatalogCache, JsonChatRepository, JsonDraftRepository,
};

/// The assembled application: configuration, identity, and the
/// use-case services, sharing one editor session.
///
/// Conversion and chat are built on demand because they need a
/// generative API key most commands never touch.
pub struct App {
    pub config: AppConfig,
    pub auth: Arc<AuthWatcher>,
    pub editor: EditorService,
    pub access: AccessControlService,
    pub catalog: CatalogService,
    pub draft_store: Arc<dyn DraftStore>,
    generative_key: Option<String>,
}

impl App {
    fn generative_backend(&self) -> Result<Arc<GenerativeApiClient>> {
        let key = self
            .generative_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .context(
                "No generative API key configured. Run `codebin login --generative-key <key>`.",
            )?;
        Ok(Arc::new(GenerativeApiClient::new(
            key,
            &self.config.generative_model,
        )))
    }

    pub fn converter(&self) -> Result<ConverterService> {
        Ok(ConverterService::new(self.generative_backend()?))
    }

    pub async fn chat_service(&self) -> Result<ChatService> {
        let store = Arc::new(JsonChatRepository::new(CodebinPaths::chats_file()?));
        Ok(ChatService::new(self.generative_backend()?, store).await)
    }
}

/// Builds the full graph from local configuration and credentials.
///
/// Signing in happens after the auth logger subscribes, so the startup
/// identity shows up in the event log like any later change would.
pub fn bootstrap() -> Result<App> {
    let config_service = ConfigService::new(CodebinPaths::config_file()?);
    let config = config_service.get_config();

    let credentials_store = CredentialsStore::new(CodebinPaths::credentials_file()?);
    credentials_store
        .ensure_template()
        .context("Failed to prepare the credentials file")?;
    let credentials = credentials_store.load()?.unwrap_or_default();

    let auth = Arc::new(AuthWatcher::new(None));
    spawn_auth_logger(&auth);
    let identity = credentials
        .identity()
        .context("Not signed in. Run `codebin login` first.")?;
    auth.sign_in(identity);

    let file_store = Arc::new(HttpFileStore::new(&config.backend_url, Arc::clone(&auth)));
    let compile_backend = Arc::new(HttpCompileClient::new(&config.backend_url, Arc::clone(&auth)));
    let draft_store: Arc<dyn DraftStore> =
        Arc::new(JsonDraftRepository::new(CodebinPaths::drafts_file()?));
    let catalog_cache = Arc::new(JsonCatalogCache::new(CodebinPaths::catalog_file()?));

    let session = Arc::new(Mutex::new(EditorSession::new(Language::Python)));

    let editor = EditorService::new(
        file_store.clone(),
        draft_store.clone(),
        catalog_cache.clone(),
        compile_backend,
        Arc::clone(&session),
    );
    let access = AccessControlService::new(file_store.clone(), Arc::clone(&session));
    let catalog = CatalogService::new(file_store, catalog_cache);

    tracing::debug!("[Bootstrap] Services wired against {}", config.backend_url);

    Ok(App {
        generative_key: credentials.generative_api_key,
        config,
        auth,
        editor,
        access,
        catalog,
        draft_store,
    })
}

/// Logs identity changes for the lifetime of the process. The
/// subscription ends on its own when the watcher is dropped.
fn spawn_auth_logger(auth: &Arc<AuthWatcher>) {
    let mut subscription = auth.subscribe();
    tokio::spawn(async move {
        while let Some(event) = subscription.next_event().await {
            match event {
                AuthEvent::SignedIn(identity) => {
                    tracing::info!("[Auth] Signed in as {}", identity.email);
                }
                AuthEvent::SignedOut => tracing::info!("[Auth] Signed out"),
            }
        }
    });
}
