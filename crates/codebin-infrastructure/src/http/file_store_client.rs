//! HTTP implementation of the remote file store.
//!
//! Every call resolves the caller identity first and sends the bearer
//! token plus the `User-Email` header the backend keys access on. Calls
//! are single-shot: no retries, no client-side timeout beyond the
//! transport default.

use std::sync::Arc;

use async_trait::async_trait;
use codebin_core::auth::{AuthWatcher, Identity};
use codebin_core::error::{CodebinError, Result};
use codebin_core::file::{CodeFile, FilePatch, FileStore, NewFile};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::map_response_error;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessRequest<'a> {
    user_email: &'a str,
}

/// Remote file store backed by the backend's `/api/files` collection.
pub struct HttpFileStore {
    client: Client,
    base_url: String,
    auth: Arc<AuthWatcher>,
}

impl HttpFileStore {
    pub fn new(base_url: impl Into<String>, auth: Arc<AuthWatcher>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn identity(&self) -> Result<Identity> {
        self.auth
            .current()
            .ok_or_else(|| CodebinError::auth("no signed-in user"))
    }

    /// Builds a request with the auth headers the backend requires on
    /// every file-store call.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let identity = self.identity()?;
        Ok(self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&identity.token)
            .header("User-Email", &identity.email))
    }

    async fn parse_json<T: DeserializeOwned>(
        response: Response,
        file_id: Option<&str>,
    ) -> Result<T> {
        let response = Self::check_status(response, file_id).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: Response, file_id: Option<&str>) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        Err(map_response_error(status, body, file_id))
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn list_visible_files(&self) -> Result<Vec<CodeFile>> {
        let response = self.request(Method::GET, "/api/files")?.send().await?;
        Self::parse_json(response, None).await
    }

    async fn get_file(&self, id: &str) -> Result<CodeFile> {
        let response = self
            .request(Method::GET, &format!("/api/files/{}", id))?
            .send()
            .await?;
        Self::parse_json(response, Some(id)).await
    }

    async fn create_file(&self, new_file: NewFile) -> Result<CodeFile> {
        if new_file.file_name.trim().is_empty() {
            return Err(CodebinError::validation("file name must not be empty"));
        }

        tracing::debug!("[FileStore] Creating file '{}'", new_file.file_name);
        let response = self
            .request(Method::POST, "/api/files")?
            .json(&new_file)
            .send()
            .await?;
        Self::parse_json(response, None).await
    }

    async fn update_file(&self, id: &str, patch: FilePatch) -> Result<CodeFile> {
        let response = self
            .request(Method::PUT, &format!("/api/files/{}", id))?
            .json(&patch)
            .send()
            .await?;
        Self::parse_json(response, Some(id)).await
    }

    async fn delete_file(&self, id: &str) -> Result<()> {
        tracing::debug!("[FileStore] Deleting file '{}'", id);
        let response = self
            .request(Method::DELETE, &format!("/api/files/{}", id))?
            .send()
            .await?;
        // The backend answers with a bare success marker, not JSON
        Self::check_status(response, Some(id)).await.map(|_| ())
    }

    async fn grant_access(&self, id: &str, user_email: &str) -> Result<CodeFile> {
        let response = self
            .request(Method::POST, &format!("/api/files/{}/access", id))?
            .json(&AccessRequest { user_email })
            .send()
            .await?;
        Self::parse_json(response, Some(id)).await
    }

    async fn revoke_access(&self, id: &str, user_email: &str) -> Result<CodeFile> {
        let response = self
            .request(Method::DELETE, &format!("/api/files/{}/access", id))?
            .json(&AccessRequest { user_email })
            .send()
            .await?;
        Self::parse_json(response, Some(id)).await
    }
}
