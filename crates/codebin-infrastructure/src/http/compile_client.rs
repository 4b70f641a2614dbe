//! HTTP client for the backend compile endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use codebin_core::auth::AuthWatcher;
use codebin_core::compile::CompileBackend;
use codebin_core::error::{CodebinError, Result};
use codebin_core::language::Language;
use reqwest::Client;
use serde::Serialize;

use super::map_response_error;

#[derive(Serialize)]
struct CompileRequest<'a> {
    code: &'a str,
    input: &'a str,
}

/// Compile client for `POST /api/compile/{language}`.
///
/// The deployed compile endpoint identifies the caller by the
/// `User-Email` header alone and does not check the bearer token, so
/// none is sent. The response body is plain text either way: program
/// output on success, compiler error text otherwise.
pub struct HttpCompileClient {
    client: Client,
    base_url: String,
    auth: Arc<AuthWatcher>,
}

impl HttpCompileClient {
    pub fn new(base_url: impl Into<String>, auth: Arc<AuthWatcher>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }
}

#[async_trait]
impl CompileBackend for HttpCompileClient {
    async fn compile(&self, language: Language, code: &str, input: &str) -> Result<String> {
        let route = language.compile_route().ok_or_else(|| {
            CodebinError::validation(format!("{} cannot be compiled remotely", language))
        })?;

        let identity = self
            .auth
            .current()
            .ok_or_else(|| CodebinError::auth("no signed-in user"))?;

        tracing::debug!("[Compile] Submitting {} buffer", language);
        let response = self
            .client
            .post(format!("{}/api/compile/{}", self.base_url, route))
            .header("User-Email", &identity.email)
            .json(&CompileRequest { code, input })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_response_error(status, body, None));
        }

        Ok(response.text().await?)
    }
}
