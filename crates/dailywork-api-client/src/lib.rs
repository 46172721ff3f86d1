//! HTTP client for the daily-work backend.
//!
//! Provides a minimal client with configurable auth, JSON and multipart POST
//! helpers that only accept HTTP 200, and the [`DailyWorkBackend`] implementation
//! (see [`api`]). The CLI and services crates use this client directly.
//!
//! [`DailyWorkBackend`]: dailywork_core::DailyWorkBackend

pub mod api;

use anyhow::{Context, Result};
use dailywork_core::{WorkflowConfig, WorkflowError, WorkflowResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// No credentials (local development servers).
    None,
}

/// HTTP client for the daily-work API with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
    update_path: String,
    upload_path: String,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let defaults = WorkflowConfig::default();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            update_path: defaults.update_path,
            upload_path: defaults.upload_path,
        })
    }

    /// Create client from a validated configuration. Bearer auth when a token is set.
    pub fn from_config(config: &WorkflowConfig) -> Result<Self> {
        let auth = match &config.api_token {
            Some(token) => Auth::Bearer(token.clone()),
            None => Auth::None,
        };

        let mut client = Self::new(config.api_url.clone(), auth, config.http_timeout())?;
        client.update_path = config.update_path.clone();
        client.upload_path = config.upload_path.clone();
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::None => request,
        }
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> WorkflowResult<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).json(body));
        self.send(request, &url).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> WorkflowResult<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));
        self.send(request, &url).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> WorkflowResult<T> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status != StatusCode::OK {
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                "API request failed with status {}",
                status
            );
            return Err(WorkflowError::Server {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        parse_success(&body)
    }
}

fn transport_error(err: reqwest::Error) -> WorkflowError {
    if err.is_timeout() {
        WorkflowError::Timeout
    } else {
        WorkflowError::Network(err.to_string())
    }
}

/// Error payloads carry a human readable `message` (or `error`) field.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// An empty 200 body is read as `{}` so message-only responses still parse.
fn parse_success<T: DeserializeOwned>(body: &str) -> WorkflowResult<T> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body)
        .map_err(|e| WorkflowError::Internal(format!("Failed to parse response as JSON: {}", e)))
}
