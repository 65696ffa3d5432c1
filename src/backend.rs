//! Itinerary backend client
//!
//! HTTP client for the itinerary backend's REST API. Implements the generation and
//! share services consumed by the workflow, plus the account, history and share
//! viewing endpoints used by the command-line host.

use crate::error::ServiceError;
use crate::itinerary::ItineraryDocument;
use crate::request::GenerationRequest;
use crate::service::{GenerationService, ShareReference, ShareService, TaskHandle, TaskStatusReport};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub mod account;
mod inline;
mod wire;

pub use account::{
    AuthSession, FavoriteStatus, FavoritesPage, HistoryEntry, HistoryPage, HistoryPreview,
    SavedItinerary, SharedItinerary, UserProfile,
};

use inline::InlineResults;
use wire::{
    Credentials, ErrorBody, ItineraryShareRequest, ShareLinkResponse, SubmitResponse,
    TaskStatusBody, TemporaryShareRequest,
};

/// Which generation endpoint `submit` uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// `POST /api/generate-plan/async`, then poll `GET /api/tasks/{id}`
    Async,
    /// `POST /api/generate-plan`, which blocks until the itinerary is ready
    Blocking,
    /// Async, falling back to blocking when the async endpoint is missing
    #[default]
    Auto,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the itinerary API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Public site URL used to make relative share links absolute
    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Per-request timeout; generation itself runs server-side
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub generation_mode: GenerationMode,

    /// Timeout of a blocking generation request
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    90
}

fn default_generation_timeout_secs() -> u64 {
    300
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            site_url: default_site_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            generation_mode: GenerationMode::default(),
            generation_timeout_secs: default_generation_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [("base_url", &self.base_url), ("site_url", &self.site_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{} must be an http(s) URL (got '{}')", name, url));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

// Map transport-level failures to ServiceError
fn map_http_error(error: reqwest::Error) -> ServiceError {
    if error.is_timeout() {
        ServiceError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ServiceError::Transport(format!("Connection error: {}", error))
    } else if error.is_decode() {
        ServiceError::InvalidResponse(format!("Failed to decode response: {}", error))
    } else {
        ServiceError::Transport(format!("HTTP error: {}", error))
    }
}

/// Map a non-success status and its body to ServiceError.
fn status_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|err| err.message())
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });
    match status.as_u16() {
        401 | 403 => ServiceError::Unauthorized(message),
        404 => ServiceError::NotFound(message),
        410 => ServiceError::Expired(message),
        code => ServiceError::RequestFailed {
            status: code,
            body: message,
        },
    }
}

/// HTTP implementation of the generation and share services.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    site_url: String,
    mode: GenerationMode,
    generation_timeout: Duration,
    async_unavailable: Arc<AtomicBool>,
    inline: Arc<InlineResults>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ServiceError::Client(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            site_url: config.site_url.clone(),
            mode: config.generation_mode,
            generation_timeout: Duration::from_secs(config.generation_timeout_secs),
            async_unavailable: Arc::new(AtomicBool::new(false)),
            inline: Arc::new(InlineResults::default()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(builder: RequestBuilder, auth_token: Option<&str>) -> RequestBuilder {
        match auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ServiceError> {
        let response = builder.send().await.map_err(map_http_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, body = %body, "Backend request rejected");
        Err(status_error(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ServiceError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ServiceError> {
        let builder = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&Credentials { email, password });
        self.send_json(builder).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthSession, ServiceError> {
        let builder = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&Credentials { email, password });
        self.send_json(builder).await
    }

    pub async fn current_user(&self, auth_token: &str) -> Result<UserProfile, ServiceError> {
        let builder = self.client.get(self.url("/api/auth/me")).bearer_auth(auth_token);
        self.send_json(builder).await
    }

    pub async fn history(
        &self,
        auth_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<HistoryPage, ServiceError> {
        let builder = self
            .client
            .get(self.url("/api/history"))
            .query(&[("limit", limit), ("offset", offset)])
            .bearer_auth(auth_token);
        self.send_json(builder).await
    }

    /// One saved itinerary with its full document.
    pub async fn history_detail(
        &self,
        auth_token: &str,
        itinerary_id: i64,
    ) -> Result<SavedItinerary, ServiceError> {
        let builder = self
            .client
            .get(self.url(&format!("/api/history/{}", itinerary_id)))
            .bearer_auth(auth_token);
        self.send_json(builder).await
    }

    pub async fn delete_history(&self, auth_token: &str, itinerary_id: i64) -> Result<(), ServiceError> {
        let builder = self
            .client
            .delete(self.url(&format!("/api/history/{}", itinerary_id)))
            .bearer_auth(auth_token);
        self.send(builder).await?;
        Ok(())
    }

    /// Publish a saved itinerary. `expires_days` of `None` lets the backend decide.
    pub async fn create_share_link(
        &self,
        auth_token: &str,
        itinerary_id: i64,
        is_public: bool,
        expires_days: Option<u32>,
    ) -> Result<ShareReference, ServiceError> {
        let builder = self
            .client
            .post(self.url(&format!("/api/itinerary/{}/share", itinerary_id)))
            .bearer_auth(auth_token)
            .json(&ItineraryShareRequest {
                is_public,
                expires_days,
            });
        let response: ShareLinkResponse = self.send_json(builder).await?;
        response.into_reference(&self.site_url)
    }

    /// Fetch a shared itinerary. Unknown links are `NotFound`, expired ones `Expired`.
    pub async fn get_shared(&self, share_token: &str) -> Result<SharedItinerary, ServiceError> {
        let builder = self.client.get(self.url(&format!("/api/share/{}", share_token)));
        self.send_json(builder).await
    }

    pub async fn add_favorite(&self, auth_token: &str, itinerary_id: i64) -> Result<(), ServiceError> {
        let builder = self
            .client
            .post(self.url(&format!("/api/favorites/{}", itinerary_id)))
            .bearer_auth(auth_token);
        self.send(builder).await?;
        Ok(())
    }

    pub async fn remove_favorite(&self, auth_token: &str, itinerary_id: i64) -> Result<(), ServiceError> {
        let builder = self
            .client
            .delete(self.url(&format!("/api/favorites/{}", itinerary_id)))
            .bearer_auth(auth_token);
        self.send(builder).await?;
        Ok(())
    }

    pub async fn favorites(
        &self,
        auth_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<FavoritesPage, ServiceError> {
        let builder = self
            .client
            .get(self.url("/api/favorites"))
            .query(&[("limit", limit), ("offset", offset)])
            .bearer_auth(auth_token);
        self.send_json(builder).await
    }

    pub async fn favorite_status(
        &self,
        auth_token: &str,
        itinerary_id: i64,
    ) -> Result<FavoriteStatus, ServiceError> {
        let builder = self
            .client
            .get(self.url(&format!("/api/favorites/{}/status", itinerary_id)))
            .bearer_auth(auth_token);
        self.send_json(builder).await
    }

    async fn submit_async(
        &self,
        request: &GenerationRequest,
        auth_token: Option<&str>,
    ) -> Result<TaskHandle, ServiceError> {
        let builder = Self::authorized(
            self.client.post(self.url("/api/generate-plan/async")).json(request),
            auth_token,
        );
        let response: SubmitResponse = self.send_json(builder).await?;
        response.into_handle()
    }

    /// Generate in one request and park the document for the first status query.
    async fn submit_blocking(
        &self,
        request: &GenerationRequest,
        auth_token: Option<&str>,
    ) -> Result<TaskHandle, ServiceError> {
        let builder = Self::authorized(
            self.client
                .post(self.url("/api/generate-plan"))
                .timeout(self.generation_timeout)
                .json(request),
            auth_token,
        );
        let document: Value = self.send_json(builder).await?;
        let handle = self.inline.store(ItineraryDocument::new(document));
        debug!(task = %handle, "Blocking generation finished");
        Ok(handle)
    }
}

#[async_trait]
impl GenerationService for BackendClient {
    async fn submit(
        &self,
        request: &GenerationRequest,
        auth_token: Option<&str>,
    ) -> Result<TaskHandle, ServiceError> {
        match self.mode {
            GenerationMode::Async => self.submit_async(request, auth_token).await,
            GenerationMode::Blocking => self.submit_blocking(request, auth_token).await,
            GenerationMode::Auto if self.async_unavailable.load(Ordering::Relaxed) => {
                self.submit_blocking(request, auth_token).await
            }
            GenerationMode::Auto => match self.submit_async(request, auth_token).await {
                Err(ServiceError::NotFound(detail)) => {
                    info!(
                        detail = %detail,
                        "Async generation endpoint not available; using blocking generation"
                    );
                    self.async_unavailable.store(true, Ordering::Relaxed);
                    self.submit_blocking(request, auth_token).await
                }
                other => other,
            },
        }
    }

    async fn get_status(
        &self,
        task: &TaskHandle,
        auth_token: Option<&str>,
    ) -> Result<TaskStatusReport, ServiceError> {
        if let Some(report) = self.inline.take(task) {
            return report;
        }
        let builder = Self::authorized(
            self.client.get(self.url(&format!("/api/tasks/{}", task))),
            auth_token,
        );
        let body: TaskStatusBody = self.send_json(builder).await?;
        body.into_report()
    }
}

#[async_trait]
impl ShareService for BackendClient {
    async fn create_share(
        &self,
        document: &ItineraryDocument,
        expires_in_days: u32,
    ) -> Result<ShareReference, ServiceError> {
        let builder = self
            .client
            .post(self.url("/api/share/temporary"))
            .json(&TemporaryShareRequest {
                itinerary_data: document.as_value(),
                expires_days: expires_in_days,
            });
        let response: ShareLinkResponse = self.send_json(builder).await?;
        response.into_reference(&self.site_url)
    }
}
