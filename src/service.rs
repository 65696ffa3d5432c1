//! Remote service abstraction
//!
//! The generation workflow talks to two collaborators: a generation service that
//! runs itinerary tasks and a share service that publishes finished itineraries.
//! `backend::BackendClient` implements both over HTTP; tests substitute fakes.

use crate::error::ServiceError;
use crate::itinerary::ItineraryDocument;
use crate::request::GenerationRequest;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-side identifier of one generation task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a generation task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus {
    Pending,
    Completed { result: ItineraryDocument },
    Failed { reason: String },
}

/// A status answer together with the task it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatusReport {
    pub task: TaskHandle,
    pub status: TaskStatus,
}

/// Retrievable link to a shared itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareReference {
    pub token: String,
    pub url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Runs itinerary generation tasks.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Start a generation task.
    async fn submit(
        &self,
        request: &GenerationRequest,
        auth_token: Option<&str>,
    ) -> Result<TaskHandle, ServiceError>;

    /// Query a task. Unknown or expired tasks yield `ServiceError::NotFound`.
    async fn get_status(
        &self,
        task: &TaskHandle,
        auth_token: Option<&str>,
    ) -> Result<TaskStatusReport, ServiceError>;
}

/// Publishes itineraries behind an unauthenticated share link.
#[async_trait]
pub trait ShareService: Send + Sync {
    async fn create_share(
        &self,
        document: &ItineraryDocument,
        expires_in_days: u32,
    ) -> Result<ShareReference, ServiceError>;
}
