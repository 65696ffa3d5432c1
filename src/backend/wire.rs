//! Request and response bodies of the itinerary backend.

use crate::error::ServiceError;
use crate::itinerary::ItineraryDocument;
use crate::service::{ShareReference, TaskHandle, TaskStatus, TaskStatusReport};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskStatusBody {
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TemporaryShareRequest<'a> {
    pub itinerary_data: &'a Value,
    pub expires_days: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareLinkResponse {
    pub share_token: String,
    pub share_url: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ItineraryShareRequest {
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Value,
}

impl SubmitResponse {
    pub(crate) fn into_handle(self) -> Result<TaskHandle, ServiceError> {
        if self.task_id.trim().is_empty() {
            return Err(ServiceError::InvalidResponse(
                "submission returned an empty task_id".to_string(),
            ));
        }
        Ok(TaskHandle::new(self.task_id))
    }
}

impl TaskStatusBody {
    pub(crate) fn into_report(self) -> Result<TaskStatusReport, ServiceError> {
        let status = match self.status.to_ascii_lowercase().as_str() {
            "pending" | "queued" | "running" | "processing" => TaskStatus::Pending,
            "completed" | "done" | "success" => {
                let result = self.result.ok_or_else(|| {
                    ServiceError::InvalidResponse(format!(
                        "task {} completed without a result",
                        self.task_id
                    ))
                })?;
                TaskStatus::Completed {
                    result: ItineraryDocument::new(result),
                }
            }
            "failed" | "error" => TaskStatus::Failed {
                reason: self
                    .error
                    .unwrap_or_else(|| "generation failed without a reason".to_string()),
            },
            other => {
                return Err(ServiceError::InvalidResponse(format!(
                    "unknown task status '{}'",
                    other
                )))
            }
        };
        Ok(TaskStatusReport {
            task: TaskHandle::new(self.task_id),
            status,
        })
    }
}

impl ShareLinkResponse {
    pub(crate) fn into_reference(self, site_url: &str) -> Result<ShareReference, ServiceError> {
        if self.share_token.trim().is_empty() {
            return Err(ServiceError::InvalidResponse(
                "share creation returned an empty token".to_string(),
            ));
        }
        Ok(ShareReference {
            url: resolve_share_url(site_url, &self.share_url),
            expires_at: self.expires_at.as_deref().and_then(parse_timestamp),
            token: self.share_token,
        })
    }
}

impl ErrorBody {
    /// FastAPI reports `detail` as a string or as a list of validation entries.
    pub(crate) fn message(&self) -> String {
        match &self.detail {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Make a relative share path absolute against the public site URL.
pub(crate) fn resolve_share_url(site_url: &str, share_url: &str) -> String {
    if share_url.starts_with("http://") || share_url.starts_with("https://") {
        return share_url.to_string();
    }
    let site = site_url.trim_end_matches('/');
    if share_url.starts_with('/') {
        format!("{}{}", site, share_url)
    } else {
        format!("{}/{}", site, share_url)
    }
}

/// Parse RFC 3339 timestamps, or naive ISO timestamps taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
