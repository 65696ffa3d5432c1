//! Terminal results of a generation attempt.

use crate::error::ServiceError;
use crate::itinerary::ItineraryDocument;
use crate::service::ShareReference;
use serde::Serialize;
use std::fmt;

/// Why an attempt failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// The generation service rejected the request or was unreachable.
    Submission(ServiceError),
    /// The task disappeared while polling.
    TaskNotFound,
    /// The attempt ceiling ran out while the task was still pending.
    /// The task may still finish server-side.
    Timeout,
    /// The service reported the task as failed.
    TaskFailed(String),
}

impl FailureReason {
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::Submission(_) => "submission_error",
            FailureReason::TaskNotFound => "task_not_found",
            FailureReason::Timeout => "timeout",
            FailureReason::TaskFailed(_) => "task_failed",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Submission(err) => write!(f, "submission failed: {}", err),
            FailureReason::TaskNotFound => f.write_str("generation task not found"),
            FailureReason::Timeout => f.write_str("timed out waiting for generation"),
            FailureReason::TaskFailed(reason) => write!(f, "generation failed: {}", reason),
        }
    }
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed {
        result: ItineraryDocument,
        share: Option<ShareReference>,
    },
    Failed {
        reason: FailureReason,
    },
    Cancelled,
    /// A newer `submit` took over this session. Hosts should ignore it.
    Superseded,
}

impl Outcome {
    pub(crate) fn failed(reason: FailureReason) -> Self {
        Outcome::Failed { reason }
    }

    pub fn status(&self) -> OutcomeStatus {
        match self {
            Outcome::Completed { .. } => OutcomeStatus::Completed,
            Outcome::Failed { .. } => OutcomeStatus::Failed,
            Outcome::Cancelled => OutcomeStatus::Cancelled,
            Outcome::Superseded => OutcomeStatus::Superseded,
        }
    }

    pub fn result(&self) -> Option<&ItineraryDocument> {
        match self {
            Outcome::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn share(&self) -> Option<&ShareReference> {
        match self {
            Outcome::Completed { share, .. } => share.as_ref(),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Outcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Completed,
    Failed,
    Cancelled,
    Superseded,
}

impl OutcomeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeStatus::Completed => "completed",
            OutcomeStatus::Failed => "failed",
            OutcomeStatus::Cancelled => "cancelled",
            OutcomeStatus::Superseded => "superseded",
        }
    }
}
