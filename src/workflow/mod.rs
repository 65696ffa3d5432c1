//! Generation workflow
//!
//! Drives one itinerary generation attempt from submission to a terminal outcome:
//! submit the request, poll the task at a fixed interval up to an attempt ceiling,
//! then deliver the result directly (authenticated callers) or behind a share link
//! (anonymous callers).
//!
//! A workflow owns a single current session. Calling `submit` again supersedes the
//! running attempt: its cancellation token fires, its task handle is dropped from
//! the slot, and any status response it receives afterwards is discarded.

pub mod events;
pub mod outcome;
pub mod session;

pub use events::WorkflowEvent;
pub use outcome::{FailureReason, Outcome, OutcomeStatus};
pub use session::{SessionId, WorkflowSession};

use crate::error::ValidationError;
use crate::itinerary::ItineraryDocument;
use crate::request::GenerationRequest;
use crate::service::{
    GenerationService, ShareReference, ShareService, TaskHandle, TaskStatus, TaskStatusReport,
};
use events::EventSink;
use serde::{Deserialize, Serialize};
use session::{SessionSlot, Settlement};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Polling and sharing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Delay between status queries
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum number of status queries per attempt
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Lifetime of share links created for anonymous callers
    #[serde(default = "default_share_expires_days")]
    pub share_expires_days: u32,
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_max_poll_attempts() -> u32 {
    150
}

fn default_share_expires_days() -> u32 {
    7
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            share_expires_days: default_share_expires_days(),
        }
    }
}

impl WorkflowConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Upper bound on time spent polling one task.
    pub fn max_wait(&self) -> Duration {
        self.poll_interval() * self.max_poll_attempts
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".to_string());
        }
        if self.max_poll_attempts == 0 {
            return Err("max_poll_attempts must be at least 1".to_string());
        }
        if self.share_expires_days == 0 {
            return Err("share_expires_days must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Orchestrates generation attempts for one host surface.
pub struct GenerationWorkflow {
    generation: Arc<dyn GenerationService>,
    share: Arc<dyn ShareService>,
    config: WorkflowConfig,
    sessions: SessionSlot,
    events: EventSink,
}

impl GenerationWorkflow {
    pub fn new(
        generation: Arc<dyn GenerationService>,
        share: Arc<dyn ShareService>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            generation,
            share,
            config,
            sessions: SessionSlot::new(),
            events: EventSink::default(),
        }
    }

    /// Send lifecycle events to `sender`.
    pub fn with_events(mut self, sender: UnboundedSender<WorkflowEvent>) -> Self {
        self.events = EventSink::new(sender);
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Id of the session currently running, if any.
    pub fn active_session(&self) -> Option<SessionId> {
        self.sessions.current_id()
    }

    /// Run one generation attempt to completion.
    ///
    /// Invalid requests are rejected before any service call. Every other path
    /// resolves to an `Outcome`; a call superseded by a later `submit` resolves to
    /// `Outcome::Superseded`. The terminal outcome is decided atomically with
    /// respect to `cancel` and later `submit` calls: a session cancelled or
    /// superseded at any suspension point, share creation included, never
    /// reports `Completed` or `Failed`.
    pub async fn submit(
        &self,
        request: GenerationRequest,
        auth_token: Option<String>,
    ) -> Result<Outcome, ValidationError> {
        request.validate()?;

        let (session, superseded) = self.sessions.begin(request);
        if let Some(previous) = superseded {
            info!(session = %session.id(), superseded = %previous, "Superseding running generation session");
        }
        info!(
            session = %session.id(),
            destination = %session.request().destination_name(),
            days = session.request().day_count(),
            authenticated = auth_token.is_some(),
            max_wait_secs = self.config.max_wait().as_secs(),
            "Generation session started"
        );

        let outcome = match self.drive(&session, auth_token.as_deref()).await {
            Outcome::Superseded => Outcome::Superseded,
            candidate => match self.sessions.settle(session.id()) {
                Settlement::Live => candidate,
                Settlement::Cancelled => Outcome::Cancelled,
                Settlement::Superseded => Outcome::Superseded,
            },
        };

        match &outcome {
            Outcome::Superseded => {
                debug!(session = %session.id(), "Generation session abandoned after supersession");
            }
            other => {
                info!(
                    session = %session.id(),
                    status = other.status().as_str(),
                    "Generation session finished"
                );
            }
        }
        self.events.emit(WorkflowEvent::Finished {
            session: session.id(),
            status: outcome.status(),
        });

        Ok(outcome)
    }

    /// Cancel the running session. Idempotent; a no-op when nothing is running.
    pub fn cancel(&self) {
        match self.sessions.cancel_current() {
            Some(id) => info!(session = %id, "Generation cancellation requested"),
            None => debug!("Cancel requested with no active generation session"),
        }
    }

    async fn drive(&self, session: &WorkflowSession, auth_token: Option<&str>) -> Outcome {
        let submitted = self.generation.submit(session.request(), auth_token).await;
        if let Some(interrupted) = self.interruption(session) {
            return interrupted;
        }
        let handle = match submitted {
            Ok(handle) => handle,
            Err(err) => {
                warn!(session = %session.id(), error = %err, "Generation submission failed");
                return Outcome::failed(FailureReason::Submission(err));
            }
        };
        if !self.sessions.install_handle(session.id(), &handle) {
            return Outcome::Superseded;
        }
        debug!(session = %session.id(), task = %handle, "Generation task submitted");
        self.events.emit(WorkflowEvent::Submitted {
            session: session.id(),
            task: handle.clone(),
        });

        let result = match self.poll(session, &handle, auth_token).await {
            Ok(result) => result,
            Err(outcome) => return outcome,
        };

        if auth_token.is_some() {
            // The service already stored the itinerary under the caller's account.
            return Outcome::Completed {
                result,
                share: None,
            };
        }

        if let Some(interrupted) = self.interruption(session) {
            return interrupted;
        }
        let share = self.share_result(session, &result).await;
        if let Some(interrupted) = self.interruption(session) {
            return interrupted;
        }
        Outcome::Completed { result, share }
    }

    /// Poll `handle` until it reaches a terminal state.
    ///
    /// `Err` carries the outcome that ends the attempt without a result.
    async fn poll(
        &self,
        session: &WorkflowSession,
        handle: &TaskHandle,
        auth_token: Option<&str>,
    ) -> Result<ItineraryDocument, Outcome> {
        let max_attempts = self.config.max_poll_attempts;
        let interval = self.config.poll_interval();

        for attempt in 1..=max_attempts {
            self.events.emit(WorkflowEvent::Polling {
                session: session.id(),
                attempt,
                max_attempts,
            });

            let response = self.generation.get_status(handle, auth_token).await;
            if let Some(interrupted) = self.interruption(session) {
                return Err(interrupted);
            }
            if !self.sessions.is_current_task(session.id(), handle) {
                return Err(Outcome::Superseded);
            }

            match response {
                Ok(TaskStatusReport { task, .. }) if task != *handle => {
                    warn!(
                        session = %session.id(),
                        expected = %handle,
                        received = %task,
                        "Discarding status report for another task"
                    );
                }
                Ok(TaskStatusReport { status, .. }) => match status {
                    TaskStatus::Pending => {
                        debug!(session = %session.id(), task = %handle, attempt, "Generation task pending");
                    }
                    TaskStatus::Completed { result } => {
                        info!(session = %session.id(), task = %handle, attempt, "Generation task completed");
                        return Ok(result);
                    }
                    TaskStatus::Failed { reason } => {
                        warn!(session = %session.id(), task = %handle, reason = %reason, "Generation task failed");
                        return Err(Outcome::failed(FailureReason::TaskFailed(reason)));
                    }
                },
                Err(err) if err.is_not_found() => {
                    warn!(session = %session.id(), task = %handle, error = %err, "Generation task not found");
                    return Err(Outcome::failed(FailureReason::TaskNotFound));
                }
                Err(err) => {
                    debug!(
                        session = %session.id(),
                        task = %handle,
                        attempt,
                        error = %err,
                        "Transient status query error"
                    );
                }
            }

            if attempt < max_attempts {
                tokio::select! {
                    _ = sleep(interval) => {}
                    _ = session.cancelled() => {}
                }
                if let Some(interrupted) = self.interruption(session) {
                    return Err(interrupted);
                }
            }
        }

        warn!(
            session = %session.id(),
            task = %handle,
            attempts = max_attempts,
            "Gave up waiting for generation task"
        );
        Err(Outcome::failed(FailureReason::Timeout))
    }

    async fn share_result(
        &self,
        session: &WorkflowSession,
        result: &ItineraryDocument,
    ) -> Option<ShareReference> {
        self.events.emit(WorkflowEvent::Sharing {
            session: session.id(),
        });
        let request = session.request();
        let document = result.with_trip_metadata(request.destination_name(), request.day_count());
        match self
            .share
            .create_share(&document, self.config.share_expires_days)
            .await
        {
            Ok(reference) => {
                info!(session = %session.id(), share_token = %reference.token, "Share link created");
                Some(reference)
            }
            Err(err) => {
                warn!(
                    session = %session.id(),
                    error = %err,
                    "Share link creation failed; returning unshared result"
                );
                None
            }
        }
    }

    /// Outcome to stop with when the session lost the right to continue.
    fn interruption(&self, session: &WorkflowSession) -> Option<Outcome> {
        if !self.sessions.is_current(session.id()) {
            Some(Outcome::Superseded)
        } else if session.is_cancelled() {
            Some(Outcome::Cancelled)
        } else {
            None
        }
    }
}
