//! Lifecycle signals for hosts that render generation progress.

use crate::service::TaskHandle;
use crate::workflow::outcome::OutcomeStatus;
use crate::workflow::session::SessionId;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    Submitted {
        session: SessionId,
        task: TaskHandle,
    },
    Polling {
        session: SessionId,
        attempt: u32,
        max_attempts: u32,
    },
    Sharing {
        session: SessionId,
    },
    Finished {
        session: SessionId,
        status: OutcomeStatus,
    },
}

impl WorkflowEvent {
    pub fn session(&self) -> SessionId {
        match self {
            WorkflowEvent::Submitted { session, .. }
            | WorkflowEvent::Polling { session, .. }
            | WorkflowEvent::Sharing { session }
            | WorkflowEvent::Finished { session, .. } => *session,
        }
    }
}

/// Optional, best-effort event channel.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventSink {
    sender: Option<UnboundedSender<WorkflowEvent>>,
}

impl EventSink {
    pub(crate) fn new(sender: UnboundedSender<WorkflowEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    pub(crate) fn emit(&self, event: WorkflowEvent) {
        if let Some(sender) = &self.sender {
            if sender.send(event).is_err() {
                trace!("workflow event receiver dropped");
            }
        }
    }
}
