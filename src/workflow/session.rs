//! Workflow session bookkeeping.
//!
//! A `WorkflowSession` is owned by the `submit` call that created it. The
//! `SessionSlot` records which session is current; starting a session swaps the
//! slot and cancels whatever was there before.

use crate::request::GenerationRequest;
use crate::service::TaskHandle;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

/// Identifier of one `submit` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Per-attempt state held by the running `submit` call.
#[derive(Debug)]
pub struct WorkflowSession {
    id: SessionId,
    request: GenerationRequest,
    cancel: CancellationToken,
}

impl WorkflowSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the session is cancelled or superseded.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

#[derive(Debug)]
struct ActiveSession {
    id: SessionId,
    handle: Option<TaskHandle>,
    cancel: CancellationToken,
}

/// The single current-session pointer of a workflow.
#[derive(Debug)]
pub(crate) struct SessionSlot {
    current: Mutex<Option<ActiveSession>>,
    next_id: AtomicU64,
}

impl SessionSlot {
    pub(crate) fn new() -> Self {
        Self {
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Install a fresh session, cancelling and clearing the previous one.
    ///
    /// Returns the new session and the id of the session it superseded.
    pub(crate) fn begin(&self, request: GenerationRequest) -> (WorkflowSession, Option<SessionId>) {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();
        let previous = {
            let mut current = self.current.lock();
            current.replace(ActiveSession {
                id,
                handle: None,
                cancel: cancel.clone(),
            })
        };
        let superseded = previous.map(|old| {
            old.cancel.cancel();
            old.id
        });
        (
            WorkflowSession {
                id,
                request,
                cancel,
            },
            superseded,
        )
    }

    /// Record the task handle of `id`. Fails if `id` is no longer current.
    pub(crate) fn install_handle(&self, id: SessionId, handle: &TaskHandle) -> bool {
        let mut current = self.current.lock();
        match current.as_mut() {
            Some(active) if active.id == id => {
                active.handle = Some(handle.clone());
                true
            }
            _ => false,
        }
    }

    pub(crate) fn is_current(&self, id: SessionId) -> bool {
        matches!(self.current.lock().as_ref(), Some(active) if active.id == id)
    }

    /// Whether `handle` is the current task of the current session `id`.
    pub(crate) fn is_current_task(&self, id: SessionId, handle: &TaskHandle) -> bool {
        matches!(
            self.current.lock().as_ref(),
            Some(ActiveSession { id: active_id, handle: Some(active_handle), .. })
                if *active_id == id && active_handle == handle
        )
    }

    pub(crate) fn current_id(&self) -> Option<SessionId> {
        self.current.lock().as_ref().map(|active| active.id)
    }

    /// Cancel the current session, if any. Returns its id.
    pub(crate) fn cancel_current(&self) -> Option<SessionId> {
        let current = self.current.lock();
        current.as_ref().map(|active| {
            active.cancel.cancel();
            active.id
        })
    }

    /// Decide how session `id` ends and release the slot if it still owns it.
    ///
    /// The ownership and cancellation checks happen under the same lock as
    /// `begin` and `cancel_current`, so a session that settles as `Live` can no
    /// longer be cancelled or superseded.
    pub(crate) fn settle(&self, id: SessionId) -> Settlement {
        let mut current = self.current.lock();
        match current.as_ref() {
            Some(active) if active.id == id => {
                let cancelled = active.cancel.is_cancelled();
                *current = None;
                if cancelled {
                    Settlement::Cancelled
                } else {
                    Settlement::Live
                }
            }
            _ => Settlement::Superseded,
        }
    }
}

/// How a session ended, as seen by the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settlement {
    /// Still current and not cancelled; its outcome stands.
    Live,
    Cancelled,
    Superseded,
}
