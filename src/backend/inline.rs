//! Results of the blocking generation endpoint.
//!
//! `POST /api/generate-plan` answers with the finished itinerary. The document is
//! parked under a locally minted task handle so the workflow's first status query
//! picks it up as `Completed` without another round trip.

use crate::error::ServiceError;
use crate::itinerary::ItineraryDocument;
use crate::service::{TaskHandle, TaskStatus, TaskStatusReport};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

const INLINE_TASK_PREFIX: &str = "inline-";

#[derive(Debug, Default)]
pub(crate) struct InlineResults {
    next_id: AtomicU64,
    documents: Mutex<HashMap<String, ItineraryDocument>>,
}

impl InlineResults {
    pub(crate) fn store(&self, document: ItineraryDocument) -> TaskHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = TaskHandle::new(format!("{}{}", INLINE_TASK_PREFIX, id));
        self.documents
            .lock()
            .insert(handle.as_str().to_string(), document);
        handle
    }

    /// Answer a status query for a locally minted handle. `None` for server tasks.
    ///
    /// Each document is delivered once; later queries see `NotFound`.
    pub(crate) fn take(&self, task: &TaskHandle) -> Option<Result<TaskStatusReport, ServiceError>> {
        if !task.as_str().starts_with(INLINE_TASK_PREFIX) {
            return None;
        }
        let report = match self.documents.lock().remove(task.as_str()) {
            Some(result) => Ok(TaskStatusReport {
                task: task.clone(),
                status: TaskStatus::Completed { result },
            }),
            None => Err(ServiceError::NotFound(format!(
                "inline result {} was already delivered",
                task
            ))),
        };
        Some(report)
    }
}
