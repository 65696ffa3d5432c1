//! tripgen: AI travel itinerary generation client
//!
//! Submits itinerary generation requests to the itinerary backend, polls the
//! resulting task until it finishes, and delivers the result directly or behind a
//! share link. The `workflow` module holds the core; `backend` talks HTTP; `cli`
//! is the command-line host.

pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod itinerary;
pub mod logging;
pub mod request;
pub mod service;
pub mod workflow;

pub use error::{ApiError, ServiceError, ValidationError};
pub use itinerary::ItineraryDocument;
pub use request::{GenerationRequest, Preference};
pub use service::{
    GenerationService, ShareReference, ShareService, TaskHandle, TaskStatus, TaskStatusReport,
};
pub use workflow::{FailureReason, GenerationWorkflow, Outcome, WorkflowConfig, WorkflowEvent};
