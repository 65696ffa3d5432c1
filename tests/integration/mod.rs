//! Integration tests for the itinerary generation workflow and its host plumbing

mod request_validation;
mod supersession;
mod token_store;
mod workflow_cancellation;
mod workflow_polling;
