//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, ServiceError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Service(ServiceError::Unauthorized(_)) => {
            "Authentication failed or expired. Run `tripgen login` again.".to_string()
        }
        ApiError::Service(ServiceError::Expired(_)) => "This share link has expired.".to_string(),
        ApiError::Service(ServiceError::NotFound(detail)) => format!("Not found: {}", detail),
        other => other.to_string(),
    }
}
