//! Error types for the itinerary generation client.

use thiserror::Error;

/// A generation request that cannot be submitted.
///
/// Raised before any network traffic; `field` names the offending request field
/// using the backend's wire name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors reported by the remote generation, share and account services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Expired: {0}")]
    Expired(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Client error: {0}")]
    Client(String),
}

impl ServiceError {
    /// Whether the referenced resource is gone for good.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ServiceError::Unauthorized(_))
    }
}

/// Top-level error for configuration, token storage and command routing.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("Not logged in. Run `tripgen login` first.")]
    NotLoggedIn,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// Whether the backend rejected the stored credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Service(err) if err.is_unauthorized())
    }
}
