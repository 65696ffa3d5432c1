//! Configuration System
//!
//! Layered configuration for the backend connection, the generation workflow and
//! logging. Sources in increasing precedence: built-in defaults, the global file
//! (`$XDG_CONFIG_HOME/tripgen/config.toml`), the local `tripgen.toml` or an
//! explicit file, then `TRIPGEN__SECTION__KEY` environment variables.

use crate::backend::BackendConfig;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::workflow::WorkflowConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::{global_config_path, LOCAL_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripgenConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Backend(String),
    Workflow(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Backend(msg) => write!(f, "backend: {}", msg),
            ValidationError::Workflow(msg) => write!(f, "workflow: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TripgenConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Err(e) = self.backend.validate() {
            errors.push(ValidationError::Backend(e));
        }
        if let Err(e) = self.workflow.validate() {
            errors.push(ValidationError::Workflow(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Loads `TripgenConfig` from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the global file, `tripgen.toml` in `dir`, and the environment.
    pub fn load(dir: &Path) -> Result<TripgenConfig, ApiError> {
        Self::load_layers(global_config_path(), Some(dir.join(LOCAL_CONFIG_FILE)), false)
    }

    /// Load from an explicit file (which must exist) and the environment.
    /// The global file still supplies lower-precedence defaults.
    pub fn load_from_file(path: &Path) -> Result<TripgenConfig, ApiError> {
        Self::load_layers(global_config_path(), Some(path.to_path_buf()), true)
    }

    /// Load from an explicit file only, ignoring global config and environment.
    pub fn load_isolated(path: &Path) -> Result<TripgenConfig, ApiError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::add_file(builder, path, true)?;
        Self::finish(builder)
    }

    fn load_layers(
        global: Option<PathBuf>,
        local: Option<PathBuf>,
        local_required: bool,
    ) -> Result<TripgenConfig, ApiError> {
        let mut builder = merge::builder_with_defaults()?;
        if let Some(global) = global {
            builder = sources::add_file(builder, &global, false)?;
        }
        if let Some(local) = local {
            builder = sources::add_file(builder, &local, local_required)?;
        }
        builder = sources::add_environment(builder);
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<TripgenConfig, ApiError> {
        let config: TripgenConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config)
    }
}
