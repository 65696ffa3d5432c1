//! Logging System
//!
//! Structured logging using the `tracing` crate. Level, format and destination come
//! from configuration, overridable through `TRIPGEN_LOG*` environment variables.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable to drop all log output
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, both (stdout and stderr)
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (required when output is "file")
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    // stdout carries command output
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Initialize the global subscriber.
///
/// Priority order (highest to lowest):
/// 1. Environment variables (TRIPGEN_LOG, TRIPGEN_LOG_FORMAT, TRIPGEN_LOG_OUTPUT)
/// 2. The given configuration (CLI flags already merged in)
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = if config.enabled {
        build_env_filter(config)?
    } else {
        EnvFilter::new("off")
    };
    let format = determine_format(config)?;
    let output = determine_output(config)?;

    let (writer, is_terminal) = match output {
        OutputDestination::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        OutputDestination::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        OutputDestination::Both => (
            BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
            true,
        ),
        OutputDestination::File => (BoxMakeWriter::new(Arc::new(open_log_file(config)?)), false),
    };

    let base_subscriber = Registry::default().with(filter);
    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color && is_terminal)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| ApiError::ConfigError(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, ApiError> {
    let log_file = config.file.clone().ok_or_else(|| {
        ApiError::ConfigError("Log output 'file' requires logging.file to be set".to_string())
    })?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ApiError::ConfigError(format!("Failed to create log directory: {}", e)))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
        })
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("TRIPGEN_LOG") {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }

    Ok(filter)
}

/// Determine output format from environment or config
fn determine_format(config: &LoggingConfig) -> Result<String, ApiError> {
    if let Ok(format) = std::env::var("TRIPGEN_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.format.as_str();
    if format != "json" && format != "text" {
        return Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputDestination {
    Stdout,
    Stderr,
    File,
    Both,
}

fn determine_output(config: &LoggingConfig) -> Result<OutputDestination, ApiError> {
    if let Ok(output) = std::env::var("TRIPGEN_LOG_OUTPUT") {
        return parse_output_destination(&output);
    }
    parse_output_destination(&config.output)
}

fn parse_output_destination(output: &str) -> Result<OutputDestination, ApiError> {
    match output {
        "stdout" => Ok(OutputDestination::Stdout),
        "stderr" => Ok(OutputDestination::Stderr),
        "file" => Ok(OutputDestination::File),
        "both" => Ok(OutputDestination::Both),
        _ => Err(ApiError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'both')",
            output
        ))),
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        parse_output_destination(&self.output).map_err(|e| e.to_string())?;
        if self.format != "json" && self.format != "text" {
            return Err(format!("Invalid log format: {}", self.format));
        }
        if self.output == "file" && self.file.is_none() {
            return Err("Log output 'file' requires logging.file to be set".to_string());
        }
        Ok(())
    }
}
