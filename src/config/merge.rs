//! Merge rules: defaults applied beneath every other source.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("backend.base_url", "http://localhost:8000")?
        .set_default("backend.site_url", "http://localhost:3000")?
        .set_default("workflow.poll_interval_ms", 2_000)?
        .set_default("workflow.max_poll_attempts", 150)?
        .set_default("workflow.share_expires_days", 7)
}
