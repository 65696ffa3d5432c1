//! Config sources: global file, local or explicit file, environment.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{Environment, File, FileFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const LOCAL_CONFIG_FILE: &str = "tripgen.toml";

/// Path to the global config file: `$XDG_CONFIG_HOME/tripgen/config.toml` on Linux.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tripgen").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add a TOML file source. Optional files that do not exist are skipped.
pub fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !required && !path.exists() {
        debug!(config_path = %path.display(), "Config file not present, skipping");
        return Ok(builder);
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
}

/// Add `TRIPGEN__SECTION__KEY` environment overrides.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("TRIPGEN")
            .separator("__")
            .try_parsing(true),
    )
}
