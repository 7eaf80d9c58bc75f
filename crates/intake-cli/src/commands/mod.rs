//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;
pub mod records;

use std::path::{Path, PathBuf};

use tracing::debug;

use intake_core::models::config::IntakeConfig;

/// `<config_dir>/intake/config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("intake")
        .join("config.json")
}

/// Config file used by a command: `--config` if given, else the default path.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Resolve the effective configuration once at startup.
///
/// An explicit `--config` file must exist; the default file is optional.
/// Environment overrides are applied last.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<IntakeConfig> {
    let file = match config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => Some(default_config_path()).filter(|p| p.exists()),
    };

    if let Some(path) = &file {
        debug!("Loading configuration from {}", path.display());
    }

    IntakeConfig::resolve(file.as_deref()).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load configuration from {}: {}",
            file.as_deref().unwrap_or(Path::new("<defaults>")).display(),
            e
        )
    })
}
