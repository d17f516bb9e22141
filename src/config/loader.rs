//! Configuration loading and discovery for `folio.toml`.

use super::schema::FolioConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse folio.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the scan library root
    pub assets: Option<PathBuf>,
    /// Override the output root
    pub out: Option<PathBuf>,
    /// Restrict the run to one language
    pub lang: Option<String>,
    /// Override cards per row
    pub per_row: Option<usize>,
    /// Override the banner/badge font
    pub font: Option<PathBuf>,
}

/// Find folio.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find folio.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join("folio.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a folio.toml file.
///
/// With an explicit path, that file must exist and parse. Otherwise the
/// config is discovered with [`find_config`]; when none is found the
/// built-in defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<FolioConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(FolioConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<FolioConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: FolioConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut FolioConfig, overrides: &CliOverrides) {
    if let Some(ref assets) = overrides.assets {
        config.project.assets = assets.clone();
    }
    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }
    if let Some(ref lang) = overrides.lang {
        config.project.languages = vec![lang.clone()];
    }
    if let Some(per_row) = overrides.per_row {
        config.render.per_row = per_row;
    }
    if let Some(ref font) = overrides.font {
        config.render.font = Some(font.clone());
    }
}
