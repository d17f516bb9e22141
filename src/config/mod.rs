//! Configuration for `folio.toml`: schema, discovery and loading.

pub mod loader;
pub mod schema;

pub use loader::{find_config, find_config_from, load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::{ColorConfig, FolioConfig, GroupConfig, PolicyConfig, ProjectConfig, RenderConfig};
