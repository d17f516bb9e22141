//! Asset file discovery.
//!
//! Card scans live under one directory per group, named
//! `{key}_{color1&color2}_{rarity}_{type}.{ext}`. The engine only consumes
//! the leading key token and, for rarity-filtered passes, the rarity token.

use glob::glob;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error during asset discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// One discovered card scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    pub path: PathBuf,
    /// Leading filename token, the raw key
    pub raw_key: String,
    /// Third filename token, the rarity code, when present
    pub rarity_token: Option<String>,
}

/// Check if a path is a card scan (webp or png, any case).
fn is_asset_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("webp") || e.eq_ignore_ascii_case("png"))
}

/// Split a scan filename into its raw key and rarity token.
///
/// Returns `None` for names with an empty leading token.
pub fn parse_asset_name(file_name: &str) -> Option<(String, Option<String>)> {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let mut tokens = stem.split('_');
    let raw_key = tokens.next().filter(|t| !t.is_empty())?;
    let rarity_token = tokens.nth(1).map(|t| t.to_ascii_uppercase());
    Some((raw_key.to_string(), rarity_token))
}

/// Enumerate card scans in a group directory, sorted by filename.
///
/// A missing directory yields an empty list; the caller treats it as a
/// group with no assets rather than an error.
pub fn discover_assets(dir: &Path) -> Result<Vec<AssetFile>, DiscoveryError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = dir.join("*").to_string_lossy().into_owned();
    let paths = glob(&pattern)
        .map_err(|source| DiscoveryError::InvalidPattern { pattern: pattern.clone(), source })?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if !path.is_file() || !is_asset_file(&path) {
                    continue;
                }
                let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if let Some((raw_key, rarity_token)) = parse_asset_name(file_name) {
                    files.push(AssetFile { path, raw_key, rarity_token });
                }
            }
            Err(e) => {
                // Log but continue on unreadable entries
                eprintln!("Warning: error reading path: {}", e);
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
