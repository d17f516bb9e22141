//! Groups partition the card namespace: numbered chapters and special sets.

use serde::{Deserialize, Serialize};

/// How a group formats its card identifiers.
///
/// Numbered groups ("001", "002", ...) carry numeric card ids that are
/// zero-padded into canonical keys. Special groups (promo sets, event sets)
/// use their raw identifiers as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Numbered,
    Special,
}

/// A release chapter or special set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Short code used in inventory rows and asset directory names ("003", "P1")
    pub code: String,
    /// Human-readable name used in gallery headers
    pub name: String,
    pub kind: GroupKind,
}

impl Group {
    pub fn new(code: impl Into<String>, name: impl Into<String>, kind: GroupKind) -> Self {
        Self { code: code.into(), name: name.into(), kind }
    }

    /// Infer the kind for a group code that is not configured.
    ///
    /// All-digit codes are chapters; anything else is a special set.
    pub fn infer_kind(code: &str) -> GroupKind {
        if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
            GroupKind::Numbered
        } else {
            GroupKind::Special
        }
    }
}
