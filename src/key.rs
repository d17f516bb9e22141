//! Canonical card keys.
//!
//! Inventory rows and asset filenames identify cards in their own formats;
//! both are funneled through [`card_key`] so the two derivations agree for
//! every card present in both sources. A silent divergence here drops the
//! card from every rendered output, which is why this is the one function
//! both ingestion paths must share.

use crate::models::GroupKind;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Zero-pad width for numeric ids in numbered groups.
const PAD_WIDTH: usize = 3;

/// Soft warning for an id in a numbered group that does not match the
/// expected pattern. The raw value is used as the key and the record only
/// reconciles if the filename side produced the same raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyWarning {
    pub raw: String,
}

impl fmt::Display for KeyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected card number format '{}', using raw value as key", self.raw)
    }
}

/// A canonical key plus the soft warning raised while deriving it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedKey {
    pub key: String,
    pub warning: Option<KeyWarning>,
}

impl NormalizedKey {
    fn clean(key: String) -> Self {
        Self { key, warning: None }
    }

    fn fallback(raw: &str) -> Self {
        Self { key: raw.to_string(), warning: Some(KeyWarning { raw: raw.to_string() }) }
    }
}

/// (optional non-digit prefix)(digit run)(optional trailing letters)
fn numbered_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^0-9]?([0-9]+)([a-zA-Z]*)$").expect("hardcoded pattern"))
}

/// Derive the canonical key for a raw card identifier.
///
/// Numbered groups zero-pad the digit run to width 3 and lower-case any
/// trailing variant letters, so `"4A"` becomes `"004a"`. An id that does
/// not match the pattern falls back to the trimmed raw value with a
/// [`KeyWarning`] (non-fatal; the caller logs it).
///
/// Special groups keep the trimmed raw value, minus a single leading
/// non-digit promo marker some feeds prepend. The stripping is applied on
/// both the inventory and filename side, so keys stay aligned.
///
/// Pure function of `(kind, raw)`; no hidden state.
pub fn card_key(kind: GroupKind, raw: &str) -> NormalizedKey {
    let trimmed = raw.trim();
    match kind {
        GroupKind::Numbered => match numbered_pattern().captures(trimmed) {
            Some(caps) => {
                let digits = &caps[1];
                let suffix = caps[2].to_ascii_lowercase();
                NormalizedKey::clean(format!("{digits:0>PAD_WIDTH$}{suffix}"))
            }
            None => NormalizedKey::fallback(trimmed),
        },
        GroupKind::Special => NormalizedKey::clean(strip_promo_marker(trimmed).to_string()),
    }
}

/// Drop one leading non-digit marker character, unless that would leave
/// the key empty.
fn strip_promo_marker(id: &str) -> &str {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if !first.is_ascii_digit() && !chars.as_str().is_empty() => chars.as_str(),
        _ => id,
    }
}
