//! Card records and rarity codes.

use serde::{Deserialize, Serialize};

/// Copies of a card needed for a complete playset.
pub const PLAYSET: u32 = 4;

/// Rarity tiers, ordered lowest to highest.
///
/// Inventory exports spell rarities out ("Uncommon", "SUPER", ...); asset
/// filenames carry the two-letter codes ("UC", "SR", ...). `parse` accepts
/// both spellings case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    SuperRare,
    Legendary,
    Enchanted,
    Special,
}

impl Rarity {
    /// All rarities in display order.
    pub const ALL: [Rarity; 7] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::SuperRare,
        Rarity::Legendary,
        Rarity::Enchanted,
        Rarity::Special,
    ];

    /// Two-letter code used in asset filenames and output names.
    pub fn code(self) -> &'static str {
        match self {
            Rarity::Common => "CC",
            Rarity::Uncommon => "UC",
            Rarity::Rare => "RR",
            Rarity::SuperRare => "SR",
            Rarity::Legendary => "LL",
            Rarity::Enchanted => "EE",
            Rarity::Special => "SP",
        }
    }

    /// Parse either an inventory spelling or a filename code.
    pub fn parse(s: &str) -> Option<Rarity> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CC" | "COMMON" => Some(Rarity::Common),
            "UC" | "UNCOMMON" => Some(Rarity::Uncommon),
            "RR" | "RARE" => Some(Rarity::Rare),
            "SR" | "SUPER" | "SUPER RARE" | "SUPER_RARE" => Some(Rarity::SuperRare),
            "LL" | "LEGENDARY" => Some(Rarity::Legendary),
            "EE" | "ENCHANTED" => Some(Rarity::Enchanted),
            "SP" | "SPECIAL" => Some(Rarity::Special),
            _ => None,
        }
    }
}

/// One owned card, identified by (group, canonical key) in the collection.
///
/// Built once when the inventory loads and read-only afterwards; output
/// passes never consume or alter counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub name: String,
    pub normal: u32,
    pub foil: u32,
    /// Color tags as they appeared in the export, order preserved
    pub colors: Vec<String>,
    pub rarity: Rarity,
}

impl CardRecord {
    /// Multicolor is derived from the tag count, never trusted from an
    /// upstream flag (the sources have been seen to disagree).
    pub fn is_multicolor(&self) -> bool {
        self.colors.len() > 1
    }

    pub fn total(&self) -> u32 {
        self.normal + self.foil
    }

    /// Copies still needed to complete a playset.
    pub fn missing_for_playset(&self) -> u32 {
        PLAYSET.saturating_sub(self.total())
    }

    /// Color tags lowercased, for comparisons.
    pub fn colors_lower(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_ascii_lowercase()).collect()
    }
}
