//! Balanced color attribution for multicolor cards.
//!
//! A card carrying two color tags appears in exactly one single-color
//! gallery. The attribution is computed once over the whole collection,
//! before any output pass, so the same card lands in the same bucket no
//! matter which galleries are generated or in what order. The table is a
//! value handed to each pass, never a process-wide singleton.

use crate::inventory::Collection;
use crate::models::Rarity;
use std::collections::{BTreeMap, HashMap};

/// Output-time policy knobs for the attribution.
#[derive(Debug, Clone)]
pub struct AssignPolicy {
    /// When set, enchanted multicolor cards are left out of the table and
    /// instead shown in every one of their colors' galleries.
    pub enchanted_every_color: bool,
}

impl Default for AssignPolicy {
    fn default() -> Self {
        Self { enchanted_every_color: true }
    }
}

impl AssignPolicy {
    /// The rarity exempt from single-bucket attribution, if any.
    pub fn exempt_rarity(&self) -> Option<Rarity> {
        self.enchanted_every_color.then_some(Rarity::Enchanted)
    }
}

/// (group, canonical key) -> attributed color, for multicolor records only.
///
/// Read-only after [`assign_colors`] builds it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColorAssignments {
    map: HashMap<(String, String), String>,
}

impl ColorAssignments {
    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        // HashMap<(String, String), _> cannot be probed with a borrowed
        // pair, so this allocates; assignment lookups are not hot.
        self.map.get(&(group.to_string(), key.to_string())).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &String)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Attribute every non-exempt multicolor record to one of its two colors.
///
/// Records bucket by (group, sorted-lowercased color pair). Within a
/// bucket, canonical keys sort in string order (numeric order, given the
/// zero-padded format), the first `ceil(n / 2)` go to the alphabetically
/// first color and the rest to the second. Bucket sizes therefore differ
/// by at most one, and the result is a pure function of the collection.
///
/// Cards with more than two tags use the first two after sorting; further
/// tags are not modeled.
pub fn assign_colors(collection: &Collection, policy: &AssignPolicy) -> ColorAssignments {
    let mut buckets: BTreeMap<(String, String, String), Vec<String>> = BTreeMap::new();

    for (group, key, record) in collection.iter() {
        if !record.is_multicolor() {
            continue;
        }
        if policy.exempt_rarity() == Some(record.rarity) {
            continue;
        }
        let mut tags = record.colors_lower();
        tags.sort();
        let bucket = (group.to_string(), tags[0].clone(), tags[1].clone());
        buckets.entry(bucket).or_default().push(key.to_string());
    }

    let mut map = HashMap::new();
    for ((group, color1, color2), mut keys) in buckets {
        keys.sort();
        let split = keys.len().div_ceil(2);
        for (i, key) in keys.into_iter().enumerate() {
            let color = if i < split { color1.clone() } else { color2.clone() };
            map.insert((group.clone(), key), color);
        }
    }

    ColorAssignments { map }
}
