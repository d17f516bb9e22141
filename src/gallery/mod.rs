//! Gallery pass selection.
//!
//! A pass pairs a list of groups with a target predicate and yields, per
//! group, the ordered display items whose assets and inventory records
//! reconcile. Selection never mutates the collection or the color
//! assignments; re-running a pass with the same inputs yields the same
//! sequence.

pub mod discovery;

use crate::assign::{AssignPolicy, ColorAssignments};
use crate::inventory::Collection;
use crate::key::card_key;
use crate::models::{CardRecord, Group, Rarity, PLAYSET};
use discovery::{discover_assets, DiscoveryError};
use std::path::{Path, PathBuf};

/// What a pass selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every reconciled card
    All,
    /// Cards attributed to one color (lowercase name)
    Color(String),
    /// Cards short of a playset, optionally restricted to one rarity
    /// matched against the asset filename's rarity token
    MissingPlayset(Option<Rarity>),
}

/// A warning generated during selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

/// One card cleared for display in a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub group: String,
    pub key: String,
    pub path: PathBuf,
    pub name: String,
    pub rarity: Rarity,
    pub normal: u32,
    pub foil: u32,
    /// The single color this card is bucketed under: its sole color, its
    /// assignment entry, or the pass target for exempt-rarity cards.
    /// `None` when the pass does not bucket by color.
    pub color: Option<String>,
}

impl DisplayItem {
    pub fn total(&self) -> u32 {
        self.normal + self.foil
    }

    pub fn missing_for_playset(&self) -> u32 {
        PLAYSET.saturating_sub(self.total())
    }
}

/// Items for one group, in canonical-key order.
#[derive(Debug, Clone)]
pub struct GroupItems {
    pub group: Group,
    pub items: Vec<DisplayItem>,
}

/// Result of one selection pass.
#[derive(Debug, Default)]
pub struct Selection {
    /// Non-empty groups, in the order they were requested
    pub groups: Vec<GroupItems>,
    /// Assets whose key had no inventory record (key-equivalence misses)
    pub unmatched: usize,
    pub warnings: Vec<Warning>,
}

impl Selection {
    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }
}

/// Run one selection pass.
///
/// `assets_dir` holds one subdirectory of scans per group code. Groups
/// absent from the collection or without a scan directory contribute
/// nothing. Each discovered scan is normalized through the same key
/// function as the inventory side and looked up; misses are skipped,
/// counted and surfaced as warnings.
pub fn select(
    assets_dir: &Path,
    groups: &[Group],
    target: &Target,
    collection: &Collection,
    assignments: &ColorAssignments,
    policy: &AssignPolicy,
) -> Result<Selection, DiscoveryError> {
    let mut selection = Selection::default();

    for group in groups {
        let Some(records) = collection.group(&group.code) else {
            continue;
        };

        let assets = discover_assets(&assets_dir.join(&group.code))?;
        let mut items = Vec::new();

        for asset in assets {
            let key = card_key(group.kind, &asset.raw_key).key;
            let Some(record) = records.get(&key) else {
                selection.unmatched += 1;
                selection.warnings.push(Warning {
                    message: format!(
                        "asset '{}' has no inventory record under key '{}' in group {}",
                        asset.path.display(),
                        key,
                        group.code
                    ),
                });
                continue;
            };

            if let Target::MissingPlayset(Some(rarity)) = target {
                // Rarity is taken from the filename token here, not the
                // inventory field, as a cross-check between the sources.
                if asset.rarity_token.as_deref() != Some(rarity.code()) {
                    continue;
                }
            }

            let Some(color) = resolve_color(record, &group.code, &key, target, assignments, policy)
            else {
                continue;
            };

            if matches!(target, Target::MissingPlayset(_)) && record.total() >= PLAYSET {
                continue;
            }

            items.push(DisplayItem {
                group: group.code.clone(),
                key,
                path: asset.path,
                name: record.name.clone(),
                rarity: record.rarity,
                normal: record.normal,
                foil: record.foil,
                color,
            });
        }

        items.sort_by(|a, b| a.key.cmp(&b.key));
        if !items.is_empty() {
            selection.groups.push(GroupItems { group: group.clone(), items });
        }
    }

    Ok(selection)
}

/// Decide inclusion and the bucketing color for one record.
///
/// Returns `None` to exclude, `Some(color)` to include. The inner option
/// is the resolved single color; passes that do not bucket by color get
/// the record's sole color or its assignment entry when one exists.
fn resolve_color(
    record: &CardRecord,
    group: &str,
    key: &str,
    target: &Target,
    assignments: &ColorAssignments,
    policy: &AssignPolicy,
) -> Option<Option<String>> {
    match target {
        Target::All | Target::MissingPlayset(_) => Some(natural_color(record, group, key, assignments)),
        Target::Color(wanted) => {
            let colors = record.colors_lower();
            if record.is_multicolor() {
                if policy.exempt_rarity() == Some(record.rarity) {
                    // Exempt rarity shows up in every one of its colors
                    colors.contains(wanted).then(|| Some(wanted.clone()))
                } else {
                    (assignments.get(group, key) == Some(wanted.as_str()))
                        .then(|| Some(wanted.clone()))
                }
            } else {
                (colors.first() == Some(wanted)).then(|| Some(wanted.clone()))
            }
        }
    }
}

/// A record's color when no target forces one: its sole color, or its
/// assignment entry for multicolor records that have one.
fn natural_color(
    record: &CardRecord,
    group: &str,
    key: &str,
    assignments: &ColorAssignments,
) -> Option<String> {
    if record.is_multicolor() {
        assignments.get(group, key).map(str::to_string)
    } else {
        record.colors_lower().into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::assign_colors;
    use crate::inventory::parse_collection;
    use crate::models::GroupKind;
    use std::fs::File;
    use tempfile::TempDir;

    const HEADER: &str = "Name,Normal,Foil,Color,Rarity,Set,Card Number";

    fn groups() -> Vec<Group> {
        vec![Group::new("003", "Chapter Three", GroupKind::Numbered)]
    }

    fn collection_from(rows: &[&str]) -> Collection {
        let text = format!("{HEADER}\n{}", rows.join("\n"));
        parse_collection(&text, &groups()).expect("fixture should parse").collection
    }

    fn fixture(assets: &[&str], rows: &[&str]) -> (TempDir, Collection, ColorAssignments) {
        let temp = TempDir::new().unwrap();
        let group_dir = temp.path().join("003");
        std::fs::create_dir_all(&group_dir).unwrap();
        for name in assets {
            File::create(group_dir.join(name)).unwrap();
        }
        let collection = collection_from(rows);
        let assignments = assign_colors(&collection, &AssignPolicy::default());
        (temp, collection, assignments)
    }

    fn run(
        temp: &TempDir,
        target: Target,
        collection: &Collection,
        assignments: &ColorAssignments,
    ) -> Selection {
        select(
            temp.path(),
            &groups(),
            &target,
            collection,
            assignments,
            &AssignPolicy::default(),
        )
        .expect("selection should succeed")
    }

    #[test]
    fn test_all_includes_everything_reconciled() {
        let (temp, collection, assignments) = fixture(
            &["001_amber_CC_character.webp", "002_ruby_UC_song.webp"],
            &["A,1,0,Amber,Common,003,1", "B,0,0,Ruby,Uncommon,003,2"],
        );
        let selection = run(&temp, Target::All, &collection, &assignments);
        assert_eq!(selection.total_items(), 2);
        assert_eq!(selection.unmatched, 0);
    }

    #[test]
    fn test_unmatched_asset_skipped_and_counted() {
        let (temp, collection, assignments) = fixture(
            &["001_amber_CC_character.webp", "099_ruby_CC_character.webp"],
            &["A,1,0,Amber,Common,003,1"],
        );
        let selection = run(&temp, Target::All, &collection, &assignments);
        assert_eq!(selection.total_items(), 1);
        assert_eq!(selection.unmatched, 1);
        assert!(selection.warnings[0].message.contains("099"));
    }

    #[test]
    fn test_color_pass_single_color() {
        let (temp, collection, assignments) = fixture(
            &["001_amber_CC_character.webp", "002_ruby_UC_song.webp"],
            &["A,1,0,Amber,Common,003,1", "B,0,0,Ruby,Uncommon,003,2"],
        );
        let selection =
            run(&temp, Target::Color("amber".to_string()), &collection, &assignments);
        assert_eq!(selection.total_items(), 1);
        assert_eq!(selection.groups[0].items[0].key, "001");
        assert_eq!(selection.groups[0].items[0].color.as_deref(), Some("amber"));
    }

    #[test]
    fn test_color_pass_follows_assignment() {
        // Two amber/ruby cards split one each; only the assigned one shows
        let (temp, collection, assignments) = fixture(
            &["001_amber&ruby_CC_x.webp", "002_amber&ruby_CC_x.webp"],
            &["A,0,0,Amber Ruby,Common,003,1", "B,0,0,Amber Ruby,Common,003,2"],
        );
        let amber = run(&temp, Target::Color("amber".to_string()), &collection, &assignments);
        let ruby = run(&temp, Target::Color("ruby".to_string()), &collection, &assignments);

        assert_eq!(amber.total_items(), 1);
        assert_eq!(amber.groups[0].items[0].key, "001");
        assert_eq!(ruby.total_items(), 1);
        assert_eq!(ruby.groups[0].items[0].key, "002");
    }

    #[test]
    fn test_enchanted_multicolor_in_every_color() {
        let (temp, collection, assignments) = fixture(
            &["001_amber&ruby_EE_x.webp"],
            &["A,0,0,Amber Ruby,Enchanted,003,1"],
        );
        let amber = run(&temp, Target::Color("amber".to_string()), &collection, &assignments);
        let ruby = run(&temp, Target::Color("ruby".to_string()), &collection, &assignments);
        let steel = run(&temp, Target::Color("steel".to_string()), &collection, &assignments);

        assert_eq!(amber.total_items(), 1);
        assert_eq!(ruby.total_items(), 1);
        assert_eq!(steel.total_items(), 0);
    }

    #[test]
    fn test_missing_playset_threshold() {
        let (temp, collection, assignments) = fixture(
            &["001_amber_CC_x.webp", "002_amber_CC_x.webp"],
            &["Short,1,1,Amber,Common,003,1", "Done,3,1,Amber,Common,003,2"],
        );
        let selection = run(&temp, Target::MissingPlayset(None), &collection, &assignments);
        assert_eq!(selection.total_items(), 1);
        let item = &selection.groups[0].items[0];
        assert_eq!(item.key, "001");
        assert_eq!(item.missing_for_playset(), 2);
    }

    #[test]
    fn test_missing_playset_rarity_uses_filename_token() {
        // Inventory says Rare, the filename token says EE: the filename
        // wins for the rarity-filtered missing pass.
        let (temp, collection, assignments) = fixture(
            &["001_amber_EE_x.webp"],
            &["A,0,0,Amber,Rare,003,1"],
        );
        let enchanted = run(
            &temp,
            Target::MissingPlayset(Some(Rarity::Enchanted)),
            &collection,
            &assignments,
        );
        let rare =
            run(&temp, Target::MissingPlayset(Some(Rarity::Rare)), &collection, &assignments);

        assert_eq!(enchanted.total_items(), 1);
        assert_eq!(rare.total_items(), 0);
    }

    #[test]
    fn test_items_ordered_by_canonical_key() {
        let (temp, collection, assignments) = fixture(
            &["010_amber_CC_x.webp", "002_amber_CC_x.webp", "004a_amber_CC_x.webp"],
            &[
                "A,1,0,Amber,Common,003,10",
                "B,1,0,Amber,Common,003,2",
                "C,1,0,Amber,Common,003,4a",
            ],
        );
        let selection = run(&temp, Target::All, &collection, &assignments);
        let keys: Vec<&str> =
            selection.groups[0].items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["002", "004a", "010"]);
    }

    #[test]
    fn test_group_without_collection_entry_skipped() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("005")).unwrap();
        File::create(temp.path().join("005").join("001_amber_CC_x.webp")).unwrap();

        let collection = collection_from(&["A,1,0,Amber,Common,003,1"]);
        let assignments = assign_colors(&collection, &AssignPolicy::default());
        let selection = select(
            temp.path(),
            &[Group::new("005", "Chapter Five", GroupKind::Numbered)],
            &Target::All,
            &collection,
            &assignments,
            &AssignPolicy::default(),
        )
        .unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.unmatched, 0);
    }

    #[test]
    fn test_selection_restartable() {
        let (temp, collection, assignments) = fixture(
            &["001_amber_CC_x.webp", "002_ruby_CC_x.webp"],
            &["A,1,0,Amber,Common,003,1", "B,1,0,Ruby,Common,003,2"],
        );
        let first = run(&temp, Target::All, &collection, &assignments);
        let second = run(&temp, Target::All, &collection, &assignments);
        let keys = |s: &Selection| -> Vec<String> {
            s.groups.iter().flat_map(|g| g.items.iter().map(|i| i.key.clone())).collect()
        };
        assert_eq!(keys(&first), keys(&second));
    }
}
