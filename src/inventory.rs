//! Inventory export parsing and the collection index.
//!
//! The export is a tabular file with columns Name, Normal, Foil, Color,
//! Rarity, Set and Card Number. Delimiters vary between exporters, so the
//! delimiter is sniffed from the header line. Malformed rows are skipped
//! with a collected warning; an export that yields no records at all is
//! fatal since nothing downstream is meaningful without it.

use crate::key::card_key;
use crate::models::{CardRecord, Group, GroupKind, Rarity};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Columns the export must provide.
const EXPECTED_COLUMNS: [&str; 7] =
    ["Name", "Normal", "Foil", "Color", "Rarity", "Set", "Card Number"];

/// Delimiters the sniffer considers, comma first as the fallback.
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Error loading the inventory. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read inventory: {0}")]
    Io(#[from] std::io::Error),
    #[error("inventory is missing expected columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("inventory contained no usable rows")]
    Empty,
}

/// A warning generated while parsing the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}

/// Result of loading an inventory export.
#[derive(Debug)]
pub struct LoadResult {
    pub collection: Collection,
    pub warnings: Vec<Warning>,
}

/// The collection index: group code -> canonical key -> record.
///
/// Built once per run, read-only afterwards. `BTreeMap` keeps keys in
/// canonical-key order, which is the display order of every output pass.
#[derive(Debug, Default)]
pub struct Collection {
    groups: BTreeMap<String, BTreeMap<String, CardRecord>>,
}

impl Collection {
    pub fn group(&self, code: &str) -> Option<&BTreeMap<String, CardRecord>> {
        self.groups.get(code)
    }

    pub fn get(&self, group: &str, key: &str) -> Option<&CardRecord> {
        self.groups.get(group).and_then(|cards| cards.get(key))
    }

    pub fn groups(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, CardRecord>)> {
        self.groups.iter()
    }

    /// Iterate every record as (group, key, record), ordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &CardRecord)> {
        self.groups.iter().flat_map(|(group, cards)| {
            cards.iter().map(move |(key, record)| (group.as_str(), key.as_str(), record))
        })
    }

    /// Total record count across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, group: String, key: String, record: CardRecord) {
        // Last write wins on duplicate keys: a later export row supersedes
        // an earlier one for the same card.
        self.groups.entry(group).or_default().insert(key, record);
    }
}

/// Load and index an inventory export file.
pub fn load_collection(path: &Path, groups: &[Group]) -> Result<LoadResult, InventoryError> {
    let text = fs::read_to_string(path)?;
    parse_collection(&text, groups)
}

/// Parse inventory text into a collection index.
///
/// The first line is the header; the delimiter is sniffed from it. Rows
/// with missing required fields or unparseable counts are skipped with a
/// warning. Duplicate (group, key) pairs resolve last-write-wins.
pub fn parse_collection(text: &str, groups: &[Group]) -> Result<LoadResult, InventoryError> {
    let mut warnings = Vec::new();
    let mut lines = text.lines();

    let header_line = match lines.next() {
        Some(h) if !h.trim().is_empty() => h,
        _ => return Err(InventoryError::Empty),
    };

    let delimiter = match sniff_delimiter(header_line) {
        Some(d) => d,
        None => {
            warnings.push(Warning {
                message: "could not detect delimiter, assuming comma".to_string(),
                line: 1,
            });
            ','
        }
    };

    let header: Vec<String> = split_row(header_line, delimiter)
        .into_iter()
        .map(|cell| cell.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut columns = HashMap::new();
    for (idx, name) in header.iter().enumerate() {
        columns.entry(name.as_str()).or_insert(idx);
    }

    let missing: Vec<String> = EXPECTED_COLUMNS
        .iter()
        .filter(|c| !columns.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(InventoryError::MissingColumns(missing));
    }

    let kinds: HashMap<&str, GroupKind> =
        groups.iter().map(|g| (g.code.as_str(), g.kind)).collect();
    let mut inferred_codes: HashSet<String> = HashSet::new();

    let mut collection = Collection::default();

    for (offset, line) in lines.enumerate() {
        let line_no = offset + 2;
        if line.trim().is_empty() {
            continue;
        }

        let cells = split_row(line, delimiter);

        let name = field_of(&columns, &cells, "Name");
        let set_code = field_of(&columns, &cells, "Set");
        let number = field_of(&columns, &cells, "Card Number");
        if name.is_empty() || set_code.is_empty() || number.is_empty() {
            warnings.push(Warning {
                message: "row is missing name, set or card number".to_string(),
                line: line_no,
            });
            continue;
        }

        let normal = parse_count(field_of(&columns, &cells, "Normal"));
        let foil = parse_count(field_of(&columns, &cells, "Foil"));
        let (normal, foil) = match (normal, foil) {
            (Some(n), Some(f)) => (n, f),
            _ => {
                warnings.push(Warning {
                    message: format!("row for '{name}' has unparseable counts"),
                    line: line_no,
                });
                continue;
            }
        };

        let raw_rarity = field_of(&columns, &cells, "Rarity");
        let rarity = match Rarity::parse(raw_rarity) {
            Some(r) => r,
            None => {
                warnings.push(Warning {
                    message: format!("row for '{name}' has unknown rarity '{raw_rarity}'"),
                    line: line_no,
                });
                continue;
            }
        };

        let colors: Vec<String> = field_of(&columns, &cells, "Color")
            .split_whitespace()
            .map(|c| c.to_string())
            .collect();

        let kind = match kinds.get(set_code) {
            Some(&k) => k,
            None => {
                if inferred_codes.insert(set_code.to_string()) {
                    warnings.push(Warning {
                        message: format!("set '{set_code}' is not configured, inferring its kind"),
                        line: line_no,
                    });
                }
                Group::infer_kind(set_code)
            }
        };

        let normalized = card_key(kind, number);
        if let Some(key_warning) = &normalized.warning {
            warnings.push(Warning {
                message: format!("set '{set_code}': {key_warning}"),
                line: line_no,
            });
        }

        collection.insert(
            set_code.to_string(),
            normalized.key,
            CardRecord { name: name.to_string(), normal, foil, colors, rarity },
        );
    }

    if collection.is_empty() {
        return Err(InventoryError::Empty);
    }

    Ok(LoadResult { collection, warnings })
}

/// Cell for a named column, trimmed; empty when the row is short.
fn field_of<'a>(columns: &HashMap<&str, usize>, cells: &'a [String], name: &str) -> &'a str {
    columns.get(name).and_then(|&i| cells.get(i)).map_or("", |c| c.trim())
}

/// An empty count cell means zero.
fn parse_count(cell: &str) -> Option<u32> {
    if cell.is_empty() {
        Some(0)
    } else {
        cell.parse().ok()
    }
}

/// Pick the candidate delimiter that appears most often in the header,
/// outside quoted cells. Returns `None` when none appears at all.
fn sniff_delimiter(header: &str) -> Option<char> {
    let mut best = None;
    for candidate in CANDIDATE_DELIMITERS {
        let mut in_quotes = false;
        let count = header
            .chars()
            .filter(|&ch| {
                if ch == '"' {
                    in_quotes = !in_quotes;
                }
                ch == candidate && !in_quotes
            })
            .count();
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((candidate, count));
        }
    }
    best.map(|(delim, _)| delim)
}

/// Split one row on the delimiter, honoring double-quoted cells.
/// A doubled quote inside a quoted cell is an escaped quote.
fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            c if c == delimiter && !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    cells.push(current);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupKind;

    fn test_groups() -> Vec<Group> {
        vec![
            Group::new("003", "Chapter Three", GroupKind::Numbered),
            Group::new("P1", "Promo Year 1", GroupKind::Special),
        ]
    }

    const HEADER: &str = "Name,Normal,Foil,Color,Rarity,Set,Card Number";

    fn parse(rows: &[&str]) -> LoadResult {
        let text = format!("{HEADER}\n{}", rows.join("\n"));
        parse_collection(&text, &test_groups()).expect("should parse")
    }

    #[test]
    fn test_basic_row_indexed_under_canonical_key() {
        let result = parse(&["Elsa,2,1,Amethyst,Rare,003,4"]);
        let record = result.collection.get("003", "004").expect("record under padded key");
        assert_eq!(record.name, "Elsa");
        assert_eq!(record.normal, 2);
        assert_eq!(record.foil, 1);
        assert_eq!(record.rarity, Rarity::Rare);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_color_tokens_split_on_whitespace() {
        let result = parse(&["Mulan,1,0,Amber Ruby,Uncommon,003,12"]);
        let record = result.collection.get("003", "012").unwrap();
        assert_eq!(record.colors, vec!["Amber", "Ruby"]);
        assert!(record.is_multicolor());
    }

    #[test]
    fn test_semicolon_delimiter_sniffed() {
        let text = "Name;Normal;Foil;Color;Rarity;Set;Card Number\nAriel;1;0;Ruby;Common;003;9";
        let result = parse_collection(text, &test_groups()).unwrap();
        assert!(result.collection.get("003", "009").is_some());
    }

    #[test]
    fn test_tab_and_pipe_delimiters_sniffed() {
        let tab = "Name\tNormal\tFoil\tColor\tRarity\tSet\tCard Number\nAriel\t1\t0\tRuby\tCommon\t003\t9";
        assert!(parse_collection(tab, &test_groups()).is_ok());

        let pipe = "Name|Normal|Foil|Color|Rarity|Set|Card Number\nAriel|1|0|Ruby|Common|003|9";
        assert!(parse_collection(pipe, &test_groups()).is_ok());
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let text = "\u{feff}Name,Normal,Foil,Color,Rarity,Set,Card Number\nAriel,1,0,Ruby,Common,003,9";
        let result = parse_collection(text, &test_groups()).unwrap();
        assert!(result.collection.get("003", "009").is_some());
    }

    #[test]
    fn test_quoted_cell_with_delimiter() {
        let result = parse(&["\"Hades, Lord of the Dead\",0,1,Steel,Legendary,003,100"]);
        let record = result.collection.get("003", "100").unwrap();
        assert_eq!(record.name, "Hades, Lord of the Dead");
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let result = parse(&[
            "Elsa,1,0,Amethyst,Rare,003,4",
            "Elsa,3,1,Amethyst,Rare,003,4",
        ]);
        let record = result.collection.get("003", "004").unwrap();
        assert_eq!(record.normal, 3);
        assert_eq!(result.collection.len(), 1);
    }

    #[test]
    fn test_missing_fields_skip_row_with_warning() {
        let result = parse(&[
            ",1,0,Ruby,Common,003,9",
            "Ariel,1,0,Ruby,Common,003,10",
        ]);
        assert_eq!(result.collection.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 2);
    }

    #[test]
    fn test_unparseable_count_skips_row() {
        let result = parse(&[
            "Ariel,many,0,Ruby,Common,003,9",
            "Belle,1,0,Amber,Common,003,10",
        ]);
        assert_eq!(result.collection.len(), 1);
        assert!(result.warnings[0].message.contains("unparseable counts"));
    }

    #[test]
    fn test_empty_counts_default_to_zero() {
        let result = parse(&["Ariel,,,Ruby,Common,003,9"]);
        let record = result.collection.get("003", "009").unwrap();
        assert_eq!(record.total(), 0);
    }

    #[test]
    fn test_unknown_rarity_skips_row() {
        let result = parse(&[
            "Ariel,1,0,Ruby,Mythic,003,9",
            "Belle,1,0,Amber,Common,003,10",
        ]);
        assert!(result.collection.get("003", "009").is_none());
        assert!(result.warnings[0].message.contains("unknown rarity"));
        assert_eq!(result.collection.len(), 1);
    }

    #[test]
    fn test_unknown_rarity_only_rows_is_fatal() {
        let text = format!("{HEADER}\nAriel,1,0,Ruby,Mythic,003,9");
        assert!(matches!(
            parse_collection(&text, &test_groups()),
            Err(InventoryError::Empty)
        ));
    }

    #[test]
    fn test_special_group_key_unpadded() {
        let result = parse(&["Mickey,0,0,Steel,Special,P1,17"]);
        assert!(result.collection.get("P1", "17").is_some());
    }

    #[test]
    fn test_unconfigured_group_kind_inferred() {
        let result = parse(&["Mickey,0,0,Steel,Special,D23,6"]);
        // "D23" is not configured; inferred special, so the key stays raw
        assert!(result.collection.get("D23", "6").is_some());
        assert!(result.warnings.iter().any(|w| w.message.contains("not configured")));
    }

    #[test]
    fn test_missing_columns_fatal() {
        let text = "Name,Normal,Foil\nAriel,1,0";
        match parse_collection(text, &test_groups()) {
            Err(InventoryError::MissingColumns(missing)) => {
                assert!(missing.contains(&"Color".to_string()));
                assert!(missing.contains(&"Card Number".to_string()));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_fatal() {
        assert!(matches!(parse_collection("", &test_groups()), Err(InventoryError::Empty)));
        assert!(matches!(parse_collection(HEADER, &test_groups()), Err(InventoryError::Empty)));
    }

    #[test]
    fn test_key_fallback_warning_carries_line() {
        let result = parse(&["Odd,1,0,Ruby,Common,003,x-y"]);
        assert!(result.warnings.iter().any(|w| w.line == 2 && w.message.contains("x-y")));
        // The record is still indexed under the raw value
        assert!(result.collection.get("003", "x-y").is_some());
    }
}
