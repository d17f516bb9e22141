//! Configuration schema for `folio.toml`.
//!
//! Every section has defaults matching the layout the collection tooling
//! has always used, so a missing config file still produces a working run.

use crate::models::{Group, GroupKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub project: ProjectConfig,
    pub groups: Vec<GroupConfig>,
    pub colors: Vec<ColorConfig>,
    pub render: RenderConfig,
    pub policy: PolicyConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            groups: default_groups(),
            colors: default_colors(),
            render: RenderConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

/// Directory layout and languages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Root of the scan library ({assets}/{lang}/webp/{group}/...)
    pub assets: PathBuf,
    /// Root for generated sheets
    pub out: PathBuf,
    pub languages: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("cards"),
            out: PathBuf::from("cards/output"),
            languages: vec!["en".to_string()],
        }
    }
}

/// One group (chapter or special set).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub code: String,
    pub name: String,
    /// Numbered chapters zero-pad card ids; special sets keep raw ids
    #[serde(default = "default_true")]
    pub numbered: bool,
}

/// One gallery color with its sheet background.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    pub name: String,
    pub rgb: [u8; 3],
}

/// Sheet geometry and the banner font.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub card_width: u32,
    pub card_height: u32,
    pub padding: u32,
    pub corner_radius: u32,
    pub header_height: u32,
    pub per_row: usize,
    pub font: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            card_width: 630,
            card_height: 880,
            padding: 50,
            corner_radius: 20,
            header_height: 210,
            per_row: 6,
            font: Some(PathBuf::from("assets/black.ttf")),
        }
    }
}

/// Output policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Show enchanted multicolor cards in every one of their colors
    /// instead of attributing them to a single bucket
    pub enchanted_every_color: bool,
    /// Tint completed playsets on ownership galleries
    pub mark_completed: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { enchanted_every_color: true, mark_completed: true }
    }
}

fn default_true() -> bool {
    true
}

impl FolioConfig {
    /// Groups as model values, config order preserved.
    pub fn group_list(&self) -> Vec<Group> {
        self.groups
            .iter()
            .map(|g| {
                let kind = if g.numbered { GroupKind::Numbered } else { GroupKind::Special };
                Group::new(g.code.clone(), g.name.clone(), kind)
            })
            .collect()
    }

    /// Validate the configuration, returning human-readable problems.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.project.languages.is_empty() {
            errors.push("project.languages must list at least one language".to_string());
        }
        if self.render.card_width == 0 || self.render.card_height == 0 {
            errors.push("render.card_width and render.card_height must be positive".to_string());
        }
        if self.render.per_row == 0 {
            errors.push("render.per_row must be at least 1".to_string());
        }
        if self.colors.is_empty() {
            errors.push("colors must list at least one color".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for group in &self.groups {
            if group.code.trim().is_empty() {
                errors.push("groups entries must have a non-empty code".to_string());
            } else if !seen.insert(group.code.as_str()) {
                errors.push(format!("duplicate group code '{}'", group.code));
            }
        }

        errors
    }
}

/// Built-in groups used when no config file is found.
pub fn default_groups() -> Vec<GroupConfig> {
    let chapters = [
        ("001", "1 - The First Chapter"),
        ("002", "2 - Rise of the Floodborn"),
        ("003", "3 - Into the Inklands"),
        ("004", "4 - Ursula's Return"),
        ("005", "5 - Shimmering Skies"),
        ("006", "6 - Azurite Sea"),
        ("007", "7 - Archazia's Island"),
    ];
    let specials = [
        ("C1", "Lorcana Challenge 1"),
        ("D23", "Disney D23"),
        ("P1", "Promo Cards Year 1"),
        ("P2", "Promo Cards Year 2"),
        ("Q1", "Ursula's Quest"),
    ];

    chapters
        .iter()
        .map(|(code, name)| GroupConfig {
            code: code.to_string(),
            name: name.to_string(),
            numbered: true,
        })
        .chain(specials.iter().map(|(code, name)| GroupConfig {
            code: code.to_string(),
            name: name.to_string(),
            numbered: false,
        }))
        .collect()
}

/// Built-in gallery colors with their sheet backgrounds.
pub fn default_colors() -> Vec<ColorConfig> {
    [
        ("amber", [211, 149, 45]),
        ("amethyst", [155, 89, 182]),
        ("emerald", [46, 204, 113]),
        ("ruby", [189, 66, 68]),
        ("sapphire", [35, 138, 175]),
        ("steel", [123, 131, 137]),
    ]
    .iter()
    .map(|(name, rgb)| ColorConfig { name: name.to_string(), rgb: *rgb })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_render_geometry() {
        let render = RenderConfig::default();
        assert_eq!(render.card_width, 630);
        assert_eq!(render.card_height, 880);
        assert_eq!(render.padding, 50);
        assert_eq!(render.per_row, 6);
    }

    #[test]
    fn test_group_list_maps_kinds() {
        let config = FolioConfig {
            groups: vec![
                GroupConfig { code: "003".into(), name: "Three".into(), numbered: true },
                GroupConfig { code: "P1".into(), name: "Promo".into(), numbered: false },
            ],
            ..Default::default()
        };
        let groups = config.group_list();
        assert_eq!(groups[0].kind, GroupKind::Numbered);
        assert_eq!(groups[1].kind, GroupKind::Special);
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut config = FolioConfig::default();
        config.colors = default_colors();
        config.render.per_row = 0;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("per_row")));
    }

    #[test]
    fn test_validate_rejects_duplicate_groups() {
        let mut config = FolioConfig::default();
        config.colors = default_colors();
        config.groups = vec![
            GroupConfig { code: "003".into(), name: "a".into(), numbered: true },
            GroupConfig { code: "003".into(), name: "b".into(), numbered: true },
        ];
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("duplicate group code")));
    }

    #[test]
    fn test_numbered_defaults_to_true_in_toml() {
        let config: FolioConfig = toml::from_str(
            r#"
[[groups]]
code = "008"
name = "8 - Next Chapter"
"#,
        )
        .expect("should parse");
        assert!(config.groups[0].numbered);
    }
}
