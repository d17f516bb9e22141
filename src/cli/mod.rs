//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod all;
mod colors;
mod missing;
mod summary;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::assign::{assign_colors, AssignPolicy, ColorAssignments};
use crate::compose;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, FolioConfig};
use crate::inventory::{load_collection, Collection};
use crate::models::Group;
use ab_glyph::FontVec;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Subdirectory of the scan library holding the per-group scan folders.
pub(crate) const SCAN_SUBDIR: &str = "webp";

/// Cardfolio - reconcile a collection export with card scans and render gallery sheets
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Cardfolio - render collection gallery sheets from an inventory export")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by every rendering command.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Inventory export file
    #[arg(short, long, default_value = "export.csv")]
    pub inventory: PathBuf,

    /// Config file (default: discovered folio.toml, else built-in defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scan library root (overrides config)
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Output root (overrides config)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Restrict the run to one language
    #[arg(long)]
    pub lang: Option<String>,

    /// Cards per sheet row (overrides config)
    #[arg(long)]
    pub per_row: Option<usize>,

    /// Banner/badge font file (overrides config)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Only process these group codes (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Print per-asset reconciliation detail
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one gallery sheet per (group, color)
    Colors {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Render missing-playset sheets across all groups, one per rarity
    Missing {
        #[command(flatten)]
        common: CommonArgs,

        /// Restrict to one rarity code (CC, UC, RR, SR, LL, EE, SP)
        #[arg(short, long)]
        rarity: Option<String>,
    },

    /// Render one combined gallery of every group
    All {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print collection coverage without rendering
    Summary {
        #[command(flatten)]
        common: CommonArgs,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Colors { common } => colors::run_colors(&common),
        Commands::Missing { common, rarity } => missing::run_missing(&common, rarity.as_deref()),
        Commands::All { common } => all::run_all(&common),
        Commands::Summary { common } => summary::run_summary(&common),
    }
}

/// Everything a pass needs, built once per command invocation.
pub(crate) struct PassContext {
    pub config: FolioConfig,
    /// Groups the run covers, config order, after any --groups filter
    pub groups: Vec<Group>,
    pub collection: Collection,
    pub assignments: ColorAssignments,
    pub policy: AssignPolicy,
    pub font: Option<FontVec>,
    pub verbose: bool,
}

impl PassContext {
    /// Scan directory for one language ({assets}/{lang}/webp).
    pub fn scan_root(&self, lang: &str) -> PathBuf {
        self.config.project.assets.join(lang).join(SCAN_SUBDIR)
    }
}

/// Load config, inventory and assignments for a command. Failures print
/// an error and convert to an exit code.
pub(crate) fn build_context(common: &CommonArgs) -> Result<PassContext, ExitCode> {
    let mut config = match load_config(common.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    let overrides = CliOverrides {
        assets: common.assets.clone(),
        out: common.out.clone(),
        lang: common.lang.clone(),
        per_row: common.per_row,
        font: common.font.clone(),
    };
    merge_cli_overrides(&mut config, &overrides);

    let all_groups = config.group_list();
    let groups = if common.groups.is_empty() {
        all_groups.clone()
    } else {
        let mut filtered = Vec::new();
        for code in &common.groups {
            match all_groups.iter().find(|g| &g.code == code) {
                Some(g) => filtered.push(g.clone()),
                None => {
                    eprintln!("Error: unknown group code '{}'", code);
                    return Err(ExitCode::from(EXIT_INVALID_ARGS));
                }
            }
        }
        filtered
    };

    let loaded = match load_collection(&common.inventory, &all_groups) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    for warning in &loaded.warnings {
        eprintln!("Warning: line {}: {}", warning.line, warning.message);
    }

    let policy = AssignPolicy {
        enchanted_every_color: config.policy.enchanted_every_color,
    };
    let assignments = assign_colors(&loaded.collection, &policy);

    let font = match &config.render.font {
        Some(path) => match compose::load_font(path) {
            Ok(f) => Some(f),
            Err(e) => {
                eprintln!(
                    "Warning: cannot load font '{}': {}. Banners and badges will be skipped.",
                    path.display(),
                    e
                );
                None
            }
        },
        None => None,
    };

    Ok(PassContext {
        config,
        groups,
        collection: loaded.collection,
        assignments,
        policy,
        font,
        verbose: common.verbose,
    })
}

/// Cell metrics from the render config.
pub(crate) fn metrics(config: &FolioConfig) -> crate::layout::CellMetrics {
    crate::layout::CellMetrics {
        cell_width: config.render.card_width,
        cell_height: config.render.card_height,
        padding: config.render.padding,
    }
}

/// Surface selection warnings (lookup misses are debug-level detail).
pub(crate) fn report_selection(selection: &crate::gallery::Selection, verbose: bool) {
    if verbose {
        for warning in &selection.warnings {
            eprintln!("Warning: {}", warning.message);
        }
    }
}

/// Save one rendered sheet as PNG and WebP. Returns false when the PNG
/// write failed; a WebP failure only warns, matching the PNG being the
/// canonical output.
pub(crate) fn save_sheet(
    sheet: &image::RgbaImage,
    out_root: &Path,
    pass: &str,
    lang: &str,
    name: &str,
) -> bool {
    let (png_path, webp_path) = crate::output::pass_paths(out_root, pass, lang, name);

    if let Err(e) = crate::output::save_png(sheet, &png_path) {
        eprintln!("Error: failed to save '{}': {}", png_path.display(), e);
        return false;
    }
    println!("Image saved: {}", png_path.display());

    if let Err(e) = crate::output::save_webp(sheet, &webp_path) {
        eprintln!("Warning: failed to save '{}': {}", webp_path.display(), e);
    }
    true
}
