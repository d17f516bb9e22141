//! Missing-playset command.
//!
//! One sheet per rarity across every requested group, holding the cards
//! still short of four copies. The rarity is matched against the asset
//! filename's rarity token, cross-checking the two data sources.

use super::{
    build_context, metrics, report_selection, save_sheet, CommonArgs, EXIT_ERROR,
    EXIT_INVALID_ARGS, EXIT_SUCCESS,
};
use crate::compose::{render_sheet, BadgeMode, RenderOptions};
use crate::gallery::{select, Target};
use crate::models::Rarity;
use image::Rgba;
use std::process::ExitCode;

pub fn run_missing(common: &CommonArgs, rarity_arg: Option<&str>) -> ExitCode {
    let rarities: Vec<Rarity> = match rarity_arg {
        Some(raw) => match Rarity::parse(raw) {
            Some(r) => vec![r],
            None => {
                eprintln!("Error: unknown rarity '{}'", raw);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
        None => Rarity::ALL.to_vec(),
    };

    let ctx = match build_context(common) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let m = metrics(&ctx.config);
    let mut failed = false;

    for lang in &ctx.config.project.languages {
        let scan_root = ctx.scan_root(lang);

        for rarity in &rarities {
            let target = Target::MissingPlayset(Some(*rarity));
            let selection = match select(
                &scan_root,
                &ctx.groups,
                &target,
                &ctx.collection,
                &ctx.assignments,
                &ctx.policy,
            ) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            };
            report_selection(&selection, ctx.verbose);
            if selection.is_empty() {
                if ctx.verbose {
                    println!("No {} cards missing for playsets in {}, skipping", rarity.code(), lang);
                }
                continue;
            }

            let opts = RenderOptions {
                per_row: ctx.config.render.per_row,
                metrics: m,
                header_height: ctx.config.render.header_height,
                corner_radius: ctx.config.render.corner_radius,
                background: Rgba([255, 255, 255, 255]),
                header_text: Rgba([0, 0, 0, 255]),
                mark_completed: false,
                show_headers: true,
                badges: BadgeMode::MissingCount,
            };
            let (sheet, warnings) = render_sheet(&selection.groups, &opts, ctx.font.as_ref());
            for warning in &warnings {
                eprintln!("Warning: {}", warning.message);
            }

            let needed: u32 = selection
                .groups
                .iter()
                .flat_map(|g| g.items.iter())
                .map(|i| i.missing_for_playset())
                .sum();
            println!(
                "Copies needed for {} playset completion: {}",
                rarity.code(),
                needed
            );

            let name = format!("missing_playsets_{}", rarity.code());
            if !save_sheet(&sheet, &ctx.config.project.out, "missing_playset", lang, &name) {
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
