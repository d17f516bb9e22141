//! Per-color gallery command.
//!
//! One sheet per (group, color), each on the color's background, with a
//! banner naming the group. Multicolor cards land in the color their
//! attribution assigned them; enchanted multicolors show in every one of
//! their colors when the policy says so.

use super::{build_context, metrics, report_selection, save_sheet, CommonArgs, EXIT_ERROR, EXIT_SUCCESS};
use crate::compose::{render_sheet, BadgeMode, RenderOptions};
use crate::gallery::{select, Target};
use image::Rgba;
use std::process::ExitCode;

pub fn run_colors(common: &CommonArgs) -> ExitCode {
    let ctx = match build_context(common) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let m = metrics(&ctx.config);
    let mut failed = false;

    for lang in &ctx.config.project.languages {
        let scan_root = ctx.scan_root(lang);

        for group in &ctx.groups {
            for color in &ctx.config.colors {
                let target = Target::Color(color.name.to_ascii_lowercase());
                let selection = match select(
                    &scan_root,
                    std::slice::from_ref(group),
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
                        println!("No cards for {} {} in {}, skipping", group.code, color.name, lang);
                    }
                    continue;
                }

                let opts = RenderOptions {
                    per_row: ctx.config.render.per_row,
                    metrics: m,
                    header_height: ctx.config.render.header_height,
                    corner_radius: ctx.config.render.corner_radius,
                    background: Rgba([color.rgb[0], color.rgb[1], color.rgb[2], 255]),
                    header_text: Rgba([255, 255, 255, 255]),
                    mark_completed: ctx.config.policy.mark_completed,
                    // A single group rendered in isolation gets its banner
                    show_headers: true,
                    badges: BadgeMode::OwnedCounts,
                };
                let (sheet, warnings) = render_sheet(&selection.groups, &opts, ctx.font.as_ref());
                for warning in &warnings {
                    eprintln!("Warning: {}", warning.message);
                }

                let missing_shown = selection
                    .groups
                    .iter()
                    .flat_map(|g| g.items.iter())
                    .filter(|i| i.total() == 0)
                    .count();

                let name = format!("{}_{}", group.code, color.name);
                if !save_sheet(&sheet, &ctx.config.project.out, "all_by_color", lang, &name) {
                    failed = true;
                }
                if missing_shown > 0 {
                    println!("Missing cards shown in {}: {}", name, missing_shown);
                }
            }
        }

        // Reconciliation summary: assets whose keys matched no record
        match select(
            &scan_root,
            &ctx.groups,
            &Target::All,
            &ctx.collection,
            &ctx.assignments,
            &ctx.policy,
        ) {
            Ok(all) if all.unmatched > 0 => {
                println!("Unmatched assets in '{}': {}", lang, all.unmatched);
            }
            Ok(_) => {}
            Err(e) => eprintln!("Warning: {}", e),
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
