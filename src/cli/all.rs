//! Combined gallery command: every reconciled card in one sheet.

use super::{build_context, metrics, report_selection, save_sheet, CommonArgs, EXIT_ERROR, EXIT_SUCCESS};
use crate::compose::{render_sheet, BadgeMode, RenderOptions};
use crate::gallery::{select, Target};
use image::Rgba;
use std::process::ExitCode;

pub fn run_all(common: &CommonArgs) -> ExitCode {
    let ctx = match build_context(common) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let m = metrics(&ctx.config);
    let mut failed = false;

    for lang in &ctx.config.project.languages {
        let scan_root = ctx.scan_root(lang);

        let selection = match select(
            &scan_root,
            &ctx.groups,
            &Target::All,
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
            println!("No reconciled cards in '{}', skipping", lang);
            continue;
        }

        let opts = RenderOptions {
            per_row: ctx.config.render.per_row,
            metrics: m,
            header_height: ctx.config.render.header_height,
            corner_radius: ctx.config.render.corner_radius,
            background: Rgba([50, 50, 50, 255]),
            header_text: Rgba([255, 255, 255, 255]),
            mark_completed: ctx.config.policy.mark_completed,
            // Groups rendered together are stacked without banners
            show_headers: false,
            badges: BadgeMode::OwnedCounts,
        };
        let (sheet, warnings) = render_sheet(&selection.groups, &opts, ctx.font.as_ref());
        for warning in &warnings {
            eprintln!("Warning: {}", warning.message);
        }

        if !save_sheet(&sheet, &ctx.config.project.out, "all_sets", lang, "all_cards") {
            failed = true;
        }
        if selection.unmatched > 0 {
            println!("Unmatched assets in '{}': {}", lang, selection.unmatched);
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
