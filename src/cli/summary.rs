//! Collection coverage summary, no rendering.

use super::{build_context, CommonArgs, EXIT_SUCCESS};
use crate::gallery::{select, Target};
use crate::models::PLAYSET;
use std::process::ExitCode;

pub fn run_summary(common: &CommonArgs) -> ExitCode {
    let ctx = match build_context(common) {
        Ok(c) => c,
        Err(code) => return code,
    };

    println!("Collection: {} cards", ctx.collection.len());
    println!("Multicolor assignments: {}", ctx.assignments.len());
    println!();

    let mut copies_needed: u64 = 0;
    for group in &ctx.groups {
        let Some(records) = ctx.collection.group(&group.code) else {
            continue;
        };
        let total = records.len();
        let owned = records.values().filter(|r| r.total() > 0).count();
        let complete = records.values().filter(|r| r.total() >= PLAYSET).count();
        let needed: u64 = records.values().map(|r| u64::from(r.missing_for_playset())).sum();
        copies_needed += needed;

        println!(
            "{:<4} {:<28} {:>4} cards  {:>4} owned  {:>4} playsets complete",
            group.code, group.name, total, owned, complete
        );
    }
    println!();
    println!("Copies needed for full playset completion: {}", copies_needed);

    for lang in &ctx.config.project.languages {
        let scan_root = ctx.scan_root(lang);
        match select(
            &scan_root,
            &ctx.groups,
            &Target::All,
            &ctx.collection,
            &ctx.assignments,
            &ctx.policy,
        ) {
            Ok(selection) => {
                println!(
                    "{}: {} assets reconciled, {} unmatched",
                    lang,
                    selection.total_items(),
                    selection.unmatched
                );
                if ctx.verbose {
                    for warning in &selection.warnings {
                        eprintln!("Warning: {}", warning.message);
                    }
                }
            }
            Err(e) => eprintln!("Warning: {}", e),
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
