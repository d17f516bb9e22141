//! Gallery sheet compositing.
//!
//! Consumes the placements computed by [`crate::layout`] and produces one
//! RGBA canvas per pass: card cells pasted row-major, ownership tints,
//! count badges and an optional header banner per group, with multiple
//! groups stacked vertically.

use crate::gallery::GroupItems;
use crate::layout::{plan_grid, stack_offsets, CellMetrics};
use ab_glyph::{FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_text_mut, text_size};
use std::path::Path;
use thiserror::Error;

/// Tint over cards with no owned copy
const MISSING_TINT: Rgba<u8> = Rgba([155, 110, 110, 160]);
/// Tint over completed playsets when marking is enabled
const COMPLETED_TINT: Rgba<u8> = Rgba([110, 155, 110, 160]);
/// Badge disc color
const BADGE_FILL: Rgba<u8> = Rgba([20, 20, 20, 190]);
const BADGE_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);

const COUNT_TEXT_PX: f32 = 50.0;
const MISSING_TEXT_PX: f32 = 100.0;
const HEADER_TEXT_PX: f32 = 180.0;

/// Error loading a header/badge font.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file: {0}")]
    Io(#[from] std::io::Error),
    #[error("font file is not a valid TrueType font")]
    Invalid,
}

/// A warning generated while compositing (an unreadable scan).
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

/// Which badge a cell carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeMode {
    /// Normal and foil counts, top-right (ownership galleries)
    OwnedCounts,
    /// Copies still needed, top-right (missing-playset sheets)
    MissingCount,
}

/// Knobs for one rendered sheet.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub per_row: usize,
    pub metrics: CellMetrics,
    pub header_height: u32,
    pub corner_radius: u32,
    pub background: Rgba<u8>,
    pub header_text: Rgba<u8>,
    /// Tint completed playsets green
    pub mark_completed: bool,
    /// Prepend a banner with the group display name ahead of each grid
    pub show_headers: bool,
    pub badges: BadgeMode,
}

/// Load a TrueType font for banners and badges.
pub fn load_font(path: &Path) -> Result<FontVec, FontError> {
    let bytes = std::fs::read(path)?;
    FontVec::try_from_vec(bytes).map_err(|_| FontError::Invalid)
}

/// Render the sections of one pass into a single sheet.
///
/// Sections stack vertically, left-aligned, separated by the padding
/// constant. Text (banners, badges) is skipped when no font is
/// available; the caller decides whether that is worth reporting.
pub fn render_sheet(
    sections: &[GroupItems],
    opts: &RenderOptions,
    font: Option<&FontVec>,
) -> (RgbaImage, Vec<Warning>) {
    let mut warnings = Vec::new();
    let mut blocks: Vec<RgbaImage> = Vec::new();
    for section in sections {
        let grid = render_group_grid(section, opts, font, &mut warnings);
        if opts.show_headers {
            if let Some(f) = font {
                blocks.push(render_header(&section.group.name, grid.width(), opts, f));
            }
        }
        blocks.push(grid);
    }

    if blocks.is_empty() {
        return (RgbaImage::from_pixel(1, 1, opts.background), warnings);
    }
    if blocks.len() == 1 {
        let only = blocks.pop().unwrap_or_else(|| RgbaImage::from_pixel(1, 1, opts.background));
        return (only, warnings);
    }

    let heights: Vec<u32> = blocks.iter().map(RgbaImage::height).collect();
    let (total_height, offsets) = stack_offsets(&heights, opts.metrics.padding);
    let max_width = blocks.iter().map(RgbaImage::width).max().unwrap_or(1);

    let mut sheet = RgbaImage::from_pixel(max_width, total_height, opts.background);
    for (block, y) in blocks.iter().zip(offsets) {
        imageops::overlay(&mut sheet, block, 0, i64::from(y));
    }
    (sheet, warnings)
}

/// Render one group's items into a grid canvas.
fn render_group_grid(
    section: &GroupItems,
    opts: &RenderOptions,
    font: Option<&FontVec>,
    warnings: &mut Vec<Warning>,
) -> RgbaImage {
    let m = &opts.metrics;
    let grid = plan_grid(section.items.len(), opts.per_row, m);
    let mut canvas = RgbaImage::from_pixel(grid.width, grid.height, opts.background);

    for (item, placement) in section.items.iter().zip(&grid.cells) {
        let scan = match image::open(&item.path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                warnings.push(Warning {
                    message: format!("cannot open scan '{}': {}", item.path.display(), e),
                });
                continue;
            }
        };

        let mut cell = imageops::resize(&scan, m.cell_width, m.cell_height, FilterType::Lanczos3);
        round_corners(&mut cell, opts.corner_radius);

        let total = item.total();
        if total == 0 {
            tint(&mut cell, MISSING_TINT);
        } else if total >= crate::models::PLAYSET && opts.mark_completed {
            tint(&mut cell, COMPLETED_TINT);
        }

        if let Some(f) = font {
            match opts.badges {
                BadgeMode::OwnedCounts => {
                    if total > 0 {
                        let x = m.cell_width as i32 - 60;
                        draw_badge(&mut cell, (x, 60), 45, COUNT_TEXT_PX, &item.normal.to_string(), f);
                        draw_badge(&mut cell, (x, 170), 45, COUNT_TEXT_PX, &item.foil.to_string(), f);
                    }
                }
                BadgeMode::MissingCount => {
                    let x = m.cell_width as i32 - 90;
                    let needed = item.missing_for_playset().to_string();
                    draw_badge(&mut cell, (x, 90), 70, MISSING_TEXT_PX, &needed, f);
                }
            }
        }

        imageops::overlay(&mut canvas, &cell, i64::from(placement.x), i64::from(placement.y));
    }

    canvas
}

/// Render the banner block carrying a group's display name.
fn render_header(name: &str, width: u32, opts: &RenderOptions, font: &FontVec) -> RgbaImage {
    let mut banner = RgbaImage::from_pixel(width, opts.header_height, opts.background);
    let scale = PxScale::from(HEADER_TEXT_PX);
    let text = format!("{name}:");
    draw_text_mut(&mut banner, opts.header_text, opts.metrics.padding as i32, 5, scale, font, &text);
    banner
}

/// Draw a count disc with centered text.
fn draw_badge(
    cell: &mut RgbaImage,
    center: (i32, i32),
    radius: i32,
    text_px: f32,
    text: &str,
    font: &FontVec,
) {
    draw_filled_circle_mut(cell, center, radius, BADGE_FILL);
    let scale = PxScale::from(text_px);
    let (tw, th) = text_size(scale, font, text);
    let x = center.0 - (tw as i32) / 2;
    let y = center.1 - (th as i32) / 2;
    draw_text_mut(cell, BADGE_TEXT, x, y, scale, font, text);
}

/// Alpha-composite a translucent tint over the whole cell.
fn tint(cell: &mut RgbaImage, color: Rgba<u8>) {
    let overlay = RgbaImage::from_pixel(cell.width(), cell.height(), color);
    imageops::overlay(cell, &overlay, 0, 0);
}

/// Zero the alpha outside quarter-circles in each corner.
fn round_corners(img: &mut RgbaImage, radius: u32) {
    let (w, h) = img.dimensions();
    let r = radius.min(w / 2).min(h / 2);
    if r == 0 {
        return;
    }
    let rf = r as f32;
    for dy in 0..r {
        for dx in 0..r {
            let fx = rf - 0.5 - dx as f32;
            let fy = rf - 0.5 - dy as f32;
            if (fx * fx + fy * fy).sqrt() > rf {
                for (x, y) in
                    [(dx, dy), (w - 1 - dx, dy), (dx, h - 1 - dy), (w - 1 - dx, h - 1 - dy)]
                {
                    img.get_pixel_mut(x, y).0[3] = 0;
                }
            }
        }
    }
}
