//! Row-major grid planning for gallery canvases.
//!
//! Pure functions over (item count, columns): no pixels, no I/O. The
//! compositing step consumes the computed offsets, which keeps the layout
//! arithmetic trivially unit-testable.

/// Fixed cell size and the padding used on all sides and between cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub cell_width: u32,
    pub cell_height: u32,
    pub padding: u32,
}

/// Top-left pixel offset for one item in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// A planned grid: canvas size and per-index placements, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Placement>,
}

/// Plan a row-major grid for `count` items at `per_row` columns.
///
/// Column index is `i % per_row`, row index `i / per_row`. The canvas is
/// sized to `min(per_row, count)` columns so a short only-row does not
/// reserve unused width, and to `ceil(count / per_row)` rows.
pub fn plan_grid(count: usize, per_row: usize, metrics: &CellMetrics) -> Grid {
    let per_row = per_row.max(1);
    let p = metrics.padding;

    if count == 0 {
        return Grid { width: 2 * p, height: 2 * p, cells: Vec::new() };
    }

    let columns = per_row.min(count) as u32;
    let rows = count.div_ceil(per_row) as u32;

    let width = (metrics.cell_width + p) * columns + p;
    let height = (metrics.cell_height + p) * rows + p;

    let cells = (0..count)
        .map(|i| {
            let col = (i % per_row) as u32;
            let row = (i / per_row) as u32;
            Placement {
                x: p + col * (metrics.cell_width + p),
                y: p + row * (metrics.cell_height + p),
            }
        })
        .collect();

    Grid { width, height, cells }
}

/// Vertical offsets for stacking blocks of the given heights with `gap`
/// pixels between them. Returns (total height, per-block y offsets).
pub fn stack_offsets(heights: &[u32], gap: u32) -> (u32, Vec<u32>) {
    let mut offsets = Vec::with_capacity(heights.len());
    let mut y = 0u32;
    for (i, h) in heights.iter().enumerate() {
        if i > 0 {
            y += gap;
        }
        offsets.push(y);
        y += h;
    }
    (y, offsets)
}
