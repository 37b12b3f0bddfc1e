//! Cell location: mapping mask regions to (day, hour-slot) coordinates.
//!
//! Two interchangeable strategies implement the same contract:
//!
//! - **Contour mode** ([`locate_contours`]): label connected regions of
//!   the mask, drop those below the noise floor, and classify each
//!   region against the grid geometry (horizontal center for the day
//!   column, top covered cell for the start row).
//! - **Fixed-grid mode** ([`locate_fixed_grid`]): partition the image
//!   into the configured column/row counts and call a cell occupied
//!   when enough of its pixels are mask-true. Consecutive occupied
//!   cells in a column are coalesced into one span so a two-hour class
//!   yields one region, not two unrelated ones.
//!
//! Both produce [`LocatedRegion`] values; downstream stages never care
//! which strategy ran.

use crate::config::GridLayout;
use crate::models::GridCell;
use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashMap;

/// A mask region classified into a grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Mask-true pixels inside the region (actual area, not `w*h`).
    pub area: u32,
    /// Cell of the region's top row.
    pub cell: GridCell,
    /// Consecutive grid rows covered.
    pub row_span: usize,
}

#[derive(Debug, Clone, Copy)]
struct RegionAcc {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    count: u32,
}

impl RegionAcc {
    fn seed(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            count: 1,
        }
    }

    fn absorb(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.count += 1;
    }
}

/// Contour-mode location: connected regions above the noise floor.
pub fn locate_contours(mask: &GrayImage, layout: &GridLayout) -> Vec<LocatedRegion> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));
    let mut regions: HashMap<u32, RegionAcc> = HashMap::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let id = label.0[0];
        if id == 0 {
            continue;
        }
        regions
            .entry(id)
            .and_modify(|acc| acc.absorb(x, y))
            .or_insert_with(|| RegionAcc::seed(x, y));
    }

    let min_w = (layout.min_region_width_frac * width as f32) as u32;
    let min_h = (layout.min_region_height_frac * height as f32) as u32;
    let rows_per_day = layout.rows_per_day();
    let cell_height = height as f32 * (1.0 - layout.header_fraction) / rows_per_day as f32;

    let mut located: Vec<LocatedRegion> = regions
        .into_values()
        .filter_map(|acc| {
            let w = acc.max_x - acc.min_x + 1;
            let h = acc.max_y - acc.min_y + 1;
            if w < min_w || h < min_h {
                return None; // noise
            }

            let x_c = acc.min_x as f32 + w as f32 / 2.0;
            // Classify against the center of the topmost covered cell,
            // not the box center: for blocks spanning several rows the
            // box center lands in a middle row, while `cell` must name
            // the top row.
            let y_top = acc.min_y as f32 + cell_height / 2.0;

            let day = ((x_c / width as f32) * layout.columns as f32).floor() as i64 - 1;
            let row = (((y_top / height as f32) - layout.header_fraction) * rows_per_day as f32)
                .floor() as i64;
            if day < 0 || day >= layout.day_count as i64 || row < 0 || row >= rows_per_day as i64
            {
                tracing::debug!(day, row, "region center outside the grid, dropping");
                return None;
            }

            let row_span = ((h as f32 / cell_height).round() as usize).max(1);
            Some(LocatedRegion {
                x: acc.min_x,
                y: acc.min_y,
                width: w,
                height: h,
                area: acc.count,
                cell: GridCell {
                    row: row as usize,
                    column: day as usize,
                },
                row_span,
            })
        })
        .collect();

    // Deterministic output regardless of label order.
    located.sort_by_key(|r| (r.cell.column, r.cell.row, r.x, r.y));
    located
}

/// Fixed-grid location: per-cell occupancy with column-span coalescing.
pub fn locate_fixed_grid(mask: &GrayImage, layout: &GridLayout) -> Vec<LocatedRegion> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let x0 = layout.left_fraction * width as f32;
    let y0 = layout.header_fraction * height as f32;
    let col_w = (width as f32 - x0) / layout.day_count as f32;
    let rows_per_day = layout.rows_per_day();
    let row_h = (height as f32 - y0) / rows_per_day as f32;
    if col_w <= 0.0 || row_h <= 0.0 {
        return Vec::new();
    }

    let cell_bounds = |column: usize, row: usize| -> (u32, u32, u32, u32) {
        let left = (x0 + column as f32 * col_w) as u32;
        let top = (y0 + row as f32 * row_h) as u32;
        let right = ((x0 + (column + 1) as f32 * col_w) as u32).min(width);
        let bottom = ((y0 + (row + 1) as f32 * row_h) as u32).min(height);
        (left, top, right, bottom)
    };

    let mut located = Vec::new();
    for column in 0..layout.day_count {
        let occupancy: Vec<Option<u32>> = (0..rows_per_day)
            .map(|row| {
                let (left, top, right, bottom) = cell_bounds(column, row);
                let total = (right - left) as u64 * (bottom - top) as u64;
                if total == 0 {
                    return None;
                }
                let mut on = 0u32;
                for y in top..bottom {
                    for x in left..right {
                        if mask.get_pixel(x, y).0[0] != 0 {
                            on += 1;
                        }
                    }
                }
                if on as f64 / total as f64 > layout.occupancy_threshold as f64 {
                    Some(on)
                } else {
                    None
                }
            })
            .collect();

        // Coalesce consecutive occupied rows into one span per class.
        let mut row = 0;
        while row < rows_per_day {
            let Some(first_area) = occupancy[row] else {
                row += 1;
                continue;
            };
            let start = row;
            let mut area = first_area;
            row += 1;
            while row < rows_per_day {
                match occupancy[row] {
                    Some(a) => {
                        area += a;
                        row += 1;
                    }
                    None => break,
                }
            }
            let span = row - start;

            let (left, top, _, _) = cell_bounds(column, start);
            let (_, _, right, bottom) = cell_bounds(column, row - 1);
            located.push(LocatedRegion {
                x: left,
                y: top,
                width: right - left,
                height: bottom - top,
                area,
                cell: GridCell { row: start, column },
                row_span: span,
            });
        }
    }

    located
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// 700x650 mask: header row + time column sized to the default
    /// layout, with a filled rectangle painted over the given cells.
    fn mask_with_block(col: usize, row: usize, rows_tall: usize) -> GrayImage {
        let mut mask = GrayImage::new(700, 650);
        let layout = GridLayout::default();
        let x0 = layout.left_fraction * 700.0;
        let y0 = layout.header_fraction * 650.0;
        let col_w = (700.0 - x0) / layout.day_count as f32;
        let row_h = (650.0 - y0) / layout.rows_per_day() as f32;

        let left = (x0 + col as f32 * col_w) as u32 + 2;
        let top = (y0 + row as f32 * row_h) as u32 + 2;
        let right = (x0 + (col + 1) as f32 * col_w) as u32 - 2;
        let bottom = (y0 + (row + rows_tall) as f32 * row_h) as u32 - 2;
        for y in top..bottom {
            for x in left..right {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        mask
    }

    #[test]
    fn test_contour_mode_classifies_single_block() {
        let mask = mask_with_block(2, 4, 1);
        let regions = locate_contours(&mask, &GridLayout::default());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].cell, GridCell { row: 4, column: 2 });
        assert_eq!(regions[0].row_span, 1);
        assert!(regions[0].area > 0);
    }

    #[test]
    fn test_contour_mode_drops_noise_specks() {
        let mut mask = mask_with_block(0, 0, 1);
        // A 3x3 speck well below the 3%/2% noise floor.
        for y in 600..603 {
            for x in 300..303 {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        let regions = locate_contours(&mask, &GridLayout::default());
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn test_contour_mode_multi_hour_span() {
        let mask = mask_with_block(1, 3, 2);
        let regions = locate_contours(&mask, &GridLayout::default());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].cell.row, 3);
        assert_eq!(regions[0].row_span, 2);
    }

    #[test]
    fn test_contour_mode_odd_span_keeps_top_row() {
        // With an odd span the box center falls in the middle row; the
        // cell must still name the top one.
        let mask = mask_with_block(1, 3, 3);
        let regions = locate_contours(&mask, &GridLayout::default());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].cell.row, 3);
        assert_eq!(regions[0].row_span, 3);
    }

    #[test]
    fn test_contour_mode_empty_mask() {
        let mask = GrayImage::new(700, 650);
        assert!(locate_contours(&mask, &GridLayout::default()).is_empty());
    }

    #[test]
    fn test_fixed_grid_single_cell() {
        let mask = mask_with_block(3, 6, 1);
        let regions = locate_fixed_grid(&mask, &GridLayout::default());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].cell, GridCell { row: 6, column: 3 });
        assert_eq!(regions[0].row_span, 1);
    }

    #[test]
    fn test_fixed_grid_coalesces_multi_hour_block() {
        let mask = mask_with_block(5, 2, 3);
        let regions = locate_fixed_grid(&mask, &GridLayout::default());
        // One span, not three unrelated entries.
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].cell, GridCell { row: 2, column: 5 });
        assert_eq!(regions[0].row_span, 3);
    }

    #[test]
    fn test_strategies_agree_on_cell() {
        let mask = mask_with_block(4, 4, 1);
        let layout = GridLayout::default();
        let contour = locate_contours(&mask, &layout);
        let fixed = locate_fixed_grid(&mask, &layout);
        assert_eq!(contour.len(), 1);
        assert_eq!(fixed.len(), 1);
        assert_eq!(contour[0].cell, fixed[0].cell);
    }
}
