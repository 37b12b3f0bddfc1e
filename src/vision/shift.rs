//! Half-hour shift detection.
//!
//! Schedule renderers mark a class starting or ending on the half hour
//! by cutting a diagonal off the block, which removes roughly 10–20% of
//! the rectangle. Two heuristics pick that up:
//!
//! - **Solidity**: `occupied_pixels / (w * h)`. A perfect rectangle is
//!   ~1.0; a diagonal cut drops it below the configured threshold.
//! - **Corner sampling**: small patches at the top-right and bottom-left
//!   of the cell mask. A patch averaging below the brightness midpoint
//!   means that corner is cut away, implying the corresponding boundary
//!   (start or end) is shifted by 30 minutes.
//!
//! Both are best-effort classification over rendered pixels, not exact
//! geometry.

use crate::config::ShiftConfig;
use crate::vision::locate::LocatedRegion;
use image::GrayImage;

/// Ratio of occupied pixels to the axis-aligned bounding-box area.
pub fn solidity(region: &LocatedRegion) -> f32 {
    let box_area = region.width as u64 * region.height as u64;
    if box_area == 0 {
        return 0.0;
    }
    region.area as f32 / box_area as f32
}

/// True when the solidity falls below the configured cutoff.
pub fn is_shifted(solidity: f32, config: &ShiftConfig) -> bool {
    solidity < config.solidity_threshold
}

/// Corner-sample verdict for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CornerCuts {
    /// Top-right corner cut away: the block starts on the half hour.
    pub start_shifted: bool,
    /// Bottom-left corner cut away: the block ends on the half hour.
    pub end_shifted: bool,
}

/// Sample the top-right and bottom-left corners of a region on the mask.
pub fn corner_cuts(mask: &GrayImage, region: &LocatedRegion, config: &ShiftConfig) -> CornerCuts {
    let patch = config.corner_patch.min(region.width).min(region.height);
    if patch == 0 {
        return CornerCuts::default();
    }

    let top_right = patch_mean(
        mask,
        region.x + region.width - patch,
        region.y,
        patch,
    );
    let bottom_left = patch_mean(mask, region.x, region.y + region.height - patch, patch);

    CornerCuts {
        start_shifted: top_right < config.corner_midpoint as f32,
        end_shifted: bottom_left < config.corner_midpoint as f32,
    }
}

fn patch_mean(mask: &GrayImage, x0: u32, y0: u32, patch: u32) -> f32 {
    let (width, height) = mask.dimensions();
    let mut sum = 0u64;
    let mut count = 0u64;
    for y in y0..(y0 + patch).min(height) {
        for x in x0..(x0 + patch).min(width) {
            sum += mask.get_pixel(x, y).0[0] as u64;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum as f32 / count as f32
    }
}
