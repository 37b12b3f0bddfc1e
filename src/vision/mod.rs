//! Visual pipeline: from a rasterized schedule image to labeled blocks.
//!
//! Stages, in data-flow order:
//!
//! 1. [`mask`]: HSV band threshold isolating class-block pixels
//! 2. [`locate`]: mapping mask regions to (day, hour-slot) cells
//! 3. [`shift`]: solidity and corner heuristics for half-hour shifts
//! 4. [`ocr`]: crop preparation and label parsing around an injected
//!    OCR backend

pub mod locate;
pub mod mask;
pub mod ocr;
pub mod shift;

pub use locate::{locate_contours, locate_fixed_grid, LocatedRegion};
pub use mask::{mask_band, rgb_to_hsv};
pub use ocr::{
    extract_with_timeout, parse_label, prepare_region, BlockLabel, FixedTextExtractor, OcrPrep,
    TesseractCli, TextExtractor,
};
pub use shift::{corner_cuts, is_shifted, solidity, CornerCuts};
