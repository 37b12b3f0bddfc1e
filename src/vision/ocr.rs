//! OCR boundary: crop preparation and label parsing.
//!
//! The OCR engine itself is an external collaborator injected as a
//! [`TextExtractor`]. This module's job is only to hand it a clean crop
//! (upscaled, gray-scaled, optionally binarized) and to parse the
//! newline-delimited text it returns into a subject/room label.

use crate::vision::locate::LocatedRegion;
use anyhow::Result;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use imageproc::contrast::adaptive_threshold;
use std::io::Cursor;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

/// External text-extraction service.
///
/// Implementations receive a pre-cropped grayscale region and return
/// whatever raw multi-line text they recognized. Empty output is not an
/// error; the caller drops the block.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, region: &GrayImage) -> Result<String>;
}

/// Crop preprocessing knobs for the OCR boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcrPrep {
    /// Upscale factor applied to the crop (at least 2x helps engines
    /// tuned for document-sized glyphs).
    pub upscale: u32,
    /// Apply an adaptive threshold after grayscaling.
    pub binarize: bool,
    /// Block radius for the adaptive threshold.
    pub block_radius: u32,
}

impl Default for OcrPrep {
    fn default() -> Self {
        Self {
            upscale: 2,
            binarize: false,
            block_radius: 15,
        }
    }
}

/// Crop a located region out of the source image and prepare it for OCR.
pub fn prepare_region(img: &RgbImage, region: &LocatedRegion, prep: &OcrPrep) -> GrayImage {
    let crop = imageops::crop_imm(img, region.x, region.y, region.width, region.height).to_image();
    let gray = imageops::grayscale(&crop);

    let factor = prep.upscale.max(1);
    let scaled = if factor > 1 {
        imageops::resize(
            &gray,
            gray.width() * factor,
            gray.height() * factor,
            FilterType::CatmullRom,
        )
    } else {
        gray
    };

    if prep.binarize {
        adaptive_threshold(&scaled, prep.block_radius)
    } else {
        scaled
    }
}

/// Parsed block label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLabel {
    pub subject: String,
    pub room: Option<String>,
}

/// Split OCR output into a (subject, room) label.
///
/// Lines are trimmed; lines shorter than 2 characters are discarded as
/// recognition noise. The first surviving line is the subject, the
/// second (if any) the room; further lines are ignored. Zero usable
/// lines yields `None` and the block is silently dropped.
pub fn parse_label(text: &str) -> Option<BlockLabel> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= 2);

    let subject = lines.next()?.to_string();
    let room = lines.next().map(str::to_string);
    Some(BlockLabel { subject, room })
}

/// Run an extractor with a wall-clock budget.
///
/// The call runs on a helper thread; if the budget expires the result is
/// treated exactly like "no text produced" and the orphaned call is left
/// to finish quietly. Backend failures are logged and also mapped to no
/// text, keeping partial output flowing.
pub fn extract_with_timeout(
    extractor: &Arc<dyn TextExtractor>,
    region: GrayImage,
    timeout: Duration,
) -> Option<String> {
    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(extractor);
    std::thread::spawn(move || {
        let _ = tx.send(worker.extract_text(&region));
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "ocr backend failed, treating block as textless");
            None
        }
        Err(_) => {
            tracing::warn!(?timeout, "ocr call exceeded budget, treating block as textless");
            None
        }
    }
}

/// OCR backend shelling out to the `tesseract` CLI.
///
/// The crop is piped in as PNG on stdin and read back from stdout, using
/// page-segmentation mode 6 (a single uniform block of text), which is
/// what schedule cells look like.
pub struct TesseractCli {
    command: String,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TextExtractor for TesseractCli {
    fn extract_text(&self, region: &GrayImage) -> Result<String> {
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(region.clone())
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "--psm", "6"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(&png)?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            anyhow::bail!("tesseract exited with {}", output.status);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Test/bench extractor that ignores the crop entirely.
pub struct FixedTextExtractor {
    text: String,
}

impl FixedTextExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextExtractor for FixedTextExtractor {
    fn extract_text(&self, _region: &GrayImage) -> Result<String> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GridCell;
    use image::Rgb;

    #[test]
    fn test_parse_label_subject_and_room() {
        let label = parse_label("MATH 27\nCAS-B2\n").unwrap();
        assert_eq!(label.subject, "MATH 27");
        assert_eq!(label.room.as_deref(), Some("CAS-B2"));
    }

    #[test]
    fn test_parse_label_trims_and_drops_short_lines() {
        let label = parse_label("  PHYS 11  \n|\n.\n NIP-101 \nextra\nlines").unwrap();
        assert_eq!(label.subject, "PHYS 11");
        assert_eq!(label.room.as_deref(), Some("NIP-101"));
    }

    #[test]
    fn test_parse_label_subject_only() {
        let label = parse_label("CHEM 16").unwrap();
        assert_eq!(label.subject, "CHEM 16");
        assert_eq!(label.room, None);
    }

    #[test]
    fn test_parse_label_no_usable_lines() {
        assert_eq!(parse_label(""), None);
        assert_eq!(parse_label("\n \n.\n"), None);
    }

    #[test]
    fn test_prepare_region_upscales() {
        let img = RgbImage::from_pixel(50, 30, Rgb([20, 110, 40]));
        let region = LocatedRegion {
            x: 5,
            y: 5,
            width: 20,
            height: 10,
            area: 200,
            cell: GridCell { row: 0, column: 0 },
            row_span: 1,
        };
        let out = prepare_region(&img, &region, &OcrPrep::default());
        assert_eq!(out.dimensions(), (40, 20));
    }

    #[test]
    fn test_extract_with_timeout_happy_path() {
        let extractor: Arc<dyn TextExtractor> =
            Arc::new(FixedTextExtractor::new("MATH 27\nCAS-B2"));
        let text = extract_with_timeout(
            &extractor,
            GrayImage::new(4, 4),
            Duration::from_secs(1),
        );
        assert_eq!(text.as_deref(), Some("MATH 27\nCAS-B2"));
    }

    struct StallingExtractor;
    impl TextExtractor for StallingExtractor {
        fn extract_text(&self, _region: &GrayImage) -> Result<String> {
            std::thread::sleep(Duration::from_secs(5));
            Ok("too late".into())
        }
    }

    #[test]
    fn test_extract_with_timeout_expires() {
        let extractor: Arc<dyn TextExtractor> = Arc::new(StallingExtractor);
        let text = extract_with_timeout(
            &extractor,
            GrayImage::new(4, 4),
            Duration::from_millis(50),
        );
        assert_eq!(text, None);
    }

    struct FailingExtractor;
    impl TextExtractor for FailingExtractor {
        fn extract_text(&self, _region: &GrayImage) -> Result<String> {
            anyhow::bail!("engine exploded")
        }
    }

    #[test]
    fn test_extract_backend_failure_is_no_text() {
        let extractor: Arc<dyn TextExtractor> = Arc::new(FailingExtractor);
        let text = extract_with_timeout(
            &extractor,
            GrayImage::new(4, 4),
            Duration::from_secs(1),
        );
        assert_eq!(text, None);
    }
}
