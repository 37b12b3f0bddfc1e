//! Pipeline orchestration.
//!
//! [`ScheduleProcessor`] drives the temporal pipeline (structured file →
//! entries → grid → busy slots); [`ImageProcessor`] drives the visual
//! pipeline (image → mask → located blocks → OCR → records). Both are
//! stateless per request and report skip counters instead of failing on
//! partial input.

use crate::config::{GridLayout, HsvBand, ShiftConfig, SlotConfig};
use crate::error::{PipelineError, SkipCounts};
use crate::grid::{GridAssembler, ScheduleGrid};
use crate::ingest;
use crate::models::{ClockTime, DetectedBlock, ScheduleEntry, TimeNormalizer, Weekday};
use crate::services::export;
use crate::vision::{self, LocatedRegion, OcrPrep, TextExtractor};
use image::RgbImage;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// =============================================================================
// Temporal pipeline
// =============================================================================

/// Result of processing one structured file.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    /// Surviving entries, sorted for display (day, then start time).
    pub entries: Vec<ScheduleEntry>,
    /// The assembled day×time matrix.
    pub grid: ScheduleGrid,
    /// One id per occupied 30-minute interval, deduplicated.
    pub busy_slots: Vec<String>,
    /// What was dropped along the way.
    pub skips: SkipCounts,
}

/// Temporal pipeline: structured records to an assembled grid.
#[derive(Debug, Clone)]
pub struct ScheduleProcessor {
    slot: SlotConfig,
    day_count: usize,
    normalizer: TimeNormalizer,
}

impl ScheduleProcessor {
    pub fn new(slot: SlotConfig, day_count: usize, normalizer: TimeNormalizer) -> Self {
        Self {
            slot,
            day_count,
            normalizer,
        }
    }

    /// Process an uploaded CSV or JSON file end to end.
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        file_name: Option<&str>,
    ) -> Result<ProcessOutcome, PipelineError> {
        let format = ingest::detect_format(file_name, bytes);
        let (records, mut skips) = ingest::read_records(bytes, format)?;
        let (entries, normalize_skips) = ingest::normalize_records(records, &self.normalizer);
        skips.merge(&normalize_skips);
        Ok(self.finish(entries, skips))
    }

    /// Assemble already-normalized entries into a grid.
    pub fn process_entries(&self, entries: Vec<ScheduleEntry>) -> ProcessOutcome {
        self.finish(entries, SkipCounts::default())
    }

    fn finish(&self, mut entries: Vec<ScheduleEntry>, mut skips: SkipCounts) -> ProcessOutcome {
        let mut assembler = GridAssembler::new(self.slot, self.day_count);

        entries.retain(|entry| {
            match assembler.indexer().span(entry.start, entry.end) {
                Some(span) => {
                    assembler.place(entry.day, span, &entry.subject);
                    true
                }
                None => {
                    // Outside the grid envelope, or too short to occupy
                    // a row; drop and count.
                    let err = PipelineError::OutOfGridRange {
                        day: entry.day.index() as i64,
                        row: -1,
                    };
                    tracing::debug!(subject = %entry.subject, "entry outside grid, dropping");
                    skips.record(&err);
                    false
                }
            }
        });

        export::sort_for_display(&mut entries);
        let busy_slots = export::busy_slot_ids(&entries);
        info!(
            entries = entries.len(),
            skipped = skips.total(),
            "assembled schedule grid"
        );

        ProcessOutcome {
            entries,
            grid: assembler.finish(),
            busy_slots,
            skips,
        }
    }
}

impl Default for ScheduleProcessor {
    fn default() -> Self {
        Self::new(SlotConfig::half_hour(), 6, TimeNormalizer::default())
    }
}

// =============================================================================
// Visual pipeline
// =============================================================================

/// Which cell-location strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocatorMode {
    #[default]
    Contour,
    FixedGrid,
}

/// One labeled block from a schedule image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageBlockRecord {
    pub subject: String,
    /// `"TBA"` when OCR produced a subject line but no room line.
    pub room: String,
    pub block: DetectedBlock,
}

/// Result of analyzing one schedule image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageAnalysis {
    pub blocks: Vec<ImageBlockRecord>,
    pub skips: SkipCounts,
}

/// Visual pipeline: schedule image to labeled block records.
pub struct ImageProcessor {
    band: HsvBand,
    layout: GridLayout,
    shift: ShiftConfig,
    prep: OcrPrep,
    mode: LocatorMode,
    ocr: Arc<dyn TextExtractor>,
    ocr_timeout: Duration,
}

impl ImageProcessor {
    pub fn new(ocr: Arc<dyn TextExtractor>) -> Self {
        Self {
            band: HsvBand::default(),
            layout: GridLayout::default(),
            shift: ShiftConfig::default(),
            prep: OcrPrep::default(),
            mode: LocatorMode::default(),
            ocr,
            ocr_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_band(mut self, band: HsvBand) -> Self {
        self.band = band;
        self
    }

    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_shift(mut self, shift: ShiftConfig) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_mode(mut self, mode: LocatorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_prep(mut self, prep: OcrPrep) -> Self {
        self.prep = prep;
        self
    }

    pub fn with_ocr_timeout(mut self, timeout: Duration) -> Self {
        self.ocr_timeout = timeout;
        self
    }

    /// Decode and analyze an uploaded image.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<ImageAnalysis, PipelineError> {
        let img = image::load_from_memory(bytes)?.to_rgb8();
        Ok(self.analyze(&img))
    }

    /// Run mask → locate → shift → OCR over a decoded image.
    ///
    /// Blocks yielding no usable OCR text are dropped and counted, never
    /// raised; partial output always flows.
    pub fn analyze(&self, img: &RgbImage) -> ImageAnalysis {
        let mask = vision::mask_band(img, &self.band);
        let regions = match self.mode {
            LocatorMode::Contour => vision::locate_contours(&mask, &self.layout),
            LocatorMode::FixedGrid => vision::locate_fixed_grid(&mask, &self.layout),
        };
        info!(regions = regions.len(), mode = ?self.mode, "located candidate blocks");

        let mut blocks = Vec::new();
        let mut skips = SkipCounts::default();
        for region in &regions {
            let solidity = vision::solidity(region);
            let shifted = vision::is_shifted(solidity, &self.shift);

            let crop = vision::prepare_region(img, region, &self.prep);
            let text = vision::extract_with_timeout(&self.ocr, crop, self.ocr_timeout);
            let label = text.as_deref().and_then(vision::parse_label);
            let Some(label) = label else {
                skips.record(&PipelineError::NoTextDetected);
                continue;
            };

            blocks.push(ImageBlockRecord {
                subject: label.subject,
                room: label.room.unwrap_or_else(|| "TBA".to_string()),
                block: DetectedBlock {
                    x: region.x,
                    y: region.y,
                    width: region.width,
                    height: region.height,
                    solidity,
                    cell: region.cell,
                    row_span: region.row_span,
                    shifted,
                },
            });
        }

        ImageAnalysis { blocks, skips }
    }

    /// Map labeled blocks onto schedule entries.
    ///
    /// Visual rows are hourly from the 7:00 origin. Corner cuts refine
    /// the boundaries: a cut top-right corner moves the start forward by
    /// 30 minutes, a cut bottom-left corner pulls the end back by 30.
    /// The refinement is best-effort; an adjustment that would invert
    /// the range is discarded.
    pub fn entries_from(
        &self,
        img: &RgbImage,
        analysis: &ImageAnalysis,
    ) -> (Vec<ScheduleEntry>, SkipCounts) {
        let mask = vision::mask_band(img, &self.band);
        let mut entries = Vec::new();
        let mut skips = SkipCounts::default();

        for record in &analysis.blocks {
            let block = &record.block;
            let Some(day) = Weekday::from_index(block.cell.column) else {
                skips.record(&PipelineError::OutOfGridRange {
                    day: block.cell.column as i64,
                    row: block.cell.row as i64,
                });
                continue;
            };

            let origin = 7 * 60;
            let mut start_minutes = origin + block.cell.row as u32 * 60;
            let mut end_minutes = start_minutes + block.row_span as u32 * 60;

            if block.shifted {
                let region = LocatedRegion {
                    x: block.x,
                    y: block.y,
                    width: block.width,
                    height: block.height,
                    area: 0,
                    cell: block.cell,
                    row_span: block.row_span,
                };
                let cuts = vision::corner_cuts(&mask, &region, &self.shift);
                if cuts.start_shifted {
                    start_minutes += 30;
                }
                if cuts.end_shifted && end_minutes - 30 > start_minutes {
                    end_minutes -= 30;
                }
                if start_minutes >= end_minutes {
                    // Heuristic went sideways; keep the whole-hour span.
                    start_minutes = origin + block.cell.row as u32 * 60;
                    end_minutes = start_minutes + block.row_span as u32 * 60;
                }
            }

            match ScheduleEntry::new(
                day,
                ClockTime::from_minutes(start_minutes),
                ClockTime::from_minutes(end_minutes),
                record.subject.clone(),
                record.room.clone(),
            ) {
                Ok(entry) => entries.push(entry.with_shift(block.shifted)),
                Err(err) => skips.record(&err),
            }
        }

        (entries, skips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::FixedTextExtractor;
    use image::Rgb;

    const GREEN: Rgb<u8> = Rgb([20, 110, 40]);

    /// 700x650 white schedule with a green block over the given cell.
    fn schedule_image(col: usize, row: usize) -> RgbImage {
        tall_schedule_image(col, row, 1)
    }

    /// Same canvas, with the block covering `rows_tall` consecutive rows.
    fn tall_schedule_image(col: usize, row: usize, rows_tall: usize) -> RgbImage {
        let mut img = RgbImage::from_pixel(700, 650, Rgb([255, 255, 255]));
        let left = (100 + col * 100 + 4) as u32;
        let top = (50 + row * 50 + 4) as u32;
        let bottom = (50 + (row + rows_tall) * 50 - 4) as u32;
        for y in top..bottom {
            for x in left..left + 92 {
                img.put_pixel(x, y, GREEN);
            }
        }
        img
    }

    fn processor(text: &str) -> ImageProcessor {
        ImageProcessor::new(Arc::new(FixedTextExtractor::new(text)))
    }

    #[test]
    fn test_structured_happy_path() {
        let csv = b"Day,Start Time,End Time,Class,Location\n\
                    Monday,7:00,8:00,MATH27,CAS-B2\n\
                    Monday,7:30,8:00,PHYS11,NIP-101\n";
        let outcome = ScheduleProcessor::default()
            .process_bytes(csv, Some("sched.csv"))
            .unwrap();

        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.skips.total(), 0);
        // Monday 7:00 row holds only MATH27; the 7:30 row holds both.
        assert_eq!(outcome.grid.cell(0, 0), ["MATH27"]);
        assert_eq!(outcome.grid.cell(1, 0), ["MATH27", "PHYS11"]);
    }

    #[test]
    fn test_structured_skips_are_counted() {
        let csv = b"Day,Start Time,End Time,Class,Location\n\
                    Monday,7:00,8:00,MATH27,CAS-B2\n\
                    Monday,zz:zz,8:00,BROKEN,X\n\
                    Tuesday,9:00,10:00,CHEM16,PH-r101\n";
        let outcome = ScheduleProcessor::default()
            .process_bytes(csv, Some("sched.csv"))
            .unwrap();

        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.skips.unparseable_time, 1);
    }

    #[test]
    fn test_structured_busy_slots() {
        let csv = b"Day,Start Time,End Time,Class,Location\n\
                    M,8:00 AM,9:00 AM,MATH27,CAS-B2\n";
        let outcome = ScheduleProcessor::default()
            .process_bytes(csv, None)
            .unwrap();
        assert_eq!(outcome.busy_slots, vec!["Monday-800AM", "Monday-830AM"]);
    }

    #[test]
    fn test_out_of_envelope_entry_dropped_and_counted() {
        let csv = b"Day,Start Time,End Time,Class,Location\n\
                    M,7:00 PM,8:00 PM,NIGHT1,X-1\n";
        let outcome = ScheduleProcessor::default()
            .process_bytes(csv, None)
            .unwrap();
        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.skips.out_of_grid_range, 1);
    }

    #[test]
    fn test_sub_slot_entry_dropped_everywhere() {
        // 8:00-8:10 rounds to zero rows: it must not surface in the
        // entry list, the grid, or the busy slots.
        let csv = b"Day,Start Time,End Time,Class,Location\n\
                    M,8:00 AM,8:10 AM,QUIZ 1,CAS-B2\n";
        let outcome = ScheduleProcessor::default()
            .process_bytes(csv, None)
            .unwrap();
        assert!(outcome.entries.is_empty());
        assert!(outcome.busy_slots.is_empty());
        assert_eq!(outcome.skips.out_of_grid_range, 1);
    }

    #[test]
    fn test_image_analysis_labels_block() {
        let img = schedule_image(2, 4);
        let analysis = processor("MATH 27\nCAS-B2").analyze(&img);

        assert_eq!(analysis.blocks.len(), 1);
        let record = &analysis.blocks[0];
        assert_eq!(record.subject, "MATH 27");
        assert_eq!(record.room, "CAS-B2");
        assert_eq!(record.block.cell.column, 2);
        assert_eq!(record.block.cell.row, 4);
        assert!(record.block.solidity > 0.95);
        assert!(!record.block.shifted);
    }

    #[test]
    fn test_image_textless_block_is_skipped() {
        let img = schedule_image(1, 1);
        let analysis = processor("").analyze(&img);
        assert!(analysis.blocks.is_empty());
        assert_eq!(analysis.skips.no_text_detected, 1);
    }

    #[test]
    fn test_image_room_defaults_to_tba() {
        let img = schedule_image(0, 0);
        let analysis = processor("CHEM 16").analyze(&img);
        assert_eq!(analysis.blocks[0].room, "TBA");
    }

    #[test]
    fn test_entries_from_blocks() {
        let img = schedule_image(2, 4);
        let proc = processor("MATH 27\nCAS-B2");
        let analysis = proc.analyze(&img);
        let (entries, skips) = proc.entries_from(&img, &analysis);

        assert_eq!(skips.total(), 0);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].day, Weekday::Wednesday);
        assert_eq!(entries[0].start, ClockTime::new(11, 0).unwrap());
        assert_eq!(entries[0].end, ClockTime::new(12, 0).unwrap());
    }

    #[test]
    fn test_three_hour_block_keeps_its_start_time() {
        let img = tall_schedule_image(0, 3, 3);
        let proc = processor("MATH 27\nCAS-B2");
        let analysis = proc.analyze(&img);

        assert_eq!(analysis.blocks.len(), 1);
        assert_eq!(analysis.blocks[0].block.cell.row, 3);
        assert_eq!(analysis.blocks[0].block.row_span, 3);

        let (entries, skips) = proc.entries_from(&img, &analysis);
        assert_eq!(skips.total(), 0);
        assert_eq!(entries[0].day, Weekday::Monday);
        assert_eq!(entries[0].start.to_string(), "10:00");
        assert_eq!(entries[0].end.to_string(), "13:00");
    }

    #[test]
    fn test_analyze_bytes_rejects_garbage() {
        let err = processor("x").analyze_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, PipelineError::ImageDecode(_)));
    }
}
