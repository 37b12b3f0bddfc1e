//! Grid assembly: merging per-record row spans into a renderable matrix.

use crate::config::SlotConfig;
use crate::grid::slot::SlotIndexer;
use crate::models::Weekday;
use serde::Serialize;
use std::ops::Range;

/// Visible separator between different subjects stacked in one cell.
pub const STACK_SEPARATOR: &str = " / ";

/// Accumulates (day, row-span, content) tuples into a rows×columns
/// matrix.
///
/// Merge policy per cell: first content is set as-is; a different
/// incoming subject is appended; a subject already present is not
/// duplicated. The policy is commutative and idempotent per unique
/// subject, so the order blocks arrive in never changes the result.
#[derive(Debug, Clone)]
pub struct GridAssembler {
    indexer: SlotIndexer,
    day_count: usize,
    cells: Vec<Vec<Vec<String>>>,
}

impl GridAssembler {
    pub fn new(config: SlotConfig, day_count: usize) -> Self {
        let cells = vec![vec![Vec::new(); day_count]; config.slot_count];
        Self {
            indexer: SlotIndexer::new(config),
            day_count,
            cells,
        }
    }

    pub fn indexer(&self) -> &SlotIndexer {
        &self.indexer
    }

    /// Place content into every row of a span.
    ///
    /// Rows beyond the grid are clipped to the nearest valid bound; the
    /// caller is responsible for dropping (and counting) entries whose
    /// span could not be computed at all.
    pub fn place(&mut self, day: Weekday, span: Range<usize>, content: &str) {
        let column = day.index();
        if column >= self.day_count {
            return;
        }
        let end = span.end.min(self.cells.len());
        for row in span.start..end {
            let cell = &mut self.cells[row][column];
            if !cell.iter().any(|existing| existing == content) {
                cell.push(content.to_string());
            }
        }
    }

    /// Freeze the matrix. The grid is immutable after assembly.
    pub fn finish(self) -> ScheduleGrid {
        let row_labels = (0..self.cells.len())
            .map(|row| self.indexer.row_time(row).to_string())
            .collect();
        ScheduleGrid {
            day_count: self.day_count,
            row_labels,
            cells: self.cells,
        }
    }
}

/// The assembled day×time matrix.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleGrid {
    day_count: usize,
    row_labels: Vec<String>,
    cells: Vec<Vec<Vec<String>>>,
}

impl ScheduleGrid {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.day_count
    }

    /// Stacked subjects in one cell, in insertion order.
    pub fn cell(&self, row: usize, column: usize) -> &[String] {
        self.cells
            .get(row)
            .and_then(|r| r.get(column))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Cell contents joined with the visible separator.
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        self.cell(row, column).join(STACK_SEPARATOR)
    }

    /// Display label ("07:30") for a row.
    pub fn row_label(&self, row: usize) -> &str {
        self.row_labels.get(row).map(String::as_str).unwrap_or("")
    }

    /// Render the matrix as rows of joined cell text, one column per
    /// weekday in Monday→Saturday order.
    pub fn to_text_rows(&self) -> Vec<Vec<String>> {
        (0..self.rows())
            .map(|row| {
                (0..self.day_count)
                    .map(|column| self.cell_text(row, column))
                    .collect()
            })
            .collect()
    }
}
