//! # schedgrid
//!
//! Class-schedule grid extraction engine.
//!
//! This crate converts a class-schedule representation into a normalized
//! day/time grid. Two independent pipelines share a common grid model:
//!
//! - **Visual pipeline**: a rasterized schedule image with green class
//!   blocks over a day×hour grid is masked in HSV space, each block is
//!   mapped to a (day, hour) cell, classified as full-slot or half-hour
//!   shifted, and labeled via an injected OCR backend.
//! - **Temporal pipeline**: structured CSV/JSON records (day, start, end,
//!   subject, room) are time-normalized, indexed into half-hour or hourly
//!   slots, and merged into a single renderable matrix.
//!
//! ## Architecture
//!
//! - [`models`]: weekday, canonical clock time, schedule entry types
//! - [`config`]: per-run configuration objects (color band, grid layout,
//!   slot resolution, shift thresholds)
//! - [`vision`]: color masking, cell location, shift detection, OCR boundary
//! - [`grid`]: slot indexing and grid assembly
//! - [`ingest`]: CSV/JSON record parsing with row-level isolation
//! - [`services`]: pipeline orchestration, exports, run diagnostics
//! - [`http`]: axum-based REST API (behind the `http-server` feature)
//!
//! Processing is single-request, synchronous, and stateless: one image or
//! one structured file in, one grid out. Skipped rows and blocks never
//! abort a run; partial output is always preferred over no output.

pub mod config;
pub mod error;
pub mod grid;
pub mod ingest;
pub mod models;
pub mod services;
pub mod vision;

#[cfg(feature = "http-server")]
pub mod http;
