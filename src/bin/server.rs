//! Schedule grid HTTP server binary.
//!
//! Entry point for the REST API: wires the temporal and visual pipelines
//! into shared state, builds the router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin schedgrid-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `OCR_CMD`: Tesseract executable name or path (default: tesseract)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use schedgrid::http::{create_router, AppState};
use schedgrid::services::{ImageProcessor, ScheduleProcessor};
use schedgrid::vision::TesseractCli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting schedule grid HTTP server");

    // Both pipelines carry their default calibration; OCR shells out to
    // the tesseract CLI.
    let ocr_cmd = env::var("OCR_CMD").unwrap_or_else(|_| "tesseract".to_string());
    let image_processor = ImageProcessor::new(Arc::new(TesseractCli::new(&ocr_cmd)));
    let state = AppState::new(ScheduleProcessor::default(), image_processor);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
