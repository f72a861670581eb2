// src/main.rs

// Declare modules
pub mod buffer;
pub mod config;
pub mod orchestrator;
pub mod platform;
pub mod renderer;

use crate::{
    config::CONFIG,
    orchestrator::AppOrchestrator,
    platform::backends::x11::XDriver,
};

// Logging
use anyhow::Context;
use log::{debug, info};
use std::time::Duration;

/// Opens a window and animates a software-rendered gradient in it until the
/// window is closed.
///
/// Any error returned here (no display, no 24-bit TrueColor visual, failed
/// allocation) is printed to stderr and the process exits with status 1.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting xlib-gradient...");
    debug!("Effective configuration: {}", CONFIG.to_log_string());

    // --- Starting ---
    let mut driver = XDriver::new(&CONFIG.window).context("Failed to initialize X11 driver")?;

    // --- Running, then Terminating ---
    let frame_interval = Duration::from_millis(CONFIG.performance.min_frame_interval_ms);
    AppOrchestrator::new(&mut driver, CONFIG.animation).run(frame_interval)?;
    info!("xlib-gradient exited successfully.");
    Ok(())
}
