// src/config.rs

//! Defines the configuration structures for the gradient window.
//!
//! Nothing is read from disk or the environment; the values below are the
//! compiled-in defaults. The structs still derive `Serialize`/`Deserialize`
//! so the effective configuration can be dumped at startup and so the
//! defaults stay in one declarative place.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The process-wide configuration, built on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::default);

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)] // Apply default values for the entire struct if a field is missing.
pub struct Config {
    /// Window creation settings.
    pub window: WindowConfig,
    /// Per-frame animation settings.
    pub animation: AnimationConfig,
    /// Frame pacing settings.
    pub performance: PerformanceConfig,
}

impl Config {
    /// Renders the configuration as a single-line JSON string for logging.
    pub fn to_log_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("<unserializable config: {}>", e))
    }
}

// --- Window Configuration ---

/// Defines the initial geometry and window-manager hints of the window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Title stored via `XStoreName` and `_NET_WM_NAME`.
    pub title: String,
    /// Initial width in pixels.
    pub width: u32,
    /// Initial height in pixels.
    pub height: u32,
    /// Minimum width hint. Ignored unless both minimum dimensions are positive.
    pub min_width: u32,
    /// Minimum height hint.
    pub min_height: u32,
    /// Maximum width hint. 0 means unbounded.
    pub max_width: u32,
    /// Maximum height hint. 0 means unbounded.
    pub max_height: u32,
    /// Ask the window manager to maximize the window right after mapping it.
    pub start_maximized: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "Hello, World!".to_string(),
            width: 1280,
            height: 720,
            min_width: 400,
            min_height: 300,
            max_width: 0,
            max_height: 0,
            start_maximized: false,
        }
    }
}

// --- Animation Configuration ---

/// How far the gradient phase advances each frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnimationConfig {
    pub xoffset_step: i32,
    pub yoffset_step: i32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            xoffset_step: 1,
            yoffset_step: 2,
        }
    }
}

// --- Performance Configuration ---

/// Defines settings related to frame pacing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Minimum time between frames in milliseconds.
    /// 0 disables pacing and the loop runs as fast as presentation allows.
    pub min_frame_interval_ms: u64,
}
