// src/platform/mod.rs
//
// This module re-exports the platform-specific functionalities.

pub mod backends;
