// src/platform/backends/mod.rs

//! Defines the `Driver` trait for windowing-system backends and the
//! `PlatformEvent` enum that backends translate native events into.
//!
//! The orchestrator only talks to a `Driver`, so the dispatch logic can be
//! exercised with the scripted mock driver and no X server.

use crate::buffer::OffscreenBuffer;
use anyhow::Result;

#[cfg(test)]
pub mod mock;
pub mod x11;

/// A native event, reduced to the fields the event loop dispatches on.
///
/// Window IDs, atoms and keycodes are carried as plain integers so the
/// variants are backend-neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// A window was destroyed (`DestroyNotify`).
    Destroyed { window: u64 },
    /// A client message arrived; `data0` is its first 32-bit data word.
    ClientMessage { window: u64, data0: u64 },
    /// The window's geometry changed (`ConfigureNotify`), possibly a pure move.
    Configured { window: u64, width: u32, height: u32 },
    /// A key went down.
    KeyPressed { keycode: u32 },
    /// A key came up.
    KeyReleased { keycode: u32 },
    /// Anything else the backend received; never acted upon.
    Other { kind: i32 },
}

/// Defines the interface for a windowing backend.
///
/// A `Driver` owns the display connection, the single managed window and
/// the offscreen buffer together with whatever native image aliases it.
pub trait Driver {
    /// Drains every event that is pending right now, in delivery order.
    /// Must not block waiting for new events.
    fn process_events(&mut self) -> Result<Vec<PlatformEvent>>;

    /// ID of the managed window.
    fn window_id(&self) -> u64;

    /// The close-protocol atom, or `None` if registration failed.
    fn delete_window_atom(&self) -> Option<u64>;

    /// Keycode of the designated (space) key, if the keyboard has one.
    fn designated_keycode(&self) -> Option<u32>;

    /// Replaces the offscreen buffer with one of the given size. The old
    /// pixel memory and its native image are released together.
    fn resize_buffer(&mut self, width: u32, height: u32) -> Result<()>;

    fn buffer(&self) -> &OffscreenBuffer;

    fn buffer_mut(&mut self) -> &mut OffscreenBuffer;

    /// Copies the whole offscreen buffer onto the window at (0, 0).
    fn present(&mut self) -> Result<()>;

    /// Unmaps and destroys the window and closes the connection.
    /// Must be idempotent.
    fn cleanup(&mut self) -> Result<()>;
}
