// src/platform/backends/x11/mod.rs

//! Xlib backend.
//!
//! `XDriver` ties the submodules together:
//! - `connection`: the display connection and the matched TrueColor visual.
//! - `window`: the managed window, its hints, title and close protocol.
//! - `image`: the offscreen buffer and the `XImage` aliasing it.
//! - `event`: drains the event queue into `PlatformEvent`s.

use crate::buffer::OffscreenBuffer;
use crate::config::WindowConfig;
use crate::platform::backends::{Driver, PlatformEvent};
use anyhow::{Context, Result};
use log::{debug, info, warn};

pub mod connection;
pub mod event;
pub mod image;
pub mod window;

use connection::Connection;
use image::ImageSurface;
use window::{SizeHints, Window};
use x11::{keysym, xlib};

pub struct XDriver {
    surface: ImageSurface,
    window: Window,
    connection: Connection,
    gc: xlib::GC,
    space_keycode: Option<u32>,
}

impl XDriver {
    /// Opens the display, creates and maps the window, and allocates the
    /// initial offscreen buffer at the window's size.
    pub fn new(config: &WindowConfig) -> Result<Self> {
        let connection = Connection::new()?;

        let mut window = Window::new(&connection, config.width, config.height)?;
        if let Err(e) =
            window.setup_protocols_and_hints(&connection, &config.title, SizeHints::from_config(config))
        {
            window.cleanup(&connection);
            return Err(e.context("Failed to set up window properties"));
        }
        window.map_and_flush(&connection);
        if config.start_maximized && !window.toggle_maximize(&connection) {
            warn!("Maximize-on-start request was not sent.");
        }

        let gc = connection.default_gc();

        // SAFETY: display is open.
        let space_keycode =
            unsafe { xlib::XKeysymToKeycode(connection.display(), keysym::XK_space as xlib::KeySym) };
        let space_keycode = if space_keycode == 0 {
            warn!("Keyboard has no keycode for space; space notices are disabled.");
            None
        } else {
            debug!("Space key is keycode {}", space_keycode);
            Some(u32::from(space_keycode))
        };

        let surface = match ImageSurface::new(&connection, config.width, config.height) {
            Ok(surface) => surface,
            Err(e) => {
                window.cleanup(&connection);
                return Err(e.context("Failed to create initial offscreen buffer"));
            }
        };

        info!(
            "X11 driver ready: window {} at {}x{}",
            window.id(),
            config.width,
            config.height
        );
        Ok(Self {
            surface,
            window,
            connection,
            gc,
            space_keycode,
        })
    }
}

impl Driver for XDriver {
    fn process_events(&mut self) -> Result<Vec<PlatformEvent>> {
        let events = event::process_pending_events(&self.connection)?;
        let own_id = self.window.id() as u64;
        if events
            .iter()
            .any(|e| matches!(e, PlatformEvent::Destroyed { window } if *window == own_id))
        {
            // The server already destroyed it; unmapping it later would fail.
            self.window.mark_destroyed();
        }
        Ok(events)
    }

    fn window_id(&self) -> u64 {
        self.window.id() as u64
    }

    fn delete_window_atom(&self) -> Option<u64> {
        self.window.wm_delete_window_atom().map(|atom| atom as u64)
    }

    fn designated_keycode(&self) -> Option<u32> {
        self.space_keycode
    }

    fn resize_buffer(&mut self, width: u32, height: u32) -> Result<()> {
        let surface = ImageSurface::new(&self.connection, width, height)
            .with_context(|| format!("Failed to reallocate offscreen buffer at {}x{}", width, height))?;
        // Assigning drops the previous image together with its memory.
        self.surface = surface;
        Ok(())
    }

    fn buffer(&self) -> &OffscreenBuffer {
        self.surface.buffer()
    }

    fn buffer_mut(&mut self) -> &mut OffscreenBuffer {
        self.surface.buffer_mut()
    }

    fn present(&mut self) -> Result<()> {
        if !self.connection.is_open() {
            warn!("present called after cleanup; skipping.");
            return Ok(());
        }
        self.surface.put(&self.connection, self.window.id(), self.gc);
        self.connection.flush();
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        info!("Shutting down X11 driver.");
        self.window.cleanup(&self.connection);
        self.connection.close();
        Ok(())
    }
}

impl Drop for XDriver {
    fn drop(&mut self) {
        if self.connection.is_open() {
            if let Err(e) = self.cleanup() {
                warn!("X11 driver cleanup during drop failed: {:#}", e);
            }
        }
    }
}
