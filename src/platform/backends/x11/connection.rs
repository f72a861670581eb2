// src/platform/backends/x11/connection.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::mem;
use std::ptr;

// X11 library imports
use libc::c_int;
use x11::xlib;

/// Depth of the TrueColor visual the gradient is presented through.
pub const REQUIRED_VISUAL_DEPTH: c_int = 24;

/// Manages an X11 Display connection, ensuring it's closed on drop.
#[derive(Debug)]
struct ManagedDisplay {
    ptr: *mut xlib::Display,
}

impl ManagedDisplay {
    /// Opens the display named by `DISPLAY`.
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` if the display is successfully opened.
    /// * `Err(anyhow::Error)` if `XOpenDisplay` returns null.
    pub fn new() -> Result<Self> {
        let display_ptr = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display_ptr.is_null() {
            Err(anyhow!(
                "No display available. Check DISPLAY environment variable or X server status."
            ))
        } else {
            debug!("X display opened: {:p}", display_ptr);
            Ok(Self { ptr: display_ptr })
        }
    }

    #[inline]
    pub fn raw(&self) -> *mut xlib::Display {
        self.ptr
    }
}

impl Drop for ManagedDisplay {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            info!("Closing X11 display connection: {:p}", self.ptr);
            unsafe {
                let status = xlib::XCloseDisplay(self.ptr);
                if status != 0 {
                    warn!(
                        "XCloseDisplay returned non-zero status: {}. Display may not have closed cleanly.",
                        status
                    );
                }
            }
        }
    }
}

/// Represents and manages the connection to the X server.
///
/// Besides the `Display` pointer this holds the default screen and the
/// 24-bit TrueColor visual matched on it. The connection is closed when
/// this struct is dropped, or earlier through `close`.
pub struct Connection {
    managed_display: ManagedDisplay,
    screen: c_int,
    visual_info: xlib::XVisualInfo,
}

impl Connection {
    /// Opens the display and matches a 24-bit TrueColor visual on its
    /// default screen.
    ///
    /// Both steps are fatal for the application: without a display or a
    /// matching visual there is nothing to present to.
    pub fn new() -> Result<Self> {
        info!("Establishing X11 server connection.");

        let managed_display = ManagedDisplay::new()?;
        let display = managed_display.raw();

        let screen = unsafe { xlib::XDefaultScreen(display) };
        debug!("Default screen number: {}", screen);

        // SAFETY: `display` is open; XMatchVisualInfo only writes into `visual_info`.
        let mut visual_info: xlib::XVisualInfo = unsafe { mem::zeroed() };
        let matched = unsafe {
            xlib::XMatchVisualInfo(
                display,
                screen,
                REQUIRED_VISUAL_DEPTH,
                xlib::TrueColor,
                &mut visual_info,
            )
        };
        if matched == 0 || visual_info.visual.is_null() {
            // ManagedDisplay's Drop will close the display.
            return Err(anyhow!(
                "No matching visual info: screen {} has no {}-bit TrueColor visual.",
                screen,
                REQUIRED_VISUAL_DEPTH
            ));
        }
        debug!(
            "Matched visual {:#x} (depth {}) on screen {}",
            visual_info.visualid, visual_info.depth, screen
        );

        info!("X11 server connection established successfully.");
        Ok(Connection {
            managed_display,
            screen,
            visual_info,
        })
    }

    /// Closes the connection now. Idempotent.
    pub fn close(&mut self) {
        if self.managed_display.ptr.is_null() {
            debug!("X11 display connection already closed.");
            return;
        }
        // Dropping the old ManagedDisplay runs XCloseDisplay.
        let _closed = mem::replace(
            &mut self.managed_display,
            ManagedDisplay {
                ptr: ptr::null_mut(),
            },
        );
    }

    /// Returns the raw X11 display pointer.
    ///
    /// # Safety
    ///
    /// The pointer is null after `close` and dangling after the `Connection`
    /// is dropped; callers must not hand it to Xlib in either state.
    #[inline]
    pub fn display(&self) -> *mut xlib::Display {
        self.managed_display.raw()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        !self.managed_display.ptr.is_null()
    }

    /// The matched TrueColor visual.
    #[inline]
    pub fn visual(&self) -> *mut xlib::Visual {
        self.visual_info.visual
    }

    /// Depth of the matched visual.
    #[inline]
    pub fn depth(&self) -> c_int {
        self.visual_info.depth
    }

    pub fn root_window(&self) -> xlib::Window {
        unsafe { xlib::XRootWindow(self.display(), self.screen) }
    }

    pub fn default_gc(&self) -> xlib::GC {
        unsafe { xlib::XDefaultGC(self.display(), self.screen) }
    }

    /// Interns `name` (which must be NUL-terminated). Returns `None` when
    /// `only_if_exists` is set and the server does not know the atom.
    pub fn intern_atom(&self, name: &[u8], only_if_exists: bool) -> Option<xlib::Atom> {
        debug_assert_eq!(name.last(), Some(&0), "atom name must be NUL-terminated");
        let atom = unsafe {
            xlib::XInternAtom(
                self.display(),
                name.as_ptr() as *const libc::c_char,
                if only_if_exists { xlib::True } else { xlib::False },
            )
        };
        if atom == 0 {
            None
        } else {
            Some(atom)
        }
    }

    pub fn flush(&self) {
        unsafe {
            xlib::XFlush(self.display());
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!("Dropping Connection object. ManagedDisplay's drop will handle XCloseDisplay.");
    }
}
