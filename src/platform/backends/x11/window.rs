// src/platform/backends/x11/window.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use super::connection::Connection;
use crate::config::WindowConfig;
use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::ffi::CString;
use std::mem;

// X11 library imports
use libc::{c_char, c_int, c_long, c_uint};
use x11::xlib;

/// `_NET_WM_STATE` client message action that flips the listed states.
const NET_WM_STATE_TOGGLE: c_long = 2;
/// Source indication for `_NET_WM_STATE` requests: a normal application.
const NET_WM_SOURCE_APPLICATION: c_long = 1;

/// Size constraints advertised through `WM_NORMAL_HINTS`.
///
/// Each bound is only set when both of its dimensions are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeHints {
    pub min: Option<(u32, u32)>,
    pub max: Option<(u32, u32)>,
}

impl SizeHints {
    pub fn new(min_width: u32, min_height: u32, max_width: u32, max_height: u32) -> Self {
        let bound = |w: u32, h: u32| if w > 0 && h > 0 { Some((w, h)) } else { None };
        Self {
            min: bound(min_width, min_height),
            max: bound(max_width, max_height),
        }
    }

    pub fn from_config(config: &WindowConfig) -> Self {
        Self::new(
            config.min_width,
            config.min_height,
            config.max_width,
            config.max_height,
        )
    }

    /// The `XSizeHints::flags` value for these bounds.
    pub fn flags(&self) -> c_long {
        let mut flags = 0;
        if self.min.is_some() {
            flags |= xlib::PMinSize;
        }
        if self.max.is_some() {
            flags |= xlib::PMaxSize;
        }
        flags
    }

    fn to_xlib(self) -> xlib::XSizeHints {
        // SAFETY: XSizeHints is a plain C struct; all-zero is a valid value.
        let mut hints: xlib::XSizeHints = unsafe { mem::zeroed() };
        hints.flags = self.flags();
        if let Some((w, h)) = self.min {
            hints.min_width = w as c_int;
            hints.min_height = h as c_int;
        }
        if let Some((w, h)) = self.max {
            hints.max_width = w as c_int;
            hints.max_height = h as c_int;
        }
        hints
    }
}

/// Represents the single managed X11 window.
///
/// Owns the window ID, its private colormap and the `WM_DELETE_WINDOW` atom.
/// `cleanup` must be called before the `Connection` closes; `Drop` only logs
/// if that did not happen.
#[derive(Debug)]
pub struct Window {
    id: xlib::Window,
    colormap: xlib::Colormap,
    wm_delete_window: Option<xlib::Atom>,
    destroyed: bool,
}

impl Window {
    /// Creates the window with the connection's matched visual.
    ///
    /// Static bit gravity keeps the server from clearing the contents on
    /// every resize, which would otherwise flicker between presents.
    pub fn new(connection: &Connection, width_px: u32, height_px: u32) -> Result<Self> {
        info!("Creating X11 window: {}x{}px", width_px, height_px);
        let display = connection.display();
        let root = connection.root_window();

        // SAFETY: display is open; visual comes from XMatchVisualInfo on it.
        let (window_id, colormap) = unsafe {
            let colormap =
                xlib::XCreateColormap(display, root, connection.visual(), xlib::AllocNone);

            let mut attributes: xlib::XSetWindowAttributes = mem::zeroed();
            attributes.bit_gravity = xlib::StaticGravity;
            attributes.background_pixel = 0;
            attributes.colormap = colormap;
            attributes.event_mask =
                xlib::StructureNotifyMask | xlib::KeyPressMask | xlib::KeyReleaseMask;
            let attribute_mask =
                xlib::CWBackPixel | xlib::CWColormap | xlib::CWEventMask | xlib::CWBitGravity;

            let id = xlib::XCreateWindow(
                display,
                root,
                0,
                0,
                width_px as c_uint,
                height_px as c_uint,
                0, // border width
                connection.depth(),
                xlib::InputOutput as c_uint,
                connection.visual(),
                attribute_mask,
                &mut attributes,
            );
            (id, colormap)
        };

        if window_id == 0 {
            unsafe {
                xlib::XFreeColormap(display, colormap);
            }
            return Err(anyhow!("XCreateWindow failed"));
        }
        debug!("X window created (ID: {}), colormap {}", window_id, colormap);

        Ok(Self {
            id: window_id,
            colormap,
            wm_delete_window: None,
            destroyed: false,
        })
    }

    /// Applies size hints and the title, and registers `WM_DELETE_WINDOW`.
    ///
    /// A failed protocol registration is logged and tolerated: the window
    /// still works, the window manager may just kill it instead of asking.
    pub fn setup_protocols_and_hints(
        &mut self,
        connection: &Connection,
        title: &str,
        hints: SizeHints,
    ) -> Result<()> {
        let display = connection.display();

        let mut size_hints = hints.to_xlib();
        unsafe {
            xlib::XSetWMNormalHints(display, self.id, &mut size_hints);
        }
        debug!("WM size hints set: {:?}", hints);

        self.set_title(connection, title)?;

        let atom = connection.intern_atom(b"WM_DELETE_WINDOW\0", false);
        let registered = match atom {
            Some(mut atom) => unsafe { xlib::XSetWMProtocols(display, self.id, &mut atom, 1) != 0 },
            None => false,
        };
        if registered {
            self.wm_delete_window = atom;
            debug!("WM_PROTOCOLS (WM_DELETE_WINDOW) registered.");
        } else {
            warn!("Couldn't register WM_DELETE_WINDOW property. Close requests may destroy the window directly.");
        }
        Ok(())
    }

    /// Sets `WM_NAME` and the UTF-8 `_NET_WM_NAME`.
    pub fn set_title(&self, connection: &Connection, title: &str) -> Result<()> {
        let display = connection.display();
        let title_cstr = CString::new(title).context("Failed to create CString for title")?;
        unsafe {
            xlib::XStoreName(display, self.id, title_cstr.as_ptr() as *const c_char);
        }

        match (
            connection.intern_atom(b"_NET_WM_NAME\0", false),
            connection.intern_atom(b"UTF8_STRING\0", false),
        ) {
            (Some(net_wm_name), Some(utf8_string)) => unsafe {
                xlib::XChangeProperty(
                    display,
                    self.id,
                    net_wm_name,
                    utf8_string,
                    8, // format: 8-bit for UTF8_STRING
                    xlib::PropModeReplace,
                    title_cstr.as_ptr() as *const u8,
                    title_cstr.as_bytes().len() as c_int,
                );
            },
            _ => debug!("Title set via XStoreName only (_NET_WM_NAME or UTF8_STRING missing)."),
        }
        debug!("Window title set to: {}", title);
        Ok(())
    }

    /// Maps the window and flushes so the request reaches the server now.
    pub fn map_and_flush(&self, connection: &Connection) {
        info!("Mapping window ID: {} and flushing display.", self.id);
        unsafe {
            xlib::XMapWindow(connection.display(), self.id);
        }
        connection.flush();
    }

    /// Asks an EWMH window manager to toggle horizontal and vertical
    /// maximization. Returns `false` if the request could not be sent.
    pub fn toggle_maximize(&self, connection: &Connection) -> bool {
        // Without _NET_WM_STATE none of the related atoms exist either.
        let Some(wm_state) = connection.intern_atom(b"_NET_WM_STATE\0", true) else {
            warn!("Window manager does not support _NET_WM_STATE; cannot maximize.");
            return false;
        };
        let max_h = connection
            .intern_atom(b"_NET_WM_STATE_MAXIMIZED_HORZ\0", false)
            .unwrap_or(0);
        let max_v = connection
            .intern_atom(b"_NET_WM_STATE_MAXIMIZED_VERT\0", false)
            .unwrap_or(0);

        // SAFETY: XEvent is a C union; all-zero is valid before filling the
        // client-message member.
        let status = unsafe {
            let mut event: xlib::XEvent = mem::zeroed();
            let mut message: xlib::XClientMessageEvent = mem::zeroed();
            message.type_ = xlib::ClientMessage;
            message.format = 32;
            message.window = self.id;
            message.message_type = wm_state;
            let longs = message.data.as_longs_mut();
            longs[0] = NET_WM_STATE_TOGGLE;
            longs[1] = max_h as c_long;
            longs[2] = max_v as c_long;
            longs[3] = NET_WM_SOURCE_APPLICATION;
            event.client_message = message;

            xlib::XSendEvent(
                connection.display(),
                connection.root_window(),
                xlib::False,
                xlib::SubstructureNotifyMask,
                &mut event,
            )
        };
        connection.flush();
        debug!("Sent _NET_WM_STATE maximize toggle (status {}).", status);
        status != 0
    }

    /// Unmaps and destroys the window and frees its colormap. Idempotent.
    pub fn cleanup(&mut self, connection: &Connection) {
        if self.id == 0 || !connection.is_open() {
            debug!("Window already destroyed or connection is invalid; cleanup skipped.");
            return;
        }
        info!("Destroying X11 window (ID: {}).", self.id);
        unsafe {
            if !self.destroyed {
                xlib::XUnmapWindow(connection.display(), self.id);
                xlib::XDestroyWindow(connection.display(), self.id);
            }
            if self.colormap != 0 {
                xlib::XFreeColormap(connection.display(), self.colormap);
            }
        }
        connection.flush();
        self.id = 0;
        self.colormap = 0;
    }

    /// Records that the server destroyed the window behind our back.
    /// `id` keeps answering with the old ID; `cleanup` then only frees the
    /// colormap.
    pub fn mark_destroyed(&mut self) {
        debug!("Window {} destroyed by the server.", self.id);
        self.destroyed = true;
    }

    #[inline]
    pub fn id(&self) -> xlib::Window {
        self.id
    }

    /// The registered `WM_DELETE_WINDOW` atom, if registration succeeded.
    #[inline]
    pub fn wm_delete_window_atom(&self) -> Option<xlib::Atom> {
        self.wm_delete_window
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if self.id != 0 && !self.destroyed {
            error!(
                "Window (ID: {}) dropped without explicit cleanup. Server resources may be leaked.",
                self.id
            );
        }
    }
}
