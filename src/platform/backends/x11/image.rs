// src/platform/backends/x11/image.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

//! Pairs an `OffscreenBuffer` with the `XImage` that aliases its memory.
//!
//! The two are created together and released together. The image is never
//! exposed on its own, so a stale image pointing at freed or resized memory
//! cannot be observed.

use super::connection::Connection;
use crate::buffer::{OffscreenBuffer, BYTES_PER_PIXEL};
use anyhow::{anyhow, Context, Result};
use log::{debug, trace};
use std::ptr;

use libc::{c_char, c_int, c_uint};
use x11::xlib;

/// Scanline pad and bits per pixel of the image format.
const BITMAP_PAD: c_int = 32;

pub struct ImageSurface {
    image: *mut xlib::XImage,
    buffer: OffscreenBuffer,
}

impl ImageSurface {
    /// Allocates pixel memory for `width` x `height` and wraps it in a
    /// ZPixmap `XImage` for the connection's visual.
    pub fn new(connection: &Connection, width: u32, height: u32) -> Result<Self> {
        let mut buffer = OffscreenBuffer::new(width as usize, height as usize)
            .context("Failed to allocate offscreen buffer memory")?;

        let bytes_per_line = c_int::try_from(buffer.pitch())
            .map_err(|_| anyhow!("Row pitch {} does not fit an XImage", buffer.pitch()))?;

        // SAFETY: display and visual are valid while `connection` is open.
        // The data pointer stays valid because `buffer` is never resized and
        // lives in the same struct as the image.
        let image = unsafe {
            xlib::XCreateImage(
                connection.display(),
                connection.visual(),
                connection.depth() as c_uint,
                xlib::ZPixmap,
                0, // offset
                buffer.as_mut_ptr() as *mut c_char,
                width as c_uint,
                height as c_uint,
                BITMAP_PAD,
                bytes_per_line,
            )
        };
        if image.is_null() {
            return Err(anyhow!("XCreateImage failed for {}x{}", width, height));
        }

        // SAFETY: `image` was just returned non-null by XCreateImage.
        let (image_bpp, image_pitch) =
            unsafe { ((*image).bits_per_pixel, (*image).bytes_per_line) };
        if image_bpp as usize != BYTES_PER_PIXEL * 8 || image_pitch != bytes_per_line {
            // Dropping the surface destroys the image before the memory goes.
            drop(Self { image, buffer });
            return Err(anyhow!(
                "XImage layout mismatch: {} bpp, {} bytes per line (expected {} bpp, {})",
                image_bpp,
                image_pitch,
                BYTES_PER_PIXEL * 8,
                bytes_per_line
            ));
        }

        debug!(
            "Created XImage {:p} for {}x{} buffer ({} bytes)",
            image,
            width,
            height,
            buffer.size()
        );
        Ok(Self { image, buffer })
    }

    pub fn buffer(&self) -> &OffscreenBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut OffscreenBuffer {
        &mut self.buffer
    }

    /// Copies the whole image onto `drawable` at (0, 0).
    pub fn put(&self, connection: &Connection, drawable: xlib::Drawable, gc: xlib::GC) {
        trace!(
            "XPutImage {}x{} onto drawable {}",
            self.buffer.width(),
            self.buffer.height(),
            drawable
        );
        unsafe {
            xlib::XPutImage(
                connection.display(),
                drawable,
                gc,
                self.image,
                0,
                0,
                0,
                0,
                self.buffer.width() as c_uint,
                self.buffer.height() as c_uint,
            );
        }
    }
}

impl Drop for ImageSurface {
    fn drop(&mut self) {
        if self.image.is_null() {
            return;
        }
        // SAFETY: the image came from XCreateImage. Detach the data first so
        // XDestroyImage does not free() memory owned by the Vec in `buffer`.
        unsafe {
            (*self.image).data = ptr::null_mut();
            xlib::XDestroyImage(self.image);
        }
        self.image = ptr::null_mut();
        debug!(
            "Released XImage and {}x{} buffer",
            self.buffer.width(),
            self.buffer.height()
        );
    }
}
