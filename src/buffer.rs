// src/buffer.rs

//! CPU-side render target.
//!
//! `OffscreenBuffer` owns the pixel memory that the X11 backend wraps in an
//! `XImage`. The heap block is allocated once per size and never grown, so a
//! pointer taken with `as_mut_ptr` stays valid for the buffer's lifetime.

use anyhow::{anyhow, Result};
use log::debug;

/// Bytes per pixel of the 0x00RRGGBB format used throughout.
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug)]
pub struct OffscreenBuffer {
    memory: Vec<u8>,
    width: usize,
    height: usize,
    pitch: usize,
}

impl OffscreenBuffer {
    /// Allocates a zeroed buffer with tightly packed rows (`pitch == width * 4`).
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let pitch = width
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| anyhow!("Offscreen buffer width {} overflows pitch", width))?;
        Self::with_pitch(width, height, pitch)
    }

    /// Allocates a zeroed buffer whose rows are `pitch` bytes apart.
    ///
    /// `pitch` must be at least `width * BYTES_PER_PIXEL`; any extra bytes are
    /// row padding that the renderer leaves alone.
    pub fn with_pitch(width: usize, height: usize, pitch: usize) -> Result<Self> {
        let min_pitch = width
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| anyhow!("Offscreen buffer width {} overflows pitch", width))?;
        if pitch < min_pitch {
            return Err(anyhow!(
                "Pitch {} is smaller than a {}px row ({} bytes)",
                pitch,
                width,
                min_pitch
            ));
        }
        let size = pitch
            .checked_mul(height)
            .ok_or_else(|| anyhow!("Offscreen buffer {}x{} overflows usize", width, height))?;

        let mut memory = Vec::new();
        memory.try_reserve_exact(size).map_err(|e| {
            anyhow!(
                "Out of memory allocating {} bytes for a {}x{} offscreen buffer: {}",
                size,
                width,
                height,
                e
            )
        })?;
        memory.resize(size, 0);

        debug!(
            "Allocated offscreen buffer {}x{} (pitch {}, {} bytes)",
            width, height, pitch, size
        );
        Ok(Self {
            memory,
            width,
            height,
            pitch,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Total byte size of the pixel memory.
    #[inline]
    pub fn size(&self) -> usize {
        self.memory.len()
    }

    #[cfg(test)]
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        BYTES_PER_PIXEL
    }

    #[cfg(test)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.memory
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Raw pointer to the first byte, for handing to Xlib.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.memory.as_mut_ptr()
    }

    /// Reads the pixel at (`x`, `y`) as a native-endian `u32`.
    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = y * self.pitch + x * BYTES_PER_PIXEL;
        let bytes = self.memory.get(start..start + BYTES_PER_PIXEL)?;
        Some(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn new_buffer_has_packed_geometry() {
        let buffer = OffscreenBuffer::new(640, 480).unwrap();
        assert_eq!(buffer.width(), 640);
        assert_eq!(buffer.height(), 480);
        assert_eq!(buffer.pitch(), 2_560);
        assert_eq!(buffer.size(), 1_228_800);
        assert_eq!(buffer.bytes_per_pixel(), 4);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn padded_pitch_is_kept() {
        let buffer = OffscreenBuffer::with_pitch(3, 2, 16).unwrap();
        assert_eq!(buffer.pitch(), 16);
        assert_eq!(buffer.size(), 32);
    }

    #[test]
    fn pitch_smaller_than_row_is_rejected() {
        assert!(OffscreenBuffer::with_pitch(10, 10, 39).is_err());
    }

    #[test]
    fn oversized_buffer_fails_instead_of_aborting() {
        let err = OffscreenBuffer::new(usize::MAX / 2, 4).unwrap_err();
        assert!(err.to_string().contains("overflows"), "got: {}", err);

        let err = OffscreenBuffer::new(1 << 28, 1 << 20).unwrap_err();
        assert!(
            err.to_string().contains("overflows") || err.to_string().contains("Out of memory"),
            "got: {}",
            err
        );
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let buffer = OffscreenBuffer::new(2, 2).unwrap();
        assert_eq!(buffer.pixel(0, 0), Some(0));
        assert_eq!(buffer.pixel(2, 0), None);
        assert_eq!(buffer.pixel(0, 2), None);
    }
}
