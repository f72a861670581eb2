// src/renderer.rs

//! Fills an `OffscreenBuffer` with the animated gradient.

use crate::buffer::{OffscreenBuffer, BYTES_PER_PIXEL};
use log::trace;

/// Computes one 0x00RRGGBB gradient pixel.
///
/// Each channel keeps only the low byte of its sum, so the offsets may wrap
/// freely.
#[inline]
pub fn gradient_pixel(x: i32, y: i32, xoffset: i32, yoffset: i32) -> u32 {
    let blue = x.wrapping_add(xoffset) as u8;
    let green = y.wrapping_add(yoffset) as u8;
    let red = x.wrapping_add(y).wrapping_add(yoffset) as u8;
    (u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue)
}

/// Writes the gradient for the given phase into every visible pixel of
/// `buffer`, row by row. Row padding beyond `width * 4` is not touched.
pub fn render_gradient(buffer: &mut OffscreenBuffer, xoffset: i32, yoffset: i32) {
    let width = buffer.width();
    let height = buffer.height();
    let pitch = buffer.pitch();
    trace!(
        "Rendering gradient {}x{} at offsets ({}, {})",
        width,
        height,
        xoffset,
        yoffset
    );

    if width == 0 || height == 0 {
        return;
    }

    let row_bytes = width * BYTES_PER_PIXEL;
    for (y, row) in buffer
        .as_bytes_mut()
        .chunks_mut(pitch)
        .take(height)
        .enumerate()
    {
        for (x, px) in row[..row_bytes]
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .enumerate()
        {
            let value = gradient_pixel(x as i32, y as i32, xoffset, yoffset);
            px.copy_from_slice(&value.to_ne_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn expected(x: usize, y: usize) -> u32 {
        (((x + y) as u32 & 0xFF) << 16) | ((y as u32 & 0xFF) << 8) | (x as u32 & 0xFF)
    }

    #[test]
    fn zero_offsets_follow_channel_formula() {
        let mut buffer = OffscreenBuffer::new(256, 256).unwrap();
        render_gradient(&mut buffer, 0, 0);
        for y in 0..256 {
            for x in 0..256 {
                assert_eq!(buffer.pixel(x, y), Some(expected(x, y)), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        for &(w, h, xo, yo) in &[(1, 1, 0, 0), (17, 9, 5, -3), (300, 2, i32::MAX, i32::MIN)] {
            let mut a = OffscreenBuffer::new(w, h).unwrap();
            let mut b = OffscreenBuffer::new(w, h).unwrap();
            render_gradient(&mut a, xo, yo);
            render_gradient(&mut b, xo, yo);
            assert_eq!(a.as_bytes(), b.as_bytes());
            // A second pass over already-filled memory must give the same bytes.
            render_gradient(&mut a, xo, yo);
            assert_eq!(a.as_bytes(), b.as_bytes());
        }
    }

    #[test]
    fn offsets_shift_the_phase() {
        let mut buffer = OffscreenBuffer::new(4, 4).unwrap();
        render_gradient(&mut buffer, 10, 20);
        assert_eq!(buffer.pixel(0, 0), Some((20 << 16) | (20 << 8) | 10));
        assert_eq!(buffer.pixel(3, 2), Some((25 << 16) | (22 << 8) | 13));
    }

    #[test]
    fn offsets_wrap_on_overflow() {
        assert_eq!(gradient_pixel(0, 0, i32::MAX, i32::MAX), 0x00FF_FFFF);
        assert_eq!(
            gradient_pixel(0, 0, i32::MAX, i32::MAX),
            gradient_pixel(0, 0, -1, -1)
        );
        for (x, y) in [(0, 0), (7, 3), (255, 128)] {
            assert_eq!(
                gradient_pixel(x, y, i32::MAX.wrapping_add(1), 0),
                gradient_pixel(x, y, i32::MIN, 0)
            );
            assert_eq!(
                gradient_pixel(x, y, 0, i32::MAX.wrapping_add(2)),
                gradient_pixel(x, y, 0, i32::MIN + 1)
            );
        }
        assert_eq!(gradient_pixel(0, 0, 256, 512), 0);
    }

    #[test]
    fn row_padding_is_respected() {
        let mut buffer = OffscreenBuffer::with_pitch(3, 3, 20).unwrap();
        buffer.as_bytes_mut().fill(0xAB);
        render_gradient(&mut buffer, 0, 0);

        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(buffer.pixel(x, y), Some(expected(x, y)));
            }
            let row = &buffer.as_bytes()[y * 20..(y + 1) * 20];
            assert!(row[12..].iter().all(|&b| b == 0xAB), "padding in row {} was written", y);
        }
    }

    #[test]
    fn most_significant_byte_is_unused() {
        let mut buffer = OffscreenBuffer::new(64, 64).unwrap();
        render_gradient(&mut buffer, 123, 456);
        for y in 0..64 {
            for x in 0..64 {
                assert_eq!(buffer.pixel(x, y).unwrap() >> 24, 0);
            }
        }
    }
}
