// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel formats and fixed-format conversion.
//!
//! The pipeline deals in exactly two formats: 32-bit ARGB client buffers and
//! the 16-bit RGB565 layout of the mapped framebuffer. Conversion between
//! them is a pure bit-extraction; there is no color management.

/// Pixel layout of a [`Surface`](crate::surface::Surface).
///
/// Formats are described in native-endian packed words: an `Argb32` pixel is
/// one `u32` with alpha in the top byte, an `Rgb565` pixel is one `u16` with
/// red in the top 5 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 32 bits per pixel, 8-bit alpha/red/green/blue.
    Argb32,
    /// 16 bits per pixel, 5-bit red, 6-bit green, 5-bit blue, no alpha.
    Rgb565,
}

impl PixelFormat {
    /// Returns the size of one pixel in bytes.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Argb32 => 4,
            Self::Rgb565 => 2,
        }
    }

    /// Returns the smallest valid row stride in bytes for `width` pixels.
    #[must_use]
    pub const fn min_stride(self, width: u32) -> u32 {
        width * self.bytes_per_pixel()
    }

    /// Returns a short lowercase label for log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Argb32 => "argb32",
            Self::Rgb565 => "rgb565",
        }
    }
}

/// Converts one packed ARGB32 pixel to RGB565, discarding alpha.
///
/// Takes the high 5/6/5 bits of each channel. Alpha is dropped rather than
/// blended; the pipeline composites with source-over *replacement*.
#[inline]
#[must_use]
pub const fn argb32_to_rgb565(argb: u32) -> u16 {
    ((((argb >> 19) & 0x1f) << 11) | (((argb >> 10) & 0x3f) << 5) | ((argb >> 3) & 0x1f)) as u16
}

/// Expands one RGB565 pixel to opaque ARGB32.
///
/// Channel low bits are replicated from the high bits so that full-scale
/// values round-trip to full scale.
#[inline]
#[must_use]
pub const fn rgb565_to_argb32(rgb: u16) -> u32 {
    let r5 = ((rgb >> 11) & 0x1f) as u32;
    let g6 = ((rgb >> 5) & 0x3f) as u32;
    let b5 = (rgb & 0x1f) as u32;
    let r = (r5 << 3) | (r5 >> 2);
    let g = (g6 << 2) | (g6 >> 4);
    let b = (b5 << 3) | (b5 >> 2);
    0xff00_0000 | (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::{PixelFormat, argb32_to_rgb565, rgb565_to_argb32};

    #[test]
    fn bytes_per_pixel_match_packed_word_sizes() {
        assert_eq!(PixelFormat::Argb32.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Rgb565.bytes_per_pixel(), 2);
    }

    #[test]
    fn min_stride_is_width_times_pixel_size() {
        assert_eq!(PixelFormat::Argb32.min_stride(320), 1280);
        assert_eq!(PixelFormat::Rgb565.min_stride(320), 640);
    }

    #[test]
    fn primaries_convert_to_full_scale_565() {
        assert_eq!(argb32_to_rgb565(0xffff_0000), 0xf800, "red");
        assert_eq!(argb32_to_rgb565(0xff00_ff00), 0x07e0, "green");
        assert_eq!(argb32_to_rgb565(0xff00_00ff), 0x001f, "blue");
        assert_eq!(argb32_to_rgb565(0xffff_ffff), 0xffff, "white");
        assert_eq!(argb32_to_rgb565(0xff00_0000), 0x0000, "black");
    }

    #[test]
    fn alpha_is_discarded_not_blended() {
        assert_eq!(argb32_to_rgb565(0x00ff_0000), argb32_to_rgb565(0xffff_0000));
    }

    #[test]
    fn full_scale_565_expands_to_full_scale_argb() {
        assert_eq!(rgb565_to_argb32(0xffff), 0xffff_ffff);
        assert_eq!(rgb565_to_argb32(0x0000), 0xff00_0000);
        assert_eq!(rgb565_to_argb32(0xf800), 0xffff_0000);
    }
}
