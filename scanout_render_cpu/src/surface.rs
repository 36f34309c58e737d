// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain pixel-buffer surfaces for the CPU backend.

use core::fmt;
use core::ptr::NonNull;

use scanout_core::format::PixelFormat;
use scanout_core::surface::Surface;

/// Who owns the surface's backing bytes.
enum Backing {
    /// Construction was refused; the reason doubles as the status string.
    Invalid(&'static str),
    /// Caller-owned memory, wrapped zero-copy and never freed here. The
    /// wrapper's validity precondition is the `wrap` safety contract.
    Borrowed(NonNull<u8>),
    /// Backend-owned allocation, released with the surface.
    Owned(Vec<u8>),
}

/// A rectangular pixel buffer in CPU memory.
///
/// Surfaces are either zero-copy views of caller-owned memory (client
/// buffers, the framebuffer mapping) or owned allocations. An invalid
/// surface (null pointer, zero-sized or malformed geometry) is inert: all
/// pixel operations on it are no-ops and [`Surface::status`] names the
/// refusal reason.
pub struct CpuSurface {
    format: PixelFormat,
    width: i32,
    height: i32,
    stride: i32,
    backing: Backing,
}

impl CpuSurface {
    /// Wraps caller-owned memory. See
    /// [`GraphicsBackend::wrap_external`](scanout_core::backend::GraphicsBackend::wrap_external)
    /// for the checks and the safety contract.
    ///
    /// # Safety
    ///
    /// If the checks pass, `data` must point to `stride × height` bytes
    /// valid for the surface's lifetime.
    pub(crate) unsafe fn wrap(
        format: PixelFormat,
        data: *mut u8,
        width: i32,
        height: i32,
        stride: i32,
    ) -> Self {
        let backing = match NonNull::new(data) {
            None => Backing::Invalid("null data pointer"),
            Some(_) if width <= 0 || height <= 0 => Backing::Invalid("zero-sized buffer"),
            Some(_)
                if i64::from(stride)
                    < i64::from(width) * i64::from(format.bytes_per_pixel()) =>
            {
                Backing::Invalid("stride smaller than one row")
            }
            Some(ptr) => Backing::Borrowed(ptr),
        };
        Self {
            format,
            width,
            height,
            stride,
            backing,
        }
    }

    /// Allocates a zeroed owned surface with the format's minimum stride.
    pub(crate) fn owned(format: PixelFormat, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self {
                format,
                width: 0,
                height: 0,
                stride: 0,
                backing: Backing::Invalid("zero-sized buffer"),
            };
        }
        let stride = format.min_stride(width);
        let len = stride as usize * height as usize;
        Self {
            format,
            width: width as i32,
            height: height as i32,
            stride: stride as i32,
            backing: Backing::Owned(vec![0; len]),
        }
    }

    /// Reads the packed pixel at `(x, y)`, zero-extended to 32 bits.
    ///
    /// Returns [`None`] on an invalid surface or out-of-bounds coordinate.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if !self.is_valid() || x >= self.width() || y >= self.height() {
            return None;
        }
        let bpp = self.format.bytes_per_pixel() as usize;
        let offset = y as usize * self.stride() as usize + x as usize * bpp;
        // SAFETY: the surface is valid, so the backing holds at least
        // `stride × height` bytes and `offset + bpp` stays inside the row.
        let bytes = unsafe { core::slice::from_raw_parts(self.base_ptr().add(offset), bpp) };
        Some(match self.format {
            PixelFormat::Argb32 => bytemuck::pod_read_unaligned::<u32>(bytes),
            PixelFormat::Rgb565 => u32::from(bytemuck::pod_read_unaligned::<u16>(bytes)),
        })
    }

    /// Writes the packed pixel at `(x, y)`; extra high bits are dropped for
    /// 16-bit formats. No-op on an invalid surface or out of bounds.
    pub(crate) fn put_pixel(&mut self, x: u32, y: u32, raw: u32) {
        if !self.is_valid() || x >= self.width() || y >= self.height() {
            return;
        }
        let bpp = self.format.bytes_per_pixel() as usize;
        let offset = y as usize * self.stride() as usize + x as usize * bpp;
        // SAFETY: bounds as in `pixel`; writability of borrowed memory is
        // the `wrap` safety contract.
        unsafe {
            let dst = self.base_mut_ptr().add(offset);
            match self.format {
                PixelFormat::Argb32 => dst.cast::<u32>().write_unaligned(raw),
                #[expect(clippy::cast_possible_truncation, reason = "extra high bits are dropped")]
                PixelFormat::Rgb565 => dst.cast::<u16>().write_unaligned(raw as u16),
            }
        }
    }

    /// Base pointer of a *valid* surface's backing.
    fn base_ptr(&self) -> *const u8 {
        match &self.backing {
            Backing::Borrowed(ptr) => ptr.as_ptr(),
            Backing::Owned(bytes) => bytes.as_ptr(),
            Backing::Invalid(_) => unreachable!("checked by is_valid"),
        }
    }

    fn base_mut_ptr(&mut self) -> *mut u8 {
        match &mut self.backing {
            Backing::Borrowed(ptr) => ptr.as_ptr(),
            Backing::Owned(bytes) => bytes.as_mut_ptr(),
            Backing::Invalid(_) => unreachable!("checked by is_valid"),
        }
    }
}

impl Surface for CpuSurface {
    fn format(&self) -> PixelFormat {
        self.format
    }

    // Dimensions are stored as reported; negative sentinel values clamp to
    // zero here instead of underflowing.
    fn width(&self) -> u32 {
        self.width.max(0) as u32
    }

    fn height(&self) -> u32 {
        self.height.max(0) as u32
    }

    fn stride(&self) -> u32 {
        self.stride.max(0) as u32
    }

    fn is_valid(&self) -> bool {
        !matches!(self.backing, Backing::Invalid(_))
    }

    fn status(&self) -> &'static str {
        match self.backing {
            Backing::Invalid(reason) => reason,
            Backing::Borrowed(_) | Backing::Owned(_) => "success",
        }
    }
}

impl fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuSurface")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field(
                "backing",
                &match self.backing {
                    Backing::Invalid(reason) => reason,
                    Backing::Borrowed(_) => "borrowed",
                    Backing::Owned(_) => "owned",
                },
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::CpuSurface;
    use scanout_core::format::PixelFormat;
    use scanout_core::surface::Surface;

    #[test]
    fn null_pointer_wrap_is_invalid() {
        // SAFETY: the wrap is refused, so no memory is ever dereferenced.
        let surface = unsafe {
            CpuSurface::wrap(PixelFormat::Argb32, core::ptr::null_mut(), 100, 50, 400)
        };
        assert!(!surface.is_valid());
        assert_eq!(surface.status(), "null data pointer");
        assert_eq!(surface.pixel(0, 0), None);
    }

    #[test]
    fn zero_or_negative_dimensions_are_invalid_and_clamp() {
        let mut bytes = [0u8; 16];
        for (w, h) in [(0, 4), (4, 0), (-3, 4), (4, -3)] {
            // SAFETY: refused wraps never touch the buffer.
            let surface =
                unsafe { CpuSurface::wrap(PixelFormat::Argb32, bytes.as_mut_ptr(), w, h, 16) };
            assert!(!surface.is_valid(), "({w},{h}) must be invalid");
            assert_eq!(surface.status(), "zero-sized buffer");
            // Negative reported geometry clamps to zero, never underflows.
            assert!(surface.width() == w.max(0) as u32);
            assert!(surface.height() == h.max(0) as u32);
        }
    }

    #[test]
    fn undersized_stride_is_invalid() {
        let mut bytes = [0u8; 64];
        // SAFETY: refused wrap.
        let surface =
            unsafe { CpuSurface::wrap(PixelFormat::Argb32, bytes.as_mut_ptr(), 4, 4, 12) };
        assert_eq!(surface.status(), "stride smaller than one row");
    }

    #[test]
    fn wrapped_memory_is_viewed_zero_copy() {
        let mut bytes = [0u8; 4 * 2 * 2];
        // SAFETY: `bytes` outlives `surface` and covers stride × height.
        let mut surface =
            unsafe { CpuSurface::wrap(PixelFormat::Argb32, bytes.as_mut_ptr(), 2, 2, 8) };
        assert!(surface.is_valid());
        assert_eq!(surface.status(), "success");

        surface.put_pixel(1, 1, 0xff11_2233);
        assert_eq!(surface.pixel(1, 1), Some(0xff11_2233));
        drop(surface);
        // The write went to the caller's buffer.
        let word = u32::from_ne_bytes(bytes[12..16].try_into().unwrap());
        assert_eq!(word, 0xff11_2233);
    }

    #[test]
    fn owned_surface_is_zeroed_and_bounded() {
        let mut surface = CpuSurface::owned(PixelFormat::Rgb565, 3, 2);
        assert!(surface.is_valid());
        assert_eq!(surface.stride(), 6);
        assert_eq!(surface.pixel(2, 1), Some(0));
        // Out-of-bounds access is inert.
        assert_eq!(surface.pixel(3, 0), None);
        surface.put_pixel(3, 0, 0xffff);
        assert_eq!(surface.pixel(2, 1), Some(0));
    }

    #[test]
    fn zero_sized_owned_allocation_is_invalid() {
        let surface = CpuSurface::owned(PixelFormat::Argb32, 0, 240);
        assert!(!surface.is_valid());
        assert_eq!(surface.width(), 0);
        assert_eq!(surface.height(), 0);
    }

    #[test]
    fn rgb565_pixels_store_sixteen_bits() {
        let mut surface = CpuSurface::owned(PixelFormat::Rgb565, 2, 1);
        surface.put_pixel(0, 0, 0xdead_f800);
        assert_eq!(surface.pixel(0, 0), Some(0xf800), "high bits dropped");
    }
}
