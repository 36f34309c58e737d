// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The surface geometry and validity contract.
//!
//! A surface is a rectangular pixel buffer with a format, dimensions, and a
//! row stride, independent of who owns the backing bytes. Backends provide
//! two kinds: *wrapped* surfaces that borrow caller-owned memory (client
//! buffers, the device mapping) and *owned* surfaces backed by a
//! backend-made allocation.

use crate::format::PixelFormat;

/// Backend-agnostic view of a rectangular pixel buffer.
///
/// # Invalid surfaces
///
/// Construction never fails loudly: a surface built from a null pointer or
/// zero-sized geometry is *invalid* and reports so through
/// [`Surface::is_valid`]. Every operation on an invalid surface is a no-op
/// that propagates the invalid state; callers that care (the compositor
/// does, for client buffers) check validity right after construction.
pub trait Surface {
    /// Returns the pixel format.
    fn format(&self) -> PixelFormat;

    /// Returns the width in pixels.
    ///
    /// Backends that report negative sentinel widths on error must clamp
    /// them to 0 here, never returning an underflowed value.
    fn width(&self) -> u32;

    /// Returns the height in pixels, clamped like [`Surface::width`].
    fn height(&self) -> u32;

    /// Returns the row stride in bytes.
    fn stride(&self) -> u32;

    /// Returns whether the surface is usable for rendering.
    fn is_valid(&self) -> bool;

    /// Returns a short human-readable status, `"success"` when valid.
    fn status(&self) -> &'static str;
}
