// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for rendering integrations.
//!
//! Scanout splits pixel work into *backend* crates. Each backend provides
//! one [`GraphicsBackend`] implementation covering three capabilities:
//!
//! - **Surface construction** — wrap caller-owned memory zero-copy
//!   ([`GraphicsBackend::wrap_external`]) or allocate a backend-owned
//!   buffer ([`GraphicsBackend::allocate`]).
//!
//! - **Render contexts** — short-lived [`RenderContext`] values that record
//!   a source, an orientation, and finally composite onto a target surface.
//!   A context borrows its target for its whole lifetime, so it can never
//!   outlive the surface it paints.
//!
//! - **Naming** — [`GraphicsBackend::name`] identifies the backend in
//!   device-initialization error causes.
//!
//! # Crate boundaries
//!
//! `scanout_core` owns the data model and this contract. Backend crates
//! (the CPU direct converter today) depend on `scanout_core` and implement
//! it. The compositor is generic over `B: GraphicsBackend`; the concrete
//! backend is fixed at build-configuration time and dispatched statically —
//! a deployment never switches backends at runtime.
//!
//! # Frame pseudocode
//!
//! ```rust,ignore
//! let source = unsafe { backend.wrap_external(PixelFormat::Argb32, data, w, h, stride) };
//! if source.is_valid() {
//!     let mut ctx = backend.context(&mut device_surface);
//!     ctx.rotate(&source, rotation).set_source(&source, 0, 0).paint();
//! }
//! // an invalid source skips the composite; the caller still signals
//! // completion so the producer gets its buffer back
//! ```

use crate::format::PixelFormat;
use crate::rotate::Rotation;
use crate::surface::Surface;

/// A pluggable 2D rendering backend.
///
/// Implementations are cheap handles; the expensive state lives in the
/// surfaces they create.
pub trait GraphicsBackend {
    /// Surface type produced by this backend.
    type Surface: Surface;

    /// Render context borrowing a target surface for `'t`.
    type Context<'t>: RenderContext<'t, Surface = Self::Surface>
    where
        Self: 't;

    /// Returns the backend's name, used as an error cause when creating the
    /// device surface fails.
    fn name(&self) -> &'static str;

    /// Wraps caller-owned memory as a surface without copying.
    ///
    /// A null `data`, non-positive dimensions, or a stride smaller than the
    /// format's minimum for `width` yield an *invalid* surface rather than
    /// an error; see [`Surface::is_valid`].
    ///
    /// # Safety
    ///
    /// When the returned surface is valid, `data` must point to at least
    /// `stride × height` bytes that stay readable (and writable, if the
    /// surface is used as a paint target) for the surface's lifetime. The
    /// surface never frees this memory.
    unsafe fn wrap_external(
        &self,
        format: PixelFormat,
        data: *mut u8,
        width: i32,
        height: i32,
        stride: i32,
    ) -> Self::Surface;

    /// Allocates a zeroed backend-owned surface with the format's minimum
    /// stride. The backing buffer is released with the surface.
    fn allocate(&self, format: PixelFormat, width: u32, height: u32) -> Self::Surface;

    /// Creates a render context targeting `target`.
    ///
    /// Contexts are created and dropped once per composite; they must stay
    /// cheap enough to build on every frame.
    fn context<'t>(&self, target: &'t mut Self::Surface) -> Self::Context<'t>
    where
        Self: 't;
}

/// Records a source and an orientation, then composites onto a target.
///
/// Operations are chainable; each is independently specified and the order
/// used by the compositor is `rotate`, `set_source`, `paint`. A context
/// whose target surface is invalid turns every operation into a no-op.
pub trait RenderContext<'t> {
    /// Surface type this context works with.
    type Surface: Surface;

    /// Records `source` as the paint source at a device-space pixel offset.
    /// No pixels are copied until [`RenderContext::paint`].
    fn set_source(&mut self, source: &'t Self::Surface, offset_x: i32, offset_y: i32) -> &mut Self;

    /// Applies the translate-then-rotate transform for an image with
    /// `reference`'s dimensions, so a subsequent paint lands correctly
    /// oriented on the target. See [`crate::rotate`] for the rule.
    fn rotate(&mut self, reference: &Self::Surface, rotation: Rotation) -> &mut Self;

    /// Composites the recorded source onto the target using source-over
    /// replacement (no blending with destination pixels). Terminal
    /// operation of a frame's render sequence; a no-op when either surface
    /// is invalid or no source is set.
    fn paint(&mut self);
}
