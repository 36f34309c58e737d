// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU rendering backend for scanout.
//!
//! This crate is the minimal direct-format-converter backend: surfaces are
//! plain pixel buffers (wrapped caller memory or owned allocations) and the
//! render context is an integer blit loop that converts ARGB32 to RGB565 on
//! the way to the target and applies quarter-turn placement. There is no
//! general 2D drawing here — only whole-image copy/convert/rotate, which is
//! all the presentation pipeline needs.

#![allow(
    unsafe_code,
    reason = "wrapped surfaces view caller-owned memory (client buffers, the \
              framebuffer mapping) through raw pointers"
)]

mod context;
mod surface;

pub use context::CpuRenderContext;
pub use surface::CpuSurface;

use scanout_core::backend::GraphicsBackend;
use scanout_core::format::PixelFormat;

/// The CPU direct-converter backend.
///
/// Stateless; all state lives in the surfaces it creates. One `CpuBackend`
/// is constructed at startup and handed to the compositor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuBackend;

impl CpuBackend {
    /// Creates the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl GraphicsBackend for CpuBackend {
    type Surface = CpuSurface;
    type Context<'t>
        = CpuRenderContext<'t>
    where
        Self: 't;

    fn name(&self) -> &'static str {
        "cpu"
    }

    unsafe fn wrap_external(
        &self,
        format: PixelFormat,
        data: *mut u8,
        width: i32,
        height: i32,
        stride: i32,
    ) -> CpuSurface {
        // SAFETY: forwarded; the caller upholds the `wrap_external` contract.
        unsafe { CpuSurface::wrap(format, data, width, height, stride) }
    }

    fn allocate(&self, format: PixelFormat, width: u32, height: u32) -> CpuSurface {
        CpuSurface::owned(format, width, height)
    }

    fn context<'t>(&self, target: &'t mut CpuSurface) -> CpuRenderContext<'t>
    where
        Self: 't,
    {
        CpuRenderContext::new(target)
    }
}
