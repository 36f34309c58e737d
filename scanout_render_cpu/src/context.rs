// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame blit context.

use scanout_core::backend::RenderContext;
use scanout_core::format::{PixelFormat, argb32_to_rgb565, rgb565_to_argb32};
use scanout_core::rotate::{Placement, Rotation};
use scanout_core::surface::Surface;

use crate::surface::CpuSurface;

/// Composites one source surface onto one target surface.
///
/// Created per frame by [`CpuBackend::context`](crate::CpuBackend); borrows
/// the target for its whole lifetime. Holds the recorded source, its
/// device-space offset, and the quarter-turn placement; [`paint`] walks the
/// source once and writes converted pixels.
///
/// [`paint`]: RenderContext::paint
#[derive(Debug)]
pub struct CpuRenderContext<'t> {
    target: &'t mut CpuSurface,
    source: Option<(&'t CpuSurface, i32, i32)>,
    placement: Placement,
}

impl<'t> CpuRenderContext<'t> {
    pub(crate) fn new(target: &'t mut CpuSurface) -> Self {
        Self {
            target,
            source: None,
            placement: Placement::identity(),
        }
    }

    fn convert(raw: u32, from: PixelFormat, to: PixelFormat) -> u32 {
        match (from, to) {
            (PixelFormat::Argb32, PixelFormat::Rgb565) => u32::from(argb32_to_rgb565(raw)),
            #[expect(clippy::cast_possible_truncation, reason = "565 pixels carry 16 bits")]
            (PixelFormat::Rgb565, PixelFormat::Argb32) => rgb565_to_argb32(raw as u16),
            _ => raw,
        }
    }
}

impl<'t> RenderContext<'t> for CpuRenderContext<'t> {
    type Surface = CpuSurface;

    fn set_source(&mut self, source: &'t CpuSurface, offset_x: i32, offset_y: i32) -> &mut Self {
        self.source = Some((source, offset_x, offset_y));
        self
    }

    fn rotate(&mut self, reference: &CpuSurface, rotation: Rotation) -> &mut Self {
        self.placement = Placement::new(rotation, reference.width(), reference.height());
        self
    }

    fn paint(&mut self) {
        let Some((source, offset_x, offset_y)) = self.source else {
            return;
        };
        if !source.is_valid() || !self.target.is_valid() {
            return;
        }

        let (src_format, dst_format) = (source.format(), self.target.format());
        let (target_w, target_h) = (i64::from(self.target.width()), i64::from(self.target.height()));

        for sy in 0..source.height() {
            for sx in 0..source.width() {
                let (px, py) = self.placement.map(sx, sy);
                let tx = i64::from(px) + i64::from(offset_x);
                let ty = i64::from(py) + i64::from(offset_y);
                if tx < 0 || ty < 0 || tx >= target_w || ty >= target_h {
                    continue;
                }
                // Source pixels are in bounds by the loop ranges.
                let raw = source.pixel(sx, sy).unwrap_or(0);
                #[expect(clippy::cast_possible_truncation, reason = "bounds-checked above")]
                let (tx, ty) = (tx as u32, ty as u32);
                self.target
                    .put_pixel(tx, ty, Self::convert(raw, src_format, dst_format));
            }
        }
    }
}
