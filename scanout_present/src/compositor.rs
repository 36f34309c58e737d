// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame compositing driver.

use std::time::Instant;

use scanout_core::backend::{GraphicsBackend, RenderContext as _};
use scanout_core::format::PixelFormat;
use scanout_core::fps::FpsCounter;
use scanout_core::rotate::Rotation;
use scanout_core::surface::Surface;
use scanout_fbdev::{DeviceError, FbDevice};

use crate::client::{ClientBuffer, ClientProtocol};
use crate::config::PresentConfig;
use crate::dump::DumpSink;

/// Composites delivered client buffers onto the device surface.
///
/// One compositor exists per process. Each call to
/// [`FrameCompositor::present_frame`] runs the whole frame sequence
/// synchronously: wrap, optionally dump, orient, composite, signal, count.
/// Nothing is retained across frames except the configured rotation, the
/// dump sequence number, and the FPS window.
///
/// The transport's single-event-loop delivery guarantee (see
/// [`crate::client`]) is a precondition of correctness: `&mut self` makes
/// overlapping frames unrepresentable here, and no locking is done.
pub struct FrameCompositor<B: GraphicsBackend> {
    backend: B,
    // Declared before `device`: the target surface may borrow the device
    // mapping and must drop first.
    target: B::Surface,
    device: Option<FbDevice>,
    rotation: Rotation,
    dump: Option<DumpSink>,
    fps: FpsCounter,
    started: Instant,
}

impl<B: GraphicsBackend> FrameCompositor<B> {
    /// Builds the compositor over an initialized device.
    ///
    /// Fails with the device's recorded error if initialization failed, or
    /// with a backend-named error if the device surface cannot be created.
    /// `rotation` is fixed for the compositor's lifetime; it orients client
    /// buffers to the panel, per build configuration rather than per frame.
    pub fn new(
        mut device: FbDevice,
        backend: B,
        rotation: Rotation,
        config: &PresentConfig,
    ) -> Result<Self, DeviceError> {
        if let Some(error) = device.error() {
            return Err(error.clone());
        }
        // SAFETY: the compositor owns the device for as long as it owns the
        // surface, and field order drops the surface first.
        let target = unsafe { device.create_surface(&backend) };
        let Some(target) = target else {
            let error = device.error().cloned().unwrap_or_else(|| {
                DeviceError::new(backend.name(), "device surface creation failed")
            });
            return Err(error);
        };
        log::debug!(
            "presenting {}x{} ({}bpp) rotated {}°",
            device.width(),
            device.height(),
            device.bits_per_pixel(),
            rotation.degrees()
        );
        Ok(Self::assemble(backend, target, Some(device), rotation, config))
    }

    /// Builds a compositor over an arbitrary target surface, with no device
    /// attached. Used by tests and headless runs.
    pub fn with_target(
        backend: B,
        target: B::Surface,
        rotation: Rotation,
        config: &PresentConfig,
    ) -> Self {
        Self::assemble(backend, target, None, rotation, config)
    }

    fn assemble(
        backend: B,
        target: B::Surface,
        device: Option<FbDevice>,
        rotation: Rotation,
        config: &PresentConfig,
    ) -> Self {
        Self {
            backend,
            target,
            device,
            rotation,
            dump: config.dump_path.clone().map(DumpSink::new),
            fps: FpsCounter::new(config.fps_interval_seconds),
            started: Instant::now(),
        }
    }

    /// Presents one delivered client buffer.
    ///
    /// Runs synchronously inside the transport's frame callback. A buffer
    /// that cannot be wrapped as a surface skips the dump and composite
    /// steps (fatal for the frame, not the process); every frame, skipped
    /// or not, signals frame-complete and buffer-release exactly once so
    /// the producer is never stalled.
    pub fn present_frame<C: ClientProtocol>(&mut self, buffer: &ClientBuffer, client: &mut C) {
        log::trace!(
            "frame buffer {:?} ({}x{}) stride {}",
            buffer.data,
            buffer.width,
            buffer.height,
            buffer.stride
        );

        // SAFETY: the transport keeps `data` valid until release_buffer
        // fires at the end of this handler; `source` is dropped before
        // that and never escapes.
        let source = unsafe {
            self.backend.wrap_external(
                PixelFormat::Argb32,
                buffer.data,
                buffer.width,
                buffer.height,
                buffer.stride,
            )
        };
        if source.is_valid() {
            if let Some(dump) = &mut self.dump {
                dump.dump(buffer);
            }

            let mut ctx = self.backend.context(&mut self.target);
            ctx.rotate(&source, self.rotation)
                .set_source(&source, 0, 0)
                .paint();
            drop(ctx);
        } else {
            log::warn!("skipping composite, source surface: {}", source.status());
        }

        client.frame_complete();
        client.release_buffer(buffer);

        let now_nanos = u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        if let Some(report) = self.fps.observe(now_nanos) {
            log::info!(
                "{:.1} fps ({} frames in {:.2}s)",
                report.fps,
                report.frames,
                report.elapsed_nanos as f64 / 1e9
            );
        }
    }

    /// Returns the attached device, if the compositor drives one.
    #[must_use]
    pub fn device(&self) -> Option<&FbDevice> {
        self.device.as_ref()
    }

    /// Returns the fixed orientation correction.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Returns the target surface (the device surface when attached).
    #[must_use]
    pub fn target(&self) -> &B::Surface {
        &self.target
    }
}

impl<B: GraphicsBackend> core::fmt::Debug for FrameCompositor<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameCompositor")
            .field("rotation", &self.rotation)
            .field("device", &self.device.is_some())
            .field("dump", &self.dump.is_some())
            .field("fps_enabled", &self.fps.enabled())
            .finish_non_exhaustive()
    }
}
