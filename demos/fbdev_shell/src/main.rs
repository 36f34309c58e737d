// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runs the presentation pipeline against a real fbdev device with a
//! synthetic frame producer standing in for the browser engine.
//!
//! Usage: `fbdev_shell [device-path] [rotation-degrees]`
//!
//! The producer animates a moving color gradient, sized so that frames
//! land exactly on the panel after the configured rotation. Environment:
//! `SCANOUT_FBDEV`, `SCANOUT_DUMP_PNG_PATH`, `SCANOUT_FPS_INTERVAL`,
//! `SCANOUT_DEBUG` — see the `scanout_present` docs.
//!
//! Exit codes: 0 on clean shutdown, 1 on configuration errors, 2 when
//! device initialization fails.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use scanout_core::rotate::Rotation;
use scanout_fbdev::FbDevice;
use scanout_present::{BufferHandle, ClientBuffer, ClientProtocol, FrameCompositor, PresentConfig};
use scanout_render_cpu::CpuBackend;

const FRAME_COUNT: u64 = 300;
/// ≈60 Hz pacing for the synthetic producer.
const FRAME_INTERVAL: Duration = Duration::from_nanos(16_666_667);

/// Stand-in for the buffer-exchange transport's completion side.
#[derive(Default)]
struct CountingClient {
    completed: u64,
    released: u64,
}

impl ClientProtocol for CountingClient {
    fn frame_complete(&mut self) {
        self.completed += 1;
    }

    fn release_buffer(&mut self, _buffer: &ClientBuffer) {
        self.released += 1;
    }
}

fn main() -> ExitCode {
    let config = match PresentConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("fbdev_shell: {error}");
            return ExitCode::from(1);
        }
    };
    env_logger::Builder::new()
        .filter_level(if config.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let device_path = args.next().map(PathBuf::from);
    let rotation = match args.next() {
        None => Rotation::Deg0,
        Some(raw) => match raw.parse::<i32>().ok().and_then(Rotation::from_degrees) {
            Some(rotation) => rotation,
            None => {
                eprintln!("fbdev_shell: rotation must be a multiple of 90 degrees, got {raw:?}");
                return ExitCode::from(1);
            }
        },
    };

    let device = FbDevice::open(device_path.as_deref());
    if let Some(error) = device.error() {
        log::error!("device initialization failed: {error}");
        return ExitCode::from(2);
    }

    let mut compositor = match FrameCompositor::new(device, CpuBackend::new(), rotation, &config) {
        Ok(compositor) => compositor,
        Err(error) => {
            log::error!("device surface creation failed: {error}");
            return ExitCode::from(2);
        }
    };

    // Client buffers are produced pre-rotation: a transposing rotation
    // means the producer renders in the panel's other orientation.
    let (device_w, device_h) = compositor
        .device()
        .map_or((0, 0), |device| (device.width(), device.height()));
    let (frame_w, frame_h) = if rotation.transposes() {
        (device_h, device_w)
    } else {
        (device_w, device_h)
    };
    log::info!("producing {frame_w}x{frame_h} frames, rotation {}°", rotation.degrees());

    let mut client = CountingClient::default();
    let mut pixels = vec![0u8; frame_w as usize * frame_h as usize * 4];

    for frame in 0..FRAME_COUNT {
        fill_gradient(&mut pixels, frame_w, frame_h, frame);
        let buffer = ClientBuffer {
            data: pixels.as_mut_ptr(),
            width: frame_w as i32,
            height: frame_h as i32,
            stride: frame_w as i32 * 4,
            handle: BufferHandle(frame),
        };
        compositor.present_frame(&buffer, &mut client);
        std::thread::sleep(FRAME_INTERVAL);
    }

    log::info!(
        "{} frames presented, {} completed, {} released",
        FRAME_COUNT,
        client.completed,
        client.released
    );
    ExitCode::SUCCESS
}

/// Animated ARGB32 gradient: hue drifts with the frame counter.
fn fill_gradient(pixels: &mut [u8], width: u32, height: u32, frame: u64) {
    let shift = u32::try_from(frame % 256).unwrap_or(0);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255 / width.max(1)) + shift) & 0xff;
            let g = (y * 255 / height.max(1)) & 0xff;
            let b = 255 - (shift & 0xff);
            let argb = 0xff00_0000 | (r << 16) | (g << 8) | b;
            let offset = (y * width + x) as usize * 4;
            pixels[offset..offset + 4].copy_from_slice(&argb.to_ne_bytes());
        }
    }
}
