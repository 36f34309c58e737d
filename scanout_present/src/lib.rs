// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame compositing and presentation for scanout.
//!
//! This crate wires the pipeline together: per-frame client buffers arrive
//! from an external buffer-exchange transport, get wrapped as surfaces,
//! oriented to the panel, composited onto the device surface, and signaled
//! back. It also owns the immutable process configuration and the optional
//! diagnostics (PNG frame dumps, FPS reporting).
//!
//! # Frame flow
//!
//! ```text
//!   transport callback ──► FrameCompositor::present_frame
//!         wrap client buffer (ARGB32, zero-copy)
//!         optional PNG dump
//!         rotate + set_source + paint onto the device surface
//!         frame-complete + release-buffer signals
//!         FPS accounting
//! ```
//!
//! # Concurrency contract
//!
//! The transport invokes the frame callback sequentially from a single
//! event loop; invocations never overlap. The compositor relies on that —
//! it takes `&mut self`, holds no locks, and borrows each client buffer
//! only for the duration of the synchronous handler.

#![allow(
    unsafe_code,
    reason = "client buffers arrive as raw pointers from the external \
              transport and are wrapped zero-copy for one frame"
)]

mod client;
mod compositor;
mod config;
mod dump;

pub use client::{BufferHandle, ClientBuffer, ClientProtocol};
pub use compositor::FrameCompositor;
pub use config::{
    ConfigError, DEBUG_ENV, DUMP_PATH_ENV, FPS_INTERVAL_ENV, PresentConfig,
};
