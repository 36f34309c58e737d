// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linux fbdev device handle for scanout.
//!
//! [`FbDevice`] owns the full lifetime of one memory-mapped framebuffer
//! device: path resolution, `open(2)`, the two screen-info ioctls, display
//! unblanking, the size-guarded `mmap(2)`, rotation control, and teardown in
//! reverse acquisition order. It knows nothing about pixel formats beyond
//! byte layout; wrapping the mapping as a render surface is the backend's
//! job.
//!
//! # Error model
//!
//! Device operations never panic and construction never returns `Err`:
//! failures are recorded as [`DeviceError`] state on the handle, and every
//! later initialization step is skipped. Callers must check
//! [`FbDevice::errored`] before using the handle for rendering. Interrupted
//! `open`/`ioctl` calls are retried transparently; nothing else is retried.
//!
//! # Concurrency
//!
//! The mapped region is exclusively owned by this process for the process
//! lifetime. The handle is neither `Send` nor `Sync`; the pipeline is
//! single-threaded by contract.

#![allow(
    unsafe_code,
    reason = "mmap/munmap and the fbdev ioctls are inherently unsafe FFI; \
              every use carries its invariant"
)]

mod device;
mod screeninfo;

pub use device::{DEFAULT_DEVICE_PATH, DEVICE_PATH_ENV, DeviceError, FbDevice};
