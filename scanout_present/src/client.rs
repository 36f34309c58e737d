// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The client-protocol boundary.
//!
//! The browser engine delivers rendered frames through an external
//! shared-memory buffer-exchange transport. The transport registers a
//! callback that fires once per available buffer; the compositor runs
//! inside that callback and must answer every delivered buffer with exactly
//! one frame-complete and one buffer-release signal, or the producer
//! stalls. This module defines the Rust-side view of that contract; the
//! transport itself is not implemented here.

/// Opaque transport-side resource identifier attached to a buffer.
///
/// Carried through untouched and handed back on release; the pipeline
/// never interprets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// One externally produced frame buffer, borrowed for one frame.
///
/// `data` points at transport-owned memory that stays valid from callback
/// entry until [`ClientProtocol::release_buffer`] is called for this
/// buffer. The pipeline must not retain it past the synchronous handler.
/// Dimensions and stride are passed through as reported; the compositor
/// validates them when wrapping.
#[derive(Clone, Copy, Debug)]
pub struct ClientBuffer {
    /// Pixel data, ARGB32, row-major with `stride`-byte rows.
    pub data: *mut u8,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Row stride in bytes.
    pub stride: i32,
    /// Opaque transport resource handle.
    pub handle: BufferHandle,
}

/// Completion side of the buffer-exchange protocol, consumed (not
/// implemented) by the pipeline.
///
/// # Contract
///
/// For every buffer the transport delivers, the frame handler calls both
/// methods exactly once — unconditionally, even when a diagnostic or
/// composite step was skipped or failed. A buffer the producer never gets
/// back is a stalled producer. Calls arrive from a single event loop and
/// never overlap.
pub trait ClientProtocol {
    /// Signals that the delivered frame has been presented.
    fn frame_complete(&mut self);

    /// Returns `buffer` to the producer for reuse.
    fn release_buffer(&mut self, buffer: &ClientBuffer);
}
