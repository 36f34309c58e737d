// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core contracts for the scanout framebuffer presentation pipeline.
//!
//! `scanout_core` defines the backend-agnostic pieces of the pipeline: pixel
//! formats, quarter-turn rotations and their placement math, the [`Surface`]
//! and [`GraphicsBackend`] contracts, and frames-per-second accounting. It is
//! `no_std` compatible and has no platform dependencies.
//!
//! # Architecture
//!
//! The pipeline turns externally produced pixel buffers into visible pixels
//! on a memory-mapped display device:
//!
//! ```text
//!   client buffer (ARGB32)
//!       │  wrap (zero-copy)
//!       ▼
//!   Surface ──► RenderContext::rotate + set_source ──► paint
//!                                                        │
//!                                                        ▼
//!                                          device surface (RGB565 mapping)
//!                                                        │
//!                                                        ▼
//!                                    frame-complete / release-buffer signals
//! ```
//!
//! **[`format`]** — Closed pixel-format enumeration and the ARGB32 → RGB565
//! conversion used by direct-converter backends.
//!
//! **[`rotate`]** — [`Rotation`](rotate::Rotation) quarter-turn enumeration
//! with degree aliases, and [`Placement`](rotate::Placement), the
//! translate-then-rotate coordinate mapping applied between client-buffer
//! space and device space.
//!
//! **[`surface`]** — The [`Surface`] geometry/validity contract shared by
//! wrapped (borrowed) and backend-owned pixel buffers.
//!
//! **[`backend`]** — The [`GraphicsBackend`] and [`RenderContext`] traits
//! that a concrete rendering backend implements. Exactly one backend is
//! selected per deployment, at build-configuration time; there is no runtime
//! backend dispatch.
//!
//! **[`fps`]** — Clock-injectable frame-rate accumulator used by the
//! compositor's optional FPS reporting.
//!
//! [`Surface`]: surface::Surface
//! [`GraphicsBackend`]: backend::GraphicsBackend
//! [`RenderContext`]: backend::RenderContext

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![allow(
    unsafe_code,
    reason = "the backend contract declares an unsafe zero-copy wrap; this \
              crate contains no unsafe bodies"
)]

pub mod backend;
pub mod format;
pub mod fps;
pub mod rotate;
pub mod surface;
