// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanout-plane registry and admission control for a display mixer.
//!
//! `mixplane_core` drives the hardware layers of a display-engine mixer on
//! behalf of a host graphics subsystem. It is `no_std` compatible (with
//! `alloc`) and talks to hardware only through the [`RegisterIo`] trait.
//!
//! # Architecture
//!
//! Start-up registers every layer with the host. Each refresh transaction
//! then checks all modified layers before any of them is applied:
//!
//! ```text
//!   MixerConfig ──► initialize_layers() ──► PlaneHost::register_plane()
//!                          │
//!                          ▼
//!                    Vec<Layer> (owned by Mixer)
//!
//!   proposed PlaneState ──► Mixer::check() ──► checked PlaneState
//!                                                   │
//!            (only if every check in the transaction passed)
//!                                                   ▼
//!                         Mixer::update() / Mixer::disable()
//!                                                   │
//!                                                   ▼
//!                         Mixer::commit() ──► CommitChanges
//! ```
//!
//! **[`layer`]**: [`Layer`](layer::Layer) records, their plane state, and
//! [`initialize_layers`](layer::initialize_layers).
//!
//! **[`admission`]**: The pure admission check over target, format, extent,
//! scale bounds, then clipping.
//!
//! **[`mixer`]**: [`Mixer`](mixer::Mixer), which ties layers, registers and
//! tracing together.
//!
//! **[`format`]**: Pixel formats and the per-kind capability tables.
//!
//! **[`scale`]** / **[`clip`]** / **[`geometry`]**: 16.16 scale factors,
//! the pluggable clip strategy, and integer rectangles.
//!
//! **[`regs`]**: Register map and the [`RegisterIo`] trait.
//!
//! **[`host`]**: The [`PlaneHost`](host::PlaneHost) trait the host
//! implements.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//!
//! [`RegisterIo`]: regs::RegisterIo

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod admission;
pub mod clip;
pub mod config;
pub mod dirty;
pub mod error;
pub mod format;
pub mod geometry;
pub mod host;
pub mod layer;
pub mod mixer;
pub mod output;
pub mod regs;
pub mod scale;
pub mod trace;

mod program;
