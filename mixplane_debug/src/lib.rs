// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, and JSON export for mixplane diagnostics.
//!
//! This crate provides [`TraceSink`](mixplane_core::trace::TraceSink)
//! implementations for bring-up and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export`]: writes recorded bytes as a JSON array of events.

pub mod json;
pub mod pretty;
pub mod recorder;
