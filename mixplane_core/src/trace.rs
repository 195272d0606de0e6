// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for layer registration and per-refresh updates.
//!
//! This module provides a [`TraceSink`] trait with one method per event the
//! mixer emits. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::error::{InitError, Rejection};
use crate::format::PixelFormat;
use crate::geometry::Rect;
use crate::layer::{LayerKind, LayerRole, MixerId, PlaneHandle};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Result of an admission check, as reported to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckOutcome {
    /// Accepted; the layer will show something.
    Visible,
    /// Accepted; the layer will show nothing.
    Invisible,
    /// Refused.
    Rejected(Rejection),
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for each layer successfully registered with the host.
#[derive(Clone, Copy, Debug)]
pub struct LayerInitEvent {
    /// Owning mixer.
    pub mixer: MixerId,
    /// Layer index.
    pub index: u32,
    /// Video or UI layer.
    pub kind: LayerKind,
    /// Primary or overlay.
    pub role: LayerRole,
    /// Whether the layer has a scaler.
    pub supports_scaling: bool,
    /// Handle the host assigned.
    pub handle: PlaneHandle,
}

/// Emitted when layer initialization fails and is rolled back.
#[derive(Clone, Copy, Debug)]
pub struct InitFailedEvent {
    /// Owning mixer.
    pub mixer: MixerId,
    /// The error returned to the caller.
    pub error: InitError,
    /// Number of planes released during rollback.
    pub released: u32,
}

/// Emitted after each admission check.
#[derive(Clone, Copy, Debug)]
pub struct CheckEvent {
    /// Owning mixer.
    pub mixer: MixerId,
    /// Layer index.
    pub index: u32,
    /// What the check decided.
    pub outcome: CheckOutcome,
}

/// Emitted when a layer's registers are programmed for a visible state.
#[derive(Clone, Copy, Debug)]
pub struct ProgramEvent {
    /// Owning mixer.
    pub mixer: MixerId,
    /// Layer index.
    pub index: u32,
    /// Which register layout was used.
    pub kind: LayerKind,
    /// Source crop in 16.16 fixed point.
    pub src: Rect,
    /// Destination rectangle.
    pub dst: Rect,
    /// Scanned-out pixel format.
    pub format: PixelFormat,
    /// Whether the layer scaler was switched on.
    pub scaled: bool,
}

/// Emitted when a layer's enable bit changes or is rewritten.
#[derive(Clone, Copy, Debug)]
pub struct EnableEvent {
    /// Owning mixer.
    pub mixer: MixerId,
    /// Layer index.
    pub index: u32,
    /// New state of the enable bit.
    pub enabled: bool,
}

/// Emitted when pending register writes are latched.
#[derive(Clone, Copy, Debug)]
pub struct CommitEvent {
    /// Owning mixer.
    pub mixer: MixerId,
    /// Layers whose geometry changed.
    pub coord: u32,
    /// Layers whose format changed.
    pub format: u32,
    /// Layers whose buffer changed.
    pub buffer: u32,
    /// Layers whose enable bit changed.
    pub enable: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a mixer.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a layer is registered.
    fn on_layer_init(&mut self, e: &LayerInitEvent) {
        _ = e;
    }

    /// Called when initialization fails.
    fn on_init_failed(&mut self, e: &InitFailedEvent) {
        _ = e;
    }

    /// Called after an admission check.
    fn on_check(&mut self, e: &CheckEvent) {
        _ = e;
    }

    /// Called after a layer is programmed.
    fn on_program(&mut self, e: &ProgramEvent) {
        _ = e;
    }

    /// Called when a layer is enabled or disabled.
    fn on_enable(&mut self, e: &EnableEvent) {
        _ = e;
    }

    /// Called when pending writes are committed.
    fn on_commit(&mut self, e: &CommitEvent) {
        _ = e;
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn on_layer_init(&mut self, e: &LayerInitEvent) {
        (**self).on_layer_init(e);
    }

    fn on_init_failed(&mut self, e: &InitFailedEvent) {
        (**self).on_init_failed(e);
    }

    fn on_check(&mut self, e: &CheckEvent) {
        (**self).on_check(e);
    }

    fn on_program(&mut self, e: &ProgramEvent) {
        (**self).on_program(e);
    }

    fn on_enable(&mut self, e: &EnableEvent) {
        (**self).on_enable(e);
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        (**self).on_commit(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`LayerInitEvent`].
    #[inline]
    pub fn layer_init(&mut self, e: &LayerInitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_init(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`InitFailedEvent`].
    #[inline]
    pub fn init_failed(&mut self, e: &InitFailedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_init_failed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CheckEvent`].
    #[inline]
    pub fn check(&mut self, e: &CheckEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_check(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ProgramEvent`].
    #[inline]
    pub fn program(&mut self, e: &ProgramEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_program(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EnableEvent`].
    #[inline]
    pub fn enable(&mut self, e: &EnableEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_enable(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CommitEvent`].
    #[inline]
    pub fn commit(&mut self, e: &CommitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_commit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
