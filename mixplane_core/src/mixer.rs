// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-mixer controller.
//!
//! [`Mixer`] owns a mixer's layers, its register window and its trace sink.
//! The host drives it once per refresh transaction:
//!
//! ```rust,ignore
//! // Phase 1: check every modified layer. Nothing is written yet.
//! let mut accepted = Vec::new();
//! for (index, proposed) in transaction {
//!     accepted.push((index, mixer.check(index, &proposed, geometry_of(proposed.target))?));
//! }
//!
//! // Phase 2: every check passed, apply.
//! for (index, state) in &accepted {
//!     mixer.update(*index, state);
//! }
//! let changes = mixer.commit();
//! ```
//!
//! A failed check aborts the transaction with no hardware effect because
//! [`check`](Mixer::check) never writes registers or layer state.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{Channel, CycleHandling, DirtyTracker};

use crate::admission;
use crate::clip::{ClipStrategy, ScaledClip};
use crate::config::MixerConfig;
use crate::dirty;
use crate::error::{InitError, Rejection};
use crate::geometry::SurfaceGeometry;
use crate::host::PlaneHost;
use crate::layer::{Layer, MixerId, PlaneState, initialize_layers};
use crate::program::{self, Slot};
use crate::regs::{self, RegisterIo};
use crate::trace::{
    CheckEvent, CheckOutcome, CommitEvent, EnableEvent, NoopSink, ProgramEvent, TraceSink, Tracer,
};

/// Layers touched since the previous [`Mixer::commit`], by category.
///
/// Each list holds layer indices in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitChanges {
    /// Layers whose geometry or scaler was reprogrammed.
    pub coord: Vec<u32>,
    /// Layers whose fetch format was reprogrammed.
    pub format: Vec<u32>,
    /// Layers whose buffer address was reprogrammed.
    pub buffer: Vec<u32>,
    /// Layers whose enable bit flipped.
    pub enable: Vec<u32>,
}

impl CommitChanges {
    /// Returns `true` if nothing was pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coord.is_empty()
            && self.format.is_empty()
            && self.buffer.is_empty()
            && self.enable.is_empty()
    }
}

/// Controller for one display mixer.
///
/// `R` is the register window, `S` receives trace events.
pub struct Mixer<R: RegisterIo, S: TraceSink = NoopSink> {
    id: MixerId,
    config: MixerConfig,
    regs: R,
    layers: Vec<Layer>,
    clip: Box<dyn ClipStrategy + Send>,
    pending: DirtyTracker<u32>,
    sink: S,
}

impl<R: RegisterIo, S: TraceSink> fmt::Debug for Mixer<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixer")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}

impl<R: RegisterIo, S: TraceSink> Mixer<R, S> {
    /// Registers the mixer's layers with `host` and resets the blender.
    ///
    /// # Errors
    ///
    /// Returns the [`InitError`] from [`initialize_layers`]; no planes stay
    /// registered in that case and no registers are written.
    pub fn new(
        id: MixerId,
        config: MixerConfig,
        mut regs: R,
        host: &mut dyn PlaneHost,
        mut sink: S,
    ) -> Result<Self, InitError> {
        let layers = initialize_layers(&config, id, host, &mut Tracer::new(&mut sink))?;
        program::init_blender(&mut regs, config.layer_count());
        Ok(Self {
            id,
            config,
            regs,
            layers,
            clip: Box::new(ScaledClip),
            pending: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            sink,
        })
    }

    /// Replaces the clipping strategy used by [`check`](Self::check).
    #[must_use]
    pub fn with_clip_strategy(mut self, clip: impl ClipStrategy + Send + 'static) -> Self {
        self.clip = Box::new(clip);
        self
    }

    /// This mixer's id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> MixerId {
        self.id
    }

    /// The configuration the mixer was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// All layers, in index order.
    #[inline]
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The layer at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn layer(&self, index: u32) -> &Layer {
        self.validate(index);
        &self.layers[index as usize]
    }

    /// The register window.
    #[inline]
    #[must_use]
    pub const fn regs(&self) -> &R {
        &self.regs
    }

    /// The trace sink.
    #[inline]
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The trace sink, mutably.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the mixer, returning its register window and trace sink.
    ///
    /// Host planes are not released; the host tears them down with the
    /// device.
    pub fn into_parts(self) -> (R, S) {
        (self.regs, self.sink)
    }

    /// Checks whether layer `index` can show `proposed` on an output of size
    /// `target`. See [`admission::check`].
    ///
    /// Writes nothing; only the trace sink observes the call.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] from [`admission::check`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn check(
        &mut self,
        index: u32,
        proposed: &PlaneState,
        target: Option<SurfaceGeometry>,
    ) -> Result<PlaneState, Rejection> {
        self.validate(index);
        let result = admission::check(
            &self.layers[index as usize],
            proposed,
            target,
            self.clip.as_ref(),
        );
        let outcome = match &result {
            Ok(state) if state.visible => CheckOutcome::Visible,
            Ok(_) => CheckOutcome::Invisible,
            Err(r) => CheckOutcome::Rejected(*r),
        };
        Tracer::new(&mut self.sink).check(&CheckEvent {
            mixer: self.id,
            index,
            outcome,
        });
        result
    }

    /// Turns layer `index` off. Idempotent.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn disable(&mut self, index: u32) {
        self.validate(index);
        let slot = Slot::new(&self.layers[index as usize], self.config.vi_count);
        program::set_enabled(&mut self.regs, &slot, false);
        let layer = &mut self.layers[index as usize];
        if layer.enabled {
            self.pending.mark(index, dirty::ENABLE);
        }
        layer.enabled = false;
        Tracer::new(&mut self.sink).enable(&EnableEvent {
            mixer: self.id,
            index,
            enabled: false,
        });
    }

    /// Applies a checked state to layer `index`.
    ///
    /// An invisible state disables the layer and keeps the previous
    /// `current_state`. A visible state programs coordinates, then format,
    /// then buffer, and sets the enable bit last. The state is not checked
    /// again; pass what [`check`](Self::check) returned.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn update(&mut self, index: u32, state: &PlaneState) {
        self.validate(index);
        let Some(fb) = state.buffer.filter(|_| state.visible) else {
            self.disable(index);
            return;
        };

        let slot = Slot::new(&self.layers[index as usize], self.config.vi_count);
        let scaled = program::program_coordinates(&mut self.regs, &slot, state);
        program::program_format(&mut self.regs, &slot, fb.format);
        program::program_buffer(&mut self.regs, &slot, state);
        self.pending.mark(index, dirty::COORD);
        self.pending.mark(index, dirty::FORMAT);
        self.pending.mark(index, dirty::BUFFER);

        let mut tracer = Tracer::new(&mut self.sink);
        tracer.program(&ProgramEvent {
            mixer: self.id,
            index,
            kind: slot.kind,
            src: state.src,
            dst: state.dst,
            format: fb.format,
            scaled,
        });

        program::set_enabled(&mut self.regs, &slot, true);
        let layer = &mut self.layers[index as usize];
        if !layer.enabled {
            self.pending.mark(index, dirty::ENABLE);
        }
        layer.enabled = true;
        layer.current_state = Some(*state);
        tracer.enable(&EnableEvent {
            mixer: self.id,
            index,
            enabled: true,
        });
    }

    /// Latches every pending register write and reports what changed.
    ///
    /// The double-buffer register is written only if something was pending.
    pub fn commit(&mut self) -> CommitChanges {
        let mut drain = |channel: Channel| {
            let mut layers: Vec<u32> = self.pending.drain(channel).deterministic().run().collect();
            layers.sort_unstable();
            layers
        };
        let changes = CommitChanges {
            coord: drain(dirty::COORD),
            format: drain(dirty::FORMAT),
            buffer: drain(dirty::BUFFER),
            enable: drain(dirty::ENABLE),
        };
        if !changes.is_empty() {
            self.regs.write(regs::GLOBAL_DBUFF, regs::DBUFF_ENABLE);
        }
        let count = |v: &Vec<u32>| u32::try_from(v.len()).unwrap_or(u32::MAX);
        Tracer::new(&mut self.sink).commit(&CommitEvent {
            mixer: self.id,
            coord: count(&changes.coord),
            format: count(&changes.format),
            buffer: count(&changes.buffer),
            enable: count(&changes.enable),
        });
        changes
    }

    fn validate(&self, index: u32) {
        assert!(
            (index as usize) < self.layers.len(),
            "layer index {index} out of range for mixer with {} layers",
            self.layers.len()
        );
    }
}
