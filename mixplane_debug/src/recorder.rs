// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Signed coordinates are stored as their two's-complement `u32` bits and
//! pixel formats as their fourcc.

use mixplane_core::error::{InitError, Rejection, RegistrationStage};
use mixplane_core::format::PixelFormat;
use mixplane_core::geometry::Rect;
use mixplane_core::host::HostError;
use mixplane_core::layer::{LayerKind, LayerRole, MixerId, PlaneHandle};
use mixplane_core::scale::Axis;
use mixplane_core::trace::{
    CheckEvent, CheckOutcome, CommitEvent, EnableEvent, InitFailedEvent, LayerInitEvent,
    ProgramEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LAYER_INIT: u8 = 1;
const TAG_INIT_FAILED: u8 = 2;
const TAG_CHECK: u8 = 3;
const TAG_PROGRAM: u8 = 4;
const TAG_ENABLE: u8 = 5;
const TAG_COMMIT: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.write_u32(v.cast_unsigned());
    }

    fn write_rect(&mut self, r: Rect) {
        self.write_i32(r.x1);
        self.write_i32(r.y1);
        self.write_i32(r.x2);
        self.write_i32(r.y2);
    }

    fn write_kind(&mut self, k: LayerKind) {
        self.write_u8(match k {
            LayerKind::Video => 0,
            LayerKind::UserInterface => 1,
        });
    }

    fn write_role(&mut self, r: LayerRole) {
        self.write_u8(match r {
            LayerRole::Primary => 0,
            LayerRole::Overlay => 1,
        });
    }

    fn write_outcome(&mut self, o: CheckOutcome) {
        self.write_u8(match o {
            CheckOutcome::Visible => 0,
            CheckOutcome::Invisible => 1,
            CheckOutcome::Rejected(Rejection::ScaleOutOfRange {
                axis: Axis::Horizontal,
            }) => 2,
            CheckOutcome::Rejected(Rejection::ScaleOutOfRange {
                axis: Axis::Vertical,
            }) => 3,
            CheckOutcome::Rejected(Rejection::DegenerateRegion) => 4,
            CheckOutcome::Rejected(Rejection::NoTargetSurface) => 5,
            CheckOutcome::Rejected(Rejection::UnsupportedFormat) => 6,
            CheckOutcome::Rejected(Rejection::SourceOutOfBounds) => 7,
        });
    }

    /// Writes the error as a fixed 12-byte record; `Allocation` zero-fills
    /// the registration fields.
    fn write_init_error(&mut self, e: InitError) {
        match e {
            InitError::Allocation => {
                self.write_u8(0);
                self.write_u32(0);
                self.write_u8(0);
                self.write_u8(0);
                self.write_u8(0);
                self.write_u32(0);
            }
            InitError::Registration {
                index,
                role,
                stage,
                source,
            } => {
                self.write_u8(1);
                self.write_u32(index);
                self.write_role(role);
                self.write_u8(match stage {
                    RegistrationStage::Plane => 0,
                    RegistrationStage::Zpos => 1,
                });
                match source {
                    HostError::OutOfMemory => {
                        self.write_u8(0);
                        self.write_u32(0);
                    }
                    HostError::Failed(code) => {
                        self.write_u8(1);
                        self.write_i32(code);
                    }
                }
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_layer_init(&mut self, e: &LayerInitEvent) {
        self.write_u8(TAG_LAYER_INIT);
        self.write_u32(e.mixer.0);
        self.write_u32(e.index);
        self.write_kind(e.kind);
        self.write_role(e.role);
        self.write_bool(e.supports_scaling);
        self.write_u32(e.handle.0);
    }

    fn on_init_failed(&mut self, e: &InitFailedEvent) {
        self.write_u8(TAG_INIT_FAILED);
        self.write_u32(e.mixer.0);
        self.write_init_error(e.error);
        self.write_u32(e.released);
    }

    fn on_check(&mut self, e: &CheckEvent) {
        self.write_u8(TAG_CHECK);
        self.write_u32(e.mixer.0);
        self.write_u32(e.index);
        self.write_outcome(e.outcome);
    }

    fn on_program(&mut self, e: &ProgramEvent) {
        self.write_u8(TAG_PROGRAM);
        self.write_u32(e.mixer.0);
        self.write_u32(e.index);
        self.write_kind(e.kind);
        self.write_rect(e.src);
        self.write_rect(e.dst);
        self.write_u32(e.format.fourcc());
        self.write_bool(e.scaled);
    }

    fn on_enable(&mut self, e: &EnableEvent) {
        self.write_u8(TAG_ENABLE);
        self.write_u32(e.mixer.0);
        self.write_u32(e.index);
        self.write_bool(e.enabled);
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        self.write_u8(TAG_COMMIT);
        self.write_u32(e.mixer.0);
        self.write_u32(e.coord);
        self.write_u32(e.format);
        self.write_u32(e.buffer);
        self.write_u32(e.enable);
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A decoded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A layer was registered.
    LayerInit(LayerInitEvent),
    /// Initialization failed and was rolled back.
    InitFailed(InitFailedEvent),
    /// An admission check ran.
    Check(CheckEvent),
    /// A layer was programmed.
    Program(ProgramEvent),
    /// A layer's enable bit was written.
    Enable(EnableEvent),
    /// Pending writes were latched.
    Commit(CommitEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first truncated or unknown record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_i32(&mut self) -> Option<i32> {
        Some(self.read_u32()?.cast_signed())
    }

    fn read_rect(&mut self) -> Option<Rect> {
        Some(Rect::new(
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
        ))
    }

    fn read_kind(&mut self) -> Option<LayerKind> {
        Some(match self.read_u8()? {
            0 => LayerKind::Video,
            _ => LayerKind::UserInterface,
        })
    }

    fn read_role(&mut self) -> Option<LayerRole> {
        Some(match self.read_u8()? {
            0 => LayerRole::Primary,
            _ => LayerRole::Overlay,
        })
    }

    fn read_outcome(&mut self) -> Option<CheckOutcome> {
        let rejected = |r| Some(CheckOutcome::Rejected(r));
        match self.read_u8()? {
            0 => Some(CheckOutcome::Visible),
            1 => Some(CheckOutcome::Invisible),
            2 => rejected(Rejection::ScaleOutOfRange {
                axis: Axis::Horizontal,
            }),
            3 => rejected(Rejection::ScaleOutOfRange {
                axis: Axis::Vertical,
            }),
            4 => rejected(Rejection::DegenerateRegion),
            5 => rejected(Rejection::NoTargetSurface),
            6 => rejected(Rejection::UnsupportedFormat),
            7 => rejected(Rejection::SourceOutOfBounds),
            _ => None,
        }
    }

    fn read_init_error(&mut self) -> Option<InitError> {
        let variant = self.read_u8()?;
        let index = self.read_u32()?;
        let role = self.read_role()?;
        let stage = match self.read_u8()? {
            0 => RegistrationStage::Plane,
            _ => RegistrationStage::Zpos,
        };
        let source_kind = self.read_u8()?;
        let code = self.read_i32()?;
        Some(match variant {
            0 => InitError::Allocation,
            _ => InitError::Registration {
                index,
                role,
                stage,
                source: match source_kind {
                    0 => HostError::OutOfMemory,
                    _ => HostError::Failed(code),
                },
            },
        })
    }

    fn decode_layer_init(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayerInit(LayerInitEvent {
            mixer: MixerId(self.read_u32()?),
            index: self.read_u32()?,
            kind: self.read_kind()?,
            role: self.read_role()?,
            supports_scaling: self.read_bool()?,
            handle: PlaneHandle(self.read_u32()?),
        }))
    }

    fn decode_init_failed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::InitFailed(InitFailedEvent {
            mixer: MixerId(self.read_u32()?),
            error: self.read_init_error()?,
            released: self.read_u32()?,
        }))
    }

    fn decode_check(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Check(CheckEvent {
            mixer: MixerId(self.read_u32()?),
            index: self.read_u32()?,
            outcome: self.read_outcome()?,
        }))
    }

    fn decode_program(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Program(ProgramEvent {
            mixer: MixerId(self.read_u32()?),
            index: self.read_u32()?,
            kind: self.read_kind()?,
            src: self.read_rect()?,
            dst: self.read_rect()?,
            format: PixelFormat::from_fourcc(self.read_u32()?)?,
            scaled: self.read_bool()?,
        }))
    }

    fn decode_enable(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Enable(EnableEvent {
            mixer: MixerId(self.read_u32()?),
            index: self.read_u32()?,
            enabled: self.read_bool()?,
        }))
    }

    fn decode_commit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Commit(CommitEvent {
            mixer: MixerId(self.read_u32()?),
            coord: self.read_u32()?,
            format: self.read_u32()?,
            buffer: self.read_u32()?,
            enable: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_LAYER_INIT => self.decode_layer_init(),
            TAG_INIT_FAILED => self.decode_init_failed(),
            TAG_CHECK => self.decode_check(),
            TAG_PROGRAM => self.decode_program(),
            TAG_ENABLE => self.decode_enable(),
            TAG_COMMIT => self.decode_commit(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_program() -> ProgramEvent {
        ProgramEvent {
            mixer: MixerId(1),
            index: 2,
            kind: LayerKind::Video,
            src: Rect::new(0, 0x14_0000, 0x280_0000, 0x1E0_0000),
            dst: Rect::new(-16, 20, 1264, 720),
            format: PixelFormat::Nv12,
            scaled: true,
        }
    }

    #[test]
    fn layer_init_survives_recording() {
        let mut rec = RecorderSink::new();
        rec.on_layer_init(&LayerInitEvent {
            mixer: MixerId(0),
            index: 3,
            kind: LayerKind::UserInterface,
            role: LayerRole::Overlay,
            supports_scaling: false,
            handle: PlaneHandle(42),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::LayerInit(e) => {
                assert_eq!(e.index, 3);
                assert_eq!(e.kind, LayerKind::UserInterface);
                assert_eq!(e.role, LayerRole::Overlay);
                assert!(!e.supports_scaling);
                assert_eq!(e.handle, PlaneHandle(42));
            }
            other => panic!("expected LayerInit, got {other:?}"),
        }
    }

    #[test]
    fn program_keeps_negative_coordinates_and_format() {
        let mut rec = RecorderSink::new();
        let orig = sample_program();
        rec.on_program(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::Program(e)] => {
                assert_eq!(e.src, orig.src);
                assert_eq!(e.dst, orig.dst);
                assert_eq!(e.format, PixelFormat::Nv12);
                assert!(e.scaled);
            }
            other => panic!("expected one Program, got {other:?}"),
        }
    }

    #[test]
    fn init_failure_keeps_host_error() {
        let mut rec = RecorderSink::new();
        let error = InitError::Registration {
            index: 1,
            role: LayerRole::Primary,
            stage: RegistrationStage::Zpos,
            source: HostError::Failed(-22),
        };
        rec.on_init_failed(&InitFailedEvent {
            mixer: MixerId(0),
            error,
            released: 1,
        });
        rec.on_init_failed(&InitFailedEvent {
            mixer: MixerId(0),
            error: InitError::Allocation,
            released: 0,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match (&events[0], &events[1]) {
            (RecordedEvent::InitFailed(a), RecordedEvent::InitFailed(b)) => {
                assert_eq!(a.error, error);
                assert_eq!(a.released, 1);
                assert_eq!(b.error, InitError::Allocation);
            }
            other => panic!("expected two InitFailed, got {other:?}"),
        }
    }

    #[test]
    fn check_outcomes_are_distinguished() {
        let outcomes = [
            CheckOutcome::Visible,
            CheckOutcome::Invisible,
            CheckOutcome::Rejected(Rejection::ScaleOutOfRange {
                axis: Axis::Vertical,
            }),
            CheckOutcome::Rejected(Rejection::SourceOutOfBounds),
        ];
        let mut rec = RecorderSink::new();
        for (index, outcome) in (0..).zip(outcomes) {
            rec.on_check(&CheckEvent {
                mixer: MixerId(0),
                index,
                outcome,
            });
        }

        let decoded: Vec<_> = decode(rec.as_bytes())
            .map(|e| match e {
                RecordedEvent::Check(c) => c.outcome,
                other => panic!("expected Check, got {other:?}"),
            })
            .collect();
        assert_eq!(decoded, outcomes);
    }

    #[test]
    fn mixed_sequence_keeps_order() {
        let mut rec = RecorderSink::new();
        rec.on_program(&sample_program());
        rec.on_enable(&EnableEvent {
            mixer: MixerId(1),
            index: 2,
            enabled: true,
        });
        rec.on_commit(&CommitEvent {
            mixer: MixerId(1),
            coord: 1,
            format: 1,
            buffer: 1,
            enable: 1,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], RecordedEvent::Program(_)));
        assert!(matches!(events[1], RecordedEvent::Enable(e) if e.enabled));
        assert!(matches!(events[2], RecordedEvent::Commit(c) if c.enable == 1));
    }

    #[test]
    fn truncated_buffer_stops_cleanly() {
        let mut rec = RecorderSink::new();
        rec.on_enable(&EnableEvent {
            mixer: MixerId(0),
            index: 0,
            enabled: false,
        });
        rec.on_program(&sample_program());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1, "only the complete record decodes");
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        assert_eq!(decode(&[0xff, 0, 0, 0]).count(), 0);
    }

    #[test]
    fn clear_discards_records() {
        let mut rec = RecorderSink::new();
        rec.on_program(&sample_program());
        rec.clear();
        assert!(rec.as_bytes().is_empty());
    }
}
