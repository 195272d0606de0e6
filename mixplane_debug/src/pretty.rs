// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Source
//! crops are printed in whole buffer pixels.

use std::io::Write;

use mixplane_core::geometry::{Rect, fixed_to_int};
use mixplane_core::trace::{
    CheckEvent, CheckOutcome, CommitEvent, EnableEvent, InitFailedEvent, LayerInitEvent,
    ProgramEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// `WxH+X+Y`, the way display tools print geometry.
struct Geometry(Rect);

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0;
        write!(f, "{}x{}{:+}{:+}", r.width(), r.height(), r.x1, r.y1)
    }
}

fn pixels(src: Rect) -> Rect {
    Rect::new(
        fixed_to_int(src.x1),
        fixed_to_int(src.y1),
        fixed_to_int(src.x2),
        fixed_to_int(src.y2),
    )
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_layer_init(&mut self, e: &LayerInitEvent) {
        let _ = writeln!(
            self.writer,
            "[init] mixer={} layer={} kind={} role={} scaling={} handle={}",
            e.mixer.0, e.index, e.kind, e.role, e.supports_scaling, e.handle.0,
        );
    }

    fn on_init_failed(&mut self, e: &InitFailedEvent) {
        let _ = writeln!(
            self.writer,
            "[init-failed] mixer={} released={} error=\"{}\"",
            e.mixer.0, e.released, e.error,
        );
    }

    fn on_check(&mut self, e: &CheckEvent) {
        let _ = match e.outcome {
            CheckOutcome::Visible => writeln!(
                self.writer,
                "[check] mixer={} layer={} visible",
                e.mixer.0, e.index,
            ),
            CheckOutcome::Invisible => writeln!(
                self.writer,
                "[check] mixer={} layer={} invisible",
                e.mixer.0, e.index,
            ),
            CheckOutcome::Rejected(r) => writeln!(
                self.writer,
                "[check] mixer={} layer={} rejected: {r}",
                e.mixer.0, e.index,
            ),
        };
    }

    fn on_program(&mut self, e: &ProgramEvent) {
        let _ = writeln!(
            self.writer,
            "[program] mixer={} layer={} kind={} src={} dst={} format={:?} scaled={}",
            e.mixer.0,
            e.index,
            e.kind,
            Geometry(pixels(e.src)),
            Geometry(e.dst),
            e.format,
            e.scaled,
        );
    }

    fn on_enable(&mut self, e: &EnableEvent) {
        let _ = writeln!(
            self.writer,
            "[{}] mixer={} layer={}",
            if e.enabled { "enable" } else { "disable" },
            e.mixer.0,
            e.index,
        );
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        let _ = writeln!(
            self.writer,
            "[commit] mixer={} coord={} format={} buffer={} enable={}",
            e.mixer.0, e.coord, e.format, e.buffer, e.enable,
        );
    }
}
