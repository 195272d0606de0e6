// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter for recorded events.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes a JSON array with one object per event, in recording order.
//! Every object carries `seq`, `event` and `mixer`; the remaining keys
//! depend on the event.

use std::io::{self, Write};

use serde_json::{Value, json};

use mixplane_core::format::PixelFormat;
use mixplane_core::geometry::Rect;
use mixplane_core::trace::CheckOutcome;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes)
        .enumerate()
        .map(|(seq, recorded)| to_value(seq, &recorded))
        .collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_value(seq: usize, recorded: &RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::LayerInit(e) => json!({
            "seq": seq,
            "event": "layer_init",
            "mixer": e.mixer.0,
            "layer": e.index,
            "kind": e.kind.to_string(),
            "role": e.role.to_string(),
            "supports_scaling": e.supports_scaling,
            "handle": e.handle.0,
        }),
        RecordedEvent::InitFailed(e) => json!({
            "seq": seq,
            "event": "init_failed",
            "mixer": e.mixer.0,
            "error": e.error.to_string(),
            "released": e.released,
        }),
        RecordedEvent::Check(e) => {
            let (outcome, reason) = match e.outcome {
                CheckOutcome::Visible => ("visible", Value::Null),
                CheckOutcome::Invisible => ("invisible", Value::Null),
                CheckOutcome::Rejected(r) => ("rejected", Value::String(r.to_string())),
            };
            json!({
                "seq": seq,
                "event": "check",
                "mixer": e.mixer.0,
                "layer": e.index,
                "outcome": outcome,
                "reason": reason,
            })
        }
        RecordedEvent::Program(e) => json!({
            "seq": seq,
            "event": "program",
            "mixer": e.mixer.0,
            "layer": e.index,
            "kind": e.kind.to_string(),
            "src_fixed": rect(e.src),
            "dst": rect(e.dst),
            "fourcc": fourcc(e.format),
            "scaled": e.scaled,
        }),
        RecordedEvent::Enable(e) => json!({
            "seq": seq,
            "event": "enable",
            "mixer": e.mixer.0,
            "layer": e.index,
            "enabled": e.enabled,
        }),
        RecordedEvent::Commit(e) => json!({
            "seq": seq,
            "event": "commit",
            "mixer": e.mixer.0,
            "coord": e.coord,
            "format": e.format,
            "buffer": e.buffer,
            "enable": e.enable,
        }),
    }
}

fn fourcc(format: PixelFormat) -> String {
    format.fourcc().to_le_bytes().iter().map(|&b| char::from(b)).collect()
}

fn rect(r: Rect) -> Value {
    json!([r.x1, r.y1, r.x2, r.y2])
}
