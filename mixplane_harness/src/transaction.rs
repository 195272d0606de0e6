// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal stand-in for the host's atomic commit.
//!
//! [`apply`] runs one refresh transaction against a [`Mixer`] the way the
//! host's state machine does: every proposed layer state is checked first,
//! and only if all checks pass are the layers updated and the result
//! committed. A rejected transaction leaves registers and layers untouched.

use alloc::vec::Vec;
use core::fmt;

use mixplane_core::error::Rejection;
use mixplane_core::geometry::SurfaceGeometry;
use mixplane_core::layer::PlaneState;
use mixplane_core::mixer::{CommitChanges, Mixer};
use mixplane_core::output::OutputId;
use mixplane_core::regs::RegisterIo;
use mixplane_core::trace::TraceSink;

/// The first layer state of a transaction that failed its check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionError {
    /// Layer whose proposed state was refused.
    pub index: u32,
    /// Why it was refused.
    pub rejection: Rejection,
}

impl fmt::Display for TransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {} rejected: {}", self.index, self.rejection)
    }
}

impl core::error::Error for TransactionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.rejection)
    }
}

/// Checks every `(layer index, proposed state)` pair, then applies and
/// commits them in order.
///
/// `geometry` resolves a proposal's target output to its size; `None` means
/// the output is unknown.
///
/// # Errors
///
/// Returns the first rejection, in proposal order. Nothing has been
/// written when this happens.
///
/// # Panics
///
/// Panics if a layer index is out of range for `mixer`.
pub fn apply<R, S>(
    mixer: &mut Mixer<R, S>,
    proposals: &[(u32, PlaneState)],
    geometry: impl Fn(OutputId) -> Option<SurfaceGeometry>,
) -> Result<CommitChanges, TransactionError>
where
    R: RegisterIo,
    S: TraceSink,
{
    let mut checked = Vec::with_capacity(proposals.len());
    for &(index, proposed) in proposals {
        let target = proposed.target.and_then(&geometry);
        let state = mixer
            .check(index, &proposed, target)
            .map_err(|rejection| TransactionError { index, rejection })?;
        checked.push((index, state));
    }

    for (index, state) in &checked {
        mixer.update(*index, state);
    }
    Ok(mixer.commit())
}

/// Geometry lookup for a single output of the given size.
pub fn single_output(
    output: OutputId,
    geometry: SurfaceGeometry,
) -> impl Fn(OutputId) -> Option<SurfaceGeometry> {
    move |id| (id == output).then_some(geometry)
}
