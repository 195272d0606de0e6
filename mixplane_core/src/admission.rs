// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Admission check for proposed layer states.
//!
//! [`check`] decides whether a layer can show a proposed [`PlaneState`]. It
//! never touches hardware or the layer, so a transaction can check every
//! layer and still back out with no effect.
//!
//! The checks run in this order, and the first failure wins:
//!
//! 1. A state with no target output is accepted as invisible, unless it
//!    asks to show a buffer ([`Rejection::NoTargetSurface`]).
//! 2. The target must have a known geometry ([`Rejection::NoTargetSurface`]).
//! 3. A state that is not visible or has no buffer is accepted as invisible.
//! 4. The buffer format must be one the layer accepts
//!    ([`Rejection::UnsupportedFormat`]).
//! 5. Source and destination must both have positive extent
//!    ([`Rejection::DegenerateRegion`]).
//! 6. The source crop must lie inside the buffer
//!    ([`Rejection::SourceOutOfBounds`]).
//! 7. The scale ratio on each axis must be within the layer's bounds
//!    ([`Rejection::ScaleOutOfRange`]).
//! 8. The destination is clipped to the output. A destination entirely off
//!    the output is accepted as invisible.

use crate::clip::ClipStrategy;
use crate::error::Rejection;
use crate::geometry::SurfaceGeometry;
use crate::layer::{Layer, PlaneState};
use crate::scale::{Axis, ScaleBounds, ScaleFactor};

/// Validates `proposed` for `layer` on an output of size `target`.
///
/// On success returns the state to apply: clipped to the output, with
/// `visible` telling whether anything is left to show. Requests are never
/// coerced into range.
///
/// # Errors
///
/// Returns the first [`Rejection`] that applies; see the module docs for
/// the order.
pub fn check(
    layer: &Layer,
    proposed: &PlaneState,
    target: Option<SurfaceGeometry>,
    clip: &dyn ClipStrategy,
) -> Result<PlaneState, Rejection> {
    let mut state = *proposed;

    if proposed.target.is_none() {
        if proposed.visible && proposed.buffer.is_some() {
            return Err(Rejection::NoTargetSurface);
        }
        state.visible = false;
        return Ok(state);
    }
    let Some(geometry) = target else {
        return Err(Rejection::NoTargetSurface);
    };
    let Some(fb) = proposed.buffer.filter(|_| proposed.visible) else {
        state.visible = false;
        return Ok(state);
    };

    if !layer.capabilities().accepts(fb.format) {
        return Err(Rejection::UnsupportedFormat);
    }
    if !state.src.is_visible() || !state.dst.is_visible() {
        return Err(Rejection::DegenerateRegion);
    }
    if !fb.extent_fixed().contains(&state.src) {
        return Err(Rejection::SourceOutOfBounds);
    }

    let bounds = ScaleBounds::for_layer(layer.capabilities().supports_scaling);
    let ratio = |src: i32, dst: i32, axis: Axis| -> Result<ScaleFactor, Rejection> {
        let src = u32::try_from(src).map_err(|_| Rejection::DegenerateRegion)?;
        let dst = u32::try_from(dst).map_err(|_| Rejection::DegenerateRegion)?;
        bounds
            .admit(src, dst)
            .ok_or(Rejection::ScaleOutOfRange { axis })
    };
    let hscale = ratio(state.src.width(), state.dst.width(), Axis::Horizontal)?;
    let vscale = ratio(state.src.height(), state.dst.height(), Axis::Vertical)?;

    state.visible = clip.clip(
        &mut state.src,
        &mut state.dst,
        &geometry.clip_rect(),
        hscale,
        vscale,
    );
    Ok(state)
}
