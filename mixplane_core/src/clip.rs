// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipping a plane's destination to the output surface.
//!
//! When the destination rectangle hangs off the edge of the output, the part
//! outside the clip rectangle is cut away and the source crop shrinks by the
//! same proportion, so the visible pixels keep their position in the buffer.

use crate::geometry::Rect;
use crate::scale::ScaleFactor;

/// Clips a `(source, destination)` pair against the output clip rectangle.
///
/// Implementations shrink `dst` to its intersection with `clip` and adjust
/// the 16.16 `src` crop to match, using the per-axis scale factors the
/// admission check has already validated. They return `true` if any part of
/// the destination is left.
pub trait ClipStrategy {
    /// Clips `dst` to `clip` and adjusts `src` accordingly.
    fn clip(
        &self,
        src: &mut Rect,
        dst: &mut Rect,
        clip: &Rect,
        hscale: ScaleFactor,
        vscale: ScaleFactor,
    ) -> bool;
}

/// Default strategy: each clipped destination edge moves the matching source
/// edge by `pixels * scale`.
///
/// Axes are handled independently. Source edges saturate at the `i32` range
/// instead of wrapping.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScaledClip;

fn shift(edge: i32, diff: i32, scale: ScaleFactor) -> i32 {
    let moved = i64::from(edge) + i64::from(diff) * i64::from(scale.numerator());
    i32::try_from(moved.clamp(i64::from(i32::MIN), i64::from(i32::MAX))).unwrap_or(edge)
}

impl ClipStrategy for ScaledClip {
    fn clip(
        &self,
        src: &mut Rect,
        dst: &mut Rect,
        clip: &Rect,
        hscale: ScaleFactor,
        vscale: ScaleFactor,
    ) -> bool {
        let diff = clip.x1.saturating_sub(dst.x1);
        if diff > 0 {
            src.x1 = shift(src.x1, diff, hscale);
        }
        let diff = clip.y1.saturating_sub(dst.y1);
        if diff > 0 {
            src.y1 = shift(src.y1, diff, vscale);
        }
        let diff = dst.x2.saturating_sub(clip.x2);
        if diff > 0 {
            src.x2 = shift(src.x2, -diff, hscale);
        }
        let diff = dst.y2.saturating_sub(clip.y2);
        if diff > 0 {
            src.y2 = shift(src.y2, -diff, vscale);
        }
        dst.intersect(clip)
    }
}
