// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles and 16.16 fixed-point helpers.
//!
//! Destination rectangles are in whole output pixels. Source (crop)
//! rectangles use the same [`Rect`] type but every coordinate is 16.16
//! fixed point, so a crop can start or end between buffer pixels.

/// `1.0` in 16.16 fixed point.
pub const FIXED_ONE: i32 = 1 << 16;

/// Converts whole pixels to 16.16 fixed point, saturating at the `i32` range.
#[inline]
#[must_use]
pub const fn to_fixed(v: i32) -> i32 {
    v.saturating_mul(FIXED_ONE)
}

/// Truncates a 16.16 fixed-point value to whole pixels.
#[inline]
#[must_use]
pub const fn fixed_to_int(v: i32) -> i32 {
    v >> 16
}

/// An axis-aligned rectangle with exclusive lower-right corner.
///
/// `x2`/`y2` are one past the last covered column/row, so a rectangle with
/// `x1 == x2` covers nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x1: i32,
    /// Top edge (inclusive).
    pub y1: i32,
    /// Right edge (exclusive).
    pub x2: i32,
    /// Bottom edge (exclusive).
    pub y2: i32,
}

impl Rect {
    /// Creates a rectangle from its edges.
    #[inline]
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Creates a rectangle from an origin and a size.
    #[inline]
    #[must_use]
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x.saturating_add(width),
            y2: y.saturating_add(height),
        }
    }

    /// Same as [`from_xywh`](Self::from_xywh), with every value converted
    /// to 16.16 fixed point. Convenient for whole-pixel source crops.
    #[inline]
    #[must_use]
    pub const fn fixed_from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::from_xywh(to_fixed(x), to_fixed(y), to_fixed(width), to_fixed(height))
    }

    /// Horizontal extent. Negative if the rectangle is inverted.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1)
    }

    /// Vertical extent. Negative if the rectangle is inverted.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Returns `true` if the rectangle covers at least one pixel.
    #[inline]
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    /// Shrinks `self` to its intersection with `clip`.
    ///
    /// Returns whether anything is left.
    pub fn intersect(&mut self, clip: &Self) -> bool {
        self.x1 = self.x1.max(clip.x1);
        self.y1 = self.y1.max(clip.y1);
        self.x2 = self.x2.min(clip.x2);
        self.y2 = self.y2.min(clip.y2);
        self.is_visible()
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }
}

/// Active size of an output surface in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceGeometry {
    /// Active width.
    pub width: u32,
    /// Active height.
    pub height: u32,
}

impl SurfaceGeometry {
    /// Creates a geometry value.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The clip rectangle `[0,0]–[width,height]` that planes are clipped to.
    #[must_use]
    pub fn clip_rect(&self) -> Rect {
        Rect::new(
            0,
            0,
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}
