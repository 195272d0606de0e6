// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-point scale factors and per-layer scale bounds.
//!
//! A scale factor is the ratio `source extent / destination extent`, where
//! the source extent is 16.16 fixed point and the destination extent is
//! whole pixels. The quotient is therefore itself 16.16: [`IDENTITY`] is
//! `1 << 16`, a 2x downscale is `2 << 16`, a 2x upscale is `1 << 15`.
//!
//! Bounds are checked by cross-multiplying in 64 bits rather than by
//! dividing first, so there is no rounding step between the request and the
//! comparison.
//!
//! [`IDENTITY`]: ScaleFactor::IDENTITY

use core::fmt;

/// Which axis a scale value applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Width.
    Horizontal,
    /// Height.
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

/// A `numerator / denominator` ratio with a fixed power-of-two denominator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScaleFactor {
    numerator: u32,
    denominator: u32,
}

impl ScaleFactor {
    /// The fixed denominator (`1 << 16`).
    pub const DENOMINATOR: u32 = 1 << 16;

    /// Source and destination are pixel-for-pixel equal.
    pub const IDENTITY: Self = Self::from_fixed(Self::DENOMINATOR);

    /// Smallest ratio a scaler accepts (maximum upscale).
    pub const MIN_SCALER: Self = Self::from_fixed(1);

    /// Largest ratio a scaler accepts. Ratios of `1 << 20` and above are not
    /// representable by the hardware step registers.
    pub const MAX_SCALER: Self = Self::from_fixed((1 << 20) - 1);

    /// Creates a factor from a 16.16 numerator.
    #[inline]
    #[must_use]
    pub const fn from_fixed(numerator: u32) -> Self {
        Self {
            numerator,
            denominator: Self::DENOMINATOR,
        }
    }

    /// Computes `src_fixed / dst`, truncated toward zero.
    ///
    /// Returns `None` when `dst` is zero. Saturates at `u32::MAX`.
    #[must_use]
    pub fn between(src_fixed: u32, dst: u32) -> Option<Self> {
        if dst == 0 {
            return None;
        }
        let q = u64::from(src_fixed) / u64::from(dst);
        Some(Self::from_fixed(u32::try_from(q).unwrap_or(u32::MAX)))
    }

    /// The 16.16 numerator.
    #[inline]
    #[must_use]
    pub const fn numerator(self) -> u32 {
        self.numerator
    }

    /// The denominator, always [`DENOMINATOR`](Self::DENOMINATOR).
    #[inline]
    #[must_use]
    pub const fn denominator(self) -> u32 {
        self.denominator
    }
}

impl fmt::Debug for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScaleFactor({}/{})", self.numerator, self.denominator)
    }
}

/// Inclusive `[min, max]` range of scale factors a layer accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScaleBounds {
    /// Smallest accepted factor.
    pub min: ScaleFactor,
    /// Largest accepted factor.
    pub max: ScaleFactor,
}

impl ScaleBounds {
    /// Layers without a scaler: only the identity ratio.
    pub const NO_SCALING: Self = Self {
        min: ScaleFactor::IDENTITY,
        max: ScaleFactor::IDENTITY,
    };

    /// Layers backed by a scaler.
    pub const SCALER: Self = Self {
        min: ScaleFactor::MIN_SCALER,
        max: ScaleFactor::MAX_SCALER,
    };

    /// Picks [`SCALER`](Self::SCALER) or [`NO_SCALING`](Self::NO_SCALING).
    #[inline]
    #[must_use]
    pub const fn for_layer(supports_scaling: bool) -> Self {
        if supports_scaling {
            Self::SCALER
        } else {
            Self::NO_SCALING
        }
    }

    /// Admits `src_fixed / dst` if its truncated value lies in `[min, max]`.
    ///
    /// With `q = floor(src / dst)`:
    /// `q >= min` iff `src >= min * dst`, and `q <= max` iff
    /// `src < (max + 1) * dst`. Both sides share the same denominator.
    ///
    /// Returns the truncated factor on success, `None` when out of range or
    /// when `dst` is zero.
    #[must_use]
    pub fn admit(&self, src_fixed: u32, dst: u32) -> Option<ScaleFactor> {
        if dst == 0 {
            return None;
        }
        let src = u64::from(src_fixed);
        let dst = u64::from(dst);
        let lower = u64::from(self.min.numerator) * dst;
        let upper = (u64::from(self.max.numerator) + 1) * dst;
        if src < lower || src >= upper {
            return None;
        }
        ScaleFactor::between(src_fixed, u32::try_from(dst).ok()?)
    }
}
