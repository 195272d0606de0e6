// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-mixer hardware configuration.

use crate::layer::{LayerKind, LayerRole};

/// Number of blender pipes. Layers at or past this index are programmed
/// without pipe routing.
pub const MAX_LAYERS: u32 = 5;

/// Layer counts and scaler availability of one mixer instance.
///
/// Video layers occupy indices `[0, vi_count)`, UI layers follow at
/// `[vi_count, vi_count + ui_count)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MixerConfig {
    /// Number of Video (VI) layers.
    pub vi_count: u32,
    /// Number of UserInterface (UI) layers.
    pub ui_count: u32,
    /// Bit `i` set means layer `i` has a scaler.
    pub scaler_mask: u32,
}

impl MixerConfig {
    /// Creates a configuration with no scalers.
    #[must_use]
    pub const fn new(vi_count: u32, ui_count: u32) -> Self {
        Self {
            vi_count,
            ui_count,
            scaler_mask: 0,
        }
    }

    /// Returns a copy with the given scaler bitmask.
    #[must_use]
    pub const fn with_scaler_mask(mut self, mask: u32) -> Self {
        self.scaler_mask = mask;
        self
    }

    /// Allwinner V3s mixer.
    #[must_use]
    pub const fn v3s() -> Self {
        Self::new(2, 1).with_scaler_mask(0x3)
    }

    /// Allwinner H3 (and H5) first mixer.
    #[must_use]
    pub const fn h3_mixer0() -> Self {
        Self::new(1, 3).with_scaler_mask(0xf)
    }

    /// Allwinner H3 (and H5) second mixer.
    #[must_use]
    pub const fn h3_mixer1() -> Self {
        Self::new(1, 1).with_scaler_mask(0x3)
    }

    /// Allwinner A83T first mixer.
    #[must_use]
    pub const fn a83t_mixer0() -> Self {
        Self::new(1, 3).with_scaler_mask(0xf)
    }

    /// Allwinner A83T second mixer.
    #[must_use]
    pub const fn a83t_mixer1() -> Self {
        Self::new(1, 1).with_scaler_mask(0x3)
    }

    /// Allwinner A64 first mixer.
    #[must_use]
    pub const fn a64_mixer0() -> Self {
        Self::new(1, 3).with_scaler_mask(0xf)
    }

    /// Total number of layers, saturating at `u32::MAX`.
    #[inline]
    #[must_use]
    pub const fn layer_count(&self) -> u32 {
        self.vi_count.saturating_add(self.ui_count)
    }

    /// Kind of the layer at `index`.
    #[inline]
    #[must_use]
    pub const fn kind_of(&self, index: u32) -> LayerKind {
        if index < self.vi_count {
            LayerKind::Video
        } else {
            LayerKind::UserInterface
        }
    }

    /// Role of the layer at `index`: the first UI layer is primary.
    #[inline]
    #[must_use]
    pub const fn role_of(&self, index: u32) -> LayerRole {
        if index == self.vi_count {
            LayerRole::Primary
        } else {
            LayerRole::Overlay
        }
    }

    /// Whether the layer at `index` has a scaler.
    #[inline]
    #[must_use]
    pub const fn supports_scaling(&self, index: u32) -> bool {
        index < u32::BITS && self.scaler_mask & (1 << index) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v3s_layout() {
        let c = MixerConfig::v3s();
        assert_eq!(c.layer_count(), 3);
        assert_eq!(c.kind_of(0), LayerKind::Video);
        assert_eq!(c.kind_of(1), LayerKind::Video);
        assert_eq!(c.kind_of(2), LayerKind::UserInterface);
        assert_eq!(c.role_of(2), LayerRole::Primary);
        assert_eq!(c.role_of(0), LayerRole::Overlay);
        assert!(c.supports_scaling(1));
        assert!(!c.supports_scaling(2));
    }

    #[test]
    fn h3_mixer0_scales_every_layer() {
        let c = MixerConfig::h3_mixer0();
        assert!((0..c.layer_count()).all(|i| c.supports_scaling(i)));
        assert_eq!(c.role_of(1), LayerRole::Primary);
    }

    #[test]
    fn no_ui_layers_means_no_primary() {
        let c = MixerConfig::new(2, 0);
        assert!((0..c.layer_count()).all(|i| c.role_of(i) == LayerRole::Overlay));
    }

    #[test]
    fn scaler_query_out_of_bit_range() {
        let c = MixerConfig::new(1, 1).with_scaler_mask(u32::MAX);
        assert!(!c.supports_scaling(40));
    }

    #[test]
    fn more_layers_than_pipes() {
        let c = MixerConfig::new(4, 3);
        assert_eq!(c.layer_count(), 7);
        assert!(c.layer_count() > MAX_LAYERS);
        assert_eq!(c.role_of(4), LayerRole::Primary);
        assert_eq!(c.kind_of(6), LayerKind::UserInterface);
    }

    #[test]
    fn layer_count_saturates() {
        let c = MixerConfig {
            vi_count: u32::MAX,
            ui_count: 2,
            scaler_mask: 0,
        };
        assert_eq!(c.layer_count(), u32::MAX);
    }
}
