// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware layers and their registration with the host.
//!
//! A mixer has a fixed set of layers, built once by [`initialize_layers`]:
//! Video (VI) layers first, then UserInterface (UI) layers. The index of a
//! layer is its register slot and its z-order (0 is the bottom). The first
//! UI layer is the primary plane; every other layer is an overlay.
//!
//! [`Layer`] is a plain record. It refers to its mixer by [`MixerId`] and to
//! its host plane by [`PlaneHandle`]; neither side owns the other.

mod id;
mod registry;
mod state;

pub use id::{FramebufferId, MixerId, PlaneHandle};
pub use registry::initialize_layers;
pub use state::{BufferPlane, FramebufferRef, PlaneState};

use core::fmt;

use crate::format::{PixelFormat, UI_FORMATS, VI_FORMATS};

/// Which fetch unit and register layout a layer uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Video layer: RGB and YUV input, no per-pixel alpha blending.
    Video,
    /// UI layer: RGB input with alpha blending.
    UserInterface,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Video => "vi",
            Self::UserInterface => "ui",
        })
    }
}

/// How the host exposes a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerRole {
    /// The mixer's main plane.
    Primary,
    /// Any other plane.
    Overlay,
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "primary",
            Self::Overlay => "overlay",
        })
    }
}

/// What a layer can do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Accepted pixel formats, shared by every layer of the same kind.
    pub formats: &'static [PixelFormat],
    /// Whether a scaler is attached.
    pub supports_scaling: bool,
    /// Whether the layer blends with per-pixel alpha.
    pub supports_alpha: bool,
}

impl Capabilities {
    /// Capabilities of a layer of `kind`.
    #[must_use]
    pub const fn for_kind(kind: LayerKind, supports_scaling: bool) -> Self {
        match kind {
            LayerKind::Video => Self {
                formats: VI_FORMATS,
                supports_scaling,
                supports_alpha: false,
            },
            LayerKind::UserInterface => Self {
                formats: UI_FORMATS,
                supports_scaling,
                supports_alpha: true,
            },
        }
    }

    /// Returns `true` if `format` is accepted.
    #[must_use]
    pub fn accepts(&self, format: PixelFormat) -> bool {
        self.formats.contains(&format)
    }
}

/// One hardware layer of a mixer.
#[derive(Clone, Debug)]
pub struct Layer {
    index: u32,
    kind: LayerKind,
    role: LayerRole,
    capabilities: Capabilities,
    mixer: MixerId,
    handle: PlaneHandle,
    pub(crate) enabled: bool,
    pub(crate) current_state: Option<PlaneState>,
}

impl Layer {
    pub(crate) fn new(
        index: u32,
        kind: LayerKind,
        role: LayerRole,
        capabilities: Capabilities,
        mixer: MixerId,
        handle: PlaneHandle,
    ) -> Self {
        Self {
            index,
            kind,
            role,
            capabilities,
            mixer,
            handle,
            enabled: false,
            current_state: None,
        }
    }

    /// Register slot and z-order.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Video or UI layer.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Primary or overlay.
    #[inline]
    #[must_use]
    pub const fn role(&self) -> LayerRole {
        self.role
    }

    /// What the layer can do.
    #[inline]
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Owning mixer.
    #[inline]
    #[must_use]
    pub const fn mixer(&self) -> MixerId {
        self.mixer
    }

    /// Host plane handle.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> PlaneHandle {
        self.handle
    }

    /// Whether the hardware enable bit is set.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The last state applied by an update, if any.
    #[inline]
    #[must_use]
    pub const fn current_state(&self) -> Option<&PlaneState> {
        self.current_state.as_ref()
    }

    /// Immutable z-order value; equal to the index.
    #[inline]
    #[must_use]
    pub const fn zpos(&self) -> u32 {
        self.index
    }

    /// Accepted pixel formats.
    #[inline]
    #[must_use]
    pub const fn formats(&self) -> &'static [PixelFormat] {
        self.capabilities.formats
    }

    /// Accepted pixel formats as DRM fourcc codes.
    pub fn fourccs(&self) -> impl Iterator<Item = u32> + '_ {
        self.capabilities.formats.iter().map(|f| f.fourcc())
    }
}
