// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for layer initialization and admission.

use core::fmt;

use crate::host::HostError;
use crate::layer::LayerRole;
use crate::scale::Axis;

/// Which registration step the host rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegistrationStage {
    /// Creating the plane itself.
    Plane,
    /// Attaching the z-order property.
    Zpos,
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plane => "plane",
            Self::Zpos => "zpos property",
        })
    }
}

/// Fatal errors from building a mixer's layer set.
///
/// No layers are returned when either variant occurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitError {
    /// Storage for the layer set could not be reserved.
    Allocation,
    /// The host rejected a layer.
    Registration {
        /// Index of the failing layer.
        index: u32,
        /// Role of the failing layer.
        role: LayerRole,
        /// Which step failed.
        stage: RegistrationStage,
        /// The host's own error.
        source: HostError,
    },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation => f.write_str("could not allocate layer storage"),
            Self::Registration {
                index,
                role,
                stage,
                source,
            } => write!(
                f,
                "could not register {role} layer {index} ({stage}): {source}"
            ),
        }
    }
}

impl core::error::Error for InitError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Allocation => None,
            Self::Registration { source, .. } => Some(source),
        }
    }
}

/// Why a proposed plane state was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The scale ratio on `axis` lies outside the layer's bounds.
    ScaleOutOfRange {
        /// Offending axis.
        axis: Axis,
    },
    /// The source or destination rectangle has zero or negative extent.
    DegenerateRegion,
    /// A buffer is attached but no usable output surface is.
    NoTargetSurface,
    /// The buffer's pixel format is not in the layer's capability set.
    UnsupportedFormat,
    /// The source crop reaches outside the framebuffer.
    SourceOutOfBounds,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScaleOutOfRange { axis } => write!(f, "{axis} scale out of range"),
            Self::DegenerateRegion => f.write_str("degenerate source or destination"),
            Self::NoTargetSurface => f.write_str("no target surface"),
            Self::UnsupportedFormat => f.write_str("unsupported pixel format"),
            Self::SourceOutOfBounds => f.write_str("source crop outside framebuffer"),
        }
    }
}

impl core::error::Error for Rejection {}
