// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract with the host graphics subsystem.
//!
//! The host owns the plane objects user space sees. At mixer start-up the
//! layer registry hands each hardware layer to the host as a
//! [`PlaneDescriptor`] and receives an opaque [`PlaneHandle`] back. The host
//! then attaches an immutable z-order property to the plane. If any step
//! fails, planes registered so far are released in reverse order.
//!
//! The host also drives per-refresh transactions (check every modified
//! layer, then apply); that part of the contract is plain method calls on
//! [`Mixer`](crate::mixer::Mixer) and needs no trait.

use core::fmt;

use crate::format::PixelFormat;
use crate::layer::{LayerKind, LayerRole, MixerId, PlaneHandle};

/// Everything the host needs to expose one hardware layer as a plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneDescriptor {
    /// Owning mixer.
    pub mixer: MixerId,
    /// Layer index within the mixer.
    pub index: u32,
    /// Video or UI layer.
    pub kind: LayerKind,
    /// Primary or overlay plane.
    pub role: LayerRole,
    /// Accepted pixel formats.
    pub formats: &'static [PixelFormat],
    /// Immutable z-order value.
    pub zpos: u32,
}

/// A failure reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostError {
    /// The host could not allocate memory for the plane.
    OutOfMemory,
    /// Any other host failure, with the host's error code.
    Failed(i32),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => f.write_str("host out of memory"),
            Self::Failed(code) => write!(f, "host error ({code})"),
        }
    }
}

impl core::error::Error for HostError {}

/// Plane registration services provided by the host.
pub trait PlaneHost {
    /// Registers a plane and returns its handle.
    fn register_plane(&mut self, desc: &PlaneDescriptor) -> Result<PlaneHandle, HostError>;

    /// Attaches the immutable z-order property to a registered plane.
    fn attach_zpos(&mut self, plane: PlaneHandle, zpos: u32) -> Result<(), HostError>;

    /// Releases a plane registered earlier. Used to roll back a failed
    /// initialization.
    fn release_plane(&mut self, plane: PlaneHandle);
}
