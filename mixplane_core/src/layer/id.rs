// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity types for mixers, host planes and framebuffers.

use core::fmt;

/// Identifies the mixer a layer belongs to.
///
/// Layers hold this instead of a reference to the mixer; look the mixer up
/// through whatever owns it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MixerId(pub u32);

impl fmt::Debug for MixerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MixerId({})", self.0)
    }
}

/// Opaque handle the host assigns when a plane is registered.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneHandle(pub u32);

impl fmt::Debug for PlaneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlaneHandle({})", self.0)
    }
}

/// Host identifier of an imported framebuffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u32);

impl fmt::Debug for FramebufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FramebufferId({})", self.0)
    }
}
