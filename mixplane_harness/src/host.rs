// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simulated host graphics subsystem.

use alloc::vec::Vec;

use mixplane_core::host::{HostError, PlaneDescriptor, PlaneHost};
use mixplane_core::layer::PlaneHandle;

/// Records plane registrations and can be told to fail one of them.
///
/// Handles are handed out from 1 upwards in registration order. A failure
/// is keyed by layer index and fires the first time that index is reached.
#[derive(Clone, Debug, Default)]
pub struct FakeHost {
    next_handle: u32,
    registered: Vec<(PlaneHandle, PlaneDescriptor)>,
    live: Vec<PlaneHandle>,
    released: Vec<PlaneHandle>,
    zpos: Vec<(PlaneHandle, u32)>,
    fail_plane: Option<(u32, HostError)>,
    fail_zpos: Option<(u32, HostError)>,
}

impl FakeHost {
    /// Creates a host that accepts every plane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes registration of layer `index` fail with `error`.
    #[must_use]
    pub fn failing_plane_at(mut self, index: u32, error: HostError) -> Self {
        self.fail_plane = Some((index, error));
        self
    }

    /// Makes attaching the z-order of layer `index` fail with `error`.
    #[must_use]
    pub fn failing_zpos_at(mut self, index: u32, error: HostError) -> Self {
        self.fail_zpos = Some((index, error));
        self
    }

    /// Descriptors of every successful registration, in call order.
    pub fn registered(&self) -> impl Iterator<Item = &PlaneDescriptor> + '_ {
        self.registered.iter().map(|(_, d)| d)
    }

    /// The descriptor `handle` was registered with.
    #[must_use]
    pub fn descriptor_of(&self, handle: PlaneHandle) -> Option<&PlaneDescriptor> {
        self.registered
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, d)| d)
    }

    /// Handles registered and not yet released.
    #[must_use]
    pub fn live(&self) -> &[PlaneHandle] {
        &self.live
    }

    /// Handles released, in release order.
    #[must_use]
    pub fn released(&self) -> &[PlaneHandle] {
        &self.released
    }

    /// The z-order attached to `handle`, if any.
    #[must_use]
    pub fn zpos_of(&self, handle: PlaneHandle) -> Option<u32> {
        self.zpos
            .iter()
            .find(|&&(h, _)| h == handle)
            .map(|&(_, z)| z)
    }
}

impl PlaneHost for FakeHost {
    fn register_plane(&mut self, desc: &PlaneDescriptor) -> Result<PlaneHandle, HostError> {
        if let Some((_, error)) = self.fail_plane.filter(|&(i, _)| i == desc.index) {
            self.fail_plane = None;
            return Err(error);
        }
        self.next_handle += 1;
        let handle = PlaneHandle(self.next_handle);
        self.registered.push((handle, *desc));
        self.live.push(handle);
        Ok(handle)
    }

    fn attach_zpos(&mut self, handle: PlaneHandle, zpos: u32) -> Result<(), HostError> {
        let index = self.descriptor_of(handle).map(|d| d.index);
        if let Some((_, error)) = self.fail_zpos.filter(|&(i, _)| Some(i) == index) {
            self.fail_zpos = None;
            return Err(error);
        }
        self.zpos.push((handle, zpos));
        Ok(())
    }

    fn release_plane(&mut self, handle: PlaneHandle) {
        self.live.retain(|&h| h != handle);
        self.released.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixplane_core::format::UI_FORMATS;
    use mixplane_core::layer::{LayerKind, LayerRole, MixerId};

    fn desc(index: u32) -> PlaneDescriptor {
        PlaneDescriptor {
            mixer: MixerId(0),
            index,
            kind: LayerKind::UserInterface,
            role: LayerRole::Overlay,
            formats: UI_FORMATS,
            zpos: index,
        }
    }

    #[test]
    fn handles_count_up_from_one() {
        let mut host = FakeHost::new();
        assert_eq!(host.register_plane(&desc(0)), Ok(PlaneHandle(1)));
        assert_eq!(host.register_plane(&desc(1)), Ok(PlaneHandle(2)));
        assert_eq!(host.live(), [PlaneHandle(1), PlaneHandle(2)]);
        assert_eq!(host.registered().count(), 2);
    }

    #[test]
    fn plane_failure_fires_once() {
        let mut host = FakeHost::new().failing_plane_at(1, HostError::Failed(-12));
        assert!(host.register_plane(&desc(0)).is_ok());
        assert_eq!(host.register_plane(&desc(1)), Err(HostError::Failed(-12)));
        assert!(host.register_plane(&desc(1)).is_ok());
    }

    #[test]
    fn zpos_failure_is_keyed_by_layer_index() {
        let mut host = FakeHost::new().failing_zpos_at(1, HostError::Failed(-22));
        let a = host.register_plane(&desc(0)).unwrap();
        let b = host.register_plane(&desc(1)).unwrap();
        assert_eq!(host.attach_zpos(a, 0), Ok(()));
        assert_eq!(host.attach_zpos(b, 1), Err(HostError::Failed(-22)));
        assert_eq!(host.zpos_of(a), Some(0));
        assert_eq!(host.zpos_of(b), None);
    }

    #[test]
    fn release_moves_handle_out_of_live() {
        let mut host = FakeHost::new();
        let a = host.register_plane(&desc(0)).unwrap();
        host.release_plane(a);
        assert!(host.live().is_empty());
        assert_eq!(host.released(), [a]);
    }
}
