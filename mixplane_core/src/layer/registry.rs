// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building and registering a mixer's layer set.

use alloc::vec::Vec;

use super::{Capabilities, Layer, MixerId};
use crate::config::MixerConfig;
use crate::error::{InitError, RegistrationStage};
use crate::host::{HostError, PlaneDescriptor, PlaneHost};
use crate::trace::{InitFailedEvent, LayerInitEvent, Tracer};

/// Creates and registers every layer of a mixer.
///
/// Layers come back in index order: `config.vi_count` Video layers, then
/// `config.ui_count` UI layers. Each is registered with `host` exactly once
/// and given an immutable z-order equal to its index.
///
/// On failure every plane registered by this call is released again, last
/// first, and no layers are returned.
///
/// # Errors
///
/// - [`InitError::Allocation`] if layer storage cannot be reserved or the
///   host runs out of memory.
/// - [`InitError::Registration`] if the host rejects a plane or its z-order
///   property.
pub fn initialize_layers(
    config: &MixerConfig,
    mixer: MixerId,
    host: &mut dyn PlaneHost,
    tracer: &mut Tracer<'_>,
) -> Result<Vec<Layer>, InitError> {
    let count = config.layer_count();
    let mut layers = Vec::new();
    if layers
        .try_reserve_exact(usize::try_from(count).unwrap_or(usize::MAX))
        .is_err()
    {
        return fail(mixer, InitError::Allocation, host, &[], tracer);
    }

    for index in 0..count {
        let kind = config.kind_of(index);
        let role = config.role_of(index);
        let capabilities = Capabilities::for_kind(kind, config.supports_scaling(index));
        let desc = PlaneDescriptor {
            mixer,
            index,
            kind,
            role,
            formats: capabilities.formats,
            zpos: index,
        };

        let registration_error = |stage: RegistrationStage, source: HostError| match source {
            HostError::OutOfMemory => InitError::Allocation,
            source => InitError::Registration {
                index,
                role,
                stage,
                source,
            },
        };

        let handle = match host.register_plane(&desc) {
            Ok(handle) => handle,
            Err(e) => {
                let err = registration_error(RegistrationStage::Plane, e);
                return fail(mixer, err, host, &layers, tracer);
            }
        };
        if let Err(e) = host.attach_zpos(handle, desc.zpos) {
            host.release_plane(handle);
            let err = registration_error(RegistrationStage::Zpos, e);
            return fail(mixer, err, host, &layers, tracer);
        }

        tracer.layer_init(&LayerInitEvent {
            mixer,
            index,
            kind,
            role,
            supports_scaling: capabilities.supports_scaling,
            handle,
        });
        layers.push(Layer::new(index, kind, role, capabilities, mixer, handle));
    }

    Ok(layers)
}

/// Releases `registered` in reverse order and reports `error`.
fn fail(
    mixer: MixerId,
    error: InitError,
    host: &mut dyn PlaneHost,
    registered: &[Layer],
    tracer: &mut Tracer<'_>,
) -> Result<Vec<Layer>, InitError> {
    for layer in registered.iter().rev() {
        host.release_plane(layer.handle());
    }
    tracer.init_failed(&InitFailedEvent {
        mixer,
        error,
        released: u32::try_from(registered.len()).unwrap_or(u32::MAX),
    });
    Err(error)
}
