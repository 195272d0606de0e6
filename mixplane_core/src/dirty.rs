// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pending-write channel constants.
//!
//! Register writes made by [`Mixer::update`](crate::mixer::Mixer::update)
//! and [`Mixer::disable`](crate::mixer::Mixer::disable) land in shadow
//! registers. The mixer records which layers were touched, per category, in
//! an [`understory_dirty`] tracker keyed by layer index. All channels are
//! local-only: a layer's registers never depend on another layer's.
//!
//! [`Mixer::commit`](crate::mixer::Mixer::commit) drains every channel into
//! a [`CommitChanges`](crate::mixer::CommitChanges) and latches the shadow
//! registers if anything was pending.

use understory_dirty::Channel;

/// Input size, position, blender geometry or scaler changed.
pub const COORD: Channel = Channel::new(0);

/// Fetch format or alpha mode changed.
pub const FORMAT: Channel = Channel::new(1);

/// Buffer address or pitch changed.
pub const BUFFER: Channel = Channel::new(2);

/// Layer enable bit flipped.
pub const ENABLE: Channel = Channel::new(3);
