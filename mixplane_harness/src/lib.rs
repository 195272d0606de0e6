// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated registers, host and transaction driver for exercising mixers.
//!
//! - [`RegisterFile`]: an in-memory register window with a write log.
//! - [`FakeHost`]: a [`PlaneHost`](mixplane_core::host::PlaneHost) that
//!   records registrations and can be told to fail one.
//! - [`transaction::apply`]: checks every proposed layer state, then
//!   updates and commits, the way the host's atomic commit does.

#![no_std]

extern crate alloc;

mod host;
mod regfile;
pub mod transaction;

pub use host::FakeHost;
pub use regfile::RegisterFile;

#[cfg(test)]
mod scenarios;
