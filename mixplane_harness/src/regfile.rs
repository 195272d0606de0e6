// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simulated register window.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use mixplane_core::regs::RegisterIo;

/// In-memory register file that logs every write.
///
/// Unwritten registers read as zero, like the mixer after reset.
#[derive(Clone, Debug, Default)]
pub struct RegisterFile {
    values: BTreeMap<u32, u32>,
    log: Vec<(u32, u32)>,
}

impl RegisterFile {
    /// Creates an all-zero register file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the register at `offset`.
    #[must_use]
    pub fn value(&self, offset: u32) -> u32 {
        self.values.get(&offset).copied().unwrap_or(0)
    }

    /// Every `(offset, value)` written since the last [`clear_log`](Self::clear_log).
    #[must_use]
    pub fn writes(&self) -> &[(u32, u32)] {
        &self.log
    }

    /// Whether `offset` was written since the last [`clear_log`](Self::clear_log).
    #[must_use]
    pub fn was_written(&self, offset: u32) -> bool {
        self.log.iter().any(|&(o, _)| o == offset)
    }

    /// Forgets the write log; register values are kept.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl RegisterIo for RegisterFile {
    fn read(&self, offset: u32) -> u32 {
        self.value(offset)
    }

    fn write(&mut self, offset: u32, value: u32) {
        self.log.push((offset, value));
        self.values.insert(offset, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_reads_zero() {
        let regs = RegisterFile::new();
        assert_eq!(regs.read(0x1000), 0);
        assert!(regs.writes().is_empty());
    }

    #[test]
    fn update_bits_is_logged_as_one_write() {
        let mut regs = RegisterFile::new();
        regs.write(0x10, 0xff00);
        regs.update_bits(0x10, 0x0f00, 0x0100);
        assert_eq!(regs.value(0x10), 0xf100);
        assert_eq!(regs.writes(), [(0x10, 0xff00), (0x10, 0xf100)]);
    }

    #[test]
    fn clear_log_keeps_values() {
        let mut regs = RegisterFile::new();
        regs.write(0x8, 1);
        regs.clear_log();
        assert!(!regs.was_written(0x8));
        assert_eq!(regs.value(0x8), 1);
    }
}
