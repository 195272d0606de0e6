// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mixer register map and register access.
//!
//! Offsets are relative to the start of the mixer's register window. The
//! window holds, in order:
//!
//! ```text
//!   0x00000  global block    (control, status, double buffer, output size)
//!   0x01000  blender         (per-pipe input size/position, routing, output size)
//!   0x02000  channel 0       (one 0x1000 block per layer: VI first, then UI)
//!   ...
//!   0x20000  scalers         (0x20000 per VI scaler, then 0x10000 per UI scaler)
//! ```
//!
//! Each layer owns one channel and uses the first overlay slot of it.

use bitflags::bitflags;

/// 32-bit register access to one mixer's register window.
///
/// Writes may land in shadow registers; they take effect once the mixer
/// latches them (see [`GLOBAL_DBUFF`]).
pub trait RegisterIo {
    /// Reads the register at `offset`.
    fn read(&self, offset: u32) -> u32;

    /// Writes `value` to the register at `offset`.
    fn write(&mut self, offset: u32, value: u32);

    /// Replaces the bits selected by `mask` with the same bits of `value`.
    fn update_bits(&mut self, offset: u32, mask: u32, value: u32) {
        let old = self.read(offset);
        self.write(offset, (old & !mask) | (value & mask));
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for &mut T {
    fn read(&self, offset: u32) -> u32 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: u32, value: u32) {
        (**self).write(offset, value);
    }

    fn update_bits(&mut self, offset: u32, mask: u32, value: u32) {
        (**self).update_bits(offset, mask, value);
    }
}

// ---------------------------------------------------------------------------
// Packing helpers
// ---------------------------------------------------------------------------

/// Packs a `width × height` size: both stored minus one, height on top.
///
/// Zero extents pack as one pixel.
#[inline]
#[must_use]
pub const fn size(width: u32, height: u32) -> u32 {
    ((height.saturating_sub(1) & 0xffff) << 16) | (width.saturating_sub(1) & 0xffff)
}

/// Packs an `(x, y)` position, `y` on top. Each half is 16 bits.
#[inline]
#[must_use]
pub const fn coord(x: i32, y: i32) -> u32 {
    ((y.cast_unsigned() & 0xffff) << 16) | (x.cast_unsigned() & 0xffff)
}

// ---------------------------------------------------------------------------
// Global block
// ---------------------------------------------------------------------------

/// Global control.
pub const GLOBAL_CTL: u32 = 0x0;
/// Double-buffer control: write [`DBUFF_ENABLE`] to latch shadow registers.
pub const GLOBAL_DBUFF: u32 = 0x8;
/// Mixer output size, packed with [`size`].
pub const GLOBAL_SIZE: u32 = 0xc;

/// Mixer runs.
pub const GLOBAL_CTL_RT_EN: u32 = 1 << 0;
/// Latch shadow registers at the next vertical blank.
pub const DBUFF_ENABLE: u32 = 1 << 0;

/// Opaque black, as used for background and fill colors.
pub const COLOR_BLACK: u32 = 0xff00_0000;

// ---------------------------------------------------------------------------
// Blender
// ---------------------------------------------------------------------------

const BLD_BASE: u32 = 0x1000;

/// Pipe enable and fill-color control.
pub const BLD_PIPE_CTL: u32 = BLD_BASE;
/// Channel-to-pipe routing, four bits per pipe.
pub const BLD_ROUTE: u32 = BLD_BASE + 0x80;
/// Premultiplied-alpha control.
pub const BLD_PREMULTIPLY: u32 = BLD_BASE + 0x84;
/// Background color.
pub const BLD_BKCOLOR: u32 = BLD_BASE + 0x88;
/// Blender output size, packed with [`size`].
pub const BLD_OUTSIZE: u32 = BLD_BASE + 0x8c;

/// Fill color of blender input `pipe`.
#[inline]
#[must_use]
pub const fn bld_fcolor(pipe: u32) -> u32 {
    BLD_BASE + 0x4 + 0x10 * pipe
}

/// Input size of blender input `pipe`.
#[inline]
#[must_use]
pub const fn bld_insize(pipe: u32) -> u32 {
    BLD_BASE + 0x8 + 0x10 * pipe
}

/// Position of blender input `pipe` on the output.
#[inline]
#[must_use]
pub const fn bld_coord(pipe: u32) -> u32 {
    BLD_BASE + 0xc + 0x10 * pipe
}

/// Blend mode between pipe `x` and the pipes below it.
#[inline]
#[must_use]
pub const fn bld_mode(x: u32) -> u32 {
    BLD_BASE + 0x90 + 0x4 * x
}

/// Default [`bld_mode`]: source-over with premultiplied coverage.
pub const BLD_MODE_DEFAULT: u32 = 0x0301_0301;

/// All [`BLD_PIPE_CTL`] pipe-enable bits.
pub const BLD_PIPE_EN_MASK: u32 = 0x1f << 8;

/// [`BLD_PIPE_CTL`] bit enabling `pipe`.
#[inline]
#[must_use]
pub const fn bld_pipe_en(pipe: u32) -> u32 {
    1 << (8 + pipe)
}

/// [`BLD_PIPE_CTL`] bit enabling the fill color of `pipe`.
#[inline]
#[must_use]
pub const fn bld_pipe_fc_en(pipe: u32) -> u32 {
    1 << pipe
}

/// [`BLD_ROUTE`] field for `pipe`.
#[inline]
#[must_use]
pub const fn bld_route_mask(pipe: u32) -> u32 {
    0xf << (pipe * 4)
}

/// [`BLD_ROUTE`] value routing channel `ch` into `pipe`.
#[inline]
#[must_use]
pub const fn bld_route(pipe: u32, ch: u32) -> u32 {
    (ch & 0xf) << (pipe * 4)
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

const CH_BASE: u32 = 0x2000;
const CH_SIZE: u32 = 0x1000;

#[inline]
const fn ch_base(ch: u32) -> u32 {
    CH_BASE + CH_SIZE * ch
}

/// UI layer attribute word.
#[inline]
#[must_use]
pub const fn ui_attr(ch: u32) -> u32 {
    ch_base(ch)
}

/// UI layer input size.
#[inline]
#[must_use]
pub const fn ui_size(ch: u32) -> u32 {
    ch_base(ch) + 0x4
}

/// UI layer pitch in bytes.
#[inline]
#[must_use]
pub const fn ui_pitch(ch: u32) -> u32 {
    ch_base(ch) + 0xc
}

/// UI layer low 32 address bits.
#[inline]
#[must_use]
pub const fn ui_top_laddr(ch: u32) -> u32 {
    ch_base(ch) + 0x10
}

/// UI channel high address byte, one byte per overlay slot.
#[inline]
#[must_use]
pub const fn ui_top_haddr(ch: u32) -> u32 {
    ch_base(ch) + 0x80
}

/// UI channel overlay size.
#[inline]
#[must_use]
pub const fn ui_ovl_size(ch: u32) -> u32 {
    ch_base(ch) + 0x88
}

/// VI layer attribute word.
#[inline]
#[must_use]
pub const fn vi_attr(ch: u32) -> u32 {
    ch_base(ch)
}

/// VI layer input size.
#[inline]
#[must_use]
pub const fn vi_size(ch: u32) -> u32 {
    ch_base(ch) + 0x4
}

/// VI pitch of memory plane `plane`.
#[inline]
#[must_use]
pub const fn vi_pitch(ch: u32, plane: u32) -> u32 {
    ch_base(ch) + 0xc + 0x4 * plane
}

/// VI low 32 address bits of memory plane `plane`.
#[inline]
#[must_use]
pub const fn vi_top_laddr(ch: u32, plane: u32) -> u32 {
    ch_base(ch) + 0x18 + 0x4 * plane
}

/// VI high address bytes of memory plane `plane`, one byte per overlay slot.
#[inline]
#[must_use]
pub const fn vi_top_haddr(ch: u32, plane: u32) -> u32 {
    ch_base(ch) + 0xd0 + 0x4 * plane
}

/// VI overlay size for the luma (`0`) or chroma (`1`) path.
#[inline]
#[must_use]
pub const fn vi_ovl_size(ch: u32, path: u32) -> u32 {
    ch_base(ch) + 0xe8 + 0x4 * path
}

bitflags! {
    /// UI layer attribute word.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct UiLayerAttr: u32 {
        /// Layer enabled.
        const EN = 1 << 0;
        /// Alpha mode field (see [`UiLayerAttr::alpha_mode`]).
        const ALPHA_MODE = 0b11 << 1;
        /// Fetch format field.
        const FBFMT = 0x1f << 8;
        /// Global alpha field.
        const ALPHA = 0xff << 24;
    }
}

/// How a UI layer's alpha is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// Per-pixel alpha from the buffer.
    Pixel,
    /// Constant global alpha.
    Layer,
}

impl UiLayerAttr {
    /// Alpha mode field value.
    #[must_use]
    pub const fn alpha_mode(mode: AlphaMode) -> Self {
        Self::from_bits_retain(
            match mode {
                AlphaMode::Pixel => 0,
                AlphaMode::Layer => 1,
            } << 1,
        )
    }

    /// Fetch format field value.
    #[must_use]
    pub const fn fbfmt(code: u8) -> Self {
        Self::from_bits_retain(((code as u32) << 8) & Self::FBFMT.bits())
    }

    /// Global alpha field value.
    #[must_use]
    pub const fn alpha(value: u8) -> Self {
        Self::from_bits_retain((value as u32) << 24)
    }
}

bitflags! {
    /// VI layer attribute word.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ViLayerAttr: u32 {
        /// Layer enabled.
        const EN = 1 << 0;
        /// Fetch format field.
        const FBFMT = 0x1f << 8;
        /// Fetch unit reads RGB instead of YUV.
        const RGB_MODE = 1 << 15;
    }
}

impl ViLayerAttr {
    /// Fetch format field value.
    #[must_use]
    pub const fn fbfmt(code: u8) -> Self {
        Self::from_bits_retain(((code as u32) << 8) & Self::FBFMT.bits())
    }
}

// ---------------------------------------------------------------------------
// Scalers
// ---------------------------------------------------------------------------

const SCALER_BASE: u32 = 0x20000;

/// Base of the scaler for channel `ch`.
///
/// VI channels have the larger video scaler (VSU, 0x20000 apart); UI
/// channels follow with the smaller UI scaler (GSU, 0x10000 apart).
#[inline]
#[must_use]
pub const fn scaler_base(ch: u32, vi_count: u32) -> u32 {
    if ch < vi_count {
        SCALER_BASE + 0x20000 * ch
    } else {
        SCALER_BASE + 0x20000 * vi_count + 0x10000 * (ch - vi_count)
    }
}

/// Scaler control (both kinds).
pub const SCALER_CTRL: u32 = 0x0;
/// Scaler output size (both kinds).
pub const SCALER_OUTSIZE: u32 = 0x40;
/// Input size (GSU) / luma input size (VSU).
pub const SCALER_INSIZE: u32 = 0x80;
/// Horizontal step (GSU) / luma horizontal step (VSU).
pub const SCALER_HSTEP: u32 = 0x88;
/// Vertical step (GSU) / luma vertical step (VSU).
pub const SCALER_VSTEP: u32 = 0x8c;
/// VSU chroma input size.
pub const VSU_CINSIZE: u32 = 0xc0;
/// VSU chroma horizontal step.
pub const VSU_CHSTEP: u32 = 0xc8;
/// VSU chroma vertical step.
pub const VSU_CVSTEP: u32 = 0xcc;

/// Scaler enabled.
pub const SCALER_CTRL_EN: u32 = 1 << 0;
/// Pick up new coefficients at the next latch.
pub const SCALER_CTRL_COEF_SWITCH: u32 = 1 << 4;

/// Converts a 16.16 scale factor to the scaler's 20-bit fractional step.
#[inline]
#[must_use]
pub const fn scaler_step(scale_fixed: u32) -> u32 {
    scale_fixed << 4
}
