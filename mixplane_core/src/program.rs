// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Register programming for one layer.
//!
//! Each function writes one group of registers. The controller calls them in
//! the fixed order coordinates, format, buffer, and only then flips the
//! enable bit. States reaching here have passed the admission check.

use crate::format::PixelFormat;
use crate::geometry::fixed_to_int;
use crate::layer::{FramebufferRef, Layer, LayerKind, LayerRole, PlaneState};
use crate::regs::{self, AlphaMode, RegisterIo, UiLayerAttr, ViLayerAttr};
use crate::scale::ScaleFactor;

/// Where a layer lives in the register map.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Slot {
    /// Layer index: channel number and blender pipe.
    pub(crate) index: u32,
    pub(crate) kind: LayerKind,
    pub(crate) role: LayerRole,
    pub(crate) supports_scaling: bool,
    /// Number of VI layers in the mixer, needed to locate UI scalers.
    pub(crate) vi_count: u32,
}

impl Slot {
    pub(crate) fn new(layer: &Layer, vi_count: u32) -> Self {
        Self {
            index: layer.index(),
            kind: layer.kind(),
            role: layer.role(),
            supports_scaling: layer.capabilities().supports_scaling,
            vi_count,
        }
    }

    fn scaler(&self) -> u32 {
        regs::scaler_base(self.index, self.vi_count)
    }

    /// Layers past the blender's pipe count have no pipe bits.
    fn has_pipe(&self) -> bool {
        self.index < crate::config::MAX_LAYERS
    }
}

fn extent(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}

/// Splits a bus address into its low word and high byte.
fn split_addr(addr: u64) -> (u32, u32) {
    let low = u32::try_from(addr & 0xffff_ffff).unwrap_or(0);
    let high = u32::try_from((addr >> 32) & 0xff).unwrap_or(0);
    (low, high)
}

/// Puts the blender in its reset configuration: black background, black
/// fill under pipe 0, default blend mode on every pipe, all pipes off.
pub(crate) fn init_blender(regs: &mut dyn RegisterIo, layer_count: u32) {
    regs.write(regs::GLOBAL_CTL, regs::GLOBAL_CTL_RT_EN);
    regs.write(regs::BLD_BKCOLOR, regs::COLOR_BLACK);
    regs.write(regs::BLD_PREMULTIPLY, 0);
    regs.write(regs::bld_fcolor(0), regs::COLOR_BLACK);
    regs.write(regs::BLD_PIPE_CTL, regs::bld_pipe_fc_en(0));
    for pipe in 0..layer_count.min(crate::config::MAX_LAYERS) {
        regs.write(regs::bld_mode(pipe), regs::BLD_MODE_DEFAULT);
    }
    regs.update_bits(regs::BLD_PIPE_CTL, regs::BLD_PIPE_EN_MASK, 0);
}

/// Programs input size, overlay size, blender position and size, and the
/// scaler. For the primary layer the mixer output size follows the
/// destination size.
///
/// Returns whether the scaler was switched on.
pub(crate) fn program_coordinates(
    regs: &mut dyn RegisterIo,
    slot: &Slot,
    state: &PlaneState,
) -> bool {
    let src_w = extent(fixed_to_int(state.src.width()));
    let src_h = extent(fixed_to_int(state.src.height()));
    let dst_w = extent(state.dst.width());
    let dst_h = extent(state.dst.height());
    let insize = regs::size(src_w, src_h);
    let outsize = regs::size(dst_w, dst_h);

    if slot.role == LayerRole::Primary {
        regs.write(regs::GLOBAL_SIZE, outsize);
        regs.write(regs::BLD_OUTSIZE, outsize);
    }

    match slot.kind {
        LayerKind::Video => {
            regs.write(regs::vi_size(slot.index), insize);
            regs.write(regs::vi_ovl_size(slot.index, 0), insize);
            regs.write(regs::vi_ovl_size(slot.index, 1), insize);
        }
        LayerKind::UserInterface => {
            regs.write(regs::ui_size(slot.index), insize);
            regs.write(regs::ui_ovl_size(slot.index), insize);
        }
    }

    let mut scaled = false;
    if slot.supports_scaling {
        if insize == outsize {
            regs.write(slot.scaler() + regs::SCALER_CTRL, 0);
        } else {
            let hscale = ScaleFactor::between(extent(state.src.width()), dst_w)
                .unwrap_or(ScaleFactor::IDENTITY);
            let vscale = ScaleFactor::between(extent(state.src.height()), dst_h)
                .unwrap_or(ScaleFactor::IDENTITY);
            let format = state.buffer.map(|fb| fb.format);
            enable_scaler(regs, slot, (src_w, src_h), outsize, hscale, vscale, format);
            scaled = true;
        }
    }

    regs.write(regs::bld_coord(slot.index), regs::coord(state.dst.x1, state.dst.y1));
    regs.write(regs::bld_insize(slot.index), outsize);
    scaled
}

fn enable_scaler(
    regs: &mut dyn RegisterIo,
    slot: &Slot,
    (src_w, src_h): (u32, u32),
    outsize: u32,
    hscale: ScaleFactor,
    vscale: ScaleFactor,
    format: Option<PixelFormat>,
) {
    let base = slot.scaler();
    regs.write(base + regs::SCALER_OUTSIZE, outsize);
    regs.write(base + regs::SCALER_INSIZE, regs::size(src_w, src_h));
    regs.write(base + regs::SCALER_HSTEP, regs::scaler_step(hscale.numerator()));
    regs.write(base + regs::SCALER_VSTEP, regs::scaler_step(vscale.numerator()));
    if slot.kind == LayerKind::Video {
        let info = format.map(PixelFormat::info);
        let hsub = info.map_or(1, |i| u32::from(i.hsub));
        let vsub = info.map_or(1, |i| u32::from(i.vsub));
        regs.write(
            base + regs::VSU_CINSIZE,
            regs::size(src_w / hsub, src_h / vsub),
        );
        regs.write(
            base + regs::VSU_CHSTEP,
            regs::scaler_step(hscale.numerator() / hsub),
        );
        regs.write(
            base + regs::VSU_CVSTEP,
            regs::scaler_step(vscale.numerator() / vsub),
        );
    }
    regs.write(
        base + regs::SCALER_CTRL,
        regs::SCALER_CTRL_EN | regs::SCALER_CTRL_COEF_SWITCH,
    );
}

/// Programs the fetch format, and for UI layers the alpha mode.
///
/// UI layers blend with per-pixel alpha when the format has it, otherwise
/// with an opaque layer alpha. VI layers never blend.
pub(crate) fn program_format(regs: &mut dyn RegisterIo, slot: &Slot, format: PixelFormat) {
    let Some(hw) = format.hw_format() else {
        return;
    };
    match slot.kind {
        LayerKind::Video => {
            let mut attr = ViLayerAttr::fbfmt(hw.code);
            attr.set(ViLayerAttr::RGB_MODE, hw.rgb);
            regs.update_bits(
                regs::vi_attr(slot.index),
                (ViLayerAttr::FBFMT | ViLayerAttr::RGB_MODE).bits(),
                attr.bits(),
            );
        }
        LayerKind::UserInterface => {
            let mode = if format.has_alpha() {
                AlphaMode::Pixel
            } else {
                AlphaMode::Layer
            };
            let attr = UiLayerAttr::fbfmt(hw.code)
                | UiLayerAttr::alpha_mode(mode)
                | UiLayerAttr::alpha(0xff);
            regs.update_bits(
                regs::ui_attr(slot.index),
                (UiLayerAttr::FBFMT | UiLayerAttr::ALPHA_MODE | UiLayerAttr::ALPHA).bits(),
                attr.bits(),
            );
        }
    }
}

/// Programs pitch and start address of every memory plane, offset to the
/// cropped source origin.
pub(crate) fn program_buffer(regs: &mut dyn RegisterIo, slot: &Slot, state: &PlaneState) {
    let Some(fb) = state.buffer.as_ref() else {
        return;
    };
    let (x, y) = (state.src.x1, state.src.y1);
    match slot.kind {
        LayerKind::Video => program_vi_buffer(regs, slot, fb, x, y),
        LayerKind::UserInterface => {
            let (low, high) = split_addr(fb.plane_address(0, x, y));
            regs.write(regs::ui_pitch(slot.index), fb.planes[0].pitch);
            regs.write(regs::ui_top_laddr(slot.index), low);
            regs.update_bits(regs::ui_top_haddr(slot.index), 0xff, high);
        }
    }
}

fn program_vi_buffer(regs: &mut dyn RegisterIo, slot: &Slot, fb: &FramebufferRef, x: i32, y: i32) {
    let info = fb.format.info();
    let swap_uv = fb.format.hw_format().is_some_and(|hw| hw.swap_uv);
    for i in 0..usize::from(info.planes.min(3)) {
        // YVU buffers store Cr before Cb; the fetch unit wants Cb first.
        let source = if swap_uv && info.planes == 3 && i > 0 {
            3 - i
        } else {
            i
        };
        let plane = u32::try_from(i).unwrap_or(0);
        let (low, high) = split_addr(fb.plane_address(source, x, y));
        regs.write(regs::vi_pitch(slot.index, plane), fb.planes[source].pitch);
        regs.write(regs::vi_top_laddr(slot.index, plane), low);
        regs.update_bits(regs::vi_top_haddr(slot.index, plane), 0xff, high);
    }
}

/// Sets or clears the layer enable bit, the blender pipe enable, and the
/// channel routing of the layer's pipe.
pub(crate) fn set_enabled(regs: &mut dyn RegisterIo, slot: &Slot, enable: bool) {
    let (attr, en) = match slot.kind {
        LayerKind::Video => (regs::vi_attr(slot.index), ViLayerAttr::EN.bits()),
        LayerKind::UserInterface => (regs::ui_attr(slot.index), UiLayerAttr::EN.bits()),
    };
    regs.update_bits(attr, en, if enable { en } else { 0 });

    if slot.has_pipe() {
        let pipe = slot.index;
        let bit = regs::bld_pipe_en(pipe);
        regs.update_bits(regs::BLD_PIPE_CTL, bit, if enable { bit } else { 0 });
        if enable {
            regs.update_bits(
                regs::BLD_ROUTE,
                regs::bld_route_mask(pipe),
                regs::bld_route(pipe, slot.index),
            );
        }
    }
}
