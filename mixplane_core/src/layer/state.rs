// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proposed and committed per-layer configuration.

use super::id::FramebufferId;
use crate::format::PixelFormat;
use crate::geometry::{Rect, fixed_to_int};
use crate::output::OutputId;

/// One memory plane of a framebuffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BufferPlane {
    /// Bus address of the backing memory object.
    pub addr: u64,
    /// Bytes per row.
    pub pitch: u32,
    /// Byte offset of the plane inside the memory object.
    pub offset: u32,
}

/// A framebuffer the host has already imported and pinned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FramebufferRef {
    /// Host identifier.
    pub id: FramebufferId,
    /// Pixel format.
    pub format: PixelFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Memory planes. Only the first `format.info().planes` entries are used.
    pub planes: [BufferPlane; 3],
}

impl FramebufferRef {
    /// Creates a single-plane framebuffer at `addr` with the given pitch.
    #[must_use]
    pub fn packed(
        id: FramebufferId,
        format: PixelFormat,
        width: u32,
        height: u32,
        addr: u64,
        pitch: u32,
    ) -> Self {
        Self {
            id,
            format,
            width,
            height,
            planes: [
                BufferPlane {
                    addr,
                    pitch,
                    offset: 0,
                },
                BufferPlane::default(),
                BufferPlane::default(),
            ],
        }
    }

    /// Returns a copy with memory plane `i` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `i >= 3`.
    #[must_use]
    pub fn with_plane(mut self, i: usize, plane: BufferPlane) -> Self {
        assert!(i < self.planes.len(), "framebuffer has at most 3 planes");
        self.planes[i] = plane;
        self
    }

    /// Full buffer extent in 16.16 fixed point, for bounding source crops.
    #[must_use]
    pub fn extent_fixed(&self) -> Rect {
        Rect::fixed_from_xywh(
            0,
            0,
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }

    /// Bus address of the first pixel a crop starting at 16.16 `(x, y)`
    /// fetches from memory plane `i`.
    ///
    /// Chroma planes are subsampled by the format's `hsub`/`vsub`. Negative
    /// origins are treated as zero. The sum wraps like the bus does.
    #[must_use]
    pub fn plane_address(&self, i: usize, x: i32, y: i32) -> u64 {
        let info = self.format.info();
        let Some(plane) = self.planes.get(i) else {
            return 0;
        };
        let mut px = u64::try_from(fixed_to_int(x)).unwrap_or(0);
        let mut py = u64::try_from(fixed_to_int(y)).unwrap_or(0);
        if i > 0 {
            px /= u64::from(info.hsub);
            py /= u64::from(info.vsub);
        }
        let cpp = u64::from(info.cpp.get(i).copied().unwrap_or(0));
        plane
            .addr
            .wrapping_add(u64::from(plane.offset))
            .wrapping_add(u64::from(plane.pitch) * py)
            .wrapping_add(cpp * px)
    }
}

/// A per-layer configuration, either proposed by the host or committed.
///
/// `src` is a 16.16 fixed-point crop of the framebuffer; `dst` is the
/// on-screen rectangle in output pixels. After a successful admission check,
/// both are clipped to the output and `visible` reflects whether anything is
/// left to show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlaneState {
    /// Output the plane is routed to, if any.
    pub target: Option<OutputId>,
    /// Source crop in 16.16 fixed point.
    pub src: Rect,
    /// Destination rectangle in output pixels.
    pub dst: Rect,
    /// Whether the plane should be shown. On input this is a request; the
    /// admission check clears it when nothing is left after clipping.
    pub visible: bool,
    /// Framebuffer to scan out.
    pub buffer: Option<FramebufferRef>,
}

impl PlaneState {
    /// A state that shows nothing and targets no output.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            target: None,
            src: Rect::new(0, 0, 0, 0),
            dst: Rect::new(0, 0, 0, 0),
            visible: false,
            buffer: None,
        }
    }

    /// A visible state showing `src` of `buffer` at `dst` on `target`.
    #[must_use]
    pub const fn new(target: OutputId, buffer: FramebufferRef, src: Rect, dst: Rect) -> Self {
        Self {
            target: Some(target),
            src,
            dst,
            visible: true,
            buffer: Some(buffer),
        }
    }

    /// Shows the whole of `buffer` at `dst` on `target`.
    #[must_use]
    pub fn full_buffer(target: OutputId, buffer: FramebufferRef, dst: Rect) -> Self {
        Self::new(target, buffer, buffer.extent_fixed(), dst)
    }

    /// Returns a copy with `visible` set.
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Source crop in whole pixels: `(x, y, width, height)`.
    #[must_use]
    pub const fn src_pixels(&self) -> (i32, i32, i32, i32) {
        (
            fixed_to_int(self.src.x1),
            fixed_to_int(self.src.y1),
            fixed_to_int(self.src.width()),
            fixed_to_int(self.src.height()),
        )
    }
}
