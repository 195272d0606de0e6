// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel formats, their memory layout, and the per-kind capability tables.
//!
//! Formats are identified by their DRM fourcc code. Each format knows its
//! plane layout ([`FormatInfo`]) and, when the mixer can fetch it, the
//! hardware fetch code ([`HwFormat`]).
//!
//! Two static tables describe what each layer kind accepts:
//!
//! - [`UI_FORMATS`]: every RGB format the UI fetch unit reads, including
//!   the alpha variants.
//! - [`VI_FORMATS`]: the same RGB formats minus the alpha variants whose
//!   opaque analog is already listed (VI layers never blend with per-pixel
//!   alpha), plus packed, semi-planar and planar YUV.

use core::fmt;

const fn fourcc_code(a: u8, b: u8, c: u8, d: u8) -> u32 {
    (a as u32) | ((b as u32) << 8) | ((c as u32) << 16) | ((d as u32) << 24)
}

macro_rules! pixel_formats {
    ($($(#[$doc:meta])* $name:ident = $a:literal $b:literal $c:literal $d:literal,)*) => {
        /// A pixel format known to the mixer, identified by DRM fourcc.
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PixelFormat {
            $($(#[$doc])* $name,)*
        }

        impl PixelFormat {
            /// Every format this crate knows about.
            pub const ALL: &'static [Self] = &[$(Self::$name,)*];

            /// Returns the DRM fourcc code.
            #[must_use]
            pub const fn fourcc(self) -> u32 {
                match self {
                    $(Self::$name => fourcc_code($a, $b, $c, $d),)*
                }
            }

            /// Looks up a format by DRM fourcc code.
            #[must_use]
            pub fn from_fourcc(code: u32) -> Option<Self> {
                Self::ALL.iter().copied().find(|f| f.fourcc() == code)
            }
        }
    };
}

pixel_formats! {
    /// 32-bit ARGB.
    Argb8888 = b'A' b'R' b'2' b'4',
    /// 32-bit ABGR.
    Abgr8888 = b'A' b'B' b'2' b'4',
    /// 32-bit RGBA.
    Rgba8888 = b'R' b'A' b'2' b'4',
    /// 32-bit BGRA.
    Bgra8888 = b'B' b'A' b'2' b'4',
    /// 32-bit RGB with unused top byte.
    Xrgb8888 = b'X' b'R' b'2' b'4',
    /// 32-bit BGR with unused top byte.
    Xbgr8888 = b'X' b'B' b'2' b'4',
    /// 32-bit RGB with unused bottom byte.
    Rgbx8888 = b'R' b'X' b'2' b'4',
    /// 32-bit BGR with unused bottom byte.
    Bgrx8888 = b'B' b'X' b'2' b'4',
    /// 24-bit packed RGB.
    Rgb888 = b'R' b'G' b'2' b'4',
    /// 24-bit packed BGR.
    Bgr888 = b'B' b'G' b'2' b'4',
    /// 16-bit RGB 5:6:5.
    Rgb565 = b'R' b'G' b'1' b'6',
    /// 16-bit BGR 5:6:5.
    Bgr565 = b'B' b'G' b'1' b'6',
    /// 16-bit ARGB 4:4:4:4.
    Argb4444 = b'A' b'R' b'1' b'2',
    /// 16-bit ABGR 4:4:4:4.
    Abgr4444 = b'A' b'B' b'1' b'2',
    /// 16-bit RGBA 4:4:4:4.
    Rgba4444 = b'R' b'A' b'1' b'2',
    /// 16-bit BGRA 4:4:4:4.
    Bgra4444 = b'B' b'A' b'1' b'2',
    /// 16-bit XRGB 4:4:4:4.
    Xrgb4444 = b'X' b'R' b'1' b'2',
    /// 16-bit XBGR 4:4:4:4.
    Xbgr4444 = b'X' b'B' b'1' b'2',
    /// 16-bit RGBX 4:4:4:4.
    Rgbx4444 = b'R' b'X' b'1' b'2',
    /// 16-bit BGRX 4:4:4:4.
    Bgrx4444 = b'B' b'X' b'1' b'2',
    /// 16-bit ARGB 1:5:5:5.
    Argb1555 = b'A' b'R' b'1' b'5',
    /// 16-bit ABGR 1:5:5:5.
    Abgr1555 = b'A' b'B' b'1' b'5',
    /// 16-bit RGBA 5:5:5:1.
    Rgba5551 = b'R' b'A' b'1' b'5',
    /// 16-bit BGRA 5:5:5:1.
    Bgra5551 = b'B' b'A' b'1' b'5',
    /// 16-bit XRGB 1:5:5:5.
    Xrgb1555 = b'X' b'R' b'1' b'5',
    /// 16-bit XBGR 1:5:5:5.
    Xbgr1555 = b'X' b'B' b'1' b'5',
    /// 16-bit RGBX 5:5:5:1.
    Rgbx5551 = b'R' b'X' b'1' b'5',
    /// 16-bit BGRX 5:5:5:1.
    Bgrx5551 = b'B' b'X' b'1' b'5',
    /// Semi-planar YUV 4:2:2, Cb/Cr.
    Nv16 = b'N' b'V' b'1' b'6',
    /// Semi-planar YUV 4:2:0, Cb/Cr.
    Nv12 = b'N' b'V' b'1' b'2',
    /// Semi-planar YUV 4:2:0, Cr/Cb.
    Nv21 = b'N' b'V' b'2' b'1',
    /// Semi-planar YUV 4:2:2, Cr/Cb.
    Nv61 = b'N' b'V' b'6' b'1',
    /// Packed YUV 4:2:2, `Cb Y0 Cr Y1`.
    Uyvy = b'U' b'Y' b'V' b'Y',
    /// Packed YUV 4:2:2, `Cr Y0 Cb Y1`.
    Vyuy = b'V' b'Y' b'U' b'Y',
    /// Packed YUV 4:2:2, `Y0 Cb Y1 Cr`.
    Yuyv = b'Y' b'U' b'Y' b'V',
    /// Packed YUV 4:2:2, `Y0 Cr Y1 Cb`.
    Yvyu = b'Y' b'V' b'Y' b'U',
    /// Planar YUV 4:1:1.
    Yuv411 = b'Y' b'U' b'1' b'1',
    /// Planar YUV 4:2:0.
    Yuv420 = b'Y' b'U' b'1' b'2',
    /// Planar YUV 4:2:2.
    Yuv422 = b'Y' b'U' b'1' b'6',
    /// Planar YUV 4:4:4.
    Yuv444 = b'Y' b'U' b'2' b'4',
    /// Planar YVU 4:1:1.
    Yvu411 = b'Y' b'V' b'1' b'1',
    /// Planar YVU 4:2:0.
    Yvu420 = b'Y' b'V' b'1' b'2',
    /// Planar YVU 4:2:2.
    Yvu422 = b'Y' b'V' b'1' b'6',
    /// Planar YVU 4:4:4.
    Yvu444 = b'Y' b'V' b'2' b'4',
}

impl fmt::Debug for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.fourcc().to_le_bytes();
        write!(
            f,
            "PixelFormat({}{}{}{})",
            char::from(a),
            char::from(b),
            char::from(c),
            char::from(d)
        )
    }
}

/// Memory layout of a pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatInfo {
    /// Number of memory planes (1–3).
    pub planes: u8,
    /// Bytes per pixel for each plane. Unused planes are 0.
    pub cpp: [u8; 3],
    /// Horizontal chroma subsampling factor.
    pub hsub: u8,
    /// Vertical chroma subsampling factor.
    pub vsub: u8,
    /// Whether the format carries a per-pixel alpha channel.
    pub has_alpha: bool,
    /// Whether the format is YUV.
    pub is_yuv: bool,
}

impl FormatInfo {
    const fn rgb(cpp: u8, has_alpha: bool) -> Self {
        Self {
            planes: 1,
            cpp: [cpp, 0, 0],
            hsub: 1,
            vsub: 1,
            has_alpha,
            is_yuv: false,
        }
    }

    const fn yuv(planes: u8, cpp: [u8; 3], hsub: u8, vsub: u8) -> Self {
        Self {
            planes,
            cpp,
            hsub,
            vsub,
            has_alpha: false,
            is_yuv: true,
        }
    }
}

/// Mixer fetch-unit configuration for a format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HwFormat {
    /// Value of the 5-bit format field in the layer attribute register.
    pub code: u8,
    /// Whether the fetch unit reads the buffer as RGB.
    pub rgb: bool,
    /// Whether the second and third memory planes are fed in swapped order.
    pub swap_uv: bool,
}

impl HwFormat {
    const fn rgb(code: u8) -> Self {
        Self {
            code,
            rgb: true,
            swap_uv: false,
        }
    }

    const fn yuv(code: u8, swap_uv: bool) -> Self {
        Self {
            code,
            rgb: false,
            swap_uv,
        }
    }
}

impl PixelFormat {
    /// Returns the memory layout of this format.
    #[must_use]
    pub const fn info(self) -> FormatInfo {
        match self {
            Self::Argb8888 | Self::Abgr8888 | Self::Rgba8888 | Self::Bgra8888 => {
                FormatInfo::rgb(4, true)
            }
            Self::Xrgb8888 | Self::Xbgr8888 | Self::Rgbx8888 | Self::Bgrx8888 => {
                FormatInfo::rgb(4, false)
            }
            Self::Rgb888 | Self::Bgr888 => FormatInfo::rgb(3, false),
            Self::Rgb565 | Self::Bgr565 => FormatInfo::rgb(2, false),
            Self::Argb4444
            | Self::Abgr4444
            | Self::Rgba4444
            | Self::Bgra4444
            | Self::Argb1555
            | Self::Abgr1555
            | Self::Rgba5551
            | Self::Bgra5551 => FormatInfo::rgb(2, true),
            Self::Xrgb4444
            | Self::Xbgr4444
            | Self::Rgbx4444
            | Self::Bgrx4444
            | Self::Xrgb1555
            | Self::Xbgr1555
            | Self::Rgbx5551
            | Self::Bgrx5551 => FormatInfo::rgb(2, false),
            Self::Uyvy | Self::Vyuy | Self::Yuyv | Self::Yvyu => {
                FormatInfo::yuv(1, [2, 0, 0], 2, 1)
            }
            Self::Nv12 | Self::Nv21 => FormatInfo::yuv(2, [1, 2, 0], 2, 2),
            Self::Nv16 | Self::Nv61 => FormatInfo::yuv(2, [1, 2, 0], 2, 1),
            Self::Yuv411 | Self::Yvu411 => FormatInfo::yuv(3, [1, 1, 1], 4, 1),
            Self::Yuv420 | Self::Yvu420 => FormatInfo::yuv(3, [1, 1, 1], 2, 2),
            Self::Yuv422 | Self::Yvu422 => FormatInfo::yuv(3, [1, 1, 1], 2, 1),
            Self::Yuv444 | Self::Yvu444 => FormatInfo::yuv(3, [1, 1, 1], 1, 1),
        }
    }

    /// Returns `true` if the format has a per-pixel alpha channel.
    #[inline]
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        self.info().has_alpha
    }

    /// Returns `true` for YUV formats.
    #[inline]
    #[must_use]
    pub const fn is_yuv(self) -> bool {
        self.info().is_yuv
    }

    /// For an alpha format, the format with the same layout whose alpha bits
    /// are ignored. `None` for formats without alpha.
    #[must_use]
    pub const fn opaque_analog(self) -> Option<Self> {
        Some(match self {
            Self::Argb8888 => Self::Xrgb8888,
            Self::Abgr8888 => Self::Xbgr8888,
            Self::Rgba8888 => Self::Rgbx8888,
            Self::Bgra8888 => Self::Bgrx8888,
            Self::Argb4444 => Self::Xrgb4444,
            Self::Abgr4444 => Self::Xbgr4444,
            Self::Rgba4444 => Self::Rgbx4444,
            Self::Bgra4444 => Self::Bgrx4444,
            Self::Argb1555 => Self::Xrgb1555,
            Self::Abgr1555 => Self::Xbgr1555,
            Self::Rgba5551 => Self::Rgbx5551,
            Self::Bgra5551 => Self::Bgrx5551,
            _ => return None,
        })
    }

    /// Returns the fetch-unit configuration, or `None` if the mixer cannot
    /// read this format.
    #[must_use]
    pub const fn hw_format(self) -> Option<HwFormat> {
        Some(match self {
            Self::Argb8888 => HwFormat::rgb(0),
            Self::Abgr8888 => HwFormat::rgb(1),
            Self::Rgba8888 => HwFormat::rgb(2),
            Self::Bgra8888 => HwFormat::rgb(3),
            Self::Xrgb8888 => HwFormat::rgb(4),
            Self::Xbgr8888 => HwFormat::rgb(5),
            Self::Rgbx8888 => HwFormat::rgb(6),
            Self::Bgrx8888 => HwFormat::rgb(7),
            Self::Rgb888 => HwFormat::rgb(8),
            Self::Bgr888 => HwFormat::rgb(9),
            Self::Rgb565 => HwFormat::rgb(10),
            Self::Bgr565 => HwFormat::rgb(11),
            Self::Argb4444 => HwFormat::rgb(12),
            Self::Abgr4444 => HwFormat::rgb(13),
            Self::Rgba4444 => HwFormat::rgb(14),
            Self::Bgra4444 => HwFormat::rgb(15),
            Self::Argb1555 => HwFormat::rgb(16),
            Self::Abgr1555 => HwFormat::rgb(17),
            Self::Rgba5551 => HwFormat::rgb(18),
            Self::Bgra5551 => HwFormat::rgb(19),
            Self::Yuyv => HwFormat::yuv(0, false),
            Self::Uyvy => HwFormat::yuv(1, false),
            Self::Yvyu => HwFormat::yuv(2, false),
            Self::Vyuy => HwFormat::yuv(3, false),
            Self::Nv16 => HwFormat::yuv(4, false),
            Self::Nv61 => HwFormat::yuv(5, false),
            Self::Yuv422 => HwFormat::yuv(6, false),
            Self::Yvu422 => HwFormat::yuv(6, true),
            Self::Nv12 => HwFormat::yuv(8, false),
            Self::Nv21 => HwFormat::yuv(9, false),
            Self::Yuv420 => HwFormat::yuv(10, false),
            Self::Yvu420 => HwFormat::yuv(10, true),
            Self::Yuv411 => HwFormat::yuv(14, false),
            Self::Yvu411 => HwFormat::yuv(14, true),
            // 4:4:4 is fetched through the 24-bit RGB path and converted by CSC.
            Self::Yuv444 => HwFormat::rgb(8),
            Self::Yvu444 => HwFormat {
                code: 8,
                rgb: true,
                swap_uv: true,
            },
            _ => return None,
        })
    }
}

/// Formats accepted by UI layers.
pub const UI_FORMATS: &[PixelFormat] = &[
    PixelFormat::Abgr1555,
    PixelFormat::Abgr4444,
    PixelFormat::Abgr8888,
    PixelFormat::Argb1555,
    PixelFormat::Argb4444,
    PixelFormat::Argb8888,
    PixelFormat::Bgr565,
    PixelFormat::Bgr888,
    PixelFormat::Bgra5551,
    PixelFormat::Bgra4444,
    PixelFormat::Bgra8888,
    PixelFormat::Bgrx8888,
    PixelFormat::Rgb565,
    PixelFormat::Rgb888,
    PixelFormat::Rgba4444,
    PixelFormat::Rgba5551,
    PixelFormat::Rgba8888,
    PixelFormat::Rgbx8888,
    PixelFormat::Xbgr8888,
    PixelFormat::Xrgb8888,
];

/// Formats accepted by VI layers.
///
/// VI layers do not blend with per-pixel alpha, so alpha formats whose
/// opaque analog is listed are left out.
pub const VI_FORMATS: &[PixelFormat] = &[
    PixelFormat::Abgr1555,
    PixelFormat::Abgr4444,
    PixelFormat::Argb1555,
    PixelFormat::Argb4444,
    PixelFormat::Bgr565,
    PixelFormat::Bgr888,
    PixelFormat::Bgra5551,
    PixelFormat::Bgra4444,
    PixelFormat::Bgrx8888,
    PixelFormat::Rgb565,
    PixelFormat::Rgb888,
    PixelFormat::Rgba4444,
    PixelFormat::Rgba5551,
    PixelFormat::Rgbx8888,
    PixelFormat::Xbgr8888,
    PixelFormat::Xrgb8888,
    PixelFormat::Nv16,
    PixelFormat::Nv12,
    PixelFormat::Nv21,
    PixelFormat::Nv61,
    PixelFormat::Uyvy,
    PixelFormat::Vyuy,
    PixelFormat::Yuyv,
    PixelFormat::Yvyu,
    PixelFormat::Yuv411,
    PixelFormat::Yuv420,
    PixelFormat::Yuv422,
    PixelFormat::Yuv444,
    PixelFormat::Yvu411,
    PixelFormat::Yvu420,
    PixelFormat::Yvu422,
    PixelFormat::Yvu444,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_matches_drm_codes() {
        assert_eq!(PixelFormat::Argb8888.fourcc(), 0x3432_5241);
        assert_eq!(PixelFormat::Xrgb8888.fourcc(), 0x3432_5258);
        assert_eq!(PixelFormat::Nv12.fourcc(), 0x3231_564E);
        assert_eq!(PixelFormat::Yuyv.fourcc(), 0x5659_5559);
        assert_eq!(PixelFormat::Rgb565.fourcc(), 0x3631_4752);
    }

    #[test]
    fn fourcc_lookup_round_trips_every_format() {
        for &f in PixelFormat::ALL {
            assert_eq!(PixelFormat::from_fourcc(f.fourcc()), Some(f), "{f:?}");
        }
        assert_eq!(PixelFormat::from_fourcc(0), None);
    }

    #[test]
    fn table_sizes() {
        assert_eq!(UI_FORMATS.len(), 20);
        assert_eq!(VI_FORMATS.len(), 32);
    }

    #[test]
    fn vi_table_has_no_redundant_alpha_formats() {
        for &f in VI_FORMATS {
            if let Some(opaque) = f.opaque_analog() {
                assert!(
                    !VI_FORMATS.contains(&opaque),
                    "{f:?} listed alongside its opaque analog {opaque:?}"
                );
            }
        }
    }

    #[test]
    fn ui_table_lists_alpha_formats_next_to_opaque_analogs() {
        let pairs = UI_FORMATS
            .iter()
            .filter_map(|f| f.opaque_analog())
            .filter(|opaque| UI_FORMATS.contains(opaque))
            .count();
        assert_eq!(pairs, 4, "8888 alpha variants and their X variants");
        assert!(UI_FORMATS.contains(&PixelFormat::Argb8888));
        assert!(UI_FORMATS.contains(&PixelFormat::Xrgb8888));
    }

    #[test]
    fn ui_table_is_rgb_only() {
        assert!(UI_FORMATS.iter().all(|f| !f.is_yuv()));
    }

    #[test]
    fn every_listed_format_is_fetchable() {
        for &f in UI_FORMATS.iter().chain(VI_FORMATS) {
            assert!(f.hw_format().is_some(), "{f:?} has no fetch code");
        }
        assert_eq!(PixelFormat::Xrgb1555.hw_format(), None);
    }

    #[test]
    fn ui_formats_fetch_as_rgb() {
        for &f in UI_FORMATS {
            assert!(f.hw_format().unwrap().rgb, "{f:?}");
        }
    }

    #[test]
    fn yvu_formats_swap_chroma_planes() {
        assert!(PixelFormat::Yvu420.hw_format().unwrap().swap_uv);
        assert!(!PixelFormat::Yuv420.hw_format().unwrap().swap_uv);
        assert_eq!(
            PixelFormat::Yvu420.hw_format().unwrap().code,
            PixelFormat::Yuv420.hw_format().unwrap().code
        );
    }

    #[test]
    fn plane_layouts() {
        let nv12 = PixelFormat::Nv12.info();
        assert_eq!((nv12.planes, nv12.hsub, nv12.vsub), (2, 2, 2));
        assert_eq!(nv12.cpp, [1, 2, 0]);
        let yuv411 = PixelFormat::Yuv411.info();
        assert_eq!((yuv411.planes, yuv411.hsub, yuv411.vsub), (3, 4, 1));
        assert_eq!(PixelFormat::Rgb888.info().cpp[0], 3);
        assert!(PixelFormat::Argb1555.has_alpha());
        assert!(!PixelFormat::Xrgb8888.has_alpha());
    }

    #[test]
    fn debug_prints_fourcc() {
        assert_eq!(
            alloc::format!("{:?}", PixelFormat::Nv12),
            "PixelFormat(NV12)"
        );
    }
}
