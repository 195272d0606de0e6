// Copyright 2026 the Mixplane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios: registry, transactions and commit against the
//! simulated register file and host.

use alloc::string::ToString;
use alloc::vec::Vec;

use mixplane_core::config::MixerConfig;
use mixplane_core::error::{InitError, Rejection, RegistrationStage};
use mixplane_core::format::PixelFormat;
use mixplane_core::geometry::{Rect, SurfaceGeometry};
use mixplane_core::host::HostError;
use mixplane_core::layer::{
    BufferPlane, FramebufferId, FramebufferRef, LayerKind, LayerRole, MixerId, PlaneHandle,
    PlaneState,
};
use mixplane_core::mixer::{CommitChanges, Mixer};
use mixplane_core::output::OutputId;
use mixplane_core::regs::{self, UiLayerAttr, ViLayerAttr};
use mixplane_core::scale::Axis;
use mixplane_core::trace::{CheckOutcome, NoopSink};
use mixplane_debug::recorder::{RecordedEvent, RecorderSink, decode};

use crate::transaction::{TransactionError, apply, single_output};
use crate::{FakeHost, RegisterFile};

const OUT: OutputId = OutputId(0);
const FHD: SurfaceGeometry = SurfaceGeometry::new(1920, 1080);

fn mixer(config: MixerConfig) -> Mixer<RegisterFile> {
    Mixer::new(
        MixerId(0),
        config,
        RegisterFile::new(),
        &mut FakeHost::new(),
        NoopSink,
    )
    .unwrap()
}

fn xrgb(w: u32, h: u32) -> FramebufferRef {
    FramebufferRef::packed(FramebufferId(1), PixelFormat::Xrgb8888, w, h, 0x4000_0000, w * 4)
}

fn nv12(w: u32, h: u32) -> FramebufferRef {
    FramebufferRef::packed(FramebufferId(2), PixelFormat::Nv12, w, h, 0x5000_0000, w).with_plane(
        1,
        BufferPlane {
            addr: 0x5000_0000 + u64::from(w * h),
            pitch: w,
            offset: 0,
        },
    )
}

/// `src` pixels of a large XRGB buffer shown at `dst`.
fn crop(src_w: i32, src_h: i32, dst: Rect) -> PlaneState {
    PlaneState::new(
        OUT,
        xrgb(4096, 4096),
        Rect::fixed_from_xywh(0, 0, src_w, src_h),
        dst,
    )
}

fn fullscreen() -> PlaneState {
    PlaneState::full_buffer(OUT, xrgb(1920, 1080), Rect::from_xywh(0, 0, 1920, 1080))
}

fn run<S: mixplane_core::trace::TraceSink>(
    m: &mut Mixer<RegisterFile, S>,
    proposals: &[(u32, PlaneState)],
) -> Result<CommitChanges, TransactionError> {
    apply(m, proposals, single_output(OUT, FHD))
}

// ---------------------------------------------------------------------------
// Layer registry
// ---------------------------------------------------------------------------

#[test]
fn every_config_yields_ordered_layers_with_one_primary_at_vi_count() {
    for vi in 0..=4 {
        for ui in 0..=4 {
            let mut host = FakeHost::new();
            let m = Mixer::new(
                MixerId(1),
                MixerConfig::new(vi, ui),
                RegisterFile::new(),
                &mut host,
                NoopSink,
            )
            .unwrap();

            let n = usize::try_from(vi + ui).unwrap();
            assert_eq!(m.layers().len(), n, "vi={vi} ui={ui}");
            for (expected, layer) in (0..).zip(m.layers()) {
                assert_eq!(layer.index(), expected);
                assert_eq!(layer.zpos(), expected);
                assert_eq!(host.zpos_of(layer.handle()), Some(expected));
                let kind = if expected < vi {
                    LayerKind::Video
                } else {
                    LayerKind::UserInterface
                };
                assert_eq!(layer.kind(), kind);
                let role = if expected == vi {
                    LayerRole::Primary
                } else {
                    LayerRole::Overlay
                };
                assert_eq!(layer.role(), role, "vi={vi} ui={ui} index={expected}");
            }
            let primaries = m
                .layers()
                .iter()
                .filter(|l| l.role() == LayerRole::Primary)
                .count();
            assert_eq!(primaries, usize::from(ui > 0), "vi={vi} ui={ui}");
            assert_eq!(host.live().len(), n);
            assert!(host.registered().all(|d| d.mixer == MixerId(1)));
        }
    }
}

#[test]
fn layers_past_the_blender_pipes_are_programmed_without_routing() {
    let mut m = mixer(MixerConfig::new(4, 3));
    assert_eq!(m.layers().len(), 7);
    assert_eq!(m.layer(4).role(), LayerRole::Primary);

    let overlay = crop(100, 100, Rect::from_xywh(10, 10, 100, 100));
    let changes = run(&mut m, &[(6, overlay)]).unwrap();
    assert_eq!(changes.enable, [6]);

    let r = m.regs();
    assert!(m.layer(6).is_enabled());
    assert!(UiLayerAttr::from_bits_retain(r.value(regs::ui_attr(6))).contains(UiLayerAttr::EN));
    assert_eq!(r.value(regs::BLD_PIPE_CTL) & regs::BLD_PIPE_EN_MASK, 0);
    assert!(!r.was_written(regs::BLD_ROUTE));
}

#[test]
fn v3s_has_two_video_overlays_and_a_ui_primary() {
    let m = mixer(MixerConfig::v3s());
    let shape: Vec<_> = m
        .layers()
        .iter()
        .map(|l| (l.index(), l.kind(), l.role(), l.capabilities().supports_scaling))
        .collect();
    assert_eq!(
        shape,
        [
            (0, LayerKind::Video, LayerRole::Overlay, true),
            (1, LayerKind::Video, LayerRole::Overlay, true),
            (2, LayerKind::UserInterface, LayerRole::Primary, false),
        ]
    );
}

#[test]
fn registration_failure_releases_earlier_planes_in_reverse() {
    let mut regs = RegisterFile::new();
    let mut host = FakeHost::new().failing_plane_at(2, HostError::Failed(-22));
    let err = Mixer::new(
        MixerId(0),
        MixerConfig::v3s(),
        &mut regs,
        &mut host,
        NoopSink,
    )
    .unwrap_err();

    assert_eq!(
        err,
        InitError::Registration {
            index: 2,
            role: LayerRole::Primary,
            stage: RegistrationStage::Plane,
            source: HostError::Failed(-22),
        }
    );
    assert!(host.live().is_empty());
    assert_eq!(host.released(), [PlaneHandle(2), PlaneHandle(1)]);
    assert!(regs.writes().is_empty(), "no registers touched on failure");
}

#[test]
fn zpos_failure_releases_the_failing_plane_too() {
    let mut host = FakeHost::new().failing_zpos_at(0, HostError::Failed(-5));
    let err = Mixer::new(
        MixerId(0),
        MixerConfig::h3_mixer0(),
        RegisterFile::new(),
        &mut host,
        NoopSink,
    )
    .unwrap_err();

    assert_eq!(
        err,
        InitError::Registration {
            index: 0,
            role: LayerRole::Overlay,
            stage: RegistrationStage::Zpos,
            source: HostError::Failed(-5),
        }
    );
    assert!(host.live().is_empty());
    assert_eq!(host.released(), [PlaneHandle(1)]);
}

#[test]
fn host_out_of_memory_is_an_allocation_error() {
    let mut host = FakeHost::new().failing_plane_at(1, HostError::OutOfMemory);
    let err = Mixer::new(
        MixerId(0),
        MixerConfig::h3_mixer1(),
        RegisterFile::new(),
        &mut host,
        NoopSink,
    )
    .unwrap_err();
    assert_eq!(err, InitError::Allocation);
    assert!(host.live().is_empty());
}

#[test]
fn video_formats_exclude_alpha_variants_of_listed_opaque_formats() {
    let m = mixer(MixerConfig::h3_mixer0());
    for layer in m.layers() {
        let formats = layer.formats();
        let paired = formats
            .iter()
            .filter_map(|f| f.opaque_analog())
            .filter(|opaque| formats.contains(opaque))
            .count();
        match layer.kind() {
            LayerKind::Video => assert_eq!(paired, 0, "layer {}", layer.index()),
            LayerKind::UserInterface => assert!(paired > 0, "layer {}", layer.index()),
        }
    }
}

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

#[test]
fn non_scaling_layer_accepts_identity_and_rejects_stretch() {
    let mut m = mixer(MixerConfig::v3s());
    let ok = m.check(2, &crop(100, 100, Rect::from_xywh(0, 0, 100, 100)), Some(FHD));
    assert!(ok.unwrap().visible);

    let stretched = m.check(2, &crop(100, 100, Rect::from_xywh(0, 0, 200, 100)), Some(FHD));
    assert_eq!(
        stretched,
        Err(Rejection::ScaleOutOfRange {
            axis: Axis::Horizontal
        })
    );
}

#[test]
fn scaling_layer_bounds() {
    let mut m = mixer(MixerConfig::v3s());
    let dst = Rect::from_xywh(0, 0, 100, 100);
    assert!(m.check(0, &crop(100, 100, dst), Some(FHD)).is_ok(), "identity");
    assert!(m.check(0, &crop(1599, 100, dst), Some(FHD)).is_ok(), "just under 16x");
    assert_eq!(
        m.check(0, &crop(1600, 100, dst), Some(FHD)),
        Err(Rejection::ScaleOutOfRange {
            axis: Axis::Horizontal
        })
    );
    let tiny = Rect::from_xywh(0, 0, 1, 1);
    let huge = Rect::from_xywh(0, 0, 1920, 1080);
    assert!(m.check(0, &crop(1, 1, huge), Some(FHD)).is_ok(), "upscale");
    assert!(m.check(0, &crop(15, 15, tiny), Some(FHD)).is_ok(), "15x down");
}

#[test]
fn no_target_and_not_visible_is_a_no_op() {
    let mut m = mixer(MixerConfig::v3s());
    let writes = m.regs().writes().len();

    let changes = run(&mut m, &[(1, PlaneState::disabled())]).unwrap();
    assert!(changes.is_empty());
    assert!(!m.layer(1).is_enabled());
    assert!(m.layer(1).current_state().is_none());
    let new_writes = &m.regs().writes()[writes..];
    assert!(
        !new_writes.iter().any(|&(o, _)| o == regs::GLOBAL_DBUFF),
        "nothing to latch"
    );
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[test]
fn transaction_programs_primary_and_scaled_video() {
    let mut m = mixer(MixerConfig::v3s());
    let video = PlaneState::full_buffer(OUT, nv12(640, 480), Rect::from_xywh(100, 50, 1280, 960));

    let changes = run(&mut m, &[(2, fullscreen()), (0, video)]).unwrap();
    assert_eq!(
        changes,
        CommitChanges {
            coord: [0, 2].into(),
            format: [0, 2].into(),
            buffer: [0, 2].into(),
            enable: [0, 2].into(),
        }
    );

    let r = m.regs();
    assert_eq!(r.value(regs::GLOBAL_SIZE), regs::size(1920, 1080));
    assert_eq!(r.value(regs::BLD_OUTSIZE), regs::size(1920, 1080));
    assert_eq!(r.value(regs::GLOBAL_DBUFF), regs::DBUFF_ENABLE);
    assert_eq!(r.value(regs::bld_coord(0)), regs::coord(100, 50));
    assert_eq!(r.value(regs::bld_insize(0)), regs::size(1280, 960));
    assert_eq!(r.value(regs::vi_size(0)), regs::size(640, 480));
    assert_eq!(
        r.value(regs::scaler_base(0, 2) + regs::SCALER_CTRL),
        regs::SCALER_CTRL_EN | regs::SCALER_CTRL_COEF_SWITCH
    );
    assert!(ViLayerAttr::from_bits_retain(r.value(regs::vi_attr(0))).contains(ViLayerAttr::EN));
    assert!(UiLayerAttr::from_bits_retain(r.value(regs::ui_attr(2))).contains(UiLayerAttr::EN));
    assert_ne!(r.value(regs::BLD_PIPE_CTL) & regs::bld_pipe_en(0), 0);
    assert_ne!(r.value(regs::BLD_PIPE_CTL) & regs::bld_pipe_en(2), 0);
    assert!(m.layer(0).is_enabled());
    assert!(m.layer(2).is_enabled());
    assert!(!m.layer(1).is_enabled());
}

#[test]
fn rejected_transaction_has_no_effect() {
    let mut m = mixer(MixerConfig::v3s());
    run(&mut m, &[(2, fullscreen())]).unwrap();
    let before = m.layer(2).current_state().copied();
    let writes = m.regs().writes().len();

    let next = fullscreen();
    let mut bad = crop(100, 100, Rect::from_xywh(0, 0, 100, 100));
    bad.buffer = Some(FramebufferRef::packed(
        FramebufferId(3),
        PixelFormat::Argb8888,
        4096,
        4096,
        0,
        4096 * 4,
    ));

    let err = run(&mut m, &[(2, next), (0, bad)]).unwrap_err();
    assert_eq!(
        err,
        TransactionError {
            index: 0,
            rejection: Rejection::UnsupportedFormat,
        }
    );
    assert_eq!(err.to_string(), "layer 0 rejected: unsupported pixel format");
    assert_eq!(m.regs().writes().len(), writes, "no register writes");
    assert_eq!(m.layer(2).current_state().copied(), before);
    assert!(!m.layer(0).is_enabled());
}

#[test]
fn commit_with_nothing_pending_writes_nothing() {
    let mut m = mixer(MixerConfig::v3s());
    run(&mut m, &[(2, fullscreen())]).unwrap();
    let writes = m.regs().writes().len();
    assert!(m.commit().is_empty());
    assert_eq!(m.regs().writes().len(), writes);
}

#[test]
fn invisible_update_matches_disable() {
    let mut a = mixer(MixerConfig::v3s());
    let mut b = mixer(MixerConfig::v3s());
    for m in [&mut a, &mut b] {
        run(m, &[(2, fullscreen())]).unwrap();
    }
    let shown = a.layer(2).current_state().copied();

    a.update(2, &fullscreen().with_visible(false));
    b.disable(2);

    for m in [&a, &b] {
        assert!(!m.layer(2).is_enabled());
        assert_eq!(m.layer(2).current_state().copied(), shown);
        assert!(
            !UiLayerAttr::from_bits_retain(m.regs().value(regs::ui_attr(2)))
                .contains(UiLayerAttr::EN)
        );
        assert_eq!(m.regs().value(regs::BLD_PIPE_CTL) & regs::bld_pipe_en(2), 0);
    }
    assert_eq!(a.commit(), b.commit());
}

#[test]
fn partly_offscreen_overlay_is_programmed_clipped() {
    let mut m = mixer(MixerConfig::h3_mixer0());
    let overlay = crop(100, 100, Rect::from_xywh(1870, -20, 100, 100));
    run(&mut m, &[(3, overlay)]).unwrap();

    let state = m.layer(3).current_state().copied().unwrap();
    assert_eq!(state.dst, Rect::new(1870, 0, 1920, 80));
    assert_eq!(state.src_pixels(), (0, 20, 50, 80));
    assert_eq!(m.regs().value(regs::bld_coord(3)), regs::coord(1870, 0));
    assert_eq!(m.regs().value(regs::bld_insize(3)), regs::size(50, 80));
}

#[test]
fn fully_offscreen_overlay_is_disabled() {
    let mut m = mixer(MixerConfig::h3_mixer0());
    run(&mut m, &[(3, crop(100, 100, Rect::from_xywh(0, 0, 100, 100)))]).unwrap();
    assert!(m.layer(3).is_enabled());

    let changes = run(&mut m, &[(3, crop(100, 100, Rect::from_xywh(4000, 0, 100, 100)))]).unwrap();
    assert!(!m.layer(3).is_enabled());
    assert_eq!(changes.enable, [3]);
    assert!(changes.coord.is_empty());
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

#[test]
fn trace_follows_a_transaction() {
    let mut m = Mixer::new(
        MixerId(0),
        MixerConfig::v3s(),
        RegisterFile::new(),
        &mut FakeHost::new(),
        RecorderSink::new(),
    )
    .unwrap();
    let _ = m.check(2, &crop(100, 100, Rect::from_xywh(0, 0, 200, 100)), Some(FHD));
    run(&mut m, &[(2, fullscreen())]).unwrap();

    let events: Vec<_> = decode(m.sink().as_bytes()).collect();
    let inits = events
        .iter()
        .filter(|e| matches!(e, RecordedEvent::LayerInit(_)))
        .count();
    assert_eq!(inits, 3);

    let tail: Vec<_> = events[inits..].to_vec();
    assert!(matches!(
        tail[0],
        RecordedEvent::Check(c) if c.outcome == CheckOutcome::Rejected(Rejection::ScaleOutOfRange {
            axis: Axis::Horizontal
        })
    ));
    assert!(matches!(tail[1], RecordedEvent::Check(c) if c.outcome == CheckOutcome::Visible));
    assert!(matches!(tail[2], RecordedEvent::Program(p) if p.index == 2 && !p.scaled));
    assert!(matches!(tail[3], RecordedEvent::Enable(e) if e.enabled));
    assert!(matches!(tail[4], RecordedEvent::Commit(c) if c.enable == 1));
    assert_eq!(tail.len(), 5);
}

#[test]
fn recorder_can_be_reset_and_taken_back() {
    let mut m = Mixer::new(
        MixerId(0),
        MixerConfig::v3s(),
        RegisterFile::new(),
        &mut FakeHost::new(),
        RecorderSink::new(),
    )
    .unwrap();
    m.sink_mut().clear();
    run(&mut m, &[(2, fullscreen())]).unwrap();

    let (registers, sink) = m.into_parts();
    assert!(registers.was_written(regs::GLOBAL_DBUFF));
    let events: Vec<_> = decode(sink.as_bytes()).collect();
    assert!(matches!(events[0], RecordedEvent::Check(_)));
    assert!(matches!(events.last(), Some(RecordedEvent::Commit(_))));
}
