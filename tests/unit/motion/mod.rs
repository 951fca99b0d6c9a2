use std::sync::Arc;

use super::*;
use crate::encode::sink::InMemorySink;

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

fn solid(width: u32, height: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(px.repeat((width * height) as usize)),
    }
}

#[test]
fn closed_form_at_reference_times() {
    let p = MotionPath::new(canvas(720, 900), 819, 1228, MotionParameters::default());
    assert!((p.horizontal_range() - 19.8).abs() < 1e-9);
    assert!((p.vertical_range() - 24.75).abs() < 1e-9);

    let p0 = p.position(0.0);
    assert!((p0.x - -49.5).abs() < 1e-9);
    assert!((p0.y - -188.75).abs() < 1e-9);

    // A quarter vertical cycle: cos = 0, sin(2 * pi/2) = 0.
    let p1 = p.position(1.0);
    assert!((p1.x - -49.5).abs() < 1e-9);
    assert!((p1.y - -164.0).abs() < 1e-9);

    // An eighth of a cycle: horizontal term peaks.
    let o = p.offset(0.5);
    assert!((o.x - 19.8).abs() < 1e-9);
    assert!((o.y - -24.75 * (std::f64::consts::FRAC_PI_4).cos()).abs() < 1e-9);
}

#[test]
fn footprint_covers_frame_when_image_is_larger() {
    let frame = canvas(720, 900);
    for (w, h) in [(819, 1228), (1600, 1000), (2000, 2000)] {
        let p = MotionPath::new(frame, w, h, MotionParameters::default());
        assert!(p.degenerate_warning().is_none());
        for i in 0..2400 {
            let t = f64::from(i) / 60.0;
            let pos = p.position(t);
            assert!(pos.x <= 1e-9, "{w}x{h} at {t}: {pos:?}");
            assert!(pos.y <= 1e-9, "{w}x{h} at {t}: {pos:?}");
            assert!(pos.x + f64::from(w) >= 720.0 - 1e-9);
            assert!(pos.y + f64::from(h) >= 900.0 - 1e-9);
        }
    }
}

#[test]
fn degenerate_range_warns_and_holds_still() {
    let p = MotionPath::new(canvas(720, 900), 700, 1000, MotionParameters::default());
    assert_eq!(p.horizontal_range(), 0.0);
    assert_eq!(p.vertical_range(), 0.0);
    assert_eq!(p.position(0.0), p.position(3.7));
    assert_eq!(
        p.degenerate_warning(),
        Some(JobWarning::DegenerateMotionRange {
            image_width: 700,
            image_height: 1000,
            frame_width: 720,
            frame_height: 900,
        })
    );
}

#[test]
fn offsets_are_deterministic() {
    let a = MotionPath::new(canvas(720, 900), 1024, 1536, MotionParameters::default());
    let b = MotionPath::new(canvas(720, 900), 1024, 1536, MotionParameters::default());
    for i in 0..600 {
        let t = f64::from(i) / 60.0;
        assert_eq!(a.offset(t), b.offset(t));
    }
}

#[test]
fn frame_count_is_ceil_of_duration() {
    let fps = Fps::new(60, 1).unwrap();
    let m = MotionFrames::new(
        solid(4, 4, [1, 2, 3, 255]),
        canvas(4, 4),
        fps,
        MotionParameters::default(),
        10.0,
    )
    .unwrap();
    assert_eq!(m.frame_count(), 600);

    let m = MotionFrames::new(
        solid(4, 4, [1, 2, 3, 255]),
        canvas(4, 4),
        fps,
        MotionParameters::default(),
        0.01,
    )
    .unwrap();
    assert_eq!(m.frame_count(), 1);

    assert!(
        MotionFrames::new(
            solid(4, 4, [1, 2, 3, 255]),
            canvas(4, 4),
            fps,
            MotionParameters::default(),
            0.0,
        )
        .is_err()
    );
}

#[test]
fn small_image_is_centered_over_black() {
    let m = MotionFrames::new(
        solid(2, 2, [200, 0, 0, 255]),
        canvas(4, 4),
        Fps::new(60, 1).unwrap(),
        MotionParameters::default(),
        1.0,
    )
    .unwrap();
    let f = m.render(FrameIndex(17));
    assert_eq!(f.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(f.pixel(1, 1), Some([200, 0, 0, 255]));
    assert_eq!(f.pixel(2, 2), Some([200, 0, 0, 255]));
    assert_eq!(f.pixel(3, 3), Some([0, 0, 0, 255]));
}

#[test]
fn animate_streams_every_frame_in_order() {
    let m = MotionFrames::new(
        solid(8, 8, [0, 0, 255, 255]),
        canvas(4, 4),
        Fps::new(30, 1).unwrap(),
        MotionParameters::default(),
        0.5,
    )
    .unwrap();
    let mut sink = InMemorySink::new();
    let report = animate(&m, &mut sink).unwrap();

    assert_eq!(report.frames, 15);
    assert!(report.warnings.is_empty());
    assert!(sink.is_ended());
    assert_eq!(sink.config().unwrap().fps, Fps::new(30, 1).unwrap());
    assert_eq!(sink.frames().len(), 15);
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 255, 255]));
    }
}
