use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[0u8; 4], [0, 0, 0, 255]).is_err());
}

#[test]
fn staging_path_sits_next_to_output() {
    assert_eq!(
        staging_path_for(Path::new("out/clip.mp4")),
        PathBuf::from("out/clip.mp4.partial")
    );
}

#[test]
fn begin_rejects_odd_dimensions_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_encode/odd.mp4"));
    let err = sink
        .begin(SinkConfig {
            width: 11,
            height: 10,
            fps: Fps::new(30, 1).unwrap(),
        })
        .unwrap_err();
    assert!(err.to_string().contains("even"));
}

#[test]
fn push_before_begin_is_an_encoding_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_encode/none.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    let err = sink.push_frame(FrameIndex(0), &frame).unwrap_err();
    assert_eq!(err.kind(), crate::foundation::error::FailureKind::EncodingFailure);
}
