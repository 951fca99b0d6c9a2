use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 128), 64);
}

#[test]
fn premultiply_scales_color_by_alpha() {
    let mut px = vec![100u8, 50, 200, 128, 10, 20, 30, 0, 1, 2, 3, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        &px[0..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..12], &[1, 2, 3, 255]);
}

#[test]
fn over_transparent_src_is_identity_and_opaque_src_replaces() {
    let mut dst = vec![10u8, 20, 30, 255, 10, 20, 30, 255];
    let src = vec![0u8, 0, 0, 0, 200, 100, 50, 255];
    premul_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255, 200, 100, 50, 255]);
}

#[test]
fn over_half_alpha_blends() {
    let mut dst = vec![0u8, 0, 200, 255];
    let src = vec![128u8, 0, 0, 128];
    premul_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst[0], 128);
    assert!(dst[2] > 90 && dst[2] < 110);
    assert_eq!(dst[3], 255);
}

#[test]
fn over_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(premul_over_in_place(&mut dst, &[0u8; 4]).is_err());
}
