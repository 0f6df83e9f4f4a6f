use super::*;

#[test]
fn over_opaque_src_replaces_dst() {
    let dst = [10, 20, 30, 255];
    let src = [200, 100, 50, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_transparent_src_keeps_dst() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    assert_eq!(over(dst, [200, 100, 50, 255], 0.0), dst);
}

#[test]
fn over_half_opacity_blends() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!((126..=129).contains(&out[0]));
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    assert!(over_in_place(&mut dst[..6], &[0u8; 6], 1.0).is_err());
}

#[test]
fn zero_opacity_is_a_no_op() {
    let mut dst = vec![1u8, 2, 3, 4];
    over_in_place(&mut dst, &[9, 9, 9, 255], 0.0).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 4]);
}

#[test]
fn fill_writes_every_pixel() {
    let mut buf = vec![0u8; 12];
    fill_in_place(&mut buf, [1, 2, 3, 4]);
    assert_eq!(buf, [1, 2, 3, 4].repeat(3));
}
