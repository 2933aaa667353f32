use super::*;

#[test]
fn over_src_transparent_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let src = [255, 0, 0, 255];
    assert_eq!(over([0, 0, 0, 255], src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src), src);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    let mut odd = vec![0u8; 6];
    assert!(over_in_place(&mut odd, &[0u8; 6]).is_err());
}

#[test]
fn mask_keeps_src_where_mask_is_opaque() {
    let src = [100, 50, 25, 255, 100, 50, 25, 255];
    let mask = [0, 0, 0, 255, 0, 0, 0, 0]; // opaque, then transparent
    let mut dst = [0u8; 8];
    mask_apply_source_in(&src, &mask, &mut dst).unwrap();
    assert_eq!(&dst[0..4], &[100, 50, 25, 255]);
    assert_eq!(&dst[4..8], &[0, 0, 0, 0]);
}

#[test]
fn mask_weights_by_partial_alpha() {
    let src = [200, 100, 0, 255];
    let mask = [255, 255, 255, 128];
    let mut dst = [0u8; 4];
    mask_apply_source_in(&src, &mask, &mut dst).unwrap();
    assert_eq!(dst, [100, 50, 0, 128]);
}
