use crate::foundation::error::{AdrasterError, AdrasterResult};

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over of a single pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = src[i].saturating_add(dc);
    }
    out
}

/// Source-over `src` onto `dst`, both premultiplied RGBA8 buffers of equal
/// length.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> AdrasterResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(AdrasterError::geometry(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-in mask application: keep `src` where `mask` is opaque, weight by
/// the mask alpha elsewhere. All buffers are premultiplied RGBA8 of equal
/// length; `dst` receives the masked result.
pub fn mask_apply_source_in(src: &[u8], mask: &[u8], dst: &mut [u8]) -> AdrasterResult<()> {
    if src.len() != mask.len() || src.len() != dst.len() || !dst.len().is_multiple_of(4) {
        return Err(AdrasterError::geometry(
            "mask_apply_source_in expects equal-length rgba8 buffers",
        ));
    }
    for ((s, m), d) in src
        .chunks_exact(4)
        .zip(mask.chunks_exact(4))
        .zip(dst.chunks_exact_mut(4))
    {
        let w = u16::from(m[3]);
        d[0] = mul_div255(u16::from(s[0]), w);
        d[1] = mul_div255(u16::from(s[1]), w);
        d[2] = mul_div255(u16::from(s[2]), w);
        d[3] = mul_div255(u16::from(s[3]), w);
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
