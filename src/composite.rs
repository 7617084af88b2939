//! Premultiplied RGBA8 pixel math for frame accumulation and label merging.

use crate::error::{GifsmithError, GifsmithResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over blend of one premultiplied pixel. Fully transparent source
/// pixels leave the destination unchanged; fully opaque ones replace it.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Source-over blend of two equal-extent buffers, `src` on top of `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> GifsmithResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(GifsmithError::invariant(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-over blend of a `src_w * src_h` buffer onto `dst` with its top-left
/// corner at `(at_x, at_y)`. The caller guarantees the placement fits.
pub fn blit_over(
    dst: &mut [u8],
    dst_w: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    at_x: u32,
    at_y: u32,
) {
    for row in 0..src_h {
        let src_start = (row * src_w * 4) as usize;
        let dst_start = (((at_y + row) * dst_w + at_x) * 4) as usize;
        let src_row = &src[src_start..src_start + (src_w * 4) as usize];
        let dst_row = &mut dst[dst_start..dst_start + (src_w * 4) as usize];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

/// Copy a `src_w * src_h` buffer into `dst` at `(at_x, at_y)` as-is, without
/// blending. Used only for the first delta of a sequence.
pub fn blit_source(
    dst: &mut [u8],
    dst_w: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    at_x: u32,
    at_y: u32,
) {
    for row in 0..src_h {
        let src_start = (row * src_w * 4) as usize;
        let dst_start = (((at_y + row) * dst_w + at_x) * 4) as usize;
        dst[dst_start..dst_start + (src_w * 4) as usize]
            .copy_from_slice(&src[src_start..src_start + (src_w * 4) as usize]);
    }
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        let src = [255, 255, 255, 0];
        assert_eq!(over(dst, src), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 200];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_partial_alpha_blends() {
        // 50% gray over opaque black: roughly half intensity, fully opaque out.
        let dst = [0, 0, 0, 255];
        let src = [128, 128, 128, 128];
        let out = over(dst, src);
        assert_eq!(out[3], 255);
        assert!(out[0] >= 127 && out[0] <= 129);
    }

    #[test]
    fn over_in_place_rejects_length_mismatch() {
        let mut dst = vec![0u8; 8];
        assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    }

    #[test]
    fn blit_source_copies_subrect_without_blending() {
        // 4x4 opaque white dst, 2x2 transparent src at (1, 1): source copy
        // must punch the transparency through.
        let mut dst = vec![255u8; 4 * 4 * 4];
        let src = vec![0u8; 2 * 2 * 4];
        blit_source(&mut dst, 4, &src, 2, 2, 1, 1);
        let px = |x: u32, y: u32| {
            let i = ((y * 4 + x) * 4) as usize;
            [dst[i], dst[i + 1], dst[i + 2], dst[i + 3]]
        };
        assert_eq!(px(1, 1), [0, 0, 0, 0]);
        assert_eq!(px(2, 2), [0, 0, 0, 0]);
        assert_eq!(px(0, 0), [255, 255, 255, 255]);
        assert_eq!(px(3, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn blit_over_keeps_dst_under_transparent_src() {
        let mut dst = vec![255u8; 4 * 4 * 4];
        let src = vec![0u8; 2 * 2 * 4];
        blit_over(&mut dst, 4, &src, 2, 2, 1, 1);
        assert!(dst.iter().all(|&b| b == 255));
    }

    #[test]
    fn premultiply_then_unpremultiply_is_stable_for_opaque() {
        let mut px = vec![10u8, 200, 30, 255, 0, 0, 0, 0];
        let orig = px.clone();
        premultiply_rgba8_in_place(&mut px);
        unpremultiply_rgba8_in_place(&mut px);
        assert_eq!(px, orig);
    }
}
