//! The fixed reference palette used for re-encoding.
//!
//! A single well-known 256-entry table (the 6x6x6 web-safe color cube padded
//! with a 40-step gray ramp) is shared by every frame. Per-frame color
//! fidelity is traded for simplicity and deterministic, fast encoding; this
//! is deliberately not an adaptive quantizer.

pub const PALETTE_LEN: usize = 256;

/// Number of entries in the web-safe cube portion of the table.
const CUBE_LEN: usize = 6 * 6 * 6;

pub fn reference_palette() -> [[u8; 3]; PALETTE_LEN] {
    let mut table = [[0u8; 3]; PALETTE_LEN];
    let mut i = 0;
    for r in 0..6u16 {
        for g in 0..6u16 {
            for b in 0..6u16 {
                table[i] = [(r * 51) as u8, (g * 51) as u8, (b * 51) as u8];
                i += 1;
            }
        }
    }
    for k in 0..(PALETTE_LEN - CUBE_LEN) as u16 {
        let v = (k * 255 / 39) as u8;
        table[i] = [v, v, v];
        i += 1;
    }
    table
}

/// The same table flattened to the RGB byte layout GIF color tables use.
pub fn reference_palette_rgb() -> Vec<u8> {
    reference_palette().iter().flatten().copied().collect()
}

/// Nearest palette entry by squared distance. Ties break toward the lower
/// index, so lookup order is part of the encoding contract.
pub fn nearest_index(table: &[[u8; 3]; PALETTE_LEN], rgb: [u8; 3]) -> u8 {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, entry) in table.iter().enumerate() {
        let dist = dist2(*entry, rgb);
        if dist < best_dist {
            best_dist = dist;
            best = i;
            if dist == 0 {
                break;
            }
        }
    }
    best as u8
}

fn dist2(a: [u8; 3], b: [u8; 3]) -> u32 {
    let dr = i32::from(a[0]) - i32::from(b[0]);
    let dg = i32::from(a[1]) - i32::from(b[1]);
    let db = i32::from(a[2]) - i32::from(b[2]);
    (dr * dr + dg * dg + db * db) as u32
}
