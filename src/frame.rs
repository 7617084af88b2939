use crate::error::{GifsmithError, GifsmithResult};

/// Offset rectangle of one stored frame within the logical canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeltaRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl DeltaRect {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

/// One input frame as stored in the source animation: a premultiplied RGBA8
/// buffer covering only `rect`, plus its display delay in centiseconds
/// (the GIF native unit; 0 is a legal "as fast as possible" value).
#[derive(Clone, Debug)]
pub struct FrameDelta {
    pub rect: DeltaRect,
    /// Pixel bytes in row-major premultiplied RGBA8, `rect.width * rect.height * 4` long.
    pub rgba8_premul: Vec<u8>,
    pub delay_cs: u16,
}

impl FrameDelta {
    pub fn expected_len(&self) -> usize {
        self.rect.width as usize * self.rect.height as usize * 4
    }
}

/// A canvas-sized, fully painted frame: the complete visible state after
/// applying deltas `0..=i` in order. Snapshots are always deep copies; no
/// two frames ever share a pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedFrame {
    pub width: u32,
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
    pub delay_cs: u16,
}

/// Union of all delta rectangles of one animation. Every composed frame is
/// normalized to this extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl CanvasBounds {
    /// Compute the bounding union of all delta rects. The running min/max is
    /// seeded from the first delta's rectangle rather than from zero, so an
    /// animation whose frames never touch the origin still resolves to a
    /// tight canvas.
    pub fn from_deltas(deltas: &[FrameDelta]) -> GifsmithResult<Self> {
        let first = deltas.first().ok_or(GifsmithError::EmptyAnimation)?;
        let mut bounds = CanvasBounds {
            min_x: first.rect.left,
            min_y: first.rect.top,
            max_x: first.rect.right(),
            max_y: first.rect.bottom(),
        };
        for delta in &deltas[1..] {
            bounds.min_x = bounds.min_x.min(delta.rect.left);
            bounds.min_y = bounds.min_y.min(delta.rect.top);
            bounds.max_x = bounds.max_x.max(delta.rect.right());
            bounds.max_y = bounds.max_y.max(delta.rect.bottom());
        }
        Ok(bounds)
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, rect: &DeltaRect) -> bool {
        rect.left >= self.min_x
            && rect.top >= self.min_y
            && rect.right() <= self.max_x
            && rect.bottom() <= self.max_y
    }
}
