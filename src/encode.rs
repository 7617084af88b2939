//! Palette quantization and animated GIF serialization.

use std::{
    borrow::Cow,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    error::{GifsmithError, GifsmithResult},
    frame::ComposedFrame,
    palette,
};

/// Quantize every frame against the shared reference palette and serialize
/// the sequence as one animated GIF with per-frame delays and infinite loop.
///
/// A pure function of the input frames: same frames in, same bytes out.
/// Partial output on sink failure is permitted here; callers wanting
/// atomicity go through [`encode_gif_to_path`].
pub fn encode_gif<W: Write>(frames: &[ComposedFrame], sink: W) -> GifsmithResult<()> {
    let first = frames.first().ok_or(GifsmithError::EmptyAnimation)?;
    let width: u16 = first
        .width
        .try_into()
        .map_err(|_| GifsmithError::invariant("canvas width exceeds the gif u16 limit"))?;
    let height: u16 = first
        .height
        .try_into()
        .map_err(|_| GifsmithError::invariant("canvas height exceeds the gif u16 limit"))?;

    let table = palette::reference_palette();
    let global = palette::reference_palette_rgb();
    let mut encoder = gif::Encoder::new(sink, width, height, &global)
        .map_err(|e| GifsmithError::encode_io(format!("begin gif stream: {e}")))?;
    encoder
        .set_repeat(gif::Repeat::Infinite)
        .map_err(|e| GifsmithError::encode_io(format!("write loop extension: {e}")))?;

    for (i, frame) in frames.iter().enumerate() {
        if frame.width != first.width || frame.height != first.height {
            return Err(GifsmithError::invariant(format!(
                "frame {i} extent {}x{} differs from canvas {}x{}",
                frame.width, frame.height, first.width, first.height
            )));
        }

        let out = gif::Frame {
            width,
            height,
            delay: frame.delay_cs,
            buffer: Cow::Owned(quantize(&frame.rgba8_premul, &table)),
            ..gif::Frame::default()
        };
        encoder
            .write_frame(&out)
            .map_err(|e| GifsmithError::encode_io(format!("write gif frame {i}: {e}")))?;
    }
    Ok(())
}

/// Encode to a temporary sibling file and rename into place on success, so a
/// failed run never leaves a partial file that could pass for output.
pub fn encode_gif_to_path(frames: &[ComposedFrame], path: &Path) -> GifsmithResult<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
        .map_err(|e| GifsmithError::encode_io(format!("create temp output: {e}")))?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        encode_gif(frames, &mut writer)?;
        writer
            .flush()
            .map_err(|e| GifsmithError::encode_io(format!("flush gif stream: {e}")))?;
    }

    tmp.persist(path).map_err(|e| {
        GifsmithError::encode_io(format!("persist '{}': {}", path.display(), e.error))
    })?;
    Ok(())
}

/// Direct nearest-color quantization, no dithering, no blending. Alpha is
/// dropped; accumulated frames are expected to be effectively opaque.
fn quantize(rgba8_premul: &[u8], table: &[[u8; 3]; palette::PALETTE_LEN]) -> Vec<u8> {
    rgba8_premul
        .chunks_exact(4)
        .map(|px| palette::nearest_index(table, [px[0], px[1], px[2]]))
        .collect()
}
