//! Input boundary: reading an animated GIF into raw frame deltas, and a
//! still PNG into a single composed frame.
//!
//! The GIF reader is asked for RGBA output per stored frame, so deltas
//! arrive exactly as the container holds them (sub-rectangle plus offset),
//! not pre-composited onto the screen. Accumulation owns compositing.

use std::{
    fs::File,
    io::{BufReader, Read},
    panic::{AssertUnwindSafe, catch_unwind},
    path::Path,
};

use crate::{
    composite::premultiply_rgba8_in_place,
    error::{GifsmithError, GifsmithResult},
    frame::{ComposedFrame, DeltaRect, FrameDelta},
};

/// A decoded animation: the ordered raw deltas of one GIF.
#[derive(Clone, Debug)]
pub struct Animation {
    pub deltas: Vec<FrameDelta>,
}

pub fn decode_animation(path: &Path) -> GifsmithResult<Animation> {
    let file = File::open(path).map_err(|e| {
        GifsmithError::input_io(format!("cannot open '{}': {e}", path.display()))
    })?;
    decode_animation_reader(BufReader::new(file))
}

pub fn decode_animation_bytes(bytes: &[u8]) -> GifsmithResult<Animation> {
    decode_animation_reader(bytes)
}

/// Containment boundary: an unexpected fault inside the third-party decoder
/// must surface as a `Decode` error, never as an uncontrolled crash.
fn decode_animation_reader(reader: impl Read) -> GifsmithResult<Animation> {
    let deltas = catch_unwind(AssertUnwindSafe(|| read_deltas(reader)))
        .map_err(|payload| {
            GifsmithError::decode(format!("decoder fault: {}", panic_message(&payload)))
        })??;
    Ok(Animation { deltas })
}

fn read_deltas(reader: impl Read) -> GifsmithResult<Vec<FrameDelta>> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options
        .read_info(reader)
        .map_err(|e| GifsmithError::decode(format!("read gif header: {e}")))?;

    let mut deltas = Vec::new();
    loop {
        let frame = match decoder.read_next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => return Err(GifsmithError::decode(format!("read gif frame: {e}"))),
        };

        let mut rgba = frame.buffer.to_vec();
        premultiply_rgba8_in_place(&mut rgba);
        deltas.push(FrameDelta {
            rect: DeltaRect {
                left: u32::from(frame.left),
                top: u32::from(frame.top),
                width: u32::from(frame.width),
                height: u32::from(frame.height),
            },
            rgba8_premul: rgba,
            delay_cs: frame.delay,
        });
    }
    Ok(deltas)
}

/// Decode a still image into a single canvas-sized frame (delay 0).
pub fn decode_still(path: &Path) -> GifsmithResult<ComposedFrame> {
    let reader = image::ImageReader::open(path).map_err(|e| {
        GifsmithError::input_io(format!("cannot open '{}': {e}", path.display()))
    })?;
    let decoded = reader
        .decode()
        .map_err(|e| GifsmithError::decode(format!("decode '{}': {e}", path.display())))?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Ok(ComposedFrame {
        width,
        height,
        rgba8_premul,
        delay_cs: 0,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
