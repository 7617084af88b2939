//! The end-to-end pipeline: decode -> accumulate -> scratch frames ->
//! optional label pass -> palette re-encode. Single-threaded and
//! synchronous; each stage hands a fully owned frame set to the next.

use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use tracing::{debug, info};

use crate::{
    accumulate::accumulate,
    composite::unpremultiply_rgba8_in_place,
    decode::{decode_animation, decode_still},
    encode::encode_gif_to_path,
    error::{GifsmithError, GifsmithResult},
    frame::ComposedFrame,
    label::{LabelCompositor, LabelStyle},
};

/// Which composed frames receive the label burn.
#[derive(Clone, Debug)]
pub enum LabelFrames {
    All,
    Indices(Vec<usize>),
}

impl LabelFrames {
    fn applies(&self, index: usize) -> bool {
        match self {
            LabelFrames::All => true,
            LabelFrames::Indices(indices) => indices.contains(&index),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LabelSpec {
    pub font_path: PathBuf,
    pub text: String,
    /// Baseline origin of the label, in canvas coordinates.
    pub point: (f32, f32),
    pub style: LabelStyle,
    pub frames: LabelFrames,
}

#[derive(Clone, Debug, Default)]
pub struct PipelineOptions {
    pub label: Option<LabelSpec>,
    /// Also write one composed frame as a standalone still image.
    pub still_frame: Option<(usize, PathBuf)>,
}

#[derive(Clone, Debug)]
pub struct PipelineReport {
    pub frame_count: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub out_gif: PathBuf,
    pub out_still: Option<PathBuf>,
}

/// Run the full decompose/label/re-encode pipeline over one animated input.
///
/// Intermediate frames are written as numbered PNGs into a private scratch
/// directory that is removed on every exit path.
pub fn run(
    input: &Path,
    out_gif: &Path,
    options: &PipelineOptions,
) -> GifsmithResult<PipelineReport> {
    info!(input = %input.display(), "decoding animation");
    let animation = decode_animation(input)?;
    debug!(deltas = animation.deltas.len(), "decoded raw frame deltas");

    let mut frames = accumulate(&animation.deltas)?;
    let (canvas_width, canvas_height) = (frames[0].width, frames[0].height);
    debug!(
        frames = frames.len(),
        width = canvas_width,
        height = canvas_height,
        "accumulated composed frames"
    );

    let scratch = tempfile::tempdir()
        .map_err(|e| GifsmithError::encode_io(format!("create scratch dir: {e}")))?;
    write_scratch_frames(scratch.path(), &frames)?;

    if let Some(spec) = &options.label {
        let mut compositor = LabelCompositor::from_font_path(&spec.font_path)?;
        debug!(family = compositor.family_name(), text = %spec.text, "burning label");
        for (i, frame) in frames.iter_mut().enumerate() {
            if spec.frames.applies(i) {
                *frame = compositor.composite(frame, &spec.text, spec.point, spec.style)?;
            }
        }
    }

    let mut out_still = None;
    if let Some((index, path)) = &options.still_frame {
        let frame = frames.get(*index).ok_or_else(|| {
            GifsmithError::Other(anyhow::anyhow!(
                "still frame index {index} out of range (animation has {} frames)",
                frames.len()
            ))
        })?;
        write_png(frame, path)?;
        out_still = Some(path.clone());
    }

    encode_gif_to_path(&frames, out_gif)?;
    info!(
        frames = frames.len(),
        out = %out_gif.display(),
        "wrote animated output"
    );

    Ok(PipelineReport {
        frame_count: frames.len(),
        canvas_width,
        canvas_height,
        out_gif: out_gif.to_path_buf(),
        out_still,
    })
    // `scratch` drops here, cleaning up the intermediate frames.
}

/// Still mode: decode one image, burn the label, write the result.
pub fn run_still(input: &Path, out: &Path, spec: &LabelSpec) -> GifsmithResult<PathBuf> {
    let frame = decode_still(input)?;
    let mut compositor = LabelCompositor::from_font_path(&spec.font_path)?;
    let labeled = compositor.composite(&frame, &spec.text, spec.point, spec.style)?;
    write_png(&labeled, out)?;
    info!(out = %out.display(), "wrote labeled still");
    Ok(out.to_path_buf())
}

fn write_scratch_frames(dir: &Path, frames: &[ComposedFrame]) -> GifsmithResult<()> {
    for (i, frame) in frames.iter().enumerate() {
        write_png(frame, &dir.join(format!("frame-{i:04}.png")))?;
    }
    debug!(dir = %dir.display(), count = frames.len(), "wrote scratch frames");
    Ok(())
}

// Final PNGs follow the same temp-write-then-rename rule as the GIF output,
// so an interrupted run leaves nothing that looks finished.
fn write_png(frame: &ComposedFrame, path: &Path) -> GifsmithResult<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))
            .map_err(|e| GifsmithError::encode_io(e.to_string()))?;
    }
    let tmp = tempfile::NamedTempFile::new_in(parent.unwrap_or_else(|| Path::new(".")))
        .map_err(|e| GifsmithError::encode_io(format!("create temp output: {e}")))?;

    let mut rgba = frame.rgba8_premul.clone();
    unpremultiply_rgba8_in_place(&mut rgba);
    {
        let mut writer = std::io::BufWriter::new(tmp.as_file());
        image::write_buffer_with_format(
            &mut writer,
            &rgba,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| GifsmithError::encode_io(format!("write png '{}': {e}", path.display())))?;
        writer
            .flush()
            .map_err(|e| GifsmithError::encode_io(format!("flush png stream: {e}")))?;
    }

    tmp.persist(path).map_err(|e| {
        GifsmithError::encode_io(format!("persist '{}': {}", path.display(), e.error))
    })?;
    Ok(())
}
