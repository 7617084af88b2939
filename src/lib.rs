#![forbid(unsafe_code)]

//! Decompose an animated GIF into fully composited frames, optionally burn a
//! text label onto them, and re-encode the result against a fixed 256-color
//! palette.

pub mod accumulate;
pub mod composite;
pub mod decode;
pub mod encode;
pub mod error;
pub mod frame;
pub mod label;
pub mod palette;
pub mod pipeline;

pub use accumulate::accumulate;
pub use decode::{Animation, decode_animation, decode_animation_bytes, decode_still};
pub use encode::{encode_gif, encode_gif_to_path};
pub use error::{GifsmithError, GifsmithResult};
pub use frame::{CanvasBounds, ComposedFrame, DeltaRect, FrameDelta};
pub use label::{LabelCompositor, LabelStyle};
pub use pipeline::{LabelFrames, LabelSpec, PipelineOptions, PipelineReport, run, run_still};
