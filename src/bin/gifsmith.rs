use std::path::{Path, PathBuf};

use clap::Parser;

// Fixed collaborators; the CLI surface is a single positional input path.
const FONT_PATH: &str = "label.ttf";
const OUT_GIF: &str = "out.gif";
const OUT_STILL: &str = "out.png";
const LABEL_TEXT: &str = "gifsmith";
const LABEL_POINT: (f32, f32) = (100.0, 100.0);
const LABEL_SIZE_PX: f32 = 40.0;
const LABEL_COLOR: [u8; 4] = [125, 184, 236, 255];

#[derive(Parser, Debug)]
#[command(name = "gifsmith", version)]
struct Cli {
    /// Animated GIF to decompose, label, and re-encode.
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = gifsmith::PipelineOptions {
        label: Some(gifsmith::LabelSpec {
            font_path: PathBuf::from(FONT_PATH),
            text: LABEL_TEXT.to_string(),
            point: LABEL_POINT,
            style: gifsmith::LabelStyle {
                size_px: LABEL_SIZE_PX,
                color: LABEL_COLOR,
            },
            frames: gifsmith::LabelFrames::All,
        }),
        still_frame: Some((0, PathBuf::from(OUT_STILL))),
    };

    let report = gifsmith::run(&cli.input, Path::new(OUT_GIF), &options)?;

    eprintln!(
        "wrote {} ({} frames, {}x{})",
        report.out_gif.display(),
        report.frame_count,
        report.canvas_width,
        report.canvas_height
    );
    if let Some(still) = &report.out_still {
        eprintln!("wrote {}", still.display());
    }
    Ok(())
}
