//! Label burning: shaping text with Parley and rasterizing the glyph run
//! onto a copy of a composed frame.

use std::path::Path;

use crate::{
    composite::over_in_place,
    error::{GifsmithError, GifsmithResult},
    frame::ComposedFrame,
};

/// RGBA8 brush color carried through Parley's layout styling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

#[derive(Clone, Copy, Debug)]
pub struct LabelStyle {
    pub size_px: f32,
    /// Straight-alpha foreground color, drawn opaquely over the frame.
    pub color: [u8; 4],
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            size_px: 40.0,
            color: [255, 255, 255, 255],
        }
    }
}

/// Renders text labels onto frames using a single cached font face.
///
/// Shaping covers whatever script set the face supports; characters the face
/// lacks fall back to its missing-glyph behavior instead of failing the
/// operation. Compositing never mutates the input frame.
pub struct LabelCompositor {
    font: vello_cpu::peniko::FontData,
    family_name: String,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<BrushRgba8>,
}

impl LabelCompositor {
    pub fn from_font_path(path: &Path) -> GifsmithResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            GifsmithError::font_load(format!("cannot read font '{}': {e}", path.display()))
        })?;
        Self::from_font_bytes(bytes)
    }

    pub fn from_font_bytes(bytes: Vec<u8>) -> GifsmithResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| GifsmithError::font_load("font data contains no parsable face"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GifsmithError::font_load("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        Ok(Self {
            font,
            family_name,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Burn `text` onto a copy of `frame`, anchoring the first baseline at
    /// `point`. Only pixels under glyph coverage change; glyph pixels that
    /// fall outside the canvas are clipped silently.
    pub fn composite(
        &mut self,
        frame: &ComposedFrame,
        text: &str,
        point: (f32, f32),
        style: LabelStyle,
    ) -> GifsmithResult<ComposedFrame> {
        let layout = self.layout(text, style)?;
        let layer = self.rasterize(&layout, frame.width, frame.height, point)?;

        let mut out = frame.clone();
        over_in_place(&mut out.rgba8_premul, &layer)?;
        Ok(out)
    }

    fn layout(
        &mut self,
        text: &str,
        style: LabelStyle,
    ) -> GifsmithResult<parley::Layout<BrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(GifsmithError::invariant(
                "label size_px must be finite and > 0",
            ));
        }

        let [r, g, b, a] = style.color;
        let brush = BrushRgba8 { r, g, b, a };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<BrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Rasterize the glyph run into a transparent canvas-sized layer in
    /// premultiplied RGBA8.
    fn rasterize(
        &self,
        layout: &parley::Layout<BrushRgba8>,
        width: u32,
        height: u32,
        point: (f32, f32),
    ) -> GifsmithResult<Vec<u8>> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| GifsmithError::invariant("canvas width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| GifsmithError::invariant("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);

        // Layout coordinates put the first baseline at `baseline` below the
        // layout origin; shift so the baseline itself sits at `point`.
        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(0.0);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(point.0),
            f64::from(point.1) - f64::from(baseline),
        )));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_font_is_font_load_failure() {
        assert!(matches!(
            LabelCompositor::from_font_bytes(vec![0u8; 32]),
            Err(GifsmithError::FontLoad(_))
        ));
    }

    #[test]
    fn missing_font_file_is_font_load_failure() {
        assert!(matches!(
            LabelCompositor::from_font_path(Path::new("/no/such/face.ttf")),
            Err(GifsmithError::FontLoad(_))
        ));
    }
}
