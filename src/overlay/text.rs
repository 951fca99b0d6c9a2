//! Line measurement and rasterization.

use crate::foundation::core::Canvas;
use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::frame::FrameRGBA;
use crate::overlay::font::ResolvedFont;

/// Measured size of one line, in pixels, from the line's top-left draw origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineExtent {
    /// Horizontal advance.
    pub width: f32,
    /// Line box height.
    pub height: f32,
}

/// One line to fill at a top-left origin.
#[derive(Clone, Debug, PartialEq)]
pub struct LineDraw {
    /// Text after wrapping and script transform.
    pub text: String,
    /// Left edge in frame pixels.
    pub x: f32,
    /// Top edge in frame pixels.
    pub y: f32,
    /// Fill color, straight-alpha RGBA8.
    pub rgba: [u8; 4],
}

/// Premultiplied RGBA8 pixels covering only the inked part of a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLayer {
    /// Left edge in frame pixels.
    pub x: i64,
    /// Top edge in frame pixels.
    pub y: i64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub data: Vec<u8>,
}

impl TextLayer {
    /// Crop a full-canvas premultiplied buffer to its non-transparent bounding box.
    ///
    /// Returns `None` when nothing was inked.
    pub fn crop_from_canvas(canvas: Canvas, rgba: &[u8]) -> Option<Self> {
        let w = canvas.width as usize;
        let h = canvas.height as usize;
        debug_assert_eq!(rgba.len(), w * h * 4);

        let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0usize, 0usize);
        for (y, row) in rgba.chunks_exact(w * 4).enumerate() {
            for (x, px) in row.chunks_exact(4).enumerate() {
                if px[3] != 0 {
                    x0 = x0.min(x);
                    x1 = x1.max(x + 1);
                    y0 = y0.min(y);
                    y1 = y1.max(y + 1);
                }
            }
        }
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        let cw = x1 - x0;
        let mut data = Vec::with_capacity(cw * (y1 - y0) * 4);
        for y in y0..y1 {
            let off = (y * w + x0) * 4;
            data.extend_from_slice(&rgba[off..off + cw * 4]);
        }
        Some(Self {
            x: x0 as i64,
            y: y0 as i64,
            width: cw as u32,
            height: (y1 - y0) as u32,
            data,
        })
    }

    /// Composite this layer over `frame`.
    pub fn composite_onto(&self, frame: &mut FrameRGBA) {
        frame.blit_over(&self.data, self.width, self.height, self.x, self.y);
    }
}

/// Measures and draws single lines of text.
pub trait TextRasterizer {
    /// Size of `line` as drawn from a top-left origin. Empty lines measure zero.
    fn measure(&mut self, line: &str) -> ClipResult<LineExtent>;

    /// Fill `draws` in order onto a transparent `canvas`-sized surface.
    fn rasterize(&mut self, canvas: Canvas, draws: &[LineDraw]) -> ClipResult<Option<TextLayer>>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// [`TextRasterizer`] shaping with `parley` and filling glyphs with `vello_cpu`.
pub struct ParleyRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    size_px: f32,
}

impl ParleyRasterizer {
    /// Register `font` with a fresh layout engine.
    pub fn new(font: &ResolvedFont, size_px: f32) -> ClipResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ClipError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        // Prefer the family holding the resolved face of a collection.
        let family_id = families
            .iter()
            .find(|(_, faces)| faces.iter().any(|f| f.index() == font.index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| ClipError::validation("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ClipError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            size_px,
        })
    }

    fn layout(&mut self, text: &str, brush: TextBrushRgba8) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextRasterizer for ParleyRasterizer {
    fn measure(&mut self, line: &str) -> ClipResult<LineExtent> {
        if line.is_empty() {
            return Ok(LineExtent::default());
        }
        let layout = self.layout(line, TextBrushRgba8::default());
        Ok(LineExtent {
            width: layout.width(),
            height: layout.height(),
        })
    }

    fn rasterize(&mut self, canvas: Canvas, draws: &[LineDraw]) -> ClipResult<Option<TextLayer>> {
        let width = u16::try_from(canvas.width)
            .map_err(|_| ClipError::validation("canvas width must fit in u16"))?;
        let height = u16::try_from(canvas.height)
            .map_err(|_| ClipError::validation("canvas height must fit in u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);

        for d in draws.iter().filter(|d| !d.text.is_empty()) {
            let [r, g, b, a] = d.rgba;
            let layout = self.layout(&d.text, TextBrushRgba8 { r, g, b, a });
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(d.x),
                f64::from(d.y),
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
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    // Fill with the face the run was shaped with.
                    ctx.glyph_run(run.run().font())
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(TextLayer::crop_from_canvas(canvas, pixmap.data_as_u8_slice()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/text.rs"]
mod tests;
