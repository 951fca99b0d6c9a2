use rayon::prelude::*;

use crate::config::{OverlayConfig, RenderThreading, TextPlacement};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::encode::source::FrameSource;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::frame::FrameRGBA;
use crate::lyrics::TimedTextEntry;
use crate::overlay::text::{LineDraw, LineExtent, TextLayer, TextRasterizer};
use crate::overlay::transform::ScriptTransform;
use crate::overlay::wrap::wrap_text;

/// Upper bound on decoded frames held in memory per chunk.
const MAX_CHUNK_BYTES: u64 = 512 * 1024 * 1024;

/// Lay out a wrapped, transformed block of lines.
///
/// Lines are stacked with `line_spacing_px` between them (not after the last). The block is
/// centered vertically (`Mid`) or centered with `bottom_offset_px` added before halving
/// (`Bottom`); each line is centered horizontally by its own width. Every line yields a shadow
/// draw followed by the text draw. Empty lines take no height and are not drawn.
pub fn layout_block(
    lines: &[String],
    extents: &[LineExtent],
    canvas: Canvas,
    cfg: &OverlayConfig,
) -> Vec<LineDraw> {
    debug_assert_eq!(lines.len(), extents.len());
    if lines.is_empty() {
        return Vec::new();
    }

    let spacing = cfg.line_spacing_px;
    let total: f32 =
        extents.iter().map(|e| e.height).sum::<f32>() + spacing * (lines.len() - 1) as f32;
    let frame_h = canvas.height as f32;
    let mut y = match cfg.placement {
        TextPlacement::Mid => ((frame_h - total) / 2.0).floor(),
        TextPlacement::Bottom => ((frame_h - total + cfg.bottom_offset_px as f32) / 2.0).floor(),
    };

    let shadow = cfg.shadow_offset_px as f32;
    let mut draws = Vec::with_capacity(lines.len() * 2);
    for (text, ext) in lines.iter().zip(extents) {
        if !text.is_empty() {
            let x = ((canvas.width as f32 - ext.width) / 2.0).floor();
            draws.push(LineDraw {
                text: text.clone(),
                x: x + shadow,
                y: y + shadow,
                rgba: cfg.shadow_rgba,
            });
            draws.push(LineDraw {
                text: text.clone(),
                x,
                y,
                rgba: cfg.text_rgba,
            });
        }
        y += ext.height + spacing;
    }
    draws
}

/// Wrap, transform, measure, lay out and rasterize one entry's text.
pub fn render_entry_layer(
    rasterizer: &mut dyn TextRasterizer,
    text: &str,
    canvas: Canvas,
    cfg: &OverlayConfig,
    transform: &dyn ScriptTransform,
) -> ClipResult<Option<TextLayer>> {
    let lines: Vec<String> = wrap_text(text, cfg.max_line_chars)
        .iter()
        .map(|l| transform.apply(l))
        .collect();
    let extents = lines
        .iter()
        .map(|l| rasterizer.measure(l))
        .collect::<ClipResult<Vec<_>>>()?;
    let draws = layout_block(&lines, &extents, canvas, cfg);
    rasterizer.rasterize(canvas, &draws)
}

/// Timed text ready to composite: one pre-rendered layer per entry.
#[derive(Clone, Debug, Default)]
pub struct TextOverlay {
    entries: Vec<TimedTextEntry>,
    layers: Vec<Option<TextLayer>>,
}

impl TextOverlay {
    /// An overlay that draws nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Render every entry's layer, on `pool` when given.
    ///
    /// `make_rasterizer` runs once per worker.
    pub fn prepare<R, F>(
        entries: Vec<TimedTextEntry>,
        canvas: Canvas,
        cfg: &OverlayConfig,
        transform: &dyn ScriptTransform,
        make_rasterizer: F,
        pool: Option<&rayon::ThreadPool>,
    ) -> ClipResult<Self>
    where
        R: TextRasterizer,
        F: Fn() -> ClipResult<R> + Sync,
    {
        let render_all = || -> ClipResult<Vec<Option<TextLayer>>> {
            entries
                .par_iter()
                .map_init(&make_rasterizer, |r, e| match r {
                    Ok(r) => render_entry_layer(r, &e.text, canvas, cfg, transform),
                    Err(err) => Err(ClipError::validation(format!(
                        "text rasterizer unavailable: {err}"
                    ))),
                })
                .collect()
        };

        let layers = match pool {
            Some(pool) => pool.install(render_all)?,
            None => {
                let mut r = make_rasterizer()?;
                entries
                    .iter()
                    .map(|e| render_entry_layer(&mut r, &e.text, canvas, cfg, transform))
                    .collect::<ClipResult<Vec<_>>>()?
            }
        };
        tracing::debug!(
            entries = entries.len(),
            inked = layers.iter().filter(|l| l.is_some()).count(),
            "prepared text layers"
        );
        Ok(Self { entries, layers })
    }

    pub fn entries(&self) -> &[TimedTextEntry] {
        &self.entries
    }

    /// Layers of every entry visible at `t` seconds, in entry order.
    pub fn visible_at(&self, t: f64) -> impl Iterator<Item = &TextLayer> {
        self.entries
            .iter()
            .zip(&self.layers)
            .filter(move |(e, _)| e.is_visible_at(t))
            .filter_map(|(_, l)| l.as_ref())
    }

    /// Composite the text visible at `t` over `frame`.
    pub fn apply(&self, frame: &mut FrameRGBA, t: f64) {
        for layer in self.visible_at(t) {
            layer.composite_onto(frame);
        }
    }
}

/// Result of [`overlay_stream`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayStats {
    /// Frames read from the source and written to the sink.
    pub frames: u64,
    /// Frames that received at least one text layer.
    pub frames_with_text: u64,
}

/// Copy every frame of `source` into `sink`, compositing the text visible at each frame's time.
///
/// Frames are processed in chunks; within a chunk they are composited on `pool` when given and
/// always delivered to the sink in index order. Output keeps the source's size, rate and frame
/// count.
#[tracing::instrument(skip_all, fields(entries = overlay.entries().len()))]
pub fn overlay_stream(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    overlay: &TextOverlay,
    threading: RenderThreading,
    pool: Option<&rayon::ThreadPool>,
) -> ClipResult<OverlayStats> {
    let info = source.info();
    let fps = info.fps;
    let chunk_size = chunk_size_for(threading.chunk_size, info.width, info.height);

    sink.begin(SinkConfig {
        width: info.width,
        height: info.height,
        fps,
    })?;

    let mut stats = OverlayStats::default();
    loop {
        let mut chunk = source.next_chunk(chunk_size)?;
        if chunk.is_empty() {
            break;
        }

        let composite = |(idx, frame): &mut (FrameIndex, FrameRGBA)| -> bool {
            let t = frame_time(fps, *idx);
            let before = overlay.visible_at(t).next().is_some();
            overlay.apply(frame, t);
            before
        };
        let with_text: u64 = match pool {
            Some(pool) => pool.install(|| {
                chunk
                    .par_iter_mut()
                    .map(composite)
                    .filter(|b| *b)
                    .count() as u64
            }),
            None => chunk.iter_mut().map(composite).filter(|b| *b).count() as u64,
        };

        for (idx, frame) in &chunk {
            sink.push_frame(*idx, frame)?;
        }
        stats.frames += chunk.len() as u64;
        stats.frames_with_text += with_text;
    }
    sink.end()?;

    tracing::info!(
        frames = stats.frames,
        frames_with_text = stats.frames_with_text,
        "overlaid text"
    );
    Ok(stats)
}

fn frame_time(fps: Fps, idx: FrameIndex) -> f64 {
    idx.0 as f64 / fps.as_f64()
}

fn chunk_size_for(requested: usize, width: u32, height: u32) -> usize {
    let bytes_per_frame = (width as u64)
        .saturating_mul(height as u64)
        .saturating_mul(4)
        .max(1);
    let max_by_mem = (MAX_CHUNK_BYTES / bytes_per_frame).max(1) as usize;
    requested.max(1).min(max_by_mem)
}

/// Build the overlay worker pool, or `None` for sequential rendering.
pub fn build_thread_pool(threading: RenderThreading) -> ClipResult<Option<rayon::ThreadPool>> {
    if !threading.parallel {
        return Ok(None);
    }
    if let Some(n) = threading.threads
        && n == 0
    {
        return Err(ClipError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threading.threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| ClipError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/renderer.rs"]
mod tests;
