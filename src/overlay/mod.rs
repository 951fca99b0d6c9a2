//! Timed lyric text over a rendered video stream.
//!
//! Entry text is wrapped, optionally transliterated, measured and rasterized once per entry into
//! a cropped layer; each decoded frame then receives the layers of every entry visible at its
//! time.

use std::path::Path;

use crate::assets::media::FfmpegFrameReader;
use crate::config::{ClipConfig, TextStyle};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::foundation::error::{ClipResult, JobWarning};
use crate::lyrics::TimedTextEntry;

pub mod font;
pub mod renderer;
pub mod text;
pub mod transform;
pub mod wrap;

pub use renderer::{OverlayStats, TextOverlay, overlay_stream};

use self::font::resolve_font;
use self::text::ParleyRasterizer;
use self::transform::{Identity, ReplacementTable, ScriptTransform};

/// Result of [`render_overlay`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayReport {
    /// Frame counters.
    pub stats: OverlayStats,
    /// Non-fatal conditions found while preparing text.
    pub warnings: Vec<JobWarning>,
}

/// Load the style's script transform. A configured table that cannot be read fails the job.
pub fn load_transform(style: &TextStyle) -> ClipResult<Box<dyn ScriptTransform>> {
    Ok(match style.transliteration.as_deref() {
        Some(path) => Box::new(ReplacementTable::from_json_file(path)?),
        None => Box::new(Identity),
    })
}

/// Build the overlay for `entries` with the configured style.
pub fn prepare_overlay(
    entries: Vec<TimedTextEntry>,
    cfg: &ClipConfig,
    pool: Option<&rayon::ThreadPool>,
) -> ClipResult<(TextOverlay, Vec<JobWarning>)> {
    if entries.is_empty() {
        return Ok((TextOverlay::empty(), Vec::new()));
    }

    let style = cfg.selected_style()?;
    let transform = load_transform(style)?;
    let resolution = resolve_font(&cfg.overlay.style, style);
    let Some(font) = resolution.font else {
        return Ok((TextOverlay::empty(), resolution.warnings));
    };

    let size_px = cfg.overlay.font_size_px;
    let overlay = TextOverlay::prepare(
        entries,
        cfg.canvas.canvas(),
        &cfg.overlay,
        transform.as_ref(),
        || ParleyRasterizer::new(&font, size_px),
        pool,
    )?;
    Ok((overlay, resolution.warnings))
}

/// Decode `input`, composite `entries` and encode the result to `output`.
#[tracing::instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn render_overlay(
    input: &Path,
    output: &Path,
    entries: Vec<TimedTextEntry>,
    cfg: &ClipConfig,
    pool: Option<&rayon::ThreadPool>,
) -> ClipResult<OverlayReport> {
    let (overlay, warnings) = prepare_overlay(entries, cfg, pool)?;

    let mut source = FfmpegFrameReader::open(input)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::intermediate(output));
    let stats = overlay_stream(&mut source, &mut sink, &overlay, cfg.render, pool)?;
    Ok(OverlayReport { stats, warnings })
}
