//! Job configuration.
//!
//! Every tuning knob of the pipeline lives here as a named, overridable value. A [`ClipConfig`]
//! is resolved once per job (defaults, then an optional JSON file, then CLI overrides) and is
//! passed by reference into each stage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ClipError, ClipResult};

/// Name of the style that needs no font file and no transliteration.
pub const DEFAULT_STYLE: &str = "default";

/// Complete per-job configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClipConfig {
    /// Output frame geometry shared by every stage.
    pub canvas: CanvasConfig,
    /// Pan/wave motion tuning.
    pub motion: MotionParameters,
    /// Text overlay layout and style selection.
    pub overlay: OverlayConfig,
    /// Style id to font/transliteration table.
    pub styles: BTreeMap<String, TextStyle>,
    /// Delay added to every lyric onset, in seconds.
    pub lead_in_secs: f64,
    /// Overlay worker pool settings.
    pub render: RenderThreading,
    /// PCM format used between trim and mux.
    pub audio: AudioFormat,
    /// Keep the raw and text-only intermediate videos after a successful job.
    pub keep_intermediates: bool,
}

impl Default for ClipConfig {
    fn default() -> Self {
        let mut styles = BTreeMap::new();
        styles.insert(DEFAULT_STYLE.to_owned(), TextStyle::default());
        Self {
            canvas: CanvasConfig::default(),
            motion: MotionParameters::default(),
            overlay: OverlayConfig::default(),
            styles,
            lead_in_secs: 0.10,
            render: RenderThreading::default(),
            audio: AudioFormat::default(),
            keep_intermediates: false,
        }
    }
}

/// Output frame geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Integer frames per second.
    pub fps: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 900,
            fps: 60,
        }
    }
}

impl CanvasConfig {
    pub fn canvas(self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn fps(self) -> ClipResult<Fps> {
        Fps::new(self.fps, 1)
    }
}

/// Constant motion tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionParameters {
    /// Vertical cycles per second.
    pub vertical_speed: f64,
    /// Horizontal oscillations per vertical cycle.
    pub horizontal_oscillations: f64,
    /// Fraction of the pan range used horizontally.
    pub wave_amplitude: f64,
    /// Fraction of the pan range used vertically.
    pub wave_height: f64,
    /// Uniform image scale applied before animation, anchored on width.
    pub scale_factor: f64,
}

impl Default for MotionParameters {
    fn default() -> Self {
        Self {
            vertical_speed: 0.25,
            horizontal_oscillations: 2.0,
            wave_amplitude: 0.4,
            wave_height: 0.5,
            scale_factor: 0.8,
        }
    }
}

/// Vertical anchor of the lyric text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPlacement {
    /// Centered in the frame.
    #[default]
    Mid,
    /// Centered, then pushed down by `bottom_offset_px`.
    Bottom,
}

impl std::str::FromStr for TextPlacement {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mid" => Ok(Self::Mid),
            "bottom" => Ok(Self::Bottom),
            other => Err(ClipError::validation(format!(
                "unknown text placement '{other}' (expected 'mid' or 'bottom')"
            ))),
        }
    }
}

/// Text overlay layout.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Maximum characters per wrapped line.
    pub max_line_chars: usize,
    /// Vertical gap between consecutive lines, in pixels.
    pub line_spacing_px: f32,
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Vertical anchor.
    pub placement: TextPlacement,
    /// Offset folded into the centering formula for [`TextPlacement::Bottom`].
    pub bottom_offset_px: i32,
    /// Shadow displacement on both axes, in pixels.
    pub shadow_offset_px: i32,
    /// Text fill color, straight-alpha RGBA8.
    pub text_rgba: [u8; 4],
    /// Shadow fill color, straight-alpha RGBA8.
    pub shadow_rgba: [u8; 4],
    /// Key into [`ClipConfig::styles`].
    pub style: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            max_line_chars: 35,
            line_spacing_px: 10.0,
            font_size_px: 30.0,
            placement: TextPlacement::Mid,
            bottom_offset_px: 250,
            shadow_offset_px: 2,
            text_rgba: [255, 255, 255, 255],
            shadow_rgba: [0, 0, 0, 255],
            style: DEFAULT_STYLE.to_owned(),
        }
    }
}

/// One selectable text style.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    /// Font file (TTF/OTF/TTC). `None` uses the built-in fallback face.
    pub font_path: Option<PathBuf>,
    /// Ordered `[from, to]` replacement table applied to each wrapped line.
    pub transliteration: Option<PathBuf>,
}

/// Overlay worker pool settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderThreading {
    /// Render frames on a worker pool when `true`.
    pub parallel: bool,
    /// Frames decoded and rendered per batch.
    pub chunk_size: usize,
    /// Explicit worker count; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Interleaved `f32le` PCM format used for the trimmed clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
        }
    }
}

impl ClipConfig {
    /// Load a config from JSON. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> ClipResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClipError::missing_asset(path, e))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges and cross-field consistency.
    pub fn validate(&self) -> ClipResult<()> {
        let c = self.canvas;
        if c.width == 0 || c.height == 0 {
            return Err(ClipError::validation("canvas width/height must be non-zero"));
        }
        if !c.width.is_multiple_of(2) || !c.height.is_multiple_of(2) {
            return Err(ClipError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if c.width > u32::from(u16::MAX) || c.height > u32::from(u16::MAX) {
            return Err(ClipError::validation("canvas width/height must fit in u16"));
        }
        if c.fps == 0 {
            return Err(ClipError::validation("canvas fps must be > 0"));
        }

        let m = self.motion;
        for (name, v) in [
            ("vertical_speed", m.vertical_speed),
            ("horizontal_oscillations", m.horizontal_oscillations),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ClipError::validation(format!(
                    "motion.{name} must be finite and >= 0"
                )));
            }
        }
        // Fractions of the pan range; above 1 the image edge enters the frame.
        for (name, v) in [
            ("wave_amplitude", m.wave_amplitude),
            ("wave_height", m.wave_height),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ClipError::validation(format!(
                    "motion.{name} must be within [0, 1]"
                )));
            }
        }
        if !m.scale_factor.is_finite() || m.scale_factor <= 0.0 {
            return Err(ClipError::validation(
                "motion.scale_factor must be finite and > 0",
            ));
        }

        let o = &self.overlay;
        if o.max_line_chars == 0 {
            return Err(ClipError::validation("overlay.max_line_chars must be >= 1"));
        }
        if !o.font_size_px.is_finite() || o.font_size_px <= 0.0 {
            return Err(ClipError::validation(
                "overlay.font_size_px must be finite and > 0",
            ));
        }
        if !o.line_spacing_px.is_finite() || o.line_spacing_px < 0.0 {
            return Err(ClipError::validation(
                "overlay.line_spacing_px must be finite and >= 0",
            ));
        }
        if !self.styles.contains_key(&o.style) {
            return Err(ClipError::validation(format!(
                "overlay.style '{}' is not defined in styles",
                o.style
            )));
        }

        if !self.lead_in_secs.is_finite() || self.lead_in_secs < 0.0 {
            return Err(ClipError::validation("lead_in_secs must be finite and >= 0"));
        }
        if let Some(0) = self.render.threads {
            return Err(ClipError::validation(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        if self.audio.sample_rate == 0 || self.audio.channels == 0 {
            return Err(ClipError::validation(
                "audio sample_rate/channels must be non-zero",
            ));
        }
        Ok(())
    }

    /// The style selected by `overlay.style`.
    pub fn selected_style(&self) -> ClipResult<&TextStyle> {
        self.styles.get(&self.overlay.style).ok_or_else(|| {
            ClipError::validation(format!(
                "overlay.style '{}' is not defined in styles",
                self.overlay.style
            ))
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
