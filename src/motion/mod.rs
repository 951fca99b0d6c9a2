//! Pan/wave motion over a still image.
//!
//! [`MotionPath`] is the pure part: a closed-form offset of the image center from the frame
//! center as a function of time. [`MotionFrames`] composites the scaled image at that offset for
//! every frame of the clip, and [`animate`] streams those frames into a [`FrameSink`].

use std::f64::consts::TAU;

use crate::assets::decode::PreparedImage;
use crate::config::MotionParameters;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Vec2};
use crate::foundation::error::{ClipError, ClipResult, JobWarning};
use crate::foundation::frame::FrameRGBA;

/// Closed-form motion of a scaled image inside a fixed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionPath {
    frame: Canvas,
    image_width: u32,
    image_height: u32,
    params: MotionParameters,
    horizontal_range: f64,
    vertical_range: f64,
}

impl MotionPath {
    /// Build the path for an image of `image_width`x`image_height` (already scaled).
    pub fn new(frame: Canvas, image_width: u32, image_height: u32, params: MotionParameters) -> Self {
        let max_x = ((f64::from(image_width) - f64::from(frame.width)) / 2.0).max(0.0);
        let max_y = ((f64::from(image_height) - f64::from(frame.height)) / 2.0).max(0.0);
        let base = max_x.min(max_y);
        Self {
            frame,
            image_width,
            image_height,
            params,
            horizontal_range: base * params.wave_amplitude,
            vertical_range: base * params.wave_height,
        }
    }

    /// Peak horizontal offset in pixels.
    pub fn horizontal_range(&self) -> f64 {
        self.horizontal_range
    }

    /// Peak vertical offset in pixels.
    pub fn vertical_range(&self) -> f64 {
        self.vertical_range
    }

    /// Warning to surface when the image does not exceed the frame on some axis.
    pub fn degenerate_warning(&self) -> Option<JobWarning> {
        (self.image_width <= self.frame.width || self.image_height <= self.frame.height).then_some(
            JobWarning::DegenerateMotionRange {
                image_width: self.image_width,
                image_height: self.image_height,
                frame_width: self.frame.width,
                frame_height: self.frame.height,
            },
        )
    }

    /// Offset of the image center from the frame center at `t` seconds.
    pub fn offset(&self, t: f64) -> Vec2 {
        let angle = TAU * self.params.vertical_speed * t;
        Vec2::new(
            self.horizontal_range * (self.params.horizontal_oscillations * angle).sin(),
            -self.vertical_range * angle.cos(),
        )
    }

    /// Top-left placement of the image at `t` seconds, in frame pixels.
    pub fn position(&self, t: f64) -> Point {
        let center = Point::new(
            f64::from(self.frame.width) / 2.0,
            f64::from(self.frame.height) / 2.0,
        );
        let half = Vec2::new(
            f64::from(self.image_width) / 2.0,
            f64::from(self.image_height) / 2.0,
        );
        center + self.offset(t) - half
    }
}

/// Frame producer compositing a scaled image along a [`MotionPath`] over opaque black.
#[derive(Clone, Debug)]
pub struct MotionFrames {
    image: PreparedImage,
    path: MotionPath,
    fps: Fps,
    frame_count: u64,
}

impl MotionFrames {
    /// Frames covering `duration_secs` of motion for an already scaled `image`.
    pub fn new(
        image: PreparedImage,
        frame: Canvas,
        fps: Fps,
        params: MotionParameters,
        duration_secs: f64,
    ) -> ClipResult<Self> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(ClipError::validation(format!(
                "motion duration must be finite and > 0, got {duration_secs}"
            )));
        }
        let path = MotionPath::new(frame, image.width, image.height, params);
        Ok(Self {
            image,
            path,
            fps,
            frame_count: fps.secs_to_frames_ceil(duration_secs),
        })
    }

    pub fn path(&self) -> &MotionPath {
        &self.path
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Render frame `idx`.
    pub fn render(&self, idx: FrameIndex) -> FrameRGBA {
        let t = self.fps.frame_time_secs(idx);
        let p = self.path.position(t);
        let mut frame = FrameRGBA::filled(self.path.frame, [0, 0, 0, 255]);
        frame.blit_over(
            &self.image.rgba8_premul,
            self.image.width,
            self.image.height,
            p.x.round() as i64,
            p.y.round() as i64,
        );
        frame
    }
}

/// Result of [`animate`].
#[derive(Clone, Debug, PartialEq)]
pub struct AnimateReport {
    /// Frames written to the sink.
    pub frames: u64,
    /// Non-fatal conditions found while animating.
    pub warnings: Vec<JobWarning>,
}

/// Render every motion frame into `sink`, bracketed by `begin`/`end`.
#[tracing::instrument(skip_all, fields(frames = frames.frame_count()))]
pub fn animate(frames: &MotionFrames, sink: &mut dyn FrameSink) -> ClipResult<AnimateReport> {
    let mut warnings = Vec::new();
    if let Some(w) = frames.path.degenerate_warning() {
        tracing::warn!(warning = %w, "motion range is degenerate");
        warnings.push(w);
    }

    sink.begin(SinkConfig {
        width: frames.path.frame.width,
        height: frames.path.frame.height,
        fps: frames.fps,
    })?;
    for i in 0..frames.frame_count {
        let idx = FrameIndex(i);
        sink.push_frame(idx, &frames.render(idx))?;
    }
    sink.end()?;

    tracing::info!(
        frames = frames.frame_count,
        horizontal_range = frames.path.horizontal_range,
        vertical_range = frames.path.vertical_range,
        "animated background"
    );
    Ok(AnimateReport {
        frames: frames.frame_count,
        warnings,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/motion/mod.rs"]
mod tests;
