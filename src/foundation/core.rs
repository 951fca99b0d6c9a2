use crate::foundation::error::{ClipError, ClipResult};

pub use kurbo::{Point, Vec2};

/// Absolute 0-based frame index in clip timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ClipResult<Self> {
        if den == 0 {
            return Err(ClipError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ClipError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse an `ffprobe`-style rate such as `60/1` or `30000/1001`.
    pub fn parse_ratio(s: &str) -> ClipResult<Self> {
        let (num, den) = s.trim().split_once('/').unwrap_or((s.trim(), "1"));
        let num = num
            .parse::<u32>()
            .map_err(|_| ClipError::validation(format!("invalid frame rate '{s}'")))?;
        let den = den
            .parse::<u32>()
            .map_err(|_| ClipError::validation(format!("invalid frame rate '{s}'")))?;
        Self::new(num, den)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timeline time of a frame's first instant, in seconds.
    pub fn frame_time_secs(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * self.frame_duration_secs()
    }

    /// Number of frames needed to cover `secs`.
    ///
    /// Frames sample `0, 1/fps, 2/fps, ...` strictly below `secs`, so a 10 s clip at 60 fps has
    /// exactly 600 frames. The epsilon absorbs float noise in `secs * fps`.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        (secs * self.as_f64() - 1e-9).ceil().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Byte length of one tightly packed RGBA8 frame.
    pub fn rgba_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Caller-chosen `[start, end)` time range of the source track, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipWindow {
    /// Inclusive window start in source-track seconds.
    pub start: f64,
    /// Exclusive window end in source-track seconds.
    pub end: f64,
}

impl ClipWindow {
    /// Create a validated window with `0 <= start < end`.
    pub fn new(start: f64, end: f64) -> ClipResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ClipError::validation("clip window bounds must be finite"));
        }
        if start < 0.0 {
            return Err(ClipError::validation("clip window start must be >= 0"));
        }
        if start >= end {
            return Err(ClipError::validation(format!(
                "clip window start ({start}) must be < end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Window length in seconds.
    pub fn duration(self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
