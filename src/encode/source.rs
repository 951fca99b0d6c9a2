use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::frame::FrameRGBA;

/// Stream properties reported by a [`FrameSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Nominal frame rate.
    pub fps: Fps,
    /// Container duration in seconds, when known.
    pub duration_secs: Option<f64>,
}

/// Sequential frame producer.
///
/// Frames are returned in strictly increasing index order starting at 0; `Ok(None)` marks the
/// end of the stream and is sticky.
pub trait FrameSource: Send {
    fn info(&self) -> SourceInfo;
    fn next_frame(&mut self) -> ClipResult<Option<(FrameIndex, FrameRGBA)>>;

    /// Pull up to `max` frames.
    fn next_chunk(&mut self, max: usize) -> ClipResult<Vec<(FrameIndex, FrameRGBA)>> {
        let mut out = Vec::with_capacity(max);
        while out.len() < max {
            match self.next_frame()? {
                Some(f) => out.push(f),
                None => break,
            }
        }
        Ok(out)
    }
}

/// Source over frames already held in memory.
#[derive(Debug)]
pub struct InMemorySource {
    info: SourceInfo,
    frames: std::vec::IntoIter<FrameRGBA>,
    next: u64,
}

impl InMemorySource {
    /// Wrap `frames`, all of which must match `width`x`height`.
    pub fn new(frames: Vec<FrameRGBA>, fps: Fps) -> ClipResult<Self> {
        let (width, height) = frames
            .first()
            .map(|f| (f.width, f.height))
            .ok_or_else(|| ClipError::validation("in-memory source needs at least one frame"))?;
        if frames.iter().any(|f| f.width != width || f.height != height) {
            return Err(ClipError::validation(
                "in-memory source frames must share one size",
            ));
        }
        let duration_secs = Some(frames.len() as f64 * fps.frame_duration_secs());
        Ok(Self {
            info: SourceInfo {
                width,
                height,
                fps,
                duration_secs,
            },
            frames: frames.into_iter(),
            next: 0,
        })
    }
}

impl FrameSource for InMemorySource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn next_frame(&mut self) -> ClipResult<Option<(FrameIndex, FrameRGBA)>> {
        Ok(self.frames.next().map(|f| {
            let idx = FrameIndex(self.next);
            self.next += 1;
            (idx, f)
        }))
    }
}
