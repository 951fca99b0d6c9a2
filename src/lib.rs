//! lyricclip composes short portrait lyric video clips.
//!
//! A job takes a still image, a music track and its timestamped lyrics, and a time window of the
//! track. It runs four stages in order:
//!
//! - [`motion`]: pan the scaled image along a closed-form wave and encode the silent video
//! - [`lyrics::align`]: cut the lyric track down to clip-relative timed entries
//! - [`overlay`]: composite each visible entry's wrapped text onto every frame
//! - [`assemble`]: trim the audio to the window and mux it with the text video
//!
//! [`pipeline::run_job`] drives all of them from one [`ClipConfig`].
#![forbid(unsafe_code)]

mod foundation;

/// Audio trimming and final muxing.
pub mod assemble;
/// Input images and ffmpeg media access.
pub mod assets;
/// Job configuration.
pub mod config;
/// Frame sources and sinks.
pub mod encode;
/// Lyric tracks and window alignment.
pub mod lyrics;
/// Background motion.
pub mod motion;
/// Text overlay.
pub mod overlay;
/// End-to-end jobs.
pub mod pipeline;

pub use crate::foundation::core::{Canvas, ClipWindow, Fps, FrameIndex, Point, Vec2};
pub use crate::foundation::error::{ClipError, ClipResult, FailureKind, JobWarning};
pub use crate::foundation::frame::FrameRGBA;

pub use crate::config::{ClipConfig, MotionParameters, OverlayConfig, TextPlacement, TextStyle};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::source::{FrameSource, InMemorySource, SourceInfo};
pub use crate::lyrics::align::{align, window_text};
pub use crate::lyrics::{LyricLine, LyricRecord, TimedTextEntry, load_lyric_track};
pub use crate::motion::{MotionFrames, MotionPath};
pub use crate::pipeline::{JobInputs, JobReport, run_job};
