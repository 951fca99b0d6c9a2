//! Frame streams.
//!
//! Stages exchange frames through these two traits: a [`source::FrameSource`] yields decoded
//! frames in timeline order and a [`sink::FrameSink`] consumes rendered frames in the same order.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
/// Generic frame source trait and built-in sources.
pub mod source;
