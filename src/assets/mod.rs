//! Input assets: raster images and ffmpeg-decoded media.

/// Raster image decoding and scaling.
pub mod decode;
/// `ffprobe`/`ffmpeg` backed video and audio access.
pub mod media;
