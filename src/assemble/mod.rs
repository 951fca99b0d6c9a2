//! Audio trimming and final muxing.
//!
//! The trimmed clip travels between the two steps as headerless interleaved `f32le` PCM, so no
//! lossy intermediate audio encode happens before the final AAC pass.

use std::path::Path;
use std::process::Command;

use crate::assets::media::{decode_audio_window_f32le, probe_duration};
use crate::config::AudioFormat;
use crate::encode::ffmpeg::{ensure_parent_dir, is_ffmpeg_on_path, staging_path_for};
use crate::foundation::core::ClipWindow;
use crate::foundation::error::{ClipError, ClipResult};

/// Result of [`trim_audio`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimReport {
    /// Sample frames written (one sample per channel each).
    pub sample_frames: u64,
    /// Length of the written clip in seconds.
    pub duration_secs: f64,
}

/// Result of [`mux`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MuxReport {
    /// Duration of the video input, when the container reports one.
    pub video_secs: Option<f64>,
    /// Duration of the PCM input.
    pub audio_secs: f64,
}

impl MuxReport {
    /// Playable duration of the output: the shorter of the two streams.
    pub fn playable_secs(&self) -> f64 {
        self.video_secs
            .map_or(self.audio_secs, |v| v.min(self.audio_secs))
    }
}

/// Seconds of audio held by `bytes` of interleaved `f32le` PCM.
pub fn pcm_duration_secs(bytes: u64, fmt: AudioFormat) -> f64 {
    let frame_bytes = 4 * u64::from(fmt.channels.max(1));
    (bytes / frame_bytes) as f64 / f64::from(fmt.sample_rate.max(1))
}

/// Extract `[window.start, window.end)` of `audio` into `out` as `f32le` PCM.
#[tracing::instrument(skip_all, fields(audio = %audio.display(), start = window.start, end = window.end))]
pub fn trim_audio(
    audio: &Path,
    window: ClipWindow,
    fmt: AudioFormat,
    out: &Path,
) -> ClipResult<TrimReport> {
    let pcm = decode_audio_window_f32le(audio, window, fmt.sample_rate, fmt.channels)?;
    if pcm.is_empty() {
        return Err(ClipError::encoding(format!(
            "audio window [{}, {}) of '{}' holds no samples",
            window.start,
            window.end,
            audio.display()
        )));
    }

    ensure_parent_dir(out)?;
    let staging = staging_path_for(out);
    std::fs::write(&staging, &pcm).map_err(|e| {
        let _ = std::fs::remove_file(&staging);
        ClipError::encoding(format!("failed to write trimmed audio: {e}"))
    })?;
    std::fs::rename(&staging, out)
        .map_err(|e| ClipError::encoding(format!("failed to move trimmed audio into place: {e}")))?;

    let report = TrimReport {
        sample_frames: pcm.len() as u64 / (4 * u64::from(fmt.channels)),
        duration_secs: pcm_duration_secs(pcm.len() as u64, fmt),
    };
    if report.duration_secs + 1e-3 < window.duration() {
        tracing::warn!(
            requested = window.duration(),
            got = report.duration_secs,
            "audio ends before the clip window"
        );
    }
    tracing::info!(seconds = report.duration_secs, "trimmed audio");
    Ok(report)
}

/// Mux `video` with the `f32le` PCM at `pcm` into an H.264/AAC MP4 at `out`.
///
/// The PCM becomes the only audio track and the video is re-encoded. Stream lengths are not
/// reconciled: `-shortest` ends the output with whichever stream ends first.
#[tracing::instrument(skip_all, fields(video = %video.display(), out = %out.display()))]
pub fn mux(video: &Path, pcm: &Path, fmt: AudioFormat, out: &Path) -> ClipResult<MuxReport> {
    if fmt.sample_rate == 0 || fmt.channels == 0 {
        return Err(ClipError::validation(
            "audio sample_rate/channels must be non-zero",
        ));
    }
    for p in [video, pcm] {
        if !p.exists() {
            return Err(ClipError::missing_asset(p, "file does not exist"));
        }
    }
    if !is_ffmpeg_on_path() {
        return Err(ClipError::encoding(
            "ffmpeg is required for muxing, but was not found on PATH",
        ));
    }

    ensure_parent_dir(out)?;
    let staging = staging_path_for(out);
    let output = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-i"])
        .arg(video)
        .args([
            "-f",
            "f32le",
            "-ar",
            &fmt.sample_rate.to_string(),
            "-ac",
            &fmt.channels.to_string(),
            "-i",
        ])
        .arg(pcm)
        .args([
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
            "-shortest",
            "-movflags",
            "+faststart",
            "-f",
            "mp4",
        ])
        .arg(&staging)
        .output()
        .map_err(|e| ClipError::encoding(format!("failed to run ffmpeg for muxing: {e}")))?;

    if !output.status.success() {
        let _ = std::fs::remove_file(&staging);
        return Err(ClipError::encoding(format!(
            "ffmpeg mux exited with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    std::fs::rename(&staging, out).map_err(|e| {
        let _ = std::fs::remove_file(&staging);
        ClipError::encoding(format!(
            "failed to move muxed video into '{}': {e}",
            out.display()
        ))
    })?;

    let pcm_len = std::fs::metadata(pcm)
        .map(|m| m.len())
        .map_err(|e| ClipError::missing_asset(pcm, e))?;
    let report = MuxReport {
        video_secs: probe_duration(video).ok().flatten(),
        audio_secs: pcm_duration_secs(pcm_len, fmt),
    };
    tracing::info!(
        video_secs = ?report.video_secs,
        audio_secs = report.audio_secs,
        playable_secs = report.playable_secs(),
        "muxed final clip"
    );
    Ok(report)
}
