use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::encode::ffmpeg::is_ffprobe_on_path;
use crate::encode::source::{FrameSource, SourceInfo};
use crate::foundation::core::{ClipWindow, Fps, FrameIndex};
use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::frame::FrameRGBA;

#[derive(Clone, Debug, PartialEq)]
/// Basic metadata about a source video file.
pub struct VideoSourceInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate of the first video stream.
    pub fps: Fps,
    /// Container duration in seconds, when reported.
    pub duration_secs: Option<f64>,
    /// Whether ffprobe detected at least one audio stream.
    pub has_audio: bool,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

fn run_ffprobe(source_path: &Path) -> ClipResult<ProbeOut> {
    if !source_path.exists() {
        return Err(ClipError::missing_asset(source_path, "file does not exist"));
    }
    if !is_ffprobe_on_path() {
        return Err(ClipError::encoding(
            "ffprobe is required for media probing, but was not found on PATH",
        ));
    }
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ClipError::encoding(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ClipError::encoding(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    serde_json::from_slice(&out.stdout)
        .map_err(|e| ClipError::encoding(format!("ffprobe json parse failed: {e}")))
}

fn parse_duration(format: Option<&ProbeFormat>) -> Option<f64> {
    format
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// Probe source video metadata through `ffprobe`.
pub fn probe_video(source_path: &Path) -> ClipResult<VideoSourceInfo> {
    let parsed = run_ffprobe(source_path)?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ClipError::encoding("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| ClipError::encoding("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| ClipError::encoding("missing video height from ffprobe"))?;
    let fps = video_stream
        .r_frame_rate
        .as_deref()
        .ok_or_else(|| ClipError::encoding("missing video frame rate from ffprobe"))
        .and_then(Fps::parse_ratio)?;
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps,
        duration_secs: parse_duration(parsed.format.as_ref()),
        has_audio,
    })
}

/// Probe the container duration of any media file, in seconds.
pub fn probe_duration(path: &Path) -> ClipResult<Option<f64>> {
    Ok(parse_duration(run_ffprobe(path)?.format.as_ref()))
}

/// Streaming RGBA decoder over a video file.
///
/// Frames come from one long-lived `ffmpeg` process writing raw RGBA to a pipe, so memory stays
/// bounded by one frame regardless of clip length.
pub struct FfmpegFrameReader {
    info: VideoSourceInfo,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    next: u64,
}

impl FfmpegFrameReader {
    /// Probe `path` and start decoding it.
    pub fn open(path: &Path) -> ClipResult<Self> {
        let info = probe_video(path)?;
        if info.width == 0 || info.height == 0 {
            return Err(ClipError::encoding(
                "decoded video frame size is zero (invalid source dimensions)",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&info.source_path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ClipError::encoding(format!("failed to run ffmpeg for video decode: {e}"))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClipError::encoding("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ClipError::encoding("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            path = %info.source_path.display(),
            width = info.width,
            height = info.height,
            fps = info.fps.as_f64(),
            "opened video decoder"
        );
        Ok(Self {
            info,
            child: Some(child),
            stdout: Some(stdout),
            stderr_drain: Some(stderr_drain),
            next: 0,
        })
    }

    fn finish(&mut self) -> ClipResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| ClipError::encoding(format!("failed to wait for ffmpeg decoder: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ClipError::encoding("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ClipError::encoding(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(ClipError::encoding(format!(
                "ffmpeg video decode failed for '{}': {}",
                self.info.source_path.display(),
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

/// Fill `buf` completely, returning the number of bytes read before EOF.
fn read_full(r: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

impl FrameSource for FfmpegFrameReader {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            width: self.info.width,
            height: self.info.height,
            fps: self.info.fps,
            duration_secs: self.info.duration_secs,
        }
    }

    fn next_frame(&mut self) -> ClipResult<Option<(FrameIndex, FrameRGBA)>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let expected_len = self.info.width as usize * self.info.height as usize * 4;
        let mut data = vec![0u8; expected_len];
        let got = read_full(stdout, &mut data)
            .map_err(|e| ClipError::encoding(format!("failed to read decoded frame: {e}")))?;

        if got == 0 {
            self.finish()?;
            return Ok(None);
        }
        if got != expected_len {
            self.finish()?;
            return Err(ClipError::encoding(format!(
                "decoded video frame is truncated: got {got} bytes, expected {expected_len}"
            )));
        }

        let idx = FrameIndex(self.next);
        self.next += 1;
        Ok(Some((
            idx,
            FrameRGBA {
                width: self.info.width,
                height: self.info.height,
                data,
                premultiplied: true,
            },
        )))
    }
}

impl Drop for FfmpegFrameReader {
    fn drop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

/// Decode exactly `[window.start, window.end)` of an audio file to interleaved `f32le` bytes.
///
/// Seeking happens on the output side so the cut is sample-accurate rather than
/// keyframe-aligned. A window running past the end of the source yields a shorter result.
pub fn decode_audio_window_f32le(
    path: &Path,
    window: ClipWindow,
    sample_rate: u32,
    channels: u16,
) -> ClipResult<Vec<u8>> {
    if !path.exists() {
        return Err(ClipError::missing_asset(path, "file does not exist"));
    }
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-ss",
            &format!("{:.6}", window.start),
            "-t",
            &format!("{:.6}", window.duration()),
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &channels.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| ClipError::encoding(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(ClipError::encoding(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    if !out.stdout.len().is_multiple_of(4 * channels as usize) {
        return Err(ClipError::encoding(
            "decoded audio byte length is not aligned to whole f32 sample frames",
        ));
    }
    Ok(out.stdout)
}
