//! One clip job, end to end: animate, align, overlay, trim, mux.

use std::path::{Path, PathBuf};

use crate::assemble::{mux, trim_audio};
use crate::assets::decode::load_scaled_image;
use crate::config::ClipConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::foundation::core::ClipWindow;
use crate::foundation::error::{ClipError, ClipResult, JobWarning};
use crate::lyrics::align::align;
use crate::lyrics::{LyricLine, TimedTextEntry};
use crate::motion::{MotionFrames, animate};
use crate::overlay::render_overlay;
use crate::overlay::renderer::build_thread_pool;

pub mod job;

pub use job::{Intermediates, JobKey};

use self::job::ArtifactGuard;

/// Inputs of one clip job.
#[derive(Clone, Debug)]
pub struct JobInputs {
    /// Background still image.
    pub image: PathBuf,
    /// Full source audio track.
    pub audio: PathBuf,
    /// Full lyric track of the source audio, in track order.
    pub lyrics: Vec<LyricLine>,
    /// Excerpt of the track to turn into a clip.
    pub window: ClipWindow,
    /// Final MP4 path.
    pub output: PathBuf,
    /// Directory for intermediates; the system temp dir when `None`.
    pub work_dir: Option<PathBuf>,
}

/// Outcome of a successful job.
#[derive(Clone, Debug, serde::Serialize)]
pub struct JobReport {
    /// Final MP4 path.
    pub output: PathBuf,
    /// Key naming this job's intermediates.
    pub key: String,
    /// Aligned text entries that were drawn.
    pub entries: Vec<TimedTextEntry>,
    /// Non-fatal conditions, in the order they were found.
    pub warnings: Vec<JobWarning>,
    /// Frames in the silent video.
    pub frames: u64,
    /// Playable duration of the output in seconds.
    pub playable_secs: f64,
    /// Intermediate files, when kept.
    pub intermediates: Option<Intermediates>,
}

/// Run one job. Any failure abandons the job and deletes its intermediates.
#[tracing::instrument(skip_all, fields(output = %inputs.output.display(), start = inputs.window.start, end = inputs.window.end))]
pub fn run_job(inputs: &JobInputs, cfg: &ClipConfig) -> ClipResult<JobReport> {
    cfg.validate()?;
    let canvas = cfg.canvas.canvas();
    let fps = cfg.canvas.fps()?;
    if !inputs.audio.exists() {
        return Err(ClipError::missing_asset(&inputs.audio, "file does not exist"));
    }

    let key = JobKey::new(&[
        inputs.image.as_path(),
        inputs.audio.as_path(),
        inputs.output.as_path(),
    ]);
    let work_dir = inputs
        .work_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("lyricclip"));
    let mut guard = ArtifactGuard::new(Intermediates::new(&work_dir, &key));
    tracing::info!(key = %key, work_dir = %work_dir.display(), "starting clip job");

    let mut warnings = Vec::new();

    // Stage 1: animate.
    let image = load_scaled_image(&inputs.image, cfg.motion.scale_factor)?;
    let motion = MotionFrames::new(image, canvas, fps, cfg.motion, inputs.window.duration())?;
    let mut raw_sink = FfmpegSink::new(FfmpegSinkOpts::intermediate(&guard.files().raw_video));
    let animated = animate(&motion, &mut raw_sink)?;
    drop(raw_sink);
    warnings.extend(animated.warnings);

    // Stage 2: align.
    let entries = align(inputs.window, &inputs.lyrics, cfg.lead_in_secs);
    if entries.is_empty() {
        tracing::warn!(warning = %JobWarning::EmptyLyricWindow, "clip has no text");
        warnings.push(JobWarning::EmptyLyricWindow);
    }

    // Stage 3: overlay.
    let pool = build_thread_pool(cfg.render)?;
    let overlaid = render_overlay(
        &guard.files().raw_video,
        &guard.files().text_video,
        entries.clone(),
        cfg,
        pool.as_ref(),
    )?;
    warnings.extend(overlaid.warnings);

    // Stage 4: trim and mux.
    trim_audio(
        &inputs.audio,
        inputs.window,
        cfg.audio,
        &guard.files().clip_audio,
    )?;
    let muxed = mux(
        &guard.files().text_video,
        &guard.files().clip_audio,
        cfg.audio,
        &inputs.output,
    )?;

    let intermediates = cfg.keep_intermediates.then(|| {
        guard.keep();
        guard.files().clone()
    });
    tracing::info!(
        output = %inputs.output.display(),
        frames = animated.frames,
        entries = entries.len(),
        warnings = warnings.len(),
        "clip job finished"
    );
    Ok(JobReport {
        output: inputs.output.clone(),
        key: key.to_string(),
        entries,
        warnings,
        frames: animated.frames,
        playable_secs: muxed.playable_secs(),
        intermediates,
    })
}

/// Default output path for a clip rendered next to its image.
pub fn default_output_for(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clip".to_owned());
    image.with_file_name(format!("{stem}_clip.mp4"))
}
