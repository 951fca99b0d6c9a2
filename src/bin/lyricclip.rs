use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use lyricclip::assets::decode::load_scaled_image;
use lyricclip::pipeline::default_output_for;
use lyricclip::{ClipConfig, ClipWindow, FrameIndex, JobInputs, MotionFrames, TextPlacement};

#[derive(Parser, Debug)]
#[command(name = "lyricclip", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a complete lyric clip (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Print the timed text entries for a window as JSON.
    Align(AlignArgs),
    /// Print the lyric lines inside a window, one per line.
    LyricsText(WindowArgs),
    /// Render one background motion frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file; unset fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lyric onset delay in seconds.
    #[arg(long)]
    lead_in: Option<f64>,
}

#[derive(Args, Debug)]
struct WindowArgs {
    /// Lyric track: JSON `{time, lyric}` records or an `.lrc` file.
    #[arg(long)]
    lyrics: PathBuf,

    /// Window start in seconds of the source track.
    #[arg(long)]
    start: f64,

    /// Window end in seconds of the source track.
    #[arg(long)]
    end: f64,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Background image.
    #[arg(long)]
    image: PathBuf,

    /// Source audio track.
    #[arg(long)]
    audio: PathBuf,

    #[command(flatten)]
    window: WindowArgs,

    /// Output MP4 path (defaults to `<image>_clip.mp4`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory for intermediate files.
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Text style id from the config's `styles` table.
    #[arg(long)]
    style: Option<String>,

    /// Vertical text placement.
    #[arg(long)]
    placement: Option<TextPlacement>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Render overlay frames on the calling thread only.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Keep the raw, text-only and trimmed-audio intermediates.
    #[arg(long, default_value_t = false)]
    keep_intermediates: bool,

    /// Print the job report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(flatten)]
    cfg: ConfigArgs,
}

#[derive(Parser, Debug)]
struct AlignArgs {
    #[command(flatten)]
    window: WindowArgs,

    #[command(flatten)]
    cfg: ConfigArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Background image.
    #[arg(long)]
    image: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    cfg: ConfigArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Align(args) => cmd_align(args),
        Command::LyricsText(args) => cmd_lyrics_text(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<ClipConfig> {
    let mut cfg = match &args.config {
        Some(path) => ClipConfig::from_json_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => ClipConfig::default(),
    };
    if let Some(lead_in) = args.lead_in {
        cfg.lead_in_secs = lead_in;
    }
    Ok(cfg)
}

fn window_of(args: &WindowArgs) -> anyhow::Result<ClipWindow> {
    Ok(ClipWindow::new(args.start, args.end)?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.cfg)?;
    if let Some(style) = args.style {
        cfg.overlay.style = style;
    }
    if let Some(placement) = args.placement {
        cfg.overlay.placement = placement;
    }
    if args.threads.is_some() {
        cfg.render.threads = args.threads;
    }
    if args.sequential {
        cfg.render.parallel = false;
    }
    cfg.keep_intermediates |= args.keep_intermediates;
    cfg.validate()?;

    let lyrics = lyricclip::load_lyric_track(&args.window.lyrics)
        .with_context(|| format!("load lyrics '{}'", args.window.lyrics.display()))?;
    let output = args.out.unwrap_or_else(|| default_output_for(&args.image));
    let inputs = JobInputs {
        image: args.image,
        audio: args.audio,
        lyrics,
        window: window_of(&args.window)?,
        output,
        work_dir: args.work_dir,
    };

    let report = lyricclip::run_job(&inputs, &cfg)?;
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    eprintln!("wrote {}", report.output.display());
    Ok(())
}

fn cmd_align(args: AlignArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.cfg)?;
    cfg.validate()?;
    let lines = lyricclip::load_lyric_track(&args.window.lyrics)
        .with_context(|| format!("load lyrics '{}'", args.window.lyrics.display()))?;
    let entries = lyricclip::align(window_of(&args.window)?, &lines, cfg.lead_in_secs);
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn cmd_lyrics_text(args: WindowArgs) -> anyhow::Result<()> {
    let lines = lyricclip::load_lyric_track(&args.lyrics)
        .with_context(|| format!("load lyrics '{}'", args.lyrics.display()))?;
    print!("{}", lyricclip::window_text(window_of(&args)?, &lines));
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.cfg)?;
    cfg.validate()?;
    let fps = cfg.canvas.fps()?;

    let image = load_scaled_image(&args.image, cfg.motion.scale_factor)?;
    // One frame past the requested index is enough duration.
    let duration = fps.frame_time_secs(FrameIndex(args.frame + 1));
    let motion = MotionFrames::new(image, cfg.canvas.canvas(), fps, cfg.motion, duration)?;
    if let Some(w) = motion.path().degenerate_warning() {
        eprintln!("warning: {w}");
    }
    let frame = motion.render(FrameIndex(args.frame));

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
