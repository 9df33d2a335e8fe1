use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "moviecolor",
    version,
    about = "Create a movie barcode from the colors of a video"
)]
struct Cli {
    /// Input video file.
    input: PathBuf,

    /// Output image path; `.jpg` or `.png` select the encoder, anything else gets `.png` appended.
    #[arg(short, long, default_value = "result")]
    out: PathBuf,

    /// Only use the first N minutes of the video (0 = whole file).
    #[arg(short, long, conflicts_with = "end")]
    length: Option<u32>,

    /// Start of the sampled range, in seconds.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// End of the sampled range, in seconds (defaults to the probed duration).
    #[arg(long)]
    end: Option<f64>,

    /// Compressed-column barcode instead of average colors (same as `--mode compressed`).
    #[arg(short, long)]
    alt: bool,

    /// Barcode mode.
    #[arg(long, value_enum, default_value_t = ModeChoice::Average)]
    mode: ModeChoice,

    /// Republish the live canvas to this image file while decoding.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Live canvas width in pixels.
    #[arg(long, default_value_t = 1500)]
    canvas_width: u32,

    /// Live canvas height in pixels.
    #[arg(long, default_value_t = moviecolor::STRIP_HEIGHT)]
    canvas_height: u32,

    /// Log every processed frame.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Average,
    Compressed,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn render_mode(cli: &Cli) -> moviecolor::RenderMode {
    if cli.alt {
        return moviecolor::RenderMode::CompressedColumn;
    }
    match cli.mode {
        ModeChoice::Average => moviecolor::RenderMode::AverageColor,
        ModeChoice::Compressed => moviecolor::RenderMode::CompressedColumn,
    }
}

fn sample_window(cli: &Cli) -> anyhow::Result<moviecolor::SampleWindow> {
    let window = match cli.length {
        Some(minutes) => moviecolor::SampleWindow::new(
            cli.start,
            (minutes > 0).then(|| cli.start + f64::from(minutes) * 60.0),
        )?,
        None => moviecolor::SampleWindow::new(cli.start, cli.end)?,
    };
    Ok(window)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    anyhow::ensure!(
        cli.input.is_file(),
        "input '{}' is not a file",
        cli.input.display()
    );

    let mode = render_mode(&cli);
    let canvas_size = moviecolor::CanvasSize::new(cli.canvas_width, cli.canvas_height)?;
    let probe = moviecolor::probe_video(&cli.input)
        .with_context(|| format!("probe '{}'", cli.input.display()))?;

    let requested = sample_window(&cli)?;
    let window = match requested.end_sec {
        Some(_) => requested,
        None => requested.with_end_from(probe.require_duration()?)?,
    };
    // An end past the media end only shortens the stream.
    let span = match (window.end_sec, probe.duration_sec) {
        (Some(end), Some(duration)) => (end.min(duration) - window.start_sec).max(0.0),
        _ => window.span_sec().unwrap_or(0.0),
    };
    let estimate = moviecolor::estimate_frame_count(span);
    tracing::info!(
        width = probe.size.width(),
        height = probe.size.height(),
        start_sec = window.start_sec,
        end_sec = ?window.end_sec,
        estimate,
        %mode,
        "starting barcode run"
    );

    let source = moviecolor::FfmpegFrameSource::open(&cli.input, probe.size, window)?;
    let opts = moviecolor::BarcodeOpts::new(&cli.out).with_mode(mode);
    let handle = moviecolor::PipelineHandle::spawn(source, opts)?;

    let live = if handle.wait_ready() {
        moviecolor::LiveRenderer::new(mode, estimate, canvas_size)
            .and_then(|mut live| present_live(&handle, &mut live, cli.preview.as_deref()))
    } else {
        tracing::warn!("no frames arrived before the decode ended");
        Ok(())
    };
    // Join before surfacing a live-view failure.
    let report = handle.join();
    if let Err(e) = &live {
        tracing::warn!("live view stopped early: {e}");
    }
    let report = report?;
    eprintln!(
        "wrote {} ({}x{}, {} frames)",
        report.out_path.display(),
        report.width,
        report.height,
        report.frames
    );
    Ok(())
}

/// Tick the live canvas until the run ends, republishing it to `preview` when one is given.
///
/// A preview that cannot be written is reported once and then skipped; the run continues.
fn present_live(
    handle: &moviecolor::PipelineHandle,
    live: &mut moviecolor::LiveRenderer,
    preview: Option<&Path>,
) -> moviecolor::MovieColorResult<()> {
    let mut preview = preview;
    moviecolor::drive_live(
        handle.bars(),
        live,
        moviecolor::TICK_INTERVAL,
        |canvas, outcome| {
            tracing::debug!(painted = outcome.painted, "live canvas updated");
            if let Some(path) = preview
                && let Err(e) = moviecolor::save_barcode(canvas, path)
            {
                tracing::warn!(path = %path.display(), "disabling preview: {e}");
                preview = None;
            }
            Ok(())
        },
    )
}

#[cfg(test)]
#[path = "../../tests/unit/bin/moviecolor.rs"]
mod tests;
