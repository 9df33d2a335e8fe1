//! MovieColor renders a "movie barcode": one image in which every vertical slice stands for one
//! sampled frame of a video.
//!
//! # Pipeline overview
//!
//! 1. **Probe**: `ffprobe` reports the frame size and duration ([`probe_video`])
//! 2. **Decode**: an `ffmpeg` process streams raw RGB24 frames at 3 Hz ([`FfmpegFrameSource`])
//! 3. **Reduce**: each frame becomes a [`Unit`], either its average color or a 1x720 column
//! 4. **Append**: units are pushed onto a shared, append-only [`BarSequence`]
//! 5. **Render live**: a [`LiveRenderer`] paints newly arrived units on a fixed tick cadence
//! 6. **Compose**: at end-of-stream the whole sequence is laid out and saved ([`compose`])
//!
//! Steps 1-4 and 6 run on a single producer thread owned by a [`PipelineHandle`]; step 5 runs
//! wherever the presentation layer ticks it.
//!
//! ```no_run
//! use moviecolor::{
//!     BarcodeOpts, CanvasSize, FfmpegFrameSource, LiveRenderer, PipelineHandle, RenderMode,
//!     SampleWindow, TICK_INTERVAL, drive_live, estimate_frame_count, probe_video,
//! };
//!
//! # fn main() -> moviecolor::MovieColorResult<()> {
//! let path = std::path::Path::new("movie.mp4");
//! let probe = probe_video(path)?;
//! let window = SampleWindow::default().with_end_from(probe.require_duration()?)?;
//! let source = FfmpegFrameSource::open(path, probe.size, window)?;
//!
//! let handle = PipelineHandle::spawn(source, BarcodeOpts::new("barcode.png"))?;
//! if handle.wait_ready() {
//!     let estimate = estimate_frame_count(window.span_sec().unwrap_or(0.0));
//!     let canvas = CanvasSize::default();
//!     let mut live = LiveRenderer::new(RenderMode::AverageColor, estimate, canvas)?;
//!     drive_live(handle.bars(), &mut live, TICK_INTERVAL, |_canvas, _tick| Ok(()))?;
//! }
//! let report = handle.join()?;
//! println!("wrote {}", report.out_path.display());
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod composite;
mod foundation;
mod live;
mod pipeline;
mod reduce;
mod sequence;
mod source;

pub use composite::compositor::{BarcodeLayout, barcode_height, barcode_layout, compose};
pub use composite::output::{ensure_parent_dir, resolve_output_target, save_barcode};
pub use foundation::core::{
    BYTES_PER_PIXEL, CanvasSize, FrameSize, RawFrame, SAMPLE_RATE_HZ, STRIP_HEIGHT,
    SampleWindow, TICK_INTERVAL, estimate_frame_count,
};
pub use foundation::error::{MovieColorError, MovieColorResult};
pub use live::renderer::{LiveRenderer, TickOutcome};
pub use pipeline::driver::{BarcodeOpts, PipelineHandle, RunReport, drive_live};
pub use reduce::mode::{RenderMode, create_reducer};
pub use reduce::reducer::{
    AverageColorReducer, ColorUnit, CompressedColumnReducer, FrameReducer, StripUnit, Unit,
};
pub use sequence::bars::BarSequence;
pub use source::ffmpeg::{FfmpegFrameSource, decode_args, sampling_filter};
pub use source::probe::{
    VideoProbe, is_ffmpeg_on_path, is_ffprobe_on_path, parse_probe_json, probe_video,
};
pub use source::stream::{FrameSource, StreamFrameSource};
