use std::{
    path::PathBuf,
    sync::Arc,
    thread::JoinHandle,
    time::Duration,
};

use image::RgbImage;

use crate::composite::{compositor::compose, output::save_barcode};
use crate::foundation::error::{MovieColorError, MovieColorResult};
use crate::live::renderer::{LiveRenderer, TickOutcome};
use crate::reduce::{
    mode::{RenderMode, create_reducer},
    reducer::FrameReducer,
};
use crate::sequence::bars::BarSequence;
use crate::source::stream::FrameSource;

/// What to produce from a run.
#[derive(Clone, Debug)]
pub struct BarcodeOpts {
    /// Reduction and layout mode.
    pub mode: RenderMode,
    /// Requested output path; the extension selects the encoder.
    pub out_path: PathBuf,
}

impl BarcodeOpts {
    /// Average-color barcode written to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            mode: RenderMode::default(),
            out_path: out_path.into(),
        }
    }

    /// Use `mode` instead of the default average-color mode.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reject options that can never produce an output file.
    pub fn validate(&self) -> MovieColorResult<()> {
        if self.out_path.as_os_str().is_empty() {
            return Err(MovieColorError::validation("output path must not be empty"));
        }
        Ok(())
    }
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Frames decoded and reduced (the true final count).
    pub frames: usize,
    /// Mode the run used.
    pub mode: RenderMode,
    /// Path actually written.
    pub out_path: PathBuf,
    /// Final image width.
    pub width: u32,
    /// Final image height.
    pub height: u32,
}

/// Owns the producer thread of one run and the [`BarSequence`] it fills.
///
/// Dropping the handle joins the producer, so the decode process is always drained.
pub struct PipelineHandle {
    bars: Arc<BarSequence>,
    mode: RenderMode,
    producer: Option<JoinHandle<MovieColorResult<RunReport>>>,
}

impl PipelineHandle {
    /// Start the producer: read, reduce and append every frame of `source`, then compose and
    /// save the final barcode.
    pub fn spawn<S>(source: S, opts: BarcodeOpts) -> MovieColorResult<Self>
    where
        S: FrameSource + 'static,
    {
        opts.validate()?;
        let bars = Arc::new(BarSequence::new());
        let mode = opts.mode;

        let producer = {
            let bars = Arc::clone(&bars);
            std::thread::Builder::new()
                .name("moviecolor-producer".to_string())
                .spawn(move || run_producer(source, &opts, &bars))
                .map_err(|e| {
                    MovieColorError::Other(anyhow::anyhow!("failed to spawn producer thread: {e}"))
                })?
        };

        Ok(Self {
            bars,
            mode,
            producer: Some(producer),
        })
    }

    /// The shared sequence, for attaching renderers.
    pub fn bars(&self) -> &Arc<BarSequence> {
        &self.bars
    }

    /// Mode of this run.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Block until the first unit exists or the run ended; `true` if there is something to draw.
    pub fn wait_ready(&self) -> bool {
        self.bars.wait_ready()
    }

    /// `true` once the producer thread has exited.
    pub fn is_finished(&self) -> bool {
        self.producer.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the producer and return its outcome.
    pub fn join(mut self) -> MovieColorResult<RunReport> {
        let producer = self
            .producer
            .take()
            .ok_or_else(|| MovieColorError::validation("producer already joined"))?;
        producer
            .join()
            .map_err(|_| MovieColorError::Other(anyhow::anyhow!("producer thread panicked")))?
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        if let Some(producer) = self.producer.take() {
            let _ = producer.join();
        }
    }
}

fn run_producer<S: FrameSource>(
    mut source: S,
    opts: &BarcodeOpts,
    bars: &BarSequence,
) -> MovieColorResult<RunReport> {
    let reducer = create_reducer(opts.mode);
    let result = produce(&mut source, reducer.as_ref(), bars, opts);
    if let Err(e) = &result {
        tracing::error!("barcode run failed: {e}");
        if !bars.is_complete() {
            bars.abort();
        }
    }

    let closed = source.close();
    let report = result?;
    closed?;
    tracing::info!(
        frames = report.frames,
        path = %report.out_path.display(),
        "done"
    );
    Ok(report)
}

fn produce(
    source: &mut dyn FrameSource,
    reducer: &dyn FrameReducer,
    bars: &BarSequence,
    opts: &BarcodeOpts,
) -> MovieColorResult<RunReport> {
    while let Some(frame) = source.next_frame()? {
        let unit = reducer.reduce(&frame)?;
        let len = bars.push(unit)?;
        tracing::debug!(frame = len, "processed frame");
    }
    bars.mark_complete();

    let units = bars.snapshot();
    tracing::info!(frames = units.len(), mode = %opts.mode, "end of input stream");
    let image = compose(&units, opts.mode)?;
    let out_path = save_barcode(&image, &opts.out_path)?;

    Ok(RunReport {
        frames: units.len(),
        mode: opts.mode,
        out_path,
        width: image.width(),
        height: image.height(),
    })
}

/// Tick `renderer` against `bars` every `interval` until the run is sealed and fully painted.
///
/// `present` receives the canvas whenever a tick changed it. This is the timer loop a
/// presentation layer would otherwise own.
pub fn drive_live<F>(
    bars: &BarSequence,
    renderer: &mut LiveRenderer,
    interval: Duration,
    mut present: F,
) -> MovieColorResult<()>
where
    F: FnMut(&RgbImage, &TickOutcome) -> MovieColorResult<()>,
{
    loop {
        let outcome = renderer.tick(bars)?;
        if outcome.changed {
            present(renderer.canvas(), &outcome)?;
        }
        if !outcome.keep_ticking {
            return Ok(());
        }
        std::thread::sleep(interval);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;
