use std::{
    ffi::OsString,
    io::Read,
    path::{Path, PathBuf},
    process::{Child, ChildStdout, Command, Stdio},
    thread::JoinHandle,
};

use crate::foundation::{
    core::{FrameSize, RawFrame, SAMPLE_RATE_HZ, SampleWindow},
    error::{MovieColorError, MovieColorResult},
};
use crate::source::stream::{FrameSource, StreamFrameSource};

/// Build the `-vf` filter chain that trims to `window` and resamples to the fixed sampling rate.
pub fn sampling_filter(window: SampleWindow) -> String {
    let mut trim = format!("trim=start={}", window.start_sec);
    if let Some(end) = window.end_sec {
        trim.push_str(&format!(":end={end}"));
    }
    format!("{trim},fps={SAMPLE_RATE_HZ}")
}

/// Arguments passed to `ffmpeg` to stream `source_path` as headerless RGB24 on stdout.
///
/// The path is passed through untouched, so names that are not valid UTF-8 still resolve.
pub fn decode_args(source_path: &Path, window: SampleWindow) -> Vec<OsString> {
    vec![
        "-v".into(),
        "error".into(),
        "-nostdin".into(),
        "-i".into(),
        source_path.as_os_str().to_owned(),
        "-an".into(),
        "-vf".into(),
        sampling_filter(window).into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgb24".into(),
        "pipe:1".into(),
    ]
}

/// Frame source backed by a system `ffmpeg` process writing raw frames to a pipe.
///
/// Dropping the source without [`FrameSource::close`] kills and reaps the child.
pub struct FfmpegFrameSource {
    source_path: PathBuf,
    stream: StreamFrameSource<ChildStdout>,
    child: Option<Child>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl FfmpegFrameSource {
    /// Spawn `ffmpeg` for `source_path`, sampling `window` at 3 frames per second.
    ///
    /// `size` must be the probed native frame size; it is fixed for the run.
    #[cfg(feature = "media-ffmpeg")]
    pub fn open(
        source_path: impl Into<PathBuf>,
        size: FrameSize,
        window: SampleWindow,
    ) -> MovieColorResult<Self> {
        let source_path = source_path.into();
        tracing::info!(
            path = %source_path.display(),
            filter = %sampling_filter(window),
            "starting ffmpeg decode process"
        );

        let mut child = Command::new("ffmpeg")
            .args(decode_args(&source_path, window))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                MovieColorError::stream_protocol(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            MovieColorError::stream_protocol("failed to open ffmpeg stdout (unexpected)")
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            MovieColorError::stream_protocol("failed to open ffmpeg stderr (unexpected)")
        })?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(Self {
            source_path,
            stream: StreamFrameSource::new(stdout, size),
            child: Some(child),
            stderr_drain: Some(stderr_drain),
        })
    }

    /// Spawn `ffmpeg` for `source_path`, sampling `window` at 3 frames per second.
    #[cfg(not(feature = "media-ffmpeg"))]
    pub fn open(
        _source_path: impl Into<PathBuf>,
        _size: FrameSize,
        _window: SampleWindow,
    ) -> MovieColorResult<Self> {
        Err(MovieColorError::stream_protocol(
            "decoding video requires the 'media-ffmpeg' feature",
        ))
    }

    fn join_stderr(&mut self) -> Vec<u8> {
        match self.stderr_drain.take().map(|h| h.join()) {
            Some(Ok(Ok(bytes))) => bytes,
            Some(Ok(Err(e))) => {
                tracing::warn!("ffmpeg stderr read failed: {e}");
                Vec::new()
            }
            Some(Err(_)) => {
                tracing::warn!("ffmpeg stderr drain thread panicked");
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}

impl FrameSource for FfmpegFrameSource {
    fn frame_size(&self) -> FrameSize {
        self.stream.frame_size()
    }

    fn next_frame(&mut self) -> MovieColorResult<Option<RawFrame>> {
        self.stream.next_frame()
    }

    fn close(&mut self) -> MovieColorResult<()> {
        // Closing our end of the pipe lets a still-running decoder exit on EPIPE.
        self.stream.release();
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        tracing::info!("waiting for ffmpeg decode process");
        let status = child.wait().map_err(|e| {
            MovieColorError::stream_protocol(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr = self.join_stderr();

        if !status.success() {
            // Exit status alone is not a run failure; a dying decoder surfaces as a short read.
            tracing::warn!(
                path = %self.source_path.display(),
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            );
        }
        Ok(())
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/ffmpeg.rs"]
mod tests;
