use std::time::Duration;

use crate::foundation::error::{MovieColorError, MovieColorResult};

/// Frames extracted per second of source video, independent of its native frame rate.
pub const SAMPLE_RATE_HZ: u32 = 3;

/// Height of a compressed-column strip in pixels.
pub const STRIP_HEIGHT: u32 = 720;

/// RGB24: three interleaved 8-bit channels per pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// Fixed cadence at which a presentation layer should call [`crate::LiveRenderer::tick`].
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Native dimensions of the decoded frames, fixed for the whole run. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameSize {
    width: u32,
    height: u32,
}

impl FrameSize {
    /// Create a frame size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> MovieColorResult<Self> {
        if width == 0 || height == 0 {
            return Err(MovieColorError::validation(format!(
                "frame size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.height
    }

    /// Number of pixels in one frame.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Exact byte length of one RGB24 frame.
    pub fn frame_len(self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }
}

/// One decoded frame: row-major, interleaved RGB24, exactly `width * height * 3` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    size: FrameSize,
    data: Vec<u8>,
}

impl RawFrame {
    /// Wrap `data` as a frame of `size`.
    ///
    /// A buffer of any other length is a protocol violation, and so is an empty frame.
    pub fn new(size: FrameSize, data: Vec<u8>) -> MovieColorResult<Self> {
        if size.pixel_count() == 0 {
            return Err(MovieColorError::validation(format!(
                "frame size must be non-zero, got {}x{}",
                size.width, size.height
            )));
        }
        if data.len() != size.frame_len() {
            return Err(MovieColorError::stream_protocol(format!(
                "raw frame has {} bytes, expected {} for {}x{} rgb24",
                data.len(),
                size.frame_len(),
                size.width,
                size.height
            )));
        }
        Ok(Self { size, data })
    }

    /// A frame filled with a single color.
    pub fn solid(size: FrameSize, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(size.frame_len())
            .collect();
        Self { size, data }
    }

    /// Frame dimensions.
    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Raw interleaved bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the frame and return its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Dimensions of the live preview canvas. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    width: u32,
    height: u32,
}

impl CanvasSize {
    /// Create a canvas size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> MovieColorResult<Self> {
        if width == 0 || height == 0 {
            return Err(MovieColorError::validation(format!(
                "canvas size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.height
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1500,
            height: STRIP_HEIGHT,
        }
    }
}

/// Portion of the source video to sample, in seconds.
///
/// `end_sec: None` means "until the end of the media"; it is resolved from the probed duration
/// before the run starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleWindow {
    /// Start of the sampled range (inclusive).
    pub start_sec: f64,
    /// End of the sampled range (exclusive), if known.
    pub end_sec: Option<f64>,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self {
            start_sec: 0.0,
            end_sec: None,
        }
    }
}

impl SampleWindow {
    /// Create a window, validating that bounds are finite, non-negative and ordered.
    pub fn new(start_sec: f64, end_sec: Option<f64>) -> MovieColorResult<Self> {
        if !start_sec.is_finite() || start_sec < 0.0 {
            return Err(MovieColorError::validation(format!(
                "start must be a non-negative number of seconds, got {start_sec}"
            )));
        }
        if let Some(end) = end_sec
            && (!end.is_finite() || end <= start_sec)
        {
            return Err(MovieColorError::validation(format!(
                "end ({end}s) must be after start ({start_sec}s)"
            )));
        }
        Ok(Self { start_sec, end_sec })
    }

    /// The first `minutes` of the video; `0` selects the whole file.
    pub fn from_length_minutes(minutes: u32) -> Self {
        Self {
            start_sec: 0.0,
            end_sec: (minutes > 0).then(|| f64::from(minutes) * 60.0),
        }
    }

    /// Fill a missing end from the probed media duration.
    pub fn with_end_from(self, duration_sec: f64) -> MovieColorResult<Self> {
        match self.end_sec {
            Some(_) => Ok(self),
            None => Self::new(self.start_sec, Some(duration_sec)),
        }
    }

    /// Length of the window in seconds, when the end is known.
    pub fn span_sec(&self) -> Option<f64> {
        self.end_sec.map(|end| (end - self.start_sec).max(0.0))
    }
}

/// Estimate how many frames the decoder will emit for `span_sec` seconds of video.
///
/// Only used to size the live canvas pitch; the real count is whatever the stream yields.
pub fn estimate_frame_count(span_sec: f64) -> u64 {
    if !span_sec.is_finite() {
        return 1;
    }
    (span_sec * f64::from(SAMPLE_RATE_HZ)).round().max(1.0) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
