use std::io::{ErrorKind, Read};

use crate::foundation::{
    core::{FrameSize, RawFrame},
    error::{MovieColorError, MovieColorResult},
};

/// Producer-side contract for anything that yields fixed-size raw frames.
///
/// `next_frame` blocks until one whole frame is available. `Ok(None)` is end-of-stream and is
/// sticky: once returned, every later call returns it too.
pub trait FrameSource: Send {
    /// Dimensions of every frame this source yields.
    fn frame_size(&self) -> FrameSize;

    /// Read the next frame, or `None` at end-of-stream.
    fn next_frame(&mut self) -> MovieColorResult<Option<RawFrame>>;

    /// Release the source. Called once by the producer after its last read.
    fn close(&mut self) -> MovieColorResult<()>;
}

/// Reads RGB24 frames from any byte stream, one `width * height * 3` block at a time.
pub struct StreamFrameSource<R> {
    reader: Option<R>,
    size: FrameSize,
    frames_read: u64,
}

impl<R: Read> StreamFrameSource<R> {
    /// Wrap `reader`, which must emit headerless RGB24 frames of `size`.
    pub fn new(reader: R, size: FrameSize) -> Self {
        Self {
            reader: Some(reader),
            size,
            frames_read: 0,
        }
    }

    /// Number of complete frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Drop the underlying reader. Later reads report end-of-stream.
    pub(crate) fn release(&mut self) {
        self.reader = None;
    }
}

impl<R: Read + Send> FrameSource for StreamFrameSource<R> {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn next_frame(&mut self) -> MovieColorResult<Option<RawFrame>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; self.size.frame_len()];
        let filled = fill_frame(reader, &mut buf)?;
        if filled == 0 {
            tracing::debug!(frames = self.frames_read, "end of input stream");
            self.reader = None;
            return Ok(None);
        }
        if filled < buf.len() {
            self.reader = None;
            return Err(MovieColorError::stream_protocol(format!(
                "short read after {} frames: got {filled} of {} bytes (decoder died or stream is corrupt)",
                self.frames_read,
                buf.len()
            )));
        }

        self.frames_read += 1;
        RawFrame::new(self.size, buf).map(Some)
    }

    fn close(&mut self) -> MovieColorResult<()> {
        self.release();
        Ok(())
    }
}

/// Fill `buf` from `reader` until it is full or the reader reports EOF; returns bytes filled.
fn fill_frame<R: Read>(reader: &mut R, buf: &mut [u8]) -> MovieColorResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(MovieColorError::stream_protocol(format!(
                    "failed to read raw frame: {e}"
                )));
            }
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[path = "../../tests/unit/source/stream.rs"]
mod tests;
