use std::sync::Arc;

use image::{ImageBuffer, Rgb, RgbImage, imageops::FilterType};

use crate::foundation::{
    core::{RawFrame, STRIP_HEIGHT},
    error::{MovieColorError, MovieColorResult},
};

/// Resampling filter for strips: frame to column, and column to any other output height.
pub(crate) const STRIP_FILTER: FilterType = FilterType::CatmullRom;

/// Average color of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorUnit {
    /// Red channel mean.
    pub r: u8,
    /// Green channel mean.
    pub g: u8,
    /// Blue channel mean.
    pub b: u8,
}

impl ColorUnit {
    /// Build a color unit from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color as an `image` pixel.
    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }
}

/// A frame squeezed to a single column of [`STRIP_HEIGHT`] pixels.
///
/// The pixels are shared, so cloning a strip never copies image data.
#[derive(Clone, Debug, PartialEq)]
pub struct StripUnit {
    column: Arc<RgbImage>,
}

impl StripUnit {
    /// Wrap a one-pixel-wide column image.
    pub fn new(column: RgbImage) -> MovieColorResult<Self> {
        if column.width() != 1 || column.height() == 0 {
            return Err(MovieColorError::validation(format!(
                "strip must be 1 pixel wide and non-empty, got {}x{}",
                column.width(),
                column.height()
            )));
        }
        Ok(Self {
            column: Arc::new(column),
        })
    }

    /// The column pixels.
    pub fn column(&self) -> &RgbImage {
        &self.column
    }

    /// Column height in pixels.
    pub fn height(&self) -> u32 {
        self.column.height()
    }
}

/// One reduced frame. A run only ever produces a single kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Unit {
    /// Produced by [`AverageColorReducer`].
    Color(ColorUnit),
    /// Produced by [`CompressedColumnReducer`].
    Strip(StripUnit),
}

/// Reduces a raw frame to a compact visual unit. Implementations are pure.
pub trait FrameReducer: Send + Sync {
    /// Reduce one frame.
    fn reduce(&self, frame: &RawFrame) -> MovieColorResult<Unit>;
}

/// Reduces a frame to the truncated per-channel mean of all its pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct AverageColorReducer;

impl AverageColorReducer {
    /// Typed variant of [`FrameReducer::reduce`].
    pub fn average(frame: &RawFrame) -> ColorUnit {
        let mut sums = [0u64; 3];
        for px in frame.data().chunks_exact(3) {
            sums[0] += u64::from(px[0]);
            sums[1] += u64::from(px[1]);
            sums[2] += u64::from(px[2]);
        }
        let n = frame.size().pixel_count() as u64;
        // Means of u8 samples are always <= 255.
        ColorUnit::new(
            (sums[0] / n) as u8,
            (sums[1] / n) as u8,
            (sums[2] / n) as u8,
        )
    }
}

impl FrameReducer for AverageColorReducer {
    fn reduce(&self, frame: &RawFrame) -> MovieColorResult<Unit> {
        Ok(Unit::Color(Self::average(frame)))
    }
}

/// Resamples a whole frame to a 1x720 column, keeping its vertical color structure.
#[derive(Clone, Copy, Debug)]
pub struct CompressedColumnReducer {
    filter: FilterType,
}

impl Default for CompressedColumnReducer {
    fn default() -> Self {
        Self {
            filter: STRIP_FILTER,
        }
    }
}

impl CompressedColumnReducer {
    /// Use `filter` instead of the default bicubic resampling.
    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Typed variant of [`FrameReducer::reduce`].
    pub fn compress(&self, frame: &RawFrame) -> MovieColorResult<StripUnit> {
        let size = frame.size();
        let view: ImageBuffer<Rgb<u8>, &[u8]> =
            ImageBuffer::from_raw(size.width(), size.height(), frame.data()).ok_or_else(|| {
                MovieColorError::validation("raw frame buffer does not match its dimensions")
            })?;
        StripUnit::new(image::imageops::resize(
            &view,
            1,
            STRIP_HEIGHT,
            self.filter,
        ))
    }
}

impl FrameReducer for CompressedColumnReducer {
    fn reduce(&self, frame: &RawFrame) -> MovieColorResult<Unit> {
        self.compress(frame).map(Unit::Strip)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reduce/reducer.rs"]
mod tests;
