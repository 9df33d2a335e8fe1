use image::RgbImage;

use crate::composite::compositor::fill_column;
use crate::foundation::{
    core::CanvasSize,
    error::{MovieColorError, MovieColorResult},
};
use crate::reduce::{
    mode::RenderMode,
    reducer::{STRIP_FILTER, Unit},
};
use crate::sequence::bars::BarSequence;

/// Result of one [`LiveRenderer::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// Units painted during this tick.
    pub painted: usize,
    /// `true` if the canvas changed and should be republished.
    pub changed: bool,
    /// `false` once the sequence is sealed and every unit has been painted.
    pub keep_ticking: bool,
}

/// Incrementally paints a growing [`BarSequence`] onto a persistent canvas.
///
/// Each unit gets `canvas_width / estimated_frames` pixels. The estimate is not a bound: units
/// past the right edge are counted as painted but clipped.
pub struct LiveRenderer {
    mode: RenderMode,
    canvas: RgbImage,
    pitch: f64,
    cursor: f64,
    painted: usize,
}

impl LiveRenderer {
    /// Create a renderer with a black canvas of `size`.
    pub fn new(
        mode: RenderMode,
        estimated_frames: u64,
        size: CanvasSize,
    ) -> MovieColorResult<Self> {
        if estimated_frames == 0 {
            return Err(MovieColorError::validation(
                "estimated frame count must be non-zero",
            ));
        }
        Ok(Self {
            mode,
            canvas: RgbImage::new(size.width(), size.height()),
            pitch: f64::from(size.width()) / estimated_frames as f64,
            cursor: 0.0,
            painted: 0,
        })
    }

    /// Layout mode this renderer was built for.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Pixels allotted per unit.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// X coordinate where the next unit will be painted.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Index of the next unpainted unit.
    pub fn painted_count(&self) -> usize {
        self.painted
    }

    /// The current composed bitmap.
    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    /// `true` if `bars` holds units this renderer has not painted yet.
    pub fn has_pending(&self, bars: &BarSequence) -> bool {
        bars.len() > self.painted
    }

    /// Paint every unit appended since the previous tick. Never blocks on the producer.
    pub fn tick(&mut self, bars: &BarSequence) -> MovieColorResult<TickOutcome> {
        // Read the seal first: once it is observed, the snapshot below already holds every unit.
        let sealed = bars.is_sealed();
        let fresh = bars.snapshot_from(self.painted);
        for unit in &fresh {
            self.paint(unit)?;
            self.painted += 1;
        }

        let keep_ticking = !(sealed && self.painted >= bars.len());
        if !fresh.is_empty() {
            tracing::debug!(
                painted = self.painted,
                cursor = self.cursor,
                "live canvas caught up"
            );
        }
        Ok(TickOutcome {
            painted: fresh.len(),
            changed: !fresh.is_empty(),
            keep_ticking,
        })
    }

    fn paint(&mut self, unit: &Unit) -> MovieColorResult<()> {
        let (x0, x1) = self.span();
        match (self.mode, unit) {
            (RenderMode::AverageColor, Unit::Color(c)) => {
                for x in x0..x1 {
                    fill_column(&mut self.canvas, x, c.to_rgb());
                }
            }
            (RenderMode::CompressedColumn, Unit::Strip(strip)) => {
                let height = self.canvas.height();
                let resized;
                let column = if strip.height() == height {
                    strip.column()
                } else {
                    resized = image::imageops::resize(strip.column(), 1, height, STRIP_FILTER);
                    &resized
                };
                for x in x0..x1 {
                    image::imageops::replace(&mut self.canvas, column, i64::from(x), 0);
                }
            }
            _ => {
                return Err(MovieColorError::validation(format!(
                    "unit {} does not belong to a {} run",
                    self.painted, self.mode
                )));
            }
        }
        self.cursor += self.pitch;
        Ok(())
    }

    /// Pixel columns `[x0, x1)` for the unit at the cursor: at least one wide, clipped to the
    /// canvas.
    fn span(&self) -> (u32, u32) {
        let width = f64::from(self.canvas.width());
        let x0 = self.cursor.round();
        let x1 = (self.cursor + self.pitch).round().max(x0 + 1.0);
        (x0.min(width) as u32, x1.min(width) as u32)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/live/renderer.rs"]
mod tests;
