use image::{Rgb, RgbImage};

use crate::foundation::error::{MovieColorError, MovieColorResult};
use crate::reduce::{
    mode::RenderMode,
    reducer::{STRIP_FILTER, Unit},
};

/// Output dimensions of a finished barcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarcodeLayout {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// `round(unit_count * 9 / 16)`: the 16:9 height for a barcode of `unit_count` columns.
pub fn barcode_height(unit_count: usize) -> u32 {
    (unit_count as f64 * 9.0 / 16.0).round() as u32
}

/// Compute the final image size for `unit_count` units in `mode`.
///
/// Compressed-column output halves the width but derives the height from the un-halved count,
/// so those barcodes come out twice as tall per column as average-color ones.
pub fn barcode_layout(unit_count: usize, mode: RenderMode) -> MovieColorResult<BarcodeLayout> {
    if unit_count == 0 {
        return Err(MovieColorError::compositing(
            "no frames were decoded; nothing to compose",
        ));
    }
    let count = u32::try_from(unit_count).map_err(|_| {
        MovieColorError::validation(format!("too many frames to compose: {unit_count}"))
    })?;

    let width = match mode {
        RenderMode::AverageColor => count,
        RenderMode::CompressedColumn => count / 2,
    };
    if width == 0 {
        return Err(MovieColorError::compositing(format!(
            "{mode} barcode needs at least 2 frames, got {unit_count}"
        )));
    }

    Ok(BarcodeLayout {
        width,
        height: barcode_height(unit_count),
    })
}

/// Lay out and rasterize the complete barcode from the final, ordered unit sequence.
#[tracing::instrument(skip(units), fields(units = units.len()))]
pub fn compose(units: &[Unit], mode: RenderMode) -> MovieColorResult<RgbImage> {
    let layout = barcode_layout(units.len(), mode)?;
    let mut out = RgbImage::new(layout.width, layout.height);

    for (i, unit) in units.iter().enumerate() {
        match (mode, unit) {
            (RenderMode::AverageColor, Unit::Color(c)) => {
                fill_column(&mut out, i as u32, c.to_rgb());
            }
            (RenderMode::CompressedColumn, Unit::Strip(strip)) => {
                let x = (i / 2) as u32;
                // Frames 2k and 2k+1 share a column and the later one wins.
                if x >= layout.width || (i % 2 == 0 && i + 1 < units.len()) {
                    continue;
                }
                if strip.height() == layout.height {
                    image::imageops::replace(&mut out, strip.column(), i64::from(x), 0);
                } else {
                    let column =
                        image::imageops::resize(strip.column(), 1, layout.height, STRIP_FILTER);
                    image::imageops::replace(&mut out, &column, i64::from(x), 0);
                }
            }
            _ => {
                return Err(MovieColorError::validation(format!(
                    "unit {i} does not belong to a {mode} run"
                )));
            }
        }
    }

    tracing::info!(
        width = layout.width,
        height = layout.height,
        "composed barcode"
    );
    Ok(out)
}

pub(crate) fn fill_column(img: &mut RgbImage, x: u32, color: Rgb<u8>) {
    if x >= img.width() {
        return;
    }
    for y in 0..img.height() {
        img.put_pixel(x, y, color);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/compositor.rs"]
mod tests;
