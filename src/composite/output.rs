use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::foundation::error::{MovieColorError, MovieColorResult};

/// Pick the encoder for `requested` and the path that will actually be written.
///
/// `.jpg` selects JPEG and `.png` selects PNG (case-insensitive). Any other or missing extension
/// falls back to PNG with `.png` appended to the whole file name.
pub fn resolve_output_target(requested: &Path) -> (PathBuf, ImageFormat) {
    let ext = requested
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") => (requested.to_path_buf(), ImageFormat::Jpeg),
        Some("png") => (requested.to_path_buf(), ImageFormat::Png),
        _ => {
            let mut name = requested.as_os_str().to_owned();
            name.push(".png");
            (PathBuf::from(name), ImageFormat::Png)
        }
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> MovieColorResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encode `image` to `requested` (see [`resolve_output_target`]) and return the written path.
#[tracing::instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn save_barcode(image: &RgbImage, requested: &Path) -> MovieColorResult<PathBuf> {
    let (path, format) = resolve_output_target(requested);
    ensure_parent_dir(&path).map_err(|e| MovieColorError::compositing(e.to_string()))?;

    image.save_with_format(&path, format).map_err(|e| {
        MovieColorError::compositing(format!("failed to write '{}': {e}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), ?format, "wrote image");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/output.rs"]
mod tests;
