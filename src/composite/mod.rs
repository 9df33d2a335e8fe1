//! Final barcode layout and persistence.

/// Layout and rasterization of the finished sequence.
pub mod compositor;
/// Output format selection and encoding.
pub mod output;
