/// Incremental live canvas.
pub mod renderer;
