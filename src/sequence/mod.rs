/// Append-only unit sequence shared between producer and renderers.
pub mod bars;
