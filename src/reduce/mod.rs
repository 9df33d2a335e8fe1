//! Frame reduction strategies.

/// Render mode selection.
pub mod mode;
/// Units and the reducers that produce them.
pub mod reducer;
