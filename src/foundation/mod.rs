//! Shared value types, constants and the error taxonomy.

/// Frame, canvas and sampling-window types.
pub mod core;
/// Error type used by every fallible API.
pub mod error;
