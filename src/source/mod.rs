//! Frame sources: metadata probing and raw RGB24 frame streams.
//!
//! Decoding is delegated to the system `ffmpeg` binary; this module only speaks its raw-video
//! pipe protocol.

/// `ffmpeg` decode process backing [`stream::FrameSource`].
pub mod ffmpeg;
/// `ffprobe`-based metadata discovery.
pub mod probe;
/// The frame source contract and the fixed-size block reader.
pub mod stream;
