//! # videoroom media
//!
//! Dropped-file playback and stream capture for videoroom. The actual decoding
//! and rendering of the file belong to the host's media element; this crate
//! describes what the session controller needs from it.

#![warn(clippy::all)]

pub mod playback;
pub mod stream;

#[cfg(feature = "test-support")]
pub mod fake;

// Re-export main types
pub use playback::{MediaElement, MediaFile, PlaybackEvent};
pub use stream::{CapturedStream, MediaStreamTrack};
