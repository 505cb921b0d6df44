//! # videoroom core
//!
//! Error type, track and participant value types, the media room service
//! traits and the token endpoint client shared by the videoroom crates.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod participant;
pub mod service;
pub mod token;
pub mod track;

#[cfg(feature = "test-support")]
pub mod fake;

// Re-export main types
pub use error::{Result, VideoRoomError};
pub use participant::RemoteParticipant;
pub use service::{RoomEvent, RoomEventHandler, RoomHandle, RoomService};
pub use token::{HttpTokenProvider, TokenProvider, TOKEN_PATH};
pub use track::{LocalTrack, RemoteTrack, TrackKind, TrackPublication, TrackSource};
