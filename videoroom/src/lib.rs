//! # videoroom - Video Room Session Controller
//!
//! videoroom joins a real-time video room on behalf of a user, mirrors the
//! room's remote participants into a rendering surface and republishes the
//! audio (and optionally video) of a media file dropped onto the page.
//!
//! ## Key Features
//!
//! - **Guarded lifecycle**: Disconnected, Connecting and Connected with exactly
//!   one join in flight and a safe shutdown at any point
//! - **Idempotent roster**: one view per remote participant, each track attached
//!   once no matter how its subscription was reported
//! - **Auxiliary publishing**: tracks of a dropped file follow its playback and
//!   never outlive the file or the session
//! - **Pluggable collaborators**: room service, token provider, renderer and
//!   media element are traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use videoroom::{init_logging, MediaFile, SessionConfig, SessionController, TracingRenderer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), videoroom::VideoRoomError> {
//!     let config = SessionConfig::default().server_url("http://127.0.0.1:5000");
//!     init_logging(config.debug_logging)?;
//!
//!     // `my_room_service` and `my_media_element` wrap the host platform
//!     let session = SessionController::builder()
//!         .config(config)
//!         .room_service(my_room_service)
//!         .renderer(Arc::new(TracingRenderer))
//!         .media_element(my_media_element)
//!         .build()?;
//!
//!     session.start_local_preview().await?;
//!     session.request_join("alice").await?;
//!
//!     session.drop_file(MediaFile::new("song.mp3", "blob:song")).await?;
//!     session.playback_ready().await?;
//!
//!     session.request_leave()?;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod controller;
pub mod lifecycle;
pub mod logging;
pub mod publisher;
pub mod render;
pub mod roster;

// Re-export main API types
pub use config::{ControlLabels, SessionConfig, UserMessages};
pub use controller::{SessionBuilder, SessionController};
pub use lifecycle::{participant_count_text, ConnectionState};
pub use logging::init_logging;
pub use render::{ControlState, Renderer, TracingRenderer};

// Re-export collaborator types for easy access
pub use videoroom_core::{
    HttpTokenProvider, LocalTrack, RemoteParticipant, RemoteTrack, Result, RoomEvent,
    RoomEventHandler, RoomHandle, RoomService, TokenProvider, TrackKind, TrackPublication,
    TrackSource, VideoRoomError,
};
pub use videoroom_media::{CapturedStream, MediaElement, MediaFile, MediaStreamTrack, PlaybackEvent};
