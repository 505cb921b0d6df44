//! Media room service abstractions and room events
//!
//! The room service owns media transport, signaling and track internals. The
//! session controller only sees the operations and events declared here.

use crate::error::Result;
use crate::participant::RemoteParticipant;
use crate::track::{LocalTrack, RemoteTrack};
use async_trait::async_trait;
use std::sync::Arc;

/// Events emitted by a joined room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// A participant joined the room
    ParticipantConnected {
        /// The participant that joined
        participant: RemoteParticipant,
    },
    /// A participant left the room
    ParticipantDisconnected {
        /// SID of the participant that left
        participant_sid: String,
    },
    /// A remote track was subscribed
    TrackSubscribed {
        /// SID of the publishing participant
        participant_sid: String,
        /// The subscribed track
        track: RemoteTrack,
    },
    /// A remote track was unsubscribed
    TrackUnsubscribed {
        /// SID of the publishing participant
        participant_sid: String,
        /// SID of the track that went away
        track_sid: String,
    },
}

impl RoomEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::ParticipantConnected { .. } => "participantConnected",
            RoomEvent::ParticipantDisconnected { .. } => "participantDisconnected",
            RoomEvent::TrackSubscribed { .. } => "trackSubscribed",
            RoomEvent::TrackUnsubscribed { .. } => "trackUnsubscribed",
        }
    }

    /// SID of the participant this event concerns
    pub fn participant_sid(&self) -> &str {
        match self {
            RoomEvent::ParticipantConnected { participant } => &participant.sid,
            RoomEvent::ParticipantDisconnected { participant_sid }
            | RoomEvent::TrackSubscribed {
                participant_sid, ..
            }
            | RoomEvent::TrackUnsubscribed {
                participant_sid, ..
            } => participant_sid,
        }
    }

    /// Check if this is a participant-related event
    pub fn is_participant_event(&self) -> bool {
        matches!(
            self,
            RoomEvent::ParticipantConnected { .. } | RoomEvent::ParticipantDisconnected { .. }
        )
    }

    /// Check if this is a track-related event
    pub fn is_track_event(&self) -> bool {
        matches!(
            self,
            RoomEvent::TrackSubscribed { .. } | RoomEvent::TrackUnsubscribed { .. }
        )
    }
}

/// Callback registered on a room through [`RoomHandle::on`]
pub type RoomEventHandler = Arc<dyn Fn(RoomEvent) + Send + Sync>;

/// Entry point of the external media room service
#[async_trait]
pub trait RoomService: Send + Sync {
    /// Open the local camera and return its track
    async fn create_local_video_track(&self) -> Result<LocalTrack>;

    /// Join the room the token grants access to
    async fn connect(&self, token: &str) -> Result<Arc<dyn RoomHandle>>;
}

/// A joined room
///
/// Once [`RoomHandle::disconnect`] has been called, publish and unpublish
/// return [`crate::VideoRoomError::RoomClosed`].
#[async_trait]
pub trait RoomHandle: Send + Sync {
    /// Room SID
    fn sid(&self) -> &str;

    /// Snapshot of the remote participants currently in the room
    fn participants(&self) -> Vec<RemoteParticipant>;

    /// Subscribe to room events
    fn on(&self, handler: RoomEventHandler);

    /// Whether the room is still connected
    fn is_connected(&self) -> bool;

    /// Publish a local track
    async fn publish_track(&self, track: &LocalTrack) -> Result<()>;

    /// Unpublish a local track
    async fn unpublish_track(&self, track: &LocalTrack) -> Result<()>;

    /// Leave the room, releasing every local publication
    fn disconnect(&self);
}

impl std::fmt::Debug for dyn RoomHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomHandle")
            .field("sid", &self.sid())
            .field("connected", &self.is_connected())
            .finish()
    }
}
