//! Track management and abstractions

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Track kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Audio track
    Audio,
    /// Video track
    Video,
}

impl TrackKind {
    /// All kinds, audio first
    pub const ALL: [TrackKind; 2] = [TrackKind::Audio, TrackKind::Video];
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Video => write!(f, "video"),
        }
    }
}

/// Track source enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSource {
    /// Camera/webcam video
    Camera,
    /// Microphone audio
    Microphone,
    /// File playback
    File,
    /// Other/unknown source
    Unknown,
}

impl std::fmt::Display for TrackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackSource::Camera => write!(f, "camera"),
            TrackSource::Microphone => write!(f, "microphone"),
            TrackSource::File => write!(f, "file"),
            TrackSource::Unknown => write!(f, "unknown"),
        }
    }
}

/// Local track representation for tracks created by this participant
#[derive(Debug, Clone)]
pub struct LocalTrack {
    /// Track ID
    id: String,
    /// Track name announced to the room
    name: String,
    /// Track kind (audio/video)
    kind: TrackKind,
    /// Track source (camera, file, ...)
    source: TrackSource,
    /// ID of the underlying media stream track, if any
    media_track_id: Option<String>,
    /// Creation time
    created_at: Instant,
}

impl LocalTrack {
    /// Create a new local track with a fresh ID
    pub fn new(name: impl Into<String>, kind: TrackKind, source: TrackSource) -> Self {
        let track = Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            source,
            media_track_id: None,
            created_at: Instant::now(),
        };
        info!(
            "🎚️ Creating local {} track: {} (name: {}, source: {})",
            track.kind, track.id, track.name, track.source
        );
        track
    }

    /// Create the local camera preview track
    pub fn camera() -> Self {
        Self::new("camera", TrackKind::Video, TrackSource::Camera)
    }

    /// Wrap a captured media stream track coming from file playback
    pub fn from_file_playback(
        name: impl Into<String>,
        kind: TrackKind,
        media_track_id: impl Into<String>,
    ) -> Self {
        let mut track = Self::new(name, kind, TrackSource::File);
        track.media_track_id = Some(media_track_id.into());
        track
    }

    /// Get track ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get track name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get track kind
    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    /// Get track source
    pub fn source(&self) -> TrackSource {
        self.source
    }

    /// Get the underlying media stream track ID
    pub fn media_track_id(&self) -> Option<&str> {
        self.media_track_id.as_deref()
    }

    /// How long ago this track was created
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }
}

impl PartialEq for LocalTrack {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for LocalTrack {}

/// Remote track representation for tracks from other participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTrack {
    /// Track SID assigned by the room service
    pub sid: String,
    /// Track name
    pub name: String,
    /// Track kind (audio/video)
    pub kind: TrackKind,
}

impl RemoteTrack {
    /// Create a remote track
    pub fn new(sid: impl Into<String>, name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            sid: sid.into(),
            name: name.into(),
            kind,
        }
    }

    /// Remote audio track
    pub fn audio(sid: impl Into<String>) -> Self {
        Self::new(sid, "audio", TrackKind::Audio)
    }

    /// Remote video track
    pub fn video(sid: impl Into<String>) -> Self {
        Self::new(sid, "video", TrackKind::Video)
    }
}

/// A remote participant's track publication
///
/// A publication may already carry a subscribed track when the participant is
/// first observed, or receive it later through a track-subscribed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPublication {
    /// Published track SID
    pub track_sid: String,
    /// Published track kind
    pub kind: TrackKind,
    /// Subscribed track, if the subscription is already established
    pub track: Option<RemoteTrack>,
}

impl TrackPublication {
    /// Publication that has not been subscribed yet
    pub fn unsubscribed(track_sid: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            track_sid: track_sid.into(),
            kind,
            track: None,
        }
    }

    /// Publication with an established subscription
    pub fn subscribed(track: RemoteTrack) -> Self {
        Self {
            track_sid: track.sid.clone(),
            kind: track.kind,
            track: Some(track),
        }
    }

    /// Check if the publication is subscribed
    pub fn is_subscribed(&self) -> bool {
        self.track.is_some()
    }
}
