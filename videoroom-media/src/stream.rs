//! Captured media stream types

use serde::{Deserialize, Serialize};
use videoroom_core::{LocalTrack, TrackKind};

/// A single track of a captured media stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaStreamTrack {
    /// Track ID assigned by the capturing element
    pub id: String,
    /// Track kind
    pub kind: TrackKind,
    /// Human readable label
    pub label: String,
}

impl MediaStreamTrack {
    /// Create a stream track
    pub fn new(id: impl Into<String>, kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
        }
    }

    /// Wrap this stream track as a publishable local track named `name`
    pub fn to_local_track(&self, name: &str) -> LocalTrack {
        LocalTrack::from_file_playback(name, self.kind, self.id.clone())
    }
}

/// Live output of a playing media element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedStream {
    /// Tracks in capture order
    pub tracks: Vec<MediaStreamTrack>,
}

impl CapturedStream {
    /// Create a stream from its tracks
    pub fn new(tracks: Vec<MediaStreamTrack>) -> Self {
        Self { tracks }
    }

    /// Audio tracks of the stream
    pub fn audio_tracks(&self) -> impl Iterator<Item = &MediaStreamTrack> {
        self.tracks_of(TrackKind::Audio)
    }

    /// Video tracks of the stream
    pub fn video_tracks(&self) -> impl Iterator<Item = &MediaStreamTrack> {
        self.tracks_of(TrackKind::Video)
    }

    /// Tracks of one kind
    pub fn tracks_of(&self, kind: TrackKind) -> impl Iterator<Item = &MediaStreamTrack> {
        self.tracks.iter().filter(move |t| t.kind == kind)
    }

    /// First track of a kind, the one that gets published
    pub fn first(&self, kind: TrackKind) -> Option<&MediaStreamTrack> {
        self.tracks_of(kind).next()
    }

    /// Whether the stream carries no tracks at all
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
