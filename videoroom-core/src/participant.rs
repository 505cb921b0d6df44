//! Participant management and abstractions

use crate::track::{RemoteTrack, TrackPublication};
use serde::{Deserialize, Serialize};

/// Remote participant representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteParticipant {
    /// Participant SID, unique within a room
    pub sid: String,
    /// Display identity
    pub identity: String,
    /// Publications known when this snapshot was taken
    pub publications: Vec<TrackPublication>,
}

impl RemoteParticipant {
    /// Create a participant without publications
    pub fn new(sid: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            identity: identity.into(),
            publications: Vec::new(),
        }
    }

    /// Add a publication to this snapshot
    pub fn with_publication(mut self, publication: TrackPublication) -> Self {
        self.publications.push(publication);
        self
    }

    /// Tracks already subscribed at the time of the snapshot
    pub fn subscribed_tracks(&self) -> impl Iterator<Item = &RemoteTrack> {
        self.publications.iter().filter_map(|p| p.track.as_ref())
    }
}
