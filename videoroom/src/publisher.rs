//! Auxiliary media publication bookkeeping
//!
//! Tracks which file is loaded, which auxiliary tracks are published and
//! which publications are in flight. The session controller performs the
//! actual room calls and consults this state before and after each await.
//!
//! Every claim carries the generation it was made in. Loading a file or
//! leaving the room moves to a new generation, so a publish still in flight
//! from an older one never blocks the current file.

use std::collections::BTreeMap;
use tracing::debug;
use videoroom_core::{LocalTrack, TrackKind};
use videoroom_media::{CapturedStream, MediaFile, MediaStreamTrack};

/// What to do with a track whose publish call returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The track stays published
    Kept,
    /// The session or the source changed meanwhile; unpublish this track
    Stale(LocalTrack),
}

/// Auxiliary publication state
#[derive(Debug, Default)]
pub struct AuxiliaryPublisher {
    published: BTreeMap<TrackKind, LocalTrack>,
    in_flight: BTreeMap<TrackKind, u64>,
    generation: u64,
    source: Option<MediaFile>,
}

impl AuxiliaryPublisher {
    /// Create an empty publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation, bumped on every load and every leave
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Currently loaded file
    pub fn source(&self) -> Option<&MediaFile> {
        self.source.as_ref()
    }

    /// Published track of a kind
    pub fn published(&self, kind: TrackKind) -> Option<&LocalTrack> {
        self.published.get(&kind)
    }

    /// Every published track
    pub fn published_tracks(&self) -> impl Iterator<Item = &LocalTrack> {
        self.published.values()
    }

    /// Whether a publish of `kind` is in flight for the current generation
    pub fn is_in_flight(&self, kind: TrackKind) -> bool {
        self.in_flight.get(&kind) == Some(&self.generation)
    }

    /// Whether anything is published or being published
    pub fn has_active(&self) -> bool {
        !self.published.is_empty() || !self.in_flight.is_empty()
    }

    /// Record a newly loaded file and return its generation
    pub fn load(&mut self, file: MediaFile) -> u64 {
        self.generation += 1;
        debug!("Loaded {} as source generation {}", file.name, self.generation);
        self.source = Some(file);
        self.generation
    }

    /// Forget the loaded file
    pub fn release_source(&mut self) {
        self.source = None;
    }

    /// Claim the `kind` slot for a publish made in `generation`
    ///
    /// Returns false when `generation` is no longer current, or when a track
    /// of that kind is already published or being published in it. A claim
    /// left over from an older generation is taken over.
    pub fn begin_publish(&mut self, kind: TrackKind, generation: u64) -> bool {
        if generation != self.generation
            || self.published.contains_key(&kind)
            || self.is_in_flight(kind)
        {
            return false;
        }
        if let Some(previous) = self.in_flight.insert(kind, generation) {
            debug!(
                "Auxiliary {} claim of generation {} superseded by {}",
                kind, previous, generation
            );
        }
        true
    }

    /// Release the `kind` slot after a failed publish made in `generation`
    pub fn abort_publish(&mut self, kind: TrackKind, generation: u64) {
        self.release_claim(kind, generation);
    }

    fn release_claim(&mut self, kind: TrackKind, generation: u64) {
        if self.in_flight.get(&kind) == Some(&generation) {
            self.in_flight.remove(&kind);
        }
    }

    /// Settle a successful publish
    ///
    /// `current` tells whether the session is still connected to the room the
    /// track was published to. The track is kept only if it is and the source
    /// generation has not moved since the publish started.
    pub fn finish_publish(&mut self, track: LocalTrack, generation: u64, current: bool) -> PublishOutcome {
        let kind = track.kind();
        self.release_claim(kind, generation);

        if !current || generation != self.generation {
            debug!(
                "Auxiliary {} track {} went stale while publishing",
                kind,
                track.id()
            );
            return PublishOutcome::Stale(track);
        }

        self.published.insert(kind, track);
        PublishOutcome::Kept
    }

    /// Take every published track for unpublishing
    pub fn take_published(&mut self) -> Vec<LocalTrack> {
        std::mem::take(&mut self.published).into_values().collect()
    }

    /// Drop published references without unpublishing and start a new
    /// generation
    ///
    /// Used on leave: the room releases every publication when it disconnects,
    /// and publishes still in flight to it go stale.
    pub fn forget_published(&mut self) {
        self.published.clear();
        self.in_flight.clear();
        self.generation += 1;
    }
}

/// Stream tracks to republish: the first audio track, and the first video
/// track when `include_video` is set
pub fn publishable_tracks(stream: &CapturedStream, include_video: bool) -> Vec<&MediaStreamTrack> {
    TrackKind::ALL
        .iter()
        .filter(|kind| include_video || **kind == TrackKind::Audio)
        .filter_map(|kind| stream.first(*kind))
        .collect()
}
