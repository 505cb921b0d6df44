//! Remote participant roster
//!
//! Mirrors room events into participant views on the renderer. Every
//! operation is idempotent: the roster remembers which participants and
//! tracks it has rendered and only forwards actual changes.

use crate::render::Renderer;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use videoroom_core::{RemoteParticipant, RemoteTrack};

/// A rendered remote participant
#[derive(Debug, Clone)]
pub struct ParticipantView {
    /// Participant SID
    pub sid: String,
    /// Display identity
    pub identity: String,
    /// SIDs of tracks currently attached to the view
    pub attached: BTreeSet<String>,
    /// When the view was created
    pub joined_at: DateTime<Utc>,
}

/// Views of the remote participants of the current room
#[derive(Debug, Default)]
pub struct Roster {
    views: HashMap<String, ParticipantView>,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of remote participants rendered
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether no remote participant is rendered
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// View of a participant
    pub fn get(&self, participant_sid: &str) -> Option<&ParticipantView> {
        self.views.get(participant_sid)
    }

    /// Whether a participant has a view
    pub fn contains(&self, participant_sid: &str) -> bool {
        self.views.contains_key(participant_sid)
    }

    /// SIDs of every rendered participant, in no particular order
    pub fn sids(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    /// Render a participant and every track already subscribed
    ///
    /// A participant seen again only gets its missing tracks attached.
    /// Returns whether a new view was created.
    pub fn participant_connected(
        &mut self,
        participant: &RemoteParticipant,
        renderer: &dyn Renderer,
    ) -> bool {
        let created = if self.views.contains_key(&participant.sid) {
            debug!("Participant {} already rendered", participant.sid);
            false
        } else {
            renderer.add_participant_view(&participant.sid, &participant.identity);
            self.views.insert(
                participant.sid.clone(),
                ParticipantView {
                    sid: participant.sid.clone(),
                    identity: participant.identity.clone(),
                    attached: BTreeSet::new(),
                    joined_at: Utc::now(),
                },
            );
            debug!("👋 Participant {} ({}) joined", participant.identity, participant.sid);
            true
        };

        for track in participant.subscribed_tracks() {
            self.attach(&participant.sid, track, renderer);
        }
        created
    }

    /// Attach a subscribed track to its participant's view
    ///
    /// Returns whether the renderer was asked to attach anything.
    pub fn attach(
        &mut self,
        participant_sid: &str,
        track: &RemoteTrack,
        renderer: &dyn Renderer,
    ) -> bool {
        let Some(view) = self.views.get_mut(participant_sid) else {
            debug!(
                "Ignoring track {} for unknown participant {}",
                track.sid, participant_sid
            );
            return false;
        };

        if !view.attached.insert(track.sid.clone()) {
            debug!("Track {} already attached to {}", track.sid, participant_sid);
            return false;
        }

        renderer.attach_track(participant_sid, track);
        debug!("Attached {} track {} to {}", track.kind, track.sid, participant_sid);
        true
    }

    /// Detach a track from its participant's view
    pub fn detach(&mut self, participant_sid: &str, track_sid: &str, renderer: &dyn Renderer) -> bool {
        let removed = self
            .views
            .get_mut(participant_sid)
            .is_some_and(|view| view.attached.remove(track_sid));

        if removed {
            renderer.detach_track(participant_sid, track_sid);
            debug!("Detached track {} from {}", track_sid, participant_sid);
        }
        removed
    }

    /// Remove a participant's view
    pub fn participant_disconnected(&mut self, participant_sid: &str, renderer: &dyn Renderer) -> bool {
        match self.views.remove(participant_sid) {
            Some(view) => {
                renderer.remove_participant_view(participant_sid);
                debug!("👋 Participant {} ({}) left", view.identity, participant_sid);
                true
            }
            None => false,
        }
    }

    /// Remove every view
    pub fn clear(&mut self, renderer: &dyn Renderer) {
        for sid in self.views.keys() {
            renderer.remove_participant_view(sid);
        }
        self.views.clear();
    }
}
