//! Shared helpers for session integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use videoroom::{
    ControlState, LocalTrack, RemoteTrack, Renderer, SessionConfig, SessionController,
};
use videoroom_core::fake::{FakeRoom, FakeRoomService, FakeTokenProvider};
use videoroom_media::fake::FakeMediaElement;

#[derive(Debug, Default, Clone)]
struct Recorded {
    controls: Vec<ControlState>,
    counts: Vec<String>,
    alerts: Vec<String>,
    preview: Option<String>,
    identities: BTreeMap<String, String>,
    tracks: BTreeMap<String, Vec<String>>,
    highlights: Vec<bool>,
}

/// Renderer that remembers everything it was told
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    recorded: Mutex<Recorded>,
}

impl RecordingRenderer {
    pub fn last_control(&self) -> Option<ControlState> {
        self.recorded.lock().controls.last().cloned()
    }

    pub fn controls(&self) -> Vec<ControlState> {
        self.recorded.lock().controls.clone()
    }

    pub fn last_count(&self) -> Option<String> {
        self.recorded.lock().counts.last().cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.recorded.lock().alerts.clone()
    }

    pub fn preview(&self) -> Option<String> {
        self.recorded.lock().preview.clone()
    }

    /// SIDs of the participant views currently shown
    pub fn views(&self) -> Vec<String> {
        self.recorded.lock().identities.keys().cloned().collect()
    }

    pub fn identity_of(&self, participant_sid: &str) -> Option<String> {
        self.recorded.lock().identities.get(participant_sid).cloned()
    }

    /// Track SIDs attached to a participant view, in attach order
    pub fn tracks_of(&self, participant_sid: &str) -> Vec<String> {
        self.recorded
            .lock()
            .tracks
            .get(participant_sid)
            .cloned()
            .unwrap_or_default()
    }

    pub fn highlights(&self) -> Vec<bool> {
        self.recorded.lock().highlights.clone()
    }
}

impl Renderer for RecordingRenderer {
    fn set_control(&self, control: &ControlState) {
        self.recorded.lock().controls.push(control.clone());
    }

    fn set_participant_count(&self, text: &str) {
        self.recorded.lock().counts.push(text.to_string());
    }

    fn alert(&self, message: &str) {
        self.recorded.lock().alerts.push(message.to_string());
    }

    fn attach_local_preview(&self, track: &LocalTrack) {
        self.recorded.lock().preview = Some(track.id().to_string());
    }

    fn add_participant_view(&self, participant_sid: &str, identity: &str) {
        let mut recorded = self.recorded.lock();
        assert!(
            !recorded.identities.contains_key(participant_sid),
            "duplicate view for {}",
            participant_sid
        );
        recorded
            .identities
            .insert(participant_sid.to_string(), identity.to_string());
        recorded.tracks.insert(participant_sid.to_string(), Vec::new());
    }

    fn remove_participant_view(&self, participant_sid: &str) {
        let mut recorded = self.recorded.lock();
        recorded.identities.remove(participant_sid);
        recorded.tracks.remove(participant_sid);
    }

    fn attach_track(&self, participant_sid: &str, track: &RemoteTrack) {
        let mut recorded = self.recorded.lock();
        let tracks = recorded
            .tracks
            .get_mut(participant_sid)
            .expect("track attached to a missing view");
        tracks.push(track.sid.clone());
    }

    fn detach_track(&self, participant_sid: &str, track_sid: &str) {
        if let Some(tracks) = self.recorded.lock().tracks.get_mut(participant_sid) {
            tracks.retain(|sid| sid != track_sid);
        }
    }

    fn set_drop_highlight(&self, active: bool) {
        self.recorded.lock().highlights.push(active);
    }
}

/// A session wired to in-memory collaborators
pub struct Harness {
    pub rooms: Arc<FakeRoomService>,
    pub tokens: Arc<FakeTokenProvider>,
    pub renderer: Arc<RecordingRenderer>,
    pub media: Arc<FakeMediaElement>,
    pub session: SessionController,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(FakeRoomService::new(), SessionConfig::default())
    }

    pub fn with_service(rooms: FakeRoomService) -> Self {
        Self::build(rooms, SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self::build(FakeRoomService::new(), config)
    }

    fn build(rooms: FakeRoomService, config: SessionConfig) -> Self {
        let rooms = Arc::new(rooms);
        let tokens = Arc::new(FakeTokenProvider::new("token"));
        let renderer = Arc::new(RecordingRenderer::default());
        let media = Arc::new(FakeMediaElement::new());

        let session = SessionController::builder()
            .config(config)
            .room_service(rooms.clone())
            .token_provider(tokens.clone())
            .renderer(renderer.clone())
            .media_element(media.clone())
            .build()
            .unwrap();

        Self {
            rooms,
            tokens,
            renderer,
            media,
            session,
        }
    }

    /// The room joined last
    pub fn room(&self) -> Arc<FakeRoom> {
        self.rooms.last_room().expect("no room joined")
    }

    pub async fn join(&self, identity: &str) -> Arc<FakeRoom> {
        self.session.request_join(identity).await.unwrap();
        self.room()
    }
}
