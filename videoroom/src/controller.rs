//! Session controller
//!
//! Owns the connection lifecycle, the remote roster and the auxiliary
//! publisher, and wires them to the room service, the renderer and the media
//! element.
//!
//! State lives behind a single mutex. It is never held across an `.await` and
//! never held while calling into a room handle or the media element, so room
//! events fired synchronously from those calls cannot deadlock.

use crate::config::SessionConfig;
use crate::lifecycle::{participant_count_text, ConnectionState, Lifecycle};
use crate::publisher::{publishable_tracks, AuxiliaryPublisher, PublishOutcome};
use crate::render::Renderer;
use crate::roster::Roster;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};
use videoroom_core::{
    HttpTokenProvider, LocalTrack, Result, RoomEvent, RoomEventHandler, RoomHandle, RoomService,
    TokenProvider, VideoRoomError,
};
use videoroom_media::{MediaElement, MediaFile, MediaStreamTrack, PlaybackEvent};

/// A joined room and the identity used to join it
struct Session {
    identity: String,
    room: Arc<dyn RoomHandle>,
}

struct SessionState {
    lifecycle: Lifecycle,
    session: Option<Session>,
    roster: Roster,
    auxiliary: AuxiliaryPublisher,
    local_preview: Option<LocalTrack>,
    // Events delivered while the join is still resolving, with their room SID
    early_events: Vec<(String, RoomEvent)>,
}

struct Inner {
    config: SessionConfig,
    rooms: Arc<dyn RoomService>,
    tokens: Arc<dyn TokenProvider>,
    renderer: Arc<dyn Renderer>,
    media: Arc<dyn MediaElement>,
    state: Mutex<SessionState>,
}

/// Fluent builder assembling a [`SessionController`]
pub struct SessionBuilder {
    config: SessionConfig,
    rooms: Option<Arc<dyn RoomService>>,
    tokens: Option<Arc<dyn TokenProvider>>,
    renderer: Option<Arc<dyn Renderer>>,
    media: Option<Arc<dyn MediaElement>>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Start from the default configuration
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            rooms: None,
            tokens: None,
            renderer: None,
            media: None,
        }
    }

    /// Use `config`
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the media room service (required)
    pub fn room_service(mut self, rooms: Arc<dyn RoomService>) -> Self {
        self.rooms = Some(rooms);
        self
    }

    /// Set the token provider
    ///
    /// Defaults to an [`HttpTokenProvider`] for the configured server URL.
    pub fn token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Set the renderer (required)
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Set the media element playing dropped files (required)
    pub fn media_element(mut self, media: Arc<dyn MediaElement>) -> Self {
        self.media = Some(media);
        self
    }

    /// Build the controller and render its initial, disconnected state
    pub fn build(self) -> Result<SessionController> {
        let rooms = self.rooms.ok_or_else(|| missing("room_service"))?;
        let renderer = self.renderer.ok_or_else(|| missing("renderer"))?;
        let media = self.media.ok_or_else(|| missing("media_element"))?;
        let tokens: Arc<dyn TokenProvider> = match self.tokens {
            Some(tokens) => tokens,
            None => Arc::new(HttpTokenProvider::new(
                &self.config.server_url,
                self.config.request_timeout,
            )?),
        };

        let controller = SessionController {
            inner: Arc::new(Inner {
                config: self.config,
                rooms,
                tokens,
                renderer,
                media,
                state: Mutex::new(SessionState {
                    lifecycle: Lifecycle::new(),
                    session: None,
                    roster: Roster::new(),
                    auxiliary: AuxiliaryPublisher::new(),
                    local_preview: None,
                    early_events: Vec::new(),
                }),
            }),
        };

        {
            let state = controller.inner.state.lock();
            controller.render_connection(&state);
        }
        Ok(controller)
    }
}

fn missing(field: &str) -> VideoRoomError {
    VideoRoomError::MissingConfiguration {
        field: field.to_string(),
    }
}

/// Session controller handle
///
/// Cheap to clone; all clones drive the same session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("SessionController")
            .field("state", &state.lifecycle.state())
            .field("room", &state.session.as_ref().map(|s| s.room.sid().to_string()))
            .field("participants", &state.roster.len())
            .finish()
    }
}

impl SessionController {
    /// Create a builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Configuration in use
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.inner.state.lock().lifecycle.state()
    }

    /// Every connection state entered so far
    pub fn state_history(&self) -> Vec<ConnectionState> {
        self.inner.state.lock().lifecycle.history().to_vec()
    }

    /// Identity of the joined session
    pub fn identity(&self) -> Option<String> {
        let state = self.inner.state.lock();
        state.session.as_ref().map(|s| s.identity.clone())
    }

    /// SID of the joined room
    pub fn room_sid(&self) -> Option<String> {
        let state = self.inner.state.lock();
        state.session.as_ref().map(|s| s.room.sid().to_string())
    }

    /// Number of rendered remote participants
    pub fn remote_participant_count(&self) -> usize {
        self.inner.state.lock().roster.len()
    }

    /// SIDs of the rendered remote participants, sorted
    pub fn remote_participant_sids(&self) -> Vec<String> {
        let state = self.inner.state.lock();
        let mut sids: Vec<String> = state.roster.sids().map(str::to_string).collect();
        sids.sort();
        sids
    }

    /// Currently published auxiliary tracks
    pub fn auxiliary_tracks(&self) -> Vec<LocalTrack> {
        let state = self.inner.state.lock();
        state.auxiliary.published_tracks().cloned().collect()
    }

    /// Local camera preview track, once started
    pub fn local_preview(&self) -> Option<LocalTrack> {
        self.inner.state.lock().local_preview.clone()
    }

    /// Open the local camera and show it in the local preview slot
    pub async fn start_local_preview(&self) -> Result<LocalTrack> {
        let track = self.inner.rooms.create_local_video_track().await?;
        self.inner.renderer.attach_local_preview(&track);
        info!("📹 Local preview started: {}", track.id());
        self.inner.state.lock().local_preview = Some(track.clone());
        Ok(track)
    }

    /// Join a room as `identity`
    ///
    /// Valid only while disconnected. An empty identity raises the
    /// validation alert and changes nothing. Any failure while fetching the
    /// token or joining the room returns the session to disconnected and
    /// raises the connection alert.
    pub async fn request_join(&self, identity: &str) -> Result<()> {
        let identity = identity.trim();
        if identity.is_empty() {
            warn!("Join requested without an identity");
            self.inner
                .renderer
                .alert(&self.inner.config.messages.missing_identity);
            return Err(VideoRoomError::InvalidIdentity);
        }

        let attempt = {
            let mut state = self.inner.state.lock();
            let attempt = state.lifecycle.begin_join()?;
            self.render_connection(&state);
            attempt
        };
        info!("📞 Joining as {} (attempt {})", identity, attempt);

        let joined = self.connect(identity).await;
        if let Ok(room) = &joined {
            // Subscribe before the snapshot so nothing falls between the two
            let current = self.inner.state.lock().lifecycle.is_current_attempt(attempt);
            if current {
                room.on(self.event_handler(room.sid()));
            }
        }
        let joined = joined.map(|room| {
            let participants = room.participants();
            (room, participants)
        });

        let mut state = self.inner.state.lock();
        if !state.lifecycle.is_current_attempt(attempt) {
            drop(state);
            if let Ok((room, _)) = joined {
                info!(
                    "Join attempt {} resolved after shutdown, leaving room {}",
                    attempt,
                    room.sid()
                );
                room.disconnect();
            }
            return Err(VideoRoomError::JoinAbandoned { attempt });
        }

        match joined {
            Err(err) => {
                warn!("❌ Join failed: {}", err);
                state.early_events.clear();
                state.lifecycle.fail_join(attempt)?;
                self.render_connection(&state);
                drop(state);
                self.inner
                    .renderer
                    .alert(&self.inner.config.messages.connection_failed);
                Err(err)
            }
            Ok((room, participants)) => {
                state.lifecycle.complete_join(attempt)?;
                state.session = Some(Session {
                    identity: identity.to_string(),
                    room: room.clone(),
                });
                let renderer = self.inner.renderer.as_ref();
                for participant in &participants {
                    state.roster.participant_connected(participant, renderer);
                }
                let early = std::mem::take(&mut state.early_events);
                for (room_sid, event) in early {
                    if room_sid == room.sid() {
                        Self::apply_event(&mut state.roster, renderer, event);
                    }
                }
                self.render_connection(&state);
                drop(state);

                info!(
                    "✅ Joined room {} as {} with {} remote participants",
                    room.sid(),
                    identity,
                    participants.len()
                );
                Ok(())
            }
        }
    }

    async fn connect(&self, identity: &str) -> Result<Arc<dyn RoomHandle>> {
        let token = self.inner.tokens.fetch_token(identity).await?;
        self.inner.rooms.connect(&token).await
    }

    /// Leave the joined room
    ///
    /// Valid only while connected. Every remote participant view is removed;
    /// the local preview stays.
    pub fn request_leave(&self) -> Result<()> {
        let room = {
            let mut state = self.inner.state.lock();
            state.lifecycle.leave()?;
            self.teardown_session(&mut state)
        };
        if let Some(room) = room {
            room.disconnect();
        }
        Ok(())
    }

    /// Dispose of the session from any state
    ///
    /// A join in flight is abandoned: when it resolves it leaves the room it
    /// joined and applies nothing.
    pub fn shutdown(&self) {
        let room = {
            let mut state = self.inner.state.lock();
            state.lifecycle.reset();
            state.auxiliary.release_source();
            self.teardown_session(&mut state)
        };
        if let Some(room) = room {
            room.disconnect();
        }
        self.inner.media.release_source();
        info!("Session shut down");
    }

    fn teardown_session(&self, state: &mut SessionState) -> Option<Arc<dyn RoomHandle>> {
        let session = state.session.take();
        state.early_events.clear();
        state.roster.clear(self.inner.renderer.as_ref());
        // The room drops every publication when it disconnects
        state.auxiliary.forget_published();
        self.render_connection(state);

        session.map(|session| {
            info!("👋 Left room {} ({})", session.room.sid(), session.identity);
            session.room
        })
    }

    fn event_handler(&self, room_sid: &str) -> RoomEventHandler {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let room_sid = room_sid.to_string();
        Arc::new(move |event: RoomEvent| {
            if let Some(inner) = weak.upgrade() {
                SessionController { inner }.handle_room_event(&room_sid, event);
            }
        })
    }

    /// Apply a room event to the roster
    ///
    /// Events from any room other than the joined one are ignored. Events
    /// arriving while the join is still resolving are held and applied right
    /// after the initial participant snapshot.
    pub fn handle_room_event(&self, room_sid: &str, event: RoomEvent) {
        let mut state = self.inner.state.lock();
        if state.lifecycle.state() == ConnectionState::Connecting && state.session.is_none() {
            debug!("Holding {} until the join completes", event.event_type());
            state.early_events.push((room_sid.to_string(), event));
            return;
        }

        let current = state.lifecycle.is_connected()
            && state
                .session
                .as_ref()
                .is_some_and(|session| session.room.sid() == room_sid);
        if !current {
            debug!(
                "Ignoring {} from stale room {}",
                event.event_type(),
                room_sid
            );
            return;
        }

        Self::apply_event(&mut state.roster, self.inner.renderer.as_ref(), event);
        self.render_count(&state);
    }

    fn apply_event(roster: &mut Roster, renderer: &dyn Renderer, event: RoomEvent) {
        match event {
            RoomEvent::ParticipantConnected { participant } => {
                roster.participant_connected(&participant, renderer);
            }
            RoomEvent::ParticipantDisconnected { participant_sid } => {
                roster.participant_disconnected(&participant_sid, renderer);
            }
            RoomEvent::TrackSubscribed {
                participant_sid,
                track,
            } => {
                roster.attach(&participant_sid, &track, renderer);
            }
            RoomEvent::TrackUnsubscribed {
                participant_sid,
                track_sid,
            } => {
                roster.detach(&participant_sid, &track_sid, renderer);
            }
        }
    }

    /// Highlight the drop target
    pub fn drag_enter(&self) {
        self.inner.renderer.set_drop_highlight(true);
    }

    /// Clear the drop target highlight
    pub fn drag_leave(&self) {
        self.inner.renderer.set_drop_highlight(false);
    }

    /// Load a dropped file into the media element
    ///
    /// Auxiliary tracks of the previous file are torn down first, so tracks
    /// from two different files are never published together.
    pub async fn drop_file(&self, file: MediaFile) -> Result<()> {
        self.inner.renderer.set_drop_highlight(false);

        let active = self.inner.state.lock().auxiliary.has_active();
        if active {
            debug!("Tearing down auxiliary tracks before loading {}", file.name);
            self.playback_ended().await;
        }

        self.inner.media.set_source(&file)?;
        let name = file.name.clone();
        let generation = self.inner.state.lock().auxiliary.load(file);
        info!("📂 Loaded {} (source generation {})", name, generation);
        Ok(())
    }

    /// React to the media element being ready to play
    ///
    /// While connected, each captured kind without an auxiliary track gets
    /// one published; then playback starts. While not connected the file is
    /// only previewed locally.
    pub async fn playback_ready(&self) -> Result<()> {
        let target = {
            let state = self.inner.state.lock();
            match &state.session {
                Some(session) if state.lifecycle.is_connected() => {
                    Some((session.room.clone(), state.auxiliary.generation()))
                }
                _ => None,
            }
        };

        match target {
            Some((room, generation)) => {
                let stream = self.inner.media.capture_stream()?;
                for stream_track in
                    publishable_tracks(&stream, self.inner.config.publish_auxiliary_video)
                {
                    self.publish_auxiliary(&room, stream_track, generation).await;
                }
            }
            None => debug!("Not connected, playing dropped file locally only"),
        }

        self.inner.media.play()
    }

    async fn publish_auxiliary(
        &self,
        room: &Arc<dyn RoomHandle>,
        stream_track: &MediaStreamTrack,
        generation: u64,
    ) {
        let kind = stream_track.kind;
        let claimed = self
            .inner
            .state
            .lock()
            .auxiliary
            .begin_publish(kind, generation);
        if !claimed {
            debug!("Auxiliary {} track already published or publishing", kind);
            return;
        }

        let track = stream_track.to_local_track(&self.inner.config.auxiliary_track_name);
        if let Err(err) = room.publish_track(&track).await {
            self.inner.state.lock().auxiliary.abort_publish(kind, generation);
            warn!("Failed to publish auxiliary {} track: {}", kind, err);
            return;
        }

        let outcome = {
            let mut state = self.inner.state.lock();
            let current = state.lifecycle.is_connected()
                && state
                    .session
                    .as_ref()
                    .is_some_and(|session| session.room.sid() == room.sid());
            state.auxiliary.finish_publish(track, generation, current)
        };

        match outcome {
            PublishOutcome::Kept => {
                info!("📢 Published auxiliary {} track to room {}", kind, room.sid());
            }
            PublishOutcome::Stale(track) => {
                self.unpublish_quietly(Some(room.as_ref()), &track).await;
            }
        }
    }

    /// React to the end of playback
    ///
    /// Unpublishes every auxiliary track and releases the element's source.
    pub async fn playback_ended(&self) {
        let (tracks, room) = {
            let mut state = self.inner.state.lock();
            let tracks = state.auxiliary.take_published();
            state.auxiliary.release_source();
            (tracks, state.session.as_ref().map(|s| s.room.clone()))
        };

        for track in &tracks {
            self.unpublish_quietly(room.as_deref(), track).await;
        }
        self.inner.media.release_source();
    }

    /// Dispatch a media element notification
    pub async fn handle_playback_event(&self, event: PlaybackEvent) -> Result<()> {
        match event {
            PlaybackEvent::CanPlay => self.playback_ready().await,
            PlaybackEvent::Ended => {
                self.playback_ended().await;
                Ok(())
            }
        }
    }

    async fn unpublish_quietly(&self, room: Option<&dyn RoomHandle>, track: &LocalTrack) {
        let Some(room) = room else {
            debug!("No room joined, track {} has nothing to leave", track.id());
            return;
        };

        match room.unpublish_track(track).await {
            Ok(()) => info!(
                "🔕 Unpublished auxiliary {} track {}",
                track.kind(),
                track.id()
            ),
            Err(err) if err.is_stale_room() => debug!(
                "Room {} already closed, track {} went with it",
                room.sid(),
                track.id()
            ),
            Err(err) => warn!("Failed to unpublish track {}: {}", track.id(), err),
        }
    }

    fn render_connection(&self, state: &SessionState) {
        let control = state.lifecycle.state().control(&self.inner.config.labels);
        self.inner.renderer.set_control(&control);
        self.render_count(state);
    }

    fn render_count(&self, state: &SessionState) {
        let text = participant_count_text(state.lifecycle.state(), state.roster.len());
        self.inner.renderer.set_participant_count(&text);
    }
}
