//! In-memory room service, room and token provider
//!
//! Used by the test suites and the headless demo. Every operation is recorded
//! so tests can assert on ordering.

use crate::error::{Result, VideoRoomError};
use crate::participant::RemoteParticipant;
use crate::service::{RoomEvent, RoomEventHandler, RoomHandle, RoomService};
use crate::token::TokenProvider;
use crate::track::{LocalTrack, TrackPublication};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Operation recorded by a [`FakeRoom`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomOp {
    /// A track was published
    Published {
        /// Local track ID
        track_id: String,
    },
    /// A track was unpublished
    Unpublished {
        /// Local track ID
        track_id: String,
    },
    /// The room was disconnected
    Disconnected,
}

/// Room that lives entirely in memory
pub struct FakeRoom {
    sid: String,
    connected: AtomicBool,
    participants: Mutex<Vec<RemoteParticipant>>,
    handlers: Mutex<Vec<RoomEventHandler>>,
    published: Mutex<Vec<LocalTrack>>,
    ops: Mutex<Vec<RoomOp>>,
    publish_gate: Mutex<Option<Arc<Notify>>>,
    waiting_publishes: AtomicUsize,
    fail_publish: AtomicBool,
    late_arrivals: Mutex<Vec<RoomEvent>>,
}

impl FakeRoom {
    /// Create a connected room with the given remote participants
    pub fn new(sid: impl Into<String>, participants: Vec<RemoteParticipant>) -> Self {
        Self {
            sid: sid.into(),
            connected: AtomicBool::new(true),
            participants: Mutex::new(participants),
            handlers: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
            ops: Mutex::new(Vec::new()),
            publish_gate: Mutex::new(None),
            waiting_publishes: AtomicUsize::new(0),
            fail_publish: AtomicBool::new(false),
            late_arrivals: Mutex::new(Vec::new()),
        }
    }

    /// Events emitted right after the next participant snapshot is taken
    pub fn with_late_arrivals(self, events: Vec<RoomEvent>) -> Self {
        *self.late_arrivals.lock() = events;
        self
    }

    /// Deliver an event to every registered handler
    ///
    /// Participant membership is updated first so later snapshots agree with
    /// the events delivered so far.
    pub fn emit(&self, event: RoomEvent) {
        match &event {
            RoomEvent::ParticipantConnected { participant } => {
                self.participants.lock().push(participant.clone());
            }
            RoomEvent::ParticipantDisconnected { participant_sid } => {
                self.participants.lock().retain(|p| &p.sid != participant_sid);
            }
            RoomEvent::TrackSubscribed {
                participant_sid,
                track,
            } => {
                let mut participants = self.participants.lock();
                if let Some(participant) = participants.iter_mut().find(|p| &p.sid == participant_sid) {
                    participant.publications.retain(|p| p.track_sid != track.sid);
                    participant
                        .publications
                        .push(TrackPublication::subscribed(track.clone()));
                }
            }
            RoomEvent::TrackUnsubscribed {
                participant_sid,
                track_sid,
            } => {
                let mut participants = self.participants.lock();
                if let Some(participant) = participants.iter_mut().find(|p| &p.sid == participant_sid) {
                    for publication in participant.publications.iter_mut() {
                        if &publication.track_sid == track_sid {
                            publication.track = None;
                        }
                    }
                }
            }
        }

        let handlers: Vec<RoomEventHandler> = self.handlers.lock().clone();
        for handler in handlers {
            handler(event.clone());
        }
    }

    /// Hold every publish until the returned gate is notified
    pub fn gate_publishes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.publish_gate.lock() = Some(gate.clone());
        gate
    }

    /// Number of publishes currently held by the gate
    pub fn waiting_publishes(&self) -> usize {
        self.waiting_publishes.load(Ordering::SeqCst)
    }

    /// Make subsequent publishes fail
    pub fn fail_publishes(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }

    /// Number of registered event handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Tracks currently published
    pub fn published(&self) -> Vec<LocalTrack> {
        self.published.lock().clone()
    }

    /// Every operation performed on this room, in order
    pub fn ops(&self) -> Vec<RoomOp> {
        self.ops.lock().clone()
    }
}

#[async_trait]
impl RoomHandle for FakeRoom {
    fn sid(&self) -> &str {
        &self.sid
    }

    fn participants(&self) -> Vec<RemoteParticipant> {
        let snapshot = self.participants.lock().clone();
        let arrivals = std::mem::take(&mut *self.late_arrivals.lock());
        for event in arrivals {
            self.emit(event);
        }
        snapshot
    }

    fn on(&self, handler: RoomEventHandler) {
        self.handlers.lock().push(handler);
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn publish_track(&self, track: &LocalTrack) -> Result<()> {
        let gate = self.publish_gate.lock().clone();
        if let Some(gate) = gate {
            self.waiting_publishes.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
            self.waiting_publishes.fetch_sub(1, Ordering::SeqCst);
        }

        if !self.is_connected() {
            return Err(VideoRoomError::RoomClosed {
                room_sid: self.sid.clone(),
            });
        }
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(VideoRoomError::Publish {
                track_id: track.id().to_string(),
                reason: "publish rejected".to_string(),
            });
        }

        self.published.lock().push(track.clone());
        self.ops.lock().push(RoomOp::Published {
            track_id: track.id().to_string(),
        });
        Ok(())
    }

    async fn unpublish_track(&self, track: &LocalTrack) -> Result<()> {
        if !self.is_connected() {
            return Err(VideoRoomError::RoomClosed {
                room_sid: self.sid.clone(),
            });
        }

        self.published.lock().retain(|t| t.id() != track.id());
        self.ops.lock().push(RoomOp::Unpublished {
            track_id: track.id().to_string(),
        });
        Ok(())
    }

    fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.published.lock().clear();
            self.ops.lock().push(RoomOp::Disconnected);
        }
    }
}

/// Room service handing out [`FakeRoom`]s
#[derive(Default)]
pub struct FakeRoomService {
    initial_participants: Mutex<Vec<RemoteParticipant>>,
    late_arrivals: Mutex<Vec<RoomEvent>>,
    rooms: Mutex<Vec<Arc<FakeRoom>>>,
    tokens: Mutex<Vec<String>>,
    reject_connect: AtomicBool,
    camera_unavailable: AtomicBool,
}

impl FakeRoomService {
    /// Create a service whose rooms start empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Participants present in every room joined from now on
    pub fn with_participants(self, participants: Vec<RemoteParticipant>) -> Self {
        *self.initial_participants.lock() = participants;
        self
    }

    /// Events the next joined room emits right after its first participant
    /// snapshot
    pub fn with_late_arrivals(self, events: Vec<RoomEvent>) -> Self {
        *self.late_arrivals.lock() = events;
        self
    }

    /// Make subsequent connects fail
    pub fn reject_connect(&self, reject: bool) {
        self.reject_connect.store(reject, Ordering::SeqCst);
    }

    /// Make the local camera unavailable
    pub fn camera_unavailable(&self, unavailable: bool) {
        self.camera_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Most recently joined room
    pub fn last_room(&self) -> Option<Arc<FakeRoom>> {
        self.rooms.lock().last().cloned()
    }

    /// Number of rooms joined
    pub fn room_count(&self) -> usize {
        self.rooms.lock().len()
    }

    /// Tokens presented to `connect`, in order
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().clone()
    }
}

#[async_trait]
impl RoomService for FakeRoomService {
    async fn create_local_video_track(&self) -> Result<LocalTrack> {
        if self.camera_unavailable.load(Ordering::SeqCst) {
            return Err(VideoRoomError::MediaUnavailable {
                reason: "no camera".to_string(),
            });
        }
        Ok(LocalTrack::camera())
    }

    async fn connect(&self, token: &str) -> Result<Arc<dyn RoomHandle>> {
        self.tokens.lock().push(token.to_string());
        if self.reject_connect.load(Ordering::SeqCst) {
            return Err(VideoRoomError::RoomJoin {
                reason: "access token rejected".to_string(),
            });
        }

        let mut rooms = self.rooms.lock();
        let room = Arc::new(
            FakeRoom::new(
                format!("RM{}", rooms.len() + 1),
                self.initial_participants.lock().clone(),
            )
            .with_late_arrivals(std::mem::take(&mut *self.late_arrivals.lock())),
        );
        rooms.push(room.clone());
        Ok(room)
    }
}

/// Token provider answering from memory
pub struct FakeTokenProvider {
    outcome: Mutex<std::result::Result<String, u16>>,
    calls: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeTokenProvider {
    /// Provider that always returns `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            outcome: Mutex::new(Ok(token.into())),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    /// Provider that always fails as if the endpoint answered `status`
    pub fn rejecting(status: u16) -> Self {
        let provider = Self::new("");
        *provider.outcome.lock() = Err(status);
        provider
    }

    /// Hold every fetch until the returned gate is notified
    pub fn gate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    /// Number of token requests made
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for FakeTokenProvider {
    async fn fetch_token(&self, identity: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let outcome = self.outcome.lock().clone();
        match outcome {
            Ok(token) => Ok(format!("{}:{}", token, identity)),
            Err(status) => Err(VideoRoomError::TokenRejected {
                status,
                body: "rejected".to_string(),
            }),
        }
    }
}
