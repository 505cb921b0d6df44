//! Connection lifecycle tests for the session controller

mod common;

use common::Harness;
use std::sync::Arc;
use videoroom::{
    ConnectionState, ControlState, RemoteParticipant, RemoteTrack, RoomHandle, SessionConfig,
    SessionController, TrackPublication, VideoRoomError,
};
use videoroom_core::fake::{FakeRoomService, FakeTokenProvider, RoomOp};
use videoroom_media::fake::FakeMediaElement;

#[tokio::test]
async fn test_initial_render() {
    let h = Harness::new();
    assert_eq!(h.session.state(), ConnectionState::Disconnected);
    assert_eq!(h.renderer.last_control(), Some(ControlState::enabled("Join call")));
    assert_eq!(h.renderer.last_count().as_deref(), Some("Disconnected."));
}

#[tokio::test]
async fn test_blank_identity_is_rejected_without_token_request() {
    let h = Harness::new();

    for identity in ["", "   ", "\t\n"] {
        let err = h.session.request_join(identity).await.unwrap_err();
        assert!(matches!(err, VideoRoomError::InvalidIdentity));
    }

    assert_eq!(h.tokens.calls(), 0);
    assert_eq!(h.session.state_history(), vec![ConnectionState::Disconnected]);
    assert_eq!(h.renderer.alerts().len(), 3);
    assert_eq!(h.renderer.alerts()[0], "Enter your name before connecting");
}

#[tokio::test]
async fn test_successful_join() {
    let h = Harness::new();
    let room = h.join("  alice ").await;

    assert_eq!(
        h.session.state_history(),
        vec![
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Connected,
        ]
    );
    assert_eq!(
        h.renderer.controls(),
        vec![
            ControlState::enabled("Join call"),
            ControlState::disabled("Connecting..."),
            ControlState::enabled("Leave call"),
        ]
    );
    assert_eq!(h.rooms.tokens(), vec!["token:alice".to_string()]);
    assert_eq!(h.session.identity().as_deref(), Some("alice"));
    assert_eq!(h.session.room_sid().as_deref(), Some(room.sid()));
    assert_eq!(room.handler_count(), 1);
    assert_eq!(h.renderer.last_count().as_deref(), Some("1 participants online."));
}

#[tokio::test]
async fn test_token_failure_returns_to_disconnected() {
    let rooms = Arc::new(FakeRoomService::new());
    let renderer = Arc::new(common::RecordingRenderer::default());
    let session = SessionController::builder()
        .room_service(rooms.clone())
        .token_provider(Arc::new(FakeTokenProvider::rejecting(500)))
        .renderer(renderer.clone())
        .media_element(Arc::new(FakeMediaElement::new()))
        .build()
        .unwrap();

    let err = session.request_join("alice").await.unwrap_err();
    assert!(matches!(err, VideoRoomError::TokenRejected { status: 500, .. }));
    assert!(err.is_connection_error());

    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert_eq!(renderer.last_control(), Some(ControlState::enabled("Join call")));
    assert_eq!(
        renderer.alerts(),
        vec!["Connection failed. Is the backend running?".to_string()]
    );
    assert_eq!(rooms.room_count(), 0);
}

#[tokio::test]
async fn test_room_join_failure_returns_to_disconnected() {
    let h = Harness::new();
    h.rooms.reject_connect(true);

    let err = h.session.request_join("alice").await.unwrap_err();
    assert!(matches!(err, VideoRoomError::RoomJoin { .. }));
    assert_eq!(h.session.state(), ConnectionState::Disconnected);
    assert_eq!(h.renderer.last_control(), Some(ControlState::enabled("Join call")));
    assert_eq!(h.renderer.last_count().as_deref(), Some("Disconnected."));
    assert_eq!(h.renderer.alerts().len(), 1);

    // The user can retry once the backend is back
    h.rooms.reject_connect(false);
    h.session.request_join("alice").await.unwrap();
    assert_eq!(h.session.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_second_join_while_connecting_is_rejected() {
    let h = Harness::new();
    let gate = h.tokens.gate();

    let (first, second) = tokio::join!(h.session.request_join("alice"), async {
        let second = h.session.request_join("bob").await;
        gate.notify_one();
        second
    });

    first.unwrap();
    assert!(matches!(second, Err(VideoRoomError::InvalidState { .. })));
    assert_eq!(h.tokens.calls(), 1);
    assert_eq!(h.rooms.room_count(), 1);
}

#[tokio::test]
async fn test_join_while_connected_is_rejected() {
    let h = Harness::new();
    h.join("alice").await;

    let err = h.session.request_join("alice").await.unwrap_err();
    assert_eq!(err.error_code(), "INVALID_STATE");
    assert_eq!(h.rooms.room_count(), 1);
}

#[tokio::test]
async fn test_leave_clears_roster_but_keeps_preview() {
    let service = FakeRoomService::new().with_participants(vec![
        RemoteParticipant::new("PA1", "bob")
            .with_publication(TrackPublication::subscribed(RemoteTrack::video("TR1"))),
        RemoteParticipant::new("PA2", "carol"),
    ]);
    let h = Harness::with_service(service);

    let preview = h.session.start_local_preview().await.unwrap();
    let room = h.join("alice").await;
    assert_eq!(h.renderer.views(), vec!["PA1", "PA2"]);

    h.session.request_leave().unwrap();

    assert!(h.renderer.views().is_empty());
    assert_eq!(h.renderer.preview().as_deref(), Some(preview.id()));
    assert_eq!(h.renderer.last_count().as_deref(), Some("Disconnected."));
    assert_eq!(h.renderer.last_control(), Some(ControlState::enabled("Join call")));
    assert_eq!(room.ops(), vec![RoomOp::Disconnected]);
    assert_eq!(h.session.room_sid(), None);
}

#[tokio::test]
async fn test_leave_requires_connected() {
    let h = Harness::new();
    let err = h.session.request_leave().unwrap_err();
    assert!(matches!(err, VideoRoomError::InvalidState { .. }));
    assert_eq!(h.session.state_history(), vec![ConnectionState::Disconnected]);
}

#[tokio::test]
async fn test_rejoin_after_leave_uses_new_room() {
    let h = Harness::new();
    let first = h.join("alice").await;
    h.session.request_leave().unwrap();
    let second = h.join("alice").await;

    assert_ne!(first.sid(), second.sid());
    assert_eq!(h.session.room_sid().as_deref(), Some(second.sid()));
    assert_eq!(h.session.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_shutdown_during_connecting_abandons_join() {
    let service = FakeRoomService::new().with_participants(vec![RemoteParticipant::new("PA1", "bob")]);
    let h = Harness::with_service(service);
    let gate = h.tokens.gate();

    let (joined, _) = tokio::join!(h.session.request_join("alice"), async {
        tokio::task::yield_now().await;
        h.session.shutdown();
        gate.notify_one();
    });

    assert!(matches!(joined, Err(VideoRoomError::JoinAbandoned { .. })));
    assert_eq!(h.session.state(), ConnectionState::Disconnected);
    assert!(h.renderer.views().is_empty());
    assert_eq!(h.renderer.last_control(), Some(ControlState::enabled("Join call")));

    // The late room was left immediately and never wired up
    let room = h.room();
    assert_eq!(room.ops(), vec![RoomOp::Disconnected]);
    assert_eq!(room.handler_count(), 0);
    assert!(h.renderer.alerts().is_empty());
}

#[tokio::test]
async fn test_shutdown_while_connected_disconnects() {
    let h = Harness::new();
    let room = h.join("alice").await;

    h.session.shutdown();
    assert_eq!(h.session.state(), ConnectionState::Disconnected);
    assert_eq!(room.ops(), vec![RoomOp::Disconnected]);

    // Idempotent
    h.session.shutdown();
    assert_eq!(room.ops(), vec![RoomOp::Disconnected]);
}

#[tokio::test]
async fn test_local_preview() {
    let h = Harness::new();
    let track = h.session.start_local_preview().await.unwrap();
    assert_eq!(h.renderer.preview().as_deref(), Some(track.id()));
    assert_eq!(h.session.local_preview(), Some(track));
}

#[tokio::test]
async fn test_local_preview_without_camera() {
    let h = Harness::new();
    h.rooms.camera_unavailable(true);

    let err = h.session.start_local_preview().await.unwrap_err();
    assert!(matches!(err, VideoRoomError::MediaUnavailable { .. }));
    assert_eq!(h.renderer.preview(), None);

    // A missing camera does not prevent joining
    h.join("alice").await;
}

#[tokio::test]
async fn test_custom_labels() {
    let mut config = SessionConfig::default();
    config.labels.leave = "Hang up".to_string();
    let h = Harness::with_config(config);

    h.join("alice").await;
    assert_eq!(h.renderer.last_control(), Some(ControlState::enabled("Hang up")));
}

#[tokio::test]
async fn test_builder_requires_collaborators() {
    let err = SessionController::builder()
        .media_element(Arc::new(FakeMediaElement::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, VideoRoomError::MissingConfiguration { field } if field == "room_service"));

    let err = SessionController::builder()
        .room_service(Arc::new(FakeRoomService::new()))
        .media_element(Arc::new(FakeMediaElement::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, VideoRoomError::MissingConfiguration { field } if field == "renderer"));
}

#[tokio::test]
async fn test_builder_validates_default_token_endpoint() {
    let err = SessionController::builder()
        .config(SessionConfig::default().server_url("ftp://backend"))
        .room_service(Arc::new(FakeRoomService::new()))
        .renderer(Arc::new(videoroom::TracingRenderer))
        .media_element(Arc::new(FakeMediaElement::new()))
        .build()
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
}
