//! Tests for the in-memory room service used by the controller tests

#![cfg(feature = "test-support")]

use std::sync::{Arc, Mutex};
use videoroom_core::fake::{FakeRoomService, FakeTokenProvider, RoomOp};
use videoroom_core::{
    LocalTrack, RemoteParticipant, RoomEvent, RoomHandle, RoomService, TokenProvider, TrackKind,
};

#[tokio::test]
async fn test_disconnected_room_rejects_unpublish_as_closed() {
    let service = FakeRoomService::new();
    let room = service.connect("token").await.unwrap();
    let track = LocalTrack::from_file_playback("bgaudio", TrackKind::Audio, "mst-1");

    room.publish_track(&track).await.unwrap();
    room.disconnect();

    let err = room.unpublish_track(&track).await.unwrap_err();
    assert!(err.is_stale_room());

    let fake = service.last_room().unwrap();
    assert!(fake.published().is_empty());
    assert_eq!(
        fake.ops(),
        vec![
            RoomOp::Published {
                track_id: track.id().to_string()
            },
            RoomOp::Disconnected,
        ]
    );
}

#[tokio::test]
async fn test_emit_updates_snapshot_and_reaches_handlers() {
    let service = FakeRoomService::new();
    service.connect("token").await.unwrap();
    let room = service.last_room().unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    room.on(Arc::new(move |event: RoomEvent| {
        sink.lock().unwrap().push(event.event_type());
    }));

    room.emit(RoomEvent::ParticipantConnected {
        participant: RemoteParticipant::new("PA1", "bob"),
    });
    assert_eq!(room.participants().len(), 1);

    room.emit(RoomEvent::ParticipantDisconnected {
        participant_sid: "PA1".to_string(),
    });
    assert!(room.participants().is_empty());
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["participantConnected", "participantDisconnected"]
    );
}

#[tokio::test]
async fn test_rejecting_token_provider() {
    let provider = FakeTokenProvider::rejecting(403);
    let err = provider.fetch_token("alice").await.unwrap_err();
    assert!(err.is_connection_error());
    assert_eq!(provider.calls(), 1);
}

#[test]
fn test_gated_token_fetch_waits_for_release() {
    let provider = FakeTokenProvider::new("tok");
    let gate = provider.gate();

    let mut fetch = tokio_test::task::spawn(provider.fetch_token("alice"));
    tokio_test::assert_pending!(fetch.poll());
    assert_eq!(provider.calls(), 1);

    gate.notify_one();
    assert!(fetch.is_woken());
    let token = tokio_test::assert_ready_ok!(fetch.poll());
    assert_eq!(token, "tok:alice");
}

#[test]
fn test_gated_publish_waits_for_release() {
    let room = videoroom_core::fake::FakeRoom::new("RM1", Vec::new());
    let gate = room.gate_publishes();
    let track = LocalTrack::from_file_playback("bgaudio", TrackKind::Audio, "mst-1");

    let mut publish = tokio_test::task::spawn(room.publish_track(&track));
    tokio_test::assert_pending!(publish.poll());
    assert!(room.published().is_empty());

    gate.notify_one();
    tokio_test::assert_ready_ok!(publish.poll());
    drop(publish);
    assert_eq!(room.published(), vec![track]);
}

#[tokio::test]
async fn test_late_arrivals_follow_the_first_snapshot() {
    let service = FakeRoomService::new().with_late_arrivals(vec![
        RoomEvent::ParticipantConnected {
            participant: RemoteParticipant::new("PA1", "bob"),
        },
        RoomEvent::TrackSubscribed {
            participant_sid: "PA1".to_string(),
            track: videoroom_core::RemoteTrack::audio("TR1"),
        },
    ]);
    let room = service.connect("token").await.unwrap();

    assert!(room.participants().is_empty());
    let after = room.participants();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].subscribed_tracks().count(), 1);
}
