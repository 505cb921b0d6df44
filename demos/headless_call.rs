//! Headless Call Demo
//!
//! Drives a full session against in-memory collaborators:
//! - Local preview and join
//! - Remote participants arriving and publishing
//! - Dropping a file and republishing its audio
//! - Replacing the file and leaving

use std::sync::Arc;
use videoroom::{
    init_logging, MediaFile, PlaybackEvent, RemoteParticipant, RemoteTrack, RoomEvent,
    SessionConfig, SessionController, TracingRenderer,
};
use videoroom_core::fake::{FakeRoomService, FakeTokenProvider};
use videoroom_media::fake::FakeMediaElement;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig::default().debug_logging();
    init_logging(config.debug_logging)?;

    println!("🚀 Headless Call Demo");
    println!("=====================");

    let rooms = Arc::new(
        FakeRoomService::new().with_participants(vec![RemoteParticipant::new("PA1", "bob")]),
    );
    let session = SessionController::builder()
        .config(config)
        .room_service(rooms.clone())
        .token_provider(Arc::new(FakeTokenProvider::new("demo-token")))
        .renderer(Arc::new(TracingRenderer))
        .media_element(Arc::new(FakeMediaElement::new()))
        .build()?;

    session.start_local_preview().await?;
    session.request_join("alice").await?;
    println!("✅ Joined as alice: {:?}", session);

    let room = rooms.last_room().ok_or("no room joined")?;
    room.emit(RoomEvent::ParticipantConnected {
        participant: RemoteParticipant::new("PA2", "carol"),
    });
    room.emit(RoomEvent::TrackSubscribed {
        participant_sid: "PA2".to_string(),
        track: RemoteTrack::video("TR1"),
    });
    println!("👥 Remote participants: {:?}", session.remote_participant_sids());

    println!("\n📋 Dropping a song");
    session.drag_enter();
    session
        .drop_file(MediaFile::new("song.mp3", "blob:song").with_mime_type("audio/mpeg"))
        .await?;
    session.handle_playback_event(PlaybackEvent::CanPlay).await?;
    println!("📢 Auxiliary tracks: {}", session.auxiliary_tracks().len());

    println!("\n📋 Replacing it with a clip");
    session
        .drop_file(MediaFile::new("clip.mp4", "blob:clip").with_mime_type("video/mp4"))
        .await?;
    session.handle_playback_event(PlaybackEvent::CanPlay).await?;
    println!("📢 Auxiliary tracks: {}", session.auxiliary_tracks().len());
    session.handle_playback_event(PlaybackEvent::Ended).await?;

    session.request_leave()?;
    println!("👋 Left, state is {}", session.state());

    session.shutdown();
    Ok(())
}
