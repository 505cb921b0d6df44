//! In-memory media element

use crate::playback::{MediaElement, MediaFile};
use crate::stream::{CapturedStream, MediaStreamTrack};
use parking_lot::Mutex;
use videoroom_core::{Result, TrackKind, VideoRoomError};

/// Call recorded by [`FakeMediaElement`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementOp {
    /// A source was loaded
    SetSource {
        /// File name
        name: String,
    },
    /// The source was released
    ReleaseSource,
    /// The output stream was captured
    Capture,
    /// Playback started
    Play,
}

/// Media element that records calls and captures a canned stream
///
/// The captured stream is derived from the loaded file: audio always, video
/// too when the file's MIME type is `video/*`.
#[derive(Debug, Default)]
pub struct FakeMediaElement {
    source: Mutex<Option<MediaFile>>,
    ops: Mutex<Vec<ElementOp>>,
    captures: Mutex<u32>,
}

impl FakeMediaElement {
    /// Create an element without a source
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently loaded file
    pub fn source(&self) -> Option<MediaFile> {
        self.source.lock().clone()
    }

    /// Every call made on this element, in order
    pub fn ops(&self) -> Vec<ElementOp> {
        self.ops.lock().clone()
    }

    /// Number of times playback was started
    pub fn play_count(&self) -> usize {
        self.ops
            .lock()
            .iter()
            .filter(|op| **op == ElementOp::Play)
            .count()
    }
}

impl MediaElement for FakeMediaElement {
    fn set_source(&self, file: &MediaFile) -> Result<()> {
        *self.source.lock() = Some(file.clone());
        self.ops.lock().push(ElementOp::SetSource {
            name: file.name.clone(),
        });
        Ok(())
    }

    fn release_source(&self) {
        *self.source.lock() = None;
        self.ops.lock().push(ElementOp::ReleaseSource);
    }

    fn capture_stream(&self) -> Result<CapturedStream> {
        let source = self.source.lock().clone().ok_or_else(|| VideoRoomError::Media {
            reason: "no source loaded".to_string(),
        })?;
        self.ops.lock().push(ElementOp::Capture);

        let captures = {
            let mut count = self.captures.lock();
            *count += 1;
            *count
        };
        let mut tracks = vec![MediaStreamTrack::new(
            format!("audio-{}", captures),
            TrackKind::Audio,
            source.name.clone(),
        )];
        if source.is_video() {
            tracks.push(MediaStreamTrack::new(
                format!("video-{}", captures),
                TrackKind::Video,
                source.name,
            ));
        }
        Ok(CapturedStream::new(tracks))
    }

    fn play(&self) -> Result<()> {
        if self.source.lock().is_none() {
            return Err(VideoRoomError::Media {
                reason: "no source loaded".to_string(),
            });
        }
        self.ops.lock().push(ElementOp::Play);
        Ok(())
    }
}
