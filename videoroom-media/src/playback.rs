//! Playback of dropped media files

use crate::stream::CapturedStream;
use serde::{Deserialize, Serialize};
use videoroom_core::Result;

/// A file dropped onto the drop target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// File name as reported by the drop
    pub name: String,
    /// MIME type, when the host knows it
    pub mime_type: Option<String>,
    /// Size in bytes
    pub size: u64,
    /// Location the media element can load the file from
    pub url: String,
}

impl MediaFile {
    /// Describe a dropped file
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            size: 0,
            url: url.into(),
        }
    }

    /// Set the MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the size in bytes
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Whether the MIME type announces video content
    pub fn is_video(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("video/"))
    }
}

/// Notifications from the media element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Enough of the source is buffered to start playing
    CanPlay,
    /// Playback reached the end of the source
    Ended,
}

/// The element that plays dropped files
///
/// Implementations report readiness and end of playback to the controller as
/// [`PlaybackEvent`]s; the controller drives the element through this trait.
pub trait MediaElement: Send + Sync {
    /// Load a new source, replacing the current one
    fn set_source(&self, file: &MediaFile) -> Result<()>;

    /// Release the current source
    fn release_source(&self);

    /// Capture the element's rendered output as a live stream
    fn capture_stream(&self) -> Result<CapturedStream>;

    /// Start playback
    fn play(&self) -> Result<()>;
}
