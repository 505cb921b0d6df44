//! Configuration types and defaults

use std::time::Duration;

/// Labels shown on the join/leave control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlLabels {
    /// Label while disconnected
    pub join: String,
    /// Label while a join is in flight
    pub connecting: String,
    /// Label while connected
    pub leave: String,
}

impl Default for ControlLabels {
    fn default() -> Self {
        Self {
            join: "Join call".to_string(),
            connecting: "Connecting...".to_string(),
            leave: "Leave call".to_string(),
        }
    }
}

/// Messages surfaced to the user through the renderer's alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessages {
    /// Shown when joining without an identity
    pub missing_identity: String,
    /// Shown when the token request or room join fails
    pub connection_failed: String,
}

impl Default for UserMessages {
    fn default() -> Self {
        Self {
            missing_identity: "Enter your name before connecting".to_string(),
            connection_failed: "Connection failed. Is the backend running?".to_string(),
        }
    }
}

/// Session controller configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the backend serving the token endpoint
    pub server_url: String,
    /// Timeout applied to token requests
    pub request_timeout: Duration,
    /// Name given to tracks republished from a dropped file
    pub auxiliary_track_name: String,
    /// Publish the video track of dropped video files, not only their audio
    pub publish_auxiliary_video: bool,
    /// Join/leave control labels
    pub labels: ControlLabels,
    /// User facing messages
    pub messages: UserMessages,
    /// Enable debug logging
    pub debug_logging: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(30),
            auxiliary_track_name: "bgaudio".to_string(),
            publish_auxiliary_video: true,
            labels: ControlLabels::default(),
            messages: UserMessages::default(),
            debug_logging: false,
        }
    }
}

impl SessionConfig {
    /// Set the backend base URL
    pub fn server_url(mut self, url: &str) -> Self {
        self.server_url = url.to_string();
        self
    }

    /// Set the token request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the name of republished file tracks
    pub fn auxiliary_track_name(mut self, name: &str) -> Self {
        self.auxiliary_track_name = name.to_string();
        self
    }

    /// Only republish the audio of dropped files
    pub fn audio_only(mut self) -> Self {
        self.publish_auxiliary_video = false;
        self
    }

    /// Enable debug logging
    pub fn debug_logging(mut self) -> Self {
        self.debug_logging = true;
        self
    }
}
