//! Error types for videoroom

use thiserror::Error;

/// Main error type for videoroom operations
#[derive(Error, Debug)]
pub enum VideoRoomError {
    /// Initialization error
    #[error("Initialization failed: {reason}")]
    Initialization {
        /// Reason for initialization failure
        reason: String,
    },

    /// Missing configuration error
    #[error("Missing required configuration: {field}")]
    MissingConfiguration {
        /// Missing configuration field
        field: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfiguration {
        /// Offending configuration field
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Identity was empty or whitespace only
    #[error("Identity must not be empty")]
    InvalidIdentity,

    /// Invalid state error
    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },

    /// Token request could not be sent or completed
    #[error("Token request to {endpoint} failed: {reason}")]
    TokenRequest {
        /// Token endpoint URL
        endpoint: String,
        /// Reason for failure
        reason: String,
    },

    /// Token endpoint answered with a non-success status
    #[error("Token endpoint rejected the request (HTTP {status}): {body}")]
    TokenRejected {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        body: String,
    },

    /// Token endpoint answered with something that is not a token
    #[error("Malformed token response: {reason}")]
    MalformedTokenResponse {
        /// Reason the response was rejected
        reason: String,
    },

    /// Room service refused the join
    #[error("Room join failed: {reason}")]
    RoomJoin {
        /// Reason for join failure
        reason: String,
    },

    /// Operation against a room that is already disconnected
    #[error("Room {room_sid} is closed")]
    RoomClosed {
        /// Room SID
        room_sid: String,
    },

    /// A join attempt finished after the session was shut down
    #[error("Join attempt {attempt} was abandoned")]
    JoinAbandoned {
        /// Attempt number that was abandoned
        attempt: u64,
    },

    /// Track publication failed
    #[error("Failed to publish track {track_id}: {reason}")]
    Publish {
        /// Local track ID
        track_id: String,
        /// Reason for failure
        reason: String,
    },

    /// Local capture device could not be opened
    #[error("Local media unavailable: {reason}")]
    MediaUnavailable {
        /// Reason for failure
        reason: String,
    },

    /// Playback element error
    #[error("Media element error: {reason}")]
    Media {
        /// Reason for failure
        reason: String,
    },
}

impl VideoRoomError {
    /// Get error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            VideoRoomError::Initialization { .. } => "INITIALIZATION_FAILED",
            VideoRoomError::MissingConfiguration { .. } => "MISSING_CONFIGURATION",
            VideoRoomError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            VideoRoomError::InvalidIdentity => "INVALID_IDENTITY",
            VideoRoomError::InvalidState { .. } => "INVALID_STATE",
            VideoRoomError::TokenRequest { .. } => "TOKEN_REQUEST_FAILED",
            VideoRoomError::TokenRejected { .. } => "TOKEN_REJECTED",
            VideoRoomError::MalformedTokenResponse { .. } => "MALFORMED_TOKEN_RESPONSE",
            VideoRoomError::RoomJoin { .. } => "ROOM_JOIN_FAILED",
            VideoRoomError::RoomClosed { .. } => "ROOM_CLOSED",
            VideoRoomError::JoinAbandoned { .. } => "JOIN_ABANDONED",
            VideoRoomError::Publish { .. } => "PUBLISH_FAILED",
            VideoRoomError::MediaUnavailable { .. } => "MEDIA_UNAVAILABLE",
            VideoRoomError::Media { .. } => "MEDIA_ERROR",
        }
    }

    /// Whether this error belongs to the join path (token fetch or room join)
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            VideoRoomError::TokenRequest { .. }
                | VideoRoomError::TokenRejected { .. }
                | VideoRoomError::MalformedTokenResponse { .. }
                | VideoRoomError::RoomJoin { .. }
        )
    }

    /// Whether the error only says the room is already gone
    pub fn is_stale_room(&self) -> bool {
        matches!(self, VideoRoomError::RoomClosed { .. })
    }
}

/// Result type alias for videoroom operations
pub type Result<T> = std::result::Result<T, VideoRoomError>;
