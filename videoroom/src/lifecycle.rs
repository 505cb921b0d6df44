//! Connection lifecycle state machine

use crate::config::ControlLabels;
use crate::render::ControlState;
use tracing::info;
use videoroom_core::{Result, VideoRoomError};

/// Connection state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No room joined
    Disconnected,
    /// Token request or room join in flight
    Connecting,
    /// Room joined
    Connected,
}

impl ConnectionState {
    /// Whether moving to `next` is a legal transition
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Disconnected)
        )
    }

    /// Join/leave control state for this connection state
    pub fn control(self, labels: &ControlLabels) -> ControlState {
        match self {
            ConnectionState::Disconnected => ControlState::enabled(&labels.join),
            ConnectionState::Connecting => ControlState::disabled(&labels.connecting),
            ConnectionState::Connected => ControlState::enabled(&labels.leave),
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// Lifecycle bookkeeping: current state plus the join attempt counter
///
/// Each join gets an attempt number. A join whose attempt is no longer the
/// current one when it resolves must not apply its effects.
#[derive(Debug)]
pub struct Lifecycle {
    state: ConnectionState,
    attempt: u64,
    history: Vec<ConnectionState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Start disconnected
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            attempt: 0,
            history: vec![ConnectionState::Disconnected],
        }
    }

    /// Current state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Every state entered so far, starting with the initial one
    pub fn history(&self) -> &[ConnectionState] {
        &self.history
    }

    /// Whether the session is connected
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Enter Connecting and hand out a new attempt number
    pub fn begin_join(&mut self) -> Result<u64> {
        self.transition(ConnectionState::Connecting)?;
        self.attempt += 1;
        Ok(self.attempt)
    }

    /// Whether `attempt` is still the join in flight
    pub fn is_current_attempt(&self, attempt: u64) -> bool {
        self.state == ConnectionState::Connecting && self.attempt == attempt
    }

    /// Finish the join of `attempt` successfully
    pub fn complete_join(&mut self, attempt: u64) -> Result<()> {
        if !self.is_current_attempt(attempt) {
            return Err(VideoRoomError::JoinAbandoned { attempt });
        }
        self.transition(ConnectionState::Connected)
    }

    /// Revert the failed join of `attempt`
    pub fn fail_join(&mut self, attempt: u64) -> Result<()> {
        if !self.is_current_attempt(attempt) {
            return Err(VideoRoomError::JoinAbandoned { attempt });
        }
        self.transition(ConnectionState::Disconnected)
    }

    /// Leave a connected session
    pub fn leave(&mut self) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(self.unexpected(ConnectionState::Connected));
        }
        self.transition(ConnectionState::Disconnected)
    }

    /// Return to Disconnected from any state, abandoning a join in flight
    pub fn reset(&mut self) {
        if self.state == ConnectionState::Connecting {
            self.attempt += 1;
        }
        if self.state != ConnectionState::Disconnected {
            // Both remaining states may move to Disconnected
            let _ = self.transition(ConnectionState::Disconnected);
        }
    }

    fn transition(&mut self, next: ConnectionState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(VideoRoomError::InvalidState {
                expected: expected_before(next).to_string(),
                actual: self.state.to_string(),
            });
        }
        info!("🔄 Session state changed: {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    fn unexpected(&self, expected: ConnectionState) -> VideoRoomError {
        VideoRoomError::InvalidState {
            expected: expected.to_string(),
            actual: self.state.to_string(),
        }
    }
}

fn expected_before(next: ConnectionState) -> &'static str {
    match next {
        ConnectionState::Connecting => "disconnected",
        ConnectionState::Connected => "connecting",
        ConnectionState::Disconnected => "connecting or connected",
    }
}

/// Participant counter text
///
/// The local participant is always counted, so `remote` participants read as
/// `remote + 1` online.
pub fn participant_count_text(state: ConnectionState, remote: usize) -> String {
    match state {
        ConnectionState::Connected => format!("{} participants online.", remote + 1),
        _ => "Disconnected.".to_string(),
    }
}
