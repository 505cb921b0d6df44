//! Rendering surface driven by the session controller
//!
//! The renderer owns the visible elements: the join/leave control, the
//! participant counter, the local preview slot, one view per remote
//! participant and the drop target. The controller tells it what changed and
//! never inspects what it created.

use tracing::info;
use videoroom_core::{LocalTrack, RemoteTrack};

/// State of the join/leave control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    /// Label to display
    pub label: String,
    /// Whether the control accepts clicks
    pub enabled: bool,
}

impl ControlState {
    /// Enabled control with `label`
    pub fn enabled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            enabled: true,
        }
    }

    /// Disabled control with `label`
    pub fn disabled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            enabled: false,
        }
    }
}

/// Rendering surface
///
/// Calls may arrive while the controller holds its state lock, so
/// implementations must not call back into the controller.
pub trait Renderer: Send + Sync {
    /// Update the join/leave control
    fn set_control(&self, control: &ControlState);

    /// Replace the participant counter text
    fn set_participant_count(&self, text: &str);

    /// Show a blocking message to the user
    fn alert(&self, message: &str);

    /// Put the local camera track into the local preview slot
    fn attach_local_preview(&self, track: &LocalTrack);

    /// Create the view for a remote participant, labeled with its identity
    fn add_participant_view(&self, participant_sid: &str, identity: &str);

    /// Remove a participant view and everything inside it
    fn remove_participant_view(&self, participant_sid: &str);

    /// Append a rendered element for `track` to the participant's view
    fn attach_track(&self, participant_sid: &str, track: &RemoteTrack);

    /// Remove every rendered element of a track
    fn detach_track(&self, participant_sid: &str, track_sid: &str);

    /// Toggle the drop target highlight
    fn set_drop_highlight(&self, active: bool);
}

/// Renderer that only logs, for headless sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn set_control(&self, control: &ControlState) {
        info!(label = %control.label, enabled = control.enabled, "control");
    }

    fn set_participant_count(&self, text: &str) {
        info!("👥 {}", text);
    }

    fn alert(&self, message: &str) {
        info!("⚠️ {}", message);
    }

    fn attach_local_preview(&self, track: &LocalTrack) {
        info!("📹 Local preview: {}", track.id());
    }

    fn add_participant_view(&self, participant_sid: &str, identity: &str) {
        info!("➕ {} ({})", identity, participant_sid);
    }

    fn remove_participant_view(&self, participant_sid: &str) {
        info!("➖ {}", participant_sid);
    }

    fn attach_track(&self, participant_sid: &str, track: &RemoteTrack) {
        info!("🎞️ {} track {} for {}", track.kind, track.sid, participant_sid);
    }

    fn detach_track(&self, participant_sid: &str, track_sid: &str) {
        info!("✂️ track {} of {}", track_sid, participant_sid);
    }

    fn set_drop_highlight(&self, active: bool) {
        info!(active, "drop highlight");
    }
}
