// SPDX-License-Identifier: GPL-3.0-only

//! Session status, state snapshot and lifecycle events

use super::capabilities::CapabilitySnapshot;
use super::permissions::PermissionStatus;
use crate::backends::camera::types::{
    MediaDeviceInfo, Orientation, PermissionKind, PermissionState, Resolution,
};
use crate::errors::SessionError;
use std::fmt;

/// Lifecycle status of a camera session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    /// No stream held; initial state and the state after `stop`
    #[default]
    Idle,
    /// `start` in progress
    Initializing,
    /// A live stream is held
    Ready,
    /// Teardown in progress
    Stopping,
    /// The last start failed or the active device went away
    Error,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Initializing => "initializing",
            SessionStatus::Ready => "ready",
            SessionStatus::Stopping => "stopping",
            SessionStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Point-in-time copy of the session state
///
/// Returned by value from [`super::CameraSession::state`]; mutating it has no
/// effect on the session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Identifier of the held stream, if any
    pub active_stream_id: Option<String>,
    /// Device backing the held stream
    pub active_device_id: Option<String>,
    /// Negotiated (not requested) frame size of the held stream
    pub active_resolution: Option<Resolution>,
    pub last_error: Option<SessionError>,
    pub capabilities: CapabilitySnapshot,
    pub permissions: PermissionStatus,
    /// Known video input devices
    pub devices: Vec<MediaDeviceInfo>,
    /// Informational; only tracked on mobile and tablet platforms
    pub orientation: Option<Orientation>,
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        self.status == SessionStatus::Ready
    }
}

/// Notification emitted by a session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged {
        from: SessionStatus,
        to: SessionStatus,
    },
    /// `start` completed
    Started { resolution: Resolution },
    StreamStarted { stream_id: String },
    StreamStopped { stream_id: String },
    /// A failure that terminated or prevented the session
    Error(SessionError),
    PermissionChanged {
        kind: PermissionKind,
        state: PermissionState,
    },
    DevicesChanged { devices: Vec<MediaDeviceInfo> },
    OrientationChanged(Orientation),
}
