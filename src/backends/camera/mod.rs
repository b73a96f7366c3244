// SPDX-License-Identifier: GPL-3.0-only

//! Media-capture provider abstraction
//!
//! The session engine never talks to capture hardware directly. It drives a
//! [`MediaCaptureProvider`] and decides *how* and *in what order* to call it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │    Caller / UI      │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    CameraSession    │  ← State machine, fallback, guards
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐      ┌────────────────┐
//! │ MediaCaptureProvider│ ───▶ │  StreamHandle  │ ───▶ PreviewSurface
//! └──────────┬──────────┘      └────────────────┘
//!            │
//!            ▼
//!  Platform implementation (browser, native, simulated)
//! ```

pub mod simulated;
pub mod types;

pub use simulated::{
    SimulatedDevice, SimulatedPermission, SimulatedProvider, SimulatedScenario, SimulatedSurface,
};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Platform capture primitives consumed by the session engine
///
/// Implementations wrap whatever the host offers (a browser's media devices,
/// a native camera stack, or the in-memory [`SimulatedProvider`]).
#[async_trait]
pub trait MediaCaptureProvider: Send + Sync {
    // ===== Enumeration =====

    /// List media devices currently visible to the platform
    async fn enumerate_devices(&self) -> ProviderResult<Vec<MediaDeviceInfo>>;

    /// Query the facing modes a device reports through its own capability API
    ///
    /// # Returns
    /// * `Ok(modes)` - Reported facing modes (may be empty)
    /// * `Err(ProviderError::Unsupported)` - The platform has no such query
    fn device_facing_modes(&self, device: &MediaDeviceInfo) -> ProviderResult<Vec<FacingMode>> {
        let _ = device;
        Err(ProviderError::Unsupported(
            "device capability query".to_string(),
        ))
    }

    // ===== Acquisition =====

    /// Acquire a stream satisfying the given constraints
    ///
    /// This is the only call that claims hardware. The caller owns the returned
    /// handle and must call [`StreamHandle::stop`] to release it.
    ///
    /// # Arguments
    /// * `constraints` - Requested media types, device and dimensions
    ///
    /// # Returns
    /// * `Ok(stream)` - A live stream
    /// * `Err(ProviderError)` - Denied, not found, busy or overconstrained
    async fn acquire(&self, constraints: &MediaConstraints) -> ProviderResult<Arc<dyn StreamHandle>>;

    // ===== Permissions =====

    /// Query the platform permission-status API
    ///
    /// Returns `Err(ProviderError::Unsupported)` when the platform offers no
    /// such API; the engine then falls back to a transient acquisition.
    async fn query_permission(&self, kind: PermissionKind) -> ProviderResult<PermissionState>;

    // ===== Platform events =====

    /// Notifications fired when the device roster changes (hotplug)
    fn subscribe_device_changes(&self) -> Option<broadcast::Receiver<()>> {
        None
    }

    /// Notifications fired when the screen orientation changes
    fn subscribe_orientation(&self) -> Option<broadcast::Receiver<Orientation>> {
        None
    }
}

/// Handle to an acquired media stream
#[async_trait]
pub trait StreamHandle: Send + Sync {
    /// Provider-assigned stream identifier
    fn id(&self) -> &str;

    /// Values actually negotiated for the video track
    fn settings(&self) -> TrackSettings;

    /// Parameter ranges the video track supports
    fn capabilities(&self) -> TrackCapabilities;

    /// Whether the stream carries an audio track
    fn has_audio(&self) -> bool;

    /// True until [`StreamHandle::stop`] is called or the device goes away
    fn is_live(&self) -> bool;

    /// Apply live constraints (zoom, torch, focus) to the running video track
    async fn apply_constraints(&self, constraints: &TrackConstraintSet) -> ProviderResult<()>;

    /// Stop every track of the stream, releasing the hardware
    ///
    /// Must be idempotent.
    fn stop(&self);
}

/// Caller-owned drawable target the engine attaches streams to
///
/// The engine never creates a surface; it only attaches, detaches, mirrors
/// and reads the current frame for capture.
#[async_trait]
pub trait PreviewSurface: Send + Sync {
    /// Start rendering the given stream
    fn attach(&self, stream: Arc<dyn StreamHandle>) -> ProviderResult<()>;

    /// Stop rendering and drop the reference to the stream
    fn detach(&self) -> ProviderResult<()>;

    /// Apply or remove a horizontal flip transform
    fn set_mirrored(&self, mirrored: bool);

    /// Wait until the surface has a frame ready to read
    async fn wait_ready(&self) -> ProviderResult<()>;

    /// The most recent frame, unmirrored, at the stream's native size
    fn current_frame(&self) -> Option<PreviewFrame>;
}

/// Stops a stream when dropped
///
/// Used for throwaway acquisitions so the hardware is released on every exit
/// path, including early returns through `?`.
pub struct ReleaseOnDrop(Arc<dyn StreamHandle>);

impl ReleaseOnDrop {
    pub fn new(stream: Arc<dyn StreamHandle>) -> Self {
        Self(stream)
    }

    pub fn stream(&self) -> &Arc<dyn StreamHandle> {
        &self.0
    }
}

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        self.0.stop();
    }
}
