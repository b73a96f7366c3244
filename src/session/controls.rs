// SPDX-License-Identifier: GPL-3.0-only

//! Capture, live track controls and platform event handling

use super::{CameraSession, OperationGuard, SessionEvent, SessionStatus};
use crate::backends::camera::types::{FocusMode, Orientation, Resolution, TrackConstraintSet};
use crate::backends::camera::StreamHandle;
use crate::errors::{ErrorKind, SessionError, SessionResult};
use crate::pipelines::photo::{CaptureOptions, CapturedImage, capture_frame};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

impl CameraSession {
    fn live_stream(&self, operation: &str) -> SessionResult<Arc<dyn StreamHandle>> {
        self.ensure_usable()?;
        self.active_stream().ok_or_else(|| {
            SessionError::not_initialized(format!("cannot {}: no active stream", operation))
        })
    }

    async fn apply_track_constraints(
        &self,
        stream: &Arc<dyn StreamHandle>,
        constraints: TrackConstraintSet,
        what: &str,
    ) -> SessionResult<()> {
        stream.apply_constraints(&constraints).await.map_err(|err| {
            SessionError::stream_error(format!("failed to apply {}", what)).with_cause(err)
        })?;

        // Reflect the new live values in the stored snapshot
        self.with_shared(|s| {
            if let Some(zoom) = constraints.zoom {
                s.state.capabilities.zoom = Some(zoom);
            }
            if let Some(torch) = constraints.torch {
                s.state.capabilities.torch = torch;
            }
            if let Some(mode) = constraints.focus_mode {
                s.state.capabilities.focus_mode = Some(mode);
            }
        });
        Ok(())
    }

    // ===== Capture =====

    /// Encode the current preview frame
    ///
    /// # Errors
    /// * `CaptureFailed` - No active stream, no surface, or encoding failed
    pub async fn capture(&self, options: &CaptureOptions) -> SessionResult<CapturedImage> {
        self.ensure_usable()?;
        let (stream, mirror) = self.with_shared(|s| {
            let stream = s
                .stream
                .clone()
                .filter(|_| s.state.status == SessionStatus::Ready);
            (stream, s.mirror)
        });

        let stream = stream.ok_or_else(|| SessionError::capture_failed("no active stream"))?;
        let surface = self
            .inner
            .surface
            .clone()
            .ok_or_else(|| SessionError::capture_failed("no preview surface attached"))?;

        surface.wait_ready().await.map_err(|err| {
            SessionError::capture_failed("preview surface is not ready").with_cause(err)
        })?;
        let frame = surface
            .current_frame()
            .ok_or_else(|| SessionError::capture_failed("preview surface has no frame"))?;

        let (frame_width, frame_height) = frame.dimensions();
        let track = stream
            .settings()
            .resolution()
            .unwrap_or(Resolution::new(frame_width, frame_height));

        let image = capture_frame(&frame, track, mirror, options).await?;
        info!(
            width = image.width,
            height = image.height,
            mime = image.mime_type,
            bytes = image.data.len(),
            "Captured image"
        );
        Ok(image)
    }

    // ===== Zoom / torch / focus =====

    /// Set the zoom level, clamped to the reported range; returns the applied value
    pub async fn set_zoom(&self, zoom: f64) -> SessionResult<f64> {
        let stream = self.live_stream("set zoom")?;
        let capabilities = self.capabilities();
        if !capabilities.zoom_supported {
            return Err(SessionError::stream_error("zoom is not supported by this camera"));
        }
        let zoom = capabilities.clamp_zoom(zoom);
        self.apply_track_constraints(
            &stream,
            TrackConstraintSet {
                zoom: Some(zoom),
                ..Default::default()
            },
            "zoom",
        )
        .await?;
        debug!(zoom, "Zoom applied");
        Ok(zoom)
    }

    pub async fn set_torch(&self, enabled: bool) -> SessionResult<()> {
        let stream = self.live_stream("set torch")?;
        if !self.capabilities().torch_supported {
            return Err(SessionError::stream_error("torch is not supported by this camera"));
        }
        self.apply_track_constraints(
            &stream,
            TrackConstraintSet {
                torch: Some(enabled),
                ..Default::default()
            },
            "torch",
        )
        .await?;
        debug!(enabled, "Torch applied");
        Ok(())
    }

    /// Flip the torch; returns the new state
    pub async fn toggle_torch(&self) -> SessionResult<bool> {
        let enabled = !self.capabilities().torch;
        self.set_torch(enabled).await?;
        Ok(enabled)
    }

    pub async fn set_focus_mode(&self, mode: FocusMode) -> SessionResult<()> {
        let stream = self.live_stream("set focus mode")?;
        let capabilities = self.capabilities();
        if !capabilities.focus_supported {
            return Err(SessionError::stream_error("focus control is not supported by this camera"));
        }
        if !capabilities.focus_modes.contains(&mode) {
            return Err(SessionError::stream_error(format!(
                "focus mode {:?} is not supported by this camera",
                mode
            )));
        }
        self.apply_track_constraints(
            &stream,
            TrackConstraintSet {
                focus_mode: Some(mode),
                ..Default::default()
            },
            "focus mode",
        )
        .await?;
        debug!(mode = ?mode, "Focus mode applied");
        Ok(())
    }

    // ===== Mirror =====

    /// Set the mirror flag and the preview transform
    ///
    /// Needs neither a configuration nor a live stream, and never re-acquires.
    pub fn set_mirror(&self, mirror: bool) -> SessionResult<()> {
        self.ensure_usable()?;
        self.with_shared(|s| {
            s.mirror = mirror;
            if let Some(config) = s.config.as_mut() {
                config.mirror = mirror;
            }
        });
        if let Some(surface) = &self.inner.surface {
            surface.set_mirrored(mirror);
        }
        debug!(mirror, "Mirror updated");
        Ok(())
    }

    pub fn is_mirrored(&self) -> bool {
        self.with_shared(|s| s.mirror)
    }

    /// Flip the mirror flag; returns the new value
    pub fn toggle_mirror(&self) -> SessionResult<bool> {
        self.ensure_usable()?;
        let mirror = self.with_shared(|s| {
            s.mirror = !s.mirror;
            if let Some(config) = s.config.as_mut() {
                config.mirror = s.mirror;
            }
            s.mirror
        });
        if let Some(surface) = &self.inner.surface {
            surface.set_mirrored(mirror);
        }
        debug!(mirror, "Mirror toggled");
        Ok(mirror)
    }

    // ===== Platform events =====

    /// React to a device roster change
    ///
    /// Re-enumerates devices. If the active device is gone the session is
    /// torn down into Error with a `DeviceNotFound` error, which is also
    /// returned.
    pub async fn handle_device_change(&self) -> SessionResult<()> {
        let devices = self.refresh_devices().await?;

        let active = self.with_shared(|s| {
            s.state
                .active_device_id
                .clone()
                .filter(|_| s.state.status == SessionStatus::Ready)
        });
        let Some(active) = active else {
            return Ok(());
        };
        if devices.iter().any(|d| d.device_id == active) {
            return Ok(());
        }

        self.drop_vanished_device(&active)
    }

    /// Tear down into Error because `active` disappeared
    ///
    /// Skipped when another operation holds the guard, or when the session
    /// no longer streams from `active` once the guard is taken.
    pub(super) fn drop_vanished_device(&self, active: &str) -> SessionResult<()> {
        // An in-flight start or stop will see the failure itself
        let Ok(_guard) = OperationGuard::acquire(&self.inner.busy, "handle device change") else {
            return Ok(());
        };
        // A stop or restart may have finished before the guard was taken
        let still_active = self.with_shared(|s| {
            s.state.status == SessionStatus::Ready
                && s.state.active_device_id.as_deref() == Some(active)
        });
        if !still_active {
            debug!(device = %active, "Vanished device no longer active");
            return Ok(());
        }

        let err = SessionError::new(
            ErrorKind::DeviceNotFound,
            format!("active camera '{}' was disconnected", active),
        );
        self.transition(SessionStatus::Stopping);
        self.teardown();
        self.clear_transient();
        self.fail(&err);
        Err(err)
    }

    /// Record a new screen orientation
    ///
    /// Informational only, and only tracked on mobile and tablet platforms.
    /// The stream is never touched.
    pub fn handle_orientation_change(&self, orientation: Orientation) {
        if self.is_disposed() || !self.inner.platform.info().is_mobile_or_tablet() {
            return;
        }
        let changed = self.with_shared(|s| s.state.orientation.replace(orientation) != Some(orientation));
        if changed {
            debug!(orientation = ?orientation, "Orientation changed");
            self.emit(SessionEvent::OrientationChanged(orientation));
        }
    }

    /// Spawn the hotplug and orientation listeners for the active stream
    pub(super) fn attach_listeners(&self) {
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("No async runtime; device and orientation listeners not attached");
            return;
        }

        let mut listeners = Vec::new();

        if let Some(mut changes) = self.inner.provider.subscribe_device_changes() {
            let weak = Arc::downgrade(&self.inner);
            listeners.push(tokio::spawn(async move {
                loop {
                    match changes.recv().await {
                        Ok(()) | Err(RecvError::Lagged(_)) => {
                            let Some(session) = upgrade(&weak) else { break };
                            if let Err(err) = session.handle_device_change().await {
                                debug!(error = %err, "Device change handled with error");
                            }
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }));
        }

        if let Some(mut rotations) = self.inner.provider.subscribe_orientation() {
            let weak = Arc::downgrade(&self.inner);
            listeners.push(tokio::spawn(async move {
                loop {
                    match rotations.recv().await {
                        Ok(orientation) => {
                            let Some(session) = upgrade(&weak) else { break };
                            session.handle_orientation_change(orientation);
                        }
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    }
                }
            }));
        }

        debug!(count = listeners.len(), "Platform listeners attached");
        self.with_shared(|s| s.listeners.extend(listeners));
    }
}

fn upgrade(weak: &Weak<super::SessionInner>) -> Option<CameraSession> {
    weak.upgrade().map(|inner| CameraSession { inner })
}
