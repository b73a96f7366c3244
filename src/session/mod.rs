// SPDX-License-Identifier: GPL-3.0-only

//! Camera session engine
//!
//! [`CameraSession`] turns a declarative [`SessionConfiguration`] into a live
//! capture session and keeps a consistent [`SessionState`] for callers.
//!
//! ```text
//!            start                negotiated
//!   Idle ─────────────▶ Initializing ─────────▶ Ready
//!    ▲                      │                     │
//!    │ stop / clear_error   │ failed              │ stop
//!    │                      ▼                     ▼
//!    └──────────────────── Error ◀── device ── Stopping ──▶ Idle
//!                                     vanished
//! ```
//!
//! Only one of `start`, `stop`, `restart` and restarting configuration
//! updates may run at a time; an overlapping call fails fast with
//! [`ErrorKind::ConcurrentOperation`]. Resolution candidates are tried one
//! after another, never in parallel.
//!
//! The session is cheap to clone; all clones share one engine.

pub mod capabilities;
mod controls;
pub mod negotiator;
pub mod permissions;
pub mod selector;
pub mod state;

pub use capabilities::{CapabilitySnapshot, ResolutionSupport, build_capability_snapshot};
pub use negotiator::{NegotiatedStream, NegotiationRequest, negotiate};
pub use permissions::{PermissionCoordinator, PermissionStatus};
pub use selector::{CameraDeviceDescriptor, DeviceSelector};
pub use state::{SessionEvent, SessionState, SessionStatus};

use crate::backends::camera::types::{
    CameraFacing, MediaDeviceInfo, Orientation, PermissionState, Resolution,
};
use crate::backends::camera::{MediaCaptureProvider, PreviewSurface, StreamHandle};
use crate::config::{CameraTarget, ConfigurationPatch, SessionConfiguration};
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::errors::{ErrorKind, SessionError, SessionResult};
use crate::platform::{CachedPlatform, HostPlatform, PlatformClassifier};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a session-mutating operation as in flight
struct OperationGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> OperationGuard<'a> {
    fn acquire(flag: &'a AtomicBool, operation: &str) -> SessionResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                debug!(operation, "Rejected overlapping session operation");
                SessionError::concurrent_operation(operation)
            })?;
        Ok(Self { flag })
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Mutable engine state; never held across an await
struct Shared {
    config: Option<SessionConfiguration>,
    /// Mirror flag; exists with or without a configuration
    mirror: bool,
    state: SessionState,
    stream: Option<Arc<dyn StreamHandle>>,
    listeners: Vec<JoinHandle<()>>,
}

struct SessionInner {
    provider: Arc<dyn MediaCaptureProvider>,
    surface: Option<Arc<dyn PreviewSurface>>,
    platform: Arc<CachedPlatform>,
    permissions: PermissionCoordinator,
    selector: DeviceSelector,
    shared: Mutex<Shared>,
    events: Mutex<Option<broadcast::Sender<SessionEvent>>>,
    busy: AtomicBool,
    disposed: AtomicBool,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        let shared = self.shared.get_mut().unwrap_or_else(PoisonError::into_inner);
        for listener in shared.listeners.drain(..) {
            listener.abort();
        }
        if let Some(stream) = shared.stream.take() {
            if let Some(surface) = &self.surface {
                let _ = surface.detach();
            }
            stream.stop();
        }
    }
}

/// Builder for [`CameraSession`]
pub struct CameraSessionBuilder {
    provider: Arc<dyn MediaCaptureProvider>,
    surface: Option<Arc<dyn PreviewSurface>>,
    classifier: Arc<dyn PlatformClassifier>,
    config: Option<SessionConfiguration>,
}

impl CameraSessionBuilder {
    /// Preview surface the session attaches streams to
    pub fn surface(mut self, surface: Arc<dyn PreviewSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Platform classification source (defaults to [`HostPlatform`])
    pub fn platform(mut self, classifier: Arc<dyn PlatformClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Initial configuration, equivalent to calling `setup_configuration`
    pub fn configuration(mut self, config: SessionConfiguration) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> SessionResult<CameraSession> {
        let config = match self.config {
            Some(mut config) => {
                config.normalize();
                config.validate()?;
                Some(config)
            }
            None => None,
        };

        let platform = Arc::new(CachedPlatform::new(self.classifier));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(CameraSession {
            inner: Arc::new(SessionInner {
                permissions: PermissionCoordinator::new(Arc::clone(&self.provider)),
                selector: DeviceSelector::new(Arc::clone(&self.provider), Arc::clone(&platform)),
                provider: self.provider,
                surface: self.surface,
                platform,
                shared: Mutex::new(Shared {
                    mirror: config.as_ref().is_some_and(|c| c.mirror),
                    config,
                    state: SessionState::default(),
                    stream: None,
                    listeners: Vec::new(),
                }),
                events: Mutex::new(Some(events)),
                busy: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
            }),
        })
    }
}

/// Camera session engine
///
/// Thread-safe and cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct CameraSession {
    inner: Arc<SessionInner>,
}

impl CameraSession {
    pub fn builder(provider: Arc<dyn MediaCaptureProvider>) -> CameraSessionBuilder {
        CameraSessionBuilder {
            provider,
            surface: None,
            classifier: Arc::new(HostPlatform),
            config: None,
        }
    }

    // ===== Internal helpers =====

    fn with_shared<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        let mut shared = lock_unpoisoned(&self.inner.shared);
        f(&mut shared)
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(sender) = lock_unpoisoned(&self.inner.events).as_ref() {
            // No receivers is fine
            let _ = sender.send(event);
        }
    }

    fn transition(&self, to: SessionStatus) {
        let from = self.with_shared(|s| std::mem::replace(&mut s.state.status, to));
        if from != to {
            debug!(from = %from, to = %to, "Session state changed");
            self.emit(SessionEvent::StateChanged { from, to });
        }
    }

    fn ensure_usable(&self) -> SessionResult<()> {
        if self.is_disposed() {
            Err(SessionError::disposed())
        } else {
            Ok(())
        }
    }

    fn require_configuration(&self) -> SessionResult<SessionConfiguration> {
        self.with_shared(|s| s.config.clone()).ok_or_else(|| {
            SessionError::not_initialized("no configuration has been set up for this session")
        })
    }

    fn emit_permission_changes(&self, before: &PermissionStatus) {
        let after = self.inner.permissions.status();
        for (kind, state) in after.changes_from(before) {
            info!(kind = %kind, state = ?state, "Permission changed");
            self.emit(SessionEvent::PermissionChanged { kind, state });
        }
    }

    /// Record a terminal failure: status Error, error stored and emitted
    fn fail(&self, err: &SessionError) {
        warn!(kind = %err.kind(), error = %err, "Camera session failed");
        let from = self.with_shared(|s| {
            s.state.last_error = Some(err.clone());
            s.state.active_resolution = None;
            s.state.active_stream_id = None;
            s.state.active_device_id = None;
            std::mem::replace(&mut s.state.status, SessionStatus::Error)
        });
        if from != SessionStatus::Error {
            self.emit(SessionEvent::StateChanged {
                from,
                to: SessionStatus::Error,
            });
        }
        self.emit(SessionEvent::Error(err.clone()));
    }

    /// Release every resource the session holds
    ///
    /// Each step runs regardless of failures in the previous ones.
    fn teardown(&self) {
        let (stream, listeners) =
            self.with_shared(|s| (s.stream.take(), std::mem::take(&mut s.listeners)));

        for listener in listeners {
            listener.abort();
        }

        let Some(stream) = stream else {
            return;
        };

        if let Some(surface) = &self.inner.surface
            && let Err(err) = surface.detach()
        {
            warn!(error = %err, "Failed to detach preview surface");
        }

        stream.stop();
        info!(stream = %stream.id(), "Stream released");
        self.emit(SessionEvent::StreamStopped {
            stream_id: stream.id().to_string(),
        });
    }

    fn clear_transient(&self) {
        self.with_shared(|s| {
            s.state.active_resolution = None;
            s.state.active_stream_id = None;
            s.state.active_device_id = None;
            s.state.capabilities = CapabilitySnapshot::default();
            s.state.last_error = None;
        });
    }

    // ===== Configuration =====

    /// Replace the configuration wholesale
    ///
    /// Takes effect on the next start; the mirror flag is applied to the
    /// preview surface immediately.
    pub fn setup_configuration(&self, mut config: SessionConfiguration) -> SessionResult<()> {
        self.ensure_usable()?;
        config.normalize();
        config.validate()?;

        let mirror = config.mirror;
        self.store_configuration(config);
        if let Some(surface) = &self.inner.surface {
            surface.set_mirrored(mirror);
        }
        debug!("Configuration set up");
        Ok(())
    }

    /// Store a configuration and adopt its mirror flag; true when the flag changed
    fn store_configuration(&self, config: SessionConfiguration) -> bool {
        self.with_shared(|s| {
            let changed = s.mirror != config.mirror;
            s.mirror = config.mirror;
            s.config = Some(config);
            changed
        })
    }

    /// Current configuration, or the default one carrying the local mirror flag
    fn effective_configuration(&self) -> SessionConfiguration {
        self.with_shared(|s| {
            s.config.clone().unwrap_or_else(|| SessionConfiguration {
                mirror: s.mirror,
                ..Default::default()
            })
        })
    }

    /// Merge a partial configuration
    ///
    /// A change that needs a fresh acquisition (or `restart`) counts as a
    /// session-mutating operation: it fails with `ConcurrentOperation` while
    /// another one is in flight, and restarts the session when Ready. Mirror
    /// and debug changes apply in place. Returns the effective configuration.
    pub async fn update_configuration(
        &self,
        patch: ConfigurationPatch,
        restart: bool,
    ) -> SessionResult<SessionConfiguration> {
        self.ensure_usable()?;
        let update = self.effective_configuration().merged(&patch);
        update.config.validate()?;

        if !(restart || update.restart_required) {
            let mirror_changed = self.store_configuration(update.config.clone());
            if mirror_changed && let Some(surface) = &self.inner.surface {
                surface.set_mirrored(update.config.mirror);
            }
            return Ok(update.config);
        }

        let _guard = OperationGuard::acquire(&self.inner.busy, "update configuration")?;
        // Merge again: the configuration may have moved while unguarded
        let update = self.effective_configuration().merged(&patch);
        update.config.validate()?;
        let mirror_changed = self.store_configuration(update.config.clone());

        if self.status() == SessionStatus::Ready {
            info!("Configuration change requires restart");
            self.stop_locked();
            self.start_locked().await?;
        } else if mirror_changed && let Some(surface) = &self.inner.surface {
            surface.set_mirrored(update.config.mirror);
        }

        Ok(update.config)
    }

    // ===== Lifecycle =====

    /// Acquire a stream for the current configuration
    ///
    /// A no-op when already Ready.
    ///
    /// # Errors
    /// * `NotInitialized` - No configuration has been set up
    /// * `ConcurrentOperation` - Another start/stop is in flight
    /// * `PermissionDenied` - Camera (or microphone with audio) refused
    /// * Negotiation failures, with the last candidate's failure as cause
    pub async fn start(&self) -> SessionResult<()> {
        self.ensure_usable()?;
        let _guard = OperationGuard::acquire(&self.inner.busy, "start")?;
        self.start_locked().await
    }

    async fn start_locked(&self) -> SessionResult<()> {
        let config = self.require_configuration()?;
        if self.status() == SessionStatus::Ready {
            debug!("Session already started");
            return Ok(());
        }

        self.with_shared(|s| s.state.last_error = None);
        self.transition(SessionStatus::Initializing);

        match self.acquire_session(&config).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::Disposed => Err(err),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    async fn acquire_session(&self, config: &SessionConfiguration) -> SessionResult<()> {
        let before = self.inner.permissions.status();
        let mut permissions = self.inner.permissions.check_all(config.audio).await;
        if permissions.needs_permission_request(config.audio)
            && !permissions.has_permission_denied(config.audio)
        {
            permissions = self
                .inner
                .permissions
                .request_permissions(
                    permissions.camera == PermissionState::Prompt,
                    config.audio && permissions.microphone == PermissionState::Prompt,
                )
                .await;
        }
        self.emit_permission_changes(&before);

        if permissions.has_permission_denied(config.audio) {
            let domain = if permissions.camera == PermissionState::Denied {
                "camera"
            } else {
                "microphone"
            };
            return Err(SessionError::new(
                ErrorKind::PermissionDenied,
                format!("{} access was denied", domain),
            ));
        }
        self.ensure_usable()?;

        let device_id = self.resolve_target(&config.target).await?;
        let swap = self.inner.platform.dimension_swap(config.allow_dimension_swap);
        let request = NegotiationRequest::from_config(config, device_id.clone(), swap);
        let negotiated = negotiate(self.inner.provider.as_ref(), &request).await?;

        if self.is_disposed() {
            negotiated.stream.stop();
            return Err(SessionError::disposed());
        }

        let mirror = self.with_shared(|s| s.mirror);
        self.activate(negotiated, device_id, mirror);
        Ok(())
    }

    async fn resolve_target(&self, target: &CameraTarget) -> SessionResult<Option<String>> {
        match target {
            CameraTarget::Default => Ok(None),
            CameraTarget::Device(id) => Ok(Some(id.clone())),
            CameraTarget::Facing(facing) => {
                let devices = self.refresh_devices().await?;
                self.inner
                    .selector
                    .select(&devices, *facing)
                    .map(|device| Some(device.device_id))
                    .ok_or_else(|| {
                        SessionError::new(
                            ErrorKind::DeviceNotFound,
                            format!("no video input available for {} camera", facing),
                        )
                    })
            }
        }
    }

    fn activate(&self, negotiated: NegotiatedStream, requested_device: Option<String>, mirror: bool) {
        let NegotiatedStream {
            stream, resolution, ..
        } = negotiated;

        if let Some(surface) = &self.inner.surface {
            if let Err(err) = surface.attach(Arc::clone(&stream)) {
                warn!(error = %err, "Failed to attach preview surface");
            }
            surface.set_mirrored(mirror);
        }

        let settings = stream.settings();
        let capabilities = CapabilitySnapshot::from_track(&stream.capabilities(), &settings);
        let device_id = settings.device_id.clone().or(requested_device);
        let stream_id = stream.id().to_string();

        self.with_shared(|s| {
            s.stream = Some(Arc::clone(&stream));
            s.state.active_stream_id = Some(stream_id.clone());
            s.state.active_device_id = device_id.clone();
            s.state.active_resolution = Some(resolution);
            s.state.capabilities = capabilities;
            s.state.last_error = None;
        });
        self.transition(SessionStatus::Ready);

        info!(
            device = device_id.as_deref().unwrap_or("default"),
            width = resolution.width,
            height = resolution.height,
            "Camera session started"
        );
        self.emit(SessionEvent::Started { resolution });
        self.emit(SessionEvent::StreamStarted { stream_id });

        self.attach_listeners();
    }

    /// Release the stream and return to Idle
    ///
    /// Idempotent; also succeeds after `dispose`. Permission state and the
    /// device roster are kept.
    pub async fn stop(&self) -> SessionResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        let _guard = OperationGuard::acquire(&self.inner.busy, "stop")?;
        self.stop_locked();
        Ok(())
    }

    fn stop_locked(&self) {
        if self.status() == SessionStatus::Idle {
            return;
        }
        info!("Stopping camera session");
        self.transition(SessionStatus::Stopping);
        self.teardown();
        self.clear_transient();
        self.transition(SessionStatus::Idle);
    }

    /// Stop and start again under one operation
    pub async fn restart(&self) -> SessionResult<()> {
        self.ensure_usable()?;
        let _guard = OperationGuard::acquire(&self.inner.busy, "restart")?;
        self.stop_locked();
        self.start_locked().await
    }

    /// Clear the last error
    ///
    /// Only an Error session without a stream returns to Idle; any other
    /// status is left untouched.
    pub fn clear_error(&self) -> SessionResult<()> {
        self.ensure_usable()?;
        let cleared = self.with_shared(|s| {
            if s.state.status == SessionStatus::Error && s.stream.is_none() {
                s.state.last_error = None;
                true
            } else {
                false
            }
        });
        if cleared {
            self.transition(SessionStatus::Idle);
        }
        Ok(())
    }

    /// Tear the session down for good
    ///
    /// Stops any stream, detaches listeners and closes every event receiver.
    /// Later operations fail with `Disposed`.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Disposing camera session");
        self.teardown();
        self.clear_transient();
        self.transition(SessionStatus::Idle);
        lock_unpoisoned(&self.inner.events).take();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    // ===== Devices =====

    /// Enumerate video inputs and store them as the device roster
    pub async fn refresh_devices(&self) -> SessionResult<Vec<MediaDeviceInfo>> {
        self.ensure_usable()?;
        let devices: Vec<MediaDeviceInfo> = self
            .inner
            .provider
            .enumerate_devices()
            .await
            .map_err(|err| SessionError::from_provider(err, "failed to enumerate devices"))?
            .into_iter()
            .filter(MediaDeviceInfo::is_video_input)
            .collect();

        let changed = self.with_shared(|s| {
            let changed = s.state.devices != devices;
            s.state.devices = devices.clone();
            changed
        });
        if changed {
            debug!(count = devices.len(), "Device roster updated");
            self.emit(SessionEvent::DevicesChanged {
                devices: devices.clone(),
            });
        }
        Ok(devices)
    }

    /// Best device in the current roster for `facing`
    pub fn select_device(&self, facing: CameraFacing) -> Option<MediaDeviceInfo> {
        let devices = self.devices();
        self.inner.selector.select(&devices, facing)
    }

    /// Selection metadata for the current roster
    pub fn device_descriptors(&self) -> SessionResult<Vec<CameraDeviceDescriptor>> {
        let devices = self.devices();
        self.inner
            .selector
            .describe(&devices)
            .map_err(|err| SessionError::from_provider(err, "failed to describe devices"))
    }

    /// Retarget the session to the best camera facing `facing`
    ///
    /// Restarts when Ready. Returns the effective configuration.
    pub async fn switch_camera(&self, facing: CameraFacing) -> SessionResult<SessionConfiguration> {
        let devices = self.refresh_devices().await?;
        let device = self.inner.selector.select(&devices, facing).ok_or_else(|| {
            SessionError::new(
                ErrorKind::DeviceNotFound,
                format!("no video input available for {} camera", facing),
            )
        })?;
        info!(facing = %facing, device = %device.device_id, "Switching camera");
        self.update_configuration(
            ConfigurationPatch::default().target(CameraTarget::Device(device.device_id)),
            false,
        )
        .await
    }

    // ===== Permissions =====

    pub async fn check_camera_permission(&self) -> SessionResult<PermissionState> {
        self.ensure_usable()?;
        let before = self.inner.permissions.status();
        let state = self.inner.permissions.check_camera_permission().await;
        self.emit_permission_changes(&before);
        Ok(state)
    }

    pub async fn check_microphone_permission(&self) -> SessionResult<PermissionState> {
        self.ensure_usable()?;
        let before = self.inner.permissions.status();
        let state = self.inner.permissions.check_microphone_permission().await;
        self.emit_permission_changes(&before);
        Ok(state)
    }

    /// Raise the platform permission prompt; refusals are classified, not raised
    pub async fn request_permissions(
        &self,
        camera: bool,
        microphone: bool,
    ) -> SessionResult<PermissionStatus> {
        self.ensure_usable()?;
        let before = self.inner.permissions.status();
        let status = self.inner.permissions.request_permissions(camera, microphone).await;
        self.emit_permission_changes(&before);
        Ok(status)
    }

    fn audio_enabled(&self) -> bool {
        self.with_shared(|s| s.config.as_ref().is_some_and(|c| c.audio))
    }

    pub fn needs_permission_request(&self) -> bool {
        self.inner
            .permissions
            .status()
            .needs_permission_request(self.audio_enabled())
    }

    pub fn has_permission_denied(&self) -> bool {
        self.inner
            .permissions
            .status()
            .has_permission_denied(self.audio_enabled())
    }

    // ===== Capabilities =====

    /// Capability snapshot for a device
    ///
    /// The active device is read from its live track. Any other device (or
    /// any device while not Ready) is opened briefly and released.
    pub async fn probe_capabilities(&self, device_id: Option<&str>) -> SessionResult<CapabilitySnapshot> {
        self.ensure_usable()?;

        let live = self.with_shared(|s| {
            let active = s.state.active_device_id.as_deref();
            let wanted_is_active = device_id.is_none() || device_id == active;
            s.stream
                .clone()
                .filter(|_| s.state.status == SessionStatus::Ready && wanted_is_active)
        });
        if let Some(stream) = live {
            return Ok(CapabilitySnapshot::from_track(
                &stream.capabilities(),
                &stream.settings(),
            ));
        }

        let _guard = OperationGuard::acquire(&self.inner.busy, "probe capabilities")?;
        let device_id = match device_id {
            Some(id) => id.to_string(),
            None => self.probe_target().await?,
        };
        build_capability_snapshot(self.inner.provider.as_ref(), &device_id).await
    }

    async fn probe_target(&self) -> SessionResult<String> {
        let target = self
            .with_shared(|s| s.config.as_ref().map(|c| c.target.clone()))
            .unwrap_or_default();
        if let Some(id) = self.resolve_target(&target).await? {
            return Ok(id);
        }
        let devices = self.refresh_devices().await?;
        devices
            .first()
            .map(|d| d.device_id.clone())
            .ok_or_else(|| SessionError::new(ErrorKind::DeviceNotFound, "no video input devices"))
    }

    /// Re-read the active track's capabilities into the session state
    pub fn refresh_capabilities(&self) -> SessionResult<CapabilitySnapshot> {
        self.ensure_usable()?;
        let stream = self
            .active_stream()
            .ok_or_else(|| SessionError::not_initialized("no active stream"))?;
        let snapshot = CapabilitySnapshot::from_track(&stream.capabilities(), &stream.settings());
        self.with_shared(|s| s.state.capabilities = snapshot.clone());
        Ok(snapshot)
    }

    /// Check a frame size against the current capability snapshot
    pub fn check_resolution_support(&self, width: u32, height: u32) -> ResolutionSupport {
        self.capabilities().check_resolution(width, height)
    }

    // ===== Getters =====

    /// Copy of the full session state
    pub fn state(&self) -> SessionState {
        let permissions = self.inner.permissions.status();
        self.with_shared(|s| SessionState {
            permissions,
            ..s.state.clone()
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.with_shared(|s| s.state.status)
    }

    pub fn configuration(&self) -> Option<SessionConfiguration> {
        self.with_shared(|s| s.config.clone())
    }

    pub fn active_resolution(&self) -> Option<Resolution> {
        self.with_shared(|s| s.state.active_resolution)
    }

    pub fn last_error(&self) -> Option<SessionError> {
        self.with_shared(|s| s.state.last_error.clone())
    }

    pub fn capabilities(&self) -> CapabilitySnapshot {
        self.with_shared(|s| s.state.capabilities.clone())
    }

    pub fn permissions(&self) -> PermissionStatus {
        self.inner.permissions.status()
    }

    pub fn devices(&self) -> Vec<MediaDeviceInfo> {
        self.with_shared(|s| s.state.devices.clone())
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.with_shared(|s| s.state.orientation)
    }

    /// The held stream, while Ready
    pub fn active_stream(&self) -> Option<Arc<dyn StreamHandle>> {
        self.with_shared(|s| {
            s.stream
                .clone()
                .filter(|_| s.state.status == SessionStatus::Ready)
        })
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> SessionResult<broadcast::Receiver<SessionEvent>> {
        lock_unpoisoned(&self.inner.events)
            .as_ref()
            .map(broadcast::Sender::subscribe)
            .ok_or_else(SessionError::disposed)
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("status", &self.status())
            .field("active_resolution", &self.active_resolution())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
