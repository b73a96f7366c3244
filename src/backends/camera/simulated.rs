// SPDX-License-Identifier: GPL-3.0-only

//! In-memory capture provider
//!
//! A deterministic stand-in for real capture hardware. Devices, permission
//! behaviour and negotiation quirks are scripted through a
//! [`SimulatedScenario`] (loadable from JSON), which makes the provider
//! usable both from tests and from the `camera-session` CLI.
//!
//! The provider also keeps count of streams that were acquired but never
//! stopped, so callers can assert that no hardware lock leaks.

use super::types::*;
use super::{MediaCaptureProvider, PreviewSurface, StreamHandle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

/// Behaviour of one simulated permission domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SimulatedPermission {
    /// Already granted
    Granted,
    /// Already denied
    Denied,
    /// Undecided; the user accepts the prompt
    #[default]
    PromptAccept,
    /// Undecided; the user rejects the prompt
    PromptDeny,
}

impl SimulatedPermission {
    fn initial_state(&self) -> PermissionState {
        match self {
            SimulatedPermission::Granted => PermissionState::Granted,
            SimulatedPermission::Denied => PermissionState::Denied,
            SimulatedPermission::PromptAccept | SimulatedPermission::PromptDeny => {
                PermissionState::Prompt
            }
        }
    }

    fn prompt_answer(&self) -> PermissionState {
        match self {
            SimulatedPermission::Granted | SimulatedPermission::PromptAccept => {
                PermissionState::Granted
            }
            SimulatedPermission::Denied | SimulatedPermission::PromptDeny => {
                PermissionState::Denied
            }
        }
    }
}

/// A requested size that the device negotiates to something else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationOverride {
    pub requested: Resolution,
    pub actual: Resolution,
}

fn default_min_resolution() -> Resolution {
    Resolution::new(320, 240)
}

fn default_max_resolution() -> Resolution {
    Resolution::new(1920, 1080)
}

fn default_frame_rate() -> NumericRange<f64> {
    NumericRange::with_step(1.0, 30.0, 1.0)
}

/// A scripted camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedDevice {
    pub device_id: String,
    pub label: String,
    #[serde(default)]
    pub group_id: Option<String>,
    /// Facing mode reported through the device capability query
    #[serde(default)]
    pub facing: Option<FacingMode>,
    #[serde(default = "default_min_resolution")]
    pub min_resolution: Resolution,
    #[serde(default = "default_max_resolution")]
    pub max_resolution: Resolution,
    /// Discrete sizes the device accepts; empty means anything within bounds
    #[serde(default)]
    pub supported_resolutions: Vec<Resolution>,
    #[serde(default)]
    pub overrides: Vec<NegotiationOverride>,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: NumericRange<f64>,
    #[serde(default)]
    pub zoom: Option<NumericRange<f64>>,
    #[serde(default)]
    pub torch: bool,
    #[serde(default)]
    pub focus_modes: Vec<FocusMode>,
    /// Claimed by another consumer
    #[serde(default)]
    pub busy: bool,
}

impl SimulatedDevice {
    pub fn new(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
            group_id: None,
            facing: None,
            min_resolution: default_min_resolution(),
            max_resolution: default_max_resolution(),
            supported_resolutions: Vec::new(),
            overrides: Vec::new(),
            frame_rate: default_frame_rate(),
            zoom: None,
            torch: false,
            focus_modes: Vec::new(),
            busy: false,
        }
    }

    pub fn facing(mut self, facing: FacingMode) -> Self {
        self.facing = Some(facing);
        self
    }

    pub fn bounds(mut self, min: Resolution, max: Resolution) -> Self {
        self.min_resolution = min;
        self.max_resolution = max;
        self
    }

    pub fn supported(mut self, resolutions: Vec<Resolution>) -> Self {
        self.supported_resolutions = resolutions;
        self
    }

    pub fn negotiates(mut self, requested: Resolution, actual: Resolution) -> Self {
        self.overrides.push(NegotiationOverride { requested, actual });
        self
    }

    pub fn frame_rate(mut self, range: NumericRange<f64>) -> Self {
        self.frame_rate = range;
        self
    }

    pub fn zoom(mut self, range: NumericRange<f64>) -> Self {
        self.zoom = Some(range);
        self
    }

    pub fn torch(mut self, torch: bool) -> Self {
        self.torch = torch;
        self
    }

    pub fn focus_modes(mut self, modes: Vec<FocusMode>) -> Self {
        self.focus_modes = modes;
        self
    }

    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    fn info(&self) -> MediaDeviceInfo {
        MediaDeviceInfo {
            device_id: self.device_id.clone(),
            label: self.label.clone(),
            kind: MediaDeviceKind::VideoInput,
            group_id: self.group_id.clone(),
        }
    }

    fn fits(&self, res: Resolution) -> bool {
        let within = |r: Resolution| {
            r.width >= self.min_resolution.width
                && r.width <= self.max_resolution.width
                && r.height >= self.min_resolution.height
                && r.height <= self.max_resolution.height
        };
        if self.supported_resolutions.is_empty() {
            within(res) || within(res.swapped())
        } else {
            self.supported_resolutions
                .iter()
                .any(|r| *r == res || r.swapped() == res)
        }
    }

    /// Closest acceptable size to an ideal hint
    fn closest(&self, ideal: Resolution) -> Resolution {
        if self.supported_resolutions.is_empty() {
            return Resolution::new(
                ideal
                    .width
                    .clamp(self.min_resolution.width, self.max_resolution.width),
                ideal
                    .height
                    .clamp(self.min_resolution.height, self.max_resolution.height),
            );
        }
        let distance = |r: &Resolution| r.pixels().abs_diff(ideal.pixels());
        self.supported_resolutions
            .iter()
            .copied()
            .min_by_key(distance)
            .unwrap_or(self.max_resolution)
    }

    fn capabilities(&self) -> TrackCapabilities {
        TrackCapabilities {
            device_id: Some(self.device_id.clone()),
            width: Some(NumericRange::with_step(
                self.min_resolution.width,
                self.max_resolution.width,
                1,
            )),
            height: Some(NumericRange::with_step(
                self.min_resolution.height,
                self.max_resolution.height,
                1,
            )),
            frame_rate: Some(self.frame_rate),
            zoom: self.zoom,
            torch: self.torch.then_some(true),
            focus_mode: (!self.focus_modes.is_empty()).then(|| self.focus_modes.clone()),
            facing_mode: self.facing.into_iter().collect(),
        }
    }
}

/// Complete scripted platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedScenario {
    pub devices: Vec<SimulatedDevice>,
    pub camera_permission: SimulatedPermission,
    pub microphone_permission: SimulatedPermission,
    /// Whether the platform exposes a permission-status query API
    pub permission_query: bool,
    /// Whether devices answer the facing-mode capability query
    pub facing_query: bool,
    pub has_microphone: bool,
}

impl Default for SimulatedScenario {
    fn default() -> Self {
        Self::laptop()
    }
}

impl SimulatedScenario {
    /// A laptop with one integrated webcam
    pub fn laptop() -> Self {
        Self {
            devices: vec![
                SimulatedDevice::new("integrated-0", "Integrated Camera (04f2:b6d9)")
                    .facing(FacingMode::User)
                    .bounds(Resolution::new(320, 240), Resolution::new(1280, 720))
                    .supported(vec![
                        Resolution::new(1280, 720),
                        Resolution::new(640, 480),
                        Resolution::new(320, 240),
                    ])
                    .focus_modes(vec![FocusMode::Continuous, FocusMode::Manual]),
            ],
            camera_permission: SimulatedPermission::PromptAccept,
            microphone_permission: SimulatedPermission::PromptAccept,
            permission_query: true,
            facing_query: true,
            has_microphone: true,
        }
    }

    /// An iPhone with front, triple and wide back cameras
    pub fn iphone() -> Self {
        let back = |id: &str, label: &str| {
            SimulatedDevice::new(id, label)
                .facing(FacingMode::Environment)
                .bounds(Resolution::new(192, 144), Resolution::new(3840, 2160))
                .zoom(NumericRange::with_step(1.0, 10.0, 0.1))
                .torch(true)
                .focus_modes(vec![FocusMode::Continuous, FocusMode::SingleShot])
        };
        Self {
            devices: vec![
                SimulatedDevice::new("front", "Front Camera")
                    .facing(FacingMode::User)
                    .bounds(Resolution::new(192, 144), Resolution::new(1920, 1080)),
                back("back-wide", "Back Camera"),
                back("back-triple", "Back Triple Camera"),
                back("back-ultra", "Back Ultra Wide Camera"),
            ],
            camera_permission: SimulatedPermission::PromptAccept,
            microphone_permission: SimulatedPermission::PromptAccept,
            permission_query: false,
            facing_query: true,
            has_microphone: true,
        }
    }

    /// An Android phone exposing camera2-style labels
    pub fn android() -> Self {
        let back = |id: &str, label: &str| {
            SimulatedDevice::new(id, label)
                .facing(FacingMode::Environment)
                .bounds(Resolution::new(176, 144), Resolution::new(4000, 3000))
                .zoom(NumericRange::with_step(1.0, 8.0, 0.1))
                .torch(true)
        };
        Self {
            devices: vec![
                back("cam-2", "camera2 2, facing back"),
                SimulatedDevice::new("cam-1", "camera2 1, facing front")
                    .facing(FacingMode::User)
                    .bounds(Resolution::new(176, 144), Resolution::new(1920, 1080)),
                back("cam-0", "camera2 0, facing back"),
            ],
            camera_permission: SimulatedPermission::PromptAccept,
            microphone_permission: SimulatedPermission::PromptAccept,
            permission_query: true,
            facing_query: false,
            has_microphone: true,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug)]
struct ProviderState {
    scenario: SimulatedScenario,
    camera: PermissionState,
    microphone: PermissionState,
    acquisitions: Vec<MediaConstraints>,
}

impl ProviderState {
    fn resolve_permission(&mut self, kind: PermissionKind) -> PermissionState {
        let (state, script) = match kind {
            PermissionKind::Camera => (&mut self.camera, self.scenario.camera_permission),
            PermissionKind::Microphone => {
                (&mut self.microphone, self.scenario.microphone_permission)
            }
        };
        if *state == PermissionState::Prompt {
            *state = script.prompt_answer();
            info!(kind = %kind, state = ?*state, "Simulated permission prompt answered");
        }
        *state
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted capture provider
pub struct SimulatedProvider {
    state: Mutex<ProviderState>,
    live_streams: Arc<AtomicUsize>,
    fail_constraints: Arc<AtomicBool>,
    pending: AtomicUsize,
    paused: watch::Sender<bool>,
    device_changes: broadcast::Sender<()>,
    orientation: broadcast::Sender<Orientation>,
}

impl SimulatedProvider {
    pub fn new(scenario: SimulatedScenario) -> Self {
        let camera = scenario.camera_permission.initial_state();
        let microphone = scenario.microphone_permission.initial_state();
        let (paused, _) = watch::channel(false);
        let (device_changes, _) = broadcast::channel(16);
        let (orientation, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(ProviderState {
                scenario,
                camera,
                microphone,
                acquisitions: Vec::new(),
            }),
            live_streams: Arc::new(AtomicUsize::new(0)),
            fail_constraints: Arc::new(AtomicBool::new(false)),
            pending: AtomicUsize::new(0),
            paused,
            device_changes,
            orientation,
        }
    }

    /// Streams acquired and not yet stopped
    pub fn live_streams(&self) -> usize {
        self.live_streams.load(Ordering::SeqCst)
    }

    /// Acquisition calls currently waiting on [`SimulatedProvider::pause_acquisitions`]
    pub fn pending_acquisitions(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Every constraint set passed to `acquire`, in call order
    pub fn acquisitions(&self) -> Vec<MediaConstraints> {
        lock(&self.state).acquisitions.clone()
    }

    /// Hold every subsequent acquisition until resumed
    pub fn pause_acquisitions(&self) {
        self.paused.send_replace(true);
    }

    pub fn resume_acquisitions(&self) {
        self.paused.send_replace(false);
    }

    pub fn add_device(&self, device: SimulatedDevice) {
        lock(&self.state).scenario.devices.push(device);
        let _ = self.device_changes.send(());
    }

    /// Unplug a device and fire a device-change notification
    pub fn remove_device(&self, device_id: &str) {
        lock(&self.state)
            .scenario
            .devices
            .retain(|d| d.device_id != device_id);
        let _ = self.device_changes.send(());
    }

    pub fn set_busy(&self, device_id: &str, busy: bool) {
        let mut state = lock(&self.state);
        if let Some(device) = state
            .scenario
            .devices
            .iter_mut()
            .find(|d| d.device_id == device_id)
        {
            device.busy = busy;
        }
    }

    /// Make every subsequent `apply_constraints` call fail
    pub fn fail_constraint_application(&self, fail: bool) {
        self.fail_constraints.store(fail, Ordering::SeqCst);
    }

    /// Fire an orientation-change notification
    pub fn rotate(&self, orientation: Orientation) {
        let _ = self.orientation.send(orientation);
    }

    async fn wait_until_resumed(&self) {
        let mut paused = self.paused.subscribe();
        let _ = paused.wait_for(|paused| !*paused).await;
    }

    fn open(&self, constraints: &MediaConstraints) -> ProviderResult<SimulatedStream> {
        let mut state = lock(&self.state);
        state.acquisitions.push(constraints.clone());

        if constraints.audio {
            if !state.scenario.has_microphone {
                return Err(ProviderError::NotFound("no audio input device".to_string()));
            }
            if state.resolve_permission(PermissionKind::Microphone) == PermissionState::Denied {
                return Err(ProviderError::NotAllowed(
                    "microphone permission denied".to_string(),
                ));
            }
        }

        let Some(video) = &constraints.video else {
            return Ok(SimulatedStream::audio_only(
                Arc::clone(&self.live_streams),
                Arc::clone(&self.fail_constraints),
            ));
        };

        if state.resolve_permission(PermissionKind::Camera) == PermissionState::Denied {
            return Err(ProviderError::NotAllowed(
                "camera permission denied".to_string(),
            ));
        }

        let device = select_device(&state.scenario.devices, video)?.clone();
        if device.busy {
            return Err(ProviderError::NotReadable(format!(
                "{} is in use by another application",
                device.label
            )));
        }

        let requested = match (&video.width, &video.height) {
            (Some(w), Some(h)) => Some((
                Resolution::new(*w.value(), *h.value()),
                w.is_exact() || h.is_exact(),
            )),
            _ => None,
        };

        let resolution = match requested {
            Some((res, true)) => {
                if !device.fits(res) {
                    return Err(ProviderError::Overconstrained {
                        constraint: format!("width/height {}", res),
                    });
                }
                res
            }
            Some((res, false)) => device.closest(res),
            None => device.closest(device.max_resolution),
        };
        let resolution = device
            .overrides
            .iter()
            .find(|o| o.requested == resolution)
            .map(|o| o.actual)
            .unwrap_or(resolution);

        debug!(device = %device.device_id, resolution = %resolution, "Simulated acquisition");

        let settings = TrackSettings {
            device_id: Some(device.device_id.clone()),
            width: Some(resolution.width),
            height: Some(resolution.height),
            frame_rate: Some(device.frame_rate.max),
            zoom: device.zoom.map(|z| z.min),
            torch: device.torch.then_some(false),
            focus_mode: device.focus_modes.first().copied(),
            facing_mode: device.facing,
        };

        Ok(SimulatedStream::new(
            settings,
            device.capabilities(),
            constraints.audio,
            Arc::clone(&self.live_streams),
            Arc::clone(&self.fail_constraints),
        ))
    }
}

fn select_device<'a>(
    devices: &'a [SimulatedDevice],
    video: &VideoConstraints,
) -> ProviderResult<&'a SimulatedDevice> {
    if let Some(id) = &video.device_id {
        let found = devices.iter().find(|d| &d.device_id == id.value());
        return match (found, id.is_exact()) {
            (Some(device), _) => Ok(device),
            (None, true) => Err(ProviderError::NotFound(format!(
                "no device with id '{}'",
                id.value()
            ))),
            (None, false) => devices
                .first()
                .ok_or_else(|| ProviderError::NotFound("no video input devices".to_string())),
        };
    }
    if let Some(facing) = &video.facing_mode
        && let Some(device) = devices.iter().find(|d| d.facing == Some(*facing.value()))
    {
        return Ok(device);
    }
    devices
        .first()
        .ok_or_else(|| ProviderError::NotFound("no video input devices".to_string()))
}

#[async_trait]
impl MediaCaptureProvider for SimulatedProvider {
    async fn enumerate_devices(&self) -> ProviderResult<Vec<MediaDeviceInfo>> {
        let state = lock(&self.state);
        let mut devices: Vec<MediaDeviceInfo> =
            state.scenario.devices.iter().map(SimulatedDevice::info).collect();
        if state.scenario.has_microphone {
            devices.push(MediaDeviceInfo {
                device_id: "default-microphone".to_string(),
                label: "Default Microphone".to_string(),
                kind: MediaDeviceKind::AudioInput,
                group_id: None,
            });
        }
        Ok(devices)
    }

    fn device_facing_modes(&self, device: &MediaDeviceInfo) -> ProviderResult<Vec<FacingMode>> {
        let state = lock(&self.state);
        if !state.scenario.facing_query {
            return Err(ProviderError::Unsupported(
                "device capability query".to_string(),
            ));
        }
        Ok(state
            .scenario
            .devices
            .iter()
            .find(|d| d.device_id == device.device_id)
            .and_then(|d| d.facing)
            .into_iter()
            .collect())
    }

    async fn acquire(&self, constraints: &MediaConstraints) -> ProviderResult<Arc<dyn StreamHandle>> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.wait_until_resumed().await;
        self.pending.fetch_sub(1, Ordering::SeqCst);

        let stream = self.open(constraints)?;
        self.live_streams.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(stream))
    }

    async fn query_permission(&self, kind: PermissionKind) -> ProviderResult<PermissionState> {
        let state = lock(&self.state);
        if !state.scenario.permission_query {
            return Err(ProviderError::Unsupported(
                "permission query API".to_string(),
            ));
        }
        Ok(match kind {
            PermissionKind::Camera => state.camera,
            PermissionKind::Microphone => state.microphone,
        })
    }

    fn subscribe_device_changes(&self) -> Option<broadcast::Receiver<()>> {
        Some(self.device_changes.subscribe())
    }

    fn subscribe_orientation(&self) -> Option<broadcast::Receiver<Orientation>> {
        Some(self.orientation.subscribe())
    }
}

impl std::fmt::Debug for SimulatedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedProvider")
            .field("live_streams", &self.live_streams())
            .field("pending", &self.pending_acquisitions())
            .finish()
    }
}

/// Stream produced by [`SimulatedProvider`]
pub struct SimulatedStream {
    id: String,
    settings: Mutex<TrackSettings>,
    capabilities: TrackCapabilities,
    audio: bool,
    live: AtomicBool,
    live_streams: Arc<AtomicUsize>,
    fail_constraints: Arc<AtomicBool>,
}

impl SimulatedStream {
    fn new(
        settings: TrackSettings,
        capabilities: TrackCapabilities,
        audio: bool,
        live_streams: Arc<AtomicUsize>,
        fail_constraints: Arc<AtomicBool>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            settings: Mutex::new(settings),
            capabilities,
            audio,
            live: AtomicBool::new(true),
            live_streams,
            fail_constraints,
        }
    }

    fn audio_only(live_streams: Arc<AtomicUsize>, fail_constraints: Arc<AtomicBool>) -> Self {
        Self::new(
            TrackSettings::default(),
            TrackCapabilities::default(),
            true,
            live_streams,
            fail_constraints,
        )
    }
}

#[async_trait]
impl StreamHandle for SimulatedStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn settings(&self) -> TrackSettings {
        lock(&self.settings).clone()
    }

    fn capabilities(&self) -> TrackCapabilities {
        self.capabilities.clone()
    }

    fn has_audio(&self) -> bool {
        self.audio
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    async fn apply_constraints(&self, constraints: &TrackConstraintSet) -> ProviderResult<()> {
        if !self.is_live() {
            return Err(ProviderError::Aborted("track has ended".to_string()));
        }
        if self.fail_constraints.load(Ordering::SeqCst) {
            return Err(ProviderError::Other(
                "constraint application rejected".to_string(),
            ));
        }
        let mut settings = lock(&self.settings);
        if let Some(zoom) = constraints.zoom {
            settings.zoom = Some(zoom);
        }
        if let Some(torch) = constraints.torch {
            settings.torch = Some(torch);
        }
        if let Some(mode) = constraints.focus_mode {
            settings.focus_mode = Some(mode);
        }
        Ok(())
    }

    fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            self.live_streams.fetch_sub(1, Ordering::SeqCst);
            debug!(stream = %self.id, "Simulated stream stopped");
        }
    }
}

/// Preview surface rendering a synthetic gradient
///
/// Pixel (x, y) has red = x-gradient and green = y-gradient, so the leftmost
/// column is dark red and the rightmost column is bright red. Flipped
/// captures are easy to detect from that.
#[derive(Default)]
pub struct SimulatedSurface {
    attached: Mutex<Option<Arc<dyn StreamHandle>>>,
    mirrored: AtomicBool,
    fail_detach: AtomicBool,
    attach_count: AtomicUsize,
}

impl SimulatedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored.load(Ordering::SeqCst)
    }

    pub fn attached_stream_id(&self) -> Option<String> {
        lock(&self.attached).as_ref().map(|s| s.id().to_string())
    }

    /// Number of successful `attach` calls
    pub fn attach_count(&self) -> usize {
        self.attach_count.load(Ordering::SeqCst)
    }

    /// Make `detach` report failure (the reference is still dropped)
    pub fn fail_detach(&self, fail: bool) {
        self.fail_detach.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PreviewSurface for SimulatedSurface {
    fn attach(&self, stream: Arc<dyn StreamHandle>) -> ProviderResult<()> {
        *lock(&self.attached) = Some(stream);
        self.attach_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn detach(&self) -> ProviderResult<()> {
        lock(&self.attached).take();
        if self.fail_detach.load(Ordering::SeqCst) {
            return Err(ProviderError::Other("surface detach failed".to_string()));
        }
        Ok(())
    }

    fn set_mirrored(&self, mirrored: bool) {
        self.mirrored.store(mirrored, Ordering::SeqCst);
    }

    async fn wait_ready(&self) -> ProviderResult<()> {
        match lock(&self.attached).as_ref() {
            Some(stream) if stream.is_live() => Ok(()),
            Some(_) => Err(ProviderError::Aborted("attached stream has ended".to_string())),
            None => Err(ProviderError::NotFound("no stream attached".to_string())),
        }
    }

    fn current_frame(&self) -> Option<PreviewFrame> {
        let attached = lock(&self.attached);
        let stream = attached.as_ref()?;
        let res = stream.settings().resolution()?;
        let (w, h) = (res.width.max(1), res.height.max(1));
        Some(image::RgbaImage::from_fn(w, h, |x, y| {
            let r = if w > 1 { (x * 255 / (w - 1)) as u8 } else { 0 };
            let g = if h > 1 { (y * 255 / (h - 1)) as u8 } else { 0 };
            image::Rgba([r, g, 128, 255])
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(device: &str, width: u32, height: u32) -> MediaConstraints {
        MediaConstraints::video_only(VideoConstraints {
            device_id: Some(Constrain::Exact(device.to_string())),
            width: Some(Constrain::Exact(width)),
            height: Some(Constrain::Exact(height)),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_exact_resolution_outside_bounds_is_overconstrained() {
        let provider = SimulatedProvider::new(SimulatedScenario::laptop());
        let err = match provider.acquire(&exact("integrated-0", 3840, 2160)).await {
            Err(err) => err,
            Ok(_) => panic!("4K should not be accepted"),
        };
        assert!(matches!(err, ProviderError::Overconstrained { .. }));
        assert_eq!(provider.live_streams(), 0);
    }

    #[tokio::test]
    async fn test_stop_releases_stream() {
        let provider = SimulatedProvider::new(SimulatedScenario::laptop());
        let stream = provider.acquire(&exact("integrated-0", 640, 480)).await.unwrap();
        assert_eq!(provider.live_streams(), 1);
        stream.stop();
        stream.stop();
        assert_eq!(provider.live_streams(), 0);
        assert!(!stream.is_live());
    }

    #[tokio::test]
    async fn test_busy_device_is_not_readable() {
        let provider = SimulatedProvider::new(SimulatedScenario::laptop());
        provider.set_busy("integrated-0", true);
        let result = provider.acquire(&exact("integrated-0", 640, 480)).await;
        assert!(matches!(result, Err(ProviderError::NotReadable(_))));
    }

    #[tokio::test]
    async fn test_prompt_deny_yields_not_allowed() {
        let scenario = SimulatedScenario {
            camera_permission: SimulatedPermission::PromptDeny,
            ..SimulatedScenario::laptop()
        };
        let provider = SimulatedProvider::new(scenario);
        assert_eq!(
            provider.query_permission(PermissionKind::Camera).await.unwrap(),
            PermissionState::Prompt
        );
        let result = provider
            .acquire(&MediaConstraints::permission_probe(true, false))
            .await;
        assert!(matches!(result, Err(ProviderError::NotAllowed(_))));
        assert_eq!(
            provider.query_permission(PermissionKind::Camera).await.unwrap(),
            PermissionState::Denied
        );
    }

    #[test]
    fn test_scenario_from_json() {
        let scenario = SimulatedScenario::from_json_str(
            r#"{
                "devices": [
                    { "device_id": "cam", "label": "USB Camera", "facing": "user" }
                ],
                "permission_query": false
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.devices.len(), 1);
        assert_eq!(scenario.devices[0].max_resolution, Resolution::new(1920, 1080));
        assert!(!scenario.permission_query);
    }
}
