// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for capture providers
//!
//! These are the values exchanged across the provider boundary: enumerated
//! devices, acquisition constraints, live track settings and capabilities,
//! and permission states.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of media device reported by enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaDeviceKind {
    #[default]
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// Raw device record as enumerated by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MediaDeviceInfo {
    /// Opaque, provider-assigned identifier
    pub device_id: String,
    /// Human-readable label (may be empty before permission is granted)
    pub label: String,
    pub kind: MediaDeviceKind,
    /// Devices sharing a physical unit share a group id
    pub group_id: Option<String>,
}

impl MediaDeviceInfo {
    /// Create a video input record
    pub fn video_input(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
            kind: MediaDeviceKind::VideoInput,
            group_id: None,
        }
    }

    pub fn is_video_input(&self) -> bool {
        self.kind == MediaDeviceKind::VideoInput
    }
}

/// Direction a camera faces, as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Towards the user (selfie camera)
    #[default]
    User,
    /// Away from the user (main/rear camera)
    Environment,
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacingMode::User => write!(f, "user"),
            FacingMode::Environment => write!(f, "environment"),
        }
    }
}

/// Facing direction requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Front,
    Back,
}

impl CameraFacing {
    /// The platform facing mode this request matches
    pub fn facing_mode(&self) -> FacingMode {
        match self {
            CameraFacing::Front => FacingMode::User,
            CameraFacing::Back => FacingMode::Environment,
        }
    }

    /// The opposite direction (used for camera flipping)
    pub fn flipped(&self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraFacing::Front => write!(f, "front"),
            CameraFacing::Back => write!(f, "back"),
        }
    }
}

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width and height exchanged (portrait <-> landscape)
    pub fn swapped(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Total pixel count
    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Supported range of a numeric capture parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange<T> {
    pub min: T,
    pub max: T,
    /// Increment between valid values; `None` when the platform reports none
    #[serde(default)]
    pub step: Option<T>,
}

impl<T: Copy> NumericRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    pub fn with_step(min: T, max: T, step: T) -> Self {
        Self {
            min,
            max,
            step: Some(step),
        }
    }
}

/// Focus mode of a live video track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusMode {
    None,
    Manual,
    SingleShot,
    Continuous,
}

/// Parameter ranges a live video track supports
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackCapabilities {
    pub device_id: Option<String>,
    pub width: Option<NumericRange<u32>>,
    pub height: Option<NumericRange<u32>>,
    pub frame_rate: Option<NumericRange<f64>>,
    pub zoom: Option<NumericRange<f64>>,
    /// Present only when the platform exposes torch control
    pub torch: Option<bool>,
    /// Present only when the platform exposes focus control
    pub focus_mode: Option<Vec<FocusMode>>,
    #[serde(default)]
    pub facing_mode: Vec<FacingMode>,
}

/// Values actually negotiated for a live video track
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackSettings {
    pub device_id: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<f64>,
    pub zoom: Option<f64>,
    pub torch: Option<bool>,
    pub focus_mode: Option<FocusMode>,
    pub facing_mode: Option<FacingMode>,
}

impl TrackSettings {
    /// Negotiated frame size, when the platform reports both dimensions
    pub fn resolution(&self) -> Option<Resolution> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(Resolution::new(width, height)),
            _ => None,
        }
    }
}

/// A requested value: either mandatory or a preference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constrain<T> {
    /// Acquisition must fail if the value cannot be honored
    Exact(T),
    /// The platform picks the closest value it supports
    Ideal(T),
}

impl<T> Constrain<T> {
    pub fn value(&self) -> &T {
        match self {
            Constrain::Exact(v) | Constrain::Ideal(v) => v,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Constrain::Exact(_))
    }
}

/// Video part of an acquisition request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoConstraints {
    pub device_id: Option<Constrain<String>>,
    pub facing_mode: Option<Constrain<FacingMode>>,
    pub width: Option<Constrain<u32>>,
    pub height: Option<Constrain<u32>>,
    pub frame_rate: Option<Constrain<f64>>,
}

impl VideoConstraints {
    /// Constrain to an exact device, if one is given
    pub fn for_device(device_id: Option<&str>) -> Self {
        Self {
            device_id: device_id.map(|id| Constrain::Exact(id.to_string())),
            ..Default::default()
        }
    }
}

/// Full acquisition request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaConstraints {
    /// `None` means no video track is requested
    pub video: Option<VideoConstraints>,
    pub audio: bool,
}

impl MediaConstraints {
    pub fn video_only(video: VideoConstraints) -> Self {
        Self {
            video: Some(video),
            audio: false,
        }
    }

    /// Unconstrained request scoped to the given media types, used to
    /// trigger the platform permission prompt
    pub fn permission_probe(camera: bool, microphone: bool) -> Self {
        Self {
            video: camera.then(VideoConstraints::default),
            audio: microphone,
        }
    }
}

/// Live-adjustable track parameters (applied to an already running track)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackConstraintSet {
    pub zoom: Option<f64>,
    pub torch: Option<bool>,
    pub focus_mode: Option<FocusMode>,
}

/// Permission domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Camera,
    Microphone,
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionKind::Camera => write!(f, "camera"),
            PermissionKind::Microphone => write!(f, "microphone"),
        }
    }
}

/// Permission state for one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// Not yet decided; acquiring will prompt the user
    #[default]
    Prompt,
}

/// Screen orientation reported by mobile platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    #[default]
    PortraitPrimary,
    PortraitSecondary,
    LandscapePrimary,
    LandscapeSecondary,
}

impl Orientation {
    pub fn is_portrait(&self) -> bool {
        matches!(
            self,
            Orientation::PortraitPrimary | Orientation::PortraitSecondary
        )
    }
}

/// RGBA frame read from a preview surface
pub type PreviewFrame = image::RgbaImage;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failures reported by a capture provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The user or platform policy refused access
    #[error("Access not allowed: {0}")]
    NotAllowed(String),
    /// No device satisfies the request
    #[error("Device not found: {0}")]
    NotFound(String),
    /// Hardware is in use or could not be read
    #[error("Device not readable: {0}")]
    NotReadable(String),
    /// A mandatory constraint could not be satisfied
    #[error("Overconstrained: {constraint}")]
    Overconstrained { constraint: String },
    /// The platform does not implement the requested API
    #[error("Not supported: {0}")]
    Unsupported(String),
    /// The operation was interrupted
    #[error("Aborted: {0}")]
    Aborted(String),
    #[error("Error: {0}")]
    Other(String),
}
