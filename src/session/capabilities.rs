// SPDX-License-Identifier: GPL-3.0-only

//! Capability snapshots
//!
//! A snapshot is read either from the live track of an active session or from
//! a throwaway acquisition that is released before the builder returns.

use crate::backends::camera::types::{
    FocusMode, MediaConstraints, NumericRange, Resolution, TrackCapabilities, TrackSettings,
    VideoConstraints,
};
use crate::backends::camera::{MediaCaptureProvider, ReleaseOnDrop};
use crate::constants::MAX_FRAME_RATE_STEPS;
use crate::errors::{SessionError, SessionResult};
use serde::Serialize;
use tracing::{debug, info};

/// Supported parameter ranges of one device
///
/// The default value reports nothing as supported.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CapabilitySnapshot {
    pub device_id: Option<String>,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    pub min_height: Option<u32>,
    pub max_height: Option<u32>,
    /// Enumerated frame rates; empty when the range has no usable step
    pub frame_rates: Vec<f64>,
    pub min_frame_rate: Option<f64>,
    pub max_frame_rate: Option<f64>,
    pub zoom_supported: bool,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub zoom_step: Option<f64>,
    /// Live zoom value of the track
    pub zoom: Option<f64>,
    pub torch_supported: bool,
    /// Live torch state of the track
    pub torch: bool,
    pub focus_supported: bool,
    pub focus_modes: Vec<FocusMode>,
    /// Live focus mode of the track
    pub focus_mode: Option<FocusMode>,
}

/// Outcome of a resolution support check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolutionSupport {
    pub supported: bool,
    /// The request clamped into the device bounds, when bounds are known
    pub nearest: Option<Resolution>,
}

impl CapabilitySnapshot {
    /// Build a snapshot from a track's capability and settings objects
    pub fn from_track(capabilities: &TrackCapabilities, settings: &TrackSettings) -> Self {
        let frame_rates = capabilities
            .frame_rate
            .map(|range| enumerate_frame_rates(&range))
            .unwrap_or_default();

        Self {
            device_id: settings
                .device_id
                .clone()
                .or_else(|| capabilities.device_id.clone()),
            min_width: capabilities.width.map(|r| r.min),
            max_width: capabilities.width.map(|r| r.max),
            min_height: capabilities.height.map(|r| r.min),
            max_height: capabilities.height.map(|r| r.max),
            frame_rates,
            min_frame_rate: capabilities.frame_rate.map(|r| r.min),
            max_frame_rate: capabilities.frame_rate.map(|r| r.max),
            zoom_supported: capabilities.zoom.is_some(),
            min_zoom: capabilities.zoom.map(|r| r.min),
            max_zoom: capabilities.zoom.map(|r| r.max),
            zoom_step: capabilities.zoom.and_then(|r| r.step),
            zoom: settings.zoom,
            torch_supported: capabilities.torch.is_some(),
            torch: settings.torch.unwrap_or(false),
            focus_supported: capabilities.focus_mode.is_some(),
            focus_modes: capabilities.focus_mode.clone().unwrap_or_default(),
            focus_mode: settings.focus_mode,
        }
    }

    /// Whether the device bounds admit the given frame size
    ///
    /// Unknown bounds never report support.
    pub fn check_resolution(&self, width: u32, height: u32) -> ResolutionSupport {
        let (Some(min_w), Some(max_w), Some(min_h), Some(max_h)) =
            (self.min_width, self.max_width, self.min_height, self.max_height)
        else {
            return ResolutionSupport {
                supported: false,
                nearest: None,
            };
        };

        let supported = (min_w..=max_w).contains(&width) && (min_h..=max_h).contains(&height);
        let nearest = Resolution::new(
            width.clamp(min_w, max_w.max(min_w)),
            height.clamp(min_h, max_h.max(min_h)),
        );

        ResolutionSupport {
            supported,
            nearest: Some(nearest),
        }
    }

    /// Clamp a zoom value into the reported range
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        match (self.min_zoom, self.max_zoom) {
            (Some(min), Some(max)) if min <= max => zoom.clamp(min, max),
            _ => zoom,
        }
    }
}

/// Enumerate the frame rates of a stepped range
///
/// A missing, zero, negative or non-finite step yields no enumeration; the
/// snapshot then carries only the min/max pair. Enumeration is bounded by
/// [`MAX_FRAME_RATE_STEPS`].
pub fn enumerate_frame_rates(range: &NumericRange<f64>) -> Vec<f64> {
    let Some(step) = range.step else {
        return Vec::new();
    };
    if !(step.is_finite() && step > 0.0 && range.min.is_finite() && range.max.is_finite()) {
        return Vec::new();
    }
    if range.max < range.min {
        return Vec::new();
    }

    // Tolerate float drift on the last step
    let epsilon = step * 1e-6;
    (0..MAX_FRAME_RATE_STEPS)
        .map(|i| range.min + i as f64 * step)
        .take_while(|rate| *rate <= range.max + epsilon)
        .collect()
}

/// Read a device's capabilities through a throwaway, video-only acquisition
///
/// The stream is released on every path before this returns.
pub async fn build_capability_snapshot(
    provider: &dyn MediaCaptureProvider,
    device_id: &str,
) -> SessionResult<CapabilitySnapshot> {
    debug!(device = %device_id, "Building capability snapshot");

    let constraints = MediaConstraints::video_only(VideoConstraints::for_device(Some(device_id)));
    let stream = provider.acquire(&constraints).await.map_err(|err| {
        SessionError::from_provider(
            err,
            format!("failed to open '{}' for capability probe", device_id),
        )
    })?;
    let guard = ReleaseOnDrop::new(stream);

    let snapshot = CapabilitySnapshot::from_track(
        &guard.stream().capabilities(),
        &guard.stream().settings(),
    );
    drop(guard);

    info!(
        device = %device_id,
        max_width = ?snapshot.max_width,
        max_height = ?snapshot.max_height,
        zoom = snapshot.zoom_supported,
        torch = snapshot.torch_supported,
        focus = snapshot.focus_supported,
        "Capability snapshot built"
    );

    Ok(snapshot)
}
