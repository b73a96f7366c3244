// SPDX-License-Identifier: GPL-3.0-only

//! Engine-wide constants

use crate::backends::camera::types::Resolution;
use serde::{Deserialize, Serialize};

/// Standard capture resolutions
///
/// Callers building a candidate list usually pick from these, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResolutionPreset {
    /// 3840x2160
    Uhd4K,
    /// 2560x1440
    Qhd,
    /// 1920x1080
    #[default]
    FullHd,
    /// 1280x720
    Hd,
    /// 640x480
    Vga,
}

impl ResolutionPreset {
    /// All presets, highest resolution first
    pub const ALL: [ResolutionPreset; 5] = [
        ResolutionPreset::Uhd4K,
        ResolutionPreset::Qhd,
        ResolutionPreset::FullHd,
        ResolutionPreset::Hd,
        ResolutionPreset::Vga,
    ];

    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            ResolutionPreset::Uhd4K => "4K UHD",
            ResolutionPreset::Qhd => "1440p QHD",
            ResolutionPreset::FullHd => "1080p Full HD",
            ResolutionPreset::Hd => "720p HD",
            ResolutionPreset::Vga => "480p VGA",
        }
    }

    pub fn resolution(&self) -> Resolution {
        match self {
            ResolutionPreset::Uhd4K => Resolution::new(3840, 2160),
            ResolutionPreset::Qhd => Resolution::new(2560, 1440),
            ResolutionPreset::FullHd => Resolution::new(1920, 1080),
            ResolutionPreset::Hd => Resolution::new(1280, 720),
            ResolutionPreset::Vga => Resolution::new(640, 480),
        }
    }
}

/// Default JPEG quality for captures (0.0 - 1.0)
pub const DEFAULT_JPEG_QUALITY: f32 = 0.92;

/// Default capture scale factor relative to the live track size
pub const DEFAULT_CAPTURE_SCALE: f64 = 1.0;

/// Upper bound for the capture scale factor
pub const MAX_CAPTURE_SCALE: f64 = 4.0;

/// Ideal (not exact) size hint for the unconstrained fallback acquisition
///
/// Platforms pick the closest size they support, so aiming high yields the
/// device's likely maximum.
pub const ANY_RESOLUTION_IDEAL: Resolution = Resolution::new(3840, 2160);

/// Maximum number of frame rates enumerated from a stepped range
pub const MAX_FRAME_RATE_STEPS: usize = 512;

/// Shorter viewport edge (px) at or below which a mobile viewport counts as small
pub const SMALL_VIEWPORT_MAX_EDGE: u32 = 1024;

/// Capacity of the session event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
