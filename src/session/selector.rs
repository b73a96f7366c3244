// SPDX-License-Identifier: GPL-3.0-only

//! Device selection by facing direction
//!
//! Platforms label cameras very differently, so selection is heuristic and
//! kept behind [`DeviceSelector`]:
//!
//! - **Apple** (iPhone, iPad): label priority lists, e.g. a triple camera is
//!   preferred over a dual camera, which is preferred over the plain wide one
//! - **Android**: the lowest camera index parsed from `camera2 <n>, ...` labels
//! - **Desktop**: the first device whose label looks like a webcam
//!
//! Any failure during enrichment falls back to the first video input.

use crate::backends::camera::types::{CameraFacing, FacingMode, MediaDeviceInfo, ProviderError};
use crate::backends::camera::MediaCaptureProvider;
use crate::platform::{CachedPlatform, SelectionStrategy};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use tracing::{debug, warn};

static ANDROID_INDEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)camera\d*\s+(\d+)\s*,").ok());

static BACK_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(back|rear|environment)\b|背面|後面").ok());

static DESKTOP_LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)camera|facetime|integrated|webcam|hd\s?cam|カメラ|kamera|caméra|cámara|câmera|камера|摄像头|相机",
    )
    .ok()
});

static APPLE_FRONT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\bfront camera\b|前面カメラ",
        r"(?i)front ultra ?wide|前面超広角",
    ])
});

static APPLE_BACK: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)triple|トリプル",
        r"(?i)dual|デュアル",
        r"(?i)\bback camera\b|rear camera|背面カメラ",
    ])
});

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

fn matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

/// Parse the camera index from an Android label
///
/// Accepts `camera2 1, facing front` and `camera 1, facing front`. Unparseable
/// labels get index 0.
pub fn parse_android_index(label: &str) -> usize {
    ANDROID_INDEX
        .as_ref()
        .and_then(|re| re.captures(label))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Guess the facing mode from a label
pub fn facing_from_label(label: &str) -> FacingMode {
    if matches(&BACK_LABEL, label) {
        FacingMode::Environment
    } else {
        FacingMode::User
    }
}

/// A video input enriched with selection metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDeviceDescriptor {
    pub device_id: String,
    pub label: String,
    /// Platform ordering index (Android camera index or enumeration position)
    pub index: usize,
    pub facing: FacingMode,
}

/// Picks the best camera for a requested facing direction
pub struct DeviceSelector {
    provider: Arc<dyn MediaCaptureProvider>,
    platform: Arc<CachedPlatform>,
    // Facing inference can hit the platform, so results are kept per device id.
    // Entries for devices missing from the latest roster are dropped.
    cache: Mutex<HashMap<String, CameraDeviceDescriptor>>,
}

impl DeviceSelector {
    pub fn new(provider: Arc<dyn MediaCaptureProvider>, platform: Arc<CachedPlatform>) -> Self {
        Self {
            provider,
            platform,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Enrich every video input in enumeration order
    pub fn describe(&self, devices: &[MediaDeviceInfo]) -> Result<Vec<CameraDeviceDescriptor>, ProviderError> {
        let android = self.platform.info().selection_strategy() == SelectionStrategy::Android;
        let present: HashSet<&str> = devices
            .iter()
            .filter(|d| d.is_video_input())
            .map(|d| d.device_id.as_str())
            .collect();
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|id, _| present.contains(id.as_str()));

        devices
            .iter()
            .filter(|d| d.is_video_input())
            .enumerate()
            .map(|(position, device)| self.enrich(device, position, android))
            .collect()
    }

    fn enrich(
        &self,
        device: &MediaDeviceInfo,
        position: usize,
        android: bool,
    ) -> Result<CameraDeviceDescriptor, ProviderError> {
        let index = if android {
            parse_android_index(&device.label)
        } else {
            position
        };

        let cached_facing = {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache
                .get(&device.device_id)
                .filter(|d| d.label == device.label)
                .map(|d| d.facing)
        };

        let facing = match cached_facing {
            Some(facing) => facing,
            None => self.infer_facing(device)?,
        };

        let descriptor = CameraDeviceDescriptor {
            device_id: device.device_id.clone(),
            label: device.label.clone(),
            index,
            facing,
        };
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(device.device_id.clone(), descriptor.clone());
        Ok(descriptor)
    }

    fn infer_facing(&self, device: &MediaDeviceInfo) -> Result<FacingMode, ProviderError> {
        let reported = match self.provider.device_facing_modes(device) {
            Ok(modes) => modes,
            Err(ProviderError::Unsupported(_)) => Vec::new(),
            Err(err) => return Err(err),
        };

        Ok(if reported.contains(&FacingMode::Environment) {
            FacingMode::Environment
        } else if reported.contains(&FacingMode::User) {
            FacingMode::User
        } else {
            facing_from_label(&device.label)
        })
    }

    /// Select the best video input for `facing`
    ///
    /// Returns `None` only when there is no video input at all.
    pub fn select(&self, devices: &[MediaDeviceInfo], facing: CameraFacing) -> Option<MediaDeviceInfo> {
        let first = devices.iter().find(|d| d.is_video_input())?;

        let descriptors = match self.describe(devices) {
            Ok(descriptors) => descriptors,
            Err(err) => {
                warn!(error = %err, "Device enrichment failed, using first device");
                return Some(first.clone());
            }
        };

        let strategy = self.platform.info().selection_strategy();
        let chosen = match strategy {
            SelectionStrategy::Apple => select_apple(&descriptors, facing),
            SelectionStrategy::Android => select_android(&descriptors, facing),
            SelectionStrategy::Desktop => select_desktop(&descriptors),
        };

        let selected = chosen
            .and_then(|d| devices.iter().find(|raw| raw.device_id == d.device_id))
            .unwrap_or(first);
        debug!(
            strategy = ?strategy,
            facing = %facing,
            device = %selected.device_id,
            label = %selected.label,
            "Selected device"
        );
        Some(selected.clone())
    }
}

impl std::fmt::Debug for DeviceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.cache.lock().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("DeviceSelector")
            .field("platform", &self.platform)
            .field("cached", &cached)
            .finish()
    }
}

fn facing_matches(
    descriptors: &[CameraDeviceDescriptor],
    facing: CameraFacing,
) -> Vec<&CameraDeviceDescriptor> {
    let mode = facing.facing_mode();
    descriptors.iter().filter(|d| d.facing == mode).collect()
}

fn select_apple(
    descriptors: &[CameraDeviceDescriptor],
    facing: CameraFacing,
) -> Option<&CameraDeviceDescriptor> {
    let candidates = facing_matches(descriptors, facing);
    let priorities: &[Regex] = match facing {
        CameraFacing::Front => APPLE_FRONT.as_slice(),
        CameraFacing::Back => APPLE_BACK.as_slice(),
    };

    priorities
        .iter()
        .find_map(|pattern| candidates.iter().find(|d| pattern.is_match(&d.label)))
        .or_else(|| candidates.first())
        .copied()
}

fn select_android(
    descriptors: &[CameraDeviceDescriptor],
    facing: CameraFacing,
) -> Option<&CameraDeviceDescriptor> {
    facing_matches(descriptors, facing)
        .into_iter()
        .min_by_key(|d| d.index)
}

fn select_desktop(descriptors: &[CameraDeviceDescriptor]) -> Option<&CameraDeviceDescriptor> {
    let mut webcams: Vec<&CameraDeviceDescriptor> = descriptors
        .iter()
        .filter(|d| matches(&DESKTOP_LABEL, &d.label))
        .collect();
    webcams.sort_by_key(|d| d.index);
    webcams.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_forgets_unplugged_devices() {
        use crate::backends::camera::{SimulatedProvider, SimulatedScenario};
        use crate::backends::camera::types::MediaDeviceKind;
        use crate::platform::{OsFamily, PlatformInfo, StaticPlatform};

        let video = |id: &str| MediaDeviceInfo {
            device_id: id.to_string(),
            label: format!("{} Webcam", id),
            kind: MediaDeviceKind::VideoInput,
            group_id: None,
        };
        let selector = DeviceSelector::new(
            Arc::new(SimulatedProvider::new(SimulatedScenario::laptop())),
            Arc::new(CachedPlatform::new(Arc::new(StaticPlatform(
                PlatformInfo::desktop(OsFamily::Linux),
            )))),
        );
        let cached = || selector.cache.lock().unwrap().len();

        selector.describe(&[video("a"), video("b")]).unwrap();
        assert_eq!(cached(), 2);

        selector.describe(&[video("a")]).unwrap();
        assert_eq!(cached(), 1);
        assert!(selector.cache.lock().unwrap().contains_key("a"));

        selector.describe(&[]).unwrap();
        assert_eq!(cached(), 0);
    }

    #[test]
    fn test_android_index_formats() {
        assert_eq!(parse_android_index("camera2 0, facing back"), 0);
        assert_eq!(parse_android_index("camera2 2, facing back"), 2);
        assert_eq!(parse_android_index("camera 1, facing front"), 1);
        assert_eq!(parse_android_index("Camera 12 , facing back"), 12);
        assert_eq!(parse_android_index("Back Camera"), 0);
    }

    #[test]
    fn test_facing_from_label() {
        assert_eq!(facing_from_label("Back Triple Camera"), FacingMode::Environment);
        assert_eq!(facing_from_label("camera2 0, facing back"), FacingMode::Environment);
        assert_eq!(facing_from_label("背面カメラ"), FacingMode::Environment);
        assert_eq!(facing_from_label("Front Camera"), FacingMode::User);
        assert_eq!(facing_from_label("Integrated Webcam"), FacingMode::User);
    }

    fn descriptor(id: &str, label: &str, index: usize, facing: FacingMode) -> CameraDeviceDescriptor {
        CameraDeviceDescriptor {
            device_id: id.to_string(),
            label: label.to_string(),
            index,
            facing,
        }
    }

    #[test]
    fn test_apple_priority_order() {
        let devices = vec![
            descriptor("a", "Back Camera", 0, FacingMode::Environment),
            descriptor("b", "Back Dual Wide Camera", 1, FacingMode::Environment),
            descriptor("c", "Front Camera", 2, FacingMode::User),
        ];
        assert_eq!(select_apple(&devices, CameraFacing::Back).unwrap().device_id, "b");
        assert_eq!(select_apple(&devices, CameraFacing::Front).unwrap().device_id, "c");
    }

    #[test]
    fn test_desktop_ignores_facing_and_non_camera_labels() {
        let devices = vec![
            descriptor("capture", "Elgato Game Capture", 0, FacingMode::User),
            descriptor("hd", "HD Pro Webcam C920", 1, FacingMode::User),
        ];
        assert_eq!(select_desktop(&devices).unwrap().device_id, "hd");
        assert!(select_desktop(&devices[..1]).is_none());
    }
}
