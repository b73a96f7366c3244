// SPDX-License-Identifier: GPL-3.0-only

//! Platform classification
//!
//! The engine consumes a classification (device type + OS family) produced by
//! an external [`PlatformClassifier`]; it never parses user-agent strings
//! itself. The classification drives two decisions only: the device selector's
//! platform branch and the width/height swap policy during negotiation.

use crate::backends::camera::types::Resolution;
use crate::constants::SMALL_VIEWPORT_MAX_EDGE;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Form factor of the running device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Ios,
    /// iPad, including iPads that report themselves as macOS
    IPadOs,
    MacOs,
    Android,
    Windows,
    Linux,
    ChromeOs,
    #[default]
    Other,
}

/// Classification result for the running environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlatformInfo {
    pub device_type: DeviceType,
    pub os: OsFamily,
    /// Current viewport size, when known
    pub viewport: Option<Resolution>,
}

impl PlatformInfo {
    pub fn new(device_type: DeviceType, os: OsFamily) -> Self {
        Self {
            device_type,
            os,
            viewport: None,
        }
    }

    pub fn with_viewport(mut self, viewport: Resolution) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn desktop(os: OsFamily) -> Self {
        Self::new(DeviceType::Desktop, os)
    }

    pub fn is_mobile_or_tablet(&self) -> bool {
        matches!(self.device_type, DeviceType::Mobile | DeviceType::Tablet)
    }

    /// Whether the swap-width-and-height request policy applies
    ///
    /// Mobile and tablet devices with a small viewport report camera
    /// dimensions in sensor (landscape) orientation while the caller thinks
    /// in portrait, so requests are sent swapped.
    pub fn prefers_dimension_swap(&self) -> bool {
        if !self.is_mobile_or_tablet() {
            return false;
        }
        self.viewport
            .map(|v| v.width.min(v.height) <= SMALL_VIEWPORT_MAX_EDGE)
            .unwrap_or(true)
    }

    /// Which device-selection rules apply on this platform
    pub fn selection_strategy(&self) -> SelectionStrategy {
        match (self.os, self.is_mobile_or_tablet()) {
            (OsFamily::IPadOs, _) => SelectionStrategy::Apple,
            (OsFamily::Ios | OsFamily::MacOs, true) => SelectionStrategy::Apple,
            (OsFamily::Android, true) => SelectionStrategy::Android,
            _ => SelectionStrategy::Desktop,
        }
    }
}

/// Device-selection rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Label-pattern priority lists (iPhone/iPad camera naming)
    Apple,
    /// Lowest camera index parsed from the label
    Android,
    /// Generic webcam label match, enumeration order
    Desktop,
}

/// Produces the platform classification
pub trait PlatformClassifier: Send + Sync {
    fn classify(&self) -> PlatformInfo;
}

/// Classifier returning a fixed result
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPlatform(pub PlatformInfo);

impl PlatformClassifier for StaticPlatform {
    fn classify(&self) -> PlatformInfo {
        self.0
    }
}

/// Classifier for the process's own host, based on the compile target
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

impl PlatformClassifier for HostPlatform {
    fn classify(&self) -> PlatformInfo {
        match std::env::consts::OS {
            "android" => PlatformInfo::new(DeviceType::Mobile, OsFamily::Android),
            "ios" => PlatformInfo::new(DeviceType::Mobile, OsFamily::Ios),
            "macos" => PlatformInfo::desktop(OsFamily::MacOs),
            "windows" => PlatformInfo::desktop(OsFamily::Windows),
            "linux" => PlatformInfo::desktop(OsFamily::Linux),
            _ => PlatformInfo::desktop(OsFamily::Other),
        }
    }
}

/// Classification computed once per session and reused afterwards
pub struct CachedPlatform {
    classifier: Arc<dyn PlatformClassifier>,
    info: OnceLock<PlatformInfo>,
}

impl CachedPlatform {
    pub fn new(classifier: Arc<dyn PlatformClassifier>) -> Self {
        Self {
            classifier,
            info: OnceLock::new(),
        }
    }

    pub fn info(&self) -> PlatformInfo {
        *self.info.get_or_init(|| {
            let info = self.classifier.classify();
            debug!(device_type = ?info.device_type, os = ?info.os, "Classified platform");
            info
        })
    }

    /// Resolve the dimension-swap policy for a negotiation
    ///
    /// An explicit configuration value wins; otherwise the cached platform
    /// classification decides.
    pub fn dimension_swap(&self, configured: Option<bool>) -> bool {
        configured.unwrap_or_else(|| self.info().prefers_dimension_swap())
    }
}

impl std::fmt::Debug for CachedPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedPlatform")
            .field("info", &self.info.get())
            .finish()
    }
}
