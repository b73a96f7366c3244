// SPDX-License-Identifier: GPL-3.0-only

//! Session configuration
//!
//! A [`SessionConfiguration`] is a plain value: it is replaced wholesale by
//! `setup_configuration` and merged with a [`ConfigurationPatch`] by
//! `update_configuration`. Lifecycle notifications are not part of it; they
//! are delivered through the session's event channel.

use crate::backends::camera::types::{CameraFacing, Resolution};
use crate::constants::ResolutionPreset;
use crate::errors::{ErrorKind, SessionError, SessionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which camera a session should open
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CameraTarget {
    /// Let the platform pick
    #[default]
    Default,
    /// A specific device identifier
    Device(String),
    /// The best device facing the given direction, chosen by the device selector
    Facing(CameraFacing),
}

/// One entry in the caller's ordered resolution preference list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionCandidate {
    /// Identifier; derived as `"{width}x{height}"` when empty
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub width: u32,
    pub height: u32,
}

impl ResolutionCandidate {
    pub fn new(width: u32, height: u32) -> Self {
        let id = format!("{}x{}", width, height);
        Self {
            label: id.clone(),
            id,
            width,
            height,
        }
    }

    pub fn labeled(label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            label: label.into(),
            ..Self::new(width, height)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Standard preset list, highest resolution first
    pub fn standard_presets() -> Vec<Self> {
        ResolutionPreset::ALL.into_iter().map(Self::from).collect()
    }

    fn normalize(&mut self) {
        if self.id.is_empty() {
            self.id = format!("{}x{}", self.width, self.height);
        }
        if self.label.is_empty() {
            self.label = self.id.clone();
        }
    }
}

impl From<ResolutionPreset> for ResolutionCandidate {
    fn from(preset: ResolutionPreset) -> Self {
        let res = preset.resolution();
        Self::labeled(preset.display_name(), res.width, res.height)
    }
}

/// Declarative description of the session a caller wants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfiguration {
    /// Camera to open
    pub target: CameraTarget,
    /// Candidate resolutions, in preference order
    pub resolutions: Vec<ResolutionCandidate>,
    /// Also capture the microphone
    pub audio: bool,
    /// Mirror the preview and captures horizontally (selfie mode)
    pub mirror: bool,
    /// Accept whatever the platform negotiates when every candidate fails
    pub allow_any_resolution: bool,
    /// Swap width/height on requests; `None` decides from the platform
    pub allow_dimension_swap: Option<bool>,
    /// Verbose negotiation diagnostics
    pub debug: bool,
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            target: CameraTarget::Default,
            resolutions: vec![
                ResolutionPreset::FullHd.into(),
                ResolutionPreset::Hd.into(),
                ResolutionPreset::Vga.into(),
            ],
            audio: false,
            mirror: true, // Default to mirrored (selfie mode)
            allow_any_resolution: true,
            allow_dimension_swap: None,
            debug: false,
        }
    }
}

impl SessionConfiguration {
    /// Parse a configuration from JSON, filling derived fields and validating
    pub fn from_json_str(json: &str) -> SessionResult<Self> {
        let mut config: Self = serde_json::from_str(json).map_err(|e| {
            SessionError::new(
                ErrorKind::NotInitialized,
                format!("invalid configuration: {}", e),
            )
        })?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> SessionResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SessionError::new(
                ErrorKind::Unknown,
                format!("failed to serialize configuration: {}", e),
            )
        })
    }

    /// Fill derived candidate identifiers and labels
    pub fn normalize(&mut self) {
        for candidate in &mut self.resolutions {
            candidate.normalize();
        }
    }

    /// Check the configuration can drive a negotiation
    pub fn validate(&self) -> SessionResult<()> {
        if self.resolutions.is_empty() && !self.allow_any_resolution {
            return Err(SessionError::not_initialized(
                "no resolution candidates and allow_any_resolution is disabled",
            ));
        }

        let mut seen = HashSet::new();
        for candidate in &self.resolutions {
            if candidate.width == 0 || candidate.height == 0 {
                return Err(SessionError::not_initialized(format!(
                    "resolution candidate '{}' has a zero dimension",
                    candidate.id
                )));
            }
            if !seen.insert(candidate.id.as_str()) {
                return Err(SessionError::not_initialized(format!(
                    "duplicate resolution candidate '{}'",
                    candidate.id
                )));
            }
        }

        if let CameraTarget::Device(id) = &self.target
            && id.is_empty()
        {
            return Err(SessionError::not_initialized("target device id is empty"));
        }

        Ok(())
    }

    /// Merge a patch into a copy of this configuration
    pub fn merged(&self, patch: &ConfigurationPatch) -> ConfigurationUpdate {
        let mut next = self.clone();
        if let Some(target) = &patch.target {
            next.target = target.clone();
        }
        if let Some(resolutions) = &patch.resolutions {
            next.resolutions = resolutions.clone();
        }
        if let Some(audio) = patch.audio {
            next.audio = audio;
        }
        if let Some(mirror) = patch.mirror {
            next.mirror = mirror;
        }
        if let Some(allow_any) = patch.allow_any_resolution {
            next.allow_any_resolution = allow_any;
        }
        if let Some(swap) = patch.allow_dimension_swap {
            next.allow_dimension_swap = swap;
        }
        if let Some(debug) = patch.debug {
            next.debug = debug;
        }
        next.normalize();

        let restart_required = next.target != self.target
            || next.resolutions != self.resolutions
            || next.audio != self.audio
            || next.allow_any_resolution != self.allow_any_resolution
            || next.allow_dimension_swap != self.allow_dimension_swap;
        let mirror_changed = next.mirror != self.mirror;

        ConfigurationUpdate {
            config: next,
            restart_required,
            mirror_changed,
        }
    }
}

/// Partial configuration; `None` fields keep their current value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationPatch {
    pub target: Option<CameraTarget>,
    pub resolutions: Option<Vec<ResolutionCandidate>>,
    pub audio: Option<bool>,
    pub mirror: Option<bool>,
    pub allow_any_resolution: Option<bool>,
    pub allow_dimension_swap: Option<Option<bool>>,
    pub debug: Option<bool>,
}

impl ConfigurationPatch {
    pub fn target(mut self, target: CameraTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn resolutions(mut self, resolutions: Vec<ResolutionCandidate>) -> Self {
        self.resolutions = Some(resolutions);
        self
    }

    pub fn audio(mut self, audio: bool) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn mirror(mut self, mirror: bool) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn allow_any_resolution(mut self, allow: bool) -> Self {
        self.allow_any_resolution = Some(allow);
        self
    }

    pub fn allow_dimension_swap(mut self, allow: Option<bool>) -> Self {
        self.allow_dimension_swap = Some(allow);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }
}

/// Result of merging a patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationUpdate {
    pub config: SessionConfiguration,
    /// A field that only takes effect on a fresh acquisition changed
    pub restart_required: bool,
    pub mirror_changed: bool,
}
