// SPDX-License-Identifier: GPL-3.0-only

//! Camera and microphone permission tracking
//!
//! Permission state is read through the platform's status query when it has
//! one. Platforms without a query API learn the answer from a transient
//! acquisition whose only purpose is to raise the permission prompt.
//! Nothing here returns an error: failures are classified into a
//! [`PermissionState`] and logged.

use crate::backends::camera::types::{
    MediaConstraints, PermissionKind, PermissionState, ProviderError,
};
use crate::backends::camera::MediaCaptureProvider;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Stored permission state for both domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionStatus {
    pub camera: PermissionState,
    pub microphone: PermissionState,
}

impl PermissionStatus {
    pub fn get(&self, kind: PermissionKind) -> PermissionState {
        match kind {
            PermissionKind::Camera => self.camera,
            PermissionKind::Microphone => self.microphone,
        }
    }

    fn set(&mut self, kind: PermissionKind, state: PermissionState) {
        match kind {
            PermissionKind::Camera => self.camera = state,
            PermissionKind::Microphone => self.microphone = state,
        }
    }

    /// Whether a prompt is still required before acquiring
    ///
    /// The microphone only matters when `audio` is enabled.
    pub fn needs_permission_request(&self, audio: bool) -> bool {
        self.camera == PermissionState::Prompt
            || (audio && self.microphone == PermissionState::Prompt)
    }

    /// Whether a required domain has been refused
    pub fn has_permission_denied(&self, audio: bool) -> bool {
        self.camera == PermissionState::Denied
            || (audio && self.microphone == PermissionState::Denied)
    }

    /// Domains whose state differs between two snapshots
    pub fn changes_from(&self, previous: &PermissionStatus) -> Vec<(PermissionKind, PermissionState)> {
        [PermissionKind::Camera, PermissionKind::Microphone]
            .into_iter()
            .filter(|kind| self.get(*kind) != previous.get(*kind))
            .map(|kind| (kind, self.get(kind)))
            .collect()
    }
}

/// Queries, requests and stores permission state
pub struct PermissionCoordinator {
    provider: Arc<dyn MediaCaptureProvider>,
    status: Mutex<PermissionStatus>,
}

impl PermissionCoordinator {
    pub fn new(provider: Arc<dyn MediaCaptureProvider>) -> Self {
        Self {
            provider,
            status: Mutex::new(PermissionStatus::default()),
        }
    }

    /// Copy of the stored state
    pub fn status(&self) -> PermissionStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self, kind: PermissionKind, state: PermissionState) {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set(kind, state);
    }

    /// Query one domain
    ///
    /// A successful query is stored and returned. When the query API is
    /// missing or fails, a previously decided state is kept; otherwise the
    /// result is `Prompt`.
    pub async fn check_permission(&self, kind: PermissionKind) -> PermissionState {
        match self.provider.query_permission(kind).await {
            Ok(state) => {
                debug!(kind = %kind, state = ?state, "Permission queried");
                self.store(kind, state);
                state
            }
            Err(err) => {
                let stored = self.status().get(kind);
                debug!(kind = %kind, error = %err, stored = ?stored, "Permission query unavailable");
                stored
            }
        }
    }

    pub async fn check_camera_permission(&self) -> PermissionState {
        self.check_permission(PermissionKind::Camera).await
    }

    pub async fn check_microphone_permission(&self) -> PermissionState {
        self.check_permission(PermissionKind::Microphone).await
    }

    /// Refresh both domains (the microphone only when `audio` is set)
    pub async fn check_all(&self, audio: bool) -> PermissionStatus {
        self.check_camera_permission().await;
        if audio {
            self.check_microphone_permission().await;
        }
        self.status()
    }

    /// Raise the platform prompt for the given domains
    ///
    /// Performs a transient acquisition scoped to the requested media types
    /// and stops it immediately. A refusal is recorded as `Denied`; any other
    /// failure leaves the stored state alone. The check methods then run
    /// again so a platform query, when available, has the final word.
    pub async fn request_permissions(&self, camera: bool, microphone: bool) -> PermissionStatus {
        if !camera && !microphone {
            return self.status();
        }

        let requested: Vec<PermissionKind> = [
            (camera, PermissionKind::Camera),
            (microphone, PermissionKind::Microphone),
        ]
        .into_iter()
        .filter_map(|(wanted, kind)| wanted.then_some(kind))
        .collect();

        info!(camera, microphone, "Requesting permissions");

        let probe = MediaConstraints::permission_probe(camera, microphone);
        match self.provider.acquire(&probe).await {
            Ok(stream) => {
                // Only the prompt was wanted
                stream.stop();
                for kind in &requested {
                    self.store(*kind, PermissionState::Granted);
                }
            }
            Err(ProviderError::NotAllowed(reason)) => {
                info!(reason = %reason, "Permission request refused");
                for kind in &requested {
                    self.store(*kind, PermissionState::Denied);
                }
            }
            Err(err) => {
                warn!(error = %err, "Permission request acquisition failed");
            }
        }

        for kind in requested {
            self.check_permission(kind).await;
        }
        self.status()
    }
}

impl std::fmt::Debug for PermissionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionCoordinator")
            .field("status", &self.status())
            .finish()
    }
}
