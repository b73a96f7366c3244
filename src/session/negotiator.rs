// SPDX-License-Identifier: GPL-3.0-only

//! Resolution negotiation with ordered fallback
//!
//! Candidates are tried strictly one at a time in the caller's order. The first
//! acquisition that succeeds wins, and its *negotiated* size (read back from
//! the track) is reported. When every candidate fails, an optional final
//! attempt accepts whatever the platform offers for an ideal size hint.

use crate::backends::camera::types::{
    Constrain, MediaConstraints, ProviderError, Resolution, VideoConstraints,
};
use crate::backends::camera::{MediaCaptureProvider, StreamHandle};
use crate::config::{ResolutionCandidate, SessionConfiguration};
use crate::constants::ANY_RESOLUTION_IDEAL;
use crate::errors::{ErrorKind, SessionError, SessionResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-attempt diagnostics go to `info` when the session's debug flag is set
macro_rules! attempt_log {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+);
        } else {
            debug!($($arg)+);
        }
    };
}

/// Everything the negotiator needs for one acquisition
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationRequest {
    /// `None` lets the platform pick
    pub device_id: Option<String>,
    pub candidates: Vec<ResolutionCandidate>,
    pub allow_dimension_swap: bool,
    pub allow_any_resolution: bool,
    pub audio: bool,
    pub debug: bool,
}

impl NegotiationRequest {
    /// Build a request from a configuration and an already resolved policy
    pub fn from_config(
        config: &SessionConfiguration,
        device_id: Option<String>,
        allow_dimension_swap: bool,
    ) -> Self {
        Self {
            device_id,
            candidates: config.resolutions.clone(),
            allow_dimension_swap,
            allow_any_resolution: config.allow_any_resolution,
            audio: config.audio,
            debug: config.debug,
        }
    }

    fn requested(&self, resolution: Resolution) -> Resolution {
        if self.allow_dimension_swap {
            resolution.swapped()
        } else {
            resolution
        }
    }

    fn constraints(&self, width: Constrain<u32>, height: Constrain<u32>) -> MediaConstraints {
        MediaConstraints {
            video: Some(VideoConstraints {
                width: Some(width),
                height: Some(height),
                ..VideoConstraints::for_device(self.device_id.as_deref())
            }),
            audio: self.audio,
        }
    }
}

/// A live stream plus what was actually negotiated
pub struct NegotiatedStream {
    pub stream: Arc<dyn StreamHandle>,
    /// Size reported by the live track
    pub resolution: Resolution,
    /// Winning candidate; `None` for the any-resolution fallback
    pub candidate_id: Option<String>,
}

impl std::fmt::Debug for NegotiatedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegotiatedStream")
            .field("stream", &self.stream.id())
            .field("resolution", &self.resolution)
            .field("candidate_id", &self.candidate_id)
            .finish()
    }
}

fn negotiated_resolution(stream: &Arc<dyn StreamHandle>, requested: Resolution) -> Resolution {
    stream.settings().resolution().unwrap_or(requested)
}

/// Acquire a stream for the request
///
/// # Errors
/// * `NotInitialized` - No candidates and the any-resolution fallback is off
/// * `PermissionDenied` - The platform refused access; remaining candidates are skipped
/// * Otherwise the last candidate's kind, with that candidate's failure as the cause
pub async fn negotiate(
    provider: &dyn MediaCaptureProvider,
    request: &NegotiationRequest,
) -> SessionResult<NegotiatedStream> {
    let device = request.device_id.as_deref().unwrap_or("default");

    if request.candidates.is_empty() && !request.allow_any_resolution {
        return Err(SessionError::not_initialized(
            "no resolution candidates configured and any-resolution fallback is disabled",
        ));
    }

    let mut last_failure: Option<SessionError> = None;

    for (attempt, candidate) in request.candidates.iter().enumerate() {
        let requested = request.requested(candidate.resolution());
        attempt_log!(
            request.debug,
            device = %device,
            attempt = attempt + 1,
            candidate = %candidate.id,
            width = requested.width,
            height = requested.height,
            "Trying resolution candidate"
        );

        let constraints = request.constraints(
            Constrain::Exact(requested.width),
            Constrain::Exact(requested.height),
        );
        match provider.acquire(&constraints).await {
            Ok(stream) => {
                let resolution = negotiated_resolution(&stream, requested);
                info!(
                    device = %device,
                    candidate = %candidate.id,
                    width = resolution.width,
                    height = resolution.height,
                    "Resolution negotiated"
                );
                return Ok(NegotiatedStream {
                    stream,
                    resolution,
                    candidate_id: Some(candidate.id.clone()),
                });
            }
            Err(err) => {
                attempt_log!(request.debug, candidate = %candidate.id, error = %err, "Candidate failed");
                let refused = matches!(err, ProviderError::NotAllowed(_));
                let failure = SessionError::from_provider(
                    err,
                    format!("resolution candidate '{}' ({}) failed", candidate.id, requested),
                );
                if refused {
                    return Err(failure);
                }
                last_failure = Some(failure);
            }
        }
    }

    let fallback_failure = if request.allow_any_resolution {
        let hint = request.requested(ANY_RESOLUTION_IDEAL);
        attempt_log!(
            request.debug,
            device = %device,
            width = hint.width,
            height = hint.height,
            "Trying any-resolution fallback"
        );
        let constraints =
            request.constraints(Constrain::Ideal(hint.width), Constrain::Ideal(hint.height));
        match provider.acquire(&constraints).await {
            Ok(stream) => {
                let resolution = negotiated_resolution(&stream, hint);
                info!(
                    device = %device,
                    width = resolution.width,
                    height = resolution.height,
                    "Accepted platform-negotiated resolution"
                );
                return Ok(NegotiatedStream {
                    stream,
                    resolution,
                    candidate_id: None,
                });
            }
            Err(err) => {
                warn!(device = %device, error = %err, "Any-resolution fallback failed");
                Some(SessionError::from_provider(
                    err,
                    "any-resolution fallback failed",
                ))
            }
        }
    } else {
        None
    };

    // The last candidate's failure is the cause; the fallback's only stands
    // in when there were no candidates
    let cause = match (last_failure, fallback_failure) {
        (Some(candidate), _) => candidate,
        (None, Some(fallback)) => fallback,
        (None, None) => {
            return Err(SessionError::not_initialized(
                "no resolution candidates configured",
            ));
        }
    };

    let kind = match cause.kind() {
        ErrorKind::Unknown => ErrorKind::StreamError,
        kind => kind,
    };
    warn!(
        device = %device,
        candidates = request.candidates.len(),
        allow_any = request.allow_any_resolution,
        "Resolution negotiation exhausted"
    );
    Err(SessionError::new(
        kind,
        format!(
            "could not acquire '{}' at any of {} candidate resolution(s){}",
            device,
            request.candidates.len(),
            if request.allow_any_resolution {
                " or a platform-chosen resolution"
            } else {
                ""
            }
        ),
    )
    .with_cause(cause))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{SimulatedDevice, SimulatedProvider, SimulatedScenario};

    fn provider(device: SimulatedDevice) -> SimulatedProvider {
        SimulatedProvider::new(SimulatedScenario {
            devices: vec![device],
            ..SimulatedScenario::laptop()
        })
    }

    fn request(candidates: Vec<ResolutionCandidate>, allow_any: bool) -> NegotiationRequest {
        NegotiationRequest {
            device_id: Some("cam".to_string()),
            candidates,
            allow_dimension_swap: false,
            allow_any_resolution: allow_any,
            audio: false,
            debug: false,
        }
    }

    #[tokio::test]
    async fn test_list_order_is_preference_order() {
        let provider = provider(SimulatedDevice::new("cam", "USB Camera"));
        let negotiated = negotiate(
            &provider,
            &request(
                vec![
                    ResolutionCandidate::new(3840, 2160),
                    ResolutionCandidate::new(1280, 720),
                    ResolutionCandidate::new(640, 480),
                ],
                false,
            ),
        )
        .await
        .unwrap();
        assert_eq!(negotiated.candidate_id.as_deref(), Some("1280x720"));
        assert_eq!(negotiated.resolution, Resolution::new(1280, 720));
        assert_eq!(provider.acquisitions().len(), 2);
    }

    #[tokio::test]
    async fn test_negotiated_size_is_read_back() {
        let provider = provider(
            SimulatedDevice::new("cam", "USB Camera")
                .negotiates(Resolution::new(1280, 720), Resolution::new(1280, 960)),
        );
        let negotiated = negotiate(
            &provider,
            &request(vec![ResolutionCandidate::new(1280, 720)], false),
        )
        .await
        .unwrap();
        assert_eq!(negotiated.resolution, Resolution::new(1280, 960));
    }

    #[tokio::test]
    async fn test_swap_applies_to_request_only() {
        let provider = provider(SimulatedDevice::new("cam", "Back Camera"));
        let mut req = request(vec![ResolutionCandidate::new(1280, 720)], false);
        req.allow_dimension_swap = true;
        let negotiated = negotiate(&provider, &req).await.unwrap();

        let sent = provider.acquisitions()[0].video.clone().unwrap();
        assert_eq!(sent.width, Some(Constrain::Exact(720)));
        assert_eq!(sent.height, Some(Constrain::Exact(1280)));
        assert_eq!(negotiated.resolution, Resolution::new(720, 1280));
    }

    #[tokio::test]
    async fn test_any_resolution_fallback() {
        let provider = provider(
            SimulatedDevice::new("cam", "USB Camera")
                .bounds(Resolution::new(320, 240), Resolution::new(800, 600)),
        );
        let negotiated = negotiate(
            &provider,
            &request(vec![ResolutionCandidate::new(1920, 1080)], true),
        )
        .await
        .unwrap();
        assert_eq!(negotiated.candidate_id, None);
        assert_eq!(negotiated.resolution, Resolution::new(800, 600));
    }

    #[tokio::test]
    async fn test_empty_list_requires_fallback() {
        let provider = provider(SimulatedDevice::new("cam", "USB Camera"));
        let err = negotiate(&provider, &request(Vec::new(), false))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInitialized);
        assert!(provider.acquisitions().is_empty());

        let negotiated = negotiate(&provider, &request(Vec::new(), true)).await.unwrap();
        assert_eq!(negotiated.resolution, Resolution::new(1920, 1080));
    }

    #[tokio::test]
    async fn test_exhaustion_chains_last_candidate() {
        let provider = provider(
            SimulatedDevice::new("cam", "USB Camera")
                .bounds(Resolution::new(320, 240), Resolution::new(640, 480)),
        );
        let err = negotiate(
            &provider,
            &request(
                vec![
                    ResolutionCandidate::new(3840, 2160),
                    ResolutionCandidate::new(1920, 1080),
                ],
                false,
            ),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResolutionUnsupported);
        let inner = err.inner_session_error().unwrap();
        assert!(inner.message().contains("1920x1080"));
        assert!(matches!(
            err.platform_error(),
            Some(ProviderError::Overconstrained { .. })
        ));
        assert_eq!(provider.live_streams(), 0);
    }
}
