// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the session lifecycle against the simulated provider

use camera_session::backends::camera::types::{
    CameraFacing, FacingMode, Orientation, PermissionState, ProviderError, Resolution,
};
use camera_session::backends::camera::{
    SimulatedDevice, SimulatedPermission, SimulatedProvider, SimulatedScenario, SimulatedSurface,
};
use camera_session::platform::{DeviceType, OsFamily, PlatformInfo, StaticPlatform};
use camera_session::{
    CameraSession, CameraTarget, CaptureOptions, ConfigurationPatch, ErrorKind,
    ResolutionCandidate, SessionConfiguration, SessionEvent, SessionStatus,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;

struct Harness {
    provider: Arc<SimulatedProvider>,
    surface: Arc<SimulatedSurface>,
    session: CameraSession,
}

fn harness(scenario: SimulatedScenario, platform: PlatformInfo, config: SessionConfiguration) -> Harness {
    let provider = Arc::new(SimulatedProvider::new(scenario));
    let surface = Arc::new(SimulatedSurface::new());
    let session = CameraSession::builder(provider.clone())
        .surface(surface.clone())
        .platform(Arc::new(StaticPlatform(platform)))
        .configuration(config)
        .build()
        .unwrap();
    Harness {
        provider,
        surface,
        session,
    }
}

fn laptop(config: SessionConfiguration) -> Harness {
    harness(
        SimulatedScenario::laptop(),
        PlatformInfo::desktop(OsFamily::Linux),
        config,
    )
}

fn iphone(config: SessionConfiguration) -> Harness {
    harness(
        SimulatedScenario::iphone(),
        PlatformInfo::new(DeviceType::Mobile, OsFamily::Ios).with_viewport(Resolution::new(390, 844)),
        config,
    )
}

fn candidates(sizes: &[(u32, u32)]) -> Vec<ResolutionCandidate> {
    sizes
        .iter()
        .map(|&(w, h)| ResolutionCandidate::new(w, h))
        .collect()
}

fn strict(sizes: &[(u32, u32)]) -> SessionConfiguration {
    SessionConfiguration {
        resolutions: candidates(sizes),
        allow_any_resolution: false,
        ..Default::default()
    }
}

fn drain(events: &mut Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

async fn wait_for_error(events: &mut Receiver<SessionEvent>) -> camera_session::SessionError {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Error(err)) => return err,
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("event channel closed"),
            }
        }
    })
    .await
    .expect("no error event within timeout")
}

#[tokio::test]
async fn test_start_uses_first_candidate_that_succeeds() {
    // 1920x1080 is not offered by the laptop webcam, 1280x720 is
    let h = laptop(strict(&[(1920, 1080), (1280, 720), (640, 480)]));

    h.session.start().await.unwrap();

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert_eq!(h.session.active_resolution(), Some(Resolution::new(1280, 720)));
    assert_eq!(h.provider.live_streams(), 1);
    assert_eq!(h.surface.attach_count(), 1);
    assert!(h.session.last_error().is_none());

    let state = h.session.state();
    assert_eq!(state.active_device_id.as_deref(), Some("integrated-0"));
    assert!(state.active_stream_id.is_some());
}

#[tokio::test]
async fn test_negotiated_resolution_comes_from_track_settings() {
    let scenario = SimulatedScenario {
        devices: vec![
            SimulatedDevice::new("cam", "USB Camera")
                .negotiates(Resolution::new(1280, 720), Resolution::new(960, 540)),
        ],
        ..SimulatedScenario::laptop()
    };
    let h = harness(
        scenario,
        PlatformInfo::desktop(OsFamily::Linux),
        strict(&[(1280, 720)]),
    );

    h.session.start().await.unwrap();
    assert_eq!(h.session.active_resolution(), Some(Resolution::new(960, 540)));
}

#[tokio::test]
async fn test_all_candidates_failing_chains_last_failure() {
    let h = laptop(strict(&[(3840, 2160), (2560, 1440)]));

    let err = h.session.start().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResolutionUnsupported);
    match err.platform_error() {
        Some(ProviderError::Overconstrained { constraint }) => {
            assert!(constraint.contains("2560x1440"), "cause was {}", constraint)
        }
        other => panic!("unexpected cause: {:?}", other),
    }
    assert_eq!(h.session.status(), SessionStatus::Error);
    assert_eq!(
        h.session.last_error().map(|e| e.kind()),
        Some(ErrorKind::ResolutionUnsupported)
    );
    assert_eq!(h.provider.live_streams(), 0);
}

#[tokio::test]
async fn test_any_resolution_fallback() {
    let config = SessionConfiguration {
        resolutions: candidates(&[(3840, 2160)]),
        allow_any_resolution: true,
        ..Default::default()
    };
    let h = laptop(config);

    h.session.start().await.unwrap();
    // Closest supported size to the 4K hint
    assert_eq!(h.session.active_resolution(), Some(Resolution::new(1280, 720)));
}

#[tokio::test]
async fn test_stop_start_cycles_release_every_stream() {
    let h = laptop(SessionConfiguration::default());

    for _ in 0..5 {
        h.session.start().await.unwrap();
        assert_eq!(h.provider.live_streams(), 1);
        h.session.stop().await.unwrap();
        assert_eq!(h.provider.live_streams(), 0);
        assert_eq!(h.surface.attached_stream_id(), None);
    }
    assert_eq!(h.session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn test_double_stop_is_idempotent() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();

    h.session.stop().await.unwrap();
    h.session.stop().await.unwrap();

    assert_eq!(h.session.status(), SessionStatus::Idle);
    assert_eq!(h.session.active_resolution(), None);
    assert_eq!(h.provider.live_streams(), 0);
}

#[tokio::test]
async fn test_start_when_ready_is_noop() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();
    let acquisitions = h.provider.acquisitions().len();

    h.session.start().await.unwrap();

    assert_eq!(h.provider.acquisitions().len(), acquisitions);
    assert_eq!(h.provider.live_streams(), 1);
}

#[tokio::test]
async fn test_overlapping_start_fails_fast() {
    let scenario = SimulatedScenario {
        camera_permission: SimulatedPermission::Granted,
        ..SimulatedScenario::laptop()
    };
    let h = harness(
        scenario,
        PlatformInfo::desktop(OsFamily::Linux),
        SessionConfiguration::default(),
    );

    h.provider.pause_acquisitions();
    let first = tokio::spawn({
        let session = h.session.clone();
        async move { session.start().await }
    });
    while h.provider.pending_acquisitions() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(h.session.status(), SessionStatus::Initializing);

    let err = h.session.start().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConcurrentOperation);
    let err = h.session.stop().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConcurrentOperation);

    h.provider.resume_acquisitions();
    first.await.unwrap().unwrap();

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert_eq!(h.provider.live_streams(), 1);
}

#[tokio::test]
async fn test_restarting_update_rejected_during_start() {
    let scenario = SimulatedScenario {
        camera_permission: SimulatedPermission::Granted,
        ..SimulatedScenario::laptop()
    };
    let h = harness(
        scenario,
        PlatformInfo::desktop(OsFamily::Linux),
        SessionConfiguration::default(),
    );
    let original = SessionConfiguration::default().resolutions;

    h.provider.pause_acquisitions();
    let first = tokio::spawn({
        let session = h.session.clone();
        async move { session.start().await }
    });
    while h.provider.pending_acquisitions() == 0 {
        tokio::task::yield_now().await;
    }

    let patch = ConfigurationPatch::default().resolutions(candidates(&[(640, 480)]));
    let err = h.session.update_configuration(patch, false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConcurrentOperation);
    let err = h
        .session
        .update_configuration(ConfigurationPatch::default(), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConcurrentOperation);

    // In-place changes still go through
    let config = h
        .session
        .update_configuration(ConfigurationPatch::default().mirror(false), false)
        .await
        .unwrap();
    assert!(!config.mirror);

    h.provider.resume_acquisitions();
    first.await.unwrap().unwrap();

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert_eq!(h.provider.live_streams(), 1);
    assert_eq!(h.session.configuration().unwrap().resolutions, original);
    assert!(!h.surface.is_mirrored());
}

#[tokio::test]
async fn test_mirror_toggle_without_configuration() {
    let provider = Arc::new(SimulatedProvider::new(SimulatedScenario::laptop()));
    let surface = Arc::new(SimulatedSurface::new());
    let session = CameraSession::builder(provider)
        .surface(surface.clone())
        .platform(Arc::new(StaticPlatform(PlatformInfo::desktop(OsFamily::Linux))))
        .build()
        .unwrap();

    assert!(session.toggle_mirror().unwrap());
    assert!(surface.is_mirrored());
    assert!(session.is_mirrored());
    assert!(!session.toggle_mirror().unwrap());
    assert!(!surface.is_mirrored());

    // A later configuration brings its own flag
    session
        .setup_configuration(SessionConfiguration::default())
        .unwrap();
    assert!(session.is_mirrored());
    assert!(surface.is_mirrored());
}

#[tokio::test]
async fn test_mirror_toggle_does_not_reacquire() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();
    assert!(h.surface.is_mirrored());
    let acquisitions = h.provider.acquisitions().len();
    let stream_id = h.surface.attached_stream_id();

    let mirror = h.session.toggle_mirror().unwrap();

    assert!(!mirror);
    assert!(!h.surface.is_mirrored());
    assert_eq!(h.session.configuration().map(|c| c.mirror), Some(false));
    assert_eq!(h.provider.acquisitions().len(), acquisitions);
    assert_eq!(h.surface.attach_count(), 1);
    assert_eq!(h.surface.attached_stream_id(), stream_id);

    // Same through a configuration patch
    h.session
        .update_configuration(ConfigurationPatch::default().mirror(true), false)
        .await
        .unwrap();
    assert!(h.surface.is_mirrored());
    assert_eq!(h.provider.acquisitions().len(), acquisitions);
}

#[tokio::test]
async fn test_update_configuration_restarts_on_resolution_change() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();
    assert_eq!(h.session.active_resolution(), Some(Resolution::new(1280, 720)));

    let config = h
        .session
        .update_configuration(
            ConfigurationPatch::default().resolutions(candidates(&[(640, 480)])),
            false,
        )
        .await
        .unwrap();

    assert_eq!(config.resolutions[0].id, "640x480");
    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert_eq!(h.session.active_resolution(), Some(Resolution::new(640, 480)));
    assert_eq!(h.provider.live_streams(), 1);
    assert_eq!(h.surface.attach_count(), 2);
}

#[tokio::test]
async fn test_start_without_configuration() {
    let provider = Arc::new(SimulatedProvider::new(SimulatedScenario::laptop()));
    let session = CameraSession::builder(provider.clone()).build().unwrap();

    let err = session.start().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotInitialized);
    assert_eq!(provider.acquisitions().len(), 0);
}

#[tokio::test]
async fn test_permission_denied_at_prompt() {
    let scenario = SimulatedScenario {
        camera_permission: SimulatedPermission::PromptDeny,
        ..SimulatedScenario::laptop()
    };
    let h = harness(
        scenario,
        PlatformInfo::desktop(OsFamily::Linux),
        SessionConfiguration::default(),
    );
    let mut events = h.session.subscribe().unwrap();

    let err = h.session.start().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(h.session.status(), SessionStatus::Error);
    assert_eq!(h.session.permissions().camera, PermissionState::Denied);
    assert!(h.session.has_permission_denied());
    assert_eq!(h.provider.live_streams(), 0);

    let events = drain(&mut events);
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::PermissionChanged {
            state: PermissionState::Denied,
            ..
        }
    )));
    assert!(events.iter().any(|e| matches!(e, SessionEvent::Error(_))));
}

#[tokio::test]
async fn test_microphone_denied_with_audio() {
    let scenario = SimulatedScenario {
        microphone_permission: SimulatedPermission::Denied,
        ..SimulatedScenario::laptop()
    };
    let config = SessionConfiguration {
        audio: true,
        ..Default::default()
    };
    let h = harness(scenario, PlatformInfo::desktop(OsFamily::Linux), config);

    let err = h.session.start().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert!(err.message().contains("microphone"));
}

#[tokio::test]
async fn test_request_permissions_classifies_refusal() {
    let scenario = SimulatedScenario {
        camera_permission: SimulatedPermission::PromptDeny,
        ..SimulatedScenario::laptop()
    };
    let h = harness(
        scenario,
        PlatformInfo::desktop(OsFamily::Linux),
        SessionConfiguration::default(),
    );

    assert_eq!(
        h.session.check_camera_permission().await.unwrap(),
        PermissionState::Prompt
    );
    assert!(h.session.needs_permission_request());

    let status = h.session.request_permissions(true, false).await.unwrap();
    assert_eq!(status.camera, PermissionState::Denied);
    assert!(!h.session.needs_permission_request());
    assert_eq!(h.provider.live_streams(), 0);
}

#[tokio::test]
async fn test_busy_device() {
    let h = laptop(SessionConfiguration::default());
    h.provider.set_busy("integrated-0", true);

    let err = h.session.start().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeviceBusy);

    // Recover once the other consumer lets go
    h.provider.set_busy("integrated-0", false);
    h.session.clear_error().unwrap();
    assert_eq!(h.session.status(), SessionStatus::Idle);
    h.session.start().await.unwrap();
    assert_eq!(h.session.status(), SessionStatus::Ready);
}

#[tokio::test]
async fn test_lifecycle_events() {
    let h = laptop(SessionConfiguration::default());
    let mut events = h.session.subscribe().unwrap();

    h.session.start().await.unwrap();
    let started = drain(&mut events);

    assert!(started.iter().any(|e| matches!(
        e,
        SessionEvent::StateChanged {
            from: SessionStatus::Idle,
            to: SessionStatus::Initializing
        }
    )));
    assert!(started.iter().any(|e| matches!(
        e,
        SessionEvent::StateChanged {
            from: SessionStatus::Initializing,
            to: SessionStatus::Ready
        }
    )));
    assert!(started.iter().any(|e| matches!(
        e,
        SessionEvent::Started { resolution } if *resolution == Resolution::new(1280, 720)
    )));
    let stream_id = started
        .iter()
        .find_map(|e| match e {
            SessionEvent::StreamStarted { stream_id } => Some(stream_id.clone()),
            _ => None,
        })
        .expect("no StreamStarted event");

    h.session.stop().await.unwrap();
    let stopped = drain(&mut events);
    assert!(stopped.iter().any(|e| matches!(
        e,
        SessionEvent::StreamStopped { stream_id: id } if *id == stream_id
    )));
    assert!(stopped.iter().any(|e| matches!(
        e,
        SessionEvent::StateChanged {
            to: SessionStatus::Idle,
            ..
        }
    )));
}

#[tokio::test]
async fn test_active_device_removal_moves_to_error() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();
    let mut events = h.session.subscribe().unwrap();

    h.provider.remove_device("integrated-0");
    let err = wait_for_error(&mut events).await;

    assert_eq!(err.kind(), ErrorKind::DeviceNotFound);
    assert_eq!(h.session.status(), SessionStatus::Error);
    assert_eq!(h.provider.live_streams(), 0);
    assert!(h.session.devices().is_empty());

    h.session.clear_error().unwrap();
    assert_eq!(h.session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn test_unrelated_device_change_keeps_stream() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();

    h.provider
        .add_device(SimulatedDevice::new("usb-1", "Logitech Webcam C920"));
    h.session.handle_device_change().await.unwrap();

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert_eq!(h.session.devices().len(), 2);
    assert_eq!(h.provider.live_streams(), 1);
}

#[tokio::test]
async fn test_capture_png_is_mirrored() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();

    let image = h.session.capture(&CaptureOptions::png()).await.unwrap();

    assert_eq!(image.mime_type, "image/png");
    assert_eq!((image.width, image.height), (1280, 720));
    let decoded = image::load_from_memory(&image.data).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (1280, 720));
    // The unmirrored frame is dark on the left, bright on the right
    assert!(decoded.get_pixel(0, 360)[0] > 200);
    assert!(decoded.get_pixel(1279, 360)[0] < 50);
}

#[tokio::test]
async fn test_capture_unmirrored_scaled_jpeg() {
    let config = SessionConfiguration {
        mirror: false,
        ..Default::default()
    };
    let h = laptop(config);
    h.session.start().await.unwrap();

    let options = CaptureOptions::jpeg(Some(0.8)).with_scale(0.5);
    let image = h.session.capture(&options).await.unwrap();

    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(&image.data[..2], &[0xFF, 0xD8]);
    assert_eq!((image.width, image.height), (640, 360));
    let decoded = image::load_from_memory(&image.data).unwrap().to_rgba8();
    assert!(decoded.get_pixel(2, 180)[0] < 50);
    assert!(decoded.get_pixel(637, 180)[0] > 200);
}

#[tokio::test]
async fn test_capture_requires_ready_session() {
    let h = laptop(SessionConfiguration::default());

    let err = h.session.capture(&CaptureOptions::png()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CaptureFailed);

    h.session.start().await.unwrap();
    let err = h
        .session
        .capture(&CaptureOptions::png().with_scale(0.0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CaptureFailed);
}

#[tokio::test]
async fn test_back_camera_zoom_and_torch() {
    let config = SessionConfiguration {
        target: CameraTarget::Facing(CameraFacing::Back),
        ..Default::default()
    };
    let h = iphone(config);

    h.session.start().await.unwrap();
    assert_eq!(
        h.session.state().active_device_id.as_deref(),
        Some("back-triple")
    );

    // Small mobile viewport: requests go out portrait
    assert_eq!(h.session.active_resolution(), Some(Resolution::new(1080, 1920)));

    assert_eq!(h.session.set_zoom(25.0).await.unwrap(), 10.0);
    assert_eq!(h.session.set_zoom(0.5).await.unwrap(), 1.0);
    assert_eq!(h.session.capabilities().zoom, Some(1.0));

    assert!(h.session.toggle_torch().await.unwrap());
    assert!(h.session.capabilities().torch);
    assert!(!h.session.toggle_torch().await.unwrap());
}

#[tokio::test]
async fn test_unsupported_controls() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();

    let err = h.session.set_zoom(2.0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StreamError);
    let err = h.session.set_torch(true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StreamError);
}

#[tokio::test]
async fn test_rejected_constraint_application() {
    let h = iphone(SessionConfiguration {
        target: CameraTarget::Facing(CameraFacing::Back),
        ..Default::default()
    });
    h.session.start().await.unwrap();
    h.provider.fail_constraint_application(true);

    let err = h.session.set_torch(true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StreamError);
    assert!(err.platform_error().is_some());
    assert!(!h.session.capabilities().torch);
    // A control failure does not end the session
    assert_eq!(h.session.status(), SessionStatus::Ready);
}

#[tokio::test]
async fn test_switch_camera_restarts_on_front_device() {
    let h = iphone(SessionConfiguration {
        target: CameraTarget::Facing(CameraFacing::Back),
        ..Default::default()
    });
    h.session.start().await.unwrap();

    let config = h.session.switch_camera(CameraFacing::Front).await.unwrap();

    assert_eq!(config.target, CameraTarget::Device("front".to_string()));
    assert_eq!(h.session.state().active_device_id.as_deref(), Some("front"));
    assert_eq!(h.provider.live_streams(), 1);
}

#[tokio::test]
async fn test_orientation_tracked_on_mobile_only() {
    let h = iphone(SessionConfiguration::default());
    h.session
        .handle_orientation_change(Orientation::LandscapePrimary);
    assert_eq!(h.session.orientation(), Some(Orientation::LandscapePrimary));

    let h = laptop(SessionConfiguration::default());
    h.session
        .handle_orientation_change(Orientation::LandscapePrimary);
    assert_eq!(h.session.orientation(), None);
}

#[tokio::test]
async fn test_probe_capabilities_without_session() {
    let h = iphone(SessionConfiguration::default());

    let snapshot = h.session.probe_capabilities(Some("back-wide")).await.unwrap();

    assert_eq!(snapshot.device_id.as_deref(), Some("back-wide"));
    assert!(snapshot.zoom_supported);
    assert!(snapshot.torch_supported);
    assert_eq!(h.provider.live_streams(), 0);
    assert_eq!(h.session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn test_resolution_support_from_live_capabilities() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();

    assert!(h.session.check_resolution_support(640, 480).supported);
    let support = h.session.check_resolution_support(3840, 2160);
    assert!(!support.supported);
    assert_eq!(support.nearest, Some(Resolution::new(1280, 720)));
}

#[tokio::test]
async fn test_dispose_releases_and_closes() {
    let h = laptop(SessionConfiguration::default());
    let mut events = h.session.subscribe().unwrap();
    h.session.start().await.unwrap();

    h.session.dispose();

    assert!(h.session.is_disposed());
    assert_eq!(h.provider.live_streams(), 0);
    assert_eq!(h.session.start().await.unwrap_err().kind(), ErrorKind::Disposed);
    assert!(h.session.stop().await.is_ok());
    assert!(h.session.subscribe().is_err());

    drain(&mut events);
    assert!(matches!(
        events.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Closed)
    ));
}

#[tokio::test]
async fn test_dropping_session_stops_stream() {
    let h = laptop(SessionConfiguration::default());
    h.session.start().await.unwrap();
    assert_eq!(h.provider.live_streams(), 1);

    let Harness {
        provider, session, surface,
    } = h;
    drop(session);
    // The surface still references the stream; the session must stop it anyway
    assert_eq!(provider.live_streams(), 0);
    assert_eq!(surface.attached_stream_id(), None);
}

#[test]
fn test_facing_helpers() {
    assert_eq!(CameraFacing::Back.facing_mode(), FacingMode::Environment);
    assert_eq!(CameraFacing::Front.flipped(), CameraFacing::Back);
}
