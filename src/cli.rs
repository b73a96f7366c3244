// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for exercising the session engine
//!
//! This module provides command-line functionality for:
//! - Listing simulated cameras and how the selector sees them
//! - Probing capabilities
//! - Taking a snapshot through a full start → capture → stop cycle

use camera_session::backends::camera::types::{CameraFacing, Resolution};
use camera_session::backends::camera::{SimulatedProvider, SimulatedScenario, SimulatedSurface};
use camera_session::platform::{DeviceType, OsFamily, PlatformInfo, StaticPlatform};
use camera_session::{CameraSession, CaptureOptions, SessionConfiguration};
use chrono::Local;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Default folder name inside the Pictures directory
const DEFAULT_SAVE_FOLDER: &str = "camera-session";

/// Built-in platform scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Linux laptop with an integrated webcam
    Laptop,
    /// iPhone with front, wide, triple and ultra-wide cameras
    Iphone,
    /// Android phone with camera2-style labels
    Android,
}

impl Preset {
    fn scenario(&self) -> SimulatedScenario {
        match self {
            Preset::Laptop => SimulatedScenario::laptop(),
            Preset::Iphone => SimulatedScenario::iphone(),
            Preset::Android => SimulatedScenario::android(),
        }
    }

    fn platform(&self) -> PlatformInfo {
        match self {
            Preset::Laptop => PlatformInfo::desktop(OsFamily::Linux),
            Preset::Iphone => PlatformInfo::new(DeviceType::Mobile, OsFamily::Ios)
                .with_viewport(Resolution::new(390, 844)),
            Preset::Android => PlatformInfo::new(DeviceType::Mobile, OsFamily::Android)
                .with_viewport(Resolution::new(412, 915)),
        }
    }
}

/// Simulated platform shared by every command
pub struct Environment {
    scenario: SimulatedScenario,
    platform: PlatformInfo,
    runtime: tokio::runtime::Runtime,
}

impl Environment {
    pub fn load(preset: Preset, scenario: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let scenario = match scenario {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                info!(path = %path.display(), "Loaded scenario");
                SimulatedScenario::from_json_str(&json)?
            }
            None => preset.scenario(),
        };

        Ok(Self {
            scenario,
            platform: preset.platform(),
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    fn session(
        &self,
        config: Option<SessionConfiguration>,
    ) -> Result<(Arc<SimulatedProvider>, CameraSession), Box<dyn std::error::Error>> {
        let provider = Arc::new(SimulatedProvider::new(self.scenario.clone()));
        let mut builder = CameraSession::builder(provider.clone())
            .surface(Arc::new(SimulatedSurface::new()))
            .platform(Arc::new(StaticPlatform(self.platform)));
        if let Some(config) = config {
            builder = builder.configuration(config);
        }
        Ok((provider, builder.build()?))
    }
}

/// List all simulated cameras
pub fn list_cameras(env: &Environment) -> Result<(), Box<dyn std::error::Error>> {
    let (_, session) = env.session(None)?;

    env.runtime.block_on(async {
        let devices = session.refresh_devices().await?;
        if devices.is_empty() {
            println!("No cameras found.");
            return Ok(());
        }

        let front = session.select_device(CameraFacing::Front).map(|d| d.device_id);
        let back = session.select_device(CameraFacing::Back).map(|d| d.device_id);

        println!("Available cameras ({:?} {:?}):", env.platform.device_type, env.platform.os);
        println!();
        for descriptor in session.device_descriptors()? {
            let mut picks = Vec::new();
            if front.as_deref() == Some(descriptor.device_id.as_str()) {
                picks.push("front pick");
            }
            if back.as_deref() == Some(descriptor.device_id.as_str()) {
                picks.push("back pick");
            }

            println!("  [{}] {}", descriptor.index, descriptor.label);
            println!("      Id: {}", descriptor.device_id);
            println!("      Facing: {}", descriptor.facing);
            if !picks.is_empty() {
                println!("      Selected as: {}", picks.join(", "));
            }
            println!();
        }

        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

/// Print a capability snapshot
pub fn probe(env: &Environment, device: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (provider, session) = env.session(Some(SessionConfiguration::default()))?;

    let snapshot = env
        .runtime
        .block_on(session.probe_capabilities(device.as_deref()))?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    info!(live_streams = provider.live_streams(), "Probe finished");
    Ok(())
}

/// Start, capture one image, stop
pub fn snapshot(
    env: &Environment,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    jpeg: bool,
    quality: Option<f32>,
    scale: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => SessionConfiguration::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SessionConfiguration::default(),
    };
    let options = if jpeg {
        CaptureOptions::jpeg(quality)
    } else {
        CaptureOptions::png()
    }
    .with_scale(scale);

    let (_, session) = env.session(Some(config))?;

    let image = env.runtime.block_on(async {
        session.start().await?;
        if let Some(resolution) = session.active_resolution() {
            println!("Negotiated resolution: {}", resolution);
        }
        let captured = session.capture(&options).await;
        session.stop().await?;
        captured
    })?;

    let path = match output {
        Some(path) => path,
        None => {
            let dir = get_default_photo_dir();
            std::fs::create_dir_all(&dir)?;
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            dir.join(format!("IMG_{}.{}", timestamp, image.format.extension()))
        }
    };

    std::fs::write(&path, &image.data)?;
    println!(
        "Snapshot saved: {} ({}x{}, {})",
        path.display(),
        image.width,
        image.height,
        image.mime_type
    );
    Ok(())
}

/// Get default photo directory
fn get_default_photo_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(DEFAULT_SAVE_FOLDER)
}
