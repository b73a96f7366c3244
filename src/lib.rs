// SPDX-License-Identifier: GPL-3.0-only

//! Camera Session Engine
//!
//! Turns a declarative camera configuration into a live capture session on
//! top of a host platform's media-capture primitives: permission
//! negotiation, device selection, resolution negotiation with fallback,
//! capability introspection, live controls and still capture.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`session`]: The session state machine and its components
//! - [`backends`]: Collaborator traits for capture providers and preview surfaces
//! - [`pipelines`]: Still capture drawing and encoding
//! - [`platform`]: Platform classification consumed by selection and negotiation
//! - [`config`]: Session configuration
//! - [`errors`]: Error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use camera_session::backends::camera::{SimulatedProvider, SimulatedScenario, SimulatedSurface};
//! use camera_session::{CameraSession, SessionConfiguration};
//! use std::sync::Arc;
//!
//! # async fn run() -> camera_session::SessionResult<()> {
//! let provider = Arc::new(SimulatedProvider::new(SimulatedScenario::laptop()));
//! let session = CameraSession::builder(provider)
//!     .surface(Arc::new(SimulatedSurface::new()))
//!     .configuration(SessionConfiguration::default())
//!     .build()?;
//!
//! session.start().await?;
//! println!("streaming at {:?}", session.active_resolution());
//! session.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod platform;
pub mod session;

// Re-export commonly used types
pub use config::{CameraTarget, ConfigurationPatch, ResolutionCandidate, SessionConfiguration};
pub use errors::{ErrorKind, SessionError, SessionResult};
pub use pipelines::photo::{CaptureOptions, CapturedImage, EncodingFormat};
pub use session::{
    CameraSession, CameraSessionBuilder, CapabilitySnapshot, SessionEvent, SessionState,
    SessionStatus,
};
