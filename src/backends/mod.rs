// SPDX-License-Identifier: GPL-3.0-only

//! Collaborator abstractions for capture hardware
//!
//! - [`camera`]: media-capture provider, stream handle and preview surface
//!   traits, their value types, and a simulated implementation

pub mod camera;
