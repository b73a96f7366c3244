// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines for captured frames
//!
//! - [`photo`]: still capture drawing and encoding

pub mod photo;
