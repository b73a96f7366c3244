// SPDX-License-Identifier: GPL-3.0-only

//! Still capture pipeline
//!
//! ```text
//! PreviewSurface frame → CaptureCanvas (scale, mirror) → PhotoEncoder → CapturedImage
//! ```
//!
//! The canvas is owned by the pipeline and sized to the live track's settings
//! times the caller's scale factor. A mirror transform is applied for one draw
//! and reset right after, so it never leaks into the next capture.

pub mod encoding;

pub use encoding::{CapturedImage, EncodingFormat, PhotoEncoder};

use crate::backends::camera::types::{PreviewFrame, Resolution};
use crate::constants::{DEFAULT_CAPTURE_SCALE, DEFAULT_JPEG_QUALITY, MAX_CAPTURE_SCALE};
use crate::errors::{SessionError, SessionResult};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Caller options for a capture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    pub format: EncodingFormat,
    /// JPEG quality in 0.0 - 1.0; `None` uses the default
    pub quality: Option<f32>,
    /// Output size relative to the live track
    pub scale: f64,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            format: EncodingFormat::Png,
            quality: None,
            scale: DEFAULT_CAPTURE_SCALE,
        }
    }
}

impl CaptureOptions {
    pub fn png() -> Self {
        Self::default()
    }

    pub fn jpeg(quality: Option<f32>) -> Self {
        Self {
            format: EncodingFormat::Jpeg,
            quality: Some(quality.unwrap_or(DEFAULT_JPEG_QUALITY)),
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Canvas size for a track of the given size
    pub fn canvas_size(&self, track: Resolution) -> SessionResult<Resolution> {
        if !(self.scale.is_finite() && self.scale > 0.0 && self.scale <= MAX_CAPTURE_SCALE) {
            return Err(SessionError::capture_failed(format!(
                "capture scale {} is outside (0, {}]",
                self.scale, MAX_CAPTURE_SCALE
            )));
        }
        let scaled = |v: u32| ((v as f64 * self.scale).round() as u32).max(1);
        Ok(Resolution::new(scaled(track.width), scaled(track.height)))
    }
}

/// Transform applied to the next draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasTransform {
    #[default]
    Identity,
    /// Horizontal flip
    MirrorX,
}

/// Off-screen drawing target for captures
#[derive(Debug)]
pub struct CaptureCanvas {
    pixels: RgbaImage,
    transform: CanvasTransform,
}

impl CaptureCanvas {
    pub fn new(size: Resolution) -> Self {
        Self {
            pixels: RgbaImage::new(size.width, size.height),
            transform: CanvasTransform::Identity,
        }
    }

    pub fn transform(&self) -> CanvasTransform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: CanvasTransform) {
        self.transform = transform;
    }

    pub fn reset_transform(&mut self) {
        self.transform = CanvasTransform::Identity;
    }

    /// Draw a frame scaled to fill the canvas, honoring the current transform
    pub fn draw(&mut self, frame: &PreviewFrame) {
        let (width, height) = self.pixels.dimensions();
        let mut drawn = if frame.dimensions() == (width, height) {
            frame.clone()
        } else {
            imageops::resize(frame, width, height, FilterType::Triangle)
        };
        if self.transform == CanvasTransform::MirrorX {
            imageops::flip_horizontal_in_place(&mut drawn);
        }
        self.pixels = drawn;
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

/// Draw and encode one capture
///
/// # Arguments
/// * `frame` - Current surface frame, unmirrored
/// * `track` - Size reported by the live track settings
/// * `mirror` - Whether the session is mirrored
/// * `options` - Output format, quality and scale
pub async fn capture_frame(
    frame: &PreviewFrame,
    track: Resolution,
    mirror: bool,
    options: &CaptureOptions,
) -> SessionResult<CapturedImage> {
    let size = options.canvas_size(track)?;
    debug!(width = size.width, height = size.height, mirror, "Drawing capture");

    let mut canvas = CaptureCanvas::new(size);
    if mirror {
        canvas.set_transform(CanvasTransform::MirrorX);
    }
    canvas.draw(frame);
    canvas.reset_transform();

    PhotoEncoder::new(options.format, options.quality)
        .encode(canvas.into_image())
        .await
}
