// SPDX-License-Identifier: GPL-3.0-only

//! Async still-image encoding
//!
//! This module handles encoding captured frames to:
//! - PNG (lossless, default)
//! - JPEG (with quality control)
//!
//! Encoding is CPU-bound and runs on the blocking thread pool.

use crate::constants::DEFAULT_JPEG_QUALITY;
use crate::errors::{SessionError, SessionResult};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Supported encoding formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    /// PNG format (lossless compression)
    #[default]
    Png,
    /// JPEG format (lossy compression)
    Jpeg,
}

impl EncodingFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            EncodingFormat::Png => "png",
            EncodingFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            EncodingFormat::Png => "image/png",
            EncodingFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Map a 0.0 - 1.0 quality to the encoder's 1 - 100 scale
pub fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_finite() {
        quality.clamp(0.0, 1.0)
    } else {
        DEFAULT_JPEG_QUALITY
    };
    ((quality * 100.0).round() as u8).max(1)
}

/// Encoded image with its mime type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
    pub format: EncodingFormat,
    pub width: u32,
    pub height: u32,
}

/// Still-image encoder
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    format: EncodingFormat,
    quality: f32,
}

impl PhotoEncoder {
    /// Create an encoder; `quality` only affects JPEG
    pub fn new(format: EncodingFormat, quality: Option<f32>) -> Self {
        Self {
            format,
            quality: quality.unwrap_or(DEFAULT_JPEG_QUALITY),
        }
    }

    /// Encode a frame asynchronously
    pub async fn encode(&self, image: RgbaImage) -> SessionResult<CapturedImage> {
        let (width, height) = image.dimensions();
        info!(width, height, format = ?self.format, "Starting encoding");

        let format = self.format;
        let quality = self.quality;

        tokio::task::spawn_blocking(move || {
            let data = match format {
                EncodingFormat::Png => Self::encode_png(&image)?,
                EncodingFormat::Jpeg => Self::encode_jpeg(image, quality)?,
            };

            debug!(size = data.len(), "Encoding complete");

            Ok(CapturedImage {
                data,
                mime_type: format.mime_type(),
                format,
                width,
                height,
            })
        })
        .await
        .map_err(|e| SessionError::capture_failed(format!("encoding task error: {}", e)))?
    }

    fn encode_png(image: &RgbaImage) -> SessionResult<Vec<u8>> {
        let mut buffer = Vec::new();

        image
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageFormat::Png,
            )
            .map_err(|e| SessionError::capture_failed(format!("PNG encoding failed: {}", e)))?;

        Ok(buffer)
    }

    fn encode_jpeg(image: RgbaImage, quality: f32) -> SessionResult<Vec<u8>> {
        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgba8(image).into_rgb8();
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, jpeg_quality(quality));

        encoder
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| SessionError::capture_failed(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }
}
