//! # Steganography Service Core
//!
//! The core is responsible for ONE thing: running the codec on uploaded image
//! bytes. HTTP concerns (multipart parsing, status codes, CORS) live in
//! [`api`](super::api).
//!
//! Image decoding and bit packing are CPU bound, so the async entry points run
//! them on the blocking thread pool. Every request works on its own buffer.

use log::info;
use serde::Serialize;
use std::path::Path;

use super::error::ApiError;
use crate::processing::image_io;
use crate::processing::{check_capacity, decode_text, encode, max_payload_bytes};

/// Result of a successful hide operation.
#[derive(Debug, Clone)]
pub struct HiddenImage {
    /// PNG bytes carrying the token
    pub png: Vec<u8>,
    /// Download name: the uploaded name with a `.png` extension
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CapacityReport {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
    pub capacity_bits: u64,
    pub max_payload_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fits: Option<bool>,
}

/// Hide `token` in an encoded image and return the result as PNG.
///
/// The capacity check runs right after the image is decoded so an oversized
/// token is rejected with a [`CapacityError`](crate::processing::CapacityError)
/// before any sample is modified.
pub fn hide_token(image_bytes: &[u8], token: &str) -> Result<Vec<u8>, ApiError> {
    let mut buffer = image_io::load_pixel_buffer(image_bytes)?;
    check_capacity(buffer.shape(), token.len())?;
    encode(token.as_bytes(), &mut buffer)?;
    Ok(image_io::encode_png(&buffer)?)
}

/// Recover a UTF-8 token from an encoded image.
pub fn reveal_token(image_bytes: &[u8]) -> Result<String, ApiError> {
    let buffer = image_io::load_pixel_buffer(image_bytes)?;
    Ok(decode_text(&buffer)?)
}

/// Describe how much an image can hold and, optionally, whether `token` fits.
pub fn inspect_capacity(image_bytes: &[u8], token: Option<&str>) -> Result<CapacityReport, ApiError> {
    let buffer = image_io::load_pixel_buffer(image_bytes)?;
    let shape = buffer.shape();
    Ok(CapacityReport {
        rows: shape.rows,
        cols: shape.cols,
        channels: shape.channels,
        capacity_bits: shape.capacity_bits(),
        max_payload_bytes: max_payload_bytes(shape),
        fits: token.map(|t| check_capacity(shape, t.len()).is_ok()),
    })
}

/// Name for the returned image: the upload's file stem plus `.png`.
pub fn png_filename(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    let safe: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}.png", safe)
}

/// Async front end used by the HTTP handlers.
#[derive(Debug, Default, Clone)]
pub struct StegCore;

impl StegCore {
    pub fn new() -> Self {
        Self
    }

    /// Hide a token in an uploaded image.
    ///
    /// # Returns
    /// - `Ok(HiddenImage)`: PNG bytes plus a download filename
    /// - `Err`: image could not be decoded, or the token does not fit
    pub async fn hide(
        &self,
        request_id: u64,
        image_data: Vec<u8>,
        filename: String,
        token: String,
    ) -> Result<HiddenImage, ApiError> {
        info!(
            "📷 Hide request #{}: {} ({} bytes), token of {} bytes",
            request_id,
            filename,
            image_data.len(),
            token.len()
        );

        let png = tokio::task::spawn_blocking(move || hide_token(&image_data, &token))
            .await
            .map_err(|e| ApiError::Internal(format!("hide task panicked: {}", e)))??;

        info!(
            "✅ Hide request #{} complete, returning {} bytes",
            request_id,
            png.len()
        );

        Ok(HiddenImage {
            png,
            filename: png_filename(&filename),
        })
    }

    pub async fn reveal(&self, request_id: u64, image_data: Vec<u8>) -> Result<String, ApiError> {
        info!(
            "🔍 Reveal request #{} ({} bytes)",
            request_id,
            image_data.len()
        );

        let token = tokio::task::spawn_blocking(move || reveal_token(&image_data))
            .await
            .map_err(|e| ApiError::Internal(format!("reveal task panicked: {}", e)))??;

        info!(
            "✅ Reveal request #{} recovered {} bytes",
            request_id,
            token.len()
        );
        Ok(token)
    }

    pub async fn capacity(
        &self,
        image_data: Vec<u8>,
        token: Option<String>,
    ) -> Result<CapacityReport, ApiError> {
        tokio::task::spawn_blocking(move || inspect_capacity(&image_data, token.as_deref()))
            .await
            .map_err(|e| ApiError::Internal(format!("capacity task panicked: {}", e)))?
    }
}
