//! # Image Codec Boundary
//!
//! Converts between encoded image files and the [`PixelBuffer`] the codec works on.
//!
//! Loading keeps the channel layout of 8-bit greyscale, greyscale+alpha, RGB and
//! RGBA images. Anything else (16-bit, float) is coerced to 8-bit RGBA first.
//!
//! Saving always produces PNG: a lossy format such as JPEG would re-quantize the
//! samples and destroy the hidden LSBs.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat};
use thiserror::Error;

use super::error::BufferError;
use super::pixels::PixelBuffer;

#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("could not process image: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pixel buffer: {0}")]
    Buffer(#[from] BufferError),

    #[error("cannot save an image with {0} channels")]
    UnsupportedChannels(usize),

    #[error("image dimensions {rows}x{cols} are too large")]
    TooLarge { rows: usize, cols: usize },
}

/// Decode image bytes in any format the `image` crate understands.
pub fn load_pixel_buffer(bytes: &[u8]) -> Result<PixelBuffer, ImageIoError> {
    let img = image::load_from_memory(bytes)?;
    from_dynamic(img)
}

/// Read and decode an image file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, ImageIoError> {
    let bytes = std::fs::read(path)?;
    load_pixel_buffer(&bytes)
}

/// Turn a decoded image into a pixel buffer (rows = height, cols = width).
pub fn from_dynamic(img: DynamicImage) -> Result<PixelBuffer, ImageIoError> {
    let (width, height) = img.dimensions();
    let (rows, cols) = (height as usize, width as usize);

    let (channels, samples) = match img {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other => (4, other.to_rgba8().into_raw()),
    };

    Ok(PixelBuffer::from_raw(rows, cols, channels, samples)?)
}

/// Rebuild an `image` value from a pixel buffer.
pub fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage, ImageIoError> {
    let too_large = |_| ImageIoError::TooLarge {
        rows: buffer.rows(),
        cols: buffer.cols(),
    };
    let width = u32::try_from(buffer.cols()).map_err(too_large)?;
    let height = u32::try_from(buffer.rows()).map_err(too_large)?;
    let samples = buffer.as_raw().to_vec();
    let shape_err = || {
        ImageIoError::Buffer(BufferError::ShapeMismatch {
            rows: buffer.rows(),
            cols: buffer.cols(),
            channels: buffer.channels(),
            actual: buffer.as_raw().len(),
        })
    };

    let img = match buffer.channels() {
        1 => DynamicImage::ImageLuma8(
            ImageBuffer::from_raw(width, height, samples).ok_or_else(shape_err)?,
        ),
        2 => DynamicImage::ImageLumaA8(
            ImageBuffer::from_raw(width, height, samples).ok_or_else(shape_err)?,
        ),
        3 => DynamicImage::ImageRgb8(
            ImageBuffer::from_raw(width, height, samples).ok_or_else(shape_err)?,
        ),
        4 => DynamicImage::ImageRgba8(
            ImageBuffer::from_raw(width, height, samples).ok_or_else(shape_err)?,
        ),
        n => return Err(ImageIoError::UnsupportedChannels(n)),
    };

    Ok(img)
}

/// Encode the exact buffer contents as PNG bytes.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageIoError> {
    let img = to_dynamic(buffer)?;
    let mut output_bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)?;
    Ok(output_bytes)
}

/// Write the buffer to `path` as PNG, whatever the file extension says.
pub fn save_png_file<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> Result<(), ImageIoError> {
    let bytes = encode_png(buffer)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::steganography::{decode_text, encode};
    use image::{GrayImage, Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient_rgb(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 13) as u8, ((x + y) * 3) as u8])
        })
    }

    fn to_format(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), format).unwrap();
        out
    }

    #[test]
    fn test_load_keeps_rgb_layout() {
        let png = to_format(DynamicImage::ImageRgb8(gradient_rgb(5, 3)), ImageFormat::Png);
        let buffer = load_pixel_buffer(&png).unwrap();
        assert_eq!(buffer.rows(), 3);
        assert_eq!(buffer.cols(), 5);
        assert_eq!(buffer.channels(), 3);
        // pixel (x=1, y=2) lives at row 2, col 1
        let offset = (2 * 5 + 1) * 3;
        assert_eq!(&buffer.as_raw()[offset..offset + 3], &[7, 26, 9]);
    }

    #[test]
    fn test_png_roundtrip_preserves_hidden_token() {
        for img in [
            DynamicImage::ImageRgb8(gradient_rgb(16, 16)),
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 255]))),
            DynamicImage::ImageLuma8(GrayImage::from_fn(16, 16, |x, _| image::Luma([x as u8]))),
        ] {
            let mut buffer = from_dynamic(img).unwrap();
            encode(b"cashuAeyJ0b2tlbiI6W10", &mut buffer).unwrap();

            let png = encode_png(&buffer).unwrap();
            let reloaded = load_pixel_buffer(&png).unwrap();
            assert_eq!(reloaded, buffer);
            assert_eq!(decode_text(&reloaded).unwrap(), "cashuAeyJ0b2tlbiI6W10");
        }
    }

    #[test]
    fn test_jpeg_input_is_reemitted_as_png() {
        let jpeg = to_format(DynamicImage::ImageRgb8(gradient_rgb(32, 32)), ImageFormat::Jpeg);
        let mut buffer = load_pixel_buffer(&jpeg).unwrap();
        encode(b"hello123", &mut buffer).unwrap();

        let png = encode_png(&buffer).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        assert_eq!(decode_text(&load_pixel_buffer(&png).unwrap()).unwrap(), "hello123");
    }

    #[test]
    fn test_sixteen_bit_images_are_coerced_to_rgba8() {
        let img = DynamicImage::ImageRgb16(image::ImageBuffer::from_pixel(
            4,
            4,
            Rgb([1000u16, 2000, 3000]),
        ));
        let buffer = from_dynamic(img).unwrap();
        assert_eq!(buffer.channels(), 4);
        assert_eq!(buffer.capacity_bits(), 64);
    }

    #[test]
    fn test_garbage_bytes_fail_to_load() {
        assert!(matches!(
            load_pixel_buffer(b"definitely not an image"),
            Err(ImageIoError::Image(_))
        ));
    }

    #[test]
    fn test_unsupported_channel_count() {
        let buffer = PixelBuffer::new(2, 2, 5).unwrap();
        assert!(matches!(
            encode_png(&buffer),
            Err(ImageIoError::UnsupportedChannels(5))
        ));
    }

    #[test]
    fn test_file_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut buffer = from_dynamic(DynamicImage::ImageRgb8(gradient_rgb(8, 8))).unwrap();
        encode(b"on disk", &mut buffer).unwrap();
        save_png_file(&path, &buffer).unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(decode_text(&loaded).unwrap(), "on disk");
        assert!(matches!(
            load_file(dir.path().join("missing.png")),
            Err(ImageIoError::Io(_))
        ));
    }
}
