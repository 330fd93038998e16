//! # File Based Commands
//!
//! What the `steg` binary does once its arguments are parsed:
//! - Hide a token in an image file and write the result as PNG
//! - Verify the written file by reading the token back
//! - Reveal a token from an image file
//! - Report an image's capacity

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use std::path::{Path, PathBuf};

use crate::processing::image_io;
use crate::processing::{
    check_capacity, decode_traced, encode_traced, max_payload_bytes, LogTrace, NoTrace, Shape,
    TextDecodeError, Trace,
};

/// Outcome of a hide command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HideSummary {
    pub output: PathBuf,
    pub payload_bytes: usize,
    pub capacity_bits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacitySummary {
    pub shape: Shape,
    pub capacity_bits: u64,
    pub max_payload_bytes: u64,
    pub fits: Option<bool>,
}

/// Where a hidden image goes when no output is given: next to the input, as `.png`.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("png")
}

fn tracer(verbose: bool) -> Box<dyn Trace> {
    if verbose {
        Box::new(LogTrace)
    } else {
        Box::new(NoTrace)
    }
}

/// Hide `token` in the image at `input`, write the PNG to `output`, then read
/// it back and check the token survived.
///
/// # Errors
/// - The input cannot be read or decoded
/// - The token does not fit (nothing is written in that case)
/// - The written file does not yield the same token (the file is removed)
pub fn hide_file(input: &Path, token: &str, output: &Path, verbose: bool) -> Result<HideSummary> {
    let mut buffer = image_io::load_file(input)
        .with_context(|| format!("failed to load image {}", input.display()))?;

    encode_traced(token.as_bytes(), &mut buffer, &mut *tracer(verbose))?;
    image_io::save_png_file(output, &buffer)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "✅ Hid {} bytes in {} ({} bits available)",
        token.len(),
        output.display(),
        buffer.capacity_bits()
    );

    verify_written(output, token)?;

    Ok(HideSummary {
        output: output.to_path_buf(),
        payload_bytes: token.len(),
        capacity_bits: buffer.capacity_bits(),
    })
}

/// Extract the token from a freshly written file and compare it to `token`.
/// A file that does not match is deleted so no corrupt carrier is left behind.
fn verify_written(output: &Path, token: &str) -> Result<()> {
    let verified = reveal_file(output, false).and_then(|extracted| {
        if extracted == token {
            Ok(())
        } else {
            Err(anyhow!("verification failed: token mismatch"))
        }
    });

    match verified {
        Ok(()) => {
            info!("✅ Verified {}", output.display());
            Ok(())
        }
        Err(e) => {
            error!("❌ Verification MISMATCH for {}", output.display());
            if let Err(remove_err) = std::fs::remove_file(output) {
                error!("Failed to remove {}: {}", output.display(), remove_err);
            }
            Err(e)
        }
    }
}

/// Read the token hidden in the image at `input`.
pub fn reveal_file(input: &Path, verbose: bool) -> Result<String> {
    let buffer = image_io::load_file(input)
        .with_context(|| format!("failed to load image {}", input.display()))?;
    let bytes = decode_traced(&buffer, &mut *tracer(verbose))?;
    let token = String::from_utf8(bytes).map_err(TextDecodeError::from)?;
    Ok(token)
}

pub fn capacity_of_file(input: &Path, token: Option<&str>) -> Result<CapacitySummary> {
    let buffer = image_io::load_file(input)
        .with_context(|| format!("failed to load image {}", input.display()))?;
    let shape = buffer.shape();
    Ok(CapacitySummary {
        shape,
        capacity_bits: shape.capacity_bits(),
        max_payload_bytes: max_payload_bytes(shape),
        fits: token.map(|t| check_capacity(shape, t.len()).is_ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{CapacityError, FormatError};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
        let path = dir.join(name);
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 5) as u8, (y * 3) as u8, 77]));
        DynamicImage::ImageRgb8(img)
            .save_with_format(&path, format)
            .unwrap();
        path
    }

    #[test]
    fn test_hide_and_reveal_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_image(dir.path(), "elephant.png", 16, 16, ImageFormat::Png);
        let output = dir.path().join("hidden.png");

        let summary = hide_file(&input, "hello123", &output, false).unwrap();
        assert_eq!(summary.payload_bytes, 8);
        assert_eq!(summary.capacity_bits, 768);
        assert_eq!(reveal_file(&output, true).unwrap(), "hello123");
    }

    #[test]
    fn test_jpeg_input_written_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_image(dir.path(), "fruit.jpg", 16, 16, ImageFormat::Jpeg);
        let output = default_output(&input);
        assert_eq!(output, dir.path().join("fruit.png"));

        hide_file(&input, "cashuA", &output, false).unwrap();
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_hide_too_large_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_image(dir.path(), "tiny.png", 22, 1, ImageFormat::Png);
        let output = dir.path().join("out.png");

        let err = hide_file(&input, "hello123", &output, false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CapacityError>(),
            Some(&CapacityError {
                needed: 96,
                available: 66
            })
        );
        assert!(!output.exists());
    }

    #[test]
    fn test_verification_mismatch_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_image(dir.path(), "carrier.png", 16, 16, ImageFormat::Png);
        let output = dir.path().join("hidden.png");

        hide_file(&input, "cashuA", &output, false).unwrap();
        assert!(verify_written(&output, "cashuA").is_ok());
        assert!(output.exists());

        let err = verify_written(&output, "cashuB").unwrap_err();
        assert!(err.to_string().contains("token mismatch"));
        assert!(!output.exists());
    }

    #[test]
    fn test_unreadable_output_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let output = write_image(dir.path(), "plain.png", 2, 2, ImageFormat::Png);

        assert!(verify_written(&output, "cashuA").is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_reveal_small_image_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_image(dir.path(), "small.png", 2, 2, ImageFormat::Png);
        let err = reveal_file(&input, false).unwrap_err();
        assert!(err.downcast_ref::<FormatError>().is_some());
    }

    #[test]
    fn test_capacity_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_image(dir.path(), "cap.png", 8, 4, ImageFormat::Png);

        let summary = capacity_of_file(&input, Some("hello123")).unwrap();
        assert_eq!(summary.shape, Shape::new(4, 8, 3));
        assert_eq!(summary.capacity_bits, 96);
        assert_eq!(summary.max_payload_bytes, 8);
        assert_eq!(summary.fits, Some(true));
    }
}
