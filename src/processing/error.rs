//! # Codec Error Types
//!
//! Every failure mode of the bitstream codec has its own type so that each
//! operation's signature states exactly what it can fail with:
//!
//! - [`CapacityError`]: returned by `encode` (never by `decode`)
//! - [`FormatError`]: returned by `decode` (never by `encode`)
//! - [`AddressError`]: a bit index outside the buffer
//! - [`BufferError`]: a pixel buffer constructed with an inconsistent shape
//! - [`TextDecodeError`]: decoded bytes that are not valid UTF-8
//!
//! [`StegoError`] aggregates the errors the codec operations return, for the
//! transport layers.

use std::string::FromUtf8Error;
use thiserror::Error;

/// The payload plus its 32-bit length prefix does not fit the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("image too small to hide token: need {needed} bits but only {available} bits are available")]
pub struct CapacityError {
    /// Bits required: `32 + 8 * payload_len`
    pub needed: u64,
    /// Bits the buffer can hold: `rows * cols * channels`
    pub available: u64,
}

/// The buffer does not carry a trustworthy hidden payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("buffer too small for length prefix")]
    BufferTooSmall { available: u64 },

    #[error("declared length exceeds buffer capacity")]
    LengthExceedsCapacity { declared_bits: u64, available: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bit index {index} out of range for capacity {capacity}")]
pub struct AddressError {
    pub index: u64,
    pub capacity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("pixel buffer needs at least one channel")]
    NoChannels,

    #[error("sample count {actual} does not match {rows}x{cols}x{channels}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        channels: usize,
        actual: usize,
    },

    #[error("buffer dimensions overflow")]
    TooLarge,
}

/// The recovered payload is not valid UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hidden payload is not valid UTF-8: {0}")]
pub struct TextDecodeError(#[source] pub FromUtf8Error);

impl From<FromUtf8Error> for TextDecodeError {
    fn from(e: FromUtf8Error) -> Self {
        Self(e)
    }
}

impl TextDecodeError {
    /// Raw bytes that failed to decode, returned untouched.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StegoError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    TextDecode(#[from] TextDecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message_names_both_sizes() {
        let err = CapacityError {
            needed: 96,
            available: 66,
        };
        let msg = err.to_string();
        assert!(msg.contains("96"));
        assert!(msg.contains("66"));
    }

    #[test]
    fn test_format_messages() {
        assert_eq!(
            FormatError::BufferTooSmall { available: 3 }.to_string(),
            "buffer too small for length prefix"
        );
        assert_eq!(
            FormatError::LengthExceedsCapacity {
                declared_bits: 1000,
                available: 40
            }
            .to_string(),
            "declared length exceeds buffer capacity"
        );
    }

    #[test]
    fn test_text_decode_error_keeps_bytes() {
        let utf8_err = String::from_utf8(vec![0xFF, 0x41]).unwrap_err();
        let err = TextDecodeError::from(utf8_err);
        assert_eq!(err.into_bytes(), vec![0xFF, 0x41]);
    }

    #[test]
    fn test_stego_error_is_transparent() {
        let err: StegoError = CapacityError {
            needed: 40,
            available: 32,
        }
        .into();
        assert!(matches!(err, StegoError::Capacity(_)));
        assert!(err.to_string().contains("need 40 bits"));
    }

    #[test]
    fn test_stego_error_wraps_decode_failures() {
        let err: StegoError = FormatError::BufferTooSmall { available: 3 }.into();
        assert!(matches!(err, StegoError::Format(_)));
        assert_eq!(err.to_string(), "buffer too small for length prefix");

        let utf8_err = String::from_utf8(vec![0xC3]).unwrap_err();
        let err: StegoError = TextDecodeError::from(utf8_err).into();
        assert!(matches!(err, StegoError::TextDecode(_)));
        assert!(err.to_string().starts_with("hidden payload is not valid UTF-8"));
    }
}
