//! # Token Steganography Core
//!
//! Hides a token in the least significant bits of an image's samples and
//! recovers it again.
//!
//! - [`pixels`]: the in-memory pixel buffer and its bit addressing order
//! - [`steganography`]: the length-prefixed bitstream codec
//! - [`trace`]: optional hook for observing the codec
//! - [`image_io`]: conversion between image files and pixel buffers
//! - [`error`]: codec error types

pub mod error;
pub mod image_io;
pub mod pixels;
pub mod steganography;
pub mod trace;

// Re-export main items for convenience
pub use error::{
    AddressError, BufferError, CapacityError, FormatError, StegoError, TextDecodeError,
};
pub use pixels::{BitAddress, PixelBuffer, Shape};
pub use steganography::{
    check_capacity, decode, decode_text, decode_traced, encode, encode_traced, max_payload_bytes,
    required_bits, LENGTH_PREFIX_BITS,
};
pub use trace::{LogTrace, NoTrace, RecordingTrace, Trace, TraceEvent};
