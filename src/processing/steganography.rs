//! # LSB Bitstream Codec
//!
//! Hides an opaque byte payload in the least significant bits of a
//! [`PixelBuffer`] and recovers it again.
//!
//! ## Bitstream Layout
//!
//! ```text
//! [32 bits: payload length in BITS, big-endian] [payload bits, MSB of byte 0 first]
//! ```
//!
//! Bit `i` of the stream is stored in the LSB of the sample at
//! [`Shape::address_of`]`(i)`. The upper 7 bits of every sample are preserved.
//!
//! ### Encoding Process
//! 1. Check `32 + 8 * len <= rows * cols * channels` before touching anything
//! 2. Write the 32-bit length prefix, then the payload bits
//! 3. For each bit: clear the sample's LSB and OR in the bit
//!
//! ### Decoding Process
//! 1. Read the 32-bit length prefix
//! 2. Reject a prefix that claims more bits than the buffer holds
//! 3. Read exactly that many payload bits and pack them MSB first
//!
//! ### Capacity
//! A buffer stores `(rows * cols * channels - 32) / 8` payload bytes.
//! Example: an 800x600 RGB image holds ~180 KB.

use super::error::{CapacityError, FormatError, StegoError, TextDecodeError};
use super::pixels::{BitAddress, PixelBuffer, Shape};
use super::trace::{NoTrace, Trace, TraceEvent};

/// Width of the length prefix at the start of every bitstream.
pub const LENGTH_PREFIX_BITS: u64 = 32;

/// Longest bitstream representable with a 32-bit length prefix.
const MAX_STREAM_BITS: u64 = LENGTH_PREFIX_BITS + u32::MAX as u64;

/// Bits needed to hide a payload of `payload_len` bytes, prefix included.
pub fn required_bits(payload_len: usize) -> u64 {
    (payload_len as u64)
        .saturating_mul(8)
        .saturating_add(LENGTH_PREFIX_BITS)
}

/// The capacity check `encode` performs, usable before any image work is done.
///
/// # Errors
/// [`CapacityError`] when the payload plus prefix does not fit `shape`, or
/// when the payload's bit length does not fit the 32-bit prefix.
pub fn check_capacity(shape: Shape, payload_len: usize) -> Result<(), CapacityError> {
    let needed = required_bits(payload_len);
    let available = shape.capacity_bits();
    if needed > available || needed > MAX_STREAM_BITS {
        return Err(CapacityError { needed, available });
    }
    Ok(())
}

/// Largest payload in bytes that fits `shape`.
pub fn max_payload_bytes(shape: Shape) -> u64 {
    shape
        .capacity_bits()
        .min(MAX_STREAM_BITS)
        .saturating_sub(LENGTH_PREFIX_BITS)
        / 8
}

/// Hide `payload` in the LSBs of `buffer`.
///
/// On error the buffer is left exactly as it was.
///
/// # Example
/// ```
/// use token_steg::processing::{decode, encode, PixelBuffer};
///
/// let mut buffer = PixelBuffer::new(4, 8, 3).unwrap();
/// encode(b"hello123", &mut buffer).unwrap();
/// assert_eq!(decode(&buffer).unwrap(), b"hello123");
/// ```
pub fn encode(payload: &[u8], buffer: &mut PixelBuffer) -> Result<(), CapacityError> {
    encode_traced(payload, buffer, &mut NoTrace)
}

/// [`encode`] with a trace hook attached.
pub fn encode_traced<T: Trace + ?Sized>(
    payload: &[u8],
    buffer: &mut PixelBuffer,
    trace: &mut T,
) -> Result<(), CapacityError> {
    let needed = required_bits(payload.len());
    trace.event(&TraceEvent::CapacityChecked {
        needed,
        available: buffer.capacity_bits(),
    });
    check_capacity(buffer.shape(), payload.len())?;

    let payload_bits = needed - LENGTH_PREFIX_BITS;
    let prefix = (payload_bits as u32).to_be_bytes();
    trace.event(&TraceEvent::LengthPrefix { payload_bits });

    let overflow = CapacityError {
        needed,
        available: buffer.capacity_bits(),
    };

    for index in 0..needed {
        let bit = if index < LENGTH_PREFIX_BITS {
            bit_at(&prefix, index)
        } else {
            bit_at(payload, index - LENGTH_PREFIX_BITS)
        };

        let address = buffer.address_of(index).map_err(|_| overflow)?;
        let sample = buffer.get_mut(address).ok_or(overflow)?;
        *sample = (*sample & 0xFE) | bit;

        trace.event(&TraceEvent::BitWritten {
            index,
            address,
            bit,
        });
    }

    Ok(())
}

/// Recover the payload hidden by [`encode`].
///
/// The length prefix is untrusted: it is bounds-checked against the buffer
/// before any payload bit is read. Reading stops right after the payload.
pub fn decode(buffer: &PixelBuffer) -> Result<Vec<u8>, FormatError> {
    decode_traced(buffer, &mut NoTrace)
}

/// [`decode`] with a trace hook attached.
pub fn decode_traced<T: Trace + ?Sized>(
    buffer: &PixelBuffer,
    trace: &mut T,
) -> Result<Vec<u8>, FormatError> {
    let available = buffer.capacity_bits();
    if available < LENGTH_PREFIX_BITS {
        return Err(FormatError::BufferTooSmall { available });
    }

    // Phase 1: length prefix
    let mut payload_bits: u64 = 0;
    for index in 0..LENGTH_PREFIX_BITS {
        let bit = read_bit(buffer, index, trace)
            .ok_or(FormatError::BufferTooSmall { available })?;
        payload_bits = (payload_bits << 1) | u64::from(bit);
    }
    trace.event(&TraceEvent::LengthPrefix { payload_bits });

    let too_long = FormatError::LengthExceedsCapacity {
        declared_bits: payload_bits,
        available,
    };
    if LENGTH_PREFIX_BITS + payload_bits > available {
        return Err(too_long);
    }

    // Phase 2: payload, a trailing partial byte stays zero-padded
    let mut bytes = vec![0u8; payload_bits.div_ceil(8) as usize];
    for offset in 0..payload_bits {
        let bit = read_bit(buffer, LENGTH_PREFIX_BITS + offset, trace).ok_or(too_long)?;
        bytes[(offset / 8) as usize] |= bit << (7 - offset % 8);
    }

    Ok(bytes)
}

/// Decode the payload and interpret it as UTF-8.
///
/// Invalid UTF-8 is reported as [`TextDecodeError`]; nothing is replaced or dropped.
pub fn decode_text(buffer: &PixelBuffer) -> Result<String, StegoError> {
    let bytes = decode(buffer)?;
    let text = String::from_utf8(bytes).map_err(TextDecodeError::from)?;
    Ok(text)
}

#[inline]
fn bit_at(bytes: &[u8], index: u64) -> u8 {
    (bytes[(index / 8) as usize] >> (7 - index % 8)) & 1
}

fn read_bit<T: Trace + ?Sized>(buffer: &PixelBuffer, index: u64, trace: &mut T) -> Option<u8> {
    let address: BitAddress = buffer.address_of(index).ok()?;
    let bit = buffer.get(address)? & 1;
    trace.event(&TraceEvent::BitRead {
        index,
        address,
        bit,
    });
    Some(bit)
}
