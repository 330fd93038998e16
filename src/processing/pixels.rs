//! # Pixel Buffer and Bit Addressing
//!
//! The codec sees an image only as a [`PixelBuffer`]: a `rows x cols x channels`
//! array of 8-bit samples. Bits of the hidden stream are assigned to samples in
//! a fixed traversal order:
//!
//! ```text
//! row 0: (0,0,c0) (0,0,c1) .. (0,1,c0) (0,1,c1) .. (0,cols-1,cN)
//! row 1: (1,0,c0) ..
//! ```
//!
//! i.e. row-major, then column, then channel (outer to inner). This order is the
//! only structural contract of the hidden bitstream; there is no marker that
//! describes it, so encoder and decoder must agree on it exactly.

use super::error::{AddressError, BufferError};

/// Dimensions of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
}

/// Coordinates of one sample: where a single bit of the stream lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitAddress {
    pub row: usize,
    pub col: usize,
    pub channel: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize, channels: usize) -> Self {
        Self {
            rows,
            cols,
            channels,
        }
    }

    /// Number of LSB slots: `rows * cols * channels`.
    pub fn capacity_bits(&self) -> u64 {
        self.rows as u64 * self.cols as u64 * self.channels as u64
    }

    /// Map a bit index of the stream to the sample holding it.
    ///
    /// # Errors
    /// [`AddressError`] when `bit_index >= capacity_bits()`.
    pub fn address_of(&self, bit_index: u64) -> Result<BitAddress, AddressError> {
        let capacity = self.capacity_bits();
        if bit_index >= capacity {
            return Err(AddressError {
                index: bit_index,
                capacity,
            });
        }

        // capacity > 0 here, so channels and cols are both non-zero
        let channels = self.channels as u64;
        let cols = self.cols as u64;

        Ok(BitAddress {
            row: (bit_index / (channels * cols)) as usize,
            col: ((bit_index / channels) % cols) as usize,
            channel: (bit_index % channels) as usize,
        })
    }

    fn offset_of(&self, address: BitAddress) -> usize {
        (address.row * self.cols + address.col) * self.channels + address.channel
    }
}

/// An in-memory decoded image: 8-bit samples indexed by `(row, col, channel)`.
///
/// Samples are stored contiguously in traversal order. The buffer accepts any
/// channel count >= 1 (greyscale, RGB, RGBA, ...); every channel present is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    shape: Shape,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer.
    pub fn new(rows: usize, cols: usize, channels: usize) -> Result<Self, BufferError> {
        let len = Self::checked_len(rows, cols, channels)?;
        Ok(Self {
            shape: Shape::new(rows, cols, channels),
            samples: vec![0; len],
        })
    }

    /// Wrap existing samples laid out row, then column, then channel.
    ///
    /// # Errors
    /// - [`BufferError::NoChannels`] if `channels == 0`
    /// - [`BufferError::ShapeMismatch`] if `samples.len() != rows * cols * channels`
    pub fn from_raw(
        rows: usize,
        cols: usize,
        channels: usize,
        samples: Vec<u8>,
    ) -> Result<Self, BufferError> {
        let len = Self::checked_len(rows, cols, channels)?;
        if samples.len() != len {
            return Err(BufferError::ShapeMismatch {
                rows,
                cols,
                channels,
                actual: samples.len(),
            });
        }
        Ok(Self {
            shape: Shape::new(rows, cols, channels),
            samples,
        })
    }

    fn checked_len(rows: usize, cols: usize, channels: usize) -> Result<usize, BufferError> {
        if channels == 0 {
            return Err(BufferError::NoChannels);
        }
        rows.checked_mul(cols)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(BufferError::TooLarge)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    pub fn capacity_bits(&self) -> u64 {
        self.shape.capacity_bits()
    }

    pub fn address_of(&self, bit_index: u64) -> Result<BitAddress, AddressError> {
        self.shape.address_of(bit_index)
    }

    /// Sample at `address`, or `None` if it lies outside the buffer.
    pub fn get(&self, address: BitAddress) -> Option<u8> {
        if !self.contains(address) {
            return None;
        }
        self.samples.get(self.shape.offset_of(address)).copied()
    }

    pub fn get_mut(&mut self, address: BitAddress) -> Option<&mut u8> {
        if !self.contains(address) {
            return None;
        }
        let offset = self.shape.offset_of(address);
        self.samples.get_mut(offset)
    }

    fn contains(&self, address: BitAddress) -> bool {
        address.row < self.shape.rows
            && address.col < self.shape.cols
            && address.channel < self.shape.channels
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.samples
    }
}
