//! Grayscale PNG encoding
//!
//! `encode` is the one-shot entry point. `GrayscaleEncoder` keeps its scanline
//! and output buffers between calls.

use alloc::vec::Vec;
use core::fmt;

use log::trace;

use crate::chunk::{
    write_chunk, ChunkType, Ihdr, CHUNK_OVERHEAD, FILTER_NONE, IHDR_LEN, PNG_SIGNATURE,
};
use crate::deflate::{write_zlib_stored, zlib_stored_len};

/// Largest image dimension PNG allows (2^31 - 1)
pub const MAX_DIMENSION: u32 = 0x7FFF_FFFF;

/// Errors rejected before any output is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Width or height is zero or above the PNG limit
    InvalidDimensions { width: u32, height: u32 },
    /// Pixel buffer length does not equal `width * height`
    LengthMismatch { expected: usize, actual: usize },
    /// Image data would not fit in a single IDAT chunk
    TooLarge,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::InvalidDimensions { width, height } => {
                write!(f, "invalid image dimensions {}x{}", width, height)
            }
            EncodeError::LengthMismatch { expected, actual } => {
                write!(f, "pixel buffer holds {} bytes, expected {}", actual, expected)
            }
            EncodeError::TooLarge => write!(f, "image data exceeds a single IDAT chunk"),
        }
    }
}

/// Validate inputs and return the raw scanline stream length
fn validate(width: u32, height: u32, pixels: &[u8]) -> Result<usize, EncodeError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or(EncodeError::TooLarge)?;
    if pixels.len() != expected {
        return Err(EncodeError::LengthMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let raw_len = (width as usize + 1)
        .checked_mul(height as usize)
        .ok_or(EncodeError::TooLarge)?;
    if zlib_stored_len(raw_len) > u32::MAX as usize {
        return Err(EncodeError::TooLarge);
    }

    Ok(raw_len)
}

/// Prefix every row of `pixels` with filter byte 0
fn write_scanlines(raw: &mut Vec<u8>, width: usize, pixels: &[u8]) {
    for row in pixels.chunks_exact(width) {
        raw.push(FILTER_NONE);
        raw.extend_from_slice(row);
    }
}

/// Reusable encoder for a stream of same-sized frames
#[derive(Debug, Default)]
pub struct GrayscaleEncoder {
    raw_buf: Vec<u8>,
    idat_buf: Vec<u8>,
    png_buf: Vec<u8>,
}

impl GrayscaleEncoder {
    /// Create an encoder with empty buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `pixels` and return the PNG bytes
    ///
    /// The returned slice borrows the encoder's output buffer and is valid
    /// until the next call. On error the buffer is left untouched.
    pub fn encode(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<&[u8], EncodeError> {
        let raw_len = validate(width, height, pixels)?;

        self.raw_buf.clear();
        self.raw_buf.reserve(raw_len);
        write_scanlines(&mut self.raw_buf, width as usize, pixels);

        self.idat_buf.clear();
        write_zlib_stored(&mut self.idat_buf, &self.raw_buf);

        let total = PNG_SIGNATURE.len() + CHUNK_OVERHEAD * 3 + IHDR_LEN + self.idat_buf.len();

        self.png_buf.clear();
        self.png_buf.reserve(total);
        self.png_buf.extend_from_slice(&PNG_SIGNATURE);
        write_chunk(
            &mut self.png_buf,
            ChunkType::Ihdr,
            &Ihdr::grayscale(width, height).to_bytes(),
        );
        write_chunk(&mut self.png_buf, ChunkType::Idat, &self.idat_buf);
        write_chunk(&mut self.png_buf, ChunkType::Iend, &[]);

        trace!(
            "encoded {}x{} grayscale frame into {} bytes",
            width,
            height,
            self.png_buf.len()
        );

        Ok(&self.png_buf)
    }
}

/// Encode an 8-bit grayscale raster as a PNG file
pub fn encode(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = GrayscaleEncoder::new();
    encoder.encode(width, height, pixels).map(|png| png.to_vec())
}
