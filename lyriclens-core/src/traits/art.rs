//! Album art source

use alloc::vec::Vec;
use core::fmt;

/// Channel layout of a decoded art raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 3 bytes per pixel
    Rgb,
    /// 4 bytes per pixel, straight alpha
    Rgba,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Errors that can occur when loading album art
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArtError {
    /// Source could not be fetched
    Unreachable,
    /// Source was fetched but could not be decoded
    Corrupt,
    /// Raster dimensions do not match its data
    InvalidRaster,
}

impl fmt::Display for ArtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtError::Unreachable => write!(f, "album art unreachable"),
            ArtError::Corrupt => write!(f, "album art could not be decoded"),
            ArtError::InvalidRaster => write!(f, "album art raster size mismatch"),
        }
    }
}

/// Decoded colour raster handed over by an [`ArtLoader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtRaster {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl ArtRaster {
    /// Wrap decoded pixel data, checking that its length matches the dimensions
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self, ArtError> {
        if width == 0 || height == 0 {
            return Err(ArtError::InvalidRaster);
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
            .ok_or(ArtError::InvalidRaster)?;
        if data.len() != expected {
            return Err(ArtError::InvalidRaster);
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Row-major pixel data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Channels of the pixel at `(x, y)`; alpha is 255 for RGB rasters
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let bpp = self.format.bytes_per_pixel();
        let i = (y as usize * self.width as usize + x as usize) * bpp;
        match self.data.get(i..i + bpp) {
            Some(&[r, g, b]) => [r, g, b, 255],
            Some(&[r, g, b, a]) => [r, g, b, a],
            _ => [0, 0, 0, 0],
        }
    }
}

/// Trait for fetching and decoding album art
///
/// `source` is an opaque identifier, usually a URL. The pipeline never
/// retries; a failed load just renders the frame without art.
pub trait ArtLoader {
    fn load(&mut self, source: &str) -> Result<ArtRaster, ArtError>;
}

impl<F> ArtLoader for F
where
    F: FnMut(&str) -> Result<ArtRaster, ArtError>,
{
    fn load(&mut self, source: &str) -> Result<ArtRaster, ArtError> {
        self(source)
    }
}
