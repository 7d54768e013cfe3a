//! Grayscale pixel buffer
//!
//! One byte per pixel, row-major, top-to-bottom. The buffer is an
//! `embedded-graphics` draw target so text and primitives from that crate
//! render straight into it.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::{Gray8, GrayColor},
    prelude::*,
    primitives::Rectangle,
};
use lyriclens_core::ConfigError;

/// Axis-aligned rectangle in frame coordinates
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn to_rect(self) -> Rectangle {
        Rectangle::new(self.top_left(), Size::new(self.w, self.h))
    }

    pub fn top_left(self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }

    pub fn right(self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.h)
    }

    pub fn contains(self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two regions; empty (zero-size) when disjoint
    pub fn intersect(self, other: Region) -> Region {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Region {
            x,
            y,
            w: right.saturating_sub(x),
            h: bottom.saturating_sub(y),
        }
    }

    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// W x H grid of 8-bit luma samples
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl core::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Allocate a buffer filled with `background`
    pub fn new(width: u32, height: u32, background: u8) -> Result<Self, ConfigError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n > 0)
            .ok_or(ConfigError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            data: vec![background; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whole-frame region
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    /// Row-major samples; `len == width * height`
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.data
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Set one sample; out-of-frame writes are dropped
    pub fn set(&mut self, x: u32, y: u32, luma: u8) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = luma;
        }
    }

    /// Fill a region, clipped to the frame
    pub fn fill_region(&mut self, region: Region, luma: u8) {
        let r = region.intersect(self.bounds());
        if r.is_empty() {
            return;
        }
        let stride = self.width as usize;
        for y in r.y..r.bottom() {
            let start = y as usize * stride + r.x as usize;
            self.data[start..start + r.w as usize].fill(luma);
        }
    }

    /// One-pixel horizontal rule from `x0` to `x1` (exclusive)
    pub fn hline(&mut self, x0: u32, x1: u32, y: u32, luma: u8) {
        self.fill_region(Region::new(x0, y, x1.saturating_sub(x0), 1), luma);
    }

    /// Copy a `w`-wide block of samples with its top-left corner at `(x, y)`
    pub fn blit(&mut self, x: u32, y: u32, w: u32, samples: &[u8]) {
        if w == 0 {
            return;
        }
        for (row, line) in samples.chunks(w as usize).enumerate() {
            for (col, &luma) in line.iter().enumerate() {
                self.set(x.saturating_add(col as u32), y.saturating_add(row as u32), luma);
            }
        }
    }

    /// True if every sample inside `region` equals `luma`
    pub fn region_is(&self, region: Region, luma: u8) -> bool {
        let r = region.intersect(self.bounds());
        (r.y..r.bottom()).all(|y| (r.x..r.right()).all(|x| self.get(x, y) == Some(luma)))
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelBuffer {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 {
                continue;
            }
            self.set(coord.x as u32, coord.y as u32, color.luma());
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if let Some(bottom_right) = area.bottom_right() {
            let region = Region::new(
                area.top_left.x as u32,
                area.top_left.y as u32,
                (bottom_right.x - area.top_left.x + 1) as u32,
                (bottom_right.y - area.top_left.y + 1) as u32,
            );
            self.fill_region(region, color.luma());
        }
        Ok(())
    }
}
