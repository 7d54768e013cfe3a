//! Text rasterization interface

use embedded_graphics::prelude::Point;
use lyriclens_core::FontSpec;

use crate::canvas::{PixelBuffer, Region};

/// Trait for measuring and drawing text
///
/// Implementations decide what a font size maps to. The compositor only
/// relies on `measure` agreeing with what `draw` puts on the canvas.
pub trait TextRenderer {
    /// Advance width of `text` in pixels
    fn measure(&self, text: &str, font: FontSpec) -> u32;

    /// Draw `text` with its top-left corner at `origin`
    ///
    /// Nothing may be drawn outside `clip`.
    fn draw(
        &self,
        canvas: &mut PixelBuffer,
        text: &str,
        font: FontSpec,
        origin: Point,
        luma: u8,
        clip: Region,
    );
}

impl<T: TextRenderer + ?Sized> TextRenderer for &T {
    fn measure(&self, text: &str, font: FontSpec) -> u32 {
        (**self).measure(text, font)
    }

    fn draw(
        &self,
        canvas: &mut PixelBuffer,
        text: &str,
        font: FontSpec,
        origin: Point,
        luma: u8,
        clip: Region,
    ) {
        (**self).draw(canvas, text, font, origin, luma, clip)
    }
}
