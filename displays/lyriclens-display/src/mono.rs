//! Monospace text renderer on the `embedded-graphics` ASCII fonts

use alloc::borrow::Cow;
use alloc::string::String;

use embedded_graphics::{
    mono_font::{ascii, MonoFont, MonoTextStyle},
    pixelcolor::Gray8,
    prelude::*,
    text::{Baseline, Text},
};
use lyriclens_core::FontSpec;

use crate::canvas::{PixelBuffer, Region};
use crate::text::TextRenderer;

/// Renders text with the built-in mono fonts, picking the tallest font
/// that is no taller than the requested size (smallest font as the floor)
///
/// Text is always drawn on one line: control characters such as `'\n'`
/// take one blank cell each, the same as `measure` counts them.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonoTextRenderer;

impl MonoTextRenderer {
    pub const fn new() -> Self {
        Self
    }

    /// Font used for a requested size and weight
    pub fn font_for(spec: FontSpec) -> &'static MonoFont<'static> {
        match (spec.size_px, spec.bold) {
            (0..=6, _) => &ascii::FONT_4X6,
            (7, _) => &ascii::FONT_5X7,
            (8, _) => &ascii::FONT_5X8,
            (9, _) => &ascii::FONT_6X9,
            (10..=11, _) => &ascii::FONT_6X10,
            (12, _) => &ascii::FONT_6X12,
            (13, false) => &ascii::FONT_7X13,
            (13, true) => &ascii::FONT_7X13_BOLD,
            (14, false) => &ascii::FONT_7X14,
            (14, true) => &ascii::FONT_7X14_BOLD,
            (15..=17, false) => &ascii::FONT_9X15,
            (15..=17, true) => &ascii::FONT_9X15_BOLD,
            (18..=19, false) => &ascii::FONT_9X18,
            (18..=19, true) => &ascii::FONT_9X18_BOLD,
            _ => &ascii::FONT_10X20,
        }
    }
}

impl TextRenderer for MonoTextRenderer {
    fn measure(&self, text: &str, font: FontSpec) -> u32 {
        let font = Self::font_for(font);
        let glyphs = text.chars().count() as u32;
        if glyphs == 0 {
            return 0;
        }
        glyphs
            .saturating_mul(font.character_size.width)
            .saturating_add((glyphs - 1).saturating_mul(font.character_spacing))
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
        let style = MonoTextStyle::new(Self::font_for(font), Gray8::new(luma));
        let mut clipped = canvas.clipped(&clip.to_rect());
        // PixelBuffer's draw error is Infallible
        let _ = Text::with_baseline(&single_line(text), origin, style, Baseline::Top).draw(&mut clipped);
    }
}

fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(char::is_control) {
        let line: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        Cow::Owned(line)
    } else {
        Cow::Borrowed(text)
    }
}
