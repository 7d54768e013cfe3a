//! Layout, palette and font configuration
//!
//! All coordinates are in pixels from the top-left corner of the frame.
//! Defaults reproduce the reference glasses layout.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of container names and splash strings
pub const MAX_NAME_LEN: usize = 32;

/// Font request passed to the text renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontSpec {
    /// Nominal pixel size (line height)
    pub size_px: u8,
    /// Bold weight
    #[cfg_attr(feature = "serde", serde(default))]
    pub bold: bool,
}

impl FontSpec {
    /// Regular-weight font of the given size
    pub const fn regular(size_px: u8) -> Self {
        Self {
            size_px,
            bold: false,
        }
    }

    /// Bold font of the given size
    pub const fn bold(size_px: u8) -> Self {
        Self {
            size_px,
            bold: true,
        }
    }
}

/// Font assignment per frame element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontConfig {
    pub track: FontSpec,
    pub artist: FontSpec,
    pub time: FontSpec,
    /// Previous and next lyric lines
    pub lyric_dim: FontSpec,
    pub lyric_current: FontSpec,
    pub splash_title: FontSpec,
    pub splash_subtitle: FontSpec,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            track: FontSpec::bold(18),
            artist: FontSpec::regular(14),
            time: FontSpec::regular(11),
            lyric_dim: FontSpec::regular(16),
            lyric_current: FontSpec::bold(24),
            splash_title: FontSpec::bold(24),
            splash_subtitle: FontSpec::regular(14),
        }
    }
}

/// Grayscale levels per frame element (0 = black, 255 = white)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Palette {
    pub background: u8,
    pub track: u8,
    pub artist: u8,
    /// Unfilled part of the progress bar
    pub progress_track: u8,
    pub progress_fill: u8,
    pub time: u8,
    pub separator: u8,
    /// Previous and next lyric lines
    pub lyric_dim: u8,
    pub lyric_current: u8,
    pub splash_title: u8,
    pub splash_subtitle: u8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: 0x00,
            track: 0xFF,
            artist: 0xAA,
            progress_track: 0x33,
            progress_fill: 0xCC,
            time: 0x88,
            separator: 0x44,
            lyric_dim: 0x55,
            lyric_current: 0xFF,
            splash_title: 0xFF,
            splash_subtitle: 0x88,
        }
    }
}

/// Image-mode frame geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Album art block left edge
    pub art_x: u32,
    /// Album art block top edge
    pub art_y: u32,
    /// Album art block side length
    pub art_size: u32,
    /// Gap between art block and text column
    pub art_gap: u32,
    /// Text column left margin without art, and right margin always
    pub margin: u32,
    pub track_y: u32,
    pub artist_y: u32,
    pub bar_y: u32,
    pub bar_height: u32,
    /// Time stamps sit this far below the top of the bar
    pub time_offset: u32,
    pub separator_y: u32,
    /// Separator starts this far from both frame edges
    pub separator_inset: u32,
    /// Lyric lines left edge; the same margin applies on the right
    pub lyrics_x: u32,
    pub prev_y: u32,
    pub current_y: u32,
    pub next_y: u32,
    /// Splash title/subtitle are centred this far above/below mid-height
    pub splash_offset: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            art_x: 8,
            art_y: 6,
            art_size: 72,
            art_gap: 12,
            margin: 12,
            track_y: 10,
            artist_y: 32,
            bar_y: 56,
            bar_height: 3,
            time_offset: 6,
            separator_y: 82,
            separator_inset: 8,
            lyrics_x: 14,
            prev_y: 94,
            current_y: 118,
            next_y: 152,
            splash_offset: 14,
        }
    }
}

/// Text-list fallback layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ListConfig {
    /// Characters per list item before truncation/wrapping
    pub max_line_chars: usize,
    /// Cells in the text progress bar
    pub progress_cells: usize,
    pub x: u32,
    pub width: u32,
    pub item_width: u32,
    pub title_y: u32,
    pub title_height: u32,
    pub prev_y: u32,
    pub current_y: u32,
    pub next_y: u32,
    /// Lyric container height when the page is first created
    pub startup_line_height: u32,
    /// Lyric container height on every rebuild
    pub line_height: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            max_line_chars: 48,
            progress_cells: 12,
            x: 15,
            width: 610,
            item_width: 590,
            title_y: 5,
            title_height: 95,
            prev_y: 105,
            current_y: 150,
            next_y: 195,
            startup_line_height: 40,
            line_height: 70,
        }
    }
}

/// Text shown before any track is playing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SplashConfig {
    pub title: String<MAX_NAME_LEN>,
    pub subtitle: String<MAX_NAME_LEN>,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            title: String::try_from("LyricLens").unwrap_or_default(),
            subtitle: String::try_from("Waiting for music...").unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_spec_constructors() {
        assert_eq!(FontSpec::bold(18), FontSpec { size_px: 18, bold: true });
        assert!(!FontSpec::regular(14).bold);
    }

    #[test]
    fn test_default_palette_levels() {
        let palette = Palette::default();
        assert_eq!(palette.background, 0);
        assert_eq!(palette.artist, 170);
        assert_eq!(palette.progress_track, 51);
        assert_eq!(palette.progress_fill, 204);
        assert_eq!(palette.time, 136);
        assert_eq!(palette.separator, 68);
        assert_eq!(palette.lyric_dim, 85);
    }

    #[test]
    fn test_default_splash_text() {
        let splash = SplashConfig::default();
        assert_eq!(splash.title.as_str(), "LyricLens");
        assert_eq!(splash.subtitle.as_str(), "Waiting for music...");
    }
}
