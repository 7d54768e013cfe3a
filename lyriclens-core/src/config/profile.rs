//! Device profile and validation

use core::fmt;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{FontConfig, LayoutConfig, ListConfig, Palette, SplashConfig, MAX_NAME_LEN};

/// Frame region named in validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutRegion {
    Art,
    TextColumn,
    ProgressBar,
    TimeRow,
    Separator,
    Lyrics,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Frame width or height is zero
    InvalidDimensions { width: u32, height: u32 },
    /// A layout region does not fit on the frame
    RegionOutOfBounds(LayoutRegion),
    /// Image container name is empty
    EmptyContainerName,
    /// The list containers' consecutive IDs would overflow
    ContainerIdOverflow(u32),
    /// Profile text could not be parsed (byte offset if known)
    Parse { offset: Option<usize> },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimensions { width, height } => {
                write!(f, "invalid frame dimensions {}x{}", width, height)
            }
            ConfigError::RegionOutOfBounds(region) => {
                write!(f, "{:?} region does not fit on the frame", region)
            }
            ConfigError::EmptyContainerName => write!(f, "container name is empty"),
            ConfigError::ContainerIdOverflow(id) => {
                write!(f, "container ID {} leaves no room for the list containers", id)
            }
            ConfigError::Parse { offset: Some(at) } => write!(f, "profile parse error at byte {}", at),
            ConfigError::Parse { offset: None } => write!(f, "profile parse error"),
        }
    }
}

/// Number of containers on the text-list page
pub const LIST_CONTAINERS: u32 = 4;

/// Complete description of one display target
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceProfile {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Image container ID; list containers use consecutive IDs from here
    pub container_id: u32,
    /// Image container name
    pub container_name: String<MAX_NAME_LEN>,
    pub layout: LayoutConfig,
    pub palette: Palette,
    pub fonts: FontConfig,
    pub list: ListConfig,
    pub splash: SplashConfig,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            width: 576,
            height: 200,
            container_id: 100,
            container_name: String::try_from("lyrics").unwrap_or_default(),
            layout: LayoutConfig::default(),
            palette: Palette::default(),
            fonts: FontConfig::default(),
            list: ListConfig::default(),
            splash: SplashConfig::default(),
        }
    }
}

impl DeviceProfile {
    /// Left edge of the text column
    pub fn text_left(&self, has_art: bool) -> u32 {
        let l = &self.layout;
        if has_art {
            l.art_x
                .saturating_add(l.art_size)
                .saturating_add(l.art_gap)
        } else {
            l.margin
        }
    }

    /// Right edge of the text column (exclusive)
    pub fn text_right(&self) -> u32 {
        self.width.saturating_sub(self.layout.margin)
    }

    /// Width available to track, artist and the progress bar
    pub fn text_width(&self, has_art: bool) -> u32 {
        self.text_right().saturating_sub(self.text_left(has_art))
    }

    /// Width available to each lyric line
    pub fn lyrics_width(&self) -> u32 {
        self.width
            .saturating_sub(self.layout.lyrics_x.saturating_mul(2))
    }

    /// Horizontal extent of the separator rule as `(start, end)`, end exclusive
    pub fn separator_span(&self) -> (u32, u32) {
        let inset = self.layout.separator_inset;
        (inset, self.width.saturating_sub(inset))
    }

    /// Check that every region fits on the frame
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.container_name.is_empty() {
            return Err(ConfigError::EmptyContainerName);
        }
        if self.container_id.checked_add(LIST_CONTAINERS - 1).is_none() {
            return Err(ConfigError::ContainerIdOverflow(self.container_id));
        }

        let l = &self.layout;
        let fits = |start: u32, len: u32, limit: u32| {
            start.checked_add(len).map_or(false, |end| end <= limit)
        };

        if !fits(l.art_x, l.art_size, self.width) || !fits(l.art_y, l.art_size, self.height) {
            return Err(ConfigError::RegionOutOfBounds(LayoutRegion::Art));
        }
        if self.text_left(true) >= self.text_right() || l.margin >= self.text_right() {
            return Err(ConfigError::RegionOutOfBounds(LayoutRegion::TextColumn));
        }
        if !fits(l.bar_y, l.bar_height, self.height) {
            return Err(ConfigError::RegionOutOfBounds(LayoutRegion::ProgressBar));
        }
        if !fits(l.bar_y, l.time_offset, self.height - 1) {
            return Err(ConfigError::RegionOutOfBounds(LayoutRegion::TimeRow));
        }
        let (sep_start, sep_end) = self.separator_span();
        if sep_start >= sep_end || l.separator_y >= self.height {
            return Err(ConfigError::RegionOutOfBounds(LayoutRegion::Separator));
        }
        let lyric_rows = [l.prev_y, l.current_y, l.next_y];
        if self.lyrics_width() == 0 || lyric_rows.iter().any(|&y| y >= self.height) {
            return Err(ConfigError::RegionOutOfBounds(LayoutRegion::Lyrics));
        }

        Ok(())
    }
}
