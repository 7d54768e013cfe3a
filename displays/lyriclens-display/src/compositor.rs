//! Frame compositor
//!
//! Lays out one status frame: album art on the left, track and artist with a
//! progress bar and time stamps beside it, a separator rule, then up to three
//! lyric lines across the full width.
//!
//! ```text
//! +--------+ Track name .........................
//! |  art   | Artist
//! |        | ==========-------------------------
//! +--------+ 1:02                            3:45
//! -----------------------------------------------
//!   previous lyric line
//!   CURRENT LYRIC LINE
//!   next lyric line
//! ```
//!
//! Geometry, fonts and gray levels all come from the [`DeviceProfile`].

use core::fmt;

use embedded_graphics::prelude::Point;
use lyriclens_core::{ConfigError, DeviceProfile, FontSpec};

use crate::art::GrayArt;
use crate::canvas::{PixelBuffer, Region};
use crate::fit::{filled_cells, fit_text, format_time};
use crate::text::TextRenderer;

/// Everything one frame shows
///
/// Lyric lines that are `None` or empty are left blank. `progress` is not
/// clamped here; the bar clamps it when filling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameDescription<'a> {
    pub track: &'a str,
    pub artist: &'a str,
    pub prev_line: Option<&'a str>,
    pub current_line: Option<&'a str>,
    pub next_line: Option<&'a str>,
    /// Playback position as a fraction of the track, expected in [0, 1]
    pub progress: f32,
    pub elapsed_ms: u64,
    pub total_ms: u64,
    /// Album art source identifier, usually a URL
    pub art_source: Option<&'a str>,
}

/// Present, non-empty text
pub(crate) fn non_empty(line: Option<&str>) -> Option<&str> {
    line.filter(|s| !s.is_empty())
}

/// Compositing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComposeError {
    /// Profile is unusable
    Config(ConfigError),
}

impl From<ConfigError> for ComposeError {
    fn from(e: ConfigError) -> Self {
        ComposeError::Config(e)
    }
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::Config(e) => write!(f, "cannot compose frame: {}", e),
        }
    }
}

/// Fit `text` into `width` and draw it with its top-left corner at `(x, y)`
#[allow(clippy::too_many_arguments)]
fn draw_fitted<R: TextRenderer + ?Sized>(
    canvas: &mut PixelBuffer,
    text: &R,
    line: &str,
    font: FontSpec,
    x: u32,
    y: u32,
    width: u32,
    luma: u8,
) {
    if line.is_empty() {
        return;
    }
    let fitted = fit_text(text, line, font, width);
    let clip = Region::new(x, y, width, font.size_px as u32);
    text.draw(canvas, &fitted, font, point(x, y), luma, clip);
}

fn point(x: u32, y: u32) -> Point {
    Point::new(x as i32, y as i32)
}

/// Render one status frame
///
/// `art` is the prepared art block, or `None` to use the no-art layout where
/// the text column starts at the left margin.
pub fn compose<R>(
    profile: &DeviceProfile,
    desc: &FrameDescription<'_>,
    art: Option<&GrayArt>,
    text: &R,
) -> Result<PixelBuffer, ComposeError>
where
    R: TextRenderer + ?Sized,
{
    profile.validate()?;

    let layout = &profile.layout;
    let palette = &profile.palette;
    let fonts = &profile.fonts;
    let mut canvas = PixelBuffer::new(profile.width, profile.height, palette.background)?;

    // Album art
    if let Some(art) = art {
        let block = Region::new(layout.art_x, layout.art_y, layout.art_size, layout.art_size);
        for (row, line) in art.pixels().chunks(art.size().max(1) as usize).enumerate() {
            for (col, &luma) in line.iter().enumerate() {
                let (x, y) = (
                    block.x.saturating_add(col as u32),
                    block.y.saturating_add(row as u32),
                );
                if block.contains(x, y) {
                    canvas.set(x, y, luma);
                }
            }
        }
    }

    // Track and artist
    let has_art = art.is_some();
    let text_x = profile.text_left(has_art);
    let text_w = profile.text_width(has_art);
    draw_fitted(
        &mut canvas,
        text,
        desc.track,
        fonts.track,
        text_x,
        layout.track_y,
        text_w,
        palette.track,
    );
    draw_fitted(
        &mut canvas,
        text,
        desc.artist,
        fonts.artist,
        text_x,
        layout.artist_y,
        text_w,
        palette.artist,
    );

    // Progress bar
    let bar = Region::new(text_x, layout.bar_y, text_w, layout.bar_height);
    canvas.fill_region(bar, palette.progress_track);
    let filled = filled_cells(desc.progress, text_w);
    canvas.fill_region(Region { w: filled, ..bar }, palette.progress_fill);

    // Time stamps under the bar, elapsed left and total right
    let time_y = layout.bar_y.saturating_add(layout.time_offset);
    let time_clip = Region::new(text_x, time_y, text_w, fonts.time.size_px as u32);
    let elapsed = format_time(desc.elapsed_ms);
    let total = format_time(desc.total_ms);
    text.draw(&mut canvas, &elapsed, fonts.time, point(text_x, time_y), palette.time, time_clip);
    let total_x = profile
        .text_right()
        .saturating_sub(text.measure(&total, fonts.time));
    text.draw(&mut canvas, &total, fonts.time, point(total_x, time_y), palette.time, time_clip);

    let (sep_start, sep_end) = profile.separator_span();
    canvas.hline(sep_start, sep_end, layout.separator_y, palette.separator);

    // Lyrics
    let lyrics_w = profile.lyrics_width();
    let lines = [
        (desc.prev_line, layout.prev_y, fonts.lyric_dim, palette.lyric_dim),
        (desc.current_line, layout.current_y, fonts.lyric_current, palette.lyric_current),
        (desc.next_line, layout.next_y, fonts.lyric_dim, palette.lyric_dim),
    ];
    for (line, y, font, luma) in lines {
        if let Some(line) = non_empty(line) {
            draw_fitted(&mut canvas, text, line, font, layout.lyrics_x, y, lyrics_w, luma);
        }
    }

    Ok(canvas)
}

/// Render the waiting screen shown before any track plays
///
/// Title and subtitle are centred horizontally, their vertical centres
/// `splash_offset` above and below mid-height.
pub fn compose_splash<R>(profile: &DeviceProfile, text: &R) -> Result<PixelBuffer, ComposeError>
where
    R: TextRenderer + ?Sized,
{
    profile.validate()?;

    let mut canvas = PixelBuffer::new(profile.width, profile.height, profile.palette.background)?;
    let mid = profile.height / 2;
    let offset = profile.layout.splash_offset;

    let rows = [
        (
            profile.splash.title.as_str(),
            profile.fonts.splash_title,
            mid.saturating_sub(offset),
            profile.palette.splash_title,
        ),
        (
            profile.splash.subtitle.as_str(),
            profile.fonts.splash_subtitle,
            mid.saturating_add(offset),
            profile.palette.splash_subtitle,
        ),
    ];
    let clip = canvas.bounds();
    for (line, font, centre_y, luma) in rows {
        if line.is_empty() {
            continue;
        }
        let fitted = fit_text(text, line, font, profile.width);
        let x = profile.width.saturating_sub(text.measure(&fitted, font)) / 2;
        let y = centre_y.saturating_sub(font.size_px as u32 / 2);
        text.draw(&mut canvas, &fitted, font, point(x, y), luma, clip);
    }

    Ok(canvas)
}
