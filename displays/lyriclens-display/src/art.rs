//! Album art preparation and cache

use alloc::string::String;
use alloc::vec::Vec;

use log::{debug, warn};
use lyriclens_core::{ArtLoader, ArtRaster};

/// Square grayscale art block, ready to blit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayArt {
    size: u32,
    pixels: Vec<u8>,
}

impl GrayArt {
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major, `size * size` samples
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// BT.601 luma, rounded
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    ((y + 500) / 1000) as u8
}

/// Composite one channel over black
fn over_black(channel: u8, alpha: u8) -> u8 {
    ((channel as u32 * alpha as u32 + 127) / 255) as u8
}

/// Resample `raster` into a `size` x `size` block and desaturate it
///
/// Nearest-neighbour sampling; alpha composites over black.
pub fn prepare_art(raster: &ArtRaster, size: u32) -> GrayArt {
    let (src_w, src_h) = (raster.width() as u64, raster.height() as u64);
    let mut pixels = Vec::with_capacity((size as usize).saturating_mul(size as usize));

    for dy in 0..size as u64 {
        let sy = (dy * src_h / size as u64).min(src_h - 1) as u32;
        for dx in 0..size as u64 {
            let sx = (dx * src_w / size as u64).min(src_w - 1) as u32;
            let [r, g, b, a] = raster.rgba(sx, sy);
            pixels.push(luma(over_black(r, a), over_black(g, a), over_black(b, a)));
        }
    }

    GrayArt { size, pixels }
}

/// Single-slot cache of prepared art, keyed by source identifier
///
/// A successful load of a new source replaces the slot. A failed load leaves
/// the slot alone, so switching back to the cached source is still a hit.
#[derive(Debug, Default)]
pub struct ArtCache {
    slot: Option<(String, GrayArt)>,
}

impl ArtCache {
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Source identifier of the cached art, if any
    pub fn cached_source(&self) -> Option<&str> {
        self.slot.as_ref().map(|(source, _)| source.as_str())
    }

    /// Art for `source`, loading and preparing it on a miss
    ///
    /// Returns `None` for an absent or empty source and when loading fails.
    pub fn resolve<L>(&mut self, source: Option<&str>, size: u32, loader: &mut L) -> Option<&GrayArt>
    where
        L: ArtLoader + ?Sized,
    {
        let source = source.filter(|s| !s.is_empty())?;

        let hit = matches!(&self.slot, Some((cached, art)) if cached == source && art.size == size);
        if hit {
            debug!("art cache hit: {}", source);
        } else {
            match loader.load(source) {
                Ok(raster) => {
                    debug!(
                        "art cache replaced: {} ({}x{})",
                        source,
                        raster.width(),
                        raster.height()
                    );
                    self.slot = Some((String::from(source), prepare_art(&raster, size)));
                }
                Err(e) => {
                    warn!("album art load failed for {}: {}", source, e);
                    return None;
                }
            }
        }

        self.slot.as_ref().map(|(_, art)| art)
    }
}
