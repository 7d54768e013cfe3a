//! Device-independent types shared by the LyricLens frame pipeline
//!
//! This crate contains everything that is neither compositing nor encoding:
//!
//! - Device profile (geometry, layout, palette, fonts) and its TOML loader
//! - Album-art raster types and the `ArtLoader` collaborator trait
//! - Bridge container/payload types and the `DisplayBridge` collaborator trait
//!
//! The collaborators (art fetching, the vendor bridge) live outside the
//! pipeline; only their interfaces are defined here.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod traits;

#[cfg(feature = "serde")]
pub use config::parse_profile;
pub use config::{ConfigError, DeviceProfile, FontSpec, LayoutRegion};
pub use traits::{
    ArtError, ArtLoader, ArtRaster, BridgeError, DisplayBridge, ImageContainer, ImagePayload,
    ListContainer, ListItems, PixelFormat, RingAction,
};
