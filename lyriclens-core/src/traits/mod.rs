//! Collaborator traits
//!
//! These traits define the interface between the frame pipeline and the
//! host-specific pieces it does not own: fetching album art and talking to
//! the glasses bridge.

pub mod art;
pub mod bridge;

pub use art::{ArtError, ArtLoader, ArtRaster, PixelFormat};
pub use bridge::{
    BridgeError, DisplayBridge, ImageContainer, ImagePayload, ListContainer, ListItems,
    RingAction,
};
