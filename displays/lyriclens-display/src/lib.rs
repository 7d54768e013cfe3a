//! Frame compositing and display sessions for LyricLens
//!
//! This crate turns a [`FrameDescription`] into something the glasses can
//! show:
//! - `compose` renders the status frame into a grayscale [`PixelBuffer`]
//! - `list` builds the text-list containers for bridges without image support
//! - [`DisplaySession`] negotiates the mode, caches album art, encodes
//!   frames with `lyriclens-png` and hands them to a `DisplayBridge`
//!
//! # Architecture
//!
//! Text rasterization sits behind the [`TextRenderer`] trait so layout and
//! truncation can be driven by any font source. [`MonoTextRenderer`] uses
//! the `embedded-graphics` ASCII fonts and needs no allocation per glyph.
//!
//! ```text
//! FrameDescription --compose--> PixelBuffer --encode--> PNG --base64--> bridge
//!                  \--list-----> ListContainer x4 ---------------------> bridge
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod art;
pub mod canvas;
pub mod compositor;
pub mod fit;
pub mod list;
pub mod mono;
pub mod session;
pub mod text;

// Re-export key types
pub use art::{ArtCache, GrayArt};
pub use canvas::{PixelBuffer, Region};
pub use compositor::{compose, compose_splash, ComposeError, FrameDescription};
pub use fit::fit_text;
pub use mono::MonoTextRenderer;
pub use session::{DisplayMode, DisplaySession, RenderedFrame, SessionError};
pub use text::TextRenderer;
