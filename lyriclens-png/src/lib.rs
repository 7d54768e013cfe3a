//! Minimal grayscale PNG codec for the LyricLens display pipeline
//!
//! The glasses accept exactly one image profile, so this crate emits exactly
//! one: 8-bit grayscale, filter type 0 on every scanline, no interlacing, and
//! an IDAT stream made of uncompressed ("stored") DEFLATE blocks.
//!
//! # File Layout
//!
//! ```text
//! ┌───────────┬──────────────┬──────────────────────────────┬──────────┐
//! │ SIGNATURE │ IHDR         │ IDAT                         │ IEND     │
//! │ 8B        │ 12B + 13B    │ 12B + zlib(stored blocks)    │ 12B      │
//! └───────────┴──────────────┴──────────────────────────────┴──────────┘
//! ```
//!
//! Every chunk is `LENGTH (u32 BE) | TYPE (4B) | PAYLOAD | CRC-32 (u32 BE)`,
//! with the CRC computed over type and payload. CRC-32 and Adler-32 live in
//! [`checksum`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod checksum;
pub mod chunk;
pub mod decoder;
pub mod deflate;
pub mod encoder;

pub use checksum::{adler32, crc32, Adler32, Crc32};
pub use chunk::{ChunkType, Ihdr, PNG_SIGNATURE};
pub use decoder::{decode, DecodeError, DecodedImage};
pub use deflate::{zlib_stored, MAX_STORED_BLOCK};
pub use encoder::{encode, EncodeError, GrayscaleEncoder};
