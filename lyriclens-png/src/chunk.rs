//! PNG chunk framing
//!
//! Chunk format:
//! - LENGTH (4 bytes, BE): payload length
//! - TYPE (4 bytes): ASCII chunk tag
//! - PAYLOAD (LENGTH bytes)
//! - CRC (4 bytes, BE): CRC-32 of TYPE and PAYLOAD

use alloc::vec::Vec;

use crate::checksum::Crc32;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Bytes of framing around every chunk payload (LENGTH + TYPE + CRC)
pub const CHUNK_OVERHEAD: usize = 12;

/// IHDR payload length
pub const IHDR_LEN: usize = 13;

/// Bit depth of every image this crate writes
pub const BIT_DEPTH: u8 = 8;

/// Colour type 0 (grayscale)
pub const COLOR_GRAYSCALE: u8 = 0;

/// Scanline filter type 0 (None)
pub const FILTER_NONE: u8 = 0;

/// The three critical chunk tags this crate writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChunkType {
    /// Image header
    Ihdr,
    /// Image data
    Idat,
    /// Image trailer
    Iend,
}

impl ChunkType {
    /// ASCII tag bytes
    pub const fn tag(self) -> [u8; 4] {
        match self {
            ChunkType::Ihdr => *b"IHDR",
            ChunkType::Idat => *b"IDAT",
            ChunkType::Iend => *b"IEND",
        }
    }

    /// Look up a tag
    pub fn from_tag(tag: [u8; 4]) -> Option<Self> {
        match &tag {
            b"IHDR" => Some(ChunkType::Ihdr),
            b"IDAT" => Some(ChunkType::Idat),
            b"IEND" => Some(ChunkType::Iend),
            _ => None,
        }
    }
}

/// CRC-32 of a chunk's tag followed by its payload
pub fn chunk_crc(tag: [u8; 4], payload: &[u8]) -> u32 {
    Crc32::new().update(&tag).update(payload).finish()
}

/// Append a complete chunk to `out`
///
/// The caller guarantees `payload.len()` fits in a u32.
pub fn write_chunk(out: &mut Vec<u8>, chunk_type: ChunkType, payload: &[u8]) {
    let tag = chunk_type.tag();
    out.reserve(CHUNK_OVERHEAD + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(&tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&chunk_crc(tag, payload).to_be_bytes());
}

/// Image header contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ihdr {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl Ihdr {
    /// Header for an 8-bit grayscale, non-interlaced image
    pub const fn grayscale(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: BIT_DEPTH,
            color_type: COLOR_GRAYSCALE,
            compression: 0,
            filter: 0,
            interlace: 0,
        }
    }

    /// Serialize to the 13-byte IHDR payload
    pub fn to_bytes(&self) -> [u8; IHDR_LEN] {
        let mut bytes = [0u8; IHDR_LEN];
        bytes[0..4].copy_from_slice(&self.width.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.height.to_be_bytes());
        bytes[8] = self.bit_depth;
        bytes[9] = self.color_type;
        bytes[10] = self.compression;
        bytes[11] = self.filter;
        bytes[12] = self.interlace;
        bytes
    }

    /// Parse a 13-byte IHDR payload
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != IHDR_LEN {
            return None;
        }
        Some(Self {
            width: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            height: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            bit_depth: bytes[8],
            color_type: bytes[9],
            compression: bytes[10],
            filter: bytes[11],
            interlace: bytes[12],
        })
    }

    /// Whether this header describes the one profile the codec supports
    pub fn is_supported_profile(&self) -> bool {
        *self == Self::grayscale(self.width, self.height) && self.width > 0 && self.height > 0
    }
}

/// A chunk borrowed from an encoded PNG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    pub tag: [u8; 4],
    pub payload: &'a [u8],
    pub crc: u32,
}

impl RawChunk<'_> {
    /// Whether the stored CRC matches tag and payload
    pub fn crc_ok(&self) -> bool {
        chunk_crc(self.tag, self.payload) == self.crc
    }
}

/// A chunk header announced more bytes than the input holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TruncatedChunk;

/// Iterator over the chunks following the PNG signature
///
/// Yields `None` once the input is exhausted; a truncated chunk ends the
/// iteration with an `Err(TruncatedChunk)` item.
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ChunkReader<'a> {
    /// Read chunks from `data`, which must start right after the signature
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<RawChunk<'a>, TruncatedChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }

        let rest = &self.data[self.pos..];
        if rest.len() < CHUNK_OVERHEAD {
            self.pos = self.data.len();
            return Some(Err(TruncatedChunk));
        }

        let len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let total = match len.checked_add(CHUNK_OVERHEAD) {
            Some(total) if total <= rest.len() => total,
            _ => {
                self.pos = self.data.len();
                return Some(Err(TruncatedChunk));
            }
        };

        let tag = [rest[4], rest[5], rest[6], rest[7]];
        let payload = &rest[8..8 + len];
        let crc_bytes = &rest[8 + len..total];
        let crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

        self.pos += total;
        Some(Ok(RawChunk { tag, payload, crc }))
    }
}
