//! Reader for the single profile the encoder writes
//!
//! This is not a general PNG decoder. It accepts 8-bit grayscale,
//! non-interlaced images whose scanlines all use filter type 0 and whose
//! IDAT data is a zlib stream of stored blocks, and it verifies every CRC and
//! the Adler-32 trailer on the way. Useful for checking frames captured off
//! the bridge and for tests.

use alloc::vec::Vec;
use core::fmt;

use crate::chunk::{ChunkReader, ChunkType, Ihdr, FILTER_NONE, PNG_SIGNATURE};
use crate::deflate::{inflate_zlib_stored, InflateError};

/// Decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Input does not start with the PNG signature
    BadSignature,
    /// A chunk is truncated
    Truncated,
    /// A chunk CRC does not match
    CrcMismatch,
    /// Chunks are missing, duplicated, out of order, or unknown
    BadChunkOrder,
    /// Header or data uses a feature outside the supported profile
    UnsupportedProfile,
    /// IDAT stream is malformed
    Inflate(InflateError),
    /// Scanline data does not match the header dimensions
    LengthMismatch,
}

impl From<InflateError> for DecodeError {
    fn from(e: InflateError) -> Self {
        match e {
            InflateError::NotStored | InflateError::BadHeader => DecodeError::UnsupportedProfile,
            other => DecodeError::Inflate(other),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::BadSignature => write!(f, "missing PNG signature"),
            DecodeError::Truncated => write!(f, "truncated chunk"),
            DecodeError::CrcMismatch => write!(f, "chunk CRC mismatch"),
            DecodeError::BadChunkOrder => write!(f, "unexpected chunk sequence"),
            DecodeError::UnsupportedProfile => write!(f, "not an 8-bit grayscale stored PNG"),
            DecodeError::Inflate(e) => write!(f, "malformed IDAT stream: {:?}", e),
            DecodeError::LengthMismatch => write!(f, "scanline data does not match header"),
        }
    }
}

/// A decoded grayscale raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, one byte per pixel
    pub pixels: Vec<u8>,
}

/// Decode a PNG written by [`encode`](crate::encode)
///
/// Multiple consecutive IDAT chunks are accepted and concatenated.
pub fn decode(data: &[u8]) -> Result<DecodedImage, DecodeError> {
    let body = data
        .strip_prefix(&PNG_SIGNATURE[..])
        .ok_or(DecodeError::BadSignature)?;

    let mut header: Option<Ihdr> = None;
    let mut idat = Vec::new();
    let mut seen_iend = false;

    for chunk in ChunkReader::new(body) {
        let chunk = chunk.map_err(|_| DecodeError::Truncated)?;
        if !chunk.crc_ok() {
            return Err(DecodeError::CrcMismatch);
        }
        if seen_iend {
            return Err(DecodeError::BadChunkOrder);
        }

        match (ChunkType::from_tag(chunk.tag), header) {
            (Some(ChunkType::Ihdr), None) => {
                let ihdr = Ihdr::from_bytes(chunk.payload).ok_or(DecodeError::UnsupportedProfile)?;
                if !ihdr.is_supported_profile() {
                    return Err(DecodeError::UnsupportedProfile);
                }
                header = Some(ihdr);
            }
            (Some(ChunkType::Idat), Some(_)) => idat.extend_from_slice(chunk.payload),
            (Some(ChunkType::Iend), Some(_)) if chunk.payload.is_empty() => seen_iend = true,
            _ => return Err(DecodeError::BadChunkOrder),
        }
    }

    let header = header.ok_or(DecodeError::BadChunkOrder)?;
    if !seen_iend || idat.is_empty() {
        return Err(DecodeError::BadChunkOrder);
    }

    let raw = inflate_zlib_stored(&idat)?;

    let width = header.width as usize;
    let height = header.height as usize;
    let row_len = width.checked_add(1).ok_or(DecodeError::LengthMismatch)?;
    if Some(raw.len()) != row_len.checked_mul(height) {
        return Err(DecodeError::LengthMismatch);
    }

    let mut pixels = Vec::with_capacity(width * height);
    for row in raw.chunks_exact(row_len) {
        if row[0] != FILTER_NONE {
            return Err(DecodeError::UnsupportedProfile);
        }
        pixels.extend_from_slice(&row[1..]);
    }

    Ok(DecodedImage {
        width: header.width,
        height: header.height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::write_chunk;
    use crate::deflate::zlib_stored;
    use crate::encode;
    use alloc::vec;
    use proptest::prelude::*;

    #[test]
    fn test_decode_device_frame() {
        let pixels: Vec<u8> = (0..576 * 200).map(|i| (i * 13 % 256) as u8).collect();
        let png = encode(576, 200, &pixels).unwrap();

        let image = decode(&png).unwrap();
        assert_eq!((image.width, image.height), (576, 200));
        assert_eq!(image.pixels, pixels);
    }

    #[test]
    fn test_decode_rejects_missing_signature() {
        let png = encode(1, 1, &[7]).unwrap();
        assert_eq!(decode(&png[1..]), Err(DecodeError::BadSignature));
    }

    #[test]
    fn test_decode_detects_flipped_pixel() {
        let mut png = encode(4, 2, &[0, 64, 128, 255, 255, 128, 64, 0]).unwrap();
        // First pixel byte: sig(8) + IHDR(25) + IDAT len/tag(8) + zlib(2) + block hdr(5) + filter(1)
        png[8 + 25 + 8 + 2 + 5 + 1] ^= 0x10;
        assert_eq!(decode(&png), Err(DecodeError::CrcMismatch));
    }

    #[test]
    fn test_decode_rejects_nonzero_filter() {
        let mut out = PNG_SIGNATURE.to_vec();
        write_chunk(&mut out, ChunkType::Ihdr, &Ihdr::grayscale(2, 1).to_bytes());
        write_chunk(&mut out, ChunkType::Idat, &zlib_stored(&[1, 10, 20]));
        write_chunk(&mut out, ChunkType::Iend, &[]);
        assert_eq!(decode(&out), Err(DecodeError::UnsupportedProfile));
    }

    #[test]
    fn test_decode_rejects_rgb_header() {
        let mut ihdr = Ihdr::grayscale(1, 1);
        ihdr.color_type = 2;
        let mut out = PNG_SIGNATURE.to_vec();
        write_chunk(&mut out, ChunkType::Ihdr, &ihdr.to_bytes());
        write_chunk(&mut out, ChunkType::Idat, &zlib_stored(&[0, 1, 2, 3]));
        write_chunk(&mut out, ChunkType::Iend, &[]);
        assert_eq!(decode(&out), Err(DecodeError::UnsupportedProfile));
    }

    #[test]
    fn test_decode_rejects_compressed_idat() {
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&[0u8; 1000], 6);
        let mut out = PNG_SIGNATURE.to_vec();
        write_chunk(&mut out, ChunkType::Ihdr, &Ihdr::grayscale(999, 1).to_bytes());
        write_chunk(&mut out, ChunkType::Idat, &compressed);
        write_chunk(&mut out, ChunkType::Iend, &[]);
        assert_eq!(decode(&out), Err(DecodeError::UnsupportedProfile));
    }

    #[test]
    fn test_decode_accepts_split_idat() {
        let stream = zlib_stored(&[0, 5, 6, 0, 7, 8]);
        let (head, tail) = stream.split_at(4);
        let mut out = PNG_SIGNATURE.to_vec();
        write_chunk(&mut out, ChunkType::Ihdr, &Ihdr::grayscale(2, 2).to_bytes());
        write_chunk(&mut out, ChunkType::Idat, head);
        write_chunk(&mut out, ChunkType::Idat, tail);
        write_chunk(&mut out, ChunkType::Iend, &[]);

        assert_eq!(decode(&out).unwrap().pixels, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_decode_requires_iend() {
        let png = encode(1, 1, &[7]).unwrap();
        assert_eq!(decode(&png[..png.len() - 12]), Err(DecodeError::BadChunkOrder));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_encode_decode_round_trip(
            (width, height, pixels) in (1u32..300, 1u32..300).prop_flat_map(|(w, h)| {
                (Just(w), Just(h), proptest::collection::vec(any::<u8>(), (w * h) as usize))
            })
        ) {
            let image = decode(&encode(width, height, &pixels).unwrap()).unwrap();
            prop_assert_eq!((image.width, image.height), (width, height));
            prop_assert_eq!(image.pixels, pixels);
        }
    }
}
