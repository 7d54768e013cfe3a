//! zlib stream made of stored (uncompressed) DEFLATE blocks
//!
//! Stream format:
//! - CMF/FLG (2 bytes): `0x78 0x01`, deflate with a 32K window, no preset
//!   dictionary, fastest-compression level hint
//! - One or more stored blocks:
//!   - HEADER (1 byte): BFINAL in bit 0, BTYPE = 00
//!   - LEN (2 bytes, LE): number of raw bytes, at most 65535
//!   - NLEN (2 bytes, LE): one's complement of LEN
//!   - LEN raw bytes
//! - ADLER-32 (4 bytes, BE) of the uncompressed data

use alloc::vec::Vec;

use crate::checksum::adler32;

/// zlib CMF byte: method 8 (deflate), 32K window
pub const ZLIB_CMF: u8 = 0x78;

/// zlib FLG byte: no dictionary, level 0, check bits for CMF = 0x78
pub const ZLIB_FLG: u8 = 0x01;

/// Maximum payload of one stored block
pub const MAX_STORED_BLOCK: usize = 65_535;

/// Size of a stored block header (BFINAL/BTYPE + LEN + NLEN)
pub const STORED_HEADER_LEN: usize = 5;

/// Number of stored blocks needed for `raw_len` bytes
///
/// An empty stream still needs one (empty, final) block.
pub const fn stored_block_count(raw_len: usize) -> usize {
    if raw_len == 0 {
        1
    } else {
        raw_len.div_ceil(MAX_STORED_BLOCK)
    }
}

/// Exact size of the zlib stream produced for `raw_len` bytes
pub const fn zlib_stored_len(raw_len: usize) -> usize {
    2 + stored_block_count(raw_len) * STORED_HEADER_LEN + raw_len + 4
}

/// Append stored DEFLATE blocks carrying `raw` to `out`
pub fn write_stored_blocks(out: &mut Vec<u8>, raw: &[u8]) {
    let mut remaining = raw;
    loop {
        let block_len = remaining.len().min(MAX_STORED_BLOCK);
        let is_last = block_len == remaining.len();
        let len = block_len as u16;

        out.push(if is_last { 0x01 } else { 0x00 });
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(&remaining[..block_len]);

        remaining = &remaining[block_len..];
        if is_last {
            break;
        }
    }
}

/// Append a complete zlib stream (header, stored blocks, Adler-32) to `out`
pub fn write_zlib_stored(out: &mut Vec<u8>, raw: &[u8]) {
    out.reserve(zlib_stored_len(raw.len()));
    out.push(ZLIB_CMF);
    out.push(ZLIB_FLG);
    write_stored_blocks(out, raw);
    out.extend_from_slice(&adler32(raw).to_be_bytes());
}

/// Wrap `raw` in a zlib stream of stored blocks
pub fn zlib_stored(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(zlib_stored_len(raw.len()));
    write_zlib_stored(&mut out, raw);
    out
}

/// Errors from reading back a stored-block stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InflateError {
    /// zlib header is not `0x78 0x01`-compatible or asks for a dictionary
    BadHeader,
    /// A block uses Huffman coding (BTYPE != 00)
    NotStored,
    /// NLEN is not the complement of LEN
    LengthCheck,
    /// Stream ended inside a header, block or trailer
    Truncated,
    /// Adler-32 trailer does not match the data
    ChecksumMismatch,
}

/// Read back the raw bytes of a stored-block stream (no zlib wrapper)
///
/// Returns the data and the number of input bytes consumed.
pub fn read_stored_blocks(input: &[u8]) -> Result<(Vec<u8>, usize), InflateError> {
    let mut out = Vec::new();
    let mut pos = 0;

    loop {
        let header = input
            .get(pos..pos + STORED_HEADER_LEN)
            .ok_or(InflateError::Truncated)?;
        if header[0] & 0x06 != 0 {
            return Err(InflateError::NotStored);
        }
        let is_last = header[0] & 0x01 != 0;
        let len = u16::from_le_bytes([header[1], header[2]]);
        let nlen = u16::from_le_bytes([header[3], header[4]]);
        if len != !nlen {
            return Err(InflateError::LengthCheck);
        }
        pos += STORED_HEADER_LEN;

        let data = input
            .get(pos..pos + len as usize)
            .ok_or(InflateError::Truncated)?;
        out.extend_from_slice(data);
        pos += len as usize;

        if is_last {
            return Ok((out, pos));
        }
    }
}

/// Read back a zlib stream of stored blocks, verifying header and Adler-32
pub fn inflate_zlib_stored(input: &[u8]) -> Result<Vec<u8>, InflateError> {
    let (cmf, flg) = match input {
        [cmf, flg, ..] => (*cmf, *flg),
        _ => return Err(InflateError::Truncated),
    };
    let check = ((cmf as u16) << 8) | flg as u16;
    if cmf & 0x0F != 8 || check % 31 != 0 || flg & 0x20 != 0 {
        return Err(InflateError::BadHeader);
    }

    let (data, used) = read_stored_blocks(&input[2..])?;
    let trailer = input
        .get(2 + used..2 + used + 4)
        .ok_or(InflateError::Truncated)?;
    let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    if adler32(&data) != expected {
        return Err(InflateError::ChecksumMismatch);
    }

    Ok(data)
}
