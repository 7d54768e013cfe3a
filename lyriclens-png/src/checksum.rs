//! CRC-32 and Adler-32 checksums
//!
//! - CRC-32 (reflected, polynomial `0xEDB88320`) protects every PNG chunk.
//! - Adler-32 trails the zlib stream inside IDAT.
//!
//! Both are available as one-shot functions and as streaming accumulators so
//! a chunk CRC can cover `type ++ payload` without concatenating them.

/// Reflected CRC-32 polynomial used by PNG and zlib
pub const CRC32_POLY: u32 = 0xEDB8_8320;

/// Adler-32 modulus (largest prime below 2^16)
pub const ADLER_MOD: u32 = 65_521;

/// Largest run of bytes that can be summed before `b` may overflow a u32
const ADLER_NMAX: usize = 5_552;

const fn make_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            if c & 1 != 0 {
                c = CRC32_POLY ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Byte-wise CRC lookup table, built at compile time
static CRC_TABLE: [u32; 256] = make_crc_table();

/// Streaming CRC-32 accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32 {
    state: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    /// Start a new checksum (state `0xFFFFFFFF`)
    pub const fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    /// Feed bytes into the checksum
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        let mut crc = self.state;
        for &byte in data {
            crc = CRC_TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
        }
        self.state = crc;
        self
    }

    /// Final checksum value (state XOR `0xFFFFFFFF`)
    pub const fn finish(&self) -> u32 {
        self.state ^ 0xFFFF_FFFF
    }
}

/// One-shot CRC-32 of `data`
pub fn crc32(data: &[u8]) -> u32 {
    Crc32::new().update(data).finish()
}

/// Streaming Adler-32 accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Adler32 {
    /// Start a new checksum (`a = 1`, `b = 0`)
    pub const fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    /// Feed bytes into the checksum
    ///
    /// The modulo is deferred to once per `ADLER_NMAX` bytes, which yields
    /// the same sums as reducing after every byte.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        for block in data.chunks(ADLER_NMAX) {
            for &byte in block {
                self.a += byte as u32;
                self.b += self.a;
            }
            self.a %= ADLER_MOD;
            self.b %= ADLER_MOD;
        }
        self
    }

    /// Final checksum value `(b << 16) | a`
    pub const fn finish(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

/// One-shot Adler-32 of `data`
pub fn adler32(data: &[u8]) -> u32 {
    Adler32::new().update(data).finish()
}
