use crate::error::{Error, Result};
use std::sync::OnceLock;

/// Shortest back-reference DEFLATE can express
pub const MIN_MATCH: u16 = 3;

/// Longest back-reference DEFLATE can express
pub const MAX_MATCH: u16 = 258;

/// Farthest back-reference DEFLATE can express
pub const MAX_DISTANCE: u16 = 32768;

/// Number of length codes (257-285)
pub const NUM_LENGTH_CODES: usize = 29;

/// Number of distance codes (0-29)
pub const NUM_DISTANCE_CODES: usize = 30;

/// Length codes 257-285: base length and extra bits
/// Index by (code - 257)
pub const LENGTH_TABLE: [(u16, u8); NUM_LENGTH_CODES] = [
    // (base_length, extra_bits)
    (3, 0),   // 257
    (4, 0),   // 258
    (5, 0),   // 259
    (6, 0),   // 260
    (7, 0),   // 261
    (8, 0),   // 262
    (9, 0),   // 263
    (10, 0),  // 264
    (11, 1),  // 265
    (13, 1),  // 266
    (15, 1),  // 267
    (17, 1),  // 268
    (19, 2),  // 269
    (23, 2),  // 270
    (27, 2),  // 271
    (31, 2),  // 272
    (35, 3),  // 273
    (43, 3),  // 274
    (51, 3),  // 275
    (59, 3),  // 276
    (67, 4),  // 277
    (83, 4),  // 278
    (99, 4),  // 279
    (115, 4), // 280
    (131, 5), // 281
    (163, 5), // 282
    (195, 5), // 283
    (227, 5), // 284
    (258, 0), // 285 - special case
];

/// Distance codes 0-29: base distance and extra bits
pub const DISTANCE_TABLE: [(u16, u8); NUM_DISTANCE_CODES] = [
    // (base_distance, extra_bits)
    (1, 0),      // 0
    (2, 0),      // 1
    (3, 0),      // 2
    (4, 0),      // 3
    (5, 1),      // 4
    (7, 1),      // 5
    (9, 2),      // 6
    (13, 2),     // 7
    (17, 3),     // 8
    (25, 3),     // 9
    (33, 4),     // 10
    (49, 4),     // 11
    (65, 5),     // 12
    (97, 5),     // 13
    (129, 6),    // 14
    (193, 6),    // 15
    (257, 7),    // 16
    (385, 7),    // 17
    (513, 8),    // 18
    (769, 8),    // 19
    (1025, 9),   // 20
    (1537, 9),   // 21
    (2049, 10),  // 22
    (3073, 10),  // 23
    (4097, 11),  // 24
    (6145, 11),  // 25
    (8193, 12),  // 26
    (12289, 12), // 27
    (16385, 13), // 28
    (24577, 13), // 29
];

/// Order of code length alphabet for dynamic Huffman blocks
pub const CODE_LENGTH_ORDER: [usize; 19] =
    [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// Largest value a code covers: base + 2^extra - 1
#[inline]
pub fn code_span_max(base: u16, extra_bits: u8) -> u32 {
    base as u32 + (1u32 << extra_bits) - 1
}

/// Length -> length code index (0-28), indexed by length
fn length_lookup() -> &'static [u8; MAX_MATCH as usize + 1] {
    static TABLE: OnceLock<[u8; MAX_MATCH as usize + 1]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u8; MAX_MATCH as usize + 1];
        // Later codes overwrite earlier ones, so 258 resolves to code 285
        for (idx, &(base, extra)) in LENGTH_TABLE.iter().enumerate() {
            let hi = code_span_max(base, extra).min(MAX_MATCH as u32);
            for len in base as u32..=hi {
                table[len as usize] = idx as u8;
            }
        }
        table
    })
}

/// Distance -> distance code index (0-29), indexed by distance
fn distance_lookup() -> &'static [u8] {
    static TABLE: OnceLock<Vec<u8>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = vec![0u8; MAX_DISTANCE as usize + 1];
        for (idx, &(base, extra)) in DISTANCE_TABLE.iter().enumerate() {
            let hi = code_span_max(base, extra).min(MAX_DISTANCE as u32);
            for dist in base as u32..=hi {
                table[dist as usize] = idx as u8;
            }
        }
        table
    })
}

/// Index (0-28) of the length code covering `length`
#[inline]
pub fn length_code_index(length: u16) -> Result<usize> {
    if !(MIN_MATCH..=MAX_MATCH).contains(&length) {
        return Err(Error::InvalidLength(length));
    }
    Ok(length_lookup()[length as usize] as usize)
}

/// Index (0-29) of the distance code covering `distance`
#[inline]
pub fn distance_code_index(distance: u16) -> Result<usize> {
    if !(1..=MAX_DISTANCE).contains(&distance) {
        return Err(Error::InvalidDistance(distance as u32));
    }
    Ok(distance_lookup()[distance as usize] as usize)
}

/// Decode a length value from a length code (257-285) and extra bits
pub fn decode_length(code: u16, extra_bits: u32) -> Option<u16> {
    if !(257..=285).contains(&code) {
        return None;
    }
    let idx = (code - 257) as usize;
    let (base, _) = LENGTH_TABLE[idx];
    Some(base + extra_bits as u16)
}

/// Decode a distance value from a distance code (0-29) and extra bits
pub fn decode_distance(code: u16, extra_bits: u32) -> Option<u16> {
    if code > 29 {
        return None;
    }
    let (base, _) = DISTANCE_TABLE[code as usize];
    Some(base + extra_bits as u16)
}

/// Find length symbol from length value
/// Returns (symbol, extra_value, extra_bits)
pub fn encode_length(length: u16) -> Result<(u16, u16, u8)> {
    let idx = length_code_index(length)?;
    let (base, extra_bits) = LENGTH_TABLE[idx];
    Ok((257 + idx as u16, length - base, extra_bits))
}

/// Find distance symbol from distance value
/// Returns (symbol, extra_value, extra_bits)
pub fn encode_distance(distance: u16) -> Result<(u16, u16, u8)> {
    let idx = distance_code_index(distance)?;
    let (base, extra_bits) = DISTANCE_TABLE[idx];
    Ok((idx as u16, distance - base, extra_bits))
}
