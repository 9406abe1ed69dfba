use super::tables::{fixed_distance_lengths, fixed_literal_lengths, MAX_CODE_LENGTH};
use crate::bits::BitSink;
use crate::error::{Error, Result};
use std::sync::OnceLock;

/// Canonical prefix code: per-symbol code length and LSB-first packed code
///
/// Codes are stored already bit-reversed so they can be handed straight to
/// [`BitSink::write_bits`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanAlphabet {
    lengths: Vec<u8>,
    codes: Vec<u32>,
}

impl HuffmanAlphabet {
    /// Build canonical codes from code lengths (0 = symbol unused)
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        // Count codes of each length
        let mut bl_count = [0u32; MAX_CODE_LENGTH as usize + 1];
        for &len in lengths {
            if len > MAX_CODE_LENGTH {
                return Err(Error::InvalidCodeLength(len));
            }
            if len > 0 {
                bl_count[len as usize] += 1;
            }
        }

        // Compute first code for each bit length
        let mut next_code = [0u32; MAX_CODE_LENGTH as usize + 1];
        let mut code = 0u32;
        for bits in 1..=MAX_CODE_LENGTH as usize {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        // Assign codes in (length, symbol) order, then flip to LSB-first
        let mut codes = vec![0u32; lengths.len()];
        for (sym, &len) in lengths.iter().enumerate() {
            if len > 0 {
                codes[sym] = reverse_bits(next_code[len as usize], len);
                next_code[len as usize] += 1;
            }
        }

        Ok(Self { lengths: lengths.to_vec(), codes })
    }

    /// RFC 1951 fixed literal/length alphabet (288 symbols)
    pub fn fixed_literal() -> &'static HuffmanAlphabet {
        static ALPHABET: OnceLock<HuffmanAlphabet> = OnceLock::new();
        ALPHABET.get_or_init(|| canonical_unchecked(&fixed_literal_lengths()))
    }

    /// RFC 1951 fixed distance alphabet (30 symbols, 5 bits each)
    pub fn fixed_distance() -> &'static HuffmanAlphabet {
        static ALPHABET: OnceLock<HuffmanAlphabet> = OnceLock::new();
        ALPHABET.get_or_init(|| canonical_unchecked(&fixed_distance_lengths()))
    }

    pub fn lengths(&self) -> &[u8] {
        &self.lengths
    }

    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Number of symbols in the alphabet (used or not)
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Code length of `symbol`, 0 if unused or out of range
    #[inline]
    pub fn code_length(&self, symbol: usize) -> u8 {
        self.lengths.get(symbol).copied().unwrap_or(0)
    }

    /// Emit the code for `symbol`
    #[inline]
    pub fn write_symbol<S: BitSink>(&self, sink: &mut S, symbol: usize) -> Result<()> {
        let len = self.code_length(symbol);
        if len == 0 {
            return Err(Error::UnusedSymbol(symbol));
        }
        sink.write_bits(self.codes[symbol], len)
    }
}

/// Fixed tables only ever hold lengths 5-9
fn canonical_unchecked(lengths: &[u8]) -> HuffmanAlphabet {
    match HuffmanAlphabet::from_lengths(lengths) {
        Ok(alphabet) => alphabet,
        Err(e) => unreachable!("fixed code lengths are valid: {}", e),
    }
}

/// Reverse the bottom `n` bits of `value`
fn reverse_bits(value: u32, n: u8) -> u32 {
    let mut result = 0u32;
    let mut v = value;
    for _ in 0..n {
        result = (result << 1) | (v & 1);
        v >>= 1;
    }
    result
}
