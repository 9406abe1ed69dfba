use crate::deflate::tables::{
    distance_code_index, length_code_index, DISTANCE_TABLE, LENGTH_TABLE, NUM_DISTANCE_CODES,
};
use crate::deflate::tokens::{Token, END_OF_BLOCK, NUM_LITLEN_SYMBOLS};
use crate::error::Result;

/// Frequency counter for dynamic Huffman code generation
///
/// The end-of-block symbol is always counted once. Extra bits of all counted
/// matches are totalled so a block's payload size can be computed from the
/// histogram alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyCounter {
    /// Frequencies for literal (0-255), EOB (256), and length codes (257-285)
    pub literal_freq: [u32; NUM_LITLEN_SYMBOLS],
    /// Frequencies for distance codes (0-29)
    pub distance_freq: [u32; NUM_DISTANCE_CODES],
    /// Extra bits carried by the counted length and distance codes
    pub extra_bits: u64,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        let mut literal_freq = [0; NUM_LITLEN_SYMBOLS];
        literal_freq[END_OF_BLOCK] = 1;
        Self { literal_freq, distance_freq: [0; NUM_DISTANCE_CODES], extra_bits: 0 }
    }

    /// Histogram of a whole token sequence
    pub fn from_tokens(tokens: &[Token]) -> Result<Self> {
        let mut freq = Self::new();
        freq.count_tokens(tokens)?;
        Ok(freq)
    }

    /// Count frequencies from tokens
    pub fn count_tokens(&mut self, tokens: &[Token]) -> Result<()> {
        for token in tokens {
            self.add(token)?;
        }
        Ok(())
    }

    /// Count one token
    #[inline]
    pub fn add(&mut self, token: &Token) -> Result<()> {
        match *token {
            Token::Literal(byte) => {
                self.literal_freq[byte as usize] += 1;
            }
            Token::Match { length, distance } => {
                let lc = length_code_index(length)?;
                let dc = distance_code_index(distance)?;
                self.literal_freq[257 + lc] += 1;
                self.distance_freq[dc] += 1;
                self.extra_bits += (LENGTH_TABLE[lc].1 + DISTANCE_TABLE[dc].1) as u64;
            }
        }
        Ok(())
    }

    /// Uncount a token previously passed to [`add`](Self::add)
    #[inline]
    pub fn remove(&mut self, token: &Token) -> Result<()> {
        match *token {
            Token::Literal(byte) => {
                self.literal_freq[byte as usize] -= 1;
            }
            Token::Match { length, distance } => {
                let lc = length_code_index(length)?;
                let dc = distance_code_index(distance)?;
                self.literal_freq[257 + lc] -= 1;
                self.distance_freq[dc] -= 1;
                self.extra_bits -= (LENGTH_TABLE[lc].1 + DISTANCE_TABLE[dc].1) as u64;
            }
        }
        Ok(())
    }

    /// Whether any match was counted
    pub fn has_distances(&self) -> bool {
        self.distance_freq.iter().any(|&f| f > 0)
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new()
    }
}
