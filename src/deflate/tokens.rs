use super::tables::{MAX_DISTANCE, MAX_MATCH, MIN_MATCH, NUM_DISTANCE_CODES};
use crate::error::{Error, Result};

/// Size of the literal/length alphabet carried in a dynamic block (0-285)
pub const NUM_LITLEN_SYMBOLS: usize = 286;

/// End-of-block symbol in the literal/length alphabet
pub const END_OF_BLOCK: usize = 256;

/// A single compression decision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// A literal byte
    Literal(u8),
    /// A back-reference: copy `length` bytes from `distance` bytes back
    Match { length: u16, distance: u16 },
}

impl Token {
    /// Build a match token, rejecting lengths outside 3-258 and distances outside 1-32768
    pub fn new_match(length: u16, distance: u16) -> Result<Self> {
        if !(MIN_MATCH..=MAX_MATCH).contains(&length) {
            return Err(Error::InvalidLength(length));
        }
        if !(1..=MAX_DISTANCE).contains(&distance) {
            return Err(Error::InvalidDistance(distance as u32));
        }
        Ok(Token::Match { length, distance })
    }

    /// Returns the uncompressed size this token represents
    #[inline]
    pub fn uncompressed_size(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => *length as usize,
        }
    }
}

/// Total number of input bytes covered by a token sequence
pub fn uncompressed_len(tokens: &[Token]) -> usize {
    tokens.iter().map(Token::uncompressed_size).sum()
}

/// A back-reference proposed by a match finder for one position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub length: u16,
    pub distance: u16,
}

impl Candidate {
    #[inline]
    pub fn new(length: u16, distance: u16) -> Self {
        Self { length, distance }
    }
}

impl From<Candidate> for Token {
    fn from(c: Candidate) -> Self {
        Token::Match { length: c.length, distance: c.distance }
    }
}

/// Code lengths of the two main alphabets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLengths {
    pub literal_lengths: Vec<u8>,  // 286 symbols (288 for the fixed code)
    pub distance_lengths: Vec<u8>, // Up to 30 symbols
}

impl CodeLengths {
    pub fn new(literal_lengths: Vec<u8>, distance_lengths: Vec<u8>) -> Self {
        Self { literal_lengths, distance_lengths }
    }

    /// Lengths padded to the full alphabet sizes (286 / 30)
    pub fn padded(mut self) -> Self {
        if self.literal_lengths.len() < NUM_LITLEN_SYMBOLS {
            self.literal_lengths.resize(NUM_LITLEN_SYMBOLS, 0);
        }
        if self.distance_lengths.len() < NUM_DISTANCE_CODES {
            self.distance_lengths.resize(NUM_DISTANCE_CODES, 0);
        }
        self
    }
}
