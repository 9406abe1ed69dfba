use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Domain errors
    #[error("Invalid match length: {0} (must be 3-258)")]
    InvalidLength(u16),

    #[error("Invalid match distance: {0} (must be 1-32768)")]
    InvalidDistance(u32),

    #[error("Invalid bit count: {0} (must be 1-32)")]
    InvalidBitCount(u8),

    #[error("Invalid Huffman code length: {0} (max 15)")]
    InvalidCodeLength(u8),

    #[error("Symbol {0} has no code in this alphabet")]
    UnusedSymbol(usize),

    #[error("Invalid range {start}..{end} over {len} input bytes")]
    InvalidRange { start: usize, end: usize, len: usize },

    // Capacity errors
    #[error("Block holds {tokens} tokens, more than the maximum {max}")]
    BlockTooLarge { tokens: usize, max: usize },

    // Bit sink errors
    #[error("Aligned write attempted with {pending_bits} bits pending in the current byte")]
    Unaligned { pending_bits: u8 },

    // Huffman construction errors
    #[error("Cannot fit Huffman code within {limit} bits (stuck at depth {depth})")]
    CodeLengthLimit { limit: u8, depth: usize },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
