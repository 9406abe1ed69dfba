//! RFC 1951 block grammar on top of a [`BitSink`].
//!
//! Blocks are packed back-to-back with no padding in between; the caller
//! aligns once when the stream is complete.

pub mod dynamic;
pub mod fixed;

pub use dynamic::{
    build_dynamic_alphabets, dynamic_header_bits, estimate_dynamic_bits, rle_encode_lengths,
    write_dynamic_block, write_dynamic_block_with, write_dynamic_header,
};
pub use fixed::{estimate_fixed_bits, write_fixed_block};

use crate::bits::BitSink;
use crate::deflate::tables::{encode_distance, encode_length};
use crate::deflate::tokens::{Token, END_OF_BLOCK};
use crate::error::{Error, Result};
use crate::huffman::HuffmanAlphabet;

/// Most tokens a single block may carry
pub const MAX_BLOCK_TOKENS: usize = 0xFFFF;

/// Block type (BTYPE field)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BlockType {
    Fixed = 0b01,
    Dynamic = 0b10,
}

/// Write BFINAL and BTYPE
pub fn write_block_header<S: BitSink>(sink: &mut S, block_type: BlockType, is_final: bool) -> Result<()> {
    sink.write_bit(is_final);
    sink.write_bits(block_type as u32, 2)
}

/// Write Huffman-coded tokens followed by the end-of-block symbol
pub fn write_payload<S: BitSink>(
    sink: &mut S,
    tokens: &[Token],
    literal: &HuffmanAlphabet,
    distance: &HuffmanAlphabet,
) -> Result<()> {
    if tokens.len() > MAX_BLOCK_TOKENS {
        return Err(Error::BlockTooLarge { tokens: tokens.len(), max: MAX_BLOCK_TOKENS });
    }

    for token in tokens {
        match *token {
            Token::Literal(byte) => literal.write_symbol(sink, byte as usize)?,
            Token::Match { length, distance: dist } => {
                let (symbol, extra_val, extra_bits) = encode_length(length)?;
                literal.write_symbol(sink, symbol as usize)?;
                if extra_bits > 0 {
                    sink.write_bits(extra_val as u32, extra_bits)?;
                }

                let (symbol, extra_val, extra_bits) = encode_distance(dist)?;
                distance.write_symbol(sink, symbol as usize)?;
                if extra_bits > 0 {
                    sink.write_bits(extra_val as u32, extra_bits)?;
                }
            }
        }
    }

    literal.write_symbol(sink, END_OF_BLOCK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{BitCounter, BitWriter};

    #[test]
    fn test_block_header_bits() {
        let mut writer = BitWriter::new();
        write_block_header(&mut writer, BlockType::Dynamic, true).unwrap();
        writer.align_to_byte();
        // BFINAL=1, BTYPE=10 -> 101 in the low bits
        assert_eq!(writer.finish(), vec![0b101]);
    }

    #[test]
    fn test_too_many_tokens() {
        let tokens = vec![Token::Literal(0); MAX_BLOCK_TOKENS + 1];
        let mut counter = BitCounter::new();
        let result = write_payload(
            &mut counter,
            &tokens,
            HuffmanAlphabet::fixed_literal(),
            HuffmanAlphabet::fixed_distance(),
        );
        assert!(matches!(result, Err(Error::BlockTooLarge { tokens: 65536, max: 65535 })));

        let mut counter = BitCounter::new();
        let tokens = vec![Token::Literal(0); MAX_BLOCK_TOKENS];
        write_payload(
            &mut counter,
            &tokens,
            HuffmanAlphabet::fixed_literal(),
            HuffmanAlphabet::fixed_distance(),
        )
        .unwrap();
        assert_eq!(counter.bits_written(), MAX_BLOCK_TOKENS as u64 * 8 + 7);
    }

    #[test]
    fn test_rejects_invalid_match() {
        let mut counter = BitCounter::new();
        let result = write_payload(
            &mut counter,
            &[Token::Match { length: 2, distance: 1 }],
            HuffmanAlphabet::fixed_literal(),
            HuffmanAlphabet::fixed_distance(),
        );
        assert!(matches!(result, Err(Error::InvalidLength(2))));
    }
}
