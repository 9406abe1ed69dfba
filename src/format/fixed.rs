use super::{write_block_header, write_payload, BlockType};
use crate::bits::BitSink;
use crate::deflate::tokens::Token;
use crate::error::Result;
use crate::huffman::HuffmanAlphabet;
use crate::parse::CostModel;

/// Write one fixed-Huffman block (BTYPE=01)
pub fn write_fixed_block<S: BitSink>(sink: &mut S, tokens: &[Token], is_final: bool) -> Result<()> {
    write_block_header(sink, BlockType::Fixed, is_final)?;
    write_payload(sink, tokens, HuffmanAlphabet::fixed_literal(), HuffmanAlphabet::fixed_distance())
}

/// Exact size in bits of [`write_fixed_block`] for `tokens`
pub fn estimate_fixed_bits(tokens: &[Token]) -> Result<u64> {
    Ok(3 + CostModel::fixed().cost_payload(tokens)?)
}
