use crate::deflate::tables::{
    distance_code_index, length_code_index, DISTANCE_TABLE, LENGTH_TABLE, NUM_DISTANCE_CODES,
    NUM_LENGTH_CODES,
};
use crate::deflate::tokens::{CodeLengths, Token, END_OF_BLOCK};
use crate::error::Result;
use crate::huffman::tables::{fixed_distance_lengths, fixed_literal_lengths, MAX_CODE_LENGTH};
use crate::huffman::HuffmanAlphabet;
use std::sync::OnceLock;

/// Bit prices of every token under one code length assignment
///
/// Symbols with code length 0 are priced at 15 bits so that a parse never
/// treats a symbol absent from the previous pass as free.
#[derive(Clone, Debug)]
pub struct CostModel {
    lengths: CodeLengths,
    literal_cost: [u32; 256],
    eob_cost: u32,
    /// Code length + extra bits per length code
    length_cost: [u32; NUM_LENGTH_CODES],
    /// Code length + extra bits per distance code
    distance_cost: [u32; NUM_DISTANCE_CODES],
}

#[inline]
fn price(lengths: &[u8], symbol: usize) -> u32 {
    match lengths.get(symbol).copied().unwrap_or(0) {
        0 => MAX_CODE_LENGTH as u32,
        len => len as u32,
    }
}

impl CostModel {
    pub fn new(lengths: CodeLengths) -> Self {
        let lit = &lengths.literal_lengths;
        let dist = &lengths.distance_lengths;

        let mut literal_cost = [0u32; 256];
        for (byte, cost) in literal_cost.iter_mut().enumerate() {
            *cost = price(lit, byte);
        }
        let mut length_cost = [0u32; NUM_LENGTH_CODES];
        for (lc, cost) in length_cost.iter_mut().enumerate() {
            *cost = price(lit, 257 + lc) + LENGTH_TABLE[lc].1 as u32;
        }
        let mut distance_cost = [0u32; NUM_DISTANCE_CODES];
        for (dc, cost) in distance_cost.iter_mut().enumerate() {
            *cost = price(dist, dc) + DISTANCE_TABLE[dc].1 as u32;
        }
        let eob_cost = price(lit, END_OF_BLOCK);

        Self { lengths, literal_cost, eob_cost, length_cost, distance_cost }
    }

    /// RFC 1951 fixed code: 8/9 bits per literal, 7/8 per length code, 5 per distance code
    pub fn fixed() -> &'static CostModel {
        static MODEL: OnceLock<CostModel> = OnceLock::new();
        MODEL.get_or_init(|| {
            CostModel::new(CodeLengths::new(
                fixed_literal_lengths().to_vec(),
                fixed_distance_lengths().to_vec(),
            ))
        })
    }

    /// Model pricing tokens with the given alphabets
    pub fn from_alphabets(literal: &HuffmanAlphabet, distance: &HuffmanAlphabet) -> Self {
        Self::new(CodeLengths::new(literal.lengths().to_vec(), distance.lengths().to_vec()))
    }

    #[inline]
    pub fn cost_literal(&self, byte: u8) -> u32 {
        self.literal_cost[byte as usize]
    }

    #[inline]
    pub fn cost_match(&self, length: u16, distance: u16) -> Result<u32> {
        let lc = length_code_index(length)?;
        let dc = distance_code_index(distance)?;
        Ok(self.length_cost[lc] + self.distance_cost[dc])
    }

    #[inline]
    pub fn cost_eob(&self) -> u32 {
        self.eob_cost
    }

    #[inline]
    pub fn cost_token(&self, token: &Token) -> Result<u32> {
        match *token {
            Token::Literal(byte) => Ok(self.cost_literal(byte)),
            Token::Match { length, distance } => self.cost_match(length, distance),
        }
    }

    /// Bits for a block body: every token plus the end-of-block symbol
    pub fn cost_payload(&self, tokens: &[Token]) -> Result<u64> {
        let mut bits = self.cost_eob() as u64;
        for token in tokens {
            bits += self.cost_token(token)? as u64;
        }
        Ok(bits)
    }

    pub fn code_lengths(&self) -> &CodeLengths {
        &self.lengths
    }
}
