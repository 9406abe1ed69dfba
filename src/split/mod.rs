pub mod greedy;

pub use greedy::{GreedyBlockSplitter, SplitConfig};

use crate::deflate::tokens::Token;
use crate::error::Result;
use std::ops::Range;

/// Half-open range `[start, end)` of token indices coded as one block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

impl Block {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of tokens in the block
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `prefix[k]` = uncompressed bytes covered by `tokens[..k]`
    pub fn byte_prefix(tokens: &[Token]) -> Vec<usize> {
        let mut prefix = Vec::with_capacity(tokens.len() + 1);
        let mut sum = 0;
        prefix.push(0);
        for token in tokens {
            sum += token.uncompressed_size();
            prefix.push(sum);
        }
        prefix
    }

    /// Byte range of the input this block covers
    pub fn to_byte_range(&self, prefix: &[usize]) -> Range<usize> {
        prefix[self.start]..prefix[self.end]
    }
}

/// Partitions a token sequence into ordered, gap-free blocks
pub trait BlockSplitter {
    /// Split `tokens`; the returned blocks cover every index exactly once
    fn split(&mut self, tokens: &[Token]) -> Result<Vec<Block>>;
}

/// Splitter that keeps everything in one block
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleBlockSplitter;

impl BlockSplitter for SingleBlockSplitter {
    fn split(&mut self, tokens: &[Token]) -> Result<Vec<Block>> {
        Ok(vec![Block::new(0, tokens.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_prefix() {
        let tokens = [
            Token::Literal(b'a'),
            Token::Match { length: 4, distance: 1 },
            Token::Literal(b'b'),
            Token::Match { length: 10, distance: 6 },
        ];
        let prefix = Block::byte_prefix(&tokens);
        assert_eq!(prefix, vec![0, 1, 5, 6, 16]);
        assert_eq!(Block::new(0, 2).to_byte_range(&prefix), 0..5);
        assert_eq!(Block::new(2, 4).to_byte_range(&prefix), 5..16);
        assert_eq!(Block::new(4, 4).to_byte_range(&prefix), 16..16);
    }

    #[test]
    fn test_single_block_splitter() {
        let tokens = vec![Token::Literal(0); 10];
        assert_eq!(SingleBlockSplitter.split(&tokens).unwrap(), vec![Block::new(0, 10)]);
        assert_eq!(SingleBlockSplitter.split(&[]).unwrap(), vec![Block::new(0, 0)]);
    }
}
