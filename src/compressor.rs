use crate::bits::{BitSink, BitWriter};
use crate::deflate::tokens::Token;
use crate::error::Result;
use crate::format::{
    estimate_fixed_bits, write_dynamic_block, write_dynamic_block_with, write_fixed_block,
    MAX_BLOCK_TOKENS,
};
use crate::huffman::HuffmanAlphabet;
use crate::lz::{CachingMatchFinder, ExhaustiveMatchFinder, HashChainMatchFinder, MatchFinder};
use crate::parse::{CostModel, MultiPassOptimizer, OptimalParser};
use crate::split::{Block, BlockSplitter, GreedyBlockSplitter, SingleBlockSplitter};
use crate::{BlockMode, CompressionConfig, FinderKind};
use std::io::Write;

/// Statistics from one compression run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompressStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Blocks written, after splitting large blocks at the token cap
    pub blocks: u64,
    pub fixed_blocks: u64,
    pub dynamic_blocks: u64,
    pub literals: u64,
    pub matches: u64,
    /// Multi-pass parses run over all blocks
    pub passes: u64,
}

/// How one block will be coded
enum Encoding {
    Fixed,
    Dynamic { literal: HuffmanAlphabet, distance: HuffmanAlphabet },
}

struct PlannedBlock {
    tokens: Vec<Token>,
    encoding: Encoding,
}

/// End-to-end DEFLATE encoder
///
/// Pipeline per input:
/// 1. parse the whole input once under the fixed code,
/// 2. split those tokens into blocks (levels with splitting enabled),
/// 3. re-optimize each block's byte range with multi-pass parsing,
/// 4. pick fixed or dynamic coding per block,
/// 5. write the blocks back-to-back and pad the last byte.
#[derive(Clone, Debug)]
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    /// Create a compressor, rejecting invalid settings
    pub fn new(config: CompressionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress `input` into a raw DEFLATE stream
    pub fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.compress_with_stats(input).map(|(data, _)| data)
    }

    /// Compress `input` and write the stream to `output`
    pub fn compress_to<W: Write>(&mut self, input: &[u8], mut output: W) -> Result<CompressStats> {
        let (data, stats) = self.compress_with_stats(input)?;
        output.write_all(&data)?;
        output.flush()?;
        Ok(stats)
    }

    pub fn compress_with_stats(&mut self, input: &[u8]) -> Result<(Vec<u8>, CompressStats)> {
        match self.config.finder {
            FinderKind::Exhaustive => {
                let finder = ExhaustiveMatchFinder::new(self.config.hash_chain.window_size);
                self.run(input, finder)
            }
            FinderKind::HashChain => {
                let finder = HashChainMatchFinder::new(self.config.hash_chain.clone());
                self.run(input, finder)
            }
        }
    }

    fn run<'a, F: MatchFinder<'a>>(
        &self,
        input: &'a [u8],
        mut finder: F,
    ) -> Result<(Vec<u8>, CompressStats)> {
        let mut stats = CompressStats { input_bytes: input.len() as u64, ..Default::default() };

        // One pass over every position, nothing to memoize yet
        finder.reset(input);
        let initial =
            OptimalParser::new().parse(input, &mut finder, CostModel::fixed(), 0..input.len())?;

        let planned = if self.config.block_mode == BlockMode::Fixed {
            vec![PlannedBlock { tokens: initial.tokens, encoding: Encoding::Fixed }]
        } else {
            // Re-parses happen per block, so the cache follows the block
            let mut cached = CachingMatchFinder::new(finder);
            let planned = self.plan_blocks(input, &mut cached, initial.tokens, &mut stats)?;
            log::debug!("match cache: {} hits, {} misses", cached.hits(), cached.misses());
            planned
        };

        let mut writer = BitWriter::with_capacity(input.len() / 2 + 16);
        let chunks: usize = planned.iter().map(|p| chunk_tokens(&p.tokens).len()).sum();
        let mut written = 0;
        for block in &planned {
            for chunk in chunk_tokens(&block.tokens) {
                written += 1;
                let is_final = written == chunks;
                match &block.encoding {
                    Encoding::Fixed => {
                        write_fixed_block(&mut writer, chunk, is_final)?;
                        stats.fixed_blocks += 1;
                    }
                    Encoding::Dynamic { literal, distance } => {
                        // Oversized blocks get a code per chunk
                        if chunk.len() == block.tokens.len() {
                            write_dynamic_block_with(&mut writer, chunk, literal, distance, is_final)?;
                        } else {
                            write_dynamic_block(&mut writer, chunk, is_final)?;
                        }
                        stats.dynamic_blocks += 1;
                    }
                }
                for token in chunk {
                    match token {
                        Token::Literal(_) => stats.literals += 1,
                        Token::Match { .. } => stats.matches += 1,
                    }
                }
            }
        }
        writer.align_to_byte();
        let output = writer.finish();

        stats.blocks = written as u64;
        stats.output_bytes = output.len() as u64;
        log::info!(
            "compressed {} bytes into {} bytes ({} blocks: {} fixed, {} dynamic)",
            stats.input_bytes,
            stats.output_bytes,
            stats.blocks,
            stats.fixed_blocks,
            stats.dynamic_blocks
        );

        Ok((output, stats))
    }

    /// Split, re-optimize and choose a coding for every block
    fn plan_blocks<'a, F: MatchFinder<'a>>(
        &self,
        input: &[u8],
        finder: &mut CachingMatchFinder<F>,
        tokens: Vec<Token>,
        stats: &mut CompressStats,
    ) -> Result<Vec<PlannedBlock>> {
        let mut splitter: Box<dyn BlockSplitter> = match &self.config.split {
            Some(split) => Box::new(GreedyBlockSplitter::new(split.clone())),
            None => Box::new(SingleBlockSplitter),
        };
        let blocks = splitter.split(&tokens)?;
        let prefix = Block::byte_prefix(&tokens);
        log::debug!("{} tokens split into {} blocks", tokens.len(), blocks.len());

        let mut optimizer = MultiPassOptimizer::new(self.config.passes.clone());
        let mut planned = Vec::with_capacity(blocks.len());

        for block in &blocks {
            let range = block.to_byte_range(&prefix);
            // Finished blocks are never parsed again
            finder.focus(range.clone());
            let result = optimizer.optimize(input, finder, range.clone(), None)?;
            stats.passes += result.passes as u64;

            let fixed_tokens = &tokens[block.start..block.end];
            let use_fixed = self.config.block_mode == BlockMode::Auto
                && estimate_fixed_bits(fixed_tokens)? < result.total_bits;

            log::debug!(
                "block bytes {}..{}: {} coding, dynamic estimate {} bits after {} passes",
                range.start,
                range.end,
                if use_fixed { "fixed" } else { "dynamic" },
                result.total_bits,
                result.passes
            );

            planned.push(if use_fixed {
                PlannedBlock { tokens: fixed_tokens.to_vec(), encoding: Encoding::Fixed }
            } else {
                PlannedBlock {
                    tokens: result.tokens,
                    encoding: Encoding::Dynamic { literal: result.literal, distance: result.distance },
                }
            });
        }

        Ok(planned)
    }
}

/// Cut a block into pieces of at most `MAX_BLOCK_TOKENS`; an empty block stays one piece
fn chunk_tokens(tokens: &[Token]) -> Vec<&[Token]> {
    if tokens.is_empty() {
        return vec![tokens];
    }
    tokens.chunks(MAX_BLOCK_TOKENS).collect()
}
