use super::{Block, BlockSplitter};
use crate::deflate::tokens::Token;
use crate::error::Result;
use crate::format::estimate_dynamic_bits;
use crate::huffman::FrequencyCounter;

/// Tunables for [`GreedyBlockSplitter`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitConfig {
    /// Ranges this small are never split, and no split leaves a side smaller
    pub min_tokens_per_block: usize,
    /// Stride of the first scan over candidate split points
    pub coarse_step: usize,
    /// Distance either side of the coarse winner covered by the second scan
    pub refine_radius: usize,
    /// Stride of the second scan
    pub refine_step: usize,
    /// Bits a split must save before it is taken
    pub gain_threshold_bits: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            min_tokens_per_block: 300,
            coarse_step: 1024,
            refine_radius: 2048,
            refine_step: 256,
            gain_threshold_bits: 128,
        }
    }
}

/// Recursive two-way splitter.
///
/// For a range, finds the split point that saves the most bits when both
/// halves are coded as separate dynamic blocks: a coarse scan over the whole
/// range, then a finer scan around the coarse winner. The split is taken when
/// the saving exceeds the threshold, and both halves are split again. Block
/// sizes come from [`estimate_dynamic_bits`] over histograms that are updated
/// incrementally as the split point moves.
#[derive(Clone, Debug, Default)]
pub struct GreedyBlockSplitter {
    config: SplitConfig,
}

/// Best split found by one scan
#[derive(Clone, Copy, Debug)]
struct SplitPoint {
    at: usize,
    gain: i64,
}

impl GreedyBlockSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    fn split_range(&self, tokens: &[Token], start: usize, end: usize, out: &mut Vec<Block>) -> Result<()> {
        let min = self.config.min_tokens_per_block.max(1);
        if end - start <= min {
            out.push(Block::new(start, end));
            return Ok(());
        }

        let whole = estimate_dynamic_bits(&FrequencyCounter::from_tokens(&tokens[start..end])?)?;
        let lo = start + min;
        let hi = end - min;

        let coarse = self.scan(tokens, start, end, lo, hi, self.config.coarse_step, whole)?;
        let best = match coarse {
            Some(c) => {
                let r_lo = c.at.saturating_sub(self.config.refine_radius).max(lo);
                let r_hi = c.at.saturating_add(self.config.refine_radius).min(hi);
                match self.scan(tokens, start, end, r_lo, r_hi, self.config.refine_step, whole)? {
                    Some(r) if r.gain > c.gain => Some(r),
                    _ => Some(c),
                }
            }
            None => None,
        };

        match best {
            Some(c) if clears_threshold(c.gain, self.config.gain_threshold_bits) => {
                log::debug!(
                    "split tokens {}..{} at {} saves {} bits of {}",
                    start,
                    end,
                    c.at,
                    c.gain,
                    whole
                );
                self.split_range(tokens, start, c.at, out)?;
                self.split_range(tokens, c.at, end, out)
            }
            _ => {
                out.push(Block::new(start, end));
                Ok(())
            }
        }
    }

    /// Try split points `lo, lo + step, ...` up to `hi`
    #[allow(clippy::too_many_arguments)]
    fn scan(
        &self,
        tokens: &[Token],
        start: usize,
        end: usize,
        lo: usize,
        hi: usize,
        step: usize,
        whole: u64,
    ) -> Result<Option<SplitPoint>> {
        if lo > hi {
            return Ok(None);
        }
        let step = step.max(1);
        let mut left = FrequencyCounter::from_tokens(&tokens[start..lo])?;
        let mut right = FrequencyCounter::from_tokens(&tokens[lo..end])?;

        let mut best: Option<SplitPoint> = None;
        let mut at = lo;
        loop {
            let cost = estimate_dynamic_bits(&left)? + estimate_dynamic_bits(&right)?;
            let gain = whole as i64 - cost as i64;
            if best.map_or(true, |b| gain > b.gain) {
                best = Some(SplitPoint { at, gain });
            }

            let next = at + step;
            if next > hi {
                break;
            }
            for token in &tokens[at..next] {
                left.add(token)?;
                right.remove(token)?;
            }
            at = next;
        }
        Ok(best)
    }
}

/// Whether a (possibly negative) saving is larger than `threshold`
fn clears_threshold(gain: i64, threshold: u64) -> bool {
    u64::try_from(gain).map_or(false, |gain| gain > threshold)
}

impl BlockSplitter for GreedyBlockSplitter {
    fn split(&mut self, tokens: &[Token]) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        self.split_range(tokens, 0, tokens.len(), &mut blocks)?;
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(blocks: &[Block], len: usize) {
        assert_eq!(blocks.first().map(|b| b.start), Some(0));
        assert_eq!(blocks.last().map(|b| b.end), Some(len));
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    /// Two halves with disjoint literal alphabets
    fn two_regimes() -> Vec<Token> {
        let mut tokens: Vec<Token> = (0..4000).map(|i| Token::Literal(b'a' + (i % 4) as u8)).collect();
        tokens.extend((0..4000).map(|i| Token::Literal(200 + (i % 50) as u8)));
        tokens
    }

    #[test]
    fn test_small_input_unsplit() {
        let tokens = vec![Token::Literal(1); 100];
        let blocks = GreedyBlockSplitter::default().split(&tokens).unwrap();
        assert_eq!(blocks, vec![Block::new(0, 100)]);
        assert_eq!(GreedyBlockSplitter::default().split(&[]).unwrap(), vec![Block::new(0, 0)]);
    }

    #[test]
    fn test_uniform_input_unsplit() {
        let tokens: Vec<Token> = (0..10_000).map(|i| Token::Literal((i % 7) as u8)).collect();
        let blocks = GreedyBlockSplitter::default().split(&tokens).unwrap();
        assert_eq!(blocks, vec![Block::new(0, 10_000)]);
    }

    #[test]
    fn test_splits_at_regime_change() {
        let tokens = two_regimes();
        let blocks = GreedyBlockSplitter::default().split(&tokens).unwrap();
        assert_covers(&blocks, tokens.len());
        assert!(blocks.len() >= 2);
        // Sides shorter than the minimum block can't be cut off, so the
        // boundary lands near the change rather than on it
        assert!(blocks.iter().any(|b| (3700..=4300).contains(&b.end)), "{:?}", blocks);
        assert!(blocks.iter().all(|b| b.len() >= 300));
    }

    #[test]
    fn test_split_saves_bits() {
        let tokens = two_regimes();
        let blocks = GreedyBlockSplitter::default().split(&tokens).unwrap();
        let whole = estimate_dynamic_bits(&FrequencyCounter::from_tokens(&tokens).unwrap()).unwrap();
        let parts: u64 = blocks
            .iter()
            .map(|b| {
                estimate_dynamic_bits(&FrequencyCounter::from_tokens(&tokens[b.start..b.end]).unwrap())
                    .unwrap()
            })
            .sum();
        assert!(parts + 128 < whole);
    }

    #[test]
    fn test_threshold_blocks_split() {
        let tokens = two_regimes();
        for threshold in [u64::MAX / 4, i64::MAX as u64 + 1, u64::MAX] {
            let config = SplitConfig { gain_threshold_bits: threshold, ..Default::default() };
            let blocks = GreedyBlockSplitter::new(config).split(&tokens).unwrap();
            assert_eq!(blocks, vec![Block::new(0, tokens.len())], "threshold {}", threshold);
        }
    }

    #[test]
    fn test_clears_threshold() {
        assert!(clears_threshold(129, 128));
        assert!(!clears_threshold(128, 128));
        assert!(!clears_threshold(-5, 0));
        assert!(!clears_threshold(i64::MAX, u64::MAX));
        assert!(clears_threshold(1, 0));
    }

    #[test]
    fn test_no_split_leaves_a_short_side() {
        // Between min and 2 * min tokens every cut would leave one side short
        let mut tokens: Vec<Token> = (0..300).map(|i| Token::Literal(b'a' + (i % 4) as u8)).collect();
        tokens.extend((0..299).map(|i| Token::Literal(200 + (i % 50) as u8)));
        let config = SplitConfig { gain_threshold_bits: 0, ..Default::default() };
        let blocks = GreedyBlockSplitter::new(config.clone()).split(&tokens).unwrap();
        assert_eq!(blocks, vec![Block::new(0, 599)]);

        // At 2 * min the only legal cut is the middle
        tokens.push(Token::Literal(201));
        let blocks = GreedyBlockSplitter::new(config).split(&tokens).unwrap();
        assert_eq!(blocks, vec![Block::new(0, 300), Block::new(300, 600)]);
    }
}
