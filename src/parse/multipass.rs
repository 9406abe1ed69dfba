use super::cost::CostModel;
use super::optimal::OptimalParser;
use crate::deflate::tokens::{CodeLengths, Token};
use crate::error::{Error, Result};
use crate::format::{build_dynamic_alphabets, dynamic_header_bits};
use crate::huffman::{FrequencyCounter, HuffmanAlphabet};
use crate::lz::MatchFinder;
use std::ops::Range;

/// Multi-pass refinement settings
#[derive(Clone, Debug, PartialEq)]
pub struct MultiPassConfig {
    /// Upper bound on parse passes (at least 1)
    pub max_passes: usize,
    /// Stop once a pass improves on the previous one by less than this fraction
    pub epsilon: f64,
}

impl Default for MultiPassConfig {
    fn default() -> Self {
        Self { max_passes: 3, epsilon: 5e-4 }
    }
}

/// Best pass found by [`MultiPassOptimizer::optimize`]
#[derive(Clone, Debug)]
pub struct MultiPassResult {
    pub tokens: Vec<Token>,
    /// Model built from this pass's own histogram
    pub cost_model: CostModel,
    pub literal: HuffmanAlphabet,
    pub distance: HuffmanAlphabet,
    /// Whole dynamic block: 3 header bits + code description + payload
    pub total_bits: u64,
    pub header_bits: u64,
    pub payload_bits: u64,
    /// Passes actually run (not the index of the best one)
    pub passes: usize,
}

/// Alternates parsing and code rebuilding until the block size converges
#[derive(Debug, Default)]
pub struct MultiPassOptimizer {
    config: MultiPassConfig,
    parser: OptimalParser,
}

impl MultiPassOptimizer {
    pub fn new(config: MultiPassConfig) -> Self {
        Self { config, parser: OptimalParser::new() }
    }

    pub fn config(&self) -> &MultiPassConfig {
        &self.config
    }

    /// Optimize `input[range]` as one dynamic block.
    ///
    /// The first pass parses under `start` (the fixed model when `None`); each
    /// later pass parses under the code lengths of the pass before it. The
    /// finder is not reset here and must already hold `input`.
    pub fn optimize<'a, F: MatchFinder<'a>>(
        &mut self,
        input: &[u8],
        finder: &mut F,
        range: Range<usize>,
        start: Option<&CostModel>,
    ) -> Result<MultiPassResult> {
        let max_passes = self.config.max_passes.max(1);
        let mut model = match start {
            Some(model) => model.clone(),
            None => CostModel::fixed().clone(),
        };

        let mut best: Option<MultiPassResult> = None;
        let mut prev_total: Option<u64> = None;
        let mut prev_lengths: Option<CodeLengths> = None;
        let mut passes = 0;

        while passes < max_passes {
            passes += 1;
            let parsed = self.parser.parse(input, finder, &model, range.clone())?;

            let freq = FrequencyCounter::from_tokens(&parsed.tokens)?;
            let (literal, distance) = build_dynamic_alphabets(&freq)?;
            let header_bits = dynamic_header_bits(&literal, &distance)?;
            let next = CostModel::from_alphabets(&literal, &distance);
            let payload_bits = next.cost_payload(&parsed.tokens)?;
            let total_bits = 3 + header_bits + payload_bits;

            log::debug!(
                "pass {}: {} tokens, {} bits (header {}, payload {})",
                passes,
                parsed.tokens.len(),
                total_bits,
                header_bits,
                payload_bits
            );

            let lengths = next.code_lengths().clone();
            if best.as_ref().map_or(true, |b| total_bits < b.total_bits) {
                best = Some(MultiPassResult {
                    tokens: parsed.tokens,
                    cost_model: next.clone(),
                    literal,
                    distance,
                    total_bits,
                    header_bits,
                    payload_bits,
                    passes,
                });
            }

            if let Some(prev) = prev_total {
                let gain = (prev as f64 - total_bits as f64) / prev as f64;
                if gain < self.config.epsilon {
                    log::debug!("stopping after pass {}: relative gain {:.6}", passes, gain);
                    break;
                }
            }
            if prev_lengths.as_ref() == Some(&lengths) {
                log::debug!("stopping after pass {}: code lengths reached a fixed point", passes);
                break;
            }

            prev_total = Some(total_bits);
            prev_lengths = Some(lengths);
            model = next;
        }

        let mut result =
            best.ok_or_else(|| Error::InvalidConfig("multi-pass optimizer ran no passes".into()))?;
        result.passes = passes;
        Ok(result)
    }
}
