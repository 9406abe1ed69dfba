use super::cost::CostModel;
use crate::deflate::tokens::{Candidate, Token};
use crate::error::{Error, Result};
use crate::lz::MatchFinder;
use std::ops::Range;

/// Output of one parse
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseResult {
    pub tokens: Vec<Token>,
    /// Payload bits including end-of-block, excluding any block header
    pub total_bits: u64,
}

/// Shortest-path parser over token boundaries.
///
/// Fills `dp[i]` = cheapest encoding of the suffix at `i` from the end of the
/// range backward, then walks forward along the recorded choices. Ties between
/// equally cheap options go to the longer match, then to the smaller distance.
/// A literal only wins when strictly cheaper than every match.
///
/// Scratch tables are kept between calls so a parser can be reused across
/// passes without reallocating.
#[derive(Debug, Default)]
pub struct OptimalParser {
    dp: Vec<u64>,
    /// Chosen match length per position, 0 for a literal
    choice: Vec<u16>,
    dist: Vec<u16>,
    candidates: Vec<Candidate>,
}

impl OptimalParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `input[range]` under `costs`.
    ///
    /// `finder` must have been reset with `input`. Matches may reach back
    /// before `range.start` but never past `range.end`.
    pub fn parse<'a, F: MatchFinder<'a>>(
        &mut self,
        input: &[u8],
        finder: &mut F,
        costs: &CostModel,
        range: Range<usize>,
    ) -> Result<ParseResult> {
        let Range { start, end } = range;
        if start > end || end > input.len() {
            return Err(Error::InvalidRange { start, end, len: input.len() });
        }
        let n = end - start;

        self.dp.clear();
        self.dp.resize(n + 1, u64::MAX);
        self.choice.clear();
        self.choice.resize(n, 0);
        self.dist.clear();
        self.dist.resize(n, 0);
        self.dp[n] = costs.cost_eob() as u64;

        for i in (0..n).rev() {
            let pos = start + i;
            let mut best = costs.cost_literal(input[pos]) as u64 + self.dp[i + 1];
            let mut best_len = 0u16;
            let mut best_dist = 0u16;

            finder.matches_at(pos, &mut self.candidates)?;
            for c in &self.candidates {
                let len = c.length as usize;
                if len > n - i {
                    continue;
                }
                let cost = costs.cost_match(c.length, c.distance)? as u64 + self.dp[i + len];
                let wins = cost < best
                    || (cost == best
                        && (best_len == 0
                            || c.length > best_len
                            || (c.length == best_len && c.distance < best_dist)));
                if wins {
                    best = cost;
                    best_len = c.length;
                    best_dist = c.distance;
                }
            }

            self.dp[i] = best;
            self.choice[i] = best_len;
            self.dist[i] = best_dist;
        }

        let mut tokens = Vec::with_capacity(n / 2 + 1);
        let mut i = 0;
        while i < n {
            match self.choice[i] {
                0 => {
                    tokens.push(Token::Literal(input[start + i]));
                    i += 1;
                }
                length => {
                    tokens.push(Token::Match { length, distance: self.dist[i] });
                    i += length as usize;
                }
            }
        }

        Ok(ParseResult { tokens, total_bits: self.dp[0] })
    }
}
