//! Match finding: proposes back-reference candidates for each input position.

pub mod caching;
pub mod exhaustive;
pub mod hash_chain;

pub use caching::CachingMatchFinder;
pub use exhaustive::ExhaustiveMatchFinder;
pub use hash_chain::{HashChainConfig, HashChainMatchFinder};

use crate::deflate::tables::{
    distance_code_index, length_code_index, LENGTH_TABLE, MAX_DISTANCE, MAX_MATCH,
    NUM_LENGTH_CODES,
};
use crate::deflate::tokens::Candidate;
use crate::error::Result;

/// Default sliding window (32 KiB, the DEFLATE maximum)
pub const DEFAULT_WINDOW_SIZE: usize = MAX_DISTANCE as usize;

/// Source of match candidates over one input buffer
///
/// Candidates returned for `index` always have a length in 3-258, a distance
/// no larger than the finder's window, start at or after the buffer start and
/// end at or before the buffer end.
pub trait MatchFinder<'a> {
    /// Associate the finder with `input`, dropping any state from a previous buffer
    fn reset(&mut self, input: &'a [u8]);

    /// Replace the contents of `out` with the candidates starting at `index`
    fn matches_at(&mut self, index: usize, out: &mut Vec<Candidate>) -> Result<()>;
}

/// Number of equal bytes at `older` and `current`, up to `max_len`
#[inline]
pub(crate) fn match_length(data: &[u8], older: usize, current: usize, max_len: usize) -> usize {
    let a = &data[older..older + max_len];
    let b = &data[current..current + max_len];

    let mut len = 0;
    for (x, y) in a.chunks_exact(8).zip(b.chunks_exact(8)) {
        if x != y {
            break;
        }
        len += 8;
    }
    len + a[len..].iter().zip(&b[len..]).take_while(|(x, y)| x == y).count()
}

/// Clamp a configured window to 1-32768
#[inline]
pub(crate) fn effective_window(window_size: usize) -> usize {
    window_size.clamp(1, DEFAULT_WINDOW_SIZE)
}

/// Longest length still coded with length code `lc`
fn length_code_cap(lc: usize) -> u16 {
    let (base, extra) = LENGTH_TABLE[lc];
    let span = base as u32 + (1u32 << extra) - 1;
    let next_base = LENGTH_TABLE.get(lc + 1).map(|&(b, _)| b as u32 - 1).unwrap_or(MAX_MATCH as u32);
    span.min(next_base) as u16
}

/// Expand raw matches at one position into boundary lengths per length code.
///
/// For every length code some raw match can reach, emits the longest length
/// that code allows (with the cheapest distance achieving it) and, when
/// different, the code's base length (with the cheapest distance reaching it).
/// "Cheapest" orders by distance code, then by raw distance. At most two
/// candidates per length code, so at most 58 in total.
pub fn sublen_candidates(raw: &[Candidate], out: &mut Vec<Candidate>) -> Result<()> {
    out.clear();
    if raw.is_empty() {
        return Ok(());
    }

    // (length, distance code, distance) per length code
    let mut max_pick = [(0u16, usize::MAX, u16::MAX); NUM_LENGTH_CODES];
    // (distance code, distance) per length code
    let mut base_pick = [(usize::MAX, u16::MAX); NUM_LENGTH_CODES];

    for c in raw {
        let dc = distance_code_index(c.distance)?;
        let lc_max = length_code_index(c.length)?;
        for lc in 0..=lc_max {
            let feasible = c.length.min(length_code_cap(lc));
            let (cur_len, cur_dc, cur_dist) = max_pick[lc];
            if feasible > cur_len || (feasible == cur_len && (dc, c.distance) < (cur_dc, cur_dist)) {
                max_pick[lc] = (feasible, dc, c.distance);
            }
            if (dc, c.distance) < base_pick[lc] {
                base_pick[lc] = (dc, c.distance);
            }
        }
    }

    for lc in 0..NUM_LENGTH_CODES {
        let (max_len, _, max_dist) = max_pick[lc];
        if max_len == 0 {
            continue;
        }
        out.push(Candidate::new(max_len, max_dist));
        let base = LENGTH_TABLE[lc].0;
        if max_len != base {
            out.push(Candidate::new(base, base_pick[lc].1));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_code_cap() {
        assert_eq!(length_code_cap(0), 3);
        assert_eq!(length_code_cap(8), 12);
        assert_eq!(length_code_cap(27), 257);
        assert_eq!(length_code_cap(28), 258);
    }

    #[test]
    fn test_sublen_single_match() {
        let mut out = Vec::new();
        sublen_candidates(&[Candidate::new(12, 5)], &mut out).unwrap();
        // Codes for 3..=10 are single-length, 11-12 share one code
        let lengths: Vec<u16> = out.iter().map(|c| c.length).collect();
        assert_eq!(lengths, vec![3, 4, 5, 6, 7, 8, 9, 10, 12, 11]);
        assert!(out.iter().all(|c| c.distance == 5));
    }

    #[test]
    fn test_sublen_never_overstates_a_distance() {
        // The long match is far away, the near one is short: the code for
        // 11-12 may only pair length 12 with the far distance.
        let raw = [Candidate::new(12, 900), Candidate::new(11, 1)];
        let mut out = Vec::new();
        sublen_candidates(&raw, &mut out).unwrap();
        assert!(out.contains(&Candidate::new(12, 900)));
        assert!(out.contains(&Candidate::new(11, 1)));
        assert!(!out.contains(&Candidate::new(12, 1)));
        for c in &out {
            let reach = raw.iter().filter(|r| r.distance == c.distance).map(|r| r.length).max();
            assert!(reach.unwrap() >= c.length, "{:?} exceeds its source match", c);
        }
    }

    #[test]
    fn test_sublen_bounded() {
        let raw: Vec<Candidate> = (1..=40u16).map(|d| Candidate::new(258, d * 700)).collect();
        let mut out = Vec::new();
        sublen_candidates(&raw, &mut out).unwrap();
        assert!(out.len() <= 58);
        assert!(out.iter().all(|c| c.distance == 700));
        assert!(out.contains(&Candidate::new(258, 700)));
        assert!(out.contains(&Candidate::new(257, 700)));
        assert!(out.contains(&Candidate::new(227, 700)));
    }

    #[test]
    fn test_match_length() {
        let data = b"abcabcabX";
        assert_eq!(match_length(data, 0, 3, 6), 5);
        assert_eq!(match_length(data, 0, 6, 3), 2);

        let long = [b"0123456789abcdef".as_slice(); 3].concat();
        assert_eq!(match_length(&long, 0, 16, 32), 32);
        assert_eq!(match_length(&long, 1, 16, 30), 0);
        let mut bent = long.clone();
        bent[16 + 19] = b'!';
        assert_eq!(match_length(&bent, 0, 16, 32), 19);
    }
}
