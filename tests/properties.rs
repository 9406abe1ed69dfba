//! Property-based tests for the encoder pipeline.

use flate2::read::DeflateDecoder;
use optiflate::huffman::build_alphabet;
use optiflate::{
    compress, CompressionConfig, CompressionLevel, Compressor, CostModel, ExhaustiveMatchFinder,
    HashChainConfig, HashChainMatchFinder, MatchFinder, OptimalParser, Token,
};
use proptest::prelude::*;
use std::io::Read;

fn inflate(compressed: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    DeflateDecoder::new(compressed).read_to_end(&mut out).unwrap();
    out
}

/// Bytes over a small alphabet so matches are common
fn repetitive_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcd".to_vec()), 0..max_len)
}

fn kraft_sum(lengths: &[u8]) -> f64 {
    lengths.iter().filter(|&&l| l > 0).map(|&l| 2f64.powi(-(l as i32))).sum()
}

/// Cheapest cost over every tokenization the finder allows
fn brute_force<'a>(
    input: &[u8],
    finder: &mut impl MatchFinder<'a>,
    costs: &CostModel,
    i: usize,
) -> u64 {
    if i == input.len() {
        return costs.cost_eob() as u64;
    }
    let mut best = costs.cost_literal(input[i]) as u64 + brute_force(input, finder, costs, i + 1);
    let mut candidates = Vec::new();
    finder.matches_at(i, &mut candidates).unwrap();
    for c in candidates {
        let next = i + c.length as usize;
        if next <= input.len() {
            let cost = costs.cost_match(c.length, c.distance).unwrap() as u64
                + brute_force(input, finder, costs, next);
            best = best.min(cost);
        }
    }
    best
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_any_bytes(data in prop::collection::vec(any::<u8>(), 0..2048), level in 1u8..=9) {
        let compressed = compress(&data, level).unwrap();
        prop_assert_eq!(inflate(&compressed), data);
    }

    #[test]
    fn prop_round_trip_repetitive(data in repetitive_bytes(4096), level in 1u8..=9) {
        let compressed = compress(&data, level).unwrap();
        prop_assert_eq!(inflate(&compressed), data);
    }

    #[test]
    fn prop_round_trip_exhaustive_finder(data in repetitive_bytes(512)) {
        let config = CompressionConfig {
            finder: optiflate::FinderKind::Exhaustive,
            ..CompressionConfig::from_level(CompressionLevel::Level7)
        };
        let compressed = Compressor::new(config).unwrap().compress(&data).unwrap();
        prop_assert_eq!(inflate(&compressed), data);
    }

    #[test]
    fn prop_huffman_lengths_are_complete(freqs in prop::collection::vec(0u32..100_000, 2..286)) {
        let alphabet = build_alphabet(&freqs, 15).unwrap();
        let lengths = alphabet.lengths();
        prop_assert!(lengths.iter().all(|&l| l <= 15));
        prop_assert!((kraft_sum(lengths) - 1.0).abs() < 1e-9);
        // Every used symbol has a code
        for (sym, &f) in freqs.iter().enumerate() {
            if f > 0 {
                prop_assert!(lengths[sym] > 0);
            }
        }
    }

    #[test]
    fn prop_huffman_codes_are_prefix_free(freqs in prop::collection::vec(0u32..1000, 2..64)) {
        let alphabet = build_alphabet(&freqs, 7).unwrap();
        let used: Vec<usize> = (0..alphabet.len()).filter(|&s| alphabet.code_length(s) > 0).collect();
        for (i, &a) in used.iter().enumerate() {
            for &b in &used[i + 1..] {
                let width = alphabet.code_length(a).min(alphabet.code_length(b));
                let mask = (1u32 << width) - 1;
                prop_assert_ne!(alphabet.codes()[a] & mask, alphabet.codes()[b] & mask);
            }
        }
    }

    #[test]
    fn prop_hash_chain_candidates_are_valid(data in repetitive_bytes(2048), window in 1usize..=4096) {
        let mut finder = HashChainMatchFinder::new(HashChainConfig { window_size: window, ..Default::default() });
        finder.reset(&data);
        let mut out = Vec::new();
        for i in 0..data.len() {
            finder.matches_at(i, &mut out).unwrap();
            for c in &out {
                let (len, dist) = (c.length as usize, c.distance as usize);
                prop_assert!((3..=258).contains(&len));
                prop_assert!(dist >= 1 && dist <= window && dist <= i);
                prop_assert!(i + len <= data.len());
                prop_assert_eq!(&data[i - dist..i - dist + len], &data[i..i + len]);
            }
        }
    }

    #[test]
    fn prop_parse_matches_brute_force(data in repetitive_bytes(12)) {
        let mut finder = ExhaustiveMatchFinder::default();
        finder.reset(&data);
        let costs = CostModel::fixed();
        let result = OptimalParser::new().parse(&data, &mut finder, costs, 0..data.len()).unwrap();
        prop_assert_eq!(result.total_bits, brute_force(&data, &mut finder, costs, 0));
        prop_assert_eq!(result.total_bits, costs.cost_payload(&result.tokens).unwrap());
    }

    #[test]
    fn prop_parse_covers_input(data in repetitive_bytes(1024)) {
        let mut finder = HashChainMatchFinder::default();
        finder.reset(&data);
        let result =
            OptimalParser::new().parse(&data, &mut finder, CostModel::fixed(), 0..data.len()).unwrap();
        let covered: usize = result
            .tokens
            .iter()
            .map(|t| match t {
                Token::Literal(_) => 1,
                Token::Match { length, .. } => *length as usize,
            })
            .sum();
        prop_assert_eq!(covered, data.len());
    }
}
