use super::{write_block_header, write_payload, BlockType};
use crate::bits::{BitCounter, BitSink};
use crate::deflate::tables::{CODE_LENGTH_ORDER, NUM_DISTANCE_CODES};
use crate::deflate::tokens::{Token, END_OF_BLOCK, NUM_LITLEN_SYMBOLS};
use crate::error::Result;
use crate::huffman::tables::{MAX_CL_CODE_LENGTH, MAX_CODE_LENGTH, NUM_CL_SYMBOLS};
use crate::huffman::{build_alphabet, FrequencyCounter, HuffmanAlphabet};

/// Literal/length and distance alphabets for a block with histogram `freq`.
///
/// A block without matches gets a single one-bit distance code, the smallest
/// distance alphabet the format allows.
pub fn build_dynamic_alphabets(
    freq: &FrequencyCounter,
) -> Result<(HuffmanAlphabet, HuffmanAlphabet)> {
    let literal = build_alphabet(&freq.literal_freq, MAX_CODE_LENGTH)?;
    let distance = if freq.has_distances() {
        build_alphabet(&freq.distance_freq, MAX_CODE_LENGTH)?
    } else {
        let mut lengths = [0u8; NUM_DISTANCE_CODES];
        lengths[0] = 1;
        HuffmanAlphabet::from_lengths(&lengths)?
    };
    Ok((literal, distance))
}

/// Transmitted code counts: literal/length in 257-286, distance in 1-30
fn code_counts(literal: &HuffmanAlphabet, distance: &HuffmanAlphabet) -> (usize, usize) {
    let last_lit = (0..NUM_LITLEN_SYMBOLS)
        .rev()
        .find(|&s| literal.code_length(s) != 0)
        .unwrap_or(0)
        .max(END_OF_BLOCK);
    let last_dist = (0..NUM_DISTANCE_CODES).rev().find(|&s| distance.code_length(s) != 0).unwrap_or(0);
    ((last_lit + 1).clamp(257, 286), (last_dist + 1).clamp(1, 30))
}

/// RLE encode code lengths using symbols 16, 17, 18
///
/// Returns (symbol, extra value) pairs.
pub fn rle_encode_lengths(lengths: &[u8]) -> Vec<(u8, u8)> {
    let mut result = Vec::new();
    let mut i = 0;

    while i < lengths.len() {
        let len = lengths[i];
        let mut run = lengths[i..].iter().take_while(|&&l| l == len).count();
        i += run;

        if len == 0 {
            while run > 0 {
                if run >= 11 {
                    // Symbol 18: 11-138 zeros
                    let count = run.min(138);
                    result.push((18, (count - 11) as u8));
                    run -= count;
                } else if run >= 3 {
                    // Symbol 17: 3-10 zeros
                    let count = run.min(10);
                    result.push((17, (count - 3) as u8));
                    run -= count;
                } else {
                    result.push((0, 0));
                    run -= 1;
                }
            }
        } else {
            // First length goes out as is, the rest repeat it with symbol 16
            result.push((len, 0));
            run -= 1;
            while run > 0 {
                if run >= 3 {
                    let count = run.min(6);
                    result.push((16, (count - 3) as u8));
                    run -= count;
                } else {
                    result.push((len, 0));
                    run -= 1;
                }
            }
        }
    }

    result
}

/// Write HLIT, HDIST, HCLEN, the code-length code and the RLE'd code lengths
/// (RFC 1951 section 3.2.7)
pub fn write_dynamic_header<S: BitSink>(
    sink: &mut S,
    literal: &HuffmanAlphabet,
    distance: &HuffmanAlphabet,
) -> Result<()> {
    let (lit_count, dist_count) = code_counts(literal, distance);

    let combined: Vec<u8> = (0..lit_count)
        .map(|s| literal.code_length(s))
        .chain((0..dist_count).map(|s| distance.code_length(s)))
        .collect();
    let rle_encoded = rle_encode_lengths(&combined);

    let mut cl_freq = [0u32; NUM_CL_SYMBOLS];
    for &(sym, _) in &rle_encoded {
        cl_freq[sym as usize] += 1;
    }
    let cl_alphabet = build_alphabet(&cl_freq, MAX_CL_CODE_LENGTH)?;

    // Trailing zero lengths in transmission order are implied, but at least 4 are sent
    let hclen = CODE_LENGTH_ORDER
        .iter()
        .rposition(|&sym| cl_alphabet.code_length(sym) != 0)
        .map_or(0, |i| i + 1)
        .max(4);

    sink.write_bits((lit_count - 257) as u32, 5)?;
    sink.write_bits((dist_count - 1) as u32, 5)?;
    sink.write_bits((hclen - 4) as u32, 4)?;

    for &sym in CODE_LENGTH_ORDER.iter().take(hclen) {
        sink.write_bits(cl_alphabet.code_length(sym) as u32, 3)?;
    }

    for &(sym, extra) in &rle_encoded {
        cl_alphabet.write_symbol(sink, sym as usize)?;
        match sym {
            16 => sink.write_bits(extra as u32, 2)?, // 3-6 repeats
            17 => sink.write_bits(extra as u32, 3)?, // 3-10 zeros
            18 => sink.write_bits(extra as u32, 7)?, // 11-138 zeros
            _ => {}
        }
    }

    Ok(())
}

/// Exact header size of [`write_dynamic_header`] for these alphabets
pub fn dynamic_header_bits(literal: &HuffmanAlphabet, distance: &HuffmanAlphabet) -> Result<u64> {
    let mut counter = BitCounter::new();
    write_dynamic_header(&mut counter, literal, distance)?;
    Ok(counter.bits_written())
}

/// Write one dynamic block (BTYPE=10) coded with the given alphabets
pub fn write_dynamic_block_with<S: BitSink>(
    sink: &mut S,
    tokens: &[Token],
    literal: &HuffmanAlphabet,
    distance: &HuffmanAlphabet,
    is_final: bool,
) -> Result<()> {
    write_block_header(sink, BlockType::Dynamic, is_final)?;
    write_dynamic_header(sink, literal, distance)?;
    write_payload(sink, tokens, literal, distance)
}

/// Write one dynamic block with alphabets built from its own histogram
pub fn write_dynamic_block<S: BitSink>(sink: &mut S, tokens: &[Token], is_final: bool) -> Result<()> {
    let freq = FrequencyCounter::from_tokens(tokens)?;
    let (literal, distance) = build_dynamic_alphabets(&freq)?;
    write_dynamic_block_with(sink, tokens, &literal, &distance, is_final)
}

/// Exact size in bits of a dynamic block whose tokens have histogram `freq`
pub fn estimate_dynamic_bits(freq: &FrequencyCounter) -> Result<u64> {
    let (literal, distance) = build_dynamic_alphabets(freq)?;
    let header = dynamic_header_bits(&literal, &distance)?;

    let weighted = |counts: &[u32], alphabet: &HuffmanAlphabet| -> u64 {
        counts.iter().enumerate().map(|(s, &f)| f as u64 * alphabet.code_length(s) as u64).sum()
    };
    let payload = weighted(&freq.literal_freq, &literal)
        + weighted(&freq.distance_freq, &distance)
        + freq.extra_bits;

    Ok(3 + header + payload)
}
