use super::{effective_window, match_length, sublen_candidates, MatchFinder, DEFAULT_WINDOW_SIZE};
use crate::deflate::tables::{
    distance_code_index, length_code_index, MAX_MATCH, MIN_MATCH, NUM_LENGTH_CODES,
};
use crate::deflate::tokens::Candidate;
use crate::error::Result;

const NO_POS: u32 = u32::MAX;
const NO_SLOT: u16 = u16::MAX;

/// Bucket index stride: one bucket per (length code, distance code)
const NUM_BUCKETS: usize = NUM_LENGTH_CODES * 32;

/// Tunables for [`HashChainMatchFinder`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashChainConfig {
    /// Sliding window in bytes (1-32768)
    pub window_size: usize,
    /// log2 of the hash head table size
    pub hash_bits: u8,
    /// Chain entries visited per position before giving up
    pub probe_limit: usize,
    /// Output size after which the walk may stop early
    pub max_per_position: usize,
    /// Match length considered good enough to stop searching
    pub nice_length: usize,
    /// Extra same-length-code hits to look for once `nice_length` is reached
    pub same_length_probes: usize,
    /// Expand raw matches into per-length-code boundary candidates
    pub sublengths: bool,
}

impl Default for HashChainConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            hash_bits: 15,
            probe_limit: 256,
            max_per_position: 24,
            nice_length: 64,
            same_length_probes: 32,
            sublengths: true,
        }
    }
}

/// Hash-chain match finder with per-cost-class pruning
///
/// On [`reset`](MatchFinder::reset) every 3-byte shingle is hashed and linked
/// to the previous position with the same hash. A lookup walks that chain from
/// the most recent position backward, verifying real matches, and keeps at
/// most one candidate per (length code, distance code) pair: the longest,
/// then the one with the smaller distance.
#[derive(Clone, Debug)]
pub struct HashChainMatchFinder<'a> {
    input: &'a [u8],
    config: HashChainConfig,
    window_size: usize,
    /// Previous position with the same hash, `NO_POS` at chain end
    prev: Vec<u32>,
    /// Output slot per bucket during one lookup
    slots: Box<[u16]>,
    raw: Vec<Candidate>,
}

impl<'a> HashChainMatchFinder<'a> {
    pub fn new(config: HashChainConfig) -> Self {
        let window_size = effective_window(config.window_size);
        Self {
            input: &[],
            config,
            window_size,
            prev: Vec::new(),
            slots: vec![NO_SLOT; NUM_BUCKETS].into_boxed_slice(),
            raw: Vec::new(),
        }
    }

    pub fn config(&self) -> &HashChainConfig {
        &self.config
    }

    #[inline]
    fn hash(&self, i: usize) -> usize {
        let a = self.input[i] as u32;
        let b = self.input[i + 1] as u32;
        let c = self.input[i + 2] as u32;
        let mut h = a
            .wrapping_mul(0x1e35_a7bd)
            .wrapping_add(b.wrapping_mul(0x9e37_79b1))
            .wrapping_add(c.wrapping_mul(0x85eb_ca6b));
        h ^= h >> 13;
        (h & ((1u32 << self.hash_bits()) - 1)) as usize
    }

    #[inline]
    fn hash_bits(&self) -> u32 {
        self.config.hash_bits.clamp(1, 31) as u32
    }

    /// Keep the candidate if it beats its bucket's current occupant
    fn keep_best(&mut self, length: usize, distance: usize) -> Result<()> {
        let length = length as u16;
        let distance = distance as u16;
        let bucket = length_code_index(length)? * 32 + distance_code_index(distance)?;

        let slot = self.slots[bucket];
        if slot == NO_SLOT {
            self.slots[bucket] = self.raw.len() as u16;
            self.raw.push(Candidate::new(length, distance));
            return Ok(());
        }

        // Same bucket means same distance code
        let current = &mut self.raw[slot as usize];
        if length > current.length || (length == current.length && distance < current.distance) {
            *current = Candidate::new(length, distance);
        }
        Ok(())
    }

    fn walk_chain(&mut self, index: usize) -> Result<()> {
        let data = self.input;
        let max_len = (MAX_MATCH as usize).min(data.len() - index);
        let nice = self.config.nice_length;

        let mut probe_limit = self.config.probe_limit;
        let mut steps = 0usize;
        let mut best_len = 0usize;
        let mut best_code = None;
        let mut extra_scan = 0usize;

        let mut pos = self.prev[index];
        while pos != NO_POS && steps < probe_limit {
            steps += 1;
            let older = pos as usize;
            let distance = index - older;
            if distance > self.window_size {
                break;
            }

            if data[older] == data[index]
                && data[older + 1] == data[index + 1]
                && data[older + 2] == data[index + 2]
            {
                let len = 3 + match_length(data, older + 3, index + 3, max_len - 3);
                self.keep_best(len, distance)?;

                let code = length_code_index(len as u16)?;
                if len > best_len {
                    best_len = len;
                    best_code = Some(code);
                    // Long matches earn a deeper search
                    if len >= 32 {
                        probe_limit = probe_limit.saturating_add(64);
                    }
                    if len >= 64 {
                        probe_limit = probe_limit.saturating_add(64);
                    }
                    if len >= nice {
                        extra_scan = self.config.same_length_probes;
                    }
                } else if best_code == Some(code) && extra_scan > 0 {
                    extra_scan -= 1;
                }

                if best_len >= nice
                    && (extra_scan == 0 || self.raw.len() >= self.config.max_per_position)
                {
                    break;
                }
            }

            pos = self.prev[older];
        }
        Ok(())
    }
}

impl Default for HashChainMatchFinder<'_> {
    fn default() -> Self {
        Self::new(HashChainConfig::default())
    }
}

impl<'a> MatchFinder<'a> for HashChainMatchFinder<'a> {
    fn reset(&mut self, input: &'a [u8]) {
        self.input = input;
        self.prev.clear();
        self.prev.resize(input.len(), NO_POS);
        if input.len() < MIN_MATCH as usize {
            return;
        }

        let mut head = vec![NO_POS; 1usize << self.hash_bits()];
        for i in 0..=input.len() - MIN_MATCH as usize {
            let h = self.hash(i);
            self.prev[i] = head[h];
            head[h] = i as u32;
        }
    }

    fn matches_at(&mut self, index: usize, out: &mut Vec<Candidate>) -> Result<()> {
        out.clear();
        if index + MIN_MATCH as usize > self.input.len() {
            return Ok(());
        }

        self.raw.clear();
        let walked = self.walk_chain(index);

        for c in &self.raw {
            if let (Ok(lc), Ok(dc)) = (length_code_index(c.length), distance_code_index(c.distance)) {
                self.slots[lc * 32 + dc] = NO_SLOT;
            }
        }
        walked?;

        if self.config.sublengths {
            sublen_candidates(&self.raw, out)
        } else {
            out.extend_from_slice(&self.raw);
            Ok(())
        }
    }
}
