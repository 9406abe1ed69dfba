//! Optimal-parsing DEFLATE (RFC 1951) encoder.
//!
//! Instead of taking the longest match at each position, the encoder runs a
//! shortest-path search over every tokenization a match finder allows, priced
//! with the Huffman code the block will actually use. Parsing and code
//! construction are iterated until they agree, and large inputs are split into
//! blocks wherever separate codes pay for themselves.
//!
//! ```
//! let data = b"the rain in spain stays mainly in the plain".repeat(10);
//! let compressed = optiflate::compress(&data, 9).unwrap();
//! assert!(compressed.len() < data.len());
//! ```

pub mod bits;
pub mod compressor;
pub mod deflate;
pub mod error;
pub mod format;
pub mod huffman;
pub mod lz;
pub mod parse;
pub mod split;

pub use compressor::{CompressStats, Compressor};
pub use deflate::tokens::{Candidate, CodeLengths, Token};
pub use error::{Error, Result};
pub use lz::{
    CachingMatchFinder, ExhaustiveMatchFinder, HashChainConfig, HashChainMatchFinder, MatchFinder,
};
pub use parse::{CostModel, MultiPassConfig, MultiPassOptimizer, OptimalParser};
pub use split::{Block, BlockSplitter, GreedyBlockSplitter, SplitConfig};

use std::fmt;
use std::str::FromStr;

/// Compression level (1-9)
///
/// - Levels 1-3: Fixed Huffman blocks from a single parse (fastest, larger output)
/// - Levels 4-6: One dynamic block refined over several passes (balanced)
/// - Levels 7-9: Block splitting, per-block fixed/dynamic choice (best compression)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CompressionLevel {
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
    Level4 = 4,
    Level5 = 5,
    #[default]
    Level6 = 6,
    Level7 = 7,
    Level8 = 8,
    Level9 = 9,
}

impl CompressionLevel {
    /// Create from numeric level (1-9), clamped to valid range
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => Self::Level1,
            2 => Self::Level2,
            3 => Self::Level3,
            4 => Self::Level4,
            5 => Self::Level5,
            6 => Self::Level6,
            7 => Self::Level7,
            8 => Self::Level8,
            _ => Self::Level9,
        }
    }

    /// Get numeric level (1-9)
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Whether this level uses fixed Huffman tables (levels 1-3)
    pub fn use_fixed_huffman(&self) -> bool {
        matches!(self, Self::Level1 | Self::Level2 | Self::Level3)
    }

    /// Whether this level splits the input into several blocks (levels 7-9)
    pub fn use_block_splitting(&self) -> bool {
        matches!(self, Self::Level7 | Self::Level8 | Self::Level9)
    }
}

/// How blocks are coded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlockMode {
    /// RFC 1951 fixed code (BTYPE=01)
    Fixed,
    /// Per-block code transmitted in the header (BTYPE=10)
    #[default]
    Dynamic,
    /// Whichever of the two is smaller, decided per block
    Auto,
}

impl FromStr for BlockMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "dynamic" => Ok(Self::Dynamic),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown block mode '{}' (expected fixed, dynamic or auto)", other)),
        }
    }
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fixed => "fixed",
            Self::Dynamic => "dynamic",
            Self::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Match finder used by the compressor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FinderKind {
    /// Scan the whole window at every position
    Exhaustive,
    #[default]
    HashChain,
}

/// Configuration for compression
#[derive(Clone, Debug, PartialEq)]
pub struct CompressionConfig {
    pub block_mode: BlockMode,
    pub finder: FinderKind,
    /// Hash-chain tunables; `window_size` also bounds the exhaustive finder
    pub hash_chain: HashChainConfig,
    pub passes: MultiPassConfig,
    /// Block splitting, `None` to code the input as one block
    pub split: Option<SplitConfig>,
}

impl CompressionConfig {
    /// Settings for a compression level
    pub fn from_level(level: CompressionLevel) -> Self {
        let (probe_limit, nice_length, max_passes) = match level {
            CompressionLevel::Level1 => (32, 32, 1),
            CompressionLevel::Level2 => (64, 48, 1),
            CompressionLevel::Level3 => (128, 64, 1),
            CompressionLevel::Level4 => (64, 64, 2),
            CompressionLevel::Level5 => (128, 64, 3),
            CompressionLevel::Level6 => (256, 64, 3),
            CompressionLevel::Level7 => (256, 128, 4),
            CompressionLevel::Level8 => (512, 128, 6),
            CompressionLevel::Level9 => (1024, 258, 10),
        };

        let block_mode = if level.use_fixed_huffman() {
            BlockMode::Fixed
        } else if level.use_block_splitting() {
            BlockMode::Auto
        } else {
            BlockMode::Dynamic
        };

        Self {
            block_mode,
            finder: FinderKind::HashChain,
            hash_chain: HashChainConfig { probe_limit, nice_length, ..Default::default() },
            passes: MultiPassConfig { max_passes, ..Default::default() },
            split: level.use_block_splitting().then(SplitConfig::default),
        }
    }

    /// Check every setting is in range
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));
        let hc = &self.hash_chain;

        if hc.window_size == 0 || hc.window_size > lz::DEFAULT_WINDOW_SIZE {
            return invalid(format!("window size {} outside 1-32768", hc.window_size));
        }
        if !(8..=24).contains(&hc.hash_bits) {
            return invalid(format!("hash bits {} outside 8-24", hc.hash_bits));
        }
        if hc.probe_limit == 0 || hc.max_per_position == 0 {
            return invalid("probe limit and per-position cap must be nonzero".to_string());
        }
        if self.passes.max_passes == 0 {
            return invalid("at least one pass is required".to_string());
        }
        if !self.passes.epsilon.is_finite() || self.passes.epsilon < 0.0 {
            return invalid(format!("epsilon {} must be finite and non-negative", self.passes.epsilon));
        }
        if let Some(split) = &self.split {
            if split.min_tokens_per_block == 0 || split.coarse_step == 0 || split.refine_step == 0 {
                return invalid("split block size and steps must be nonzero".to_string());
            }
        }
        Ok(())
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self::from_level(CompressionLevel::default())
    }
}

/// Compress `input` at `level` (1-9, clamped) into a raw DEFLATE stream
pub fn compress(input: &[u8], level: u8) -> Result<Vec<u8>> {
    let config = CompressionConfig::from_level(CompressionLevel::from_level(level));
    Compressor::new(config)?.compress(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level() {
        assert_eq!(CompressionLevel::from_level(0), CompressionLevel::Level1);
        assert_eq!(CompressionLevel::from_level(42), CompressionLevel::Level9);
        assert_eq!(CompressionLevel::Level5.level(), 5);
        assert_eq!(CompressionLevel::default(), CompressionLevel::Level6);
    }

    #[test]
    fn test_level_settings() {
        assert_eq!(CompressionConfig::from_level(CompressionLevel::Level2).block_mode, BlockMode::Fixed);
        let l6 = CompressionConfig::from_level(CompressionLevel::Level6);
        assert_eq!(l6.block_mode, BlockMode::Dynamic);
        assert!(l6.split.is_none());
        assert_eq!(l6.hash_chain, HashChainConfig::default());
        assert_eq!(l6.passes, MultiPassConfig::default());
        let l9 = CompressionConfig::from_level(CompressionLevel::Level9);
        assert_eq!(l9.block_mode, BlockMode::Auto);
        assert!(l9.split.is_some());
        assert_eq!(CompressionConfig::default(), l6);
    }

    #[test]
    fn test_validate() {
        assert!(CompressionConfig::default().validate().is_ok());

        let mut config = CompressionConfig::default();
        config.hash_chain.window_size = 40_000;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = CompressionConfig::default();
        config.hash_chain.hash_bits = 30;
        assert!(config.validate().is_err());

        let mut config = CompressionConfig::default();
        config.passes.max_passes = 0;
        assert!(config.validate().is_err());

        let mut config = CompressionConfig::default();
        config.passes.epsilon = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = CompressionConfig::from_level(CompressionLevel::Level8);
        config.split = Some(SplitConfig { coarse_step: 0, ..Default::default() });
        assert!(config.validate().is_err());
        assert!(Compressor::new(config).is_err());
    }

    #[test]
    fn test_block_mode_parse() {
        assert_eq!("AUTO".parse::<BlockMode>().unwrap(), BlockMode::Auto);
        assert_eq!("fixed".parse::<BlockMode>().unwrap(), BlockMode::Fixed);
        assert!("stored".parse::<BlockMode>().is_err());
        assert_eq!(BlockMode::Dynamic.to_string(), "dynamic");
    }

    #[test]
    fn test_compress_fn() {
        let data = b"abcabcabcabcabcabcabcabc".repeat(20);
        let compressed = compress(&data, 7).unwrap();
        let mut out = Vec::new();
        std::io::Read::read_to_end(&mut flate2::read::DeflateDecoder::new(&compressed[..]), &mut out)
            .unwrap();
        assert_eq!(out, data);
    }
}
