pub mod alphabet;
pub mod frequency;
pub mod tables;
pub mod tree;

pub use alphabet::HuffmanAlphabet;
pub use frequency::FrequencyCounter;
pub use tree::{build_alphabet, HuffmanTree};
