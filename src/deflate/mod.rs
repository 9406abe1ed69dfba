pub mod tables;
pub mod tokens;

pub use tables::{distance_code_index, length_code_index};
pub use tokens::{Candidate, CodeLengths, Token};
