pub mod cost;
pub mod multipass;
pub mod optimal;

pub use cost::CostModel;
pub use multipass::{MultiPassConfig, MultiPassOptimizer, MultiPassResult};
pub use optimal::{OptimalParser, ParseResult};
