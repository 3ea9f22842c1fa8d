#![doc = include_str!("../README.md")]

mod method;
mod percentile;
mod ranker;
mod sign_split;

// Re-export main types
pub use method::{RankMethod, method_for};
pub use percentile::{PercentileConfig, PercentileRank};
pub use ranker::CrossSectionRanker;
pub use sign_split::SignSplitRank;
