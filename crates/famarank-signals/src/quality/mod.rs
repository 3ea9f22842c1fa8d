//! Quality factors measuring operating efficiency.

mod profitability;

pub use profitability::Profitability;
