//! Risk factors.

mod volatility;

pub use volatility::{PriceVolatility, PriceVolatilityConfig};
