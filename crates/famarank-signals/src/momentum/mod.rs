//! Price momentum.

mod price_momentum;

pub use price_momentum::{PriceMomentum, PriceMomentumConfig};
