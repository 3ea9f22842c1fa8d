#![doc = include_str!("../README.md")]

pub mod backtest;
pub mod index;
pub mod metrics;
pub mod portfolio;
pub mod summary;

// Re-export main types
pub use backtest::{BacktestConfig, BacktestReport, FactorBacktest, UnitOutcome, UnitResult};
pub use index::benchmark_indices;
pub use metrics::{QuartileMetrics, quartile_metrics};
pub use portfolio::{
    BacktestPanel, PanelRow, PortfolioAssignment, PortfolioReturns, QuartileReturn,
    holding_returns, portfolio_returns, simple_returns,
};
pub use summary::{QuartileSummary, quartile_summary};
