//! CLI subcommand modules.

pub(crate) mod backtest;
pub(crate) mod factors;
pub(crate) mod index;
pub(crate) mod rank;
pub(crate) mod resample;
pub(crate) mod run;

use famarank_traits::FactorKind;

/// Maps a factor name such as `size` to its rank column; anything else is
/// passed through so the backtest can report it.
pub(crate) fn rank_column(name: &str) -> String {
    name.parse::<FactorKind>()
        .map_or_else(|_| name.to_string(), |k| k.rank_column().to_string())
}

/// Formats an optional value, `-` when missing.
pub(crate) fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

pub(crate) fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║ {title:^60} ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}
