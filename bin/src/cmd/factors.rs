//! Factor listing command implementation.

use famarank_signals::{FactorCategory, factors_by_category};

use super::banner;

/// List available factors, optionally filtered by category.
pub(crate) fn list_factors(category: Option<&str>, verbose: bool) {
    banner("Available Factors");

    let categories = [
        (FactorCategory::Size, "Size"),
        (FactorCategory::Value, "Value"),
        (FactorCategory::Quality, "Quality"),
        (FactorCategory::Momentum, "Momentum"),
        (FactorCategory::Risk, "Risk"),
    ];

    for (cat, cat_name) in categories {
        if let Some(filter) = category
            && !cat_name.to_lowercase().contains(&filter.to_lowercase())
        {
            continue;
        }

        let cat_factors = factors_by_category(&cat);
        if cat_factors.is_empty() {
            continue;
        }

        println!("{cat_name}: {}", cat.description());
        println!("{}", "-".repeat(60));

        for info in cat_factors {
            if verbose {
                println!(
                    "  {:15} {:20} {} (lookback: {} months{})",
                    info.name,
                    info.kind.rank_column(),
                    info.description,
                    info.typical_lookback,
                    if info.requires_fundamentals { ", needs reports" } else { "" }
                );
            } else {
                println!("  {:15} -> {}", info.name, info.kind.rank_column());
            }
        }
        println!();
    }

    if !verbose {
        println!("Use --verbose for detailed factor descriptions.\n");
    }
}
