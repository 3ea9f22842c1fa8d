//! Benchmark price indices over the instrument universe.

use std::collections::{BTreeMap, HashMap};

use famarank_traits::{
    Date, IndexRow, InstrumentId, PriceObservation, ReportObservation,
    stats::{mean, product},
};

/// Share counts of one instrument keyed by report start date.
type ShareHistory = Vec<(Date, f64)>;

/// Computes the equal-weighted and market-cap-weighted index per date.
///
/// The equal-weighted level is the mean close of every instrument priced on
/// the date. The cap-weighted level is `Σ close × cap / Σ cap`, where the
/// share count is carried forward from the latest report starting on or
/// before the date. Instruments without an earlier report are left out of
/// the cap-weighted level; shares are never backfilled.
#[must_use]
pub fn benchmark_indices(
    prices: &[PriceObservation],
    reports: &[ReportObservation],
) -> Vec<IndexRow> {
    let mut shares: HashMap<InstrumentId, ShareHistory> = HashMap::new();
    for report in reports {
        if let Some(n) = report.items.number_of_shares {
            shares
                .entry(report.instrument)
                .or_default()
                .push((report.report_start_date, n));
        }
    }
    for history in shares.values_mut() {
        history.sort_by_key(|(d, _)| *d);
    }

    let mut by_date: BTreeMap<Date, Vec<&PriceObservation>> = BTreeMap::new();
    for price in prices {
        by_date.entry(price.date).or_default().push(price);
    }

    by_date
        .into_iter()
        .map(|(date, members)| {
            let closes: Vec<f64> = members.iter().filter_map(|p| p.close).collect();

            let mut weighted = 0.0;
            let mut total_cap = 0.0;
            for price in &members {
                let as_of = shares
                    .get(&price.instrument)
                    .and_then(|history| shares_as_of(history, date));
                if let Some(cap) = product(price.close, as_of) {
                    weighted += price.close.unwrap_or_default() * cap;
                    total_cap += cap;
                }
            }

            IndexRow {
                date,
                equal_weighted: mean(&closes),
                cap_weighted: (total_cap != 0.0).then(|| weighted / total_cap),
            }
        })
        .collect()
}

fn shares_as_of(history: &[(Date, f64)], date: Date) -> Option<f64> {
    let idx = history.partition_point(|(d, _)| *d <= date);
    idx.checked_sub(1).map(|i| history[i].1)
}
