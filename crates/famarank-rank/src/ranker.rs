//! Per-date ranking of every factor.

use std::{collections::BTreeMap, fmt};

use famarank_traits::{
    Date, Factor, FactorKind, FactorRanks, FactorRow, RankDirection, RankingRow, RankingTable,
};
use tracing::debug;

use crate::method::{RankMethod, method_for};

/// Ranks each factor independently within each date.
///
/// # Examples
///
/// ```ignore
/// use famarank_rank::CrossSectionRanker;
///
/// let ranker = CrossSectionRanker::default();
/// let table = ranker.rank(&factor_rows);
/// ```
pub struct CrossSectionRanker {
    methods: Vec<(FactorKind, Box<dyn RankMethod>)>,
}

impl CrossSectionRanker {
    /// Creates a ranker from explicit per-factor methods.
    #[must_use]
    pub fn new(methods: Vec<(FactorKind, Box<dyn RankMethod>)>) -> Self {
        Self { methods }
    }

    /// Creates a ranker using the direction each factor declares.
    #[must_use]
    pub fn from_factors(factors: &[Box<dyn Factor>]) -> Self {
        Self::new(
            factors
                .iter()
                .map(|f| (f.kind(), method_for(f.direction())))
                .collect(),
        )
    }

    /// Factor kinds this ranker produces.
    #[must_use]
    pub fn kinds(&self) -> Vec<FactorKind> {
        self.methods.iter().map(|(k, _)| *k).collect()
    }

    /// Ranks every factor row.
    ///
    /// Rows whose ranks are all missing are left out of the table. Missing
    /// and non-finite values get no rank.
    #[must_use]
    pub fn rank(&self, rows: &[FactorRow]) -> RankingTable {
        let mut by_date: BTreeMap<Date, Vec<usize>> = BTreeMap::new();
        for (i, row) in rows.iter().enumerate() {
            by_date.entry(row.date).or_default().push(i);
        }

        let mut ranks = vec![FactorRanks::default(); rows.len()];
        for (kind, method) in &self.methods {
            for members in by_date.values() {
                let values: Vec<Option<f64>> =
                    members.iter().map(|&i| rows[i].factors.get(*kind)).collect();
                for (&i, rank) in members.iter().zip(method.rank(&values)) {
                    ranks[i].set(*kind, rank);
                }
            }
        }

        let ranked: Vec<RankingRow> = rows
            .iter()
            .zip(ranks)
            .map(|(row, ranks)| RankingRow {
                instrument: row.instrument,
                date: row.date,
                ranks,
            })
            .collect();
        let table = RankingTable::with_columns(self.kinds(), ranked);

        debug!(
            dates = by_date.len(),
            rows = rows.len(),
            ranked = table.len(),
            "ranked factor rows"
        );
        table
    }
}

impl Default for CrossSectionRanker {
    fn default() -> Self {
        Self::new(
            FactorKind::ALL
                .into_iter()
                .map(|kind| {
                    let direction = match kind {
                        FactorKind::Value => RankDirection::SignSplit,
                        FactorKind::Volatility => RankDirection::Descending,
                        FactorKind::Size | FactorKind::Profitability | FactorKind::Momentum => {
                            RankDirection::Ascending
                        }
                    };
                    (kind, method_for(direction))
                })
                .collect(),
        )
    }
}

impl fmt::Debug for CrossSectionRanker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossSectionRanker")
            .field(
                "methods",
                &self
                    .methods
                    .iter()
                    .map(|(k, m)| (k.name(), m.name()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
