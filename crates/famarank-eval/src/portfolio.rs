//! Quartile portfolios and their holding-period returns.
//!
//! Portfolios are formed on one rank column at a time. Within each date the
//! column is re-ranked to percentiles and binned into quartiles; each
//! member's trailing compounded return over the holding period is then
//! averaged per (date, quartile).

use std::collections::{BTreeMap, HashMap};

use famarank_rank::{PercentileRank, RankMethod};
use famarank_traits::{
    Date, FactorKind, FactorRanks, HoldingPeriod, InstrumentId, PriceObservation, Quartile,
    RankingTable, Result,
    stats::{compound, mean, ratio},
};
use serde::{Deserialize, Serialize};

/// One ranked observation with its close price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRow {
    /// Instrument identifier.
    pub instrument: InstrumentId,
    /// Month-start date.
    pub date: Date,
    /// Close price.
    pub close: Option<f64>,
    /// Factor ranks.
    pub ranks: FactorRanks,
}

/// Simple and holding return per `(instrument, date)`.
type ReturnMap = HashMap<(InstrumentId, Date), (Option<f64>, Option<f64>)>;

/// Closes of one instrument on every month it was priced.
#[derive(Debug, Clone, Default, PartialEq)]
struct PriceHistory {
    dates: Vec<Date>,
    closes: Vec<Option<f64>>,
}

/// Ranking table inner-joined with prices on `(instrument, date)`.
///
/// Rows are kept sorted by instrument then date. Returns are measured over
/// each instrument's full price history, not over the ranked rows, so
/// months without a rank still count towards a holding window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestPanel {
    columns: Vec<FactorKind>,
    rows: Vec<PanelRow>,
    histories: BTreeMap<InstrumentId, PriceHistory>,
}

impl BacktestPanel {
    /// Joins a ranking table with monthly prices.
    ///
    /// Ranking rows without a matching price row are dropped. Every price
    /// row feeds the return histories.
    #[must_use]
    pub fn join(ranking: &RankingTable, prices: &[PriceObservation]) -> Self {
        let closes: HashMap<(InstrumentId, Date), Option<f64>> = prices
            .iter()
            .map(|p| ((p.instrument, p.date), p.close))
            .collect();

        let rows = ranking
            .rows()
            .iter()
            .filter_map(|r| {
                closes.get(&(r.instrument, r.date)).map(|close| PanelRow {
                    instrument: r.instrument,
                    date: r.date,
                    close: *close,
                    ranks: r.ranks,
                })
            })
            .collect();
        let mut panel = Self::from_rows(ranking.columns().to_vec(), rows);
        panel.histories = histories(prices.iter().map(|p| (p.instrument, p.date, p.close)));
        panel
    }

    /// Builds a panel from rows carrying `columns`.
    ///
    /// The rows double as the price history, so they should cover every
    /// month of each instrument.
    #[must_use]
    pub fn from_rows(columns: Vec<FactorKind>, mut rows: Vec<PanelRow>) -> Self {
        rows.sort_by(|a, b| (a.instrument, a.date).cmp(&(b.instrument, b.date)));
        let histories = histories(rows.iter().map(|r| (r.instrument, r.date, r.close)));
        Self {
            columns,
            rows,
            histories,
        }
    }

    /// Rank columns present in the panel.
    #[must_use]
    pub fn columns(&self) -> &[FactorKind] {
        &self.columns
    }

    /// Panel rows, sorted by instrument then date.
    #[must_use]
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the panel has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolves a rank column against the panel.
    ///
    /// # Errors
    ///
    /// Fails when the column is unknown or absent from the panel.
    pub fn require(&self, column: &str) -> Result<FactorKind> {
        FactorKind::resolve(column, &self.columns)
    }

    /// Simple and holding returns keyed by `(instrument, date)`, measured
    /// over consecutive months of each price history.
    fn returns(&self, months: usize) -> ReturnMap {
        let mut out = HashMap::new();
        for (&instrument, history) in &self.histories {
            let simple = simple_returns(&history.closes);
            let holding = holding_returns(&simple, months);
            for ((&date, s), h) in history.dates.iter().zip(simple).zip(holding) {
                out.insert((instrument, date), (s, h));
            }
        }
        out
    }
}

fn histories(
    observations: impl Iterator<Item = (InstrumentId, Date, Option<f64>)>,
) -> BTreeMap<InstrumentId, PriceHistory> {
    let mut by_instrument: BTreeMap<InstrumentId, BTreeMap<Date, Option<f64>>> = BTreeMap::new();
    for (instrument, date, close) in observations {
        by_instrument.entry(instrument).or_default().insert(date, close);
    }
    by_instrument
        .into_iter()
        .map(|(instrument, closes)| {
            let (dates, closes) = closes.into_iter().unzip();
            (instrument, PriceHistory { dates, closes })
        })
        .collect()
}

/// An instrument's quartile membership on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAssignment {
    /// Instrument identifier.
    pub instrument: InstrumentId,
    /// Month-start date.
    pub date: Date,
    /// Rank read from the ranking table.
    pub factor_rank: f64,
    /// Percentile re-rank within the date.
    pub rank: f64,
    /// Quartile bucket of `rank`.
    pub quartile: Quartile,
    /// Close price.
    pub close: Option<f64>,
    /// Return since the instrument's previous month.
    pub simple_return: Option<f64>,
    /// Compounded return over the trailing holding period.
    pub holding_return: Option<f64>,
}

/// Mean holding return of one quartile on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuartileReturn {
    /// Month-start date.
    pub date: Date,
    /// Quartile.
    pub quartile: Quartile,
    /// Mean of the members' holding returns, ignoring missing ones.
    pub mean_return: Option<f64>,
    /// Number of members in the quartile on this date.
    pub members: usize,
}

/// Output of the portfolio engine for one (factor, holding period).
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReturns {
    /// Factor the portfolios were formed on.
    pub factor: FactorKind,
    /// Holding period.
    pub holding_period: HoldingPeriod,
    /// Per-row quartile assignments, sorted by instrument then date.
    pub assignments: Vec<PortfolioAssignment>,
    /// Mean holding return per (date, quartile), sorted by date then quartile.
    pub returns: Vec<QuartileReturn>,
}

/// Simple returns over consecutive observations: `close[t] / close[t-1] - 1`.
///
/// The first observation has no return.
#[must_use]
pub fn simple_returns(closes: &[Option<f64>]) -> Vec<Option<f64>> {
    (0..closes.len())
        .map(|t| {
            if t == 0 {
                return None;
            }
            ratio(closes[t], closes[t - 1]).map(|growth| growth - 1.0)
        })
        .collect()
}

/// Trailing compounded returns over windows of `months` simple returns.
///
/// A window that is incomplete or contains a missing return yields `None`.
#[must_use]
pub fn holding_returns(returns: &[Option<f64>], months: usize) -> Vec<Option<f64>> {
    (0..returns.len())
        .map(|t| {
            if months == 0 || t + 1 < months {
                return None;
            }
            compound(&returns[t + 1 - months..=t])
        })
        .collect()
}

/// Forms quartile portfolios on `column` and computes their returns.
///
/// # Errors
///
/// Validation errors when the rank column is unknown or absent from the
/// panel, or the holding period label is unknown.
pub fn portfolio_returns(
    panel: &BacktestPanel,
    column: &str,
    holding_period: &str,
) -> Result<PortfolioReturns> {
    let factor = panel.require(column)?;
    let holding_period: HoldingPeriod = holding_period.parse()?;
    let rows = panel.rows();

    // Percentile re-rank of the requested column within each date.
    let mut by_date: BTreeMap<Date, Vec<usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        by_date.entry(row.date).or_default().push(i);
    }
    let ranker = PercentileRank::default();
    let mut rerank = vec![None; rows.len()];
    for members in by_date.values() {
        let values: Vec<_> = members.iter().map(|&i| rows[i].ranks.get(factor)).collect();
        for (&i, rank) in members.iter().zip(ranker.rank(&values)) {
            rerank[i] = rank;
        }
    }

    let returns = panel.returns(holding_period.months());

    let mut assignments = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let (Some(factor_rank), Some(rank)) = (row.ranks.get(factor), rerank[i]) else {
            continue;
        };
        let Some(quartile) = Quartile::from_rank(rank) else {
            continue;
        };
        let (simple_return, holding_return) = returns
            .get(&(row.instrument, row.date))
            .copied()
            .unwrap_or_default();
        assignments.push(PortfolioAssignment {
            instrument: row.instrument,
            date: row.date,
            factor_rank,
            rank,
            quartile,
            close: row.close,
            simple_return,
            holding_return,
        });
    }

    let mut groups: BTreeMap<(Date, Quartile), (Vec<f64>, usize)> = BTreeMap::new();
    for a in &assignments {
        let entry = groups.entry((a.date, a.quartile)).or_default();
        entry.1 += 1;
        if let Some(r) = a.holding_return {
            entry.0.push(r);
        }
    }
    let quartile_returns = groups
        .into_iter()
        .map(|((date, quartile), (values, members))| QuartileReturn {
            date,
            quartile,
            mean_return: mean(&values),
            members,
        })
        .collect();

    Ok(PortfolioReturns {
        factor,
        holding_period,
        assignments,
        returns: quartile_returns,
    })
}
