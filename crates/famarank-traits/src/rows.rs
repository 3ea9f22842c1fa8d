//! Derived row types flowing between pipeline stages.

use serde::{Deserialize, Serialize};

use crate::{Date, FactorKind, HoldingPeriod, InstrumentId, Quartile, ReportObservation, Result};

/// Trailing four-report sums of the rolled line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingFundamentals {
    /// Rolling revenues.
    pub revenues: Option<f64>,
    /// Rolling gross income.
    pub gross_income: Option<f64>,
    /// Rolling operating income.
    pub operating_income: Option<f64>,
    /// Rolling earnings per share.
    pub earnings_per_share: Option<f64>,
}

impl RollingFundamentals {
    /// Line items that are rolled.
    pub const COLUMNS: [&'static str; 4] = [
        "revenues",
        "gross_income",
        "operating_income",
        "earnings_per_share",
    ];
}

/// A report together with its rolling sums.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingReport {
    /// The source report.
    pub report: ReportObservation,
    /// Sums over this report and the three preceding ones.
    pub rolling: RollingFundamentals,
}

/// Monthly series of one instrument, sorted by date, fed to each factor.
///
/// All vectors have the same length as `dates`.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSeries {
    /// Instrument identifier.
    pub instrument: InstrumentId,
    /// Observation dates, ascending.
    pub dates: Vec<Date>,
    /// Close prices.
    pub close: Vec<Option<f64>>,
    /// Shares outstanding from the report starting on the same date.
    pub number_of_shares: Vec<Option<f64>>,
    /// Rolling operating income from the report starting on the same date.
    pub rolling_operating_income: Vec<Option<f64>>,
    /// Rolling gross income from the report starting on the same date.
    pub rolling_gross_income: Vec<Option<f64>>,
}

impl InstrumentSeries {
    /// Creates an empty series.
    #[must_use]
    pub const fn new(instrument: InstrumentId) -> Self {
        Self {
            instrument,
            dates: Vec::new(),
            close: Vec::new(),
            number_of_shares: Vec::new(),
            rolling_operating_income: Vec::new(),
            rolling_gross_income: Vec::new(),
        }
    }

    /// Number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no observations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Raw factor values of one observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorValues {
    /// Close times shares outstanding.
    pub market_cap: Option<f64>,
    /// Operating earnings per share over close.
    pub value: Option<f64>,
    /// Rolling operating income over rolling gross income.
    pub profitability: Option<f64>,
    /// Twelve-observation percentage change in close.
    pub momentum: Option<f64>,
    /// Twelve-observation sample standard deviation of close.
    pub volatility: Option<f64>,
}

impl FactorValues {
    /// Raw value of `kind`.
    #[must_use]
    pub const fn get(&self, kind: FactorKind) -> Option<f64> {
        match kind {
            FactorKind::Size => self.market_cap,
            FactorKind::Value => self.value,
            FactorKind::Profitability => self.profitability,
            FactorKind::Momentum => self.momentum,
            FactorKind::Volatility => self.volatility,
        }
    }

    /// Sets the raw value of `kind`.
    pub const fn set(&mut self, kind: FactorKind, value: Option<f64>) {
        match kind {
            FactorKind::Size => self.market_cap = value,
            FactorKind::Value => self.value = value,
            FactorKind::Profitability => self.profitability = value,
            FactorKind::Momentum => self.momentum = value,
            FactorKind::Volatility => self.volatility = value,
        }
    }
}

/// One price observation joined with fundamentals and its raw factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRow {
    /// Instrument identifier.
    pub instrument: InstrumentId,
    /// Month-start date.
    pub date: Date,
    /// Close price.
    pub close: Option<f64>,
    /// Shares outstanding.
    pub number_of_shares: Option<f64>,
    /// Rolling operating income.
    pub rolling_operating_income: Option<f64>,
    /// Rolling gross income.
    pub rolling_gross_income: Option<f64>,
    /// Rolling operating income per share.
    pub operating_earnings_per_share: Option<f64>,
    /// Raw factor values.
    pub factors: FactorValues,
}

/// Percentile ranks in [0, 1], one per factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorRanks {
    /// Rank of market cap.
    pub size: Option<f64>,
    /// Sign-split rank of the value factor.
    pub value: Option<f64>,
    /// Rank of profitability.
    pub profitability: Option<f64>,
    /// Rank of momentum.
    pub momentum: Option<f64>,
    /// Descending rank of volatility.
    pub volatility: Option<f64>,
}

impl FactorRanks {
    /// Rank of `kind`.
    #[must_use]
    pub const fn get(&self, kind: FactorKind) -> Option<f64> {
        match kind {
            FactorKind::Size => self.size,
            FactorKind::Value => self.value,
            FactorKind::Profitability => self.profitability,
            FactorKind::Momentum => self.momentum,
            FactorKind::Volatility => self.volatility,
        }
    }

    /// Sets the rank of `kind`.
    pub const fn set(&mut self, kind: FactorKind, rank: Option<f64>) {
        match kind {
            FactorKind::Size => self.size = rank,
            FactorKind::Value => self.value = rank,
            FactorKind::Profitability => self.profitability = rank,
            FactorKind::Momentum => self.momentum = rank,
            FactorKind::Volatility => self.volatility = rank,
        }
    }

    /// Whether every rank is missing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        FactorKind::ALL.iter().all(|k| self.get(*k).is_none())
    }
}

/// One row of the ranking output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    /// Instrument identifier.
    pub instrument: InstrumentId,
    /// Month-start date.
    pub date: Date,
    /// Factor ranks.
    pub ranks: FactorRanks,
}

/// The ranking output table with the rank columns it actually carries.
///
/// A table loaded from storage may lack some rank columns; asking for one of
/// those is a validation error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingTable {
    columns: Vec<FactorKind>,
    rows: Vec<RankingRow>,
}

impl RankingTable {
    /// Creates a table carrying every rank column.
    ///
    /// Rows whose ranks are all missing are dropped; the rest are sorted by
    /// date then instrument.
    #[must_use]
    pub fn new(rows: Vec<RankingRow>) -> Self {
        Self::with_columns(FactorKind::ALL.to_vec(), rows)
    }

    /// Creates a table carrying only `columns`.
    #[must_use]
    pub fn with_columns(columns: Vec<FactorKind>, rows: Vec<RankingRow>) -> Self {
        let mut rows: Vec<_> = rows.into_iter().filter(|r| !r.ranks.is_empty()).collect();
        rows.sort_by(|a, b| (a.date, a.instrument).cmp(&(b.date, b.instrument)));
        Self { columns, rows }
    }

    /// Rank columns present in the table.
    #[must_use]
    pub fn columns(&self) -> &[FactorKind] {
        &self.columns
    }

    /// Table rows, sorted by date then instrument.
    #[must_use]
    pub fn rows(&self) -> &[RankingRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the table carries the rank column of `kind`.
    #[must_use]
    pub fn has_column(&self, kind: FactorKind) -> bool {
        self.columns.contains(&kind)
    }

    /// Resolves a rank column name against this table.
    ///
    /// # Errors
    ///
    /// See [`FactorKind::resolve`].
    pub fn require(&self, column: &str) -> Result<FactorKind> {
        FactorKind::resolve(column, &self.columns)
    }
}

/// Performance metrics of one quartile for one (factor, holding period).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    /// Rank column the portfolios were formed on.
    pub factor: String,
    /// Holding period label.
    pub holding_period: HoldingPeriod,
    /// Quartile.
    pub quartile: Quartile,
    /// Mean of the per-date mean holding returns.
    pub mean: Option<f64>,
    /// Sample standard deviation of the per-date mean holding returns.
    pub std: Option<f64>,
    /// `mean / std`; infinite or NaN when `std` is zero.
    ///
    /// Serialized as `"inf"`, `"-inf"` or `"nan"` when not finite, so it
    /// stays distinct from a missing ratio.
    #[serde(with = "non_finite")]
    pub sharpe: Option<f64>,
    /// Mean close price of the quartile's members.
    pub mean_close: Option<f64>,
    /// Number of dates contributing to `mean`.
    pub observations: usize,
}

/// Benchmark index levels on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    /// Month-start date.
    pub date: Date,
    /// Mean close across instruments.
    pub equal_weighted: Option<f64>,
    /// Market-cap weighted mean close.
    pub cap_weighted: Option<f64>,
}

/// Optional floats whose infinities and NaN survive a serde round trip.
mod non_finite {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub(super) fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            None => s.serialize_none(),
            Some(v) if v.is_finite() => s.serialize_some(v),
            Some(v) if v.is_nan() => s.serialize_some("nan"),
            Some(v) if v.is_sign_positive() => s.serialize_some("inf"),
            Some(_) => s.serialize_some("-inf"),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Option::<Repr>::deserialize(d)?
            .map(|repr| match repr {
                Repr::Number(v) => Ok(v),
                Repr::Text(text) => match text.as_str() {
                    "nan" => Ok(f64::NAN),
                    "inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    other => Err(D::Error::custom(format!("invalid float: {other}"))),
                },
            })
            .transpose()
    }
}
