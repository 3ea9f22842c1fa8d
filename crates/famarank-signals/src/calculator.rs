//! Factor calculator joining monthly prices with rolling fundamentals.
//!
//! Report rows are matched to price rows on `(instrument, report_start_date)`
//! with left-join semantics: every price row produces exactly one factor row,
//! whether or not a report starts on that date.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use famarank_traits::{
    Date, Factor, FactorRow, FactorValues, FamaError, InstrumentId, InstrumentSeries,
    PriceObservation, Result, RollingReport,
};
use tracing::{debug, warn};

use crate::{registry::default_factors, value::operating_earnings_per_share};

/// Evaluates a set of factors over every instrument's monthly series.
pub struct FactorCalculator {
    factors: Vec<Box<dyn Factor>>,
}

impl FactorCalculator {
    /// Creates a calculator for the given factors.
    ///
    /// Factor kinds without an implementation in `factors` stay missing in
    /// the output rows.
    #[must_use]
    pub fn new(factors: Vec<Box<dyn Factor>>) -> Self {
        Self { factors }
    }

    /// Factors evaluated by this calculator.
    #[must_use]
    pub fn factors(&self) -> &[Box<dyn Factor>] {
        &self.factors
    }

    /// Computes one factor row per price row.
    ///
    /// Rolling reports are deduplicated on `(instrument, report_start_date)`,
    /// keeping the report with the earliest `report_end_date`. Non-finite
    /// factor outputs are stored as missing and counted in a warning.
    ///
    /// # Errors
    ///
    /// [`FamaError::InvalidData`] if two price rows share an instrument and
    /// date, or a factor returns a series of the wrong length.
    pub fn compute(
        &self,
        prices: &[PriceObservation],
        rolling: &[RollingReport],
    ) -> Result<Vec<FactorRow>> {
        let reports = dedupe_reports(rolling);

        let mut by_instrument: BTreeMap<InstrumentId, Vec<&PriceObservation>> = BTreeMap::new();
        for price in prices {
            by_instrument.entry(price.instrument).or_default().push(price);
        }

        let mut rows = Vec::with_capacity(prices.len());
        let mut non_finite = vec![0usize; self.factors.len()];
        for (instrument, mut observations) in by_instrument {
            observations.sort_by_key(|p| p.date);
            if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
                return Err(FamaError::InvalidData(format!(
                    "duplicate price row for instrument {instrument} on {}",
                    pair[0].date
                )));
            }

            let series = build_series(instrument, &observations, &reports);
            let mut values = vec![FactorValues::default(); series.len()];
            for (factor, dropped) in self.factors.iter().zip(&mut non_finite) {
                let computed = factor.compute(&series);
                if computed.len() != series.len() {
                    return Err(FamaError::InvalidData(format!(
                        "factor {} returned {} values for {} observations",
                        factor.name(),
                        computed.len(),
                        series.len()
                    )));
                }
                for (slot, value) in values.iter_mut().zip(computed) {
                    if value.is_some_and(|v| !v.is_finite()) {
                        *dropped += 1;
                        slot.set(factor.kind(), None);
                    } else {
                        slot.set(factor.kind(), value);
                    }
                }
            }

            for (i, factors) in values.into_iter().enumerate() {
                rows.push(FactorRow {
                    instrument,
                    date: series.dates[i],
                    close: series.close[i],
                    number_of_shares: series.number_of_shares[i],
                    rolling_operating_income: series.rolling_operating_income[i],
                    rolling_gross_income: series.rolling_gross_income[i],
                    operating_earnings_per_share: operating_earnings_per_share(
                        series.rolling_operating_income[i],
                        series.number_of_shares[i],
                    ),
                    factors,
                });
            }
        }

        for (factor, dropped) in self.factors.iter().zip(non_finite) {
            if dropped > 0 {
                warn!(factor = factor.name(), dropped, "non-finite factor values set to missing");
            }
        }
        debug!(rows = rows.len(), factors = self.factors.len(), "computed factor rows");
        Ok(rows)
    }
}

impl Default for FactorCalculator {
    fn default() -> Self {
        Self::new(default_factors())
    }
}

impl fmt::Debug for FactorCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactorCalculator")
            .field(
                "factors",
                &self.factors.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn dedupe_reports(rolling: &[RollingReport]) -> HashMap<(InstrumentId, Date), &RollingReport> {
    let mut sorted: Vec<&RollingReport> = rolling.iter().collect();
    sorted.sort_by_key(|r| {
        (
            r.report.instrument,
            r.report.report_start_date,
            r.report.report_end_date,
        )
    });

    let mut reports = HashMap::with_capacity(sorted.len());
    let mut duplicates = 0usize;
    for r in sorted {
        let key = (r.report.instrument, r.report.report_start_date);
        if reports.contains_key(&key) {
            duplicates += 1;
        } else {
            reports.insert(key, r);
        }
    }
    if duplicates > 0 {
        warn!(duplicates, "dropped reports sharing an instrument and start date");
    }
    reports
}

fn build_series(
    instrument: InstrumentId,
    observations: &[&PriceObservation],
    reports: &HashMap<(InstrumentId, Date), &RollingReport>,
) -> InstrumentSeries {
    let mut series = InstrumentSeries::new(instrument);
    for price in observations {
        let report = reports.get(&(instrument, price.date));
        series.dates.push(price.date);
        series.close.push(price.close);
        series
            .number_of_shares
            .push(report.and_then(|r| r.report.items.number_of_shares));
        series
            .rolling_operating_income
            .push(report.and_then(|r| r.rolling.operating_income));
        series
            .rolling_gross_income
            .push(report.and_then(|r| r.rolling.gross_income));
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Datelike, NaiveDate};
    use famarank_traits::{FactorKind, RankDirection, ReportObservation, RollingFundamentals};

    fn month(i: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020 + (i / 12) as i32, i % 12 + 1, 1).unwrap()
    }

    fn rolling(id: i64, start: NaiveDate, end_day: u32, shares: f64) -> RollingReport {
        let end = NaiveDate::from_ymd_opt(start.year(), start.month(), end_day).unwrap();
        let mut report = ReportObservation::new(InstrumentId(id), start, end);
        report.items.number_of_shares = Some(shares);
        RollingReport {
            report,
            rolling: RollingFundamentals {
                operating_income: Some(40.0),
                gross_income: Some(80.0),
                ..RollingFundamentals::default()
            },
        }
    }

    #[test]
    fn test_left_join_keeps_every_price_row() {
        let prices: Vec<_> = (0..14)
            .map(|i| PriceObservation::new(InstrumentId(1), month(i), Some(10.0 + f64::from(i))))
            .collect();
        let reports = vec![rolling(1, month(13), 28, 10.0)];

        let rows = FactorCalculator::default().compute(&prices, &reports).unwrap();
        assert_eq!(rows.len(), 14);

        let last = &rows[13];
        assert_eq!(last.date, month(13));
        assert_relative_eq!(last.factors.market_cap.unwrap(), 230.0);
        assert_relative_eq!(last.operating_earnings_per_share.unwrap(), 4.0);
        assert_relative_eq!(last.factors.value.unwrap(), 4.0 / 23.0);
        assert_relative_eq!(last.factors.profitability.unwrap(), 0.5);
        assert_relative_eq!(last.factors.momentum.unwrap(), 23.0 / 11.0 - 1.0);
        assert!(last.factors.volatility.is_some());

        // No report starts on the first month.
        assert_eq!(rows[0].factors.market_cap, None);
        assert_eq!(rows[0].factors.momentum, None);
    }

    #[test]
    fn test_duplicate_reports_keep_earliest_end() {
        let prices = vec![PriceObservation::new(InstrumentId(1), month(0), Some(10.0))];
        let reports = vec![rolling(1, month(0), 28, 20.0), rolling(1, month(0), 15, 10.0)];

        let rows = FactorCalculator::default().compute(&prices, &reports).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number_of_shares, Some(10.0));
    }

    #[test]
    fn test_duplicate_price_rows_rejected() {
        let prices = vec![
            PriceObservation::new(InstrumentId(1), month(0), Some(10.0)),
            PriceObservation::new(InstrumentId(1), month(0), Some(11.0)),
        ];
        let result = FactorCalculator::default().compute(&prices, &[]);
        assert!(matches!(result, Err(FamaError::InvalidData(_))));
    }

    #[test]
    fn test_subset_of_factors() {
        let calculator = FactorCalculator::new(vec![Box::new(crate::size::MarketCap)]);
        let prices = vec![PriceObservation::new(InstrumentId(1), month(0), Some(10.0))];
        let reports = vec![rolling(1, month(0), 28, 10.0)];

        let rows = calculator.compute(&prices, &reports).unwrap();
        assert_eq!(rows[0].factors.market_cap, Some(100.0));
        assert_eq!(rows[0].factors.profitability, None);
        assert!(format!("{calculator:?}").contains("size"));
    }

    #[derive(Debug)]
    struct Exploding;

    impl Factor for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn kind(&self) -> FactorKind {
            FactorKind::Momentum
        }

        fn direction(&self) -> RankDirection {
            RankDirection::Ascending
        }

        fn lookback(&self) -> usize {
            1
        }

        fn required_columns(&self) -> &[&str] {
            &["close"]
        }

        fn compute(&self, series: &InstrumentSeries) -> Vec<Option<f64>> {
            series
                .close
                .iter()
                .enumerate()
                .map(|(i, c)| match i {
                    0 => Some(f64::INFINITY),
                    1 => Some(f64::NAN),
                    _ => *c,
                })
                .collect()
        }
    }

    #[test]
    fn test_non_finite_outputs_become_missing() {
        let calculator = FactorCalculator::new(vec![Box::new(Exploding)]);
        let prices: Vec<_> = (0..3)
            .map(|i| PriceObservation::new(InstrumentId(1), month(i), Some(5.0)))
            .collect();

        let rows = calculator.compute(&prices, &[]).unwrap();
        assert_eq!(rows[0].factors.momentum, None);
        assert_eq!(rows[1].factors.momentum, None);
        assert_eq!(rows[2].factors.momentum, Some(5.0));
    }
}
