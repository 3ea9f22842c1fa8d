//! Operating profitability.

use famarank_traits::{Factor, FactorKind, InstrumentSeries, RankDirection, stats::ratio};

/// Rolling operating income over rolling gross income.
#[derive(Debug, Clone, Copy, Default)]
pub struct Profitability;

impl Factor for Profitability {
    fn name(&self) -> &str {
        "profitability"
    }

    fn kind(&self) -> FactorKind {
        FactorKind::Profitability
    }

    fn direction(&self) -> RankDirection {
        RankDirection::Ascending
    }

    fn lookback(&self) -> usize {
        0
    }

    fn required_columns(&self) -> &[&str] {
        &["operating_income", "gross_income"]
    }

    fn compute(&self, series: &InstrumentSeries) -> Vec<Option<f64>> {
        series
            .rolling_operating_income
            .iter()
            .zip(&series.rolling_gross_income)
            .map(|(operating, gross)| ratio(*operating, *gross))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use famarank_traits::InstrumentId;

    #[test]
    fn test_profitability() {
        let series = InstrumentSeries {
            dates: vec![Default::default(); 3],
            rolling_operating_income: vec![Some(30.0), Some(30.0), None],
            rolling_gross_income: vec![Some(60.0), Some(0.0), Some(60.0)],
            ..InstrumentSeries::new(InstrumentId(1))
        };
        assert_eq!(Profitability.compute(&series), vec![Some(0.5), None, None]);
    }
}
