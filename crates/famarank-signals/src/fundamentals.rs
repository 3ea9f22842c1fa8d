//! Trailing sums over consecutive financial reports.

use std::collections::BTreeMap;

use famarank_traits::{InstrumentId, ReportObservation, RollingFundamentals, RollingReport};

/// Default number of reports in the rolling window.
pub const DEFAULT_WINDOW: usize = 4;

/// Sums each rolled line item over the most recent `window` reports.
///
/// Reports are grouped by instrument and ordered by `report_start_date`,
/// ties broken by `report_end_date`. Window membership is by row count: a
/// gap in the period sequence is not detected. The first `window - 1`
/// reports of an instrument, and any window containing a missing item, yield
/// a missing sum.
#[derive(Debug, Clone, Copy)]
pub struct RollingAggregator {
    window: usize,
}

impl RollingAggregator {
    /// Creates an aggregator summing over `window` reports.
    #[must_use]
    pub const fn new(window: usize) -> Self {
        Self { window }
    }

    /// Window length in reports.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Computes rolling sums for every report.
    ///
    /// The output is ordered by instrument, then by report dates.
    #[must_use]
    pub fn aggregate(&self, reports: &[ReportObservation]) -> Vec<RollingReport> {
        let mut by_instrument: BTreeMap<InstrumentId, Vec<&ReportObservation>> = BTreeMap::new();
        for report in reports {
            by_instrument.entry(report.instrument).or_default().push(report);
        }

        let mut out = Vec::with_capacity(reports.len());
        for (_, mut group) in by_instrument {
            group.sort_by_key(|r| (r.report_start_date, r.report_end_date));

            for (i, report) in group.iter().enumerate() {
                let rolling = if self.window > 0 && i + 1 >= self.window {
                    let window = &group[i + 1 - self.window..=i];
                    let sum = |column: &str| {
                        window
                            .iter()
                            .map(|r| r.items.get(column))
                            .sum::<Option<f64>>()
                    };
                    RollingFundamentals {
                        revenues: sum("revenues"),
                        gross_income: sum("gross_income"),
                        operating_income: sum("operating_income"),
                        earnings_per_share: sum("earnings_per_share"),
                    }
                } else {
                    RollingFundamentals::default()
                };

                out.push(RollingReport {
                    report: (*report).clone(),
                    rolling,
                });
            }
        }
        out
    }
}

impl Default for RollingAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
