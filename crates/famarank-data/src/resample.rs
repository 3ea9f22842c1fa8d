//! Daily to monthly price bars.

use std::collections::BTreeMap;

use famarank_traits::{Date, InstrumentId, PriceObservation, month_start};

/// Resamples daily bars into one bar per instrument and calendar month.
///
/// Each monthly bar is dated on the first day of its month and takes the
/// first open, highest high, lowest low, last close and total volume of the
/// month. Missing daily values are skipped; a field with no value in the
/// month stays missing. Output is sorted by instrument then date.
#[must_use]
pub fn resample_monthly(daily: &[PriceObservation]) -> Vec<PriceObservation> {
    let mut months: BTreeMap<(InstrumentId, Date), Vec<&PriceObservation>> = BTreeMap::new();
    for bar in daily {
        months
            .entry((bar.instrument, month_start(bar.date)))
            .or_default()
            .push(bar);
    }

    months
        .into_iter()
        .map(|((instrument, date), mut bars)| {
            bars.sort_by_key(|b| b.date);
            let volumes: Vec<f64> = bars.iter().filter_map(|b| b.volume).collect();
            PriceObservation {
                instrument,
                date,
                open: bars.iter().find_map(|b| b.open),
                high: bars.iter().filter_map(|b| b.high).reduce(f64::max),
                low: bars.iter().filter_map(|b| b.low).reduce(f64::min),
                close: bars.iter().rev().find_map(|b| b.close),
                volume: (!volumes.is_empty()).then(|| volumes.iter().sum()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(id: i64, m: u32, d: u32, ohlcv: [Option<f64>; 5]) -> PriceObservation {
        PriceObservation {
            instrument: InstrumentId(id),
            date: Date::from_ymd_opt(2023, m, d).unwrap(),
            open: ohlcv[0],
            high: ohlcv[1],
            low: ohlcv[2],
            close: ohlcv[3],
            volume: ohlcv[4],
        }
    }

    #[test]
    fn test_resample_month() {
        let daily = vec![
            bar(1, 1, 31, [Some(11.0), Some(13.0), Some(10.5), None, Some(50.0)]),
            bar(1, 1, 3, [Some(10.0), Some(12.0), Some(9.0), Some(11.0), Some(100.0)]),
            bar(1, 1, 17, [None, Some(15.0), Some(10.0), Some(14.0), None]),
            bar(1, 2, 1, [Some(14.0), Some(14.5), Some(13.0), Some(14.2), Some(10.0)]),
            bar(2, 1, 5, [Some(1.0), Some(1.0), Some(1.0), Some(1.0), None]),
        ];

        let monthly = resample_monthly(&daily);
        assert_eq!(monthly.len(), 3);

        let jan = &monthly[0];
        assert_eq!(jan.date, Date::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(jan.open, Some(10.0));
        assert_eq!(jan.high, Some(15.0));
        assert_eq!(jan.low, Some(9.0));
        // The last bar of January has no close.
        assert_eq!(jan.close, Some(14.0));
        assert_eq!(jan.volume, Some(150.0));

        assert_eq!(monthly[1].date, Date::from_ymd_opt(2023, 2, 1).unwrap());
        assert_eq!(monthly[2].instrument, InstrumentId(2));
        assert_eq!(monthly[2].volume, None);
    }
}
