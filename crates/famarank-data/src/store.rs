//! CSV-backed table store.

use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use famarank_traits::{
    FactorKind, FactorRanks, IndexRow, LineItems, MetricsRow, PriceObservation, RankingRow,
    RankingTable, ReportObservation, TableStore,
};
use polars::prelude::Column;
use tracing::{debug, info};

use crate::{
    DataError, Result,
    backup::backup_file,
    frame::{
        date_column, f64_column, format_dates, format_optional_dates, has_column, i64_column,
        instruments, parse_bool, read_csv, require_columns, required_dates, str_column, write_csv,
    },
};

/// File names of every table.
pub mod files {
    /// Daily prices, input of the monthly resampler.
    pub const DAILY_PRICES: &str = "daily_price_data.csv";
    /// Monthly prices.
    pub const PRICES: &str = "monthly_price_data.csv";
    /// Financial reports.
    pub const REPORTS: &str = "monthly_report_data.csv";
    /// Factor ranks.
    pub const RANKINGS: &str = "factor_rankings.csv";
    /// Portfolio metrics.
    pub const METRICS_CSV: &str = "portfolio_metrics.csv";
    /// Portfolio metrics as JSON.
    pub const METRICS_JSON: &str = "portfolio_metrics.json";
    /// Benchmark indices.
    pub const INDEX: &str = "index_data.csv";
}

const PRICE_COLUMNS: [&str; 3] = ["ins_id", "date", "close"];
const REPORT_COLUMNS: [&str; 6] = [
    "ins_id",
    "report_start_date",
    "report_end_date",
    "number_of_shares",
    "operating_income",
    "gross_income",
];
const RANKING_COLUMNS: [&str; 2] = ["ins_id", "date"];

/// Table store over a data directory (inputs) and an output directory.
///
/// Input tables are read from `data_dir`; the ranking, metrics and index
/// tables live in `output_dir`. Replacing an output file first copies it to
/// a versioned backup when backups are enabled.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
    output_dir: PathBuf,
    backup: bool,
}

impl CsvStore {
    /// Create a store over the given directories, without backups.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            backup: false,
        }
    }

    /// Enables or disables versioned backups of replaced outputs.
    #[must_use]
    pub const fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    /// Path of an input table.
    #[must_use]
    pub fn data_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Path of an output table.
    #[must_use]
    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    /// Reads a price table at `path`, daily or monthly.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, lacks `ins_id`, `date` or `close`, or
    /// has a row without an instrument or date.
    pub fn read_prices(path: &Path) -> Result<Vec<PriceObservation>> {
        let df = read_csv(path)?;
        require_columns(&df, path, &PRICE_COLUMNS)?;

        let ids = instruments(&df, "ins_id")?;
        let dates = required_dates(&df, "date")?;
        let open = f64_column(&df, "open")?;
        let high = f64_column(&df, "high")?;
        let low = f64_column(&df, "low")?;
        let close = f64_column(&df, "close")?;
        let volume = f64_column(&df, "volume")?;

        let rows: Vec<_> = (0..df.height())
            .map(|i| PriceObservation {
                instrument: ids[i],
                date: dates[i],
                open: open[i],
                high: high[i],
                low: low[i],
                close: close[i],
                volume: volume[i],
            })
            .collect();
        info!(path = %path.display(), rows = rows.len(), "loaded prices");
        Ok(rows)
    }

    /// Writes a price table to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Fails on filesystem or polars errors.
    pub fn write_prices(&self, path: &Path, rows: &[PriceObservation]) -> Result<()> {
        self.replace(path, |path| {
            write_csv(
                path,
                vec![
                    Column::new("ins_id".into(), rows.iter().map(|r| r.instrument.0).collect::<Vec<_>>()),
                    Column::new("date".into(), format_dates(rows.iter().map(|r| r.date))),
                    Column::new("open".into(), rows.iter().map(|r| r.open).collect::<Vec<_>>()),
                    Column::new("high".into(), rows.iter().map(|r| r.high).collect::<Vec<_>>()),
                    Column::new("low".into(), rows.iter().map(|r| r.low).collect::<Vec<_>>()),
                    Column::new("close".into(), rows.iter().map(|r| r.close).collect::<Vec<_>>()),
                    Column::new("volume".into(), rows.iter().map(|r| r.volume).collect::<Vec<_>>()),
                ],
            )
        })
    }

    /// Reads the report table at `path`.
    ///
    /// Line-item columns that are absent read as missing.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, lacks a key or factor input column, or
    /// has a row without an instrument or report dates.
    pub fn read_reports(path: &Path) -> Result<Vec<ReportObservation>> {
        let df = read_csv(path)?;
        require_columns(&df, path, &REPORT_COLUMNS)?;

        let ids = instruments(&df, "ins_id")?;
        let starts = required_dates(&df, "report_start_date")?;
        let ends = required_dates(&df, "report_end_date")?;
        let report_dates = date_column(&df, "report_date")?;
        let years = i64_column(&df, "year")?;
        let periods = i64_column(&df, "period")?;
        let currencies = str_column(&df, "currency")?;
        let broken = str_column(&df, "broken_fiscal_year")?;

        let mut rows: Vec<_> = (0..df.height())
            .map(|i| {
                let mut report = ReportObservation::new(ids[i], starts[i], ends[i]);
                report.report_date = report_dates[i];
                report.year = years[i].and_then(|v| i32::try_from(v).ok());
                report.period = periods[i].and_then(|v| i32::try_from(v).ok());
                report.currency = currencies[i].clone();
                report.broken_fiscal_year = broken[i].as_deref().and_then(parse_bool);
                report
            })
            .collect();

        for column in LineItems::COLUMNS {
            let values = f64_column(&df, column)?;
            for (report, value) in rows.iter_mut().zip(values) {
                if let Some(slot) = report.items.slot_mut(column) {
                    *slot = value;
                }
            }
        }
        info!(path = %path.display(), rows = rows.len(), "loaded reports");
        Ok(rows)
    }

    /// Reads a ranking table, keeping whichever rank columns it carries.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or lacks `ins_id` or `date`.
    pub fn read_ranking(path: &Path) -> Result<RankingTable> {
        let df = read_csv(path)?;
        require_columns(&df, path, &RANKING_COLUMNS)?;

        let ids = instruments(&df, "ins_id")?;
        let dates = required_dates(&df, "date")?;
        let columns: Vec<FactorKind> = FactorKind::ALL
            .into_iter()
            .filter(|k| has_column(&df, k.rank_column()))
            .collect();

        let mut rows: Vec<_> = (0..df.height())
            .map(|i| RankingRow {
                instrument: ids[i],
                date: dates[i],
                ranks: FactorRanks::default(),
            })
            .collect();
        for kind in &columns {
            let values = f64_column(&df, kind.rank_column())?;
            for (row, value) in rows.iter_mut().zip(values) {
                row.ranks.set(*kind, value);
            }
        }

        debug!(path = %path.display(), rows = rows.len(), columns = columns.len(), "loaded ranking");
        Ok(RankingTable::with_columns(columns, rows))
    }

    /// Writes the report table at `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Fails on filesystem or polars errors.
    pub fn write_reports(&self, path: &Path, rows: &[ReportObservation]) -> Result<()> {
        let mut columns = vec![
            Column::new("ins_id".into(), rows.iter().map(|r| r.instrument.0).collect::<Vec<_>>()),
            Column::new("year".into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()),
            Column::new("period".into(), rows.iter().map(|r| r.period).collect::<Vec<_>>()),
        ];
        for column in LineItems::COLUMNS {
            columns.push(Column::new(
                (*column).into(),
                rows.iter().map(|r| r.items.get(column)).collect::<Vec<_>>(),
            ));
        }
        columns.extend([
            Column::new(
                "broken_fiscal_year".into(),
                rows.iter()
                    .map(|r| r.broken_fiscal_year.map(|b| b.to_string()))
                    .collect::<Vec<_>>(),
            ),
            Column::new("currency".into(), rows.iter().map(|r| r.currency.clone()).collect::<Vec<_>>()),
            Column::new(
                "report_start_date".into(),
                format_dates(rows.iter().map(|r| r.report_start_date)),
            ),
            Column::new(
                "report_end_date".into(),
                format_dates(rows.iter().map(|r| r.report_end_date)),
            ),
            Column::new(
                "report_date".into(),
                format_optional_dates(rows.iter().map(|r| r.report_date)),
            ),
        ]);
        self.replace(path, |path| write_csv(path, columns))
    }

    fn replace(&self, path: &Path, write: impl FnOnce(&Path) -> Result<()>) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if self.backup {
            if let Some(copy) = backup_file(path)? {
                info!(from = %path.display(), to = %copy.display(), "backed up output");
            }
        }
        write(path)
    }
}

impl TableStore for CsvStore {
    type Error = DataError;

    fn prices(&self) -> Result<Vec<PriceObservation>> {
        Self::read_prices(&self.data_path(files::PRICES))
    }

    fn reports(&self) -> Result<Vec<ReportObservation>> {
        Self::read_reports(&self.data_path(files::REPORTS))
    }

    fn ranking(&self) -> Result<RankingTable> {
        Self::read_ranking(&self.output_path(files::RANKINGS))
    }

    fn replace_ranking(&self, table: &RankingTable) -> Result<()> {
        let path = self.output_path(files::RANKINGS);
        let rows = table.rows();

        let mut columns = vec![
            Column::new("ins_id".into(), rows.iter().map(|r| r.instrument.0).collect::<Vec<_>>()),
            Column::new("date".into(), format_dates(rows.iter().map(|r| r.date))),
        ];
        for kind in table.columns() {
            columns.push(Column::new(
                kind.rank_column().into(),
                rows.iter().map(|r| r.ranks.get(*kind)).collect::<Vec<_>>(),
            ));
        }

        self.replace(&path, |path| write_csv(path, columns))?;
        info!(path = %path.display(), rows = rows.len(), "wrote ranking");
        Ok(())
    }

    fn write_metrics(&self, rows: &[MetricsRow]) -> Result<()> {
        let csv_path = self.output_path(files::METRICS_CSV);
        self.replace(&csv_path, |path| {
            write_csv(
                path,
                vec![
                    Column::new("factor".into(), rows.iter().map(|r| r.factor.clone()).collect::<Vec<_>>()),
                    Column::new(
                        "holding_period".into(),
                        rows.iter().map(|r| r.holding_period.label()).collect::<Vec<_>>(),
                    ),
                    Column::new(
                        "quartile".into(),
                        rows.iter().map(|r| u32::from(r.quartile.get())).collect::<Vec<_>>(),
                    ),
                    Column::new("mean".into(), rows.iter().map(|r| r.mean).collect::<Vec<_>>()),
                    Column::new("std".into(), rows.iter().map(|r| r.std).collect::<Vec<_>>()),
                    Column::new("sharpe".into(), rows.iter().map(|r| r.sharpe).collect::<Vec<_>>()),
                    Column::new("mean_close".into(), rows.iter().map(|r| r.mean_close).collect::<Vec<_>>()),
                    Column::new(
                        "observations".into(),
                        rows.iter().map(|r| r.observations as u64).collect::<Vec<_>>(),
                    ),
                ],
            )
        })?;

        let json_path = self.output_path(files::METRICS_JSON);
        self.replace(&json_path, |path| {
            let mut writer = BufWriter::new(fs::File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writer.flush()?;
            Ok(())
        })?;

        info!(path = %csv_path.display(), rows = rows.len(), "wrote portfolio metrics");
        Ok(())
    }

    fn write_index(&self, rows: &[IndexRow]) -> Result<()> {
        let path = self.output_path(files::INDEX);
        self.replace(&path, |path| {
            write_csv(
                path,
                vec![
                    Column::new("date".into(), format_dates(rows.iter().map(|r| r.date))),
                    Column::new(
                        "equal_weighted".into(),
                        rows.iter().map(|r| r.equal_weighted).collect::<Vec<_>>(),
                    ),
                    Column::new(
                        "cap_weighted".into(),
                        rows.iter().map(|r| r.cap_weighted).collect::<Vec<_>>(),
                    ),
                ],
            )
        })?;
        info!(path = %path.display(), rows = rows.len(), "wrote benchmark indices");
        Ok(())
    }
}
