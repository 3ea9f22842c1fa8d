//! Column extraction and CSV helpers over polars frames.

use std::{fs::File, path::Path};

use famarank_traits::{Date, InstrumentId};
use polars::prelude::*;

use crate::{DataError, Result};

/// Date format used in every table file.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(DataError::NotFound(path.to_path_buf()));
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10_000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

pub(crate) fn write_csv(path: &Path, columns: Vec<Column>) -> Result<()> {
    let mut df = DataFrame::new(columns)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|s| s.as_str() == name)
}

pub(crate) fn require_columns(df: &DataFrame, path: &Path, columns: &[&str]) -> Result<()> {
    match columns.iter().find(|c| !has_column(df, c)) {
        Some(column) => Err(DataError::MissingColumn {
            path: path.to_path_buf(),
            column: (*column).to_string(),
        }),
        None => Ok(()),
    }
}

/// Float column; an absent column reads as all missing.
pub(crate) fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    if !has_column(df, name) {
        return Ok(vec![None; df.height()]);
    }
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Integer column; an absent column reads as all missing.
pub(crate) fn i64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    if !has_column(df, name) {
        return Ok(vec![None; df.height()]);
    }
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    Ok(series.i64()?.into_iter().collect())
}

/// String column; an absent column reads as all missing.
pub(crate) fn str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if !has_column(df, name) {
        return Ok(vec![None; df.height()]);
    }
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|s| s.map(str::to_string))
        .collect())
}

/// Parses `YYYY-MM-DD`, ignoring any time component after the date.
pub(crate) fn parse_date(value: &str) -> Option<Date> {
    let day = value.trim().get(..10)?;
    Date::parse_from_str(day, DATE_FORMAT).ok()
}

/// Date column; unparseable cells read as missing.
pub(crate) fn date_column(df: &DataFrame, name: &str) -> Result<Vec<Option<Date>>> {
    Ok(str_column(df, name)?
        .into_iter()
        .map(|s| s.as_deref().and_then(parse_date))
        .collect())
}

/// Date column in which every cell must be present.
pub(crate) fn required_dates(df: &DataFrame, name: &str) -> Result<Vec<Date>> {
    date_column(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, d)| {
            d.ok_or_else(|| DataError::InvalidValue {
                column: name.to_string(),
                row,
                message: "missing or malformed date".to_string(),
            })
        })
        .collect()
}

/// Instrument column in which every cell must be present.
pub(crate) fn instruments(df: &DataFrame, name: &str) -> Result<Vec<InstrumentId>> {
    i64_column(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, id)| {
            id.map(InstrumentId).ok_or_else(|| DataError::InvalidValue {
                column: name.to_string(),
                row,
                message: "missing instrument id".to_string(),
            })
        })
        .collect()
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" | "yes" => Some(true),
        "false" | "0" | "0.0" | "no" => Some(false),
        _ => None,
    }
}

pub(crate) fn format_dates(dates: impl IntoIterator<Item = Date>) -> Vec<String> {
    dates
        .into_iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect()
}

pub(crate) fn format_optional_dates(dates: impl IntoIterator<Item = Option<Date>>) -> Vec<Option<String>> {
    dates
        .into_iter()
        .map(|d| d.map(|d| d.format(DATE_FORMAT).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2021-03-01"), Date::from_ymd_opt(2021, 3, 1));
        assert_eq!(parse_date("2021-03-01 00:00:00"), Date::from_ymd_opt(2021, 3, 1));
        assert_eq!(parse_date("03/01/2021"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_csv_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        write_csv(
            &path,
            vec![
                Column::new("ins_id".into(), vec![1_i64, 2]),
                Column::new("date".into(), format_dates([Date::from_ymd_opt(2020, 1, 1).unwrap(); 2])),
                Column::new("close".into(), vec![Some(1.5), None]),
            ],
        )
        .unwrap();

        let df = read_csv(&path).unwrap();
        assert_eq!(instruments(&df, "ins_id").unwrap(), vec![InstrumentId(1), InstrumentId(2)]);
        assert_eq!(f64_column(&df, "close").unwrap(), vec![Some(1.5), None]);
        assert_eq!(f64_column(&df, "volume").unwrap(), vec![None, None]);
        assert_eq!(required_dates(&df, "date").unwrap()[1], Date::from_ymd_opt(2020, 1, 1).unwrap());
        assert!(matches!(
            require_columns(&df, &path, &["ins_id", "open"]),
            Err(DataError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv(Path::new("/nonexistent/famarank.csv"));
        assert!(matches!(result, Err(DataError::NotFound(_))));
    }
}
