use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// One parsed line of a daily-log export: which metric was observed, on
/// which day, and at what value.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyLogRow {
    pub metric: String,
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug)]
pub enum DailyLogImportError {
    Csv(csv::Error),
    MissingMetric { line: u64 },
    InvalidDate { line: u64, raw: String },
    InvalidValue { line: u64, raw: String },
}

impl std::fmt::Display for DailyLogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DailyLogImportError::Csv(err) => write!(f, "invalid daily log CSV data: {}", err),
            DailyLogImportError::MissingMetric { line } => {
                write!(f, "line {line}: metric name is empty")
            }
            DailyLogImportError::InvalidDate { line, raw } => {
                write!(f, "line {line}: '{raw}' is not a YYYY-MM-DD date")
            }
            DailyLogImportError::InvalidValue { line, raw } => {
                write!(f, "line {line}: '{raw}' is not a finite number")
            }
        }
    }
}

impl std::error::Error for DailyLogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DailyLogImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for DailyLogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `Metric,Date,Value` CSV exports into daily log rows.
pub struct DailyLogImporter;

impl DailyLogImporter {
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<DailyLogRow>, DailyLogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = Vec::new();

        for (index, record) in csv_reader.deserialize::<DailyLogLine>().enumerate() {
            // Data starts on line 2, after the header row.
            let line = index as u64 + 2;
            let raw = record?;

            let metric = raw
                .metric
                .ok_or(DailyLogImportError::MissingMetric { line })?;

            let date_text = raw
                .date
                .ok_or_else(|| DailyLogImportError::InvalidDate {
                    line,
                    raw: String::new(),
                })?;
            let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|_| {
                DailyLogImportError::InvalidDate {
                    line,
                    raw: date_text.clone(),
                }
            })?;

            let value_text = raw
                .value
                .ok_or_else(|| DailyLogImportError::InvalidValue {
                    line,
                    raw: String::new(),
                })?;
            let value: f64 =
                value_text
                    .parse()
                    .map_err(|_| DailyLogImportError::InvalidValue {
                        line,
                        raw: value_text.clone(),
                    })?;
            if !value.is_finite() {
                return Err(DailyLogImportError::InvalidValue {
                    line,
                    raw: value_text,
                });
            }

            rows.push(DailyLogRow {
                metric,
                date,
                value,
            });
        }

        Ok(rows)
    }
}

#[derive(Debug, Deserialize)]
struct DailyLogLine {
    #[serde(rename = "Metric", default, deserialize_with = "empty_string_as_none")]
    metric: Option<String>,
    #[serde(rename = "Date", default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(rename = "Value", default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Case- and whitespace-insensitive key for matching export rows against
/// catalog metric names.
pub(crate) fn normalize_metric_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}
