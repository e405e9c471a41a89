//! Report selection criteria

use crate::error::ValidationError;
use crate::region::Region;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            "xlsx" => Ok(ExportFormat::Xlsx),
            _ => Err(ValidationError::Unrecognized {
                field: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Region, inclusive date range and format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportCriteria {
    pub region: Region,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub format: ExportFormat,
}

impl ReportCriteria {
    pub fn new(
        region: Region,
        from: NaiveDate,
        to: NaiveDate,
        format: ExportFormat,
    ) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::InvertedDateRange);
        }
        Ok(Self {
            region,
            from,
            to,
            format,
        })
    }

    /// Start of the first day, inclusive
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.from.and_time(NaiveTime::MIN).and_utc()
    }

    /// Start of the day after the last day, exclusive
    pub fn ends_before(&self) -> DateTime<Utc> {
        self.to
            .checked_add_days(Days::new(1))
            .unwrap_or(self.to)
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.starts_at() && timestamp < self.ends_before()
    }

    /// e.g. `FYND_FUEL_Report_Lagos_2024-07-01_to_2024-07-31.csv`
    pub fn file_name(&self) -> String {
        format!(
            "FYND_FUEL_Report_{}_{}_to_{}.{}",
            self.region,
            self.from.format("%Y-%m-%d"),
            self.to.format("%Y-%m-%d"),
            self.format.extension()
        )
    }
}
