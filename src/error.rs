//! Error taxonomy

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejected input. Always recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Submitted price is zero or negative
    #[error("submitted price must be greater than 0, got {0}")]
    NonPositivePrice(Decimal),
    /// Reference average is zero or negative
    #[error("average price must be greater than 0, got {0}")]
    NonPositiveAverage(Decimal),
    /// Deviation threshold is zero or negative
    #[error("deviation threshold must be greater than 0, got {0}")]
    NonPositiveThreshold(Decimal),
    /// A numeric field could not be parsed
    #[error("{field} is not a valid number: {value:?}")]
    NotANumber { field: &'static str, value: String },
    /// Deviation too large to represent, e.g. a near-zero average
    #[error("deviation of {price} from {average} is out of range")]
    DeviationOutOfRange { price: Decimal, average: Decimal },
    /// Configured page size is zero
    #[error("page size must be at least 1")]
    ZeroPageSize,
    /// A required text field is empty
    #[error("{0} is required")]
    Blank(&'static str),
    /// State name outside the known list
    #[error("unknown state: {0}")]
    UnknownState(String),
    /// Pages are numbered from 1
    #[error("page numbers start at 1")]
    PageOutOfRange,
    /// Report range ends before it starts
    #[error("date range starts after it ends")]
    InvertedDateRange,
    /// Value outside an enumerated set
    #[error("unsupported {field}: {value:?}")]
    Unrecognized { field: &'static str, value: String },
    /// Status change not allowed from the current status
    #[error("cannot {action} an account that is {from}")]
    InvalidTransition { action: &'static str, from: String },
}

/// Failure talking to the managed backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, timeout or TLS failure
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body did not match the expected shape
    #[error("unexpected backend response: {0}")]
    Decode(String),
}

/// Failure of the optional narrative step
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("annotation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("annotation service returned {0}")]
    Status(u16),
    #[error("annotation service is not configured")]
    NotConfigured,
}

/// Errors surfaced by the admin services
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// Record lookup came back empty
    #[error("{0} not found")]
    NotFound(String),
}

/// Errors from report generation
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no data found for the selected criteria")]
    NoData,
    #[error("{0} export is not yet implemented")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
