//! Classification request validation

use super::types::{ClassificationRequest, FlagPriceInput, RawNumber, DEFAULT_DEVIATION_THRESHOLD};
use crate::error::ValidationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

impl ClassificationRequest {
    /// Validate typed inputs, applying the default threshold when absent
    pub fn new(
        submitted_price: Decimal,
        average_price: Decimal,
        deviation_threshold: Option<Decimal>,
    ) -> Result<Self, ValidationError> {
        Self::with_default_threshold(
            submitted_price,
            average_price,
            deviation_threshold,
            DEFAULT_DEVIATION_THRESHOLD,
        )
    }

    /// Validate typed inputs against a caller-chosen default threshold
    pub fn with_default_threshold(
        submitted_price: Decimal,
        average_price: Decimal,
        deviation_threshold: Option<Decimal>,
        default_threshold: Decimal,
    ) -> Result<Self, ValidationError> {
        if submitted_price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice(submitted_price));
        }
        if average_price <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAverage(average_price));
        }

        let deviation_threshold = deviation_threshold.unwrap_or(default_threshold);
        if deviation_threshold <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveThreshold(deviation_threshold));
        }

        // The ratio and its percentage must both fit in a Decimal
        let representable = (submitted_price - average_price)
            .abs()
            .checked_div(average_price)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .is_some();
        if !representable {
            return Err(ValidationError::DeviationOutOfRange {
                price: submitted_price,
                average: average_price,
            });
        }

        Ok(Self {
            submitted_price,
            average_price,
            deviation_threshold,
        })
    }

    /// Validate text inputs, e.g. straight from CLI arguments
    pub fn from_raw(
        price: &str,
        average_price: &str,
        deviation_threshold: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let price = parse_decimal("price", price)?;
        let average_price = parse_decimal("averagePrice", average_price)?;
        let threshold = deviation_threshold
            .map(|t| parse_decimal("deviationThreshold", t))
            .transpose()?;
        Self::new(price, average_price, threshold)
    }
}

/// Validate a wire input using the standard 0.5 default
pub fn validate(input: &FlagPriceInput) -> Result<ClassificationRequest, ValidationError> {
    validate_with_default(input, DEFAULT_DEVIATION_THRESHOLD)
}

/// Validate a wire input with a configured default threshold
pub fn validate_with_default(
    input: &FlagPriceInput,
    default_threshold: Decimal,
) -> Result<ClassificationRequest, ValidationError> {
    let price = raw_to_decimal("price", &input.price)?;
    let average_price = raw_to_decimal("averagePrice", &input.average_price)?;
    let threshold = input
        .deviation_threshold
        .as_ref()
        .map(|t| raw_to_decimal("deviationThreshold", t))
        .transpose()?;

    ClassificationRequest::with_default_threshold(
        price,
        average_price,
        threshold,
        default_threshold,
    )
}

fn raw_to_decimal(field: &'static str, raw: &RawNumber) -> Result<Decimal, ValidationError> {
    match raw {
        RawNumber::Number(n) => parse_decimal(field, &n.to_string()),
        RawNumber::Text(s) => parse_decimal(field, s),
    }
}

/// Parse plain or scientific notation
fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, ValidationError> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: value.to_string(),
        })
}
