//! Classification types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Threshold applied when the caller does not supply one (0.5 = 50%)
pub const DEFAULT_DEVIATION_THRESHOLD: Decimal = dec!(0.5);

/// A number as it arrives from a form or JSON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// JSON number
    Number(serde_json::Number),
    /// Text entered by a moderator
    Text(String),
}

impl From<Decimal> for RawNumber {
    fn from(value: Decimal) -> Self {
        RawNumber::Text(value.to_string())
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

impl From<i64> for RawNumber {
    fn from(value: i64) -> Self {
        RawNumber::Number(value.into())
    }
}

/// Unvalidated input to the flagging flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagPriceInput {
    /// Submitted price
    pub price: RawNumber,
    /// Reference average for the same product/region
    pub average_price: RawNumber,
    /// Fractional threshold, defaults to 0.5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_threshold: Option<RawNumber>,
}

impl FlagPriceInput {
    /// Build an input from already-typed decimals
    pub fn new(
        price: Decimal,
        average_price: Decimal,
        deviation_threshold: Option<Decimal>,
    ) -> Self {
        Self {
            price: price.into(),
            average_price: average_price.into(),
            deviation_threshold: deviation_threshold.map(Into::into),
        }
    }
}

/// A validated classification request
///
/// Only obtainable through the validator, so every instance has strictly
/// positive price, average and threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub(super) submitted_price: Decimal,
    pub(super) average_price: Decimal,
    pub(super) deviation_threshold: Decimal,
}

impl ClassificationRequest {
    pub fn submitted_price(&self) -> Decimal {
        self.submitted_price
    }

    pub fn average_price(&self) -> Decimal {
        self.average_price
    }

    pub fn deviation_threshold(&self) -> Decimal {
        self.deviation_threshold
    }
}

/// Outcome of classifying a single submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// True iff the deviation ratio exceeds the threshold
    pub is_suspicious: bool,
    /// `|submitted - average| / average`
    pub deviation_ratio: Decimal,
    /// Explanation, present only when suspicious
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Wire shape returned to callers of the flagging flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagPriceOutput {
    pub is_suspicious: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&ClassificationResult> for FlagPriceOutput {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            is_suspicious: result.is_suspicious,
            reason: result.reason.clone(),
        }
    }
}

impl From<ClassificationResult> for FlagPriceOutput {
    fn from(result: ClassificationResult) -> Self {
        Self {
            is_suspicious: result.is_suspicious,
            reason: result.reason,
        }
    }
}
