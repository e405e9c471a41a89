//! Price deviation classification

use super::types::{ClassificationRequest, ClassificationResult};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Relative deviation of a submitted price from the reference average
///
/// The denominator is always the average, so the ratio is not symmetric in
/// its two arguments. Callers must ensure `average_price > 0` and that the
/// quotient fits in a `Decimal`; validated requests always do.
pub fn deviation_ratio(submitted_price: Decimal, average_price: Decimal) -> Decimal {
    (submitted_price - average_price).abs() / average_price
}

/// Render a ratio as a percentage with exactly two decimal places
pub fn format_percentage(ratio: Decimal) -> String {
    let mut pct =
        (ratio * dec!(100)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    pct.rescale(2);
    pct.to_string()
}

/// Classify a validated request
pub fn classify(request: &ClassificationRequest) -> ClassificationResult {
    let ratio = deviation_ratio(request.submitted_price, request.average_price);
    let is_suspicious = ratio > request.deviation_threshold;

    let reason = is_suspicious.then(|| {
        format!(
            "Price deviates by {}% from the average price.",
            format_percentage(ratio)
        )
    });

    ClassificationResult {
        is_suspicious,
        deviation_ratio: ratio,
        reason,
    }
}
