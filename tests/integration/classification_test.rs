//! Classification behaviour through the public API

use gasprice_admin::error::ValidationError;
use gasprice_admin::moderation::{
    classify, flag_suspicious_price, validate, ClassificationRequest, FlagPriceInput,
    FlagPriceOutput, PlainAnnotator, PriceModerator, TemplateAnnotator,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn classify_prices(
    price: Decimal,
    average: Decimal,
    threshold: Option<Decimal>,
) -> gasprice_admin::moderation::ClassificationResult {
    classify(&ClassificationRequest::new(price, average, threshold).unwrap())
}

#[test]
fn test_price_at_average() {
    let result = classify_prices(dec!(720), dec!(720), Some(dec!(0.5)));
    assert_eq!(result.deviation_ratio, Decimal::ZERO);
    assert!(!result.is_suspicious);
    assert!(result.reason.is_none());
}

#[test]
fn test_price_exactly_at_threshold() {
    let result = classify_prices(dec!(1080), dec!(720), Some(dec!(0.5)));
    assert_eq!(result.deviation_ratio, dec!(0.5));
    assert!(!result.is_suspicious);
}

#[test]
fn test_price_just_over_threshold() {
    let result = classify_prices(dec!(1081), dec!(720), Some(dec!(0.5)));
    assert!(result.is_suspicious);
    assert_eq!(
        result.reason.as_deref(),
        Some("Price deviates by 50.14% from the average price.")
    );
}

#[test]
fn test_moderate_deviation_within_threshold() {
    let result = classify_prices(dec!(950), dec!(715), Some(dec!(0.5)));
    assert_eq!(result.deviation_ratio.round_dp(4), dec!(0.3287));
    assert!(!result.is_suspicious);
}

#[test]
fn test_zero_average_rejected() {
    let input: FlagPriceInput =
        serde_json::from_str(r#"{"price": 100, "averagePrice": 0}"#).unwrap();
    assert!(matches!(
        validate(&input),
        Err(ValidationError::NonPositiveAverage(_))
    ));
}

#[test]
fn test_default_threshold_applied() {
    let input: FlagPriceInput =
        serde_json::from_str(r#"{"price": 750, "averagePrice": 720}"#).unwrap();
    let request = validate(&input).unwrap();
    assert_eq!(request.deviation_threshold(), dec!(0.5));

    let result = classify(&request);
    assert_eq!(result.deviation_ratio.round_dp(4), dec!(0.0417));
    assert!(!result.is_suspicious);
}

#[test]
fn test_text_inputs_accepted() {
    let input: FlagPriceInput = serde_json::from_str(
        r#"{"price": " 1.2e3 ", "averagePrice": "720", "deviationThreshold": "0.3"}"#,
    )
    .unwrap();
    let request = validate(&input).unwrap();
    assert_eq!(request.submitted_price(), dec!(1200));
    assert!(classify(&request).is_suspicious);
}

#[test]
fn test_non_numeric_price_rejected() {
    let input: FlagPriceInput =
        serde_json::from_str(r#"{"price": "abc", "averagePrice": 720}"#).unwrap();
    assert!(matches!(
        validate(&input),
        Err(ValidationError::NotANumber { field: "price", .. })
    ));
}

#[test]
fn test_wire_output_shape() {
    let input = FlagPriceInput::new(dec!(300), dec!(720), None);
    let result = tokio_test::block_on(flag_suspicious_price(&input, &PlainAnnotator)).unwrap();
    let json = serde_json::to_value(FlagPriceOutput::from(result)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "isSuspicious": true,
            "reason": "Price deviates by 58.33% from the average price."
        })
    );

    let calm = FlagPriceInput::new(dec!(725), dec!(720), None);
    let result = tokio_test::block_on(flag_suspicious_price(&calm, &PlainAnnotator)).unwrap();
    let json = serde_json::to_value(FlagPriceOutput::from(result)).unwrap();
    assert_eq!(json, serde_json::json!({ "isSuspicious": false }));
}

#[tokio::test]
async fn test_template_annotation_keeps_computed_reason() {
    let moderator = PriceModerator::new(Box::new(TemplateAnnotator));
    let result = moderator
        .flag(&FlagPriceInput::new(dec!(1081), dec!(720), None))
        .await
        .unwrap();

    let reason = result.reason.unwrap();
    assert!(reason.starts_with("Price deviates by 50.14% from the average price. "));
    assert!(reason.contains("above the average of ₦720.00"));
}

#[tokio::test]
async fn test_configured_default_threshold() {
    let moderator = PriceModerator::with_default_threshold(Box::new(PlainAnnotator), dec!(0.02));
    let result = moderator
        .flag(&FlagPriceInput::new(dec!(750), dec!(720), None))
        .await
        .unwrap();
    assert!(result.is_suspicious);

    // An explicit threshold still wins
    let result = moderator
        .flag(&FlagPriceInput::new(dec!(750), dec!(720), Some(dec!(0.5))))
        .await
        .unwrap();
    assert!(!result.is_suspicious);
}

fn price() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000).prop_map(|kobo| Decimal::new(kobo, 2))
}

fn threshold() -> impl Strategy<Value = Decimal> {
    (1i64..500).prop_map(|t| Decimal::new(t, 2))
}

/// Any positive Decimal from 1e-28 up to about 1.8e19
fn wide_decimal() -> impl Strategy<Value = Decimal> {
    (1u64..=u64::MAX, 0u32..=28).prop_map(|(mantissa, scale)| {
        Decimal::from_i128_with_scale(i128::from(mantissa), scale)
    })
}

#[test]
fn test_extreme_values_rejected_not_panicking() {
    let tiny = Decimal::new(1, 22);
    assert!(matches!(
        ClassificationRequest::new(dec!(100000000000), tiny, None),
        Err(ValidationError::DeviationOutOfRange { .. })
    ));
    assert!(matches!(
        ClassificationRequest::new(Decimal::MAX, Decimal::ONE, None),
        Err(ValidationError::DeviationOutOfRange { .. })
    ));

    let input: FlagPriceInput = serde_json::from_str(
        r#"{"price": "100000000000", "averagePrice": "0.0000000000000000000001"}"#,
    )
    .unwrap();
    assert!(matches!(
        validate(&input),
        Err(ValidationError::DeviationOutOfRange { .. })
    ));
}

#[test]
fn test_largest_representable_deviation_classifies() {
    let result = classify_prices(Decimal::MAX / dec!(1000000), Decimal::ONE, None);
    assert!(result.is_suspicious);
    assert!(result.reason.is_some());
}

proptest! {
    #[test]
    fn prop_accepted_requests_never_panic(p in wide_decimal(), a in wide_decimal()) {
        if let Ok(request) = ClassificationRequest::new(p, a, None) {
            let result = classify(&request);
            prop_assert_eq!(result.reason.is_some(), result.is_suspicious);
        }
    }

    #[test]
    fn prop_ratio_is_non_negative(p in price(), a in price(), t in threshold()) {
        let result = classify_prices(p, a, Some(t));
        prop_assert!(result.deviation_ratio >= Decimal::ZERO);
    }

    #[test]
    fn prop_suspicious_iff_ratio_exceeds_threshold(p in price(), a in price(), t in threshold()) {
        let result = classify_prices(p, a, Some(t));
        prop_assert_eq!(result.is_suspicious, result.deviation_ratio > t);
        prop_assert_eq!(result.reason.is_some(), result.is_suspicious);
    }

    #[test]
    fn prop_ratio_is_relative_to_average(p in price(), a in price()) {
        let result = classify_prices(p, a, None);
        prop_assert_eq!(result.deviation_ratio, (p - a).abs() / a);
    }

    #[test]
    fn prop_classification_is_deterministic(p in price(), a in price(), t in threshold()) {
        prop_assert_eq!(classify_prices(p, a, Some(t)), classify_prices(p, a, Some(t)));
    }
}
