//! Suspicious price flagging flow
//!
//! Validate, classify, then optionally enrich the reason. Validation errors
//! propagate; annotation failures never do.

use super::annotator::NarrativeAnnotator;
use super::classifier::classify;
use super::types::{
    ClassificationRequest, ClassificationResult, FlagPriceInput, DEFAULT_DEVIATION_THRESHOLD,
};
use super::validator::validate_with_default;
use crate::error::ValidationError;
use crate::telemetry::{increment_counter, CounterMetric};
use rust_decimal::Decimal;

/// Runs the flagging flow with a fixed annotator and default threshold
pub struct PriceModerator {
    annotator: Box<dyn NarrativeAnnotator>,
    default_threshold: Decimal,
}

impl PriceModerator {
    /// Create a moderator using the standard 0.5 default threshold
    pub fn new(annotator: Box<dyn NarrativeAnnotator>) -> Self {
        Self::with_default_threshold(annotator, DEFAULT_DEVIATION_THRESHOLD)
    }

    /// Create a moderator with a configured default threshold
    pub fn with_default_threshold(
        annotator: Box<dyn NarrativeAnnotator>,
        default_threshold: Decimal,
    ) -> Self {
        Self {
            annotator,
            default_threshold,
        }
    }

    pub fn default_threshold(&self) -> Decimal {
        self.default_threshold
    }

    /// Flag a raw submission
    pub async fn flag(
        &self,
        input: &FlagPriceInput,
    ) -> Result<ClassificationResult, ValidationError> {
        let request = validate_with_default(input, self.default_threshold)?;
        Ok(self.flag_request(&request).await)
    }

    /// Flag an already-validated request
    pub async fn flag_request(&self, request: &ClassificationRequest) -> ClassificationResult {
        annotate_result(request, classify(request), self.annotator.as_ref()).await
    }
}

/// Validate and classify with the standard default threshold
pub async fn flag_suspicious_price(
    input: &FlagPriceInput,
    annotator: &dyn NarrativeAnnotator,
) -> Result<ClassificationResult, ValidationError> {
    let request = validate_with_default(input, DEFAULT_DEVIATION_THRESHOLD)?;
    Ok(annotate_result(&request, classify(&request), annotator).await)
}

async fn annotate_result(
    request: &ClassificationRequest,
    mut result: ClassificationResult,
    annotator: &dyn NarrativeAnnotator,
) -> ClassificationResult {
    increment_counter(CounterMetric::SubmissionsClassified);

    if !result.is_suspicious {
        return result;
    }
    increment_counter(CounterMetric::SubmissionsFlagged);

    match annotator.annotate(request, &result).await {
        Ok(Some(extra)) => {
            if let Some(reason) = result.reason.as_mut() {
                reason.push(' ');
                reason.push_str(&extra);
            }
        }
        Ok(None) => {}
        Err(e) => {
            increment_counter(CounterMetric::AnnotationFallbacks);
            tracing::warn!(error = %e, "Annotation unavailable, using computed reason");
        }
    }

    tracing::info!(
        submitted = %request.submitted_price(),
        average = %request.average_price(),
        deviation = %result.deviation_ratio,
        "Flagged suspicious price"
    );

    result
}
