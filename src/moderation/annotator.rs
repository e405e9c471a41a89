//! Narrative annotation of classification results
//!
//! Annotators enrich the reason text of a suspicious result. They only ever
//! return extra text, so the decision made by the classifier is final.

use super::classifier::format_percentage;
use super::types::{ClassificationRequest, ClassificationResult};
use crate::config::{AnnotatorConfig, AnnotatorMode};
use crate::error::AnnotationError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Adds natural-language context to a finalized result
#[async_trait]
pub trait NarrativeAnnotator: Send + Sync {
    /// Return text to append to the reason, or `None` to leave it as is
    async fn annotate(
        &self,
        request: &ClassificationRequest,
        result: &ClassificationResult,
    ) -> Result<Option<String>, AnnotationError>;
}

/// Leaves the computed reason untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainAnnotator;

#[async_trait]
impl NarrativeAnnotator for PlainAnnotator {
    async fn annotate(
        &self,
        _request: &ClassificationRequest,
        _result: &ClassificationResult,
    ) -> Result<Option<String>, AnnotationError> {
        Ok(None)
    }
}

/// Deterministic narrative built from the request figures
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateAnnotator;

impl TemplateAnnotator {
    /// Render the narrative for a request
    pub fn render(request: &ClassificationRequest) -> String {
        let direction = if request.submitted_price() > request.average_price() {
            "above"
        } else {
            "below"
        };
        format!(
            "The submitted price of ₦{:.2} is {} the average of ₦{:.2}, beyond the {}% review threshold.",
            request.submitted_price(),
            direction,
            request.average_price(),
            format_percentage(request.deviation_threshold()),
        )
    }
}

#[async_trait]
impl NarrativeAnnotator for TemplateAnnotator {
    async fn annotate(
        &self,
        request: &ClassificationRequest,
        _result: &ClassificationResult,
    ) -> Result<Option<String>, AnnotationError> {
        Ok(Some(Self::render(request)))
    }
}

/// Prompt sent to the text-generation service
pub fn render_prompt(request: &ClassificationRequest, result: &ClassificationResult) -> String {
    let mut prompt = format!(
        "You are an expert system for flagging suspicious prices.\n\
         \n\
         Submitted Price: {}\n\
         Average Price: {}\n\
         Deviation Threshold: {}\n\
         Flagged: {}\n",
        request.submitted_price(),
        request.average_price(),
        request.deviation_threshold(),
        result.is_suspicious,
    );
    if let Some(reason) = &result.reason {
        prompt.push_str(&format!("Computed Reason: {}\n", reason));
    }
    prompt.push_str(
        "\nExplain briefly, for a moderator, why this price warrants review. \
         Do not restate the verdict.\n",
    );
    prompt
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationRequest<'a> {
    prompt: &'a str,
    is_suspicious: bool,
    reason: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AnnotationResponse {
    #[serde(default)]
    text: Option<String>,
}

/// Delegates narrative generation to an external HTTP service
pub struct HttpAnnotator {
    endpoint: String,
    client: Client,
}

impl HttpAnnotator {
    /// Create a client for the given endpoint
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AnnotationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NarrativeAnnotator for HttpAnnotator {
    async fn annotate(
        &self,
        request: &ClassificationRequest,
        result: &ClassificationResult,
    ) -> Result<Option<String>, AnnotationError> {
        let prompt = render_prompt(request, result);
        let body = AnnotationRequest {
            prompt: &prompt,
            is_suspicious: result.is_suspicious,
            reason: result.reason.as_deref(),
        };

        tracing::debug!(endpoint = %self.endpoint, "Requesting price annotation");

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(AnnotationError::Status(response.status().as_u16()));
        }

        let parsed: AnnotationResponse = response.json().await?;
        Ok(parsed
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }
}

/// Build the annotator selected in configuration
pub fn build_annotator(
    config: &AnnotatorConfig,
) -> Result<Box<dyn NarrativeAnnotator>, AnnotationError> {
    match config.mode {
        AnnotatorMode::Plain => Ok(Box::new(PlainAnnotator)),
        AnnotatorMode::Template => Ok(Box::new(TemplateAnnotator)),
        AnnotatorMode::Http => {
            let endpoint = config
                .endpoint
                .as_ref()
                .ok_or(AnnotationError::NotConfigured)?;
            let annotator =
                HttpAnnotator::new(endpoint.clone(), Duration::from_secs(config.timeout_secs))?;
            Ok(Box::new(annotator))
        }
    }
}
