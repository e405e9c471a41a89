//! Moderation queue

use super::classifier::classify;
use super::types::{ClassificationRequest, ClassificationResult};
use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::backend::{AdminStore, Submission, SubmissionStatus};
use crate::error::{AdminError, ValidationError};
use crate::pagination::{Page, PageRequest};
use crate::telemetry::{increment_counter, CounterMetric};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default number of submissions per page
pub const SUBMISSIONS_PER_PAGE: u32 = 10;

/// Moderator verdict on a pending submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn status(self) -> SubmissionStatus {
        match self {
            Decision::Approve => SubmissionStatus::Approved,
            Decision::Reject => SubmissionStatus::Rejected,
        }
    }

    fn audit_action(self) -> AuditAction {
        match self {
            Decision::Approve => AuditAction::ApprovePrice,
            Decision::Reject => AuditAction::RejectPrice,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approve => f.write_str("approve"),
            Decision::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for Decision {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Decision::Approve),
            "reject" => Ok(Decision::Reject),
            _ => Err(crate::error::ValidationError::Unrecognized {
                field: "decision",
                value: s.to_string(),
            }),
        }
    }
}

/// A submission with its deviation assessment
#[derive(Debug, Clone, Serialize)]
pub struct ReviewedSubmission {
    pub submission: Submission,
    /// `None` when there is no approved average to compare against
    pub assessment: Option<ClassificationResult>,
}

impl ReviewedSubmission {
    pub fn is_suspicious(&self) -> bool {
        self.assessment.as_ref().is_some_and(|a| a.is_suspicious)
    }
}

/// Pages through submissions and records decisions
pub struct ModerationQueue {
    store: Arc<dyn AdminStore>,
    audit: Arc<dyn AuditLog>,
    actor: String,
    page_size: u32,
    threshold: Decimal,
}

impl ModerationQueue {
    pub fn new(
        store: Arc<dyn AdminStore>,
        audit: Arc<dyn AuditLog>,
        actor: impl Into<String>,
        page_size: u32,
        threshold: Decimal,
    ) -> Self {
        Self {
            store,
            audit,
            actor: actor.into(),
            page_size,
            threshold,
        }
    }

    /// Classify a row; only a missing average leaves it unassessed
    fn review(&self, submission: Submission) -> Result<ReviewedSubmission, ValidationError> {
        let assessment = submission
            .average_price
            .map(|average| {
                ClassificationRequest::new(
                    submission.submitted_price,
                    average,
                    Some(self.threshold),
                )
            })
            .transpose()?
            .map(|request| classify(&request));
        Ok(ReviewedSubmission {
            submission,
            assessment,
        })
    }

    /// One page of submissions with the given status, newest first
    pub async fn page(
        &self,
        status: SubmissionStatus,
        page: u32,
    ) -> Result<Page<ReviewedSubmission>, AdminError> {
        let request = PageRequest::new(page, self.page_size)?;
        let rows = self
            .store
            .moderation_queue(status, request.limit(), request.offset())
            .await?;

        let total = rows.first().map_or(0, |s| s.total_count);
        let items = rows
            .into_iter()
            .map(|s| self.review(s))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            %status,
            page,
            total,
            flagged = items.iter().filter(|i| i.is_suspicious()).count(),
            "Loaded moderation page"
        );
        Ok(Page::new(items, total, request))
    }

    /// Approve or reject a submission, returning the operator confirmation
    pub async fn decide(&self, id: i64, decision: Decision) -> Result<String, AdminError> {
        let status = decision.status();
        if !self.store.update_submission_status(id, status).await? {
            return Err(AdminError::NotFound(format!("pending submission #{}", id)));
        }

        increment_counter(CounterMetric::ModerationDecisions);
        tracing::info!(submission_id = id, %status, "Submission moderated");
        self.audit.record(AuditEntry::new(
            &self.actor,
            decision.audit_action(),
            format!("{} price submission #{}", status, id),
        ));

        Ok(format!("Submission has been {}.", status))
    }
}
